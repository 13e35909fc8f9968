// src/storage/invoice_images.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Imagens das notas em disco, um arquivo por ID de nota.
/// O arquivo é sobrescrito a cada nova renderização.
#[derive(Debug, Clone)]
pub struct InvoiceImageStore {
    dir: PathBuf,
}

impl InvoiceImageStore {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(InvoiceImageStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, invoice_id: &str) -> PathBuf {
        self.dir.join(format!("invoice_{invoice_id}.png"))
    }

    pub fn save(&self, invoice_id: &str, png: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(invoice_id);
        fs::write(&path, png)?;
        Ok(path)
    }
}
