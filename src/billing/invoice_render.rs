// src/billing/invoice_render.rs

use bigdecimal::BigDecimal;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use super::billing_structs::{Invoice, ADDITIONAL_TAX_PERCENT, GST_PERCENT};
use crate::error::PosResult;
use crate::shared::shared_utils::round_money;
use crate::storage::invoice_images::InvoiceImageStore;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 800;

const MARGIN_X: u32 = 10;
const LINE_STEP: u32 = 20;
const ITEMS_TOP: u32 = 110;
const GLYPH_SIZE: u32 = 8;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Uma linha de texto ancorada no seu pixel superior esquerdo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// Tudo o que é preciso para desenhar uma nota, antes de tocar em qualquer pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLayout {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<TextLine>,
}

impl InvoiceLayout {
    fn push(&mut self, y: u32, text: String) {
        self.lines.push(TextLine {
            x: MARGIN_X,
            y,
            text,
        });
    }
}

fn money(amount: &BigDecimal) -> String {
    format!("Rs.{}", round_money(amount))
}

/// Posiciona o texto da nota numa tela fixa de 600x800.
///
/// Cabeçalho em posições fixas, depois uma linha por item a partir de
/// y=110, e por fim as cinco linhas de valores um passo abaixo do último item.
pub fn layout_invoice(invoice: &Invoice) -> InvoiceLayout {
    let mut layout = InvoiceLayout {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        lines: Vec::with_capacity(invoice.items.len() + 10),
    };

    layout.push(10, "Invoice".to_string());
    layout.push(30, format!("Date: {}", invoice.date));
    layout.push(50, format!("Payment Method: {}", invoice.payment_method));
    layout.push(70, format!("Invoice ID: {}", invoice.invoice_id));

    let mut y = ITEMS_TOP;
    layout.push(y - 10, "Items:".to_string());
    for line in &invoice.items {
        layout.push(
            y,
            format!("{} x {} = {}", line.name, line.quantity, money(&line.subtotal)),
        );
        y += LINE_STEP;
    }

    y += LINE_STEP;
    let totals = [
        format!("Subtotal: {}", money(&invoice.subtotal)),
        format!("GST ({GST_PERCENT}%): {}", money(&invoice.gst)),
        format!("Additional Tax ({ADDITIONAL_TAX_PERCENT}%): {}", money(&invoice.additional_tax)),
        format!("Discount: -{}", money(&invoice.discount)),
        format!("Total Payable: {}", money(&invoice.total)),
    ];
    for text in totals {
        layout.push(y, text);
        y += LINE_STEP;
    }

    layout
}

/// Desenha o layout em preto sobre branco com a fonte bitmap 8x8.
/// Caracteres sem glifo saem como '?'; o que passa da tela é cortado.
pub fn rasterize(layout: &InvoiceLayout) -> RgbImage {
    let mut image = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);
    for line in &layout.lines {
        draw_text(&mut image, line.x, line.y, &line.text);
    }
    image
}

fn draw_text(image: &mut RgbImage, x: u32, y: u32, text: &str) {
    let (width, height) = image.dimensions();
    let mut cursor = x;

    for ch in text.chars() {
        if cursor >= width {
            break;
        }
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);

        for (row, &bits) in glyph.iter().enumerate() {
            let py = y + row as u32;
            if py >= height {
                break;
            }
            for col in 0..GLYPH_SIZE {
                let px = cursor + col;
                if px < width && bits & (1u8 << col) != 0 {
                    image.put_pixel(px, py, INK);
                }
            }
        }
        cursor += GLYPH_SIZE;
    }
}

pub fn encode_png(image: &RgbImage) -> PosResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renderiza a nota em bytes PNG. Mesma nota, mesmos bytes.
pub fn render_invoice(invoice: &Invoice) -> PosResult<Vec<u8>> {
    encode_png(&rasterize(&layout_invoice(invoice)))
}

/// Renderiza a nota e (re)grava o arquivo da imagem.
pub fn render_and_save(images: &InvoiceImageStore, invoice: &Invoice) -> PosResult<Vec<u8>> {
    let png = render_invoice(invoice)?;
    let path = images.save(&invoice.invoice_id, &png)?;
    tracing::debug!(invoice_id = %invoice.invoice_id, path = %path.display(), "invoice image written");
    Ok(png)
}
