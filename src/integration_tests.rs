// src/integration_tests.rs

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use bigdecimal::BigDecimal;
use futures::future::join_all;
use serde_json::{json, Value};
use std::fs;
use std::str::FromStr;
use tempfile::TempDir;

use crate::billing::billing_repository;
use crate::billing::billing_structs::Invoice;
use crate::configure_services;
use crate::error::PosError;
use crate::inventory::inventory_repository;
use crate::inventory::inventory_structs::{Item, ItemUpdate, NewItem};
use crate::sales::sales_repository;
use crate::storage::database::{self, DatabasePools};
use crate::storage::invoice_images::InvoiceImageStore;
use crate::storage::legacy_import::{self, ImportSummary};
use crate::AppState;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Banco e diretório de notas novos dentro de um diretório temporário,
/// que precisa viver até o fim do teste.
async fn test_state() -> (web::Data<AppState>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let DatabasePools { db_pool, db_writer } =
        database::connect(&dir.path().join("pos.db")).await.unwrap();
    let invoice_images = InvoiceImageStore::open(dir.path().join("invoices")).unwrap();

    (
        web::Data::new(AppState {
            db_pool,
            db_writer,
            invoice_images,
        }),
        dir,
    )
}

async fn seed_item(state: &AppState, name: &str, price: &str, quantity: i64) -> Item {
    inventory_repository::add_item(
        &state.db_writer,
        NewItem {
            name: name.to_string(),
            description: format!("{name} description"),
            price: BigDecimal::from_str(price).unwrap(),
            quantity,
        },
    )
    .await
    .unwrap()
}

fn money(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

#[actix_web::test]
async fn adds_and_lists_items_with_case_insensitive_names() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;

    let req = test::TestRequest::post()
        .uri("/inventory/add")
        .set_json(json!({"name": "Widget", "desc": "blue widget", "price": 10, "quantity": 5}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["body"]["name"], "Widget");
    assert_eq!(body["body"]["description"], "blue widget");
    assert_eq!(body["body"]["pid"].as_str().unwrap().len(), 8);
    assert_eq!(body["body"]["price"].as_f64(), Some(10.0));

    let req = test::TestRequest::post()
        .uri("/inventory/add")
        .set_json(json!({"name": "wIDGET", "desc": "", "price": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    seed_item(&state, "Gadget", "2.50", 0).await;

    let req = test::TestRequest::get().uri("/inventory").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(listed[0]["pid"].is_string());
    assert_eq!(listed[1]["price"], json!(2.5));

    let items: Vec<Item> = serde_json::from_value(listed).unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Widget", "Gadget"]);
    assert_eq!(items[1].quantity, 0);
}

#[actix_web::test]
async fn duplicate_names_are_rejected_by_the_repository() {
    let (state, _dir) = test_state().await;
    seed_item(&state, "Lamp", "4.00", 1).await;

    let err = inventory_repository::add_item(
        &state.db_writer,
        NewItem {
            name: "LAMP".into(),
            description: String::new(),
            price: money("5"),
            quantity: 0,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PosError::DuplicateItem(_)));
}

#[actix_web::test]
async fn update_applies_only_the_fields_sent() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "10.00", 5).await;

    let req = test::TestRequest::put()
        .uri(&format!("/inventory/update/{}", widget.id))
        .set_json(json!({"price": "12.50"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.price, money("12.50"));
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.description, "Widget description");

    let req = test::TestRequest::put()
        .uri("/inventory/update/missing0")
        .set_json(json!({"quantity": 3}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/inventory/update/{}", widget.id))
        .set_json(json!({"quantity": -1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn decrease_stock_never_goes_negative() {
    let (state, _dir) = test_state().await;
    let widget = seed_item(&state, "Widget", "10.00", 3).await;
    let mut conn = state.db_writer.acquire().await.unwrap();

    let err = inventory_repository::decrease_stock(&mut conn, &widget.id, 5)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PosError::InsufficientStock { requested: 5, available: 3, .. }
    ));
    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 3);

    inventory_repository::decrease_stock(&mut conn, &widget.id, 3)
        .await
        .unwrap();
    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 0);

    let err = inventory_repository::decrease_stock(&mut conn, "missing0", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, PosError::ItemNotFound(_)));
}

#[actix_web::test]
async fn cart_add_prices_without_touching_stock() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "10.00", 5).await;

    let req = test::TestRequest::post()
        .uri("/cart/add")
        .set_json(json!({"pid": widget.id, "quantity": 2}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Added 2 x Widget");
    assert_eq!(body["body"]["name"], "Widget");
    assert_eq!(body["body"]["quantity"], 2);
    assert_eq!(body["body"]["pid"], json!(widget.id));
    assert_eq!(body["body"]["subtotal"].as_f64(), Some(20.0));

    let req = test::TestRequest::post()
        .uri("/cart/add")
        .set_json(json!({"id": widget.id, "quantity": 6}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/cart/add")
        .set_json(json!({"id": "missing0"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 5);
}

#[actix_web::test]
async fn checkout_records_the_sale_and_returns_the_invoice_image() {
    let (state, dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "10.00", 5).await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({
            "payment_method": "Cash",
            "cart_items": [{"id": widget.id, "name": "Widget", "quantity": 2, "subtotal": "20.00"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    let png = test::read_body(resp).await;
    assert!(png.starts_with(PNG_SIGNATURE));

    let req = test::TestRequest::get().uri("/billing/history").to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history[0]["items"][0]["pid"], json!(widget.id));
    assert_eq!(history[0]["subtotal"], json!(20.0));
    assert_eq!(history[0]["gst"], json!(3.6));
    assert_eq!(history[0]["total"], json!(24.0));

    let invoices: Vec<Invoice> = serde_json::from_value(history).unwrap();
    assert_eq!(invoices.len(), 1);
    let invoice = &invoices[0];
    assert_eq!(invoice.payment_method, "Cash");
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.subtotal, money("20.00"));
    assert_eq!(invoice.gst, money("3.60"));
    assert_eq!(invoice.additional_tax, money("0.40"));
    assert_eq!(invoice.discount, money("0"));
    assert_eq!(invoice.total, money("24.00"));

    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 3);

    let sold = sales_repository::list_sold_records(&state.db_pool).await.unwrap();
    assert_eq!(sold.len(), 1);
    assert_eq!(sold[0].item_id, widget.id);
    assert_eq!(sold[0].product, "Widget");
    assert_eq!(sold[0].quantity, 2);

    let image_path = dir
        .path()
        .join("invoices")
        .join(format!("invoice_{}.png", invoice.invoice_id));
    assert_eq!(fs::read(image_path).unwrap(), png.to_vec());
}

#[actix_web::test]
async fn empty_cart_writes_nothing() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({"payment_method": "Card", "cart_items": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Cart is empty");

    let count = database::count_rows(&state.db_pool, "invoices").await.unwrap();
    assert_eq!(count, 0);
    let count = database::count_rows(&state.db_pool, "sold_products").await.unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn failed_line_rolls_the_whole_checkout_back() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "10.00", 5).await;
    let gadget = seed_item(&state, "Gadget", "1.00", 1).await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({
            "payment_method": "Cash",
            "cart_items": [
                {"id": widget.id, "name": "Widget", "quantity": 2, "subtotal": 20},
                {"id": gadget.id, "name": "Gadget", "quantity": 3, "subtotal": 3}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 5);
    let stored = inventory_repository::get_item(&state.db_pool, &gadget.id).await.unwrap();
    assert_eq!(stored.quantity, 1);
    assert!(sales_repository::list_sold_records(&state.db_pool)
        .await
        .unwrap()
        .is_empty());
    let count = database::count_rows(&state.db_pool, "invoices").await.unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn invoices_are_rerendered_identically_by_id() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "10.00", 5).await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({
            "payment_method": "UPI",
            "cart_items": [{"pid": widget.id, "name": "Widget", "quantity": 1, "subtotal": 10, "price": 10}]
        }))
        .to_request();
    let from_checkout = test::call_and_read_body(&app, req).await;

    let req = test::TestRequest::get().uri("/billing/history").to_request();
    let invoices: Vec<Invoice> = test::call_and_read_body_json(&app, req).await;
    let invoice_id = &invoices[0].invoice_id;

    let req = test::TestRequest::get()
        .uri(&format!("/billing/{invoice_id}"))
        .to_request();
    let first = test::call_and_read_body(&app, req).await;
    let req = test::TestRequest::get()
        .uri(&format!("/invoice/{invoice_id}"))
        .to_request();
    let second = test::call_and_read_body(&app, req).await;

    assert!(first.starts_with(PNG_SIGNATURE));
    assert_eq!(first, second);
    assert_eq!(first, from_checkout);
}

#[actix_web::test]
async fn unknown_invoice_is_not_found() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;

    for uri in ["/billing/nope1234", "/invoice/nope1234"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn analysis_ranks_products_sold() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "1.00", 10).await;
    let gadget = seed_item(&state, "Gadget", "1.00", 10).await;

    for (item, quantity) in [(&gadget, 3), (&widget, 5)] {
        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(json!({
                "payment_method": "Cash",
                "cart_items": [{"id": item.id, "name": item.name, "quantity": quantity, "subtotal": quantity}]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/analysis").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"labels": ["Widget", "Gadget"], "data": [5, 3]}));

    let req = test::TestRequest::get()
        .uri("/analysis?start=2000-01-01&end=2000-12-31")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"labels": [], "data": []}));

    let req = test::TestRequest::get().uri("/analysis?start=&end=").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([5, 3]));

    let req = test::TestRequest::get().uri("/analysis?start=tomorrow").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_json_gets_the_error_envelope() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;

    let req = test::TestRequest::post()
        .uri("/inventory/add")
        .set_json(json!({"desc": "no name", "price": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
}

#[actix_web::test]
async fn imports_the_legacy_documents_once() {
    let (state, dir) = test_state().await;
    let legacy = dir.path().join("legacy");
    fs::create_dir_all(&legacy).unwrap();

    fs::write(
        legacy.join(legacy_import::INVENTORY_DOCUMENT),
        r#"{"admin": {}, "items": [
            {"pid": "aaaa1111", "name": "Widget", "description": "blue", "price": 10.0, "quantity": 4},
            {"pid": "bbbb2222", "name": "widget", "description": "dup", "price": 1.0, "quantity": 1},
            {"pid": "cccc3333", "name": "Gadget", "description": "", "price": 2.5, "quantity": 0},
            {"pid": "eeee5555", "name": "Yacht", "description": "", "price": "1E+2000000", "quantity": 1}
        ]}"#,
    )
    .unwrap();
    fs::write(
        legacy.join(legacy_import::SOLD_PRODUCTS_DOCUMENT),
        r#"[
            {"pid": "aaaa1111", "product": "Widget", "quantity": 2, "timestamp": "2024-03-01T10:00:00.123456"},
            {"pid": "cccc3333", "product": "Gadget", "quantity": 1, "timestamp": "not a date"},
            {"pid": "cccc3333", "product": "Gadget", "quantity": -9223372036854775807, "timestamp": "2024-03-01T11:00:00"}
        ]"#,
    )
    .unwrap();
    fs::write(
        legacy.join(legacy_import::BILLING_HISTORY_DOCUMENT),
        r#"[{
            "invoice_id": "dddd4444", "date": "01-03-2024 10:00:00", "payment_method": "Cash",
            "items": [{"pid": "aaaa1111", "name": "Widget", "quantity": 2, "subtotal": 20.0}],
            "subtotal": 20.0, "gst": 3.6, "additional_tax": 0.4, "discount": 0, "total": 24.0
        }]"#,
    )
    .unwrap();

    let summary = legacy_import::import_legacy_documents(&state.db_writer, &legacy)
        .await
        .unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            items: 2,
            sold_records: 2,
            invoices: 1
        }
    );

    let items = inventory_repository::list_items(&state.db_pool).await.unwrap();
    assert_eq!(items[0].id, "aaaa1111");
    assert_eq!(items[0].price, money("10"));

    let again = legacy_import::import_legacy_documents(&state.db_writer, &legacy)
        .await
        .unwrap();
    assert_eq!(again, ImportSummary::default());

    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let req = test::TestRequest::get().uri("/analysis").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"labels": ["Widget"], "data": [2]}));

    let req = test::TestRequest::get().uri("/invoice/dddd4444").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn legacy_import_skips_invoices_with_unbounded_amounts() {
    let (state, dir) = test_state().await;
    let legacy = dir.path().join("legacy");
    fs::create_dir_all(&legacy).unwrap();

    fs::write(
        legacy.join(legacy_import::BILLING_HISTORY_DOCUMENT),
        r#"[
            {"invoice_id": "ffff6666", "items": [], "subtotal": "1E+2000000", "gst": 0, "additional_tax": 0, "discount": 0, "total": 0},
            {"invoice_id": "ffff7777", "items": [], "subtotal": 1.0, "gst": 0.18, "additional_tax": 0.02, "discount": 0, "total": 1.2}
        ]"#,
    )
    .unwrap();

    let summary = legacy_import::import_legacy_documents(&state.db_writer, &legacy)
        .await
        .unwrap();
    assert_eq!(summary.invoices, 1);

    let invoices = billing_repository::list_invoices(&state.db_pool).await.unwrap();
    assert_eq!(invoices[0].invoice_id, "ffff7777");
}

#[actix_web::test]
async fn unbounded_amounts_are_rejected_before_any_write() {
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "10.00", 5).await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({
            "payment_method": "Cash",
            "cart_items": [{"pid": widget.id, "name": "Widget", "quantity": 1, "subtotal": "1E+2000000"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().len() < 200);

    let req = test::TestRequest::post()
        .uri("/inventory/add")
        .set_json(json!({"name": "Yacht", "price": "1E+2000000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/inventory/update/{}", widget.id))
        .set_json(json!({"price": "0.000000000000000000001"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.price, money("10"));
    let count = database::count_rows(&state.db_pool, "invoices").await.unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn simultaneous_checkouts_all_succeed() {
    const TILLS: i64 = 20;
    let (state, _dir) = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_services)).await;
    let widget = seed_item(&state, "Widget", "1.00", 1000).await;

    let app = &app;
    let checkouts = (0..TILLS).map(|_| {
        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(json!({
                "payment_method": "Cash",
                "cart_items": [{"pid": widget.id, "name": "Widget", "quantity": 1, "subtotal": 1}]
            }))
            .to_request();
        test::call_service(app, req)
    });
    let responses = join_all(checkouts).await;

    let statuses: Vec<StatusCode> = responses.iter().map(|resp| resp.status()).collect();
    assert!(statuses.iter().all(|status| *status == StatusCode::OK), "{statuses:?}");

    let stored = inventory_repository::get_item(&state.db_pool, &widget.id).await.unwrap();
    assert_eq!(stored.quantity, 1000 - TILLS);
    let count = database::count_rows(&state.db_pool, "invoices").await.unwrap();
    assert_eq!(count, TILLS);
    let count = database::count_rows(&state.db_pool, "sold_products").await.unwrap();
    assert_eq!(count, TILLS);
}

#[actix_web::test]
async fn simultaneous_item_writes_all_succeed() {
    let (state, _dir) = test_state().await;
    let widget = seed_item(&state, "Widget", "1.00", 1).await;

    let adds = (0..10).map(|i| {
        inventory_repository::add_item(
            &state.db_writer,
            NewItem {
                name: format!("Item {i}"),
                description: String::new(),
                price: money("1"),
                quantity: i,
            },
        )
    });
    let updates = (0..10).map(|i| {
        inventory_repository::update_item(
            &state.db_writer,
            &widget.id,
            ItemUpdate {
                quantity: Some(i),
                ..Default::default()
            },
        )
    });
    let (added, updated) = futures::join!(join_all(adds), join_all(updates));

    assert!(added.iter().all(Result::is_ok));
    assert!(updated.iter().all(Result::is_ok));
    let items = inventory_repository::list_items(&state.db_pool).await.unwrap();
    assert_eq!(items.len(), 11);
}
