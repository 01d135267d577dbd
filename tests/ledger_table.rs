mod common;

use common::{context, MockBackend};
use coop_data::domain::ledger_entry::{self, LedgerEntry};
use coop_data::table::{on_column_drag_end, Body};
use coop_data::{DataTable, PageQuery};
use serde_json::json;

fn entry(reference: &str, debit: f64, credit: f64, status: &str) -> serde_json::Value {
    json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "referenceNumber": reference,
        "transactionDate": "2026-03-14",
        "debit": debit,
        "credit": credit,
        "status": status,
    })
}

fn table() -> DataTable<LedgerEntry> {
    DataTable::new(ledger_entry::columns(), |e: &LedgerEntry| e.id.to_string())
}

#[tokio::test]
async fn fetched_page_renders_with_totals_and_badges() {
    let backend = MockBackend::new();
    backend.seed(
        "ledger-entries",
        vec![
            entry("JV-001", 150.0, 0.0, "posted"),
            entry("JV-002", 0.0, 75.5, "draft"),
            entry("JV-<3>", 10.0, 0.0, "cancelled"),
        ],
    );
    let ctx = context(&backend);
    let entries = ledger_entry::resource(&ctx).unwrap();
    let page = entries.get_paginated(&PageQuery::new(0, 10)).await.unwrap();
    assert_eq!(page.data.len(), 3);

    let table = table();
    let markup = table.render(&page.data, &table.initial_state());
    assert_eq!(markup.row_count(), 3);
    assert_eq!(
        markup.column_ids(),
        vec!["referenceNumber", "transactionDate", "debit", "credit", "status"]
    );

    let Body::Rows(rows) = &markup.body else {
        panic!("expected rows");
    };
    let statuses: Vec<&str> = rows.iter().map(|r| r.cells[4].content.as_str()).collect();
    assert_eq!(statuses, vec!["Posted", "Draft", "Cancelled"]);

    let footer = markup.footer.as_ref().unwrap();
    assert_eq!(footer[2].content, "160.00");
    assert_eq!(footer[3].content, "75.50");

    let html = markup.to_html();
    assert!(html.contains("JV-&lt;3&gt;"));
    assert!(html.contains("class=\"pinned-left pin-boundary\""));
}

#[tokio::test]
async fn empty_page_renders_placeholder_row() {
    let backend = MockBackend::new();
    let ctx = context(&backend);
    let page = ledger_entry::resource(&ctx)
        .unwrap()
        .get_paginated(&PageQuery::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_page, 0);
    assert!(page.is_last());

    let table = table();
    let markup = table.render(&page.data, &table.initial_state());
    assert_eq!(markup.row_count(), 1);
    assert_eq!(
        markup.body,
        Body::Placeholder {
            colspan: 5,
            message: "No results.".into()
        }
    );
    assert!(markup.to_html().contains("colspan=\"5\""));
}

#[test]
fn dragging_does_not_move_pinned_column_out_of_its_group() {
    let table = table();
    let mut state = table.initial_state();
    assert!(on_column_drag_end(&mut state.column_order, "status", "referenceNumber"));
    assert_eq!(state.column_order[0], "status");

    let markup = table.render(&[], &state);
    assert_eq!(
        markup.column_ids(),
        vec!["referenceNumber", "status", "transactionDate", "debit", "credit"]
    );
    assert!(!markup.header[0].draggable);
    assert!(markup.header[1].draggable);
}
