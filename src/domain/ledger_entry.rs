//! General ledger entries with their draft/posted/cancelled status badge.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use crate::table::{ColumnDef, ColumnSize, PinSide};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("ledger-entries"), "ledger-entry");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Posted,
    Cancelled,
}

/// Visual tone of a status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTone {
    Neutral,
    Success,
    Destructive,
}

impl EntryStatus {
    pub fn badge(self) -> (&'static str, BadgeTone) {
        match self {
            EntryStatus::Draft => ("Draft", BadgeTone::Neutral),
            EntryStatus::Posted => ("Posted", BadgeTone::Success),
            EntryStatus::Cancelled => ("Cancelled", BadgeTone::Destructive),
        }
    }

    /// Only drafts may be edited or deleted.
    pub fn is_editable(self) -> bool {
        self == EntryStatus::Draft
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub reference_number: String,
    #[serde(default)]
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
    pub status: EntryStatus,
    #[serde(default)]
    pub account_tag_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryRequest {
    pub reference_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub debit: f64,
    pub credit: f64,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_tag_id: Option<Uuid>,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<LedgerEntry>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> FormSchema<LedgerEntryRequest> {
    FormSchema::<LedgerEntryRequest>::new()
        .field(
            "referenceNumber",
            |p| FieldValue::text(&p.reference_number),
            [Rule::Required, Rule::MaxLength(50)],
        )
        .field("debit", |p| FieldValue::Number(Some(p.debit)), [Rule::Minimum(0.0)])
        .field("credit", |p| FieldValue::Number(Some(p.credit)), [Rule::Minimum(0.0)])
        .field("description", |p| FieldValue::opt_text(&p.description), [Rule::MaxLength(500)])
}

pub fn columns() -> Vec<ColumnDef<LedgerEntry>> {
    vec![
        ColumnDef::new("referenceNumber", "Reference", |e: &LedgerEntry| e.reference_number.clone())
            .pinned(PinSide::Left),
        ColumnDef::new("transactionDate", "Date", |e: &LedgerEntry| {
            e.transaction_date.format("%Y-%m-%d").to_string()
        }),
        ColumnDef::new("debit", "Debit", |e: &LedgerEntry| format!("{:.2}", e.debit))
            .with_footer(|rows: &[LedgerEntry]| format!("{:.2}", rows.iter().map(|e| e.debit).sum::<f64>())),
        ColumnDef::new("credit", "Credit", |e: &LedgerEntry| format!("{:.2}", e.credit))
            .with_footer(|rows: &[LedgerEntry]| format!("{:.2}", rows.iter().map(|e| e.credit).sum::<f64>())),
        ColumnDef::new("status", "Status", |e: &LedgerEntry| e.status.badge().0.to_string())
            .with_size(ColumnSize {
                size: 110,
                min: 90,
                max: 160,
            }),
    ]
}
