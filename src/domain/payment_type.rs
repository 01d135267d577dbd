//! Payment types (cash, bank transfer, online, check) offered at the teller.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use crate::table::{ColumnDef, ColumnSize, PinSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("payment-types"), "payment-type");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Cash,
    Bank,
    Online,
    Check,
}

impl PaymentKind {
    pub const ALL: &'static [&'static str] = &["cash", "bank", "online", "check"];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentKind::Cash => "cash",
            PaymentKind::Bank => "bank",
            PaymentKind::Online => "online",
            PaymentKind::Check => "check",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTypeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<PaymentType>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> FormSchema<PaymentTypeRequest> {
    FormSchema::<PaymentTypeRequest>::new()
        .field("name", |p| FieldValue::text(&p.name), [Rule::Required, Rule::MaxLength(255)])
        .field(
            "description",
            |p| FieldValue::opt_text(&p.description),
            [Rule::MaxLength(1000)],
        )
        .field(
            "type",
            |p| FieldValue::text(p.kind.as_str()),
            [Rule::Required, Rule::OneOf(PaymentKind::ALL)],
        )
}

pub fn columns() -> Vec<ColumnDef<PaymentType>> {
    vec![
        ColumnDef::new("select", "", |_: &PaymentType| String::new())
            .with_size(ColumnSize::fixed(40))
            .pinned(PinSide::Left)
            .without_drag(),
        ColumnDef::new("name", "Name", |p: &PaymentType| p.name.clone()),
        ColumnDef::new("type", "Type", |p: &PaymentType| p.kind.as_str().to_string()),
        ColumnDef::new("description", "Description", |p: &PaymentType| {
            p.description.clone().unwrap_or_default()
        })
        .with_size(ColumnSize {
            size: 300,
            min: 120,
            max: 600,
        }),
        ColumnDef::new("createdAt", "Created", |p: &PaymentType| {
            p.created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        }),
        ColumnDef::new("actions", "", |_: &PaymentType| String::new())
            .with_size(ColumnSize::fixed(60))
            .pinned(PinSide::Right)
            .without_drag(),
    ]
}
