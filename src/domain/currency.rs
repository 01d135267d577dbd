//! Currencies accepted by the cooperative.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("currencies"), "currency");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: Uuid,
    pub name: String,
    pub currency_code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRequest {
    pub name: String,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<Currency>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> Result<FormSchema<CurrencyRequest>, ConfigError> {
    Ok(FormSchema::<CurrencyRequest>::new()
        .field("name", |p| FieldValue::text(&p.name), [Rule::Required, Rule::MaxLength(100)])
        .field(
            "currencyCode",
            |p| FieldValue::text(&p.currency_code),
            [Rule::Required, Rule::pattern("currencyCode", r"^[A-Z]{3}$")?],
        )
        .field("symbol", |p| FieldValue::opt_text(&p.symbol), [Rule::MaxLength(5)]))
}
