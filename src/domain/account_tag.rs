//! Account tags used to group ledger accounts in reports.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("account-tags"), "account-tag");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTag {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTagRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<AccountTag>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> Result<FormSchema<AccountTagRequest>, ConfigError> {
    Ok(FormSchema::<AccountTagRequest>::new()
        .field(
            "name",
            |p| FieldValue::text(&p.name),
            [Rule::Required, Rule::MinLength(2), Rule::MaxLength(100)],
        )
        .field("description", |p| FieldValue::opt_text(&p.description), [Rule::MaxLength(500)])
        .field(
            "color",
            |p| FieldValue::opt_text(&p.color),
            [Rule::pattern("color", r"^#[0-9a-fA-F]{6}$")?],
        ))
}
