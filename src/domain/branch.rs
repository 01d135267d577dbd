//! Cooperative branches.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("branches"), "branch");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub is_main_branch: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default)]
    pub is_main_branch: bool,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<Branch>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> Result<FormSchema<BranchRequest>, ConfigError> {
    Ok(FormSchema::<BranchRequest>::new()
        .field("name", |p| FieldValue::text(&p.name), [Rule::Required, Rule::MaxLength(255)])
        .field("email", |p| FieldValue::opt_text(&p.email), [Rule::Email])
        .field(
            "contactNumber",
            |p| FieldValue::opt_text(&p.contact_number),
            [Rule::pattern("contactNumber", r"^\+?[0-9 ()-]{7,20}$")?],
        )
        .field("address", |p| FieldValue::opt_text(&p.address), [Rule::MaxLength(500)]))
}
