//! Member profiles.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("members"), "member");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Verified,
    Suspended,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    pub branch_id: Uuid,
    pub status: MemberStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().filter(|m| !m.is_empty()) {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Kept as text so the form can hold a half-typed value; checked as a UUID.
    pub branch_id: String,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<Member>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> FormSchema<MemberRequest> {
    FormSchema::<MemberRequest>::new()
        .field("firstName", |p| FieldValue::text(&p.first_name), [Rule::Required, Rule::MaxLength(100)])
        .field("middleName", |p| FieldValue::opt_text(&p.middle_name), [Rule::MaxLength(100)])
        .field("lastName", |p| FieldValue::text(&p.last_name), [Rule::Required, Rule::MaxLength(100)])
        .field("email", |p| FieldValue::text(&p.email), [Rule::Required, Rule::Email])
        .field("branchId", |p| FieldValue::text(&p.branch_id), [Rule::Required, Rule::Uuid])
}
