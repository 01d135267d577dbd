//! Invitation codes members use to sign up under a branch.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use crate::service::{FieldValue, FormSchema, Resource, Rule};
use crate::state::DataContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DESCRIPTOR: ResourceDescriptor =
    ResourceDescriptor::new(crate::api_path!("invitation-codes"), "invitation-code");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCode {
    pub id: Uuid,
    pub code: String,
    pub expiration_date: DateTime<Utc>,
    pub max_use: u32,
    #[serde(default)]
    pub current_use: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl InvitationCode {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.current_use < self.max_use && now < self.expiration_date
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCodeRequest {
    pub code: String,
    pub expiration_date: DateTime<Utc>,
    pub max_use: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub fn resource(ctx: &DataContext) -> Result<Resource<InvitationCode>, ConfigError> {
    ctx.resource(DESCRIPTOR)
}

pub fn form_schema() -> Result<FormSchema<InvitationCodeRequest>, ConfigError> {
    Ok(FormSchema::<InvitationCodeRequest>::new()
        .field(
            "code",
            |p| FieldValue::text(&p.code),
            [Rule::Required, Rule::pattern("code", r"^[A-Z0-9-]{4,32}$")?],
        )
        .field(
            "maxUse",
            |p| FieldValue::Number(Some(p.max_use as f64)),
            [Rule::Minimum(1.0), Rule::Maximum(10_000.0)],
        )
        .field("description", |p| FieldValue::opt_text(&p.description), [Rule::MaxLength(255)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn usability_checks_count_and_expiry() {
        let now = Utc::now();
        let mut code = InvitationCode {
            id: Uuid::new_v4(),
            code: "COOP-2024".into(),
            expiration_date: now + Duration::days(1),
            max_use: 2,
            current_use: 1,
            description: None,
        };
        assert!(code.is_usable(now));
        code.current_use = 2;
        assert!(!code.is_usable(now));
        code.current_use = 0;
        assert!(!code.is_usable(now + Duration::days(2)));
    }

    #[test]
    fn max_use_must_be_positive() {
        let req = InvitationCodeRequest {
            code: "COOP-2024".into(),
            expiration_date: Utc::now(),
            max_use: 0,
            description: None,
        };
        let err = form_schema().unwrap().validate(&req).unwrap_err();
        assert_eq!(err.field_error("maxUse"), Some("maxUse must be at least 1"));
    }
}
