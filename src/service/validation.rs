//! Typed form schemas: a field table built once, mapping each form field to an
//! accessor on the payload struct and the rules it must satisfy.

use crate::error::{ApiError, ConfigError};
use regex::Regex;
use std::collections::BTreeMap;

/// A payload field as the validator sees it. `None` means "not filled in".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
    Bool(Option<bool>),
}

impl<'a> FieldValue<'a> {
    pub fn text(s: &'a str) -> Self {
        FieldValue::Text(Some(s))
    }

    pub fn opt_text(s: &'a Option<String>) -> Self {
        FieldValue::Text(s.as_deref())
    }

    fn is_missing(&self) -> bool {
        match self {
            FieldValue::Text(t) => t.map(|s| s.trim().is_empty()).unwrap_or(true),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Bool(b) => b.is_none(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    OneOf(&'static [&'static str]),
    Minimum(f64),
    Maximum(f64),
    Email,
    Uuid,
}

impl Rule {
    pub fn pattern(field: &'static str, pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(Rule::Pattern)
            .map_err(|source| ConfigError::InvalidPattern { field, source })
    }

    /// Message for a failing value, or `None` when the rule holds.
    fn check(&self, field: &str, value: &FieldValue<'_>) -> Option<String> {
        if let Rule::Required = self {
            return value
                .is_missing()
                .then(|| format!("{} is required", field));
        }
        match (self, value) {
            (Rule::MinLength(min), FieldValue::Text(Some(s))) if s.chars().count() < *min => {
                Some(format!("{} must be at least {} characters", field, min))
            }
            (Rule::MaxLength(max), FieldValue::Text(Some(s))) if s.chars().count() > *max => {
                Some(format!("{} must be at most {} characters", field, max))
            }
            (Rule::Pattern(re), FieldValue::Text(Some(s))) if !s.is_empty() && !re.is_match(s) => {
                Some(format!("{} does not match required pattern", field))
            }
            (Rule::OneOf(allowed), FieldValue::Text(Some(s))) if !allowed.iter().any(|a| a == s) => Some(
                format!("{} must be one of: {}", field, allowed.join(", ")),
            ),
            (Rule::Minimum(min), FieldValue::Number(Some(n))) if n < min => {
                Some(format!("{} must be at least {}", field, min))
            }
            (Rule::Maximum(max), FieldValue::Number(Some(n))) if n > max => {
                Some(format!("{} must be at most {}", field, max))
            }
            (Rule::Email, FieldValue::Text(Some(s)))
                if !s.is_empty() && (!s.contains('@') || s.len() < 3) =>
            {
                Some(format!("{} must be a valid email", field))
            }
            (Rule::Uuid, FieldValue::Text(Some(s)))
                if !s.is_empty() && uuid::Uuid::parse_str(s).is_err() =>
            {
                Some(format!("{} must be a valid UUID", field))
            }
            _ => None,
        }
    }
}

pub struct FieldDescriptor<P> {
    pub name: &'static str,
    accessor: fn(&P) -> FieldValue<'_>,
    rules: Vec<Rule>,
}

impl<P> FieldDescriptor<P> {
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }
}

pub struct FormSchema<P> {
    fields: Vec<FieldDescriptor<P>>,
}

impl<P> Default for FormSchema<P> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<P> FormSchema<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        name: &'static str,
        accessor: fn(&P) -> FieldValue<'_>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            accessor,
            rules: rules.into_iter().collect(),
        });
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor<P>] {
        &self.fields
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor<P>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field name -> first failing rule's message, for every invalid field.
    pub fn errors(&self, payload: &P) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for field in &self.fields {
            let value = (field.accessor)(payload);
            if let Some(msg) = field.rules.iter().find_map(|r| r.check(field.name, &value)) {
                out.insert(field.name.to_string(), msg);
            }
        }
        out
    }

    pub fn validate(&self, payload: &P) -> Result<(), ApiError> {
        let errors = self.errors(payload);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct Signup {
        email: String,
        code: Option<String>,
        age: Option<f64>,
        kind: String,
    }

    fn schema() -> FormSchema<Signup> {
        FormSchema::<Signup>::new()
            .field("email", |s| FieldValue::text(&s.email), [Rule::Required, Rule::Email])
            .field(
                "code",
                |s| FieldValue::opt_text(&s.code),
                [Rule::pattern("code", r"^[A-Z0-9]{6}$").unwrap()],
            )
            .field("age", |s| FieldValue::Number(s.age), [Rule::Minimum(18.0)])
            .field("kind", |s| FieldValue::text(&s.kind), [Rule::OneOf(&["member", "staff"])])
    }

    #[test]
    fn collects_one_message_per_failing_field() {
        let bad = Signup {
            email: " ".into(),
            code: Some("abc".into()),
            age: Some(12.0),
            kind: "guest".into(),
        };
        let err = schema().validate(&bad).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field_error("email"), Some("email is required"));
        assert_eq!(err.field_error("code"), Some("code does not match required pattern"));
        assert_eq!(err.field_error("age"), Some("age must be at least 18"));
        assert_eq!(err.field_error("kind"), Some("kind must be one of: member, staff"));
    }

    #[test]
    fn optional_fields_skip_rules_when_empty() {
        let ok = Signup {
            email: "a@b.coop".into(),
            code: None,
            age: None,
            kind: "member".into(),
        };
        assert!(schema().validate(&ok).is_ok());
        assert!(schema().descriptor("email").unwrap().is_required());
        assert!(!schema().descriptor("code").unwrap().is_required());
    }

    #[test]
    fn bad_pattern_is_config_error() {
        assert!(matches!(
            Rule::pattern("x", "(unclosed"),
            Err(ConfigError::InvalidPattern { field: "x", .. })
        ));
    }
}
