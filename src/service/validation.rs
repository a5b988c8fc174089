//! Request validation from declarative per-field rules.

use crate::error::AppError;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    pub required: Option<bool>,
    pub kind: Option<FieldKind>,
    pub format: Option<String>,
    pub max_length: Option<u32>,
    /// Measured after trimming, so whitespace-only strings fail `min_length: 1`.
    pub min_length: Option<u32>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Other body keys accepted in place of this field.
    pub aliases: Vec<&'static str>,
}

/// Rules for the create and update bodies.
pub fn cake_rules() -> Vec<(&'static str, ValidationRule)> {
    vec![
        (
            "title",
            ValidationRule {
                required: Some(true),
                kind: Some(FieldKind::String),
                min_length: Some(1),
                max_length: Some(255),
                ..Default::default()
            },
        ),
        (
            "description",
            ValidationRule {
                kind: Some(FieldKind::String),
                max_length: Some(1000),
                ..Default::default()
            },
        ),
        (
            "rating",
            ValidationRule {
                required: Some(true),
                kind: Some(FieldKind::Number),
                minimum: Some(0.0),
                maximum: Some(5.0),
                ..Default::default()
            },
        ),
        (
            "image",
            ValidationRule {
                required: Some(true),
                kind: Some(FieldKind::String),
                format: Some("url".into()),
                aliases: vec!["image_url"],
                ..Default::default()
            },
        ),
    ]
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against per-field rules. Every violation is reported, joined by ", ".
    pub fn validate(
        body: &Map<String, Value>,
        rules: &[(&str, ValidationRule)],
    ) -> Result<(), AppError> {
        let mut problems = Vec::new();
        for (field, rule) in rules {
            let present = |key: &str| body.get(key).filter(|v| !v.is_null());
            let val = present(*field)
                .or_else(|| rule.aliases.iter().find_map(|alias| present(*alias)));
            match val {
                None if rule.required == Some(true) => problems.push(format!("{} is required", field)),
                None => {}
                Some(v) => {
                    if let Err(msg) = validate_field(field, v, rule) {
                        problems.push(msg);
                    }
                }
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join(", ")))
        }
    }

    /// Fold alias keys into their canonical field and drop them. A non-null canonical value wins.
    pub fn apply_aliases(body: &mut Map<String, Value>, rules: &[(&str, ValidationRule)]) {
        for (field, rule) in rules {
            let mut aliased = None;
            for alias in &rule.aliases {
                if let Some(v) = body.remove(*alias) {
                    if aliased.is_none() && !v.is_null() {
                        aliased = Some(v);
                    }
                }
            }
            let canonical_set = body.get(*field).is_some_and(|v| !v.is_null());
            if let (false, Some(v)) = (canonical_set, aliased) {
                body.insert(field.to_string(), v);
            }
        }
    }
}

fn validate_field(field: &str, v: &Value, rule: &ValidationRule) -> Result<(), String> {
    match rule.kind {
        Some(FieldKind::String) if !v.is_string() => {
            return Err(format!("{} must be a string", field));
        }
        Some(FieldKind::Number) if !v.is_number() => {
            return Err(format!("{} must be a number", field));
        }
        _ => {}
    }
    if let Some(format) = &rule.format {
        validate_format(field, v, format)?;
    }
    if let Some(s) = v.as_str() {
        if let Some(max) = rule.max_length {
            if s.chars().count() > max as usize {
                return Err(format!("{} must be at most {} characters", field, max));
            }
        }
        if let Some(min) = rule.min_length {
            if s.trim().chars().count() < min as usize {
                return Err(format!("{} must be at least {} characters", field, min));
            }
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(format!("{} must be at least {}", field, min));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(format!("{} must be at most {}", field, max));
            }
        }
    }
    Ok(())
}

fn validate_format(field: &str, v: &Value, format: &str) -> Result<(), String> {
    if format.eq_ignore_ascii_case("url") {
        if let Some(s) = v.as_str() {
            let ok = url::Url::parse(s)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
                .unwrap_or(false);
            if !ok {
                return Err(format!("{} must be a valid http(s) URL", field));
            }
        }
    }
    Ok(())
}
