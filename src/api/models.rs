use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ApiError, FieldError};

pub const RESULT_TITLE: &str = "UtilityGuy Ai Chatbot Response";
pub const RESULT_URL: &str = "https://example.com/1";

pub const DEFAULT_NUM_RESULTS: i64 = 5;
/// `num_results` must be strictly greater than this.
pub const NUM_RESULTS_EXCLUSIVE_MIN: i64 = 1;
pub const NUM_RESULTS_MAX: i64 = 20;

fn default_num_results() -> i64 {
    DEFAULT_NUM_RESULTS
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// `None` when the field is absent; reported as a missing field by
    /// [`SearchRequest::validate`].
    #[serde(default)]
    pub query: Option<String>,
    /// Validated but otherwise unused: a search always yields one result.
    #[serde(
        default = "default_num_results",
        deserialize_with = "deserialize_lax_int"
    )]
    pub num_results: i64,
}

impl SearchRequest {
    /// Checks every field and returns the query on success.
    ///
    /// All failing fields are reported together, in declaration order.
    pub fn validate(&self) -> Result<&str, ApiError> {
        let mut errors = Vec::new();

        if self.query.is_none() {
            errors.push(FieldError::new("query", "missing", "Field required"));
        }

        if self.num_results <= NUM_RESULTS_EXCLUSIVE_MIN {
            errors.push(FieldError::new(
                "num_results",
                "greater_than",
                format!("Input should be greater than {NUM_RESULTS_EXCLUSIVE_MIN}"),
            ));
        } else if self.num_results > NUM_RESULTS_MAX {
            errors.push(FieldError::new(
                "num_results",
                "less_than_equal",
                format!("Input should be less than or equal to {NUM_RESULTS_MAX}"),
            ));
        }

        match &self.query {
            Some(query) if errors.is_empty() => Ok(query.as_str()),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// Accepts an integer, a float with no fractional part, a numeric string or
/// a bool. Out-of-range numbers saturate so the range check still rejects
/// them with the usual bound error.
fn deserialize_lax_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LaxIntVisitor;

    impl<'de> Visitor<'de> for LaxIntVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a valid integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if !v.is_finite() || v.fract() != 0.0 {
                return Err(E::invalid_value(de::Unexpected::Float(v), &self));
            }
            // `as` saturates at the i64 bounds.
            Ok(v as i64)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<i64, E> {
            Ok(i64::from(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            let trimmed = v.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => self.visit_f64(f),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(LaxIntVisitor)
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn chatbot(snippet: impl Into<String>) -> Self {
        Self {
            title: RESULT_TITLE.to_string(),
            url: RESULT_URL.to_string(),
            snippet: snippet.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
