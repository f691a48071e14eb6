use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error("invalid request body: {}", describe(.0))]
    Validation(Vec<FieldError>),
}

/// A single rejected field of the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: &'static str,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: &'static str, kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            msg: msg.into(),
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One entry of the `detail` list in an error body.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: Vec<ErrorDetail>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Json(JsonRejection::MissingJsonContentType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::Json(JsonRejection::BytesRejection(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn details(&self) -> Vec<ErrorDetail> {
        match self {
            ApiError::Json(rejection) => {
                let kind = match rejection {
                    JsonRejection::JsonSyntaxError(_) => "json_invalid",
                    JsonRejection::JsonDataError(_) => "value_error",
                    JsonRejection::MissingJsonContentType(_) => "content_type",
                    _ => "body_invalid",
                };
                vec![ErrorDetail {
                    loc: vec!["body".to_string()],
                    msg: rejection.body_text(),
                    kind: kind.to_string(),
                }]
            }
            ApiError::Validation(errors) => errors
                .iter()
                .map(|e| ErrorDetail {
                    loc: vec!["body".to_string(), e.field.to_string()],
                    msg: e.msg.clone(),
                    kind: e.kind.to_string(),
                })
                .collect(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, "rejecting request: {}", self);
        let body = ErrorBody {
            detail: self.details(),
        };
        (status, Json(body)).into_response()
    }
}
