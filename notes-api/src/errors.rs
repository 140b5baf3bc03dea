use std::{
    borrow::Cow,
    sync::{Arc, OnceLock},
};

use axum::{
    extract::{rejection::PathRejection, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::{json_schema, schema_for, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::Level;

use crate::{config::ConfigError, ctx, store};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),

    // validation
    #[error("validation")]
    JsonValidation(JsonSchemaRejection),
    #[error("validation")]
    PathValidation(#[from] PathRejection),

    #[error(transparent)]
    Store(store::Error),

    // startup
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unexpected")]
    Unexpected(String),
}

impl From<JsonSchemaRejection> for Error {
    fn from(rejection: JsonSchemaRejection) -> Self {
        Self::JsonValidation(rejection)
    }
}

impl From<store::Error> for Error {
    fn from(error: store::Error) -> Self {
        match error {
            store::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::Store(error),
        }
    }
}

/// Declares every error code once and exposes them through `errors()`.
/// ```rust
/// error_responses! {
///     not_found: 404,
///     unexpected: 500
/// }
/// ```
macro_rules! error_responses {
    (
        $($name:ident: $code:expr),* $(,)?
    ) => {
        #[derive(Debug, Clone)]
        struct Responses {
            $(
                $name: ErrorResponse,
            )*
        }

        impl Responses {
            fn all(&self) -> Vec<&ErrorResponse> {
                vec![$(&self.$name,)*]
            }
        }

        static ERRORS: OnceLock<Responses> = OnceLock::new();

        fn errors() -> &'static Responses {
            ERRORS.get_or_init(|| Responses {
                $(
                    $name: ErrorResponse::new(stringify!($name), $code),
                )*
            })
        }
    };
}

error_responses! {
    not_found: 404,
    path_validation: 422,
    json_validation: 422,
    unexpected: 500
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let errors = errors();
        match error {
            Error::NotFound(message) => errors.not_found.with_message(message),
            Error::JsonValidation(JsonSchemaRejection::Json(error)) => {
                errors.json_validation.with_message(error.body_text())
            }
            Error::JsonValidation(JsonSchemaRejection::Serde(error)) => {
                errors.json_validation.with_message(error.to_string())
            }
            Error::JsonValidation(JsonSchemaRejection::Schema(schema_errors)) => errors
                .json_validation
                .with_message("Request schema validation error")
                .with_details(json!({ "errors": schema_errors })),
            Error::PathValidation(error) => errors.path_validation.with_message(error.body_text()),
            Error::Unexpected(message) => errors.unexpected.with_message(message),
            _ => errors.unexpected.with_message("Unexpected"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let error = Arc::new(self);

        let error_res = ErrorResponse::from(error.as_ref());
        let status = error_res.status;

        let mut res = axum::Json(error_res).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let error = response.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(error) = error {
        let request_id = ctx::request_id().unwrap_or_default();
        if log_level(response.status()) == Level::ERROR {
            tracing::error!(request_id = %request_id, "{:?}", error);
        } else {
            tracing::warn!(request_id = %request_id, "{:?}", error);
        }
    }

    response
}

/// Server faults are errors, rejected requests are warnings.
fn log_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: Option<String>,
    pub status: u16,
    pub details: Option<Map<String, Value>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, status: u16) -> Self {
        Self {
            error: error.into(),
            status,
            ..Default::default()
        }
    }

    pub fn with_message(&self, message: impl Into<String>) -> Self {
        let mut res = self.clone();
        res.message = Some(message.into());
        res
    }

    pub fn with_details(mut self, details: Value) -> Self {
        if let Value::Object(details) = details {
            self.details = Some(details);
        }
        self
    }
}

/// `oneOf` over every declared error, each with its `error` and `status` pinned.
pub struct ErrorResponseDocs;

impl JsonSchema for ErrorResponseDocs {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("ErrorResponse")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        let error_schemas = errors().all().into_iter().map(pinned_schema).collect::<Vec<_>>();

        json_schema!({ "oneOf": error_schemas })
    }
}

fn pinned_schema(error: &ErrorResponse) -> Schema {
    let mut schema = schema_for!(ErrorResponse);

    if let Some(properties) = schema.as_object_mut().and_then(|schema| schema.get_mut("properties")).and_then(Value::as_object_mut) {
        properties.insert("error".into(), json!({ "type": "string", "enum": [error.error] }));
        properties.insert("status".into(), json!({ "type": "integer", "enum": [error.status] }));
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_404() {
        let error = Error::from(store::Error::NotFound("Note not found".into()));
        let res = ErrorResponse::from(&error);

        assert_eq!(res.status, 404);
        assert_eq!(res.error, "not_found");
        assert_eq!(res.message.as_deref(), Some("Note not found"));
    }

    #[test]
    fn poisoned_store_is_unexpected() {
        let error = Error::from(store::Error::Poisoned);
        let res = ErrorResponse::from(&error);

        assert_eq!(res.status, 500);
        assert_eq!(res.error, "unexpected");
    }

    #[test]
    fn docs_list_every_error() {
        let schema = schema_for!(ErrorResponseDocs);
        let one_of = schema
            .get("oneOf")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        assert_eq!(one_of.len(), 4);
        assert_eq!(one_of[0]["properties"]["status"]["enum"], json!([404]));
    }

    #[test]
    fn rejected_requests_log_as_warnings() {
        assert_eq!(log_level(StatusCode::NOT_FOUND), Level::WARN);
        assert_eq!(log_level(StatusCode::UNPROCESSABLE_ENTITY), Level::WARN);
        assert_eq!(log_level(StatusCode::INTERNAL_SERVER_ERROR), Level::ERROR);
    }
}
