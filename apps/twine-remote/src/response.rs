//! JSON responses in the remote control's wire format
//!
//! Clients of the remote control expect `text/json;charset=utf-8` bodies
//! indented with a single space, so axum's `Json` cannot be used as is.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub const TEXT_JSON: &str = "text/json;charset=utf-8";

/// Serialize `T` as the response body
#[derive(Debug, Clone, Copy, Default)]
pub struct TextJson<T>(pub T);

impl<T> IntoResponse for TextJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let mut body = Vec::with_capacity(128);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b" "));

        match self.0.serialize(&mut serializer) {
            Ok(()) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_JSON))],
                body,
            )
                .into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                )],
                err.to_string(),
            )
                .into_response(),
        }
    }
}
