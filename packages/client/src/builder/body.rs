//! Content-type driven body resolution.
//!
//! Non-GET requests only. A `Content-Type` containing the URL-encoded form
//! marker selects the serialized form parameters; otherwise the raw content
//! string is used verbatim; otherwise there is no body. Exactly one of the
//! two sources is ever used. Blank bodies are not written.

use encoding_rs::Encoding;

use crate::error::Result;

use super::core::RequestBuilder;
use super::{query, CONTENT_TYPE_ENCODE};

/// Resolves the body bytes for a non-GET request, already encoded in the
/// configured charset. `None` means nothing is written.
pub(crate) fn resolve(
    builder: &RequestBuilder,
    encoding: &'static Encoding,
) -> Result<Option<Vec<u8>>> {
    let body = match builder.content_type() {
        Some(ct) if ct.to_ascii_lowercase().contains(CONTENT_TYPE_ENCODE) => {
            Some(query::form_encode(&builder.form_params, encoding)?)
        }
        _ => builder.content.clone(),
    };

    match body {
        Some(text) if !text.trim().is_empty() => {
            Ok(Some(crate::charset::encode(encoding, &text)?))
        }
        _ => Ok(None),
    }
}
