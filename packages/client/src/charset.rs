//! Charset label resolution and text conversion.
//!
//! Labels are resolved through `encoding_rs`, so the usual aliases
//! (`UTF-8`, `utf8`, `ISO-8859-1`, `gbk`, ...) all work.

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Resolves a charset label to an encoding, or fails with [`Error::Charset`].
pub(crate) fn for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| Error::Charset(label.to_string()))
}

/// Encodes `text` into bytes of `encoding`.
///
/// Characters the encoding cannot represent are an error rather than being
/// silently substituted.
pub(crate) fn encode(encoding: &'static Encoding, text: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(Error::Encode {
            charset: encoding.name().to_string(),
        });
    }
    Ok(bytes.into_owned())
}

/// Decodes response bytes as text, replacing malformed sequences.
pub(crate) fn decode(encoding: &'static Encoding, bytes: &[u8]) -> String {
    encoding.decode(bytes).0.into_owned()
}
