//! URL and query-string resolution.
//!
//! For GET requests the form parameters are merged into the URL query; for
//! everything else the path is taken as configured. Values are
//! percent-encoded as bytes of the configured charset, keys are written
//! verbatim, and an empty parameter set still leaves the dangling `?`/`&`
//! separator on the URL (downstream consumers depend on the exact shape).

use encoding_rs::Encoding;
use url::Url;

use crate::charset;
use crate::error::{Error, Result};

/// Serializes form parameters in insertion order as `key=encodedValue`
/// pairs joined with `&`. Only values are percent-encoded.
pub(crate) fn form_encode(
    params: &[(String, String)],
    encoding: &'static Encoding,
) -> Result<String> {
    let mut out = String::new();
    for (key, value) in params {
        let bytes = charset::encode(encoding, value)?;
        out.push_str(key);
        out.push('=');
        out.push_str(&urlencoding::encode_binary(&bytes));
        out.push('&');
    }
    if out.ends_with('&') {
        out.pop();
    }
    Ok(out)
}

/// Computes the final URL for the request.
///
/// Fails with [`Error::MalformedUrl`] before any network I/O when the path
/// does not start with `http` or does not parse as an `http`/`https` URL.
pub(crate) fn resolve(
    path: &str,
    is_get: bool,
    params: &[(String, String)],
    encoding: &'static Encoding,
) -> Result<Url> {
    let mut resolved = path.to_string();
    if is_get {
        // A `?` at index zero counts as absent, matching the original
        // separator choice.
        let separator = match path.find('?') {
            Some(i) if i > 0 => '&',
            _ => '?',
        };
        resolved.push(separator);
        resolved.push_str(&form_encode(params, encoding)?);
    }

    if !resolved.starts_with("http") {
        return Err(Error::MalformedUrl(resolved));
    }
    let url = Url::parse(&resolved).map_err(|_| Error::MalformedUrl(resolved.clone()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::MalformedUrl(resolved));
    }
    Ok(url)
}

/// The origin-form request target written on the request line: path plus
/// query, dangling separator included.
pub(crate) fn request_target(url: &Url) -> String {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    target
}
