//! Binary-safe, reversible string encoding for keys and values.
//!
//! Table stores restrict the characters allowed in partition and row keys
//! (for example `/`, `\`, `#` and `?`, plus control characters). Every key and
//! value is therefore written as URL-safe base64 over its UTF-8 bytes, whose
//! alphabet contains none of them.
//!
//! [`encode`] and [`decode`] are mutual inverses over the full Unicode string
//! domain: `decode(&encode(s)) == Ok(s)` for every `s`.

use std::string::FromUtf8Error;

use base64::{Engine as _, engine::general_purpose::URL_SAFE};

/// An error returned by [`decode`] when the input was not produced by
/// [`encode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input is not valid URL-safe base64.
    #[error("stored field is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not valid UTF-8.
    #[error("stored field does not decode to UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Encodes a string into its store-safe representation.
#[must_use]
pub fn encode(plain: &str) -> String { URL_SAFE.encode(plain.as_bytes()) }

/// Decodes a string previously produced by [`encode`].
///
/// # Errors
///
/// Returns [`DecodeError`] if `encoded` is not valid base64 or does not
/// decode to valid UTF-8, which means the stored field was written by
/// something other than this encoding.
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let bytes = URL_SAFE.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod test;
