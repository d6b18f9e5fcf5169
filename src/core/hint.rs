//! Hint tokens - opaque, reversible encodings of phantom nodes
//!
//! A client that received a route can send these tokens back together with
//! the checksum so the search reuses the exact snapped locations instead of
//! snapping raw coordinates again.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use super::error::{NarrateError, Result};
use super::route::PhantomNode;

/// Encode a phantom node as a URL-safe token
pub fn encode_hint(phantom: &PhantomNode) -> Result<String> {
    let bytes = bincode::serialize(phantom)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode a token produced by [`encode_hint`]
pub fn decode_hint(token: &str) -> Result<PhantomNode> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| NarrateError::InvalidHint {
            token: token.to_string(),
            reason: e.to_string(),
        })?;
    bincode::deserialize(&bytes).map_err(|e| NarrateError::InvalidHint {
        token: token.to_string(),
        reason: e.to_string(),
    })
}
