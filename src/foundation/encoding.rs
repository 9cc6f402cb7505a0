use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{NinError, NinResult};

/// Encode raw bytes as standard padded base64, the transport encoding for every asset.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64 text back into bytes.
pub fn decode_base64(text: &str) -> NinResult<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| NinError::load(format!("invalid base64 payload: {e}")))
}

/// Quote `s` as a JavaScript string literal for the generated script modules.
///
/// JSON string syntax is valid JS. `</` is split so the literal survives inlining into a
/// `<script>` element.
pub fn js_string_literal(s: &str) -> String {
    serde_json::Value::from(s)
        .to_string()
        .replace("</", "<\\/")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/encoding.rs"]
mod tests;
