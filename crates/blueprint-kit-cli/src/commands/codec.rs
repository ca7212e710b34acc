//! `decode` and `encode` handlers.

use anyhow::{Context, Result};

use blueprint_kit_lib::{decode_to_json, encode_from_json};

/// Plan string to pretty JSON.
pub fn handle_decode(plan_string: &str) -> Result<String> {
    decode_to_json(plan_string).context("failed to decode blueprint string")
}

/// Plan JSON to plan string.
pub fn handle_encode(json: &str) -> Result<String> {
    encode_from_json(json).context("failed to encode blueprint JSON")
}
