//! Plan string encoding/decoding.
//!
//! A plan string is a single version character followed by the standard
//! base64 encoding of the zlib-deflated plan JSON. The rest of the crate only
//! ever goes through [`encode_plan`] and [`decode_plan`].

use std::io::{Read, Write};

use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::{Error, Result};
use crate::plan::Plan;

/// Version character prefixed to every plan string.
pub const PLAN_STRING_VERSION: char = '0';

/// Encode a plan tree to a plan string.
pub fn encode_plan(plan: &Plan) -> Result<String> {
    let json = serde_json::to_vec(plan).map_err(|source| Error::PlanJson { source })?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|source| Error::PlanCompression { source })?;
    let compressed = encoder
        .finish()
        .map_err(|source| Error::PlanCompression { source })?;

    let mut encoded = String::with_capacity(1 + compressed.len() * 4 / 3 + 4);
    encoded.push(PLAN_STRING_VERSION);
    base64::engine::general_purpose::STANDARD.encode_string(&compressed, &mut encoded);

    debug!(
        kind = plan.kind(),
        json_bytes = json.len(),
        encoded_len = encoded.len(),
        "encoded plan"
    );
    Ok(encoded)
}

/// Decode a plan string into a plan tree.
pub fn decode_plan(plan_string: &str) -> Result<Plan> {
    let trimmed = plan_string.trim();
    let mut chars = trimmed.chars();
    let version = chars.next().ok_or(Error::EmptyPlanString)?;
    if version != PLAN_STRING_VERSION {
        return Err(Error::UnsupportedPlanVersion { version });
    }

    let compressed = base64::engine::general_purpose::STANDARD
        .decode(chars.as_str())
        .map_err(|source| Error::PlanBase64 { source })?;

    let mut json = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut json)
        .map_err(|source| Error::PlanCompression { source })?;

    let plan: Plan = serde_json::from_slice(&json).map_err(|source| Error::PlanJson { source })?;
    debug!(kind = plan.kind(), json_bytes = json.len(), "decoded plan");
    Ok(plan)
}

/// Decode a plan string and pretty-print its JSON (4-space indent).
pub fn decode_to_json(plan_string: &str) -> Result<String> {
    let plan = decode_plan(plan_string)?;
    to_pretty_json(&plan)
}

/// Parse plan JSON text and encode it to a plan string.
pub fn encode_from_json(json: &str) -> Result<String> {
    let plan: Plan = serde_json::from_str(json).map_err(|source| Error::PlanJson { source })?;
    encode_plan(&plan)
}

fn to_pretty_json(plan: &Plan) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(plan, &mut serializer)
        .map_err(|source| Error::PlanJson { source })?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
