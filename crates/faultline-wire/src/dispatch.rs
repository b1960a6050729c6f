//! Format dispatch and the fail-soft boundary.
//!
//! Serialization picks a codec from an explicit format hint; the
//! deserializer detects the format from the document shape (a JSON-API
//! document has an `errors` array, an OAuth body does not). A codec
//! failure in either direction is swallowed here and replaced with a
//! minimal result. Error reporting must never itself crash the
//! reporting path.

use std::str::FromStr;

use faultline_core::{Fault, Kind};
use serde_json::{json, Value};

use crate::{jsonapi, oauth, CodecError};

// ─── Format ───────────────────────────────────────────────────────────────────

/// The wire format hint for serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    JsonApi,
    OAuth,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Format, String> {
        match s {
            "jsonapi" => Ok(Format::JsonApi),
            "oauth" => Ok(Format::OAuth),
            other => Err(format!("unknown format: {other:?} (expected jsonapi or oauth)")),
        }
    }
}

// ─── Serialize ────────────────────────────────────────────────────────────────

/// Serialize a fault with the given format. Never fails: an internal
/// codec failure degrades to a minimal document.
pub fn serialize(fault: &Fault, format: Format) -> Value {
    let result = match format {
        Format::JsonApi => jsonapi::serialize(fault),
        Format::OAuth => oauth::serialize(fault),
    };
    or_fallback_document(result)
}

pub(crate) fn or_fallback_document(result: Result<Value, CodecError>) -> Value {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "serialize failed; degrading to minimal document");
        fallback_document()
    })
}

fn fallback_document() -> Value {
    json!({"detail": "Something went wrong"})
}

// ─── Deserialize ──────────────────────────────────────────────────────────────

/// Deserialize an inbound error document without a format hint. Never
/// fails: malformed input degrades to a generic `internal` fault.
pub fn deserialize(document: &Value) -> Fault {
    let result = if document.get("errors").is_some() {
        tracing::debug!("inbound document has an errors array; using JSON-API codec");
        jsonapi::deserialize(document)
    } else {
        tracing::debug!("inbound document has no errors array; using OAuth codec");
        oauth::deserialize(document)
    };
    or_fallback_fault(result)
}

pub(crate) fn or_fallback_fault(result: Result<Fault, CodecError>) -> Fault {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "deserialize failed; degrading to a generic internal fault");
        Fault::of(Kind::Internal)
    })
}
