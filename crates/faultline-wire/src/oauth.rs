//! The OAuth2-style error-body codec.
//!
//! RFC 6749 (§5.2) defines `error` / `error_description`; to avoid losing
//! data between internal services the body also carries the flat error
//! object's remaining fields (`id`, `status`, `title`, `meta`).
//!
//! The `error` code comes from a fixed category mapping unless the fault
//! carries an explicit `code`, which always wins, even an arbitrary
//! application string. That precedence is part of the compatibility
//! contract.

use faultline_core::Fault;
use serde_json::{json, Value};

use crate::fields;
use crate::CodecError;

/// Map a category label to its OAuth error code. Anything outside the
/// fixed table is a `server_error`.
pub fn category_oauth_code(category: &str) -> &'static str {
    match category {
        "NoPermission" => "access_denied",
        "MaintenanceError" => "temporarily_unavailable",
        "BadRequestError" | "ValidationError" => "invalid_request",
        _ => "server_error",
    }
}

/// Serialize a fault into an OAuth-style error body.
pub fn serialize(fault: &Fault) -> Result<Value, CodecError> {
    let mut flat = fields::serialize_flat(fault);
    let body = flat.as_object_mut().ok_or(CodecError::NotAnObject)?;

    // `detail` and `code` are re-expressed as the OAuth pair.
    body.remove("detail");
    body.remove("code");

    let error_code = match &fault.code {
        Some(code) => code.clone(),
        None => category_oauth_code(&fault.category).to_string(),
    };
    body.insert("error".into(), json!(error_code));
    body.insert("error_description".into(), json!(fault.message));

    Ok(flat)
}

/// Deserialize an OAuth-style error body back into a fault.
///
/// Mirrors the JSON-API deserializer but reads `title`/`name` for the
/// kind and `error`/`error_description` for code and message; the same
/// unknown-kind fallback applies.
pub fn deserialize(body: &Value) -> Result<Fault, CodecError> {
    if !body.is_object() {
        return Err(CodecError::NotAnObject);
    }
    let options = fields::flat_options(body)?;
    Ok(fields::fault_from_flat(body, options))
}
