//! The JSON-API error-document codec.
//!
//! Wire shape (<https://jsonapi.org/format/#errors>):
//!
//! ```json
//! {
//!   "errors": [{
//!     "id": "...", "status": 422, "code": "ValidationError",
//!     "title": "ValidationError", "detail": "The request failed validation.",
//!     "meta": { "context": "...", "help": "...", "errorDetails": ...,
//!               "level": "normal", "errorType": "ValidationError" },
//!     "source": { "pointer": "/data/attributes/<property>" }
//!   }]
//! }
//! ```

use faultline_core::Fault;
use serde_json::{json, Value};

use crate::fields;
use crate::CodecError;

/// Serialize a fault into a JSON-API error document.
pub fn serialize(fault: &Fault) -> Result<Value, CodecError> {
    let mut flat = fields::serialize_flat(fault);
    let entry = flat.as_object_mut().ok_or(CodecError::NotAnObject)?;

    let source = match &fault.property {
        Some(property) => json!({"pointer": format!("/data/attributes/{property}")}),
        None => json!({}),
    };
    entry.insert("source".into(), source);

    Ok(json!({"errors": [flat]}))
}

/// Deserialize a JSON-API error document back into a fault.
///
/// Reads `errors[0]`; a document without an `errors` array (or an empty
/// one) is treated as an empty error object, which yields the `internal`
/// kind with all defaults. `property` is recovered from `source.pointer`
/// as the segment at index 3 of the slash-split pointer, matching the
/// encoding above.
pub fn deserialize(document: &Value) -> Result<Fault, CodecError> {
    if !document.is_object() {
        return Err(CodecError::NotAnObject);
    }

    let flat = document
        .get("errors")
        .and_then(|errors| errors.get(0))
        .cloned()
        .unwrap_or_else(|| json!({}));

    let mut options = fields::flat_options(&flat)?;
    if let Some(pointer) = flat
        .get("source")
        .and_then(|s| s.get("pointer"))
        .and_then(Value::as_str)
    {
        options.property = pointer.split('/').nth(3).map(str::to_string);
    }

    Ok(fields::fault_from_flat(&flat, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::{Kind, Options, Severity};

    #[test]
    fn validation_fault_encodes_source_pointer() {
        let fault = Fault::build(
            "validation",
            Options::new().message("Name is required").property("name"),
        )
        .unwrap();
        let doc = serialize(&fault).unwrap();

        let entry = &doc["errors"][0];
        assert_eq!(entry["status"], 422);
        assert_eq!(entry["title"], "ValidationError");
        assert_eq!(entry["detail"], "Name is required");
        assert_eq!(entry["source"]["pointer"], "/data/attributes/name");
    }

    #[test]
    fn source_is_empty_object_without_property() {
        let fault = Fault::of(Kind::NotFound);
        let doc = serialize(&fault).unwrap();
        assert_eq!(doc["errors"][0]["source"], json!({}));
    }

    #[test]
    fn round_trip_preserves_identity_fields() {
        let original = Fault::build(
            "validation",
            Options::new()
                .message("Name is required")
                .property("name")
                .context("signup form"),
        )
        .unwrap();

        let doc = serialize(&original).unwrap();
        let back = deserialize(&doc).unwrap();

        assert_eq!(back.kind, Kind::Validation);
        assert_eq!(back.status_code, original.status_code);
        assert_eq!(back.message, original.message);
        assert_eq!(back.code_or_category(), original.code_or_category());
        assert_eq!(back.property.as_deref(), Some("name"));
        assert_eq!(back.context, original.context);
        assert_eq!(back.id, original.id);
    }

    #[test]
    fn round_trip_every_kind() {
        for kind in Kind::ALL {
            let original = Fault::of(kind);
            let doc = serialize(&original).unwrap();
            let back = deserialize(&doc).unwrap();
            assert_eq!(back.kind, kind, "{}", kind.name());
            assert_eq!(back.status_code, original.status_code);
            assert_eq!(back.message, original.message);
            assert_eq!(back.severity, original.severity);
        }
    }

    #[test]
    fn unknown_title_falls_back_to_internal_with_category() {
        let doc = json!({
            "errors": [{
                "title": "WeirdRemoteError",
                "detail": "something odd",
                "status": 500,
            }]
        });
        let fault = deserialize(&doc).unwrap();
        assert_eq!(fault.kind, Kind::Internal);
        assert_eq!(fault.category, "WeirdRemoteError");
        assert_eq!(fault.message, "something odd");
    }

    #[test]
    fn empty_document_yields_internal_defaults() {
        let fault = deserialize(&json!({})).unwrap();
        assert_eq!(fault.kind, Kind::Internal);
        assert_eq!(fault.status_code, 500);
        assert_eq!(fault.severity, Severity::Critical);
        assert_eq!(fault.message, "The server has encountered an error.");

        let fault = deserialize(&json!({"errors": []})).unwrap();
        assert_eq!(fault.kind, Kind::Internal);
    }

    #[test]
    fn non_object_document_is_an_explicit_trigger() {
        assert!(matches!(
            deserialize(&json!("garbage")),
            Err(CodecError::NotAnObject)
        ));
        assert!(matches!(
            deserialize(&json!([1, 2, 3])),
            Err(CodecError::NotAnObject)
        ));
    }

    #[test]
    fn pointer_segment_recovery() {
        let doc = json!({
            "errors": [{
                "title": "ValidationError",
                "source": {"pointer": "/data/attributes/email"},
            }]
        });
        let fault = deserialize(&doc).unwrap();
        assert_eq!(fault.property.as_deref(), Some("email"));

        // Short pointers simply yield no property.
        let doc = json!({
            "errors": [{"title": "ValidationError", "source": {"pointer": "/data"}}]
        });
        let fault = deserialize(&doc).unwrap();
        assert_eq!(fault.property, None);
    }
}
