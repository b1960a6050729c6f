//! Flat field mapping shared by both codecs.
//!
//! Both wire formats carry the same flat error object (`id`, `status`,
//! `code`, `title`, `detail`, `meta`); JSON-API wraps it in an `errors`
//! array and adds `source`, OAuth renames `detail`/`code` to
//! `error_description`/`error`. The field names and nesting here are part
//! of the cross-service compatibility contract; do not change them
//! independently on either side of a boundary.

use faultline_core::{registry, Fault, Kind, Options, Severity};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::CodecError;

/// Serialize a fault into the flat error object. Absent optional fields
/// are omitted rather than emitted as `null`.
pub(crate) fn serialize_flat(fault: &Fault) -> Value {
    let mut meta = Map::new();
    if let Some(context) = &fault.context {
        meta.insert("context".into(), json!(context));
    }
    if let Some(help) = &fault.help {
        meta.insert("help".into(), json!(help));
    }
    if let Some(details) = &fault.error_details {
        meta.insert("errorDetails".into(), details.clone());
    }
    meta.insert("level".into(), json!(fault.severity.as_str()));
    meta.insert("errorType".into(), json!(fault.category));

    json!({
        "id": fault.id.to_string(),
        "status": fault.status_code,
        "code": fault.code_or_category(),
        "title": fault.kind.title(),
        "detail": fault.message,
        "meta": meta,
    })
}

/// Extract construction options from a flat error object.
///
/// Reads the union of both formats' field vocabulary: `detail` falls back
/// to `error_description` then `message`; `code` falls back to `error`.
/// A bare string is a construction misuse and fails; other non-object
/// junk degrades to empty options (defaults take over).
///
/// Ids are UUIDs here, so an inbound `id` from a foreign producer that is
/// not a parseable UUID is dropped and the fault gets a fresh one. Ids
/// minted by this taxonomy always survive the trip.
pub(crate) fn flat_options(flat: &Value) -> Result<Options, CodecError> {
    if flat.is_string() {
        return Err(faultline_core::ConstructionError::StringOptions.into());
    }
    let Some(obj) = flat.as_object() else {
        return Ok(Options::default());
    };

    let str_of = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);
    let meta = obj.get("meta").and_then(Value::as_object);
    let meta_str = |key: &str| str_of(meta.and_then(|m| m.get(key)));

    Ok(Options {
        id: obj
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok()),
        message: str_of(obj.get("detail"))
            .or_else(|| str_of(obj.get("error_description")))
            .or_else(|| str_of(obj.get("message"))),
        status_code: obj
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|n| u16::try_from(n).ok()),
        code: str_of(obj.get("code")).or_else(|| str_of(obj.get("error"))),
        severity: meta
            .and_then(|m| m.get("level"))
            .and_then(Value::as_str)
            .and_then(Severity::parse),
        help: meta_str("help"),
        context: meta_str("context"),
        ..Options::default()
    })
}

/// Resolve the inbound `title` (or `name`) to a registry kind.
///
/// Unknown titles fall back to the `internal` kind with the unresolved
/// name returned so the caller can record it into `category`.
pub(crate) fn resolve_kind(flat: &Value) -> (Kind, Option<String>) {
    let title = flat
        .get("title")
        .and_then(Value::as_str)
        .or_else(|| flat.get("name").and_then(Value::as_str));

    match title {
        Some(title) => match registry::lookup_title(title) {
            Some(spec) => (spec.kind, None),
            None => (Kind::Internal, Some(title.to_string())),
        },
        None => (Kind::Internal, None),
    }
}

/// Build a fault from a flat error object and already-extracted options:
/// resolve the kind and record an unresolved title into `category`.
pub(crate) fn fault_from_flat(flat: &Value, mut options: Options) -> Fault {
    let (kind, unresolved_title) = resolve_kind(flat);
    if let Some(title) = unresolved_title {
        options.category = Some(title);
    }
    Fault::with(kind, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_options_reads_both_vocabularies() {
        let opts = flat_options(&json!({
            "detail": "jsonapi message",
            "status": 404,
            "code": "E404",
            "meta": {"level": "critical", "help": "look harder", "context": "slug"},
        }))
        .unwrap();
        assert_eq!(opts.message.as_deref(), Some("jsonapi message"));
        assert_eq!(opts.status_code, Some(404));
        assert_eq!(opts.code.as_deref(), Some("E404"));
        assert_eq!(opts.severity, Some(Severity::Critical));
        assert_eq!(opts.help.as_deref(), Some("look harder"));
        assert_eq!(opts.context.as_deref(), Some("slug"));

        let opts = flat_options(&json!({
            "error": "access_denied",
            "error_description": "oauth message",
        }))
        .unwrap();
        assert_eq!(opts.message.as_deref(), Some("oauth message"));
        assert_eq!(opts.code.as_deref(), Some("access_denied"));
    }

    #[test]
    fn detail_wins_over_error_description_and_message() {
        let opts = flat_options(&json!({
            "detail": "a",
            "error_description": "b",
            "message": "c",
        }))
        .unwrap();
        assert_eq!(opts.message.as_deref(), Some("a"));

        let opts = flat_options(&json!({"error_description": "b", "message": "c"})).unwrap();
        assert_eq!(opts.message.as_deref(), Some("b"));
    }

    #[test]
    fn resolve_kind_unknown_title_falls_back_to_internal() {
        let (kind, unresolved) = resolve_kind(&json!({"title": "TeapotError"}));
        assert_eq!(kind, Kind::Internal);
        assert_eq!(unresolved.as_deref(), Some("TeapotError"));

        let (kind, unresolved) = resolve_kind(&json!({"name": "ValidationError"}));
        assert_eq!(kind, Kind::Validation);
        assert_eq!(unresolved, None);

        let (kind, unresolved) = resolve_kind(&json!({}));
        assert_eq!(kind, Kind::Internal);
        assert_eq!(unresolved, None);
    }

    #[test]
    fn fault_from_flat_records_unresolved_title_as_category() {
        let flat = json!({
            "title": "TeapotError",
            "detail": "short and stout",
        });
        let fault = fault_from_flat(&flat, flat_options(&flat).unwrap());
        assert_eq!(fault.kind, Kind::Internal);
        assert_eq!(fault.status_code, 500);
        assert_eq!(fault.category, "TeapotError");
        assert_eq!(fault.message, "short and stout");
    }

    #[test]
    fn inbound_id_must_be_a_uuid() {
        let supplied = "018f4f2e-aaaa-7bbb-8ccc-0123456789ab";
        let opts = flat_options(&json!({"id": supplied})).unwrap();
        assert_eq!(opts.id.unwrap().to_string(), supplied);

        // A foreign producer's non-UUID id is dropped; the constructed
        // fault gets a fresh one instead.
        let flat = json!({"id": "req-42/legacy", "title": "NotFoundError"});
        let opts = flat_options(&flat).unwrap();
        assert_eq!(opts.id, None);
        let fault = fault_from_flat(&flat, opts);
        assert_ne!(fault.id.to_string(), "req-42/legacy");
    }

    #[test]
    fn string_flat_object_is_rejected() {
        assert!(matches!(
            flat_options(&json!("oops")),
            Err(CodecError::Construction(_))
        ));
    }

    #[test]
    fn serialize_flat_omits_absent_optionals() {
        let fault = Fault::of(Kind::NotFound);
        let flat = serialize_flat(&fault);
        assert_eq!(flat["status"], 404);
        assert_eq!(flat["title"], "NotFoundError");
        assert_eq!(flat["code"], "NotFoundError");
        assert!(flat["meta"].get("context").is_none());
        assert!(flat["meta"].get("help").is_none());
        assert_eq!(flat["meta"]["level"], "normal");
        assert_eq!(flat["meta"]["errorType"], "NotFoundError");
    }
}
