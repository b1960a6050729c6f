//! faultline-wire: wire-format codecs for [`faultline_core::Fault`].
//!
//! Two formats cross service boundaries:
//! - [`jsonapi`]: a JSON-API error document (`{"errors": [{...}]}`)
//! - [`oauth`]: an RFC 6749-style error body (`{"error": ..., "error_description": ...}`)
//!
//! [`dispatch`] picks the codec: by format hint when serializing, by
//! document shape when deserializing. Codec failures never escape the
//! dispatcher; they degrade to a minimal document or a generic internal
//! fault (the reporting path must never itself crash).

mod fields;

pub mod dispatch;
pub mod jsonapi;
pub mod oauth;

pub use dispatch::{deserialize, serialize, Format};

/// Internal codec failures. The dispatcher swallows these; they are
/// public so direct codec callers can observe the trigger conditions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The document (or the error entry inside it) is not a JSON object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// Field extraction produced invalid construction input.
    #[error(transparent)]
    Construction(#[from] faultline_core::ConstructionError),
}
