//! The error kind registry: the closed set of failure kinds.
//!
//! One row per kind, populated once at compile time. Nothing here is
//! mutable at runtime, so the table is safe to read from any number of
//! request-handling threads without synchronization.

use crate::types::Severity;

// ─── Kind ─────────────────────────────────────────────────────────────────────

/// The taxonomy of service error kinds. The set is closed; there is no
/// dynamic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Internal,
    IncorrectUsage,
    NotFound,
    BadRequest,
    Unauthorized,
    NoPermission,
    Validation,
    UnsupportedMediaType,
    TooManyRequests,
    Maintenance,
    MethodNotAllowed,
    EntityTooLarge,
    TokenRevocation,
    VersionMismatch,
}

impl Kind {
    /// Every kind, in registry order. Handy for exhaustive sweeps in tests.
    pub const ALL: [Kind; 14] = [
        Kind::Internal,
        Kind::IncorrectUsage,
        Kind::NotFound,
        Kind::BadRequest,
        Kind::Unauthorized,
        Kind::NoPermission,
        Kind::Validation,
        Kind::UnsupportedMediaType,
        Kind::TooManyRequests,
        Kind::Maintenance,
        Kind::MethodNotAllowed,
        Kind::EntityTooLarge,
        Kind::TokenRevocation,
        Kind::VersionMismatch,
    ];

    /// The registry row for this kind.
    pub fn spec(self) -> &'static KindSpec {
        // KINDS is laid out in the same order as ALL.
        &KINDS[self as usize]
    }

    /// Kind slug (e.g. `"not-found"`).
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Wire display name (e.g. `"NotFoundError"`). This is what the codecs
    /// emit as `title` and accept back when resolving an inbound document.
    pub fn title(self) -> &'static str {
        self.spec().title
    }

    /// Default HTTP status code.
    pub fn status_code(self) -> u16 {
        self.spec().status_code
    }

    /// Default category label.
    pub fn category(self) -> &'static str {
        self.spec().category
    }

    /// Default severity.
    pub fn severity(self) -> Severity {
        self.spec().severity
    }

    /// Default human-readable message.
    pub fn default_message(self) -> &'static str {
        self.spec().message
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Kinds log and serialize as their slug.
impl serde::Serialize for Kind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ─── KindSpec ─────────────────────────────────────────────────────────────────

/// One registry row: a kind plus its per-instance defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    pub kind: Kind,
    /// Slug used by application code (`Fault::build`).
    pub name: &'static str,
    /// PascalCase name used on the wire (`title` field).
    pub title: &'static str,
    pub status_code: u16,
    pub category: &'static str,
    pub severity: Severity,
    pub message: &'static str,
}

/// The full registry. Order must match `Kind::ALL`; `Kind::spec` indexes
/// into this array by discriminant.
pub static KINDS: [KindSpec; 14] = [
    KindSpec {
        kind: Kind::Internal,
        name: "internal",
        title: "InternalServerError",
        status_code: 500,
        category: "InternalServerError",
        severity: Severity::Critical,
        message: "The server has encountered an error.",
    },
    KindSpec {
        kind: Kind::IncorrectUsage,
        name: "incorrect-usage",
        title: "IncorrectUsageError",
        status_code: 400,
        category: "InternalUsageError",
        severity: Severity::Critical,
        message: "We detected a misuse. Please read the stack trace.",
    },
    KindSpec {
        kind: Kind::NotFound,
        name: "not-found",
        title: "NotFoundError",
        status_code: 404,
        category: "NotFoundError",
        severity: Severity::Normal,
        message: "Resource could not be found.",
    },
    KindSpec {
        kind: Kind::BadRequest,
        name: "bad-request",
        title: "BadRequestError",
        status_code: 400,
        category: "BadRequestError",
        severity: Severity::Normal,
        message: "The Request could not be understood.",
    },
    KindSpec {
        kind: Kind::Unauthorized,
        name: "unauthorized",
        title: "UnauthorizedError",
        status_code: 401,
        category: "UnauthorizedError",
        severity: Severity::Normal,
        message: "You are not authorized to make this request.",
    },
    KindSpec {
        kind: Kind::NoPermission,
        name: "no-permission",
        title: "NoPermissionError",
        status_code: 403,
        // The category has no "Error" suffix, part of the wire
        // compatibility contract.
        category: "NoPermission",
        severity: Severity::Normal,
        message: "You do not have permission to perform this request.",
    },
    KindSpec {
        kind: Kind::Validation,
        name: "validation",
        title: "ValidationError",
        status_code: 422,
        category: "ValidationError",
        severity: Severity::Normal,
        message: "The request failed validation.",
    },
    KindSpec {
        kind: Kind::UnsupportedMediaType,
        name: "unsupported-media-type",
        title: "UnsupportedMediaTypeError",
        status_code: 415,
        category: "UnsupportedMediaTypeError",
        severity: Severity::Normal,
        message: "The media in the request is not supported by the server.",
    },
    KindSpec {
        kind: Kind::TooManyRequests,
        name: "too-many-requests",
        title: "TooManyRequestError",
        status_code: 429,
        category: "TooManyRequestError",
        severity: Severity::Normal,
        message: "Server has received too many similar requests in a short space of time.",
    },
    KindSpec {
        kind: Kind::Maintenance,
        name: "maintenance",
        title: "MaintenanceError",
        status_code: 503,
        category: "MaintenanceError",
        severity: Severity::Normal,
        message: "The server is temporarily down for maintenance",
    },
    KindSpec {
        kind: Kind::MethodNotAllowed,
        name: "method-not-allowed",
        title: "MethodNotAllowedError",
        status_code: 405,
        category: "MethodNotAllowedError",
        severity: Severity::Normal,
        message: "Method not allowed for resource.",
    },
    KindSpec {
        kind: Kind::EntityTooLarge,
        name: "entity-too-large",
        title: "RequestEntityTooLargeError",
        status_code: 413,
        category: "RequestEntityTooLargeError",
        severity: Severity::Normal,
        message: "Request was too big for the server to handle.",
    },
    KindSpec {
        kind: Kind::TokenRevocation,
        name: "token-revocation",
        title: "TokenRevocationError",
        status_code: 503,
        category: "TokenRevocationError",
        severity: Severity::Normal,
        message: "Token is no longer available",
    },
    KindSpec {
        kind: Kind::VersionMismatch,
        name: "version-mismatch",
        title: "VersionMismatchError",
        status_code: 400,
        category: "VersionMismatchError",
        severity: Severity::Normal,
        message: "Requested version does not match server version.",
    },
];

// ─── Lookups ──────────────────────────────────────────────────────────────────

/// Look up a registry row by kind slug (e.g. `"bad-request"`).
pub fn lookup(name: &str) -> Option<&'static KindSpec> {
    KINDS.iter().find(|spec| spec.name == name)
}

/// Look up a registry row by wire title (e.g. `"BadRequestError"`).
/// Used by the deserializers to resolve an inbound `title`/`name` field.
pub fn lookup_title(title: &str) -> Option<&'static KindSpec> {
    KINDS.iter().find(|spec| spec.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_order_matches_all() {
        for kind in Kind::ALL {
            assert_eq!(kind.spec().kind, kind, "KINDS order diverged for {kind:?}");
        }
    }

    #[test]
    fn registry_defaults_table() {
        let expected: &[(&str, u16, &str, Severity, &str)] = &[
            ("internal", 500, "InternalServerError", Severity::Critical,
             "The server has encountered an error."),
            ("incorrect-usage", 400, "InternalUsageError", Severity::Critical,
             "We detected a misuse. Please read the stack trace."),
            ("not-found", 404, "NotFoundError", Severity::Normal,
             "Resource could not be found."),
            ("bad-request", 400, "BadRequestError", Severity::Normal,
             "The Request could not be understood."),
            ("unauthorized", 401, "UnauthorizedError", Severity::Normal,
             "You are not authorized to make this request."),
            ("no-permission", 403, "NoPermission", Severity::Normal,
             "You do not have permission to perform this request."),
            ("validation", 422, "ValidationError", Severity::Normal,
             "The request failed validation."),
            ("unsupported-media-type", 415, "UnsupportedMediaTypeError", Severity::Normal,
             "The media in the request is not supported by the server."),
            ("too-many-requests", 429, "TooManyRequestError", Severity::Normal,
             "Server has received too many similar requests in a short space of time."),
            ("maintenance", 503, "MaintenanceError", Severity::Normal,
             "The server is temporarily down for maintenance"),
            ("method-not-allowed", 405, "MethodNotAllowedError", Severity::Normal,
             "Method not allowed for resource."),
            ("entity-too-large", 413, "RequestEntityTooLargeError", Severity::Normal,
             "Request was too big for the server to handle."),
            ("token-revocation", 503, "TokenRevocationError", Severity::Normal,
             "Token is no longer available"),
            ("version-mismatch", 400, "VersionMismatchError", Severity::Normal,
             "Requested version does not match server version."),
        ];

        assert_eq!(expected.len(), KINDS.len());
        for (name, status, category, severity, message) in expected {
            let spec = lookup(name).unwrap_or_else(|| panic!("missing kind {name}"));
            assert_eq!(spec.status_code, *status, "{name}: status");
            assert_eq!(spec.category, *category, "{name}: category");
            assert_eq!(spec.severity, *severity, "{name}: severity");
            assert_eq!(spec.message, *message, "{name}: message");
        }
    }

    #[test]
    fn lookup_unknown_is_none() {
        assert!(lookup("bogus-kind").is_none());
        assert!(lookup("NotFoundError").is_none(), "titles are not slugs");
    }

    #[test]
    fn lookup_title_resolves_wire_names() {
        assert_eq!(lookup_title("NotFoundError").unwrap().kind, Kind::NotFound);
        assert_eq!(
            lookup_title("NoPermissionError").unwrap().category,
            "NoPermission"
        );
        assert!(lookup_title("not-found").is_none(), "slugs are not titles");
        assert!(lookup_title("SomethingElseError").is_none());
    }
}
