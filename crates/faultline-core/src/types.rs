//! Core types for the Faultline error taxonomy.
//!
//! A [`Fault`] is one concrete occurrence of a failure: a [`Kind`] plus
//! per-instance overrides, an id, and an optional wrapped cause whose
//! non-conflicting fields are merged in at construction time.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::identity::FAULTLINE_ROOT;
use crate::registry::{self, Kind};

// ─── Severity ─────────────────────────────────────────────────────────────────

/// How serious a fault is for alerting/logging purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// An expected runtime condition (a 4xx, a missing resource, …).
    Normal,
    /// A programming defect or server fault that should page someone.
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Critical => "critical",
        }
    }

    /// Parse a wire severity label. Unknown labels return `None` so the
    /// caller can fall back to the kind default.
    pub fn parse(label: &str) -> Option<Severity> {
        match label {
            "normal" => Some(Severity::Normal),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── ConstructionError ────────────────────────────────────────────────────────

/// Construction-time misuse. These fail loudly; they indicate a
/// programming defect, not a runtime condition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConstructionError {
    /// The kind slug is not in the registry. Defaults apply to unset
    /// fields, never to an invalid kind name.
    #[error("unknown error kind: {name:?}")]
    UnknownKind { name: String },

    /// Options was a bare string. Callers must pass structured options so
    /// a message can never be confused for a kind.
    #[error("errors must be constructed with structured options, not a bare message string")]
    StringOptions,
}

// ─── Cause ────────────────────────────────────────────────────────────────────

/// A wrapped cause: either another [`Fault`] or a foreign error-like value
/// of unknown shape (third-party libraries sometimes hand back a plain
/// string instead of an error).
#[derive(Debug, Clone)]
pub enum Cause {
    Fault(Box<Fault>),
    Foreign {
        message: String,
        trace: Option<String>,
        details: Option<Value>,
    },
}

impl Cause {
    /// Wrap any `std::error::Error`. The source chain is flattened into
    /// the trace text so nothing is lost when the cause is merged.
    pub fn foreign(err: &(dyn std::error::Error + 'static)) -> Cause {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(inner) = source {
            chain.push(format!("caused by: {inner}"));
            source = inner.source();
        }
        Cause::Foreign {
            message: err.to_string(),
            trace: if chain.is_empty() { None } else { Some(chain.join("\n")) },
            details: None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Cause::Fault(f) => &f.message,
            Cause::Foreign { message, .. } => message,
        }
    }

    pub fn trace(&self) -> Option<&str> {
        match self {
            Cause::Fault(f) => f.trace.as_deref(),
            Cause::Foreign { trace, .. } => trace.as_deref(),
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Cause::Fault(f) => f.context.as_deref(),
            Cause::Foreign { .. } => None,
        }
    }

    fn help(&self) -> Option<&str> {
        match self {
            Cause::Fault(f) => f.help.as_deref(),
            Cause::Foreign { .. } => None,
        }
    }

    fn details(&self) -> Option<&Value> {
        match self {
            Cause::Fault(f) => f.error_details.as_ref(),
            Cause::Foreign { details, .. } => details.as_ref(),
        }
    }

    fn code(&self) -> Option<&str> {
        match self {
            Cause::Fault(f) => f.code.as_deref(),
            Cause::Foreign { .. } => None,
        }
    }

    fn property(&self) -> Option<&str> {
        match self {
            Cause::Fault(f) => f.property.as_deref(),
            Cause::Foreign { .. } => None,
        }
    }

    fn redirect(&self) -> Option<&str> {
        match self {
            Cause::Fault(f) => f.redirect.as_deref(),
            Cause::Foreign { .. } => None,
        }
    }

    fn hide_stack(&self) -> Option<bool> {
        match self {
            Cause::Fault(f) => Some(f.hide_stack),
            Cause::Foreign { .. } => None,
        }
    }
}

impl From<Fault> for Cause {
    fn from(fault: Fault) -> Cause {
        Cause::Fault(Box::new(fault))
    }
}

// A string cause is promoted to a minimal foreign error value.
impl From<String> for Cause {
    fn from(message: String) -> Cause {
        Cause::Foreign { message, trace: None, details: None }
    }
}

impl From<&str> for Cause {
    fn from(message: &str) -> Cause {
        Cause::from(message.to_string())
    }
}

// ─── Options ──────────────────────────────────────────────────────────────────

/// Structured construction options. Every field is optional; unset fields
/// fall back to the kind's registry defaults (or stay absent).
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub id: Option<Uuid>,
    pub status_code: Option<u16>,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub message: Option<String>,
    pub context: Option<String>,
    pub help: Option<String>,
    pub error_details: Option<Value>,
    pub code: Option<String>,
    pub property: Option<String>,
    pub redirect: Option<String>,
    pub hide_stack: Option<bool>,
    pub cause: Option<Cause>,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn id(mut self, id: Uuid) -> Options {
        self.id = Some(id);
        self
    }

    pub fn status_code(mut self, status: u16) -> Options {
        self.status_code = Some(status);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Options {
        self.category = Some(category.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Options {
        self.severity = Some(severity);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Options {
        self.message = Some(message.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Options {
        self.context = Some(context.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Options {
        self.help = Some(help.into());
        self
    }

    pub fn error_details(mut self, details: Value) -> Options {
        self.error_details = Some(details);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Options {
        self.code = Some(code.into());
        self
    }

    pub fn property(mut self, property: impl Into<String>) -> Options {
        self.property = Some(property.into());
        self
    }

    pub fn redirect(mut self, redirect: impl Into<String>) -> Options {
        self.redirect = Some(redirect.into());
        self
    }

    pub fn hide_stack(mut self, hide: bool) -> Options {
        self.hide_stack = Some(hide);
        self
    }

    pub fn cause(mut self, cause: impl Into<Cause>) -> Options {
        self.cause = Some(cause.into());
        self
    }

    /// Build options from an untyped JSON value, the dynamic door used
    /// when the option set arrives from outside the type system.
    ///
    /// Keys follow the wire option vocabulary: `id`, `statusCode`,
    /// `errorType`, `level`, `message`, `context`, `help`, `errorDetails`,
    /// `code`, `property`, `redirect`, `hideStack`.
    ///
    /// A bare JSON string is rejected with
    /// [`ConstructionError::StringOptions`]; anything else non-object is
    /// treated as empty options.
    pub fn from_value(value: &Value) -> Result<Options, ConstructionError> {
        if value.is_string() {
            return Err(ConstructionError::StringOptions);
        }
        let Some(obj) = value.as_object() else {
            return Ok(Options::default());
        };

        let str_field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Options {
            id: obj
                .get("id")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok()),
            status_code: obj
                .get("statusCode")
                .and_then(Value::as_u64)
                .and_then(|n| u16::try_from(n).ok()),
            category: str_field("errorType"),
            severity: obj
                .get("level")
                .and_then(Value::as_str)
                .and_then(Severity::parse),
            message: str_field("message"),
            context: str_field("context"),
            help: str_field("help"),
            error_details: obj.get("errorDetails").cloned().filter(|v| !v.is_null()),
            code: str_field("code"),
            property: str_field("property"),
            redirect: str_field("redirect"),
            hide_stack: obj.get("hideStack").and_then(Value::as_bool),
            cause: None,
        })
    }
}

// ─── Cause inheritance ────────────────────────────────────────────────────────

/// Option fields a wrapped cause may contribute when the wrapper did not
/// set its own value.
pub const INHERITED_FIELDS: &[&str] = &[
    "context",
    "help",
    "errorDetails",
    "code",
    "property",
    "redirect",
    "hideStack",
];

/// Fields that always come from the explicit options or the kind defaults,
/// never from a wrapped cause. A low-level cause must not silently
/// escalate or demote the wrapper's declared identity.
pub const PROTECTED_FIELDS: &[&str] = &[
    "category",
    "kindName",
    "statusCode",
    "message",
    "severity",
];

/// Merge the cause's inheritable fields into unset option slots.
/// Trace text is handled separately (appended, never overwritten).
fn inherit_from_cause(options: &mut Options, cause: &Cause) {
    if options.context.is_none() {
        options.context = cause.context().map(str::to_string);
    }
    if options.help.is_none() {
        options.help = cause.help().map(str::to_string);
    }
    if options.error_details.is_none() {
        options.error_details = cause.details().cloned();
    }
    if options.code.is_none() {
        options.code = cause.code().map(str::to_string);
    }
    if options.property.is_none() {
        options.property = cause.property().map(str::to_string);
    }
    if options.redirect.is_none() {
        options.redirect = cause.redirect().map(str::to_string);
    }
    if options.hide_stack.is_none() {
        options.hide_stack = cause.hide_stack();
    }
}

// ─── Fault ────────────────────────────────────────────────────────────────────

/// One concrete failure occurrence: a kind instantiated with overrides.
///
/// Immutable after construction. Carries no external resources, so normal
/// scope exit is the whole lifecycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fault {
    pub id: Uuid,
    pub kind: Kind,
    pub status_code: u16,
    pub category: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub hide_stack: bool,
    /// Trace text: the construction-site snapshot plus any appended cause
    /// traces. Never serialized; external surfaces go through
    /// [`Fault::visible_trace`].
    #[serde(skip)]
    pub trace: Option<String>,
    /// Kind-name chain ending in the taxonomy root marker; see
    /// [`crate::identity`].
    #[serde(skip)]
    pub lineage: Vec<String>,
}

impl Fault {
    /// Construct a fault by kind slug.
    ///
    /// Fails with [`ConstructionError::UnknownKind`] for a slug outside
    /// the registry. Unknown kinds never silently default.
    pub fn build(kind: &str, options: Options) -> Result<Fault, ConstructionError> {
        let spec = registry::lookup(kind).ok_or_else(|| ConstructionError::UnknownKind {
            name: kind.to_string(),
        })?;
        Ok(Fault::with(spec.kind, options))
    }

    /// Construct a fault by kind slug from untyped JSON options.
    /// Rejects a bare string with [`ConstructionError::StringOptions`].
    pub fn build_from_value(kind: &str, options: &Value) -> Result<Fault, ConstructionError> {
        let options = Options::from_value(options)?;
        Fault::build(kind, options)
    }

    /// Construct a fault for a statically known kind. Infallible, since
    /// the kind is already in the registry.
    pub fn with(kind: Kind, mut options: Options) -> Fault {
        let own_trace = capture_trace();
        let cause = options.cause.take();
        if let Some(cause) = &cause {
            inherit_from_cause(&mut options, cause);
        }

        let spec = kind.spec();
        let trace = join_traces(own_trace, cause.as_ref().and_then(|c| c.trace()));

        Fault {
            id: options.id.unwrap_or_else(Uuid::now_v7),
            kind,
            status_code: options.status_code.unwrap_or(spec.status_code),
            category: options
                .category
                .unwrap_or_else(|| spec.category.to_string()),
            severity: options.severity.unwrap_or(spec.severity),
            message: options.message.unwrap_or_else(|| spec.message.to_string()),
            context: options.context,
            help: options.help,
            error_details: options.error_details,
            code: options.code,
            property: options.property,
            redirect: options.redirect,
            hide_stack: options.hide_stack.unwrap_or(false),
            trace,
            lineage: vec![spec.title.to_string(), FAULTLINE_ROOT.to_string()],
        }
    }

    /// Construct a fault with all defaults for the given kind.
    pub fn of(kind: Kind) -> Fault {
        Fault::with(kind, Options::default())
    }

    /// The machine code if set, else the category. This is what both wire
    /// formats emit as `code`.
    pub fn code_or_category(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.category)
    }

    /// Trace text for external surfaces. `None` when `hide_stack` is set,
    /// regardless of what was captured. Logging may still read
    /// `self.trace` directly for internal sinks.
    pub fn visible_trace(&self) -> Option<&str> {
        if self.hide_stack {
            None
        } else {
            self.trace.as_deref()
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.title(), self.message)
    }
}

impl std::error::Error for Fault {}

// ─── Trace capture ────────────────────────────────────────────────────────────

/// Capture a trace snapshot at the construction site. Returns `None` when
/// backtraces are disabled (`RUST_BACKTRACE` unset).
fn capture_trace() -> Option<String> {
    let bt = Backtrace::capture();
    if bt.status() == BacktraceStatus::Captured {
        Some(trim_construction_frames(&bt.to_string()))
    } else {
        None
    }
}

/// Drop the leading frames that belong to the construction helpers so the
/// visible trace starts at the caller.
fn trim_construction_frames(raw: &str) -> String {
    let is_frame_header = |line: &str| {
        let trimmed = line.trim_start();
        trimmed
            .split(':')
            .next()
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    };

    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = true;
    for line in raw.lines() {
        if skipping {
            if is_frame_header(line)
                && !line.contains("faultline_core::types")
                && !line.contains("std::backtrace")
            {
                skipping = false;
            } else {
                continue;
            }
        }
        kept.push(line);
    }
    if kept.is_empty() {
        raw.to_string()
    } else {
        kept.join("\n")
    }
}

fn join_traces(own: Option<String>, cause: Option<&str>) -> Option<String> {
    match (own, cause) {
        (Some(own), Some(cause)) => Some(format!("{own}\n\n{cause}")),
        (Some(own), None) => Some(own),
        (None, Some(cause)) => Some(cause.to_string()),
        (None, None) => None,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
