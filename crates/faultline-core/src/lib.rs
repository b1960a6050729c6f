//! faultline-core: foundation types for the Faultline error taxonomy.
//!
//! This crate defines:
//! - [`Kind`] / [`registry`]: the closed set of error kinds and their defaults
//! - [`Fault`]: one concrete failure occurrence, with wrapping semantics
//! - [`Options`] / [`Cause`]: construction inputs
//! - [`identity`]: the cross-boundary "is this one of ours" oracle
//!
//! Wire codecs live in `faultline-wire`.

pub mod identity;
pub mod registry;
pub mod types;

pub use identity::{is_faultline_error, KindChain, FAULTLINE_ROOT};
pub use registry::{Kind, KindSpec};
pub use types::{Cause, ConstructionError, Fault, Options, Severity};
