//! Cross-boundary identity: "is this one of ours?"
//!
//! Two independently compiled copies of this taxonomy can coexist in one
//! process (diamond dependencies with different versions), so type
//! identity and downcasting cannot recognize a fault built by the other
//! copy. Instead every fault carries a persisted kind-name chain ending
//! in [`FAULTLINE_ROOT`], and the oracle compares names by string.

/// The root marker every taxonomy fault's lineage ends in.
pub const FAULTLINE_ROOT: &str = "FaultlineError";

/// Anything that exposes a kind-name chain. [`crate::Fault`] implements
/// this; so can foreign wrappers that want to be recognized.
pub trait KindChain {
    /// The declared kind names, most specific first, ending in the root
    /// marker for taxonomy members.
    fn kind_chain(&self) -> &[String];
}

impl KindChain for crate::Fault {
    fn kind_chain(&self) -> &[String] {
        &self.lineage
    }
}

/// Returns `true` when the value's kind-name chain contains the taxonomy
/// root marker. `None` (no value at all) is `false`. Never panics.
pub fn is_faultline_error(value: Option<&dyn KindChain>) -> bool {
    match value {
        None => false,
        Some(value) => value.kind_chain().iter().any(|name| name == FAULTLINE_ROOT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Kind;
    use crate::types::Fault;

    #[test]
    fn recognizes_every_constructed_fault() {
        for kind in Kind::ALL {
            let fault = Fault::of(kind);
            assert!(is_faultline_error(Some(&fault)), "{}", kind.name());
        }
    }

    #[test]
    fn absent_value_is_not_ours() {
        assert!(!is_faultline_error(None));
    }

    /// A hierarchy built by an independently loaded copy of the taxonomy:
    /// different types, same root marker name.
    struct ShadowCopyError {
        chain: Vec<String>,
    }

    impl KindChain for ShadowCopyError {
        fn kind_chain(&self) -> &[String] {
            &self.chain
        }
    }

    #[test]
    fn recognizes_independent_copy_by_name() {
        let shadow = ShadowCopyError {
            chain: vec![
                "NoPermissionError".to_string(),
                FAULTLINE_ROOT.to_string(),
            ],
        };
        assert!(is_faultline_error(Some(&shadow)));
    }

    #[test]
    fn rejects_unrelated_chains() {
        let stranger = ShadowCopyError {
            chain: vec!["TypeError".to_string(), "Error".to_string()],
        };
        assert!(!is_faultline_error(Some(&stranger)));

        let empty = ShadowCopyError { chain: vec![] };
        assert!(!is_faultline_error(Some(&empty)));
    }
}
