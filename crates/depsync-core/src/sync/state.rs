//! Derived on-disk state for one declared dependency

/// On-disk state of a dependency directory.
///
/// Recomputed from the filesystem on every run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceState {
    /// The directory does not exist
    Absent,
    /// The directory exists but is not a recognizable checkout
    NotACheckout,
    /// A valid checkout at some revision
    Checkout {
        /// Full identifier of the revision currently checked out
        revision: String,
    },
}

/// Whether the currently checked-out revision satisfies a pin.
///
/// The pin is an opaque exact target: comparison is identifier equality,
/// extended to case-insensitive prefix matching so abbreviated pins match
/// the full identifier the backend reports. No ordering between revisions
/// is ever inferred.
pub(crate) fn revision_satisfies_pin(current: &str, pinned: &str) -> bool {
    current
        .get(..pinned.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(pinned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(revision_satisfies_pin("48c1b84f2245", "48c1b84f2245"));
    }

    #[test]
    fn test_abbreviated_pin_matches_by_prefix() {
        assert!(revision_satisfies_pin(
            "48c1b84f2245324e90871924e4f606f846197818",
            "48c1b84"
        ));
    }

    #[test]
    fn test_different_revision_does_not_match() {
        assert!(!revision_satisfies_pin("aaa1110000", "bbb222"));
    }

    #[test]
    fn test_pin_longer_than_current_does_not_match() {
        assert!(!revision_satisfies_pin("48c1", "48c1b84f"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(revision_satisfies_pin("48C1B84F2245", "48c1b84"));
    }
}
