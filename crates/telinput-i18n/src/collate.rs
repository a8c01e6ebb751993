#![forbid(unsafe_code)]

//! Collation contract for ordering display names.
//!
//! The catalog is sorted once at build time by a [`Collator`]. The built-in
//! [`InvariantCollator`] is deliberately locale-free:
//!
//! - Case folding uses Unicode simple lowercase, no locale tailoring.
//! - Ordering is code-point order of the folded key; accented initials sort
//!   after `z` rather than next to their base letter.
//!
//! Hosts that need CLDR-grade ordering plug a real collator in at this seam
//! instead of the crate shipping a collation table.

/// Produces sort keys for display names.
pub trait Collator {
    /// The sort key for a display name. Keys compare bytewise.
    fn key(&self, name: &str) -> String;
}

/// Locale-free collation: simple Unicode lowercase, code-point order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantCollator;

impl Collator for InvariantCollator {
    fn key(&self, name: &str) -> String {
        name.to_lowercase()
    }
}
