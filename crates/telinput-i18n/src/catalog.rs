#![forbid(unsafe_code)]

//! The country catalog: one sorted, immutable entry per region.
//!
//! Built once per widget locale from a [`NameProvider`] and a
//! [`Collator`], then shared read-only. The picker iterates it in sorted
//! order and navigates with wrap-around neighbor lookups.

use std::fmt;

use ahash::AHashMap;

use telinput_core::RegionCode;

use crate::collate::{Collator, InvariantCollator};
use crate::names;

/// One row of the picker: display name, calling code, region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    display_name: String,
    calling_code: String,
    region: RegionCode,
}

impl CatalogEntry {
    /// The localized display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The international calling code, digits only (no `+`).
    #[must_use]
    pub fn calling_code(&self) -> &str {
        &self.calling_code
    }

    /// The region this entry stands for.
    #[must_use]
    pub fn region(&self) -> RegionCode {
        self.region
    }
}

/// Source of regions, calling codes, and localized display names.
///
/// This is the catalog-source collaborator: the built-in [`EnglishNames`]
/// table by default, replaceable by a host that carries CLDR data.
pub trait NameProvider {
    /// All supported regions as (region, calling code, display name).
    fn entries(&self) -> Vec<(RegionCode, String, String)>;
}

/// The built-in English name table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNames;

impl NameProvider for EnglishNames {
    fn entries(&self) -> Vec<(RegionCode, String, String)> {
        names::ENGLISH
            .iter()
            .filter_map(|&(region, calling_code, display_name)| {
                RegionCode::new(region)
                    .map(|r| (r, calling_code.to_owned(), display_name.to_owned()))
            })
            .collect()
    }
}

/// Fatal catalog construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The provider supplied no entries; the picker cannot render.
    Empty,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("country catalog provider supplied no entries"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable, sorted country list with a region index.
#[derive(Debug, Clone)]
pub struct CountryCatalog {
    entries: Vec<CatalogEntry>,
    by_region: AHashMap<RegionCode, usize>,
}

impl CountryCatalog {
    /// Build a catalog from a provider, sorted by the collator's keys.
    ///
    /// Duplicate regions keep their first occurrence. Ties on the collation
    /// key break on the region code so the order is deterministic.
    pub fn build(
        provider: &dyn NameProvider,
        collator: &dyn Collator,
    ) -> Result<Self, CatalogError> {
        let mut seen: AHashMap<RegionCode, ()> = AHashMap::new();
        let mut keyed: Vec<(String, CatalogEntry)> = Vec::new();
        for (region, calling_code, display_name) in provider.entries() {
            if seen.insert(region, ()).is_some() {
                continue;
            }
            let key = collator.key(&display_name);
            keyed.push((
                key,
                CatalogEntry {
                    display_name,
                    calling_code,
                    region,
                },
            ));
        }
        if keyed.is_empty() {
            return Err(CatalogError::Empty);
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.region.cmp(&b.1.region)));

        let entries: Vec<CatalogEntry> = keyed.into_iter().map(|(_, entry)| entry).collect();
        let by_region = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.region, index))
            .collect();
        Ok(Self { entries, by_region })
    }

    /// Build the built-in English catalog with invariant collation.
    pub fn english() -> Result<Self, CatalogError> {
        Self::build(&EnglishNames, &InvariantCollator)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries. Never true for a built catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a sorted position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Entry for a region, if supported.
    #[must_use]
    pub fn entry(&self, region: RegionCode) -> Option<&CatalogEntry> {
        self.position(region).and_then(|index| self.entries.get(index))
    }

    /// Sorted position of a region, if supported.
    #[must_use]
    pub fn position(&self, region: RegionCode) -> Option<usize> {
        self.by_region.get(&region).copied()
    }

    /// Whether a region has an entry.
    #[must_use]
    pub fn contains(&self, region: RegionCode) -> bool {
        self.by_region.contains_key(&region)
    }

    /// Iterate entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// The entry after `current` in sorted order, wrapping past the end.
    ///
    /// With no current region (or one that is not in the catalog) this is
    /// the first entry. Returns `None` only for an empty catalog.
    #[must_use]
    pub fn next_after(&self, current: Option<RegionCode>) -> Option<&CatalogEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let index = match current.and_then(|region| self.position(region)) {
            Some(position) => (position + 1) % self.entries.len(),
            None => 0,
        };
        self.entries.get(index)
    }

    /// The entry before `current` in sorted order, wrapping past the start.
    ///
    /// With no current region (or one that is not in the catalog) this is
    /// the last entry. Returns `None` only for an empty catalog.
    #[must_use]
    pub fn previous_before(&self, current: Option<RegionCode>) -> Option<&CatalogEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let index = match current.and_then(|region| self.position(region)) {
            Some(0) | None => self.entries.len() - 1,
            Some(position) => position - 1,
        };
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str) -> RegionCode {
        RegionCode::new(code).expect("test region")
    }

    struct FixedNames(Vec<(&'static str, &'static str, &'static str)>);

    impl NameProvider for FixedNames {
        fn entries(&self) -> Vec<(RegionCode, String, String)> {
            self.0
                .iter()
                .map(|&(r, code, name)| (region(r), code.to_owned(), name.to_owned()))
                .collect()
        }
    }

    fn small_catalog() -> CountryCatalog {
        CountryCatalog::build(
            &FixedNames(vec![
                ("CH", "41", "Switzerland"),
                ("DE", "49", "Germany"),
                ("AT", "43", "Austria"),
            ]),
            &InvariantCollator,
        )
        .expect("catalog builds")
    }

    #[test]
    fn entries_sort_by_display_name() {
        let catalog = small_catalog();
        let names: Vec<&str> = catalog.iter().map(CatalogEntry::display_name).collect();
        assert_eq!(names, vec!["Austria", "Germany", "Switzerland"]);
    }

    #[test]
    fn region_index_matches_sorted_order() {
        let catalog = small_catalog();
        assert_eq!(catalog.position(region("AT")), Some(0));
        assert_eq!(catalog.position(region("CH")), Some(2));
        assert_eq!(
            catalog.entry(region("DE")).map(CatalogEntry::calling_code),
            Some("49")
        );
        assert_eq!(catalog.position(region("FR")), None);
    }

    #[test]
    fn duplicate_regions_keep_first_occurrence() {
        let catalog = CountryCatalog::build(
            &FixedNames(vec![("CH", "41", "Switzerland"), ("CH", "99", "Shadow")]),
            &InvariantCollator,
        )
        .expect("catalog builds");
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.entry(region("CH")).map(CatalogEntry::calling_code),
            Some("41")
        );
    }

    #[test]
    fn empty_provider_is_fatal() {
        let result = CountryCatalog::build(&FixedNames(vec![]), &InvariantCollator);
        assert_eq!(result.err(), Some(CatalogError::Empty));
    }

    #[test]
    fn wrap_around_neighbors() {
        let catalog = small_catalog();
        // From no highlight: next is first, previous is last.
        assert_eq!(
            catalog.next_after(None).map(CatalogEntry::display_name),
            Some("Austria")
        );
        assert_eq!(
            catalog.previous_before(None).map(CatalogEntry::display_name),
            Some("Switzerland")
        );
        // Wrapping both ways.
        assert_eq!(
            catalog
                .next_after(Some(region("CH")))
                .map(CatalogEntry::display_name),
            Some("Austria")
        );
        assert_eq!(
            catalog
                .previous_before(Some(region("AT")))
                .map(CatalogEntry::display_name),
            Some("Switzerland")
        );
    }

    #[test]
    fn unknown_current_behaves_like_none() {
        let catalog = small_catalog();
        assert_eq!(
            catalog
                .next_after(Some(region("FR")))
                .map(CatalogEntry::display_name),
            Some("Austria")
        );
    }

    #[test]
    fn english_catalog_is_complete_and_clean() {
        let catalog = CountryCatalog::english().expect("built-in table is non-empty");
        assert!(catalog.len() > 200);
        assert_eq!(
            catalog.entry(region("CH")).map(CatalogEntry::calling_code),
            Some("41")
        );
        assert_eq!(
            catalog.entry(region("US")).map(CatalogEntry::calling_code),
            Some("1")
        );
        for entry in catalog.iter() {
            assert!(!entry.display_name().is_empty());
            assert!(entry.calling_code().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn english_catalog_order_matches_collator() {
        let catalog = CountryCatalog::english().expect("built-in table is non-empty");
        let keys: Vec<String> = catalog
            .iter()
            .map(|entry| InvariantCollator.key(entry.display_name()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
