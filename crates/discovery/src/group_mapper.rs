//! # Principal-Group Mapper
//!
//! Interns each distinct principal as a short opaque group alias
//! (`G0`, `G1`, ...). Downstream layouts and peer groupings carry the
//! alias instead of the raw principal payload, keeping wire-visible
//! group names small and decoupled from principal encodings.
//!
//! ## Determinism
//!
//! Alias assignment depends only on insertion order. The mapper is
//! seeded by walking the principal sets in the policy's enumeration
//! order, so for a fixed input the same principal always receives the
//! same alias within one analysis. No stability across analyses is
//! promised.

use nexum_common::{Principal, PrincipalSets};
use std::collections::HashMap;

// ════════════════════════════════════════════════════════════════════════════
// PRINCIPAL GROUP MAPPER
// ════════════════════════════════════════════════════════════════════════════

/// Assigns stable opaque group aliases to distinct principals.
///
/// Principals compare byte-exact over (class, payload); two encodings of
/// the same logical predicate intern as two groups, on purpose.
#[derive(Debug, Clone, Default)]
pub struct PrincipalGroupMapper {
    indices: HashMap<Principal, usize>,
    order: Vec<Principal>,
}

impl PrincipalGroupMapper {
    /// Creates an empty mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapper pre-seeded with every principal appearing in
    /// `sets`, interned in enumeration order.
    #[must_use]
    pub fn from_principal_sets(sets: &PrincipalSets) -> Self {
        let mut mapper = Self::new();
        for set in sets {
            for principal in set {
                mapper.group(principal);
            }
        }
        mapper
    }

    /// Returns the alias of `principal`, minting `G<n>` on first sight
    /// where `n` is the mapper's cardinality before insertion.
    pub fn group(&mut self, principal: &Principal) -> String {
        if let Some(idx) = self.indices.get(principal) {
            return alias_of(*idx);
        }
        let idx = self.order.len();
        self.indices.insert(principal.clone(), idx);
        self.order.push(principal.clone());
        alias_of(idx)
    }

    /// Number of distinct principals interned so far.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing has been interned.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(alias, principal)` pairs in alias order, i.e. `G0`
    /// first.
    pub fn entries(&self) -> impl Iterator<Item = (String, &Principal)> {
        self.order
            .iter()
            .enumerate()
            .map(|(idx, principal)| (alias_of(idx), principal))
    }
}

fn alias_of(idx: usize) -> String {
    format!("G{}", idx)
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════
