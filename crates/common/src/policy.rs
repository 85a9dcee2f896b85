//! # Endorsement Policy Vocabulary
//!
//! Principals, principal multisets, and the inquiry contract an
//! endorsement policy must expose so the discovery layer can enumerate
//! the combinations that satisfy it.
//!
//! ## Model
//!
//! A monotone threshold policy is summarized by its minimal satisfying
//! combinations: every `PrincipalSet` returned by
//! [`InquireablePolicy::satisfied_by`] is a multiset of principals whose
//! simultaneous satisfaction (respecting pluralities) fulfills the
//! policy. Policy parsing and normalization live behind the trait; this
//! crate only defines the vocabulary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// PRINCIPAL
// ════════════════════════════════════════════════════════════════════════════

/// Classification of a principal's payload.
///
/// The classification selects how the opaque payload is interpreted by
/// the membership-service layer when evaluating an identity against the
/// principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalClass {
    /// Payload names an MSP role (member, admin, ...).
    Role,
    /// Payload names an organizational unit.
    OrganizationUnit,
    /// Payload is a specific identity.
    Identity,
    /// Payload names an anonymity requirement.
    Anonymity,
    /// Payload combines several sub-principals.
    Combined,
}

/// A predicate over peer identities, evaluated under the channel's MSP
/// rules.
///
/// Equality and hashing are byte-exact over `(class, payload)`; two
/// principals with semantically equal but differently encoded payloads
/// are distinct on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// How the payload is to be interpreted.
    pub class: PrincipalClass,
    /// Opaque principal payload.
    pub payload: Vec<u8>,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub fn new(class: PrincipalClass, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            class,
            payload: payload.into(),
        }
    }

    /// Shorthand for a role-classified principal, the overwhelmingly
    /// common case in endorsement policies.
    #[must_use]
    pub fn role(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(PrincipalClass::Role, payload)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PRINCIPAL SETS
// ════════════════════════════════════════════════════════════════════════════

/// A multiset of principals; one minimal way to satisfy the policy.
///
/// Duplicate principals are meaningful: `{P, P}` requires two distinct
/// peers each satisfying `P`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSet(Vec<Principal>);

impl PrincipalSet {
    /// Creates a principal set from its elements.
    #[must_use]
    pub fn new(principals: Vec<Principal>) -> Self {
        Self(principals)
    }

    /// Number of principals, counting duplicates.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set has no principals.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the principals in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Principal> {
        self.0.iter()
    }

    /// Collapses the multiset to a plurality map: principal to the
    /// number of times it occurs.
    #[must_use]
    pub fn unique_set(&self) -> HashMap<Principal, usize> {
        let mut pluralities: HashMap<Principal, usize> = HashMap::new();
        for principal in &self.0 {
            *pluralities.entry(principal.clone()).or_insert(0) += 1;
        }
        pluralities
    }

    /// Returns `true` if every principal in the set satisfies `pred`.
    #[must_use]
    pub fn contains_only(&self, pred: impl Fn(&Principal) -> bool) -> bool {
        self.0.iter().all(pred)
    }
}

impl From<Vec<Principal>> for PrincipalSet {
    fn from(principals: Vec<Principal>) -> Self {
        Self(principals)
    }
}

impl<'a> IntoIterator for &'a PrincipalSet {
    type Item = &'a Principal;
    type IntoIter = std::slice::Iter<'a, Principal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The collection of minimal satisfying combinations of a policy, in the
/// policy's own enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSets(Vec<PrincipalSet>);

impl PrincipalSets {
    /// Creates the collection from its element sets.
    #[must_use]
    pub fn new(sets: Vec<PrincipalSet>) -> Self {
        Self(sets)
    }

    /// Number of combinations.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no combinations.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the combinations in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PrincipalSet> {
        self.0.iter()
    }

    /// Retains only the sets in which every principal satisfies `pred`,
    /// preserving enumeration order.
    ///
    /// Filtering is at set granularity: one failing principal discards
    /// the whole combination, because a combination missing any of its
    /// principals can never be fulfilled.
    #[must_use]
    pub fn containing_only(&self, pred: impl Fn(&Principal) -> bool) -> PrincipalSets {
        PrincipalSets(
            self.0
                .iter()
                .filter(|set| set.contains_only(&pred))
                .cloned()
                .collect(),
        )
    }
}

impl From<Vec<PrincipalSet>> for PrincipalSets {
    fn from(sets: Vec<PrincipalSet>) -> Self {
        Self(sets)
    }
}

impl<'a> IntoIterator for &'a PrincipalSets {
    type Item = &'a PrincipalSet;
    type IntoIter = std::slice::Iter<'a, PrincipalSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// INQUIREABLE POLICY
// ════════════════════════════════════════════════════════════════════════════

/// Contract an endorsement policy must expose to be analyzable.
///
/// Implementations enumerate every minimal principal multiset that
/// satisfies the policy. Enumeration is in-memory and must not block;
/// its order is the implementation's own but must be stable for a fixed
/// policy, since downstream layout order follows it.
pub trait InquireablePolicy: Send + Sync {
    /// Enumerates all minimal satisfying principal combinations.
    fn satisfied_by(&self) -> PrincipalSets;
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════
