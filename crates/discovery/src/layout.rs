//! # Layouts
//!
//! A layout is one principal combination re-expressed at the wire
//! level: a map from group alias to the number of peers that must
//! endorse under that group's principal. Layout computation converts
//! the policy's satisfying principal sets into layouts and keeps only
//! those the satisfaction graph can actually fulfill.

use std::collections::{BTreeMap, HashSet};

use nexum_common::PrincipalSets;
use serde::{Deserialize, Serialize};

use crate::graph::SatisfactionGraph;
use crate::group_mapper::PrincipalGroupMapper;

// ════════════════════════════════════════════════════════════════════════════
// LAYOUT
// ════════════════════════════════════════════════════════════════════════════

/// One way to fulfill the endorsement policy: how many peers are
/// required from each group.
///
/// The map is ordered by alias so the wire form is deterministic for a
/// fixed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Required peer count per group alias. Every quantity is positive.
    pub quantities_by_group: BTreeMap<String, u32>,
}

/// The feasible layouts of one analysis, in policy enumeration order.
///
/// Duplicate layouts are preserved: distinct principal sets may collapse
/// to the same group quantities, and clients may use the multiplicity to
/// reason about alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layouts(Vec<Layout>);

impl Layouts {
    /// Number of layouts.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no layout survived.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the layouts in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Layout> {
        self.0.iter()
    }

    /// The set of group aliases referenced by any layout.
    #[must_use]
    pub fn groups_set(&self) -> HashSet<String> {
        let mut groups = HashSet::new();
        for layout in &self.0 {
            for alias in layout.quantities_by_group.keys() {
                groups.insert(alias.clone());
            }
        }
        groups
    }

    /// Consumes the collection into its layouts.
    #[must_use]
    pub fn into_vec(self) -> Vec<Layout> {
        self.0
    }
}

impl From<Vec<Layout>> for Layouts {
    fn from(layouts: Vec<Layout>) -> Self {
        Self(layouts)
    }
}

impl<'a> IntoIterator for &'a Layouts {
    type Item = &'a Layout;
    type IntoIter = std::slice::Iter<'a, Layout>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LAYOUT COMPUTATION
// ════════════════════════════════════════════════════════════════════════════

/// Converts each principal set into a layout and retains the layouts
/// the graph can fulfill.
///
/// Each set is collapsed to its plurality map; each principal is mapped
/// to its group alias; the layout survives iff every group has at least
/// its required quantity of peer neighbors in the graph. Output order
/// follows the enumeration order of `principals_sets`; duplicates are
/// not removed.
#[must_use]
pub fn compute_layouts(
    principals_sets: &PrincipalSets,
    groups: &mut PrincipalGroupMapper,
    graph: &SatisfactionGraph,
) -> Layouts {
    let mut layouts = Vec::new();
    for principal_set in principals_sets {
        let mut quantities_by_group = BTreeMap::new();
        for (principal, plurality) in principal_set.unique_set() {
            quantities_by_group.insert(groups.group(&principal), plurality as u32);
        }
        let layout = Layout { quantities_by_group };
        if is_layout_satisfied(&layout, graph) {
            layouts.push(layout);
        }
    }
    Layouts(layouts)
}

/// Returns `true` iff every (group, quantity) entry of the layout has
/// at least `quantity` peer neighbors in the graph.
fn is_layout_satisfied(layout: &Layout, graph: &SatisfactionGraph) -> bool {
    layout
        .quantities_by_group
        .iter()
        .all(|(alias, quantity)| graph.neighbor_count(alias) >= *quantity as usize)
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════
