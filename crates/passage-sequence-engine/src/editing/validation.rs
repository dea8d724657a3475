use std::collections::{BTreeMap, BTreeSet};

use crate::editing::BreakpointCollection;

/// Identifies a breakpoint by where it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreakpointKey {
    pub slot: usize,
    pub index_within_slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("Breakpoint name '{name}' is used {count} times")]
    DuplicateName { name: String, count: usize },
}

/// Problems found in a passage's breakpoints, keyed by breakpoint.
///
/// These are states for the author to resolve, never auto-corrected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: BTreeMap<BreakpointKey, ValidationIssue>,
}

impl ValidationReport {
    /// Flag every breakpoint whose trimmed name is shared with another
    pub fn check(breakpoints: &BreakpointCollection) -> Self {
        let mut issues = BTreeMap::new();
        breakpoints.for_each_breakpoint(|slot, index_within_slot, breakpoint| {
            let name = breakpoint.name.trim();
            let count = breakpoints.get_name_usage_count(name);
            if count > 1 {
                issues.insert(
                    BreakpointKey {
                        slot,
                        index_within_slot,
                    },
                    ValidationIssue::DuplicateName {
                        name: name.to_string(),
                        count,
                    },
                );
            }
        });
        if !issues.is_empty() {
            log::debug!("{} breakpoint(s) share a name", issues.len());
        }
        Self { issues }
    }

    pub fn get(&self, slot: usize, index_within_slot: usize) -> Option<&ValidationIssue> {
        self.issues.get(&BreakpointKey {
            slot,
            index_within_slot,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BreakpointKey, &ValidationIssue)> {
        self.issues.iter()
    }

    /// Distinct names involved in a duplicate
    pub fn duplicate_names(&self) -> BTreeSet<&str> {
        self.issues
            .values()
            .map(|issue| match issue {
                ValidationIssue::DuplicateName { name, .. } => name.as_str(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
