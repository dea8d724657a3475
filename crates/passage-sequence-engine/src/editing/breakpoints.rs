//! Slot-indexed storage for breakpoints.
//!
//! Slot `i` means "immediately before command `i`", and slot `command_count`
//! means "after the last command". Each slot holds an ordered list. Empty
//! lists are never stored, so two collections with the same placement compare
//! equal.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::editing::EditError;
use crate::models::Breakpoint;

type SlotMap = BTreeMap<usize, Vec<Breakpoint>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SlotMap", into = "SlotMap")]
pub struct BreakpointCollection {
    slots: SlotMap,
}

/// The forms breakpoint data can arrive in from a persistence layer
#[derive(Debug, Clone)]
pub enum RawBreakpoints {
    Typed(BreakpointCollection),
    Json(serde_json::Value),
    Missing,
}

impl From<BreakpointCollection> for RawBreakpoints {
    fn from(collection: BreakpointCollection) -> Self {
        RawBreakpoints::Typed(collection)
    }
}

impl From<serde_json::Value> for RawBreakpoints {
    fn from(value: serde_json::Value) -> Self {
        RawBreakpoints::Json(value)
    }
}

impl From<Option<serde_json::Value>> for RawBreakpoints {
    fn from(value: Option<serde_json::Value>) -> Self {
        value.map_or(RawBreakpoints::Missing, RawBreakpoints::Json)
    }
}

impl From<SlotMap> for BreakpointCollection {
    fn from(mut slots: SlotMap) -> Self {
        slots.retain(|_, list| !list.is_empty());
        Self { slots }
    }
}

impl From<BreakpointCollection> for SlotMap {
    fn from(collection: BreakpointCollection) -> Self {
        collection.slots
    }
}

impl BreakpointCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a collection from whatever the persistence layer handed back.
    ///
    /// Never fails: missing or malformed data yields an empty collection and a
    /// logged diagnostic, so one corrupted passage cannot block the editor.
    pub fn from_raw(raw: impl Into<RawBreakpoints>) -> Self {
        match raw.into() {
            RawBreakpoints::Typed(collection) => collection,
            RawBreakpoints::Missing | RawBreakpoints::Json(serde_json::Value::Null) => {
                log::debug!("No breakpoint data present, starting with an empty collection");
                Self::new()
            }
            RawBreakpoints::Json(value) => match serde_json::from_value::<SlotMap>(value) {
                Ok(slots) => Self::from(slots),
                Err(e) => {
                    log::warn!("Malformed breakpoint data, falling back to empty collection: {e}");
                    Self::new()
                }
            },
        }
    }

    /// Breakpoints at `slot` in stored order; empty for unknown slots
    pub fn get_breakpoints(&self, slot: usize) -> &[Breakpoint] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn add_to_slot(&mut self, slot: usize, breakpoint: Breakpoint) {
        self.slots.entry(slot).or_default().push(breakpoint);
    }

    pub fn delete_breakpoint(
        &mut self,
        slot: usize,
        index_within_slot: usize,
    ) -> Result<Breakpoint, EditError> {
        let Some(list) = self
            .slots
            .get_mut(&slot)
            .filter(|list| index_within_slot < list.len())
        else {
            let err = EditError::BreakpointIndexOutOfRange {
                slot,
                index: index_within_slot,
            };
            log::warn!("delete_breakpoint ignored: {err}");
            return Err(err);
        };
        let removed = list.remove(index_within_slot);
        if list.is_empty() {
            self.slots.remove(&slot);
        }
        Ok(removed)
    }

    /// Remove and return every breakpoint attached to `slot`
    pub fn remove_slot(&mut self, slot: usize) -> Vec<Breakpoint> {
        self.slots.remove(&slot).unwrap_or_default()
    }

    /// Move every breakpoint at a slot >= `from_slot` one slot later.
    ///
    /// Used after a command is inserted at the boundary.
    pub fn shift_slots_down(&mut self, from_slot: usize) {
        let moved = self.slots.split_off(&from_slot);
        for (slot, list) in moved {
            self.slots.insert(slot + 1, list);
        }
    }

    /// Move every breakpoint at a slot >= `from_slot` one slot earlier.
    ///
    /// Used after a command is deleted. A shifted slot landing on an occupied
    /// one is appended after the breakpoints already there.
    pub fn shift_slots_up(&mut self, from_slot: usize) {
        let moved = self.slots.split_off(&from_slot);
        for (slot, list) in moved {
            let target = slot.saturating_sub(1);
            let existing = self.slots.entry(target).or_default();
            if !existing.is_empty() {
                log::debug!("Merging breakpoints of slot {slot} into slot {target}");
            }
            existing.extend(list);
        }
    }

    pub fn set_breakpoint_name(
        &mut self,
        slot: usize,
        index_within_slot: usize,
        new_name: impl Into<String>,
    ) -> Result<(), EditError> {
        match self
            .slots
            .get_mut(&slot)
            .and_then(|list| list.get_mut(index_within_slot))
        {
            Some(breakpoint) => {
                breakpoint.name = new_name.into();
                Ok(())
            }
            None => {
                let err = EditError::BreakpointIndexOutOfRange {
                    slot,
                    index: index_within_slot,
                };
                log::warn!("set_breakpoint_name ignored: {err}");
                Err(err)
            }
        }
    }

    pub fn get_unique_names(&self) -> BTreeSet<String> {
        self.iter().map(|(_, _, bp)| bp.name.clone()).collect()
    }

    /// All names in slot order, duplicates included
    pub fn get_all_names(&self) -> Vec<String> {
        self.iter().map(|(_, _, bp)| bp.name.clone()).collect()
    }

    /// Number of breakpoints whose trimmed name equals `name` trimmed
    pub fn get_name_usage_count(&self, name: &str) -> usize {
        let name = name.trim();
        self.iter()
            .filter(|(_, _, bp)| bp.name.trim() == name)
            .count()
    }

    /// Exact, case-sensitive name lookup
    pub fn has_breakpoint_name(&self, name: &str) -> bool {
        self.iter().any(|(_, _, bp)| bp.name == name)
    }

    /// `base`, or `base(2)`, `base(3)`, ... whichever is first unused
    pub fn generate_unique_name(&self, base: &str) -> String {
        if !self.has_breakpoint_name(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}({n})"))
            .find(|candidate| !self.has_breakpoint_name(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn for_each_breakpoint(&self, mut visitor: impl FnMut(usize, usize, &Breakpoint)) {
        for (slot, index, breakpoint) in self.iter() {
            visitor(slot, index, breakpoint);
        }
    }

    /// Iterate `(slot, index_within_slot, breakpoint)` in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Breakpoint)> + '_ {
        self.slots.iter().flat_map(|(&slot, list)| {
            list.iter()
                .enumerate()
                .map(move |(index, breakpoint)| (slot, index, breakpoint))
        })
    }

    /// Relocate breakpoints attached past `command_count` onto the final slot.
    ///
    /// Returns whether anything moved. Relative order is kept.
    pub fn cleanup_excessive_slots(&mut self, command_count: usize) -> bool {
        let excess = self.slots.split_off(&(command_count + 1));
        if excess.is_empty() {
            return false;
        }
        let moved: usize = excess.values().map(Vec::len).sum();
        log::info!("Relocating {moved} breakpoint(s) past slot {command_count} to the final slot");
        let tail = self.slots.entry(command_count).or_default();
        for (_, list) in excess {
            tail.extend(list);
        }
        true
    }

    /// Highest occupied slot
    pub fn max_slot(&self) -> Option<usize> {
        self.slots.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
