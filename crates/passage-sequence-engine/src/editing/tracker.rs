//! Flattened view over a passage's commands and breakpoints.
//!
//! The tracker holds a single ordered list of [`Element`]s. For every command
//! index `i`, the breakpoints of slot `i` come first (in stored order), then
//! the command; the breakpoints of the final slot close the list. Evaluating
//! walks the list once with a running slot counter, which makes
//! `evaluate(build(c, b)) == (c, b)` for every valid pair.
//!
//! Trackers are never patched in place. Every `with_*` operation clones and
//! returns a new tracker, so callers may keep the previous one around.

use std::fmt::Write;

use crate::editing::BreakpointCollection;
use crate::models::{Breakpoint, Command, Passage};

/// One positionable unit of the flattened sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Command(Command),
    Breakpoint(Breakpoint),
}

impl Element {
    pub fn is_command(&self) -> bool {
        matches!(self, Element::Command(_))
    }

    pub fn is_breakpoint(&self) -> bool {
        matches!(self, Element::Breakpoint(_))
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Element::Command(command) => Some(command),
            Element::Breakpoint(_) => None,
        }
    }

    pub fn as_breakpoint(&self) -> Option<&Breakpoint> {
        match self {
            Element::Breakpoint(breakpoint) => Some(breakpoint),
            Element::Command(_) => None,
        }
    }
}

/// Where a command element sits in the persisted command list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLocation<'a> {
    pub command_index: usize,
    pub command: &'a Command,
}

/// Where a breakpoint element sits in the persisted breakpoint collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointLocation<'a> {
    pub slot: usize,
    pub index_within_slot: usize,
    pub breakpoint: &'a Breakpoint,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionTracker {
    elements: Vec<Element>,
}

impl PositionTracker {
    pub fn build(commands: &[Command], breakpoints: &BreakpointCollection) -> Self {
        let command_count = commands.len();
        let mut elements = Vec::with_capacity(command_count + breakpoints.len());

        for (slot, command) in commands.iter().enumerate() {
            elements.extend(
                breakpoints
                    .get_breakpoints(slot)
                    .iter()
                    .cloned()
                    .map(Element::Breakpoint),
            );
            elements.push(Element::Command(command.clone()));
        }

        // Final slot. Anything attached past it lands here too rather than
        // silently vanishing from the view.
        if breakpoints.max_slot().is_some_and(|max| max > command_count) {
            log::warn!(
                "Breakpoints attached past slot {command_count}, placing them after the last command"
            );
        }
        elements.extend(
            breakpoints
                .iter()
                .filter(|&(slot, _, _)| slot >= command_count)
                .map(|(_, _, breakpoint)| Element::Breakpoint(breakpoint.clone())),
        );

        Self { elements }
    }

    pub fn from_passage(passage: &Passage) -> Self {
        Self::build(&passage.commands, &passage.breakpoints)
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Fold the element order back into `(commands, breakpoints)`
    pub fn evaluate(&self) -> (Vec<Command>, BreakpointCollection) {
        let mut commands = Vec::new();
        let mut breakpoints = BreakpointCollection::new();
        let mut slot = 0;

        for element in &self.elements {
            match element {
                Element::Command(command) => {
                    commands.push(command.clone());
                    slot += 1;
                }
                Element::Breakpoint(breakpoint) => {
                    breakpoints.add_to_slot(slot, breakpoint.clone());
                }
            }
        }

        (commands, breakpoints)
    }

    pub fn to_passage(&self) -> Passage {
        let (commands, breakpoints) = self.evaluate();
        Passage::new(commands, breakpoints)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn command_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_command()).count()
    }

    pub fn get_element_at(&self, pos_index: usize) -> Option<&Element> {
        self.elements.get(pos_index)
    }

    pub fn is_command_element(&self, pos_index: usize) -> bool {
        self.get_element_at(pos_index).is_some_and(Element::is_command)
    }

    pub fn is_breakpoint_element(&self, pos_index: usize) -> bool {
        self.get_element_at(pos_index)
            .is_some_and(Element::is_breakpoint)
    }

    /// Command index of the element at `pos_index`; `None` unless it is a command
    pub fn evaluate_command_index_at(&self, pos_index: usize) -> Option<CommandLocation<'_>> {
        let command = self.get_element_at(pos_index)?.as_command()?;
        let command_index = self.elements[..pos_index]
            .iter()
            .filter(|e| e.is_command())
            .count();
        Some(CommandLocation {
            command_index,
            command,
        })
    }

    /// Slot and in-slot index of the element at `pos_index`; `None` unless it
    /// is a breakpoint
    pub fn evaluate_breakpoint_slot_at(&self, pos_index: usize) -> Option<BreakpointLocation<'_>> {
        let breakpoint = self.get_element_at(pos_index)?.as_breakpoint()?;
        let before = &self.elements[..pos_index];
        let slot = before.iter().filter(|e| e.is_command()).count();
        let index_within_slot = before
            .iter()
            .rev()
            .take_while(|e| e.is_breakpoint())
            .count();
        Some(BreakpointLocation {
            slot,
            index_within_slot,
            breakpoint,
        })
    }

    /// Position of the `command_index`-th command element
    pub fn position_of_command(&self, command_index: usize) -> Option<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_command())
            .nth(command_index)
            .map(|(pos, _)| pos)
    }

    /// Position of a breakpoint given its slot and in-slot index
    pub fn position_of_breakpoint(&self, slot: usize, index_within_slot: usize) -> Option<usize> {
        let slot_start = if slot == 0 {
            0
        } else {
            self.position_of_command(slot - 1)? + 1
        };
        let pos = slot_start + index_within_slot;
        self.is_breakpoint_element(pos)
            .then_some(pos)
            .filter(|&pos| {
                self.elements[slot_start..=pos]
                    .iter()
                    .all(Element::is_breakpoint)
            })
    }

    /// Clone with the elements at `index_a` and `index_b` exchanged.
    ///
    /// Out-of-range indices yield an unmodified clone.
    pub fn with_swap(&self, index_a: usize, index_b: usize) -> Self {
        let mut next = self.clone();
        let len = next.len();
        if index_a >= len || index_b >= len {
            log::warn!("Swap {index_a} <-> {index_b} ignored: only {len} elements");
            return next;
        }
        next.elements.swap(index_a, index_b);
        next
    }

    /// Clone with the element at `from_index` removed and reinserted at
    /// `to_index` (list-move, not swap).
    pub fn with_move(&self, from_index: usize, to_index: usize) -> Self {
        let mut next = self.clone();
        let len = next.len();
        if from_index >= len || to_index >= len {
            log::warn!("Move {from_index} -> {to_index} ignored: only {len} elements");
            return next;
        }
        if from_index != to_index {
            let element = next.elements.remove(from_index);
            next.elements.insert(to_index, element);
        }
        next
    }

    /// Clone with `delete_count` elements from `start_index` replaced by `items`.
    ///
    /// `start_index` past the end is clamped to an append.
    pub fn with_splice(
        &self,
        start_index: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = Element>,
    ) -> Self {
        let mut next = self.clone();
        let len = next.len();
        let start = if start_index > len {
            log::warn!("Splice start {start_index} past end of {len} elements, appending");
            len
        } else {
            start_index
        };
        let end = start.saturating_add(delete_count).min(len);
        next.elements.splice(start..end, items);
        next
    }
}

/// Render the sequence as one line per element, for logs and snapshot tests
pub fn format_sequence(tracker: &PositionTracker) -> String {
    let mut out = String::new();
    let mut slot = 0;
    for (pos, element) in tracker.elements().iter().enumerate() {
        match element {
            Element::Command(command) => {
                let summary = command.content.summary();
                if summary.is_empty() {
                    let _ = writeln!(out, "{pos}: {}", command.kind());
                } else {
                    let _ = writeln!(out, "{pos}: {} {summary:?}", command.kind());
                }
                slot += 1;
            }
            Element::Breakpoint(breakpoint) => {
                let _ = writeln!(out, "{pos}: ◆ {} (slot {slot})", breakpoint.name);
            }
        }
    }
    out
}
