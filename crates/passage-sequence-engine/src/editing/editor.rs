//! Authoring operations over a passage.
//!
//! [`SequenceEditor`] owns the authoritative [`Passage`] and keeps a
//! [`PositionTracker`] derived from it. Every successful operation mutates the
//! passage, runs the cleanup and validation passes, rebuilds the tracker and
//! hands the new snapshot to the [`PassageSink`]. A rejected operation returns
//! an [`EditError`], logs a warning and leaves everything untouched.

use serde::{Deserialize, Serialize};

use crate::editing::{EditError, Element, PositionTracker, ValidationIssue, ValidationReport};
use crate::models::{Breakpoint, Command, CommandId, CommandKind, Passage};

/// Where a breakpoint sitting exactly at an insertion slot ends up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertBoundary {
    /// The breakpoint keeps its slot and now precedes the inserted command.
    #[default]
    KeepBefore,
    /// The breakpoint moves along with the command it used to precede.
    ShiftWithCommand,
}

impl InsertBoundary {
    /// First slot that shifts down when a command is inserted at `insert_at`
    pub fn shift_start(self, insert_at: usize) -> usize {
        match self {
            InsertBoundary::KeepBefore => insert_at + 1,
            InsertBoundary::ShiftWithCommand => insert_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub insert_boundary: InsertBoundary,
    /// Base for names generated when a breakpoint is added from the command menu
    pub breakpoint_base_name: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            insert_boundary: InsertBoundary::default(),
            breakpoint_base_name: "Breakpoint".to_string(),
        }
    }
}

/// Receives every new passage snapshot and validation result
pub trait PassageSink {
    fn persist(&mut self, passage: &Passage);

    fn report_validation(&mut self, _report: &ValidationReport) {}
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PassageSink for NullSink {
    fn persist(&mut self, _passage: &Passage) {}
}

pub struct SequenceEditor<S: PassageSink> {
    passage: Passage,
    tracker: PositionTracker,
    validation: ValidationReport,
    settings: EditorSettings,
    sink: S,
}

impl<S: PassageSink> SequenceEditor<S> {
    pub fn new(passage: Passage, settings: EditorSettings, sink: S) -> Self {
        let mut editor = Self {
            passage: Passage::default(),
            tracker: PositionTracker::default(),
            validation: ValidationReport::default(),
            settings,
            sink,
        };
        editor.sync(passage);
        editor
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Validation issue for the element at `pos_index`, if it is a flagged breakpoint
    pub fn issue_at(&self, pos_index: usize) -> Option<&ValidationIssue> {
        let location = self.tracker.evaluate_breakpoint_slot_at(pos_index)?;
        self.validation
            .get(location.slot, location.index_within_slot)
    }

    /// Adopt a newer snapshot from the owner.
    ///
    /// The snapshot may come from an edit that bypassed this editor, so the
    /// cleanup pass runs and a repaired passage is persisted straight away.
    pub fn sync(&mut self, passage: Passage) {
        self.passage = passage;
        let repaired = self.cleanup();
        self.refresh();
        if repaired {
            self.sink.persist(&self.passage);
        }
    }

    /// Append a command of `kind` with empty content.
    ///
    /// The breakpoint kind appends a uniquely named breakpoint to the final
    /// slot instead. Returns the position of the new element.
    pub fn add_command(&mut self, kind: CommandKind) -> Result<usize, EditError> {
        let Some(content) = kind.empty_content() else {
            let slot = self.passage.commands.len();
            let base = self.settings.breakpoint_base_name.clone();
            self.add_breakpoint(slot, &base)?;
            return Ok(self.tracker.len() - 1);
        };
        self.passage.commands.push(Command::with_content(content));
        log::debug!("Appended {kind} command");
        self.commit();
        Ok(self.tracker.len() - 1)
    }

    /// Attach a breakpoint to `slot`, named `base_name` or `base_name(n)` for
    /// the first free `n`. Returns the generated name.
    pub fn add_breakpoint(&mut self, slot: usize, base_name: &str) -> Result<String, EditError> {
        let command_count = self.passage.commands.len();
        if slot > command_count {
            return reject(
                "add_breakpoint",
                EditError::SlotOutOfRange {
                    slot,
                    command_count,
                },
            );
        }
        let name = self.passage.breakpoints.generate_unique_name(base_name);
        self.passage
            .breakpoints
            .add_to_slot(slot, Breakpoint::new(name.clone()));
        log::debug!("Added breakpoint '{name}' at slot {slot}");
        self.commit();
        Ok(name)
    }

    /// Insert a placeholder command at command index `index` (`index == len` appends)
    pub fn add_command_at(&mut self, index: usize) -> Result<CommandId, EditError> {
        let len = self.passage.commands.len();
        if index > len {
            return reject(
                "add_command_at",
                EditError::CommandIndexOutOfRange { index, len },
            );
        }
        let command = Command::placeholder();
        let id = command.id;
        self.passage.commands.insert(index, command);
        self.passage
            .breakpoints
            .shift_slots_down(self.settings.insert_boundary.shift_start(index));
        log::debug!("Inserted placeholder at command {index}");
        self.commit();
        Ok(id)
    }

    /// Insert a copy of command `index` (fresh id) right after it
    pub fn clone_command(&mut self, index: usize) -> Result<CommandId, EditError> {
        let copy = match self.passage.commands.get(index) {
            Some(command) => command.duplicate(),
            None => {
                let len = self.passage.commands.len();
                return reject(
                    "clone_command",
                    EditError::CommandIndexOutOfRange { index, len },
                );
            }
        };
        let id = copy.id;
        let insert_at = index + 1;
        self.passage.commands.insert(insert_at, copy);
        self.passage
            .breakpoints
            .shift_slots_down(self.settings.insert_boundary.shift_start(insert_at));
        log::debug!("Cloned command {index}");
        self.commit();
        Ok(id)
    }

    /// Remove command `index` together with the breakpoints anchored before it
    pub fn delete_command(&mut self, index: usize) -> Result<Command, EditError> {
        let len = self.passage.commands.len();
        if index >= len {
            return reject(
                "delete_command",
                EditError::CommandIndexOutOfRange { index, len },
            );
        }
        let removed = self.passage.commands.remove(index);
        let dropped = self.passage.breakpoints.remove_slot(index);
        self.passage.breakpoints.shift_slots_up(index + 1);
        log::debug!(
            "Deleted command {index} and {} breakpoint(s) anchored to it",
            dropped.len()
        );
        self.commit();
        Ok(removed)
    }

    /// Replace the primary text of the command at position `pos_index`
    pub fn update_command_text(&mut self, text: &str, pos_index: usize) -> Result<(), EditError> {
        let command_index = self.command_index_at("update_command_text", pos_index)?;
        if let Err(err) = self.passage.commands[command_index].content.set_text(text) {
            return reject("update_command_text", err);
        }
        self.commit();
        Ok(())
    }

    /// Change the kind of command `index`, keeping its id.
    ///
    /// Retyping to the current kind changes nothing and does not persist.
    /// The text carries over when both kinds have one. Switching to the
    /// breakpoint kind replaces the command with a uniquely named breakpoint
    /// at the same position.
    pub fn update_command_type(&mut self, index: usize, kind: CommandKind) -> Result<(), EditError> {
        let len = self.passage.commands.len();
        if index >= len {
            return reject(
                "update_command_type",
                EditError::CommandIndexOutOfRange { index, len },
            );
        }
        if self.passage.commands[index].kind() == kind {
            return Ok(());
        }

        let Some(mut content) = kind.empty_content() else {
            let name = self
                .passage
                .breakpoints
                .generate_unique_name(&self.settings.breakpoint_base_name);
            let Some(pos) = self.tracker.position_of_command(index) else {
                return reject(
                    "update_command_type",
                    EditError::CommandIndexOutOfRange { index, len },
                );
            };
            let replaced = self.tracker.with_splice(
                pos,
                1,
                [Element::Breakpoint(Breakpoint::new(name.clone()))],
            );
            self.passage = replaced.to_passage();
            log::debug!("Turned command {index} into breakpoint '{name}'");
            self.commit();
            return Ok(());
        };

        let command = &mut self.passage.commands[index];
        if let Some(text) = command.content.text() {
            // Kinds without text simply start empty
            let _ = content.set_text(text);
        }
        command.content = content;
        self.commit();
        Ok(())
    }

    pub fn update_whole_command(
        &mut self,
        index: usize,
        new_command: Command,
    ) -> Result<(), EditError> {
        let len = self.passage.commands.len();
        let Some(slot) = self.passage.commands.get_mut(index) else {
            return reject(
                "update_whole_command",
                EditError::CommandIndexOutOfRange { index, len },
            );
        };
        *slot = new_command;
        self.commit();
        Ok(())
    }

    pub fn swap_elements(&mut self, index_a: usize, index_b: usize) -> Result<(), EditError> {
        self.check_position("swap_elements", index_a)?;
        self.check_position("swap_elements", index_b)?;
        self.passage = self.tracker.with_swap(index_a, index_b).to_passage();
        self.commit();
        Ok(())
    }

    /// Swap with the previous element, wrapping from the first to the last.
    /// Returns the element's new position.
    pub fn move_element_up(&mut self, pos_index: usize) -> Result<usize, EditError> {
        self.check_position("move_element_up", pos_index)?;
        let target = if pos_index == 0 {
            self.tracker.len() - 1
        } else {
            pos_index - 1
        };
        self.swap_elements(pos_index, target)?;
        Ok(target)
    }

    /// Swap with the next element, wrapping from the last to the first.
    /// Returns the element's new position.
    pub fn move_element_down(&mut self, pos_index: usize) -> Result<usize, EditError> {
        self.check_position("move_element_down", pos_index)?;
        let target = if pos_index + 1 == self.tracker.len() {
            0
        } else {
            pos_index + 1
        };
        self.swap_elements(pos_index, target)?;
        Ok(target)
    }

    /// List-move an element from one position to another
    pub fn move_element(&mut self, from_index: usize, to_index: usize) -> Result<(), EditError> {
        self.check_position("move_element", from_index)?;
        self.check_position("move_element", to_index)?;
        if from_index == to_index {
            return Ok(());
        }
        self.passage = self.tracker.with_move(from_index, to_index).to_passage();
        self.commit();
        Ok(())
    }

    /// Rename the breakpoint at position `pos_index`
    pub fn update_breakpoint_text(&mut self, pos_index: usize, name: &str) -> Result<(), EditError> {
        let (slot, index_within_slot) = self.breakpoint_slot_at("update_breakpoint_text", pos_index)?;
        self.passage
            .breakpoints
            .set_breakpoint_name(slot, index_within_slot, name)?;
        self.commit();
        Ok(())
    }

    /// Remove the breakpoint at position `pos_index`
    pub fn remove_breakpoint(&mut self, pos_index: usize) -> Result<Breakpoint, EditError> {
        let (slot, index_within_slot) = self.breakpoint_slot_at("remove_breakpoint", pos_index)?;
        let removed = self
            .passage
            .breakpoints
            .delete_breakpoint(slot, index_within_slot)?;
        log::debug!("Removed breakpoint '{}' from slot {slot}", removed.name);
        self.commit();
        Ok(removed)
    }

    fn check_position(&self, op: &str, pos_index: usize) -> Result<(), EditError> {
        let len = self.tracker.len();
        if pos_index >= len {
            return reject(
                op,
                EditError::PositionOutOfRange {
                    index: pos_index,
                    len,
                },
            );
        }
        Ok(())
    }

    fn command_index_at(&self, op: &str, pos_index: usize) -> Result<usize, EditError> {
        self.check_position(op, pos_index)?;
        match self.tracker.evaluate_command_index_at(pos_index) {
            Some(location) => Ok(location.command_index),
            None => reject(op, EditError::NotACommand(pos_index)),
        }
    }

    fn breakpoint_slot_at(&self, op: &str, pos_index: usize) -> Result<(usize, usize), EditError> {
        self.check_position(op, pos_index)?;
        match self.tracker.evaluate_breakpoint_slot_at(pos_index) {
            Some(location) => Ok((location.slot, location.index_within_slot)),
            None => reject(op, EditError::NotABreakpoint(pos_index)),
        }
    }

    fn cleanup(&mut self) -> bool {
        let command_count = self.passage.commands.len();
        self.passage
            .breakpoints
            .cleanup_excessive_slots(command_count)
    }

    fn refresh(&mut self) {
        self.tracker = PositionTracker::from_passage(&self.passage);
        self.validation = ValidationReport::check(&self.passage.breakpoints);
        self.sink.report_validation(&self.validation);
    }

    fn commit(&mut self) {
        self.cleanup();
        self.refresh();
        self.sink.persist(&self.passage);
    }
}

fn reject<T>(op: &str, err: EditError) -> Result<T, EditError> {
    log::warn!("{op} ignored: {err}");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::BreakpointCollection;
    use crate::models::CommandContent;
    use crate::tests::{RecordingSink, commands, slot_names, summaries};
    use pretty_assertions::assert_eq;

    fn editor_with(texts: &[&str]) -> SequenceEditor<RecordingSink> {
        let passage = Passage::new(commands(texts), BreakpointCollection::new());
        SequenceEditor::new(passage, EditorSettings::default(), RecordingSink::default())
    }

    #[test]
    fn test_new_does_not_persist_clean_passage() {
        let editor = editor_with(&["A", "B"]);
        assert!(editor.sink().persisted.is_empty());
        assert_eq!(editor.tracker().len(), 2);
    }

    #[test]
    fn test_new_repairs_and_persists_stranded_breakpoints() {
        let mut breakpoints = BreakpointCollection::new();
        breakpoints.add_to_slot(9, Breakpoint::new("Lost"));
        let passage = Passage::new(commands(&["A"]), breakpoints);

        let editor = SequenceEditor::new(passage, EditorSettings::default(), RecordingSink::default());

        assert_eq!(editor.sink().persisted.len(), 1);
        assert_eq!(slot_names(&editor.passage().breakpoints, 1), vec!["Lost"]);
    }

    #[test]
    fn test_add_command_appends_and_persists() {
        let mut editor = editor_with(&["A"]);
        let pos = editor.add_command(CommandKind::Delay).unwrap();

        assert_eq!(pos, 1);
        assert_eq!(editor.passage().commands[1].kind(), CommandKind::Delay);
        assert_eq!(editor.sink().persisted.len(), 1);
        assert_eq!(editor.sink().last().commands.len(), 2);
    }

    #[test]
    fn test_add_command_breakpoint_kind_adds_breakpoint_instead() {
        let mut editor = editor_with(&["A", "B"]);
        let pos = editor.add_command(CommandKind::Breakpoint).unwrap();

        assert_eq!(editor.passage().commands.len(), 2);
        assert_eq!(pos, 2);
        assert_eq!(slot_names(&editor.passage().breakpoints, 2), vec!["Breakpoint"]);

        editor.add_command(CommandKind::Breakpoint).unwrap();
        assert_eq!(
            slot_names(&editor.passage().breakpoints, 2),
            vec!["Breakpoint", "Breakpoint(2)"]
        );
    }

    #[test]
    fn test_add_breakpoint_rejects_slot_past_end() {
        let mut editor = editor_with(&["A"]);
        assert_eq!(
            editor.add_breakpoint(2, "Tag"),
            Err(EditError::SlotOutOfRange {
                slot: 2,
                command_count: 1
            })
        );
        assert!(editor.sink().persisted.is_empty());
    }

    #[test]
    fn test_add_command_at_keep_before() {
        let mut editor = editor_with(&["A", "B"]);
        editor.add_breakpoint(1, "AtOne").unwrap();
        editor.add_breakpoint(2, "AtTwo").unwrap();

        editor.add_command_at(1).unwrap();

        assert_eq!(summaries(&editor.passage().commands), vec!["A", "", "B"]);
        assert_eq!(slot_names(&editor.passage().breakpoints, 1), vec!["AtOne"]);
        assert_eq!(slot_names(&editor.passage().breakpoints, 3), vec!["AtTwo"]);
    }

    #[test]
    fn test_add_command_at_shift_with_command() {
        let settings = EditorSettings {
            insert_boundary: InsertBoundary::ShiftWithCommand,
            ..EditorSettings::default()
        };
        let mut editor = SequenceEditor::new(
            Passage::new(commands(&["A", "B"]), BreakpointCollection::new()),
            settings,
            RecordingSink::default(),
        );
        editor.add_breakpoint(1, "AtOne").unwrap();

        editor.add_command_at(1).unwrap();

        assert!(editor.passage().breakpoints.get_breakpoints(1).is_empty());
        assert_eq!(slot_names(&editor.passage().breakpoints, 2), vec!["AtOne"]);
    }

    #[test]
    fn test_add_command_at_end_and_out_of_range() {
        let mut editor = editor_with(&["A"]);
        editor.add_command_at(1).unwrap();
        assert_eq!(editor.passage().commands.len(), 2);

        assert!(matches!(
            editor.add_command_at(5),
            Err(EditError::CommandIndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_clone_command() {
        let mut editor = editor_with(&["A", "B"]);
        editor.add_breakpoint(1, "AfterA").unwrap();
        editor.add_breakpoint(2, "AfterB").unwrap();

        let id = editor.clone_command(0).unwrap();

        let commands = &editor.passage().commands;
        assert_eq!(summaries(commands), vec!["A", "A", "B"]);
        assert_eq!(commands[1].id, id);
        assert_ne!(commands[0].id, commands[1].id);
        // The breakpoint after A stays put, between A and its copy
        assert_eq!(slot_names(&editor.passage().breakpoints, 1), vec!["AfterA"]);
        assert_eq!(slot_names(&editor.passage().breakpoints, 3), vec!["AfterB"]);
    }

    #[test]
    fn test_delete_command_drops_anchored_breakpoints() {
        let mut editor = editor_with(&["A", "B", "C"]);
        editor.add_breakpoint(1, "BeforeB").unwrap();
        editor.add_breakpoint(2, "BeforeC").unwrap();
        editor.add_breakpoint(3, "End").unwrap();

        let removed = editor.delete_command(1).unwrap();

        assert_eq!(removed.content.summary(), "B");
        let breakpoints = &editor.passage().breakpoints;
        assert_eq!(breakpoints.get_all_names(), vec!["BeforeC", "End"]);
        assert_eq!(slot_names(breakpoints, 1), vec!["BeforeC"]);
        assert_eq!(slot_names(breakpoints, 2), vec!["End"]);
    }

    #[test]
    fn test_delete_command_out_of_range_is_rejected() {
        let mut editor = editor_with(&["A"]);
        assert!(editor.delete_command(1).is_err());
        assert_eq!(editor.passage().commands.len(), 1);
        assert!(editor.sink().persisted.is_empty());
    }

    #[test]
    fn test_update_command_text() {
        let mut editor = editor_with(&["A", "B"]);
        editor.add_breakpoint(0, "Start").unwrap();

        // Position 2 is B, after the breakpoint and A
        editor.update_command_text("Bee", 2).unwrap();
        assert_eq!(summaries(&editor.passage().commands), vec!["A", "Bee"]);

        assert_eq!(
            editor.update_command_text("x", 0),
            Err(EditError::NotACommand(0))
        );
        assert_eq!(
            editor.update_command_text("x", 3),
            Err(EditError::PositionOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_update_command_text_rejects_kind_without_text() {
        let mut editor = editor_with(&[]);
        editor.add_command(CommandKind::Delay).unwrap();
        assert_eq!(
            editor.update_command_text("soon", 0),
            Err(EditError::NoTextField(CommandKind::Delay))
        );
    }

    #[test]
    fn test_update_command_type_keeps_id_and_text() {
        let mut editor = editor_with(&["Ending"]);
        let id = editor.passage().commands[0].id;

        editor.update_command_type(0, CommandKind::Jump).unwrap();

        let command = &editor.passage().commands[0];
        assert_eq!(command.id, id);
        assert_eq!(command.kind(), CommandKind::Jump);
        assert_eq!(command.content.text(), Some("Ending"));

        editor.update_command_type(0, CommandKind::Menu).unwrap();
        assert_eq!(editor.passage().commands[0].content.text(), None);
    }

    #[test]
    fn test_update_command_type_to_same_kind_keeps_content() {
        let dialog = Command::with_content(CommandContent::Dialog {
            speaker: Some("Ava".to_string()),
            text: "Hi".to_string(),
        });
        let delay = Command::with_content(CommandContent::Delay { millis: 500 });
        let passage = Passage::new(
            vec![dialog.clone(), delay.clone()],
            BreakpointCollection::new(),
        );
        let mut editor =
            SequenceEditor::new(passage, EditorSettings::default(), RecordingSink::default());

        editor.update_command_type(0, CommandKind::Dialog).unwrap();
        editor.update_command_type(1, CommandKind::Delay).unwrap();

        assert_eq!(editor.passage().commands, vec![dialog, delay]);
        assert!(editor.sink().persisted.is_empty());
    }

    #[test]
    fn test_update_command_type_to_breakpoint_replaces_command() {
        let mut editor = editor_with(&["A", "B", "C"]);
        editor.add_breakpoint(1, "Before").unwrap();
        editor.add_breakpoint(2, "After").unwrap();

        editor.update_command_type(1, CommandKind::Breakpoint).unwrap();

        assert_eq!(summaries(&editor.passage().commands), vec!["A", "C"]);
        assert_eq!(
            slot_names(&editor.passage().breakpoints, 1),
            vec!["Before", "Breakpoint", "After"]
        );
    }

    #[test]
    fn test_update_whole_command() {
        let mut editor = editor_with(&["A"]);
        let replacement = Command::new(CommandKind::Script).unwrap();
        editor.update_whole_command(0, replacement.clone()).unwrap();
        assert_eq!(editor.passage().commands[0], replacement);
        assert!(editor.update_whole_command(1, replacement).is_err());
    }

    #[test]
    fn test_move_up_wraps_to_end() {
        let mut editor = editor_with(&["A", "B", "C"]);
        let new_pos = editor.move_element_up(0).unwrap();

        assert_eq!(new_pos, 2);
        assert_eq!(summaries(&editor.passage().commands), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_move_down_wraps_to_start() {
        let mut editor = editor_with(&["A", "B", "C"]);
        let new_pos = editor.move_element_down(2).unwrap();

        assert_eq!(new_pos, 0);
        assert_eq!(summaries(&editor.passage().commands), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_move_breakpoint_down_past_command() {
        let mut editor = editor_with(&["A", "B"]);
        editor.add_breakpoint(0, "Start").unwrap();

        editor.move_element_down(0).unwrap();

        assert!(editor.passage().breakpoints.get_breakpoints(0).is_empty());
        assert_eq!(slot_names(&editor.passage().breakpoints, 1), vec!["Start"]);
        assert!(editor.tracker().is_command_element(0));
    }

    #[test]
    fn test_move_on_empty_passage_is_rejected() {
        let mut editor = editor_with(&[]);
        assert_eq!(
            editor.move_element_up(0),
            Err(EditError::PositionOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_move_element() {
        let mut editor = editor_with(&["A", "B", "C"]);
        editor.move_element(2, 0).unwrap();
        assert_eq!(summaries(&editor.passage().commands), vec!["C", "A", "B"]);

        let persisted = editor.sink().persisted.len();
        editor.move_element(1, 1).unwrap();
        assert_eq!(editor.sink().persisted.len(), persisted);
    }

    #[test]
    fn test_rename_and_remove_breakpoint() {
        let mut editor = editor_with(&["A"]);
        editor.add_breakpoint(1, "End").unwrap();

        editor.update_breakpoint_text(1, "Finale").unwrap();
        assert_eq!(editor.passage().breakpoints.get_all_names(), vec!["Finale"]);

        assert_eq!(
            editor.update_breakpoint_text(0, "Nope"),
            Err(EditError::NotABreakpoint(0))
        );

        let removed = editor.remove_breakpoint(1).unwrap();
        assert_eq!(removed.name, "Finale");
        assert!(editor.passage().breakpoints.is_empty());
        assert_eq!(editor.tracker().len(), 1);
    }

    #[test]
    fn test_validation_is_reported_to_sink() {
        let mut editor = editor_with(&["A", "B"]);
        editor.add_breakpoint(0, "Start").unwrap();
        editor.add_breakpoint(2, "Other").unwrap();

        // Position 3 is "Other" after A and B
        editor.update_breakpoint_text(3, "Start").unwrap();

        assert_eq!(editor.validation().len(), 2);
        assert_eq!(editor.sink().last_report().len(), 2);
        assert!(editor.issue_at(0).is_some());
        assert!(editor.issue_at(1).is_none());
    }

    #[test]
    fn test_sync_adopts_newer_snapshot() {
        let mut editor = editor_with(&["A"]);
        let newer = Passage::new(commands(&["X", "Y"]), BreakpointCollection::new());

        editor.sync(newer.clone());

        assert_eq!(editor.passage(), &newer);
        assert_eq!(editor.tracker().len(), 2);
        assert!(editor.sink().persisted.is_empty());
    }
}
