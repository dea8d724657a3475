/*!
 * # Passage Editing Core
 *
 * A passage is persisted as two independent collections: an ordered list of
 * **commands** and a **breakpoint collection** indexed by slot (the gap before
 * command `i`, or after the last command). Authors edit both at once: moving a
 * command must carry the right breakpoints with it, and dragging a breakpoint
 * must land it in the right gap.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Flat Sequence While Editing
 * - [`PositionTracker`] flattens `(commands, breakpoints)` into one list of
 *   [`Element`]s, breakpoints placed *before* the command of their slot
 * - Swap/move/splice work on that list without caring what an element is
 * - [`PositionTracker::evaluate`] folds the list back into the persisted pair;
 *   it is the exact inverse of [`PositionTracker::build`]
 *
 * ### 2. Authoritative Snapshot, Disposable View
 * - [`SequenceEditor`] owns the authoritative [`Passage`](crate::models::Passage)
 * - The tracker is rebuilt from scratch after every authoritative change
 * - Each structural edit runs the cleanup and duplicate-name validation passes,
 *   then hands the new snapshot to a [`PassageSink`]
 *
 * ### 3. Explicit Results
 * - Stale or out-of-range indices produce an [`EditError`] and a logged
 *   warning; state is left untouched and nothing is persisted
 *
 * ## Module Structure
 *
 * - **`breakpoints`**: slot-indexed [`BreakpointCollection`] and raw-data recovery
 * - **`tracker`**: [`PositionTracker`] flatten/evaluate and element moves
 * - **`editor`**: [`SequenceEditor`] authoring operations and boundary policy
 * - **`validation`**: duplicate breakpoint name detection
 * - **`reorder`**: [`ReorderAdapter`] for drag-and-drop surfaces
 * - **`favorites`**: command menu favourites behind a repository trait
 *
 * ## Usage Pattern
 *
 * ```rust
 * use passage_sequence_engine::editing::*;
 * use passage_sequence_engine::models::{CommandKind, Passage};
 *
 * let mut editor = SequenceEditor::new(Passage::default(), EditorSettings::default(), NullSink);
 * editor.add_command(CommandKind::Dialog).unwrap();
 * editor.add_command(CommandKind::Jump).unwrap();
 * let name = editor.add_breakpoint(1, "Checkpoint").unwrap();
 *
 * // Dialog, Checkpoint, Jump
 * assert_eq!(editor.tracker().len(), 3);
 * assert_eq!(editor.passage().breakpoints.get_breakpoints(1)[0].name, name);
 * ```
 */

pub mod breakpoints;
pub mod editor;
pub mod favorites;
pub mod reorder;
pub mod tracker;
pub mod validation;

pub use breakpoints::{BreakpointCollection, RawBreakpoints};
pub use editor::{EditorSettings, InsertBoundary, NullSink, PassageSink, SequenceEditor};
pub use favorites::{CommandMenu, FavoritesRepository, MemoryFavorites, MenuEntry};
pub use reorder::ReorderAdapter;
pub use tracker::{BreakpointLocation, CommandLocation, Element, PositionTracker, format_sequence};
pub use validation::{BreakpointKey, ValidationIssue, ValidationReport};

use crate::models::CommandKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Position {index} out of range for {len} elements")]
    PositionOutOfRange { index: usize, len: usize },
    #[error("Command index {index} out of range for {len} commands")]
    CommandIndexOutOfRange { index: usize, len: usize },
    #[error("Slot {slot} out of range for {command_count} commands")]
    SlotOutOfRange { slot: usize, command_count: usize },
    #[error("No breakpoint at index {index} of slot {slot}")]
    BreakpointIndexOutOfRange { slot: usize, index: usize },
    #[error("Element at position {0} is not a command")]
    NotACommand(usize),
    #[error("Element at position {0} is not a breakpoint")]
    NotABreakpoint(usize),
    #[error("Commands of kind '{0}' have no text field")]
    NoTextField(CommandKind),
    #[error("Breakpoints cannot be stored as commands")]
    BreakpointKindNotAllowed,
}
