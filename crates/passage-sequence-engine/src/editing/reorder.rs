//! Bridge between a drag-and-drop surface and the editor.
//!
//! The surface only sees positional ids (`item-0`, `item-1`, ...). They are
//! derived from the editor's current element count on every call, so they
//! follow every structural change but are not stable keys; pair them with the
//! command id when rendering.

use crate::editing::{EditError, PassageSink, PositionTracker, SequenceEditor};

const ITEM_PREFIX: &str = "item-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReorderAdapter;

impl ReorderAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn item_id(pos_index: usize) -> String {
        format!("{ITEM_PREFIX}{pos_index}")
    }

    pub fn parse_item_id(item_id: &str) -> Option<usize> {
        item_id.strip_prefix(ITEM_PREFIX)?.parse().ok()
    }

    /// Ids for every element currently in `tracker`
    pub fn item_ids(&self, tracker: &PositionTracker) -> Vec<String> {
        (0..tracker.len()).map(Self::item_id).collect()
    }

    /// Apply a drop of `active_id` onto `over_id`.
    ///
    /// Returns whether anything moved. Drops outside any item, onto the item
    /// itself, or with ids past the current element count are ignored.
    pub fn on_drag_end<S: PassageSink>(
        &self,
        editor: &mut SequenceEditor<S>,
        active_id: &str,
        over_id: Option<&str>,
    ) -> Result<bool, EditError> {
        let Some(over_id) = over_id else {
            return Ok(false);
        };
        let len = editor.tracker().len();
        let resolve = |item_id: &str| Self::parse_item_id(item_id).filter(|&i| i < len);
        let (Some(from_index), Some(to_index)) = (resolve(active_id), resolve(over_id)) else {
            log::warn!("Drop of '{active_id}' onto '{over_id}' ignored: unknown item");
            return Ok(false);
        };
        self.on_move(editor, from_index, to_index)
    }

    /// Apply a move expressed directly as positions
    pub fn on_move<S: PassageSink>(
        &self,
        editor: &mut SequenceEditor<S>,
        from_index: usize,
        to_index: usize,
    ) -> Result<bool, EditError> {
        if from_index == to_index {
            return Ok(false);
        }
        editor.move_element(from_index, to_index)?;
        Ok(true)
    }
}
