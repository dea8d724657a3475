use serde::{Deserialize, Serialize};

use crate::editing::BreakpointCollection;
use crate::models::Command;

/// The persisted pair of a passage: ordered commands plus breakpoints by slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub commands: Vec<Command>,
    #[serde(default)]
    pub breakpoints: BreakpointCollection,
}

impl Passage {
    pub fn new(commands: Vec<Command>, breakpoints: BreakpointCollection) -> Self {
        Self {
            commands,
            breakpoints,
        }
    }
}
