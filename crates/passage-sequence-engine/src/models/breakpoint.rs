use serde::{Deserialize, Serialize};

/// A named anchor between commands, referenced by jumps and menu options.
///
/// Breakpoints carry no identity beyond their name and their position; two
/// breakpoints sharing a name is a reportable state, not an impossibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
}

impl Breakpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
