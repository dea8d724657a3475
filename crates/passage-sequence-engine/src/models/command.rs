use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::EditError;

/// Stable identifier for a command, preserved across reorders and edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub Uuid);

impl CommandId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of command an author can pick from the command menu.
///
/// `Breakpoint` is not a real command: choosing it inserts a named breakpoint
/// into the passage instead of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Placeholder,
    Dialog,
    ShowCharacter,
    HideCharacter,
    Jump,
    Menu,
    Delay,
    Script,
    Comment,
    Breakpoint,
}

impl CommandKind {
    /// All kinds in menu order
    pub const ALL: [CommandKind; 10] = [
        CommandKind::Placeholder,
        CommandKind::Dialog,
        CommandKind::ShowCharacter,
        CommandKind::HideCharacter,
        CommandKind::Jump,
        CommandKind::Menu,
        CommandKind::Delay,
        CommandKind::Script,
        CommandKind::Comment,
        CommandKind::Breakpoint,
    ];

    pub fn produces_breakpoint(self) -> bool {
        matches!(self, CommandKind::Breakpoint)
    }

    /// Empty payload for a freshly created command of this kind
    ///
    /// Returns `None` for the breakpoint pseudo-kind, which has no command form.
    pub fn empty_content(self) -> Option<CommandContent> {
        let content = match self {
            CommandKind::Placeholder => CommandContent::Placeholder,
            CommandKind::Dialog => CommandContent::Dialog {
                speaker: None,
                text: String::new(),
            },
            CommandKind::ShowCharacter => CommandContent::ShowCharacter {
                character: String::new(),
                position: None,
            },
            CommandKind::HideCharacter => CommandContent::HideCharacter {
                character: String::new(),
            },
            CommandKind::Jump => CommandContent::Jump {
                target: String::new(),
            },
            CommandKind::Menu => CommandContent::Menu {
                options: Vec::new(),
            },
            CommandKind::Delay => CommandContent::Delay { millis: 0 },
            CommandKind::Script => CommandContent::Script {
                source: String::new(),
            },
            CommandKind::Comment => CommandContent::Comment {
                text: String::new(),
            },
            CommandKind::Breakpoint => return None,
        };
        Some(content)
    }

    pub fn label(self) -> &'static str {
        match self {
            CommandKind::Placeholder => "new command",
            CommandKind::Dialog => "dialog",
            CommandKind::ShowCharacter => "show character",
            CommandKind::HideCharacter => "hide character",
            CommandKind::Jump => "jump",
            CommandKind::Menu => "menu",
            CommandKind::Delay => "delay",
            CommandKind::Script => "script",
            CommandKind::Comment => "comment",
            CommandKind::Breakpoint => "breakpoint",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One option of a menu command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    pub text: String,
    /// Name of the breakpoint this option jumps to
    pub target: String,
}

/// Command payload, keyed by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandContent {
    Placeholder,
    Dialog {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        text: String,
    },
    ShowCharacter {
        character: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<String>,
    },
    HideCharacter {
        character: String,
    },
    Jump {
        target: String,
    },
    Menu {
        options: Vec<MenuOption>,
    },
    Delay {
        millis: u64,
    },
    Script {
        source: String,
    },
    Comment {
        text: String,
    },
}

impl CommandContent {
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandContent::Placeholder => CommandKind::Placeholder,
            CommandContent::Dialog { .. } => CommandKind::Dialog,
            CommandContent::ShowCharacter { .. } => CommandKind::ShowCharacter,
            CommandContent::HideCharacter { .. } => CommandKind::HideCharacter,
            CommandContent::Jump { .. } => CommandKind::Jump,
            CommandContent::Menu { .. } => CommandKind::Menu,
            CommandContent::Delay { .. } => CommandKind::Delay,
            CommandContent::Script { .. } => CommandKind::Script,
            CommandContent::Comment { .. } => CommandKind::Comment,
        }
    }

    /// The primary editable text of this payload, if the kind has one
    pub fn text(&self) -> Option<&str> {
        match self {
            CommandContent::Dialog { text, .. } | CommandContent::Comment { text } => Some(text),
            CommandContent::ShowCharacter { character, .. }
            | CommandContent::HideCharacter { character } => Some(character),
            CommandContent::Jump { target } => Some(target),
            CommandContent::Script { source } => Some(source),
            CommandContent::Placeholder
            | CommandContent::Menu { .. }
            | CommandContent::Delay { .. } => None,
        }
    }

    /// Replace the primary text field
    pub fn set_text(&mut self, new_text: impl Into<String>) -> Result<(), EditError> {
        let kind = self.kind();
        let slot = match self {
            CommandContent::Dialog { text, .. } | CommandContent::Comment { text } => text,
            CommandContent::ShowCharacter { character, .. }
            | CommandContent::HideCharacter { character } => character,
            CommandContent::Jump { target } => target,
            CommandContent::Script { source } => source,
            CommandContent::Placeholder
            | CommandContent::Menu { .. }
            | CommandContent::Delay { .. } => {
                return Err(EditError::NoTextField(kind));
            }
        };
        *slot = new_text.into();
        Ok(())
    }

    /// Short human-readable description for list rendering
    pub fn summary(&self) -> String {
        match self {
            CommandContent::Placeholder => String::new(),
            CommandContent::Dialog {
                speaker: Some(speaker),
                text,
            } => format!("{speaker}: {text}"),
            CommandContent::Menu { options } => options
                .iter()
                .map(|o| format!("[{} -> {}]", o.text, o.target))
                .collect::<Vec<_>>()
                .join(" "),
            CommandContent::Delay { millis } => format!("{millis}ms"),
            other => other.text().unwrap_or_default().to_string(),
        }
    }
}

/// One authoring instruction in a passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    #[serde(flatten)]
    pub content: CommandContent,
}

impl Command {
    /// Create a command of the given kind with empty content and a fresh id
    ///
    /// Fails for the breakpoint pseudo-kind.
    pub fn new(kind: CommandKind) -> Result<Self, EditError> {
        let content = kind
            .empty_content()
            .ok_or(EditError::BreakpointKindNotAllowed)?;
        Ok(Self::with_content(content))
    }

    pub fn placeholder() -> Self {
        Self::with_content(CommandContent::Placeholder)
    }

    pub fn with_content(content: CommandContent) -> Self {
        Self {
            id: CommandId::new(),
            content,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.content.kind()
    }

    /// Deep copy carrying a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: CommandId::new(),
            content: self.content.clone(),
        }
    }
}
