/// Which way to replay history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

/// Key signals the controller reacts to.
///
/// Everything else a surface might receive is none of the controller's
/// business and passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    /// Enter; line breaks are never inserted
    LineBreak,
    /// A key that inserts or deletes characters
    Edit,
}

impl KeyCommand {
    /// Map a key name (`"z"`, `"Enter"`, `"Backspace"`, ...) and the state of
    /// the primary modifier onto a command.
    pub fn from_key(key: &str, ctrl: bool) -> Option<Self> {
        match (key, ctrl) {
            ("z" | "Z", true) => Some(Self::Undo),
            ("y" | "Y", true) => Some(Self::Redo),
            (_, true) => None,
            ("Enter", false) => Some(Self::LineBreak),
            ("Backspace" | "Delete", false) => Some(Self::Edit),
            (key, false) if key.chars().count() == 1 => Some(Self::Edit),
            _ => None,
        }
    }
}
