//! Error types for session edits.

use thiserror::Error;

/// The kind of edit being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    AddItem,
    SetQuantity,
    SetDescription,
    SetPrice,
    ToggleEveryone,
    ToggleParticipant,
    RemoveItem,
}

/// Error returned by [`Session::apply`](super::Session::apply).
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("{0:?}: row {1} out of range ({2} items)")]
    RowNotFound(EditKind, usize, usize),

    #[error("{0:?}: unknown participant '{1}'")]
    UnknownParticipant(EditKind, String),

    #[error("{0:?}: invalid value {1}, expected a non-negative number")]
    InvalidValue(EditKind, f64),
}
