//! Error types for the core layer.
//!
//! The allocation algorithm itself is total and never fails. These errors
//! only arise while turning raw input rows into validated [`Entry`] values.
//!
//! [`Entry`]: crate::Entry

/// Errors raised while constructing an [`Entry`](crate::Entry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// The employee id was empty after trimming.
    #[error("employee id is empty")]
    EmptyEmployeeId,

    /// The room slot label was empty after trimming.
    #[error("room slot is empty")]
    EmptyRoomSlot,

    /// The gender value is not one of the recognised spellings.
    #[error("unknown gender value {0:?}")]
    UnknownGender(String),
}
