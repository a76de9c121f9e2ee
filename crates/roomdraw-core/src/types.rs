//! Core data types shared by every layer of roomdraw.
//!
//! An [`Entry`] is one row of the uploaded dataset: a person and the room
//! slot that row contributes to the draw. The draw treats the two halves
//! independently: the people form the candidate pools and the room slots
//! form the slots to fill. An [`Assignment`] is one filled slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EntryError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An employee identifier as it appears in the uploaded dataset.
///
/// Newtype over `String` so an employee id can't be confused with a room
/// label. Serialized as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// The two canonical gender values the allocator partitions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

/// Accepts the spellings uploaded sheets actually use: the English words,
/// their initials, and the Chinese characters. Case-insensitive, trimmed.
impl FromStr for Gender {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "male" | "m" | "男" => Ok(Self::Male),
            "female" | "f" | "女" => Ok(Self::Female),
            _ => Err(EntryError::UnknownGender(value.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One validated row of the input dataset.
///
/// Fields are private so an `Entry` can only be built through
/// [`Entry::new`], which guarantees both strings are non-empty and trimmed.
/// Once built it is never mutated; the allocator works on clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    employee_id: EmployeeId,
    gender: Gender,
    room_slot: String,
}

impl Entry {
    /// Builds an entry, trimming both labels.
    pub fn new(
        employee_id: impl AsRef<str>,
        gender: Gender,
        room_slot: impl AsRef<str>,
    ) -> Result<Self, EntryError> {
        let employee_id = employee_id.as_ref().trim();
        if employee_id.is_empty() {
            return Err(EntryError::EmptyEmployeeId);
        }
        let room_slot = room_slot.as_ref().trim();
        if room_slot.is_empty() {
            return Err(EntryError::EmptyRoomSlot);
        }
        Ok(Self {
            employee_id: EmployeeId(employee_id.to_string()),
            gender,
            room_slot: room_slot.to_string(),
        })
    }

    pub fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn room_slot(&self) -> &str {
        &self.room_slot
    }

    /// The person half of this row.
    pub fn candidate(&self) -> Candidate {
        Candidate {
            employee_id: self.employee_id.clone(),
            gender: self.gender,
        }
    }
}

/// A person waiting in a gender pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub employee_id: EmployeeId,
    pub gender: Gender,
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// One filled room slot in a draw result.
///
/// Also used for display-only rows (the initial snapshot and rolling
/// previews), which have the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub employee_id: EmployeeId,
    pub gender: Gender,
    pub room_slot: String,
}

impl Assignment {
    pub fn new(candidate: Candidate, room_slot: impl Into<String>) -> Self {
        Self {
            employee_id: candidate.employee_id,
            gender: candidate.gender,
            room_slot: room_slot.into(),
        }
    }
}

impl From<&Entry> for Assignment {
    fn from(entry: &Entry) -> Self {
        Self {
            employee_id: entry.employee_id.clone(),
            gender: entry.gender,
            room_slot: entry.room_slot.clone(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) -> {}", self.employee_id, self.gender, self.room_slot)
    }
}
