//! # roomdraw
//!
//! Room lottery that keeps every shared room single-gender.
//!
//! Load a dataset of `(employee, gender, room slot)` rows, roll a preview
//! for as long as the audience watches, then stop to commit one random
//! allocation in which every multi-bed room is occupied by one gender.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomdraw::prelude::*;
//!
//! # async fn run() -> Result<(), RoomdrawError> {
//! let entries = entries_from_json(r#"[
//!     { "employee_id": "E1", "gender": "Male", "room_slot": "南-16-1-1001-A" },
//!     { "employee_id": "E2", "gender": "Male", "room_slot": "南-16-1-1001-B" }
//! ]"#)?;
//!
//! let session = RollSession::spawn(DrawId(1), DrawConfig::default());
//! session.initialize(entries).await?;
//! session.start_rolling(|rows: &[Assignment], _rolling: bool| {
//!     println!("{} rows", rows.len());
//! }).await?;
//! let result = session.stop_rolling(|_: &[Assignment], _: bool| {}).await?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod intake;

pub use error::RoomdrawError;

use roomdraw_core::Assignment;

pub mod prelude {
    pub use crate::RoomdrawError;
    pub use crate::intake::{EntryRecord, entries_from_json, entries_from_reader, entries_from_records};
    pub use crate::{init_tracing, sort_by_room_label};
    pub use roomdraw_core::{
        Allocation, Allocator, Assignment, EmployeeId, Entry, Gender, ParseRule, allocate,
    };
    pub use roomdraw_session::{
        DrawConfig, DrawError, DrawId, DrawManager, DrawState, OnUpdate, RollSession, TickPolicy,
    };
}

/// Sorts rows lexically by room label, the order printed room lists use.
///
/// Draw results come out in random order; sorting is the consumer's call.
pub fn sort_by_room_label(rows: &mut [Assignment]) {
    rows.sort_by(|a, b| a.room_slot.cmp(&b.room_slot));
}

/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
