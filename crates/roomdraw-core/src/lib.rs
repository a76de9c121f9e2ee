//! Core allocation logic for roomdraw.
//!
//! Everything here is synchronous and pure apart from the caller-supplied
//! random source:
//!
//! - **Types** ([`Entry`], [`Gender`], [`Assignment`]) — validated input
//!   rows and result rows.
//! - **Parsing** ([`ParseRule`], [`parse`]) — room-slot label → base room
//!   and optional sub-unit.
//! - **Grouping** ([`group`]) — slots bucketed into shared and single rooms.
//! - **Pools** ([`GenderPools`], [`shuffle`]) — per-gender FIFO queues and
//!   the Fisher–Yates primitive.
//! - **Allocation** ([`Allocator`], [`allocate`]) — the draw itself.
//!
//! # Randomness
//!
//! Every function that shuffles takes `&mut impl rand::Rng`. Pass a seeded
//! `StdRng` for a reproducible draw.

mod allocator;
mod error;
mod grouper;
mod parser;
mod pools;
mod types;

pub use allocator::{Allocation, Allocator, allocate};
pub use error::EntryError;
pub use grouper::{Grouping, RoomGroup, Slot, group};
pub use parser::{ParseRule, RoomKey, parse};
pub use pools::{GenderPools, shuffle};
pub use types::{Assignment, Candidate, EmployeeId, Entry, Gender};
