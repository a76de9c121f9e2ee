//! Draw sessions for roomdraw.
//!
//! A draw session holds one dataset and runs the lottery over it: a
//! rolling preview that shuffles names and rooms on screen, then a stop
//! that commits one real allocation.
//!
//! # Key types
//!
//! - [`RollSession`] — handle to a running session actor
//! - [`DrawState`] — `Idle → Loaded → Rolling → Committed`
//! - [`DrawConfig`] — tick interval, seed, room-label rule
//! - [`DrawManager`] — owns many independent sessions
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade / binaries (above)  ← load datasets, render updates
//!     ↕
//! Session layer (this crate) ← roll/stop lifecycle, preview ticks
//!     ↕
//! Core + tick (below)        ← allocation algorithm, timer
//! ```

mod config;
mod error;
mod manager;
mod preview;
mod session;

pub use config::{DrawConfig, DrawId, DrawState};
pub use error::DrawError;
pub use manager::DrawManager;
pub use preview::preview_frame;
pub use session::{OnUpdate, RollSession};

pub use roomdraw_tick::TickPolicy;
