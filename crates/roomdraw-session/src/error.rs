//! Error types for the session layer.
//!
//! Draw operations themselves never fail; invalid call sequences are
//! no-ops. These errors only describe a session that can't be reached.

use crate::DrawId;

#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// No session with this id is registered with the manager.
    #[error("draw {0} not found")]
    NotFound(DrawId),

    /// The session actor has shut down, so its command channel is closed.
    #[error("draw {0} is unavailable")]
    Unavailable(DrawId),
}
