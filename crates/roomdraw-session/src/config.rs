//! Session configuration, identity, and the draw state machine.

use std::fmt;
use std::time::Duration;

use roomdraw_core::ParseRule;
use roomdraw_tick::{TickConfig, TickPolicy};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DrawId
// ---------------------------------------------------------------------------

/// Identifies one draw session within a [`DrawManager`](crate::DrawManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawId(pub u64);

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DrawConfig
// ---------------------------------------------------------------------------

/// Configuration for a draw session.
///
/// Every field has a default, so a partial JSON object (or `{}`)
/// deserializes into a usable config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Time between rolling preview frames.
    pub tick_interval: Duration,

    /// How a late preview tick is rescheduled: `"skip"` restarts the
    /// cadence from now, `"drop"` keeps the original one.
    pub tick_policy: TickPolicy,

    /// Capacity of the session's command channel.
    pub channel_size: usize,

    /// Seed for the session's random source. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// How room-slot labels are split into base room and sub-unit.
    pub parse_rule: ParseRule,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            tick_interval: TickConfig::DEFAULT_INTERVAL,
            tick_policy: TickPolicy::default(),
            channel_size: 64,
            seed: None,
            parse_rule: ParseRule::default(),
        }
    }
}

impl DrawConfig {
    /// Fixes out-of-range values: `channel_size` is at least 1 and
    /// `tick_interval` at least [`TickConfig::MIN_INTERVAL`].
    pub fn validated(mut self) -> Self {
        self.channel_size = self.channel_size.max(1);
        self.tick_interval = self.tick_interval.max(TickConfig::MIN_INTERVAL);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            interval: self.tick_interval,
            policy: self.tick_policy,
        }
    }
}

// ---------------------------------------------------------------------------
// DrawState
// ---------------------------------------------------------------------------

/// The lifecycle state of a draw session.
///
/// ```text
///            initialize            start_rolling            stop_rolling
/// Idle ─────────────────→ Loaded ───────────────→ Rolling ───────────────→ Committed
///                           ↑                        │  ↑                      │
///                           └──── initialize ────────┘  └──── start_rolling ───┘
/// ```
///
/// `initialize` is accepted in every state and always lands in `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawState {
    /// No dataset loaded.
    Idle,
    /// Dataset loaded, nothing drawn yet.
    Loaded,
    /// Preview frames are being published.
    Rolling,
    /// The last draw result is available.
    Committed,
}

impl DrawState {
    /// Returns `true` if a roll can begin from this state.
    pub fn can_start_rolling(&self) -> bool {
        matches!(self, Self::Loaded | Self::Committed)
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self, Self::Rolling)
    }

    pub fn has_dataset(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for DrawState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loaded => write!(f, "Loaded"),
            Self::Rolling => write!(f, "Rolling"),
            Self::Committed => write!(f, "Committed"),
        }
    }
}
