//! Draw session actor: an isolated Tokio task that owns one draw.
//!
//! The actor owns the original dataset, the current snapshot, the random
//! source, the tick scheduler, and the active preview callback. Callers
//! talk to it through a cloneable [`RollSession`] handle. Ticks and
//! commands are handled one at a time by the same loop, so a preview frame
//! can never interleave with a commit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roomdraw_core::{Allocator, Assignment, Entry};
use roomdraw_tick::{TickInfo, TickScheduler};
use tokio::sync::{mpsc, oneshot};

use crate::preview::preview_frame;
use crate::{DrawConfig, DrawError, DrawId, DrawState};

/// Receives snapshots from a session: `(rows, is_rolling)`.
///
/// Called with `is_rolling = true` for every preview frame and once with
/// `is_rolling = false` for the committed result. Runs on the session's
/// task, so it should return quickly.
pub type OnUpdate = Box<dyn FnMut(&[Assignment], bool) + Send>;

/// Commands sent to a session actor through its channel.
///
/// Variants with a `reply` are request/response; the caller awaits the
/// `oneshot` receiver.
enum SessionCommand {
    Initialize {
        entries: Vec<Entry>,
        reply: oneshot::Sender<()>,
    },
    StartRolling {
        on_update: OnUpdate,
        reply: oneshot::Sender<DrawState>,
    },
    StopRolling {
        on_update: OnUpdate,
        reply: oneshot::Sender<Vec<Assignment>>,
    },
    CurrentData {
        reply: oneshot::Sender<Vec<Assignment>>,
    },
    OriginalData {
        reply: oneshot::Sender<Vec<Entry>>,
    },
    GetState {
        reply: oneshot::Sender<DrawState>,
    },
    Shutdown,
}

/// Handle to a running draw session.
///
/// Cheap to clone; every clone talks to the same session. The session
/// stops when [`shutdown`](Self::shutdown) is called or the last handle is
/// dropped.
#[derive(Clone)]
pub struct RollSession {
    draw_id: DrawId,
    sender: mpsc::Sender<SessionCommand>,
}

impl RollSession {
    /// Spawns a session on the current Tokio runtime.
    ///
    /// The random source is a `StdRng` seeded from `config.seed`, or from
    /// the OS when no seed is set.
    pub fn spawn(draw_id: DrawId, config: DrawConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::spawn_with_rng(draw_id, config, rng)
    }

    /// Spawns a session that draws from the given random source.
    pub fn spawn_with_rng<R>(draw_id: DrawId, config: DrawConfig, rng: R) -> Self
    where
        R: Rng + Send + 'static,
    {
        let config = config.validated();
        let (tx, rx) = mpsc::channel(config.channel_size);

        let actor = SessionActor {
            draw_id,
            state: DrawState::Idle,
            allocator: Allocator::new(config.parse_rule),
            original: Vec::new(),
            current: Vec::new(),
            rng,
            scheduler: TickScheduler::new(config.tick_config()),
            on_update: None,
            receiver: rx,
        };

        tokio::spawn(actor.run());

        Self { draw_id, sender: tx }
    }

    pub fn draw_id(&self) -> DrawId {
        self.draw_id
    }

    /// Loads a dataset, replacing any previous one.
    ///
    /// Cancels an active roll without a final callback. The current
    /// snapshot becomes the dataset itself, row for row.
    pub async fn initialize(&self, entries: Vec<Entry>) -> Result<(), DrawError> {
        self.request(|reply| SessionCommand::Initialize { entries, reply })
            .await
    }

    /// Starts publishing preview frames to `on_update`.
    ///
    /// Returns the state after the call. Only `Loaded` and `Committed`
    /// sessions start rolling; otherwise nothing changes and `on_update` is
    /// dropped unused.
    pub async fn start_rolling<F>(&self, on_update: F) -> Result<DrawState, DrawError>
    where
        F: FnMut(&[Assignment], bool) + Send + 'static,
    {
        let on_update: OnUpdate = Box::new(on_update);
        self.request(|reply| SessionCommand::StartRolling { on_update, reply })
            .await
    }

    /// Stops rolling and commits a fresh draw.
    ///
    /// The preview is cancelled before the allocator runs. The result
    /// becomes the current snapshot, is passed to `on_update` and returned.
    /// If the session isn't rolling, returns the current snapshot unchanged
    /// and doesn't call `on_update`.
    pub async fn stop_rolling<F>(&self, on_update: F) -> Result<Vec<Assignment>, DrawError>
    where
        F: FnMut(&[Assignment], bool) + Send + 'static,
    {
        let on_update: OnUpdate = Box::new(on_update);
        self.request(|reply| SessionCommand::StopRolling { on_update, reply })
            .await
    }

    /// The current snapshot; empty before [`initialize`](Self::initialize).
    pub async fn current_data(&self) -> Result<Vec<Assignment>, DrawError> {
        self.request(|reply| SessionCommand::CurrentData { reply })
            .await
    }

    /// The dataset as loaded.
    pub async fn original_data(&self) -> Result<Vec<Entry>, DrawError> {
        self.request(|reply| SessionCommand::OriginalData { reply })
            .await
    }

    pub async fn state(&self) -> Result<DrawState, DrawError> {
        self.request(|reply| SessionCommand::GetState { reply })
            .await
    }

    /// Tells the session to stop. Any active roll ends without a final
    /// callback.
    pub async fn shutdown(&self) -> Result<(), DrawError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| DrawError::Unavailable(self.draw_id))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, DrawError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| DrawError::Unavailable(self.draw_id))?;
        reply_rx
            .await
            .map_err(|_| DrawError::Unavailable(self.draw_id))
    }
}

/// The session state owned by the actor task.
struct SessionActor<R> {
    draw_id: DrawId,
    state: DrawState,
    allocator: Allocator,
    original: Vec<Entry>,
    current: Vec<Assignment>,
    rng: R,
    scheduler: TickScheduler,
    /// Preview callback; present only while rolling.
    on_update: Option<OnUpdate>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<R: Rng> SessionActor<R> {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!(draw_id = %self.draw_id, "draw session started");

        loop {
            tokio::select! {
                // Commands first: a stop that arrives together with a due
                // tick is handled before that tick.
                biased;

                cmd = self.receiver.recv() => match cmd {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                info = self.scheduler.wait_for_tick() => self.handle_tick(info),
            }
        }

        self.cancel_roll();
        tracing::info!(
            draw_id = %self.draw_id,
            ticks = self.scheduler.tick_count(),
            late_ticks = self.scheduler.total_overruns(),
            "draw session stopped"
        );
    }

    fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Initialize { entries, reply } => {
                self.handle_initialize(entries);
                let _ = reply.send(());
            }
            SessionCommand::StartRolling { on_update, reply } => {
                let state = self.handle_start_rolling(on_update);
                let _ = reply.send(state);
            }
            SessionCommand::StopRolling { on_update, reply } => {
                let result = self.handle_stop_rolling(on_update);
                let _ = reply.send(result);
            }
            SessionCommand::CurrentData { reply } => {
                let _ = reply.send(self.current.clone());
            }
            SessionCommand::OriginalData { reply } => {
                let _ = reply.send(self.original.clone());
            }
            SessionCommand::GetState { reply } => {
                let _ = reply.send(self.state);
            }
            // Handled by the run loop.
            SessionCommand::Shutdown => {}
        }
    }

    fn handle_initialize(&mut self, entries: Vec<Entry>) {
        if self.state.is_rolling() {
            tracing::debug!(draw_id = %self.draw_id, "initialize cancels active roll");
        }
        self.cancel_roll();
        self.current = entries.iter().map(Assignment::from).collect();
        self.original = entries;
        self.state = DrawState::Loaded;
        tracing::info!(
            draw_id = %self.draw_id,
            entries = self.original.len(),
            "dataset loaded"
        );
    }

    fn handle_start_rolling(&mut self, on_update: OnUpdate) -> DrawState {
        if !self.state.can_start_rolling() {
            tracing::debug!(
                draw_id = %self.draw_id,
                state = %self.state,
                "start_rolling ignored"
            );
            return self.state;
        }

        self.on_update = Some(on_update);
        self.scheduler.resume();
        self.state = DrawState::Rolling;
        tracing::debug!(draw_id = %self.draw_id, "rolling started");
        self.state
    }

    fn handle_stop_rolling(&mut self, mut on_update: OnUpdate) -> Vec<Assignment> {
        if !self.state.is_rolling() {
            tracing::debug!(
                draw_id = %self.draw_id,
                state = %self.state,
                "stop_rolling ignored"
            );
            return self.current.clone();
        }

        // Cancel the preview before drawing.
        self.cancel_roll();

        let allocation = self
            .allocator
            .allocate_detailed(&self.original, &mut self.rng);
        if !allocation.unfilled_slots.is_empty() || !allocation.unplaced.is_empty() {
            tracing::warn!(
                draw_id = %self.draw_id,
                unfilled = allocation.unfilled_slots.len(),
                unplaced = allocation.unplaced.len(),
                "draw left rooms or people unmatched"
            );
        }
        self.current = allocation.assignments;
        self.state = DrawState::Committed;
        tracing::info!(
            draw_id = %self.draw_id,
            assigned = self.current.len(),
            "draw committed"
        );

        on_update(&self.current, false);
        self.current.clone()
    }

    fn handle_tick(&mut self, info: TickInfo) {
        let Some(on_update) = self.on_update.as_mut() else {
            return;
        };
        let frame = preview_frame(&self.original, &mut self.rng);
        tracing::trace!(draw_id = %self.draw_id, tick = info.tick, "preview frame");
        on_update(&frame, true);
    }

    /// Stops the tick and drops the preview callback.
    fn cancel_roll(&mut self) {
        self.scheduler.pause();
        self.on_update = None;
    }
}
