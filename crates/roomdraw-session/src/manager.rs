//! Draw manager: creates, tracks, and shuts down draw sessions.

use std::collections::HashMap;

use rand::Rng;

use crate::{DrawConfig, DrawError, DrawId, RollSession};

/// Owns any number of independent draw sessions.
///
/// Each session is its own actor with its own dataset and random source;
/// sessions never share state. Ids are allocated per manager.
pub struct DrawManager {
    config: DrawConfig,
    draws: HashMap<DrawId, RollSession>,
    next_id: u64,
}

impl DrawManager {
    /// Creates an empty manager; new sessions use `config`.
    pub fn new(config: DrawConfig) -> Self {
        Self {
            config,
            draws: HashMap::new(),
            next_id: 1,
        }
    }

    /// Spawns a new session and returns its id.
    pub fn create_draw(&mut self) -> DrawId {
        let draw_id = self.allocate_id();
        let session = RollSession::spawn(draw_id, self.config.clone());
        self.register(session)
    }

    /// Spawns a new session that draws from `rng`.
    pub fn create_draw_with_rng<R>(&mut self, rng: R) -> DrawId
    where
        R: Rng + Send + 'static,
    {
        let draw_id = self.allocate_id();
        let session = RollSession::spawn_with_rng(draw_id, self.config.clone(), rng);
        self.register(session)
    }

    /// Returns a handle to a session.
    pub fn session(&self, draw_id: DrawId) -> Result<RollSession, DrawError> {
        self.draws
            .get(&draw_id)
            .cloned()
            .ok_or(DrawError::NotFound(draw_id))
    }

    /// Shuts a session down and forgets it.
    pub async fn destroy_draw(&mut self, draw_id: DrawId) -> Result<(), DrawError> {
        let session = self
            .draws
            .remove(&draw_id)
            .ok_or(DrawError::NotFound(draw_id))?;

        // Already stopped is fine: the goal is a stopped session.
        let _ = session.shutdown().await;

        tracing::info!(%draw_id, "draw destroyed");
        Ok(())
    }

    /// Shuts every session down.
    pub async fn shutdown_all(&mut self) {
        for (draw_id, session) in self.draws.drain() {
            let _ = session.shutdown().await;
            tracing::debug!(%draw_id, "draw shut down");
        }
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn draw_ids(&self) -> Vec<DrawId> {
        self.draws.keys().copied().collect()
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    fn allocate_id(&mut self) -> DrawId {
        let draw_id = DrawId(self.next_id);
        self.next_id += 1;
        draw_id
    }

    fn register(&mut self, session: RollSession) -> DrawId {
        let draw_id = session.draw_id();
        self.draws.insert(draw_id, session);
        tracing::info!(%draw_id, "draw created");
        draw_id
    }
}

impl Default for DrawManager {
    fn default() -> Self {
        Self::new(DrawConfig::default())
    }
}
