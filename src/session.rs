//! Game session
//!
//! Owns everything that outlives a single level: tuning, the level
//! registry, the unlock counter and the level currently being played.
//! Progress is kept in memory only.

use thiserror::Error;

use crate::level::{LevelDescription, LoadError, builtin};
use crate::sim::{LevelState, LevelStatus, TickInput, TickReport, tick};
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no level with id {0}")]
    UnknownLevel(u32),
    #[error("level {requested} is locked (unlocked up to {unlocked})")]
    LevelLocked { requested: u32, unlocked: u32 },
    #[error("no level is being played")]
    NoActiveLevel,
    #[error("failed to load level: {0}")]
    Load(#[from] LoadError),
}

#[derive(Debug, Clone)]
pub struct GameSession {
    tuning: Tuning,
    levels: Vec<LevelDescription>,
    /// Highest level id that may be started
    max_unlocked: u32,
    current: Option<LevelState>,
}

impl GameSession {
    /// Session over the given levels; only the first is unlocked
    pub fn new(tuning: Tuning, levels: Vec<LevelDescription>) -> Self {
        let max_unlocked = levels.iter().map(|l| l.id).min().unwrap_or(1);
        Self {
            tuning,
            levels,
            max_unlocked,
            current: None,
        }
    }

    pub fn with_builtin_levels(tuning: Tuning) -> Self {
        Self::new(tuning, builtin::all())
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Replace the tuning; takes effect on the next level load
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
    }

    pub fn levels(&self) -> &[LevelDescription] {
        &self.levels
    }

    pub fn max_unlocked_level(&self) -> u32 {
        self.max_unlocked
    }

    pub fn is_unlocked(&self, id: u32) -> bool {
        id <= self.max_unlocked && self.find(id).is_some()
    }

    pub fn current(&self) -> Option<&LevelState> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut LevelState> {
        self.current.as_mut()
    }

    fn find(&self, id: u32) -> Option<&LevelDescription> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Load level `id` from scratch, replacing whatever was being played
    pub fn start_level(&mut self, id: u32) -> Result<&mut LevelState, SessionError> {
        let desc = self.find(id).ok_or(SessionError::UnknownLevel(id))?;
        if id > self.max_unlocked {
            return Err(SessionError::LevelLocked {
                requested: id,
                unlocked: self.max_unlocked,
            });
        }
        let state = desc.load(&self.tuning)?;
        log::info!("Starting level {} \"{}\"", state.level_id, state.name);
        Ok(self.current.insert(state))
    }

    /// Reload the current level from its description
    pub fn restart(&mut self) -> Result<&mut LevelState, SessionError> {
        let id = self.current.as_ref().ok_or(SessionError::NoActiveLevel)?.level_id;
        self.start_level(id)
    }

    /// Id of the level after the current one, if there is one
    pub fn next_level_id(&self) -> Option<u32> {
        let current = self.current.as_ref()?.level_id;
        self.levels.iter().map(|l| l.id).filter(|&id| id > current).min()
    }

    /// Advance the current level by one tick.
    ///
    /// Completing a level unlocks the next one; the finished state stays
    /// in place until the host starts another level. A death reloads the
    /// level immediately, so the report is the only trace of it.
    pub fn step(&mut self, input: &TickInput) -> Result<TickReport, SessionError> {
        let state = self.current.as_mut().ok_or(SessionError::NoActiveLevel)?;
        let report = tick(state, input);
        let status = state.status;

        match status {
            LevelStatus::Playing => {}
            LevelStatus::Complete => {
                if let Some(next) = self.next_level_id() {
                    if next > self.max_unlocked {
                        log::info!("Level {} unlocked", next);
                        self.max_unlocked = next;
                    }
                }
            }
            LevelStatus::Failed(cause) => {
                log::debug!("Restarting after {:?}", cause);
                self.restart()?;
            }
        }
        Ok(report)
    }
}
