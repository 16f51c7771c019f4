//! Restore ordering against scene initialization
//!
//! Single-threaded and cooperative: the host calls [`RestoreSequencer::tick`]
//! once per frame. The sequencer suspends (returns) while waiting for the
//! world to be ready and for anchors to register, and runs each restore
//! phase synchronously within one tick.
//!
//! ```text
//! Idle -> AwaitWorldReady -> RestoringBoxes -> AwaitAnchorRegistration
//!      -> RestoringPlaceholders -> Done
//! ```
//!
//! There is no timeout: if the world never becomes ready the sequencer
//! waits forever.

use crate::catalog::TemplateCatalog;
use crate::config::{RegistrationGate, RestoreConfig};
use crate::persistence::{RecordRepository, RecordStore};
use crate::restore::{RestoreReport, restore_boxes, restore_placeholders};
use crate::world::{AnchorRegistry, World};

/// What the host is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Menus, loading screens: nothing to restore
    Menu,
    /// The shop floor
    Gameplay,
}

/// Restore progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    AwaitWorldReady,
    RestoringBoxes,
    AwaitAnchorRegistration,
    RestoringPlaceholders,
    Done,
}

/// Everything a tick may touch, borrowed for the duration of that tick
pub struct RestoreEnv<'a, S: RecordStore, C: TemplateCatalog + ?Sized> {
    pub repository: &'a mut RecordRepository<S>,
    pub catalog: &'a C,
    pub world: &'a mut World,
    pub registry: &'a AnchorRegistry,
}

/// One-shot restore driver for a single scene load
#[derive(Debug, Clone)]
pub struct RestoreSequencer {
    state: SequencerState,
    gate: RegistrationGate,
    world_ready: bool,
    turns_waiting: u32,
    report: RestoreReport,
}

impl RestoreSequencer {
    pub fn new(gate: RegistrationGate) -> Self {
        Self {
            state: SequencerState::Idle,
            gate,
            world_ready: false,
            turns_waiting: 0,
            report: RestoreReport::default(),
        }
    }

    pub fn from_config(config: &RestoreConfig) -> Self {
        Self::new(config.registration_gate)
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SequencerState::Done
    }

    /// Counts from the phases run so far
    pub fn report(&self) -> &RestoreReport {
        &self.report
    }

    /// Begin restoring for a freshly loaded scene. Only gameplay sessions
    /// restore; the registry is reset so the new scene's anchors can
    /// register. Returns whether the sequencer started.
    pub fn start(&mut self, mode: SessionMode, registry: &mut AnchorRegistry) -> bool {
        if self.state != SequencerState::Idle {
            log::warn!("Restore sequencer already started ({:?})", self.state);
            return false;
        }
        if mode != SessionMode::Gameplay {
            return false;
        }

        registry.reset();
        self.enter(SequencerState::AwaitWorldReady);
        true
    }

    /// World objects exist and persistence is available. Later calls are
    /// ignored.
    pub fn notify_world_ready(&mut self) {
        if !self.world_ready {
            log::debug!("World ready");
            self.world_ready = true;
        }
    }

    /// Advance until the next suspension point
    pub fn tick<S, C>(&mut self, env: &mut RestoreEnv<'_, S, C>) -> SequencerState
    where
        S: RecordStore,
        C: TemplateCatalog + ?Sized,
    {
        loop {
            match self.state {
                SequencerState::Idle | SequencerState::Done => break,
                SequencerState::AwaitWorldReady => {
                    if !self.world_ready {
                        break;
                    }
                    self.enter(SequencerState::RestoringBoxes);
                }
                SequencerState::RestoringBoxes => {
                    let boxes = env.repository.load_boxes();
                    let config = env.repository.config();
                    self.report = restore_boxes(&boxes, env.catalog, env.world, config);
                    self.turns_waiting = 0;
                    self.enter(SequencerState::AwaitAnchorRegistration);
                    // Anchors register during the following turns
                    break;
                }
                SequencerState::AwaitAnchorRegistration => {
                    self.turns_waiting += 1;
                    if !self.registration_complete(env.registry) {
                        break;
                    }
                    self.enter(SequencerState::RestoringPlaceholders);
                }
                SequencerState::RestoringPlaceholders => {
                    let placeholders = env.repository.load_placeholders();
                    let config = env.repository.config();
                    self.report.placeholders = restore_placeholders(
                        &placeholders,
                        env.registry,
                        env.catalog,
                        env.world,
                        config,
                    );
                    self.enter(SequencerState::Done);
                    log::info!("Restore complete: {:?}", self.report);
                }
            }
        }
        self.state
    }

    /// Sealing the registry always opens the barrier
    fn registration_complete(&self, registry: &AnchorRegistry) -> bool {
        if registry.is_sealed() {
            return true;
        }
        match self.gate {
            RegistrationGate::ExpectedCount(n) => registry.len() >= n,
            RegistrationGate::Signal => false,
            RegistrationGate::FixedTurns(n) => self.turns_waiting >= n,
        }
    }

    fn enter(&mut self, next: SequencerState) {
        log::debug!("Restore sequencer: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
