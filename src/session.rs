//! Per-game session context.
//!
//! Created when a game becomes active and dropped when it stops being active,
//! so nothing from one game (vehicles, score, timers) can leak into the next.

use crate::config::GameConfig;
use crate::entities::{AimPoint, Millis, Shot, Vehicle};
use crate::timer::{SessionTimers, TaskKind};

#[derive(Clone, Debug)]
pub struct Session {
    pub vehicles: Vec<Vehicle>,
    /// Shot visuals still on screen.
    pub shots: Vec<Shot>,
    pub score: u32,
    /// Whole seconds left on the clock.
    pub time_left: u32,
    pub aim: AimPoint,
    /// Time of the last accepted fire, for the cooldown.
    pub(crate) last_fire: Option<Millis>,
    pub(crate) timers: SessionTimers,
    next_id: u64,
}

impl Session {
    /// Fresh session with its frame, spawn and countdown timers armed from `now`.
    pub fn new(cfg: &GameConfig, now: Millis) -> Self {
        let mut timers = SessionTimers::new(cfg);
        timers.arm_session(now);
        Session {
            vehicles: Vec::new(),
            shots: Vec::new(),
            score: 0,
            time_left: cfg.game_duration_secs,
            aim: AimPoint {
                x: cfg.field_width / 2.0,
                y: cfg.field_height / 2.0,
            },
            last_fire: None,
            timers,
            next_id: 0,
        }
    }

    pub fn timers(&self) -> &SessionTimers {
        &self.timers
    }

    /// True while the pointer is held and auto-fire is armed.
    pub fn is_spraying(&self) -> bool {
        self.timers.get(TaskKind::FireRepeat).is_armed()
    }

    pub fn vehicle(&self, id: u64) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub(crate) fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Stop every periodic task.  Idempotent.
    pub(crate) fn cancel_timers(&mut self) {
        self.timers.cancel_all();
    }
}

