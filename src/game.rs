//! Game state machine, timer scheduler and pointer/touch controller.
//!
//! ```text
//! NotStarted --start--> Active --time up--> Ended --restart--> NotStarted
//!                        |  ^
//!                        +--+ start (fresh session)
//! ```
//!
//! The `Active` phase owns the `Session`.  Leaving it cancels the session's
//! timers and drops the session, so no callback from a finished game can run.

use rand::Rng;
use tracing::{debug, info};

use crate::compute::{self, FireOutcome};
use crate::config::GameConfig;
use crate::entities::{GameStatus, Millis};
use crate::error::{Command, GameError};
use crate::session::Session;
use crate::timer::TaskKind;

/// Raw input, already translated into field pixels by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    PointerUp,
    TouchMove { x: f32, y: f32 },
    TouchStart { x: f32, y: f32 },
    /// A finger lifted; `remaining` fingers are still down.
    TouchEnd { remaining: usize },
}

#[derive(Debug)]
enum Phase {
    NotStarted,
    Active(Session),
    Ended { score: u32 },
}

#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    phase: Phase,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Game {
            config,
            phase: Phase::NotStarted,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        match self.phase {
            Phase::NotStarted => GameStatus::NotStarted,
            Phase::Active(_) => GameStatus::Active,
            Phase::Ended { .. } => GameStatus::Ended,
        }
    }

    /// The live session, only while `Active`.
    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.phase {
            Phase::Active(session) => Some(session),
            _ => None,
        }
    }

    /// Current score while playing, final score once ended.
    pub fn score(&self) -> u32 {
        match &self.phase {
            Phase::NotStarted => 0,
            Phase::Active(session) => session.score,
            Phase::Ended { score } => *score,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// Begin a game with a clean session.  Starting while already active
    /// throws the running session away and begins again.
    pub fn start(&mut self, now: Millis) -> Result<(), GameError> {
        match &mut self.phase {
            Phase::NotStarted => {}
            Phase::Active(old) => old.cancel_timers(),
            Phase::Ended { .. } => {
                return Err(GameError::InvalidTransition {
                    from: GameStatus::Ended,
                    command: Command::Start,
                })
            }
        }
        self.phase = Phase::Active(Session::new(&self.config, now));
        info!(now, duration = self.config.game_duration_secs, "game started");
        Ok(())
    }

    /// Back to the start screen after a finished game.
    pub fn restart(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Ended { .. } => {
                self.phase = Phase::NotStarted;
                info!("back to start screen");
                Ok(())
            }
            _ => Err(GameError::InvalidTransition {
                from: self.status(),
                command: Command::Restart,
            }),
        }
    }

    fn end(&mut self) {
        if let Phase::Active(session) = &mut self.phase {
            session.cancel_timers();
            let score = session.score;
            self.phase = Phase::Ended { score };
            info!(score, "game over");
        }
    }

    // ── Scheduler ─────────────────────────────────────────────────────────────

    /// Run every timer task due at or before `now`, oldest first.  Each task
    /// sees its own due time as the clock.  Stops the moment the game ends.
    pub fn advance(&mut self, now: Millis, rng: &mut impl Rng) {
        loop {
            let Phase::Active(session) = &mut self.phase else {
                return;
            };
            let Some((task, due)) = session.timers.next_due(now) else {
                return;
            };
            session.timers.complete(task);

            let time_up = match task {
                TaskKind::Frame => {
                    compute::step_simulation(session, &self.config, due, rng);
                    false
                }
                TaskKind::Spawn => {
                    compute::spawn_vehicle(session, &self.config, rng);
                    false
                }
                TaskKind::Countdown => compute::count_down(session),
                TaskKind::FireRepeat => {
                    let aim = session.aim;
                    compute::fire(session, &self.config, aim.x, aim.y, due);
                    false
                }
            };

            if time_up {
                self.end();
            }
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Feed one input event.  Returns the fire outcome when the event fired.
    pub fn handle_input(&mut self, event: InputEvent, now: Millis) -> Option<FireOutcome> {
        let Phase::Active(session) = &mut self.phase else {
            return None;
        };
        let cfg = &self.config;

        match event {
            InputEvent::PointerMove { x, y } | InputEvent::TouchMove { x, y } => {
                let (x, y) = clamp_to_field(cfg, x, y);
                session.aim.x = x;
                session.aim.y = y;
                None
            }
            InputEvent::PointerDown { x, y } | InputEvent::TouchStart { x, y } => {
                // The first shot goes where the press landed, not to the
                // possibly stale aim point.
                let (x, y) = clamp_to_field(cfg, x, y);
                let outcome = compute::fire(session, cfg, x, y, now);
                session.timers.get_mut(TaskKind::FireRepeat).arm(now);
                debug!(x, y, ?outcome, "spray started");
                Some(outcome)
            }
            InputEvent::PointerUp | InputEvent::TouchEnd { remaining: 0 } => {
                session.timers.get_mut(TaskKind::FireRepeat).cancel();
                None
            }
            InputEvent::TouchEnd { .. } => None,
        }
    }
}

fn clamp_to_field(cfg: &GameConfig, x: f32, y: f32) -> (f32, f32) {
    (x.clamp(0.0, cfg.field_width), y.clamp(0.0, cfg.field_height))
}
