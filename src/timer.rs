//! Cancellable periodic tasks.
//!
//! Nothing here sleeps or spawns threads.  An `Interval` only remembers when
//! it is next due; the game's scheduler asks the `SessionTimers` which task
//! is due and runs it.  Cancelling is a matter of forgetting the due time.

use crate::config::GameConfig;
use crate::entities::Millis;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    period: Millis,
    next_due: Option<Millis>,
}

impl Interval {
    pub fn new(period: Millis) -> Self {
        Interval {
            period: period.max(1),
            next_due: None,
        }
    }

    /// First run one period after `now`.  Re-arming replaces the previous
    /// registration; an interval is never scheduled twice.
    pub fn arm(&mut self, now: Millis) {
        self.next_due = Some(now + self.period);
    }

    /// Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.next_due
    }

    pub fn period(&self) -> Millis {
        self.period
    }

    /// Mark the pending run as done and schedule the next one.
    fn complete(&mut self) {
        if let Some(due) = self.next_due {
            self.next_due = Some(due + self.period);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Simulation step, once per display frame.
    Frame,
    Spawn,
    /// One-second countdown.
    Countdown,
    /// Auto-fire while the pointer is held.
    FireRepeat,
}

/// The four periodic callbacks a session owns.
#[derive(Clone, Debug)]
pub struct SessionTimers {
    frame: Interval,
    spawn: Interval,
    countdown: Interval,
    fire_repeat: Interval,
}

impl SessionTimers {
    pub fn new(cfg: &GameConfig) -> Self {
        SessionTimers {
            frame: Interval::new(cfg.frame_ms),
            spawn: Interval::new(cfg.spawn_interval_ms),
            countdown: Interval::new(cfg.countdown_ms),
            fire_repeat: Interval::new(cfg.shot_cooldown_ms),
        }
    }

    /// Arm the tasks that run for the whole session.  Fire-repeat waits for a press.
    pub fn arm_session(&mut self, now: Millis) {
        self.frame.arm(now);
        self.spawn.arm(now);
        self.countdown.arm(now);
    }

    pub fn cancel_all(&mut self) {
        self.frame.cancel();
        self.spawn.cancel();
        self.countdown.cancel();
        self.fire_repeat.cancel();
    }

    pub fn any_armed(&self) -> bool {
        [&self.frame, &self.spawn, &self.countdown, &self.fire_repeat]
            .iter()
            .any(|t| t.is_armed())
    }

    pub fn get(&self, kind: TaskKind) -> &Interval {
        match kind {
            TaskKind::Frame => &self.frame,
            TaskKind::Spawn => &self.spawn,
            TaskKind::Countdown => &self.countdown,
            TaskKind::FireRepeat => &self.fire_repeat,
        }
    }

    pub fn get_mut(&mut self, kind: TaskKind) -> &mut Interval {
        match kind {
            TaskKind::Frame => &mut self.frame,
            TaskKind::Spawn => &mut self.spawn,
            TaskKind::Countdown => &mut self.countdown,
            TaskKind::FireRepeat => &mut self.fire_repeat,
        }
    }

    /// The earliest task due at or before `now`, with its due time.
    /// Ties go to the task listed first in `TaskKind`.
    pub fn next_due(&self, now: Millis) -> Option<(TaskKind, Millis)> {
        [
            TaskKind::Frame,
            TaskKind::Spawn,
            TaskKind::Countdown,
            TaskKind::FireRepeat,
        ]
        .into_iter()
        .filter_map(|kind| self.get(kind).next_due().map(|due| (kind, due)))
        .filter(|&(_, due)| due <= now)
        .min_by_key(|&(_, due)| due)
    }

    /// Advance `kind` past the run that was just taken from `next_due`.
    pub fn complete(&mut self, kind: TaskKind) {
        self.get_mut(kind).complete();
    }
}
