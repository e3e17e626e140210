//! Game-logic steps run by the session's timers and by the fire controller.
//!
//! Every function takes the session by `&mut` plus the config.  All
//! randomness comes through an injected `Rng`, and all time through an
//! explicit `now`, so a seeded RNG and a fake clock reproduce a game exactly.

use rand::Rng;
use tracing::debug;

use crate::collision::test_hit;
use crate::config::GameConfig;
use crate::entities::{Millis, Shot, Vehicle, VehicleColor};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// Still cooling down; nothing was recorded.
    Rejected,
    Fired { shot_id: u64, hits: u32 },
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Put a new car at the bottom of the road.  Returns its id.
pub fn spawn_vehicle(session: &mut Session, cfg: &GameConfig, rng: &mut impl Rng) -> u64 {
    let id = session.next_id();
    let lane = rng.gen_range(0..cfg.lane_count);
    let speed = rng.gen_range(cfg.speed_min..=cfg.speed_max);
    let color = VehicleColor::ALL[rng.gen_range(0..VehicleColor::ALL.len())];
    let burst_dir = if rng.gen_bool(0.5) { -1 } else { 1 };

    session.vehicles.push(Vehicle {
        id,
        lane,
        x: 0.0,
        y: cfg.spawn_depth(),
        speed,
        color,
        burst_dir,
        hit_at: None,
    });
    debug!(id, lane, speed, "vehicle spawned");
    id
}

// ── Per-frame step ────────────────────────────────────────────────────────────

/// Advance one frame: move unhit cars, retire cars that left the field or
/// finished their hit effect, and drop faded shot visuals.
pub fn step_simulation(session: &mut Session, cfg: &GameConfig, now: Millis, rng: &mut impl Rng) {
    session
        .vehicles
        .retain_mut(|vehicle| advance_vehicle(vehicle, cfg, now, rng));
    prune_shots(session, cfg, now);
}

/// Returns whether the vehicle stays in play.
fn advance_vehicle(
    vehicle: &mut Vehicle,
    cfg: &GameConfig,
    now: Millis,
    rng: &mut impl Rng,
) -> bool {
    if let Some(hit_at) = vehicle.hit_at {
        // Frozen in place until the effect has played out.
        return now.saturating_sub(hit_at) <= cfg.hit_effect_ms;
    }

    vehicle.y -= vehicle.speed;

    if rng.gen_bool(cfg.drift_chance) {
        let nudge = (rng.gen::<f32>() - 0.5) * cfg.drift_magnitude;
        let limit = cfg.drift_limit();
        vehicle.x = (vehicle.x + nudge).clamp(-limit, limit);
    }

    vehicle.y >= cfg.despawn_depth()
}

pub fn prune_shots(session: &mut Session, cfg: &GameConfig, now: Millis) {
    session.shots.retain(|shot| shot.age(now) < cfg.shot_visual_ms);
}

// ── Countdown ─────────────────────────────────────────────────────────────────

/// One tick of the game clock.  Returns `true` once time has run out.
pub fn count_down(session: &mut Session) -> bool {
    session.time_left = session.time_left.saturating_sub(1);
    session.time_left == 0
}

// ── Fire ──────────────────────────────────────────────────────────────────────

/// Spray at `(x, y)`.
///
/// Every unhit car whose exhaust covers the point is hit in the same pass,
/// one point each.  Cars that are already hit, or that the frame step removed
/// a moment ago, simply don't match.
pub fn fire(session: &mut Session, cfg: &GameConfig, x: f32, y: f32, now: Millis) -> FireOutcome {
    if let Some(last) = session.last_fire {
        if now.saturating_sub(last) < cfg.shot_cooldown_ms {
            debug!(now, last, "fire rejected: cooling down");
            return FireOutcome::Rejected;
        }
    }
    session.last_fire = Some(now);

    let shot = Shot {
        id: session.next_id(),
        x,
        y,
        fired_at: now,
    };
    session.shots.push(shot);

    let mut hits = 0;
    for vehicle in session.vehicles.iter_mut() {
        if vehicle.hit_at.is_none() && test_hit(cfg, &shot, vehicle) {
            vehicle.hit_at = Some(now);
            hits += 1;
            debug!(vehicle = vehicle.id, shot = shot.id, "exhaust hit");
        }
    }
    session.score += hits;

    FireOutcome::Fired {
        shot_id: shot.id,
        hits,
    }
}
