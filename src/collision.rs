//! Shot ↔ exhaust hit test.
//!
//! Pure functions of their arguments: no clock, no RNG, no cached state.

use crate::config::GameConfig;
use crate::entities::{Shot, Vehicle};
use crate::geometry::{scale_at, vehicle_rect, Rect};

/// Centre of the exhaust pipe: below the bumper, at the bottom-centre of the car.
pub fn exhaust_center(cfg: &GameConfig, vehicle: &Vehicle) -> (f32, f32) {
    let scale = scale_at(cfg, vehicle.y);
    let body = vehicle_rect(cfg, vehicle);
    (
        body.x + body.w / 2.0 + cfg.exhaust_offset_x * scale,
        body.y + body.h + cfg.exhaust_offset_y * scale,
    )
}

pub fn exhaust_hitbox(cfg: &GameConfig, vehicle: &Vehicle) -> Rect {
    let (cx, cy) = exhaust_center(cfg, vehicle);
    Rect::centered(cx, cy, cfg.exhaust_size * scale_at(cfg, vehicle.y))
}

/// True if `shot` lands on the vehicle's exhaust (edges count).
///
/// Says nothing about whether the vehicle was already hit; the fire path
/// filters those out before asking.
pub fn test_hit(cfg: &GameConfig, shot: &Shot, vehicle: &Vehicle) -> bool {
    exhaust_hitbox(cfg, vehicle).contains(shot.x, shot.y)
}
