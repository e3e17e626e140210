//! Gameplay constants.
//!
//! Everything here is fixed at build time.  `GameConfig` only exists so the
//! constants can travel through function signatures (and so tests can pin an
//! edge case with a literal).

use crate::entities::Millis;

// ── Field & road ──────────────────────────────────────────────────────────────

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;
pub const LANE_COUNT: usize = 3;

/// Road width at the top (far) and bottom (near) edges of the field.
pub const ROAD_WIDTH_FAR: f32 = FIELD_WIDTH * 0.4;
pub const ROAD_WIDTH_NEAR: f32 = FIELD_WIDTH * 0.8;
pub const ROAD_OFFSET_FAR: f32 = (FIELD_WIDTH - ROAD_WIDTH_FAR) / 2.0;
pub const ROAD_OFFSET_NEAR: f32 = (FIELD_WIDTH - ROAD_WIDTH_NEAR) / 2.0;

// ── Vehicles ──────────────────────────────────────────────────────────────────

pub const VEHICLE_WIDTH: f32 = 60.0;
pub const VEHICLE_HEIGHT: f32 = 100.0;
/// Pixels per frame, upwards.
pub const VEHICLE_SPEED_MIN: f32 = 1.5;
pub const VEHICLE_SPEED_MAX: f32 = 4.0;
pub const SPAWN_INTERVAL_MS: Millis = 750;

pub const SCALE_FAR: f32 = 0.3;
pub const SCALE_NEAR: f32 = 1.2;

pub const DRIFT_CHANCE: f64 = 0.1;
pub const DRIFT_MAGNITUDE: f32 = 0.5;

// ── Exhaust target ────────────────────────────────────────────────────────────

pub const EXHAUST_SIZE: f32 = 45.0;
/// Offset of the exhaust centre from the vehicle's bottom-centre, before scaling.
pub const EXHAUST_OFFSET_X: f32 = 0.0;
pub const EXHAUST_OFFSET_Y: f32 = 5.0;

// ── Shots & effects ───────────────────────────────────────────────────────────

pub const SHOT_COOLDOWN_MS: Millis = 300;
pub const SHOT_VISUAL_MS: Millis = 300;
pub const HIT_EFFECT_MS: Millis = 1000;
pub const GLAZE_BASE_SIZE: f32 = 80.0;
pub const GLAZE_APPEAR_MS: Millis = 200;
/// Bright flash on a freshly hit car, before it settles into the glaze.
pub const BURST_MS: Millis = 500;

pub const WATER_SOURCE_SIZE: f32 = 60.0;
pub const WATER_SOURCE_BOTTOM_GAP: f32 = 10.0;

// ── Clock ─────────────────────────────────────────────────────────────────────

pub const GAME_DURATION_SECS: u32 = 60;
/// ≈60 FPS, the cadence vehicle speeds are tuned for.
pub const FRAME_MS: Millis = 16;
pub const COUNTDOWN_MS: Millis = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub lane_count: usize,
    pub road_width_far: f32,
    pub road_width_near: f32,
    pub road_offset_far: f32,
    pub road_offset_near: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub spawn_interval_ms: Millis,
    pub scale_far: f32,
    pub scale_near: f32,
    pub drift_chance: f64,
    pub drift_magnitude: f32,
    pub exhaust_size: f32,
    pub exhaust_offset_x: f32,
    pub exhaust_offset_y: f32,
    pub shot_cooldown_ms: Millis,
    pub shot_visual_ms: Millis,
    pub hit_effect_ms: Millis,
    pub game_duration_secs: u32,
    pub frame_ms: Millis,
    pub countdown_ms: Millis,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            lane_count: LANE_COUNT,
            road_width_far: ROAD_WIDTH_FAR,
            road_width_near: ROAD_WIDTH_NEAR,
            road_offset_far: ROAD_OFFSET_FAR,
            road_offset_near: ROAD_OFFSET_NEAR,
            vehicle_width: VEHICLE_WIDTH,
            vehicle_height: VEHICLE_HEIGHT,
            speed_min: VEHICLE_SPEED_MIN,
            speed_max: VEHICLE_SPEED_MAX,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            scale_far: SCALE_FAR,
            scale_near: SCALE_NEAR,
            drift_chance: DRIFT_CHANCE,
            drift_magnitude: DRIFT_MAGNITUDE,
            exhaust_size: EXHAUST_SIZE,
            exhaust_offset_x: EXHAUST_OFFSET_X,
            exhaust_offset_y: EXHAUST_OFFSET_Y,
            shot_cooldown_ms: SHOT_COOLDOWN_MS,
            shot_visual_ms: SHOT_VISUAL_MS,
            hit_effect_ms: HIT_EFFECT_MS,
            game_duration_secs: GAME_DURATION_SECS,
            frame_ms: FRAME_MS,
            countdown_ms: COUNTDOWN_MS,
        }
    }
}

impl GameConfig {
    /// Depth at which vehicles appear: just below the bottom edge, at full size.
    pub fn spawn_depth(&self) -> f32 {
        self.field_height + self.vehicle_height * self.scale_near
    }

    /// Depth past which vehicles have left through the top edge.
    pub fn despawn_depth(&self) -> f32 {
        -self.vehicle_height * self.scale_far
    }

    /// Lateral drift never carries a vehicle further than this from its lane centre.
    pub fn drift_limit(&self) -> f32 {
        self.vehicle_width / 2.0
    }

    /// Where the water stream leaves the source (middle of the nozzle).
    pub fn water_origin(&self) -> (f32, f32) {
        (
            self.field_width / 2.0,
            self.field_height - WATER_SOURCE_BOTTOM_GAP - WATER_SOURCE_SIZE / 2.0,
        )
    }
}
