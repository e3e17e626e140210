//! Perspective projection.
//!
//! The road is a trapezoid: narrow at the top of the field (far away) and
//! wide at the bottom (close).  Every function here is total; out-of-range
//! depths are clamped rather than rejected.  The renderer and the hit test
//! both go through `vehicle_rect`, so what you see is what you can hit.

use crate::config::GameConfig;
use crate::entities::Vehicle;

/// Axis-aligned rectangle in field pixels.  `contains` is edge-inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Square of side `size` centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        Rect {
            x: cx - size / 2.0,
            y: cy - size / 2.0,
            w: size,
            h: size,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Depth as a fraction of the visible field: 0 at the top edge, 1 at the bottom.
fn field_fraction(cfg: &GameConfig, depth: f32) -> f32 {
    (depth / cfg.field_height).clamp(0.0, 1.0)
}

// ── Road ──────────────────────────────────────────────────────────────────────

pub fn road_width_at(cfg: &GameConfig, depth: f32) -> f32 {
    lerp(cfg.road_width_far, cfg.road_width_near, field_fraction(cfg, depth))
}

/// Distance from the left field edge to the left road edge.
pub fn road_offset_at(cfg: &GameConfig, depth: f32) -> f32 {
    lerp(cfg.road_offset_far, cfg.road_offset_near, field_fraction(cfg, depth))
}

/// X of the marker between lane `divider` and lane `divider + 1`.
pub fn lane_divider_x(cfg: &GameConfig, divider: usize, depth: f32) -> f32 {
    let lane_width = road_width_at(cfg, depth) / cfg.lane_count as f32;
    road_offset_at(cfg, depth) + (divider + 1) as f32 * lane_width
}

// ── Vehicles ──────────────────────────────────────────────────────────────────

/// Render scale at `depth`.  Normalised over the spawn/despawn range (not the
/// visible height), so cars keep shrinking while they are still off-screen.
pub fn scale_at(cfg: &GameConfig, depth: f32) -> f32 {
    let far = cfg.despawn_depth();
    let near = cfg.spawn_depth();
    let t = (depth - far) / (near - far);
    lerp(cfg.scale_far, cfg.scale_near, t).clamp(cfg.scale_far, cfg.scale_near)
}

/// Left-edge X of a car `scaled_width` wide, in `lane`, nudged by `lateral_offset`.
/// `lane` is assumed to be in range.
pub fn pixel_x_for(
    cfg: &GameConfig,
    lane: usize,
    lateral_offset: f32,
    depth: f32,
    scaled_width: f32,
) -> f32 {
    let lane_width = road_width_at(cfg, depth) / cfg.lane_count as f32;
    let lane_center = road_offset_at(cfg, depth) + lane as f32 * lane_width + lane_width / 2.0;
    lane_center + lateral_offset - scaled_width / 2.0
}

/// On-screen bounding box of a vehicle at its current depth.
pub fn vehicle_rect(cfg: &GameConfig, vehicle: &Vehicle) -> Rect {
    let scale = scale_at(cfg, vehicle.y);
    let w = cfg.vehicle_width * scale;
    let h = cfg.vehicle_height * scale;
    Rect {
        x: pixel_x_for(cfg, vehicle.lane, vehicle.x, vehicle.y, w),
        y: vehicle.y,
        w,
        h,
    }
}

/// Far cars are drawn solid and fade as they get closer; never below 0.2.
pub fn vehicle_opacity(cfg: &GameConfig, scale: f32) -> f32 {
    ((cfg.scale_near - scale) / (cfg.scale_near - cfg.scale_far) + 0.2).max(0.2)
}
