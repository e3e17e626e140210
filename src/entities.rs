//! All game entity types — pure data, no logic.

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Active,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleColor {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Teal,
    Indigo,
}

impl VehicleColor {
    pub const ALL: [VehicleColor; 7] = [
        VehicleColor::Blue,
        VehicleColor::Green,
        VehicleColor::Red,
        VehicleColor::Yellow,
        VehicleColor::Purple,
        VehicleColor::Teal,
        VehicleColor::Indigo,
    ];
}

// ── Vehicles ──────────────────────────────────────────────────────────────────

/// A car driving away from the viewer, up the road.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: u64,
    /// Index in `0..lane_count`.
    pub lane: usize,
    /// Lateral offset from the lane centre, in pixels.
    pub x: f32,
    /// Depth: the top edge of the car.  Larger is closer to the viewer.
    pub y: f32,
    /// Pixels per frame.  Fixed for the vehicle's lifetime.
    pub speed: f32,
    pub color: VehicleColor,
    /// Side the car jumps to once hit: -1 left, +1 right.
    pub burst_dir: i8,
    /// Set once, on the first hit.  A hit vehicle never moves again.
    pub hit_at: Option<Millis>,
}

impl Vehicle {
    pub fn is_hit(&self) -> bool {
        self.hit_at.is_some()
    }
}

// ── Shots & aim ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub fired_at: Millis,
}

impl Shot {
    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.fired_at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimPoint {
    pub x: f32,
    pub y: f32,
}
