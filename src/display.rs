//! Rendering layer — all terminal I/O lives here.
//!
//! The game thinks in field pixels (800 × 600).  A `Viewport` maps those
//! onto the terminal cells between the border walls, and maps mouse cells
//! back into pixels.  No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal,
    QueueableCommand,
};
use exhaust_blaster::collision::exhaust_center;
use exhaust_blaster::config::{GameConfig, BURST_MS, GLAZE_APPEAR_MS, GLAZE_BASE_SIZE};
use exhaust_blaster::entities::{GameStatus, Millis, Shot, Vehicle, VehicleColor};
use exhaust_blaster::error::GameError;
use exhaust_blaster::game::Game;
use exhaust_blaster::geometry::{
    lane_divider_x, road_offset_at, road_width_at, scale_at, vehicle_opacity, vehicle_rect, Rect,
};
use exhaust_blaster::session::Session;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Blue;
const C_HUD_TIME: Color = Color::Yellow;
const C_ROAD_EDGE: Color = Color::Grey;
const C_LANE_MARKER: Color = Color::Yellow;
const C_EXHAUST: Color = Color::DarkGrey;
const C_HIT: Color = Color::White;
const C_BURST: Color = Color::Yellow;
const C_STREAM: Color = Color::Cyan;
const C_SPLASH: Color = Color::White;
const C_SOURCE: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Smallest field that still reads as a road, in cells.
const MIN_FIELD_COLS: u16 = 40;
const MIN_FIELD_ROWS: u16 = 15;

/// Rows taken by the HUD, the two border bars and the hint line.
const CHROME_ROWS: u16 = 4;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Where the play field sits on the terminal, in cells.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    term_cols: u16,
    term_rows: u16,
    field_w: f32,
    field_h: f32,
}

impl Viewport {
    /// Fit the field into a `term_cols × term_rows` terminal, keeping roughly
    /// the field's aspect ratio (cells are about twice as tall as wide).
    pub fn fit(cfg: &GameConfig, term_cols: u16, term_rows: u16) -> Result<Self, GameError> {
        let min_cols = MIN_FIELD_COLS + 2;
        let min_rows = MIN_FIELD_ROWS + CHROME_ROWS;
        if term_cols < min_cols || term_rows < min_rows {
            return Err(GameError::FieldTooSmall {
                cols: term_cols,
                rows: term_rows,
                min_cols,
                min_rows,
            });
        }

        let mut cols = term_cols - 2;
        let mut rows = term_rows - CHROME_ROWS;
        let aspect = cfg.field_width / cfg.field_height * 2.0;
        if cols as f32 > rows as f32 * aspect {
            cols = ((rows as f32 * aspect) as u16).max(MIN_FIELD_COLS);
        } else {
            rows = ((cols as f32 / aspect) as u16).max(MIN_FIELD_ROWS);
        }

        Ok(Viewport {
            left: (term_cols - cols) / 2,
            top: 2,
            cols,
            rows,
            term_cols,
            term_rows,
            field_w: cfg.field_width,
            field_h: cfg.field_height,
        })
    }

    fn cell_w(&self) -> f32 {
        self.field_w / self.cols as f32
    }

    fn cell_h(&self) -> f32 {
        self.field_h / self.rows as f32
    }

    /// Terminal cell for a field pixel, or `None` outside the field.
    fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(0.0..self.field_w).contains(&x) || !(0.0..self.field_h).contains(&y) {
            return None;
        }
        let col = (x / self.cell_w()) as u16;
        let row = (y / self.cell_h()) as u16;
        Some((self.left + col.min(self.cols - 1), self.top + row.min(self.rows - 1)))
    }

    /// Field pixel at the centre of a terminal cell.  May lie outside the
    /// field; the game clamps pointer positions itself.
    pub fn to_field(&self, col: u16, row: u16) -> (f32, f32) {
        let dc = col as f32 - self.left as f32 + 0.5;
        let dr = row as f32 - self.top as f32 + 0.5;
        (dc * self.cell_w(), dr * self.cell_h())
    }

    /// Pixel depth at the middle of field row `r`.
    fn row_depth(&self, r: u16) -> f32 {
        (r as f32 + 0.5) * self.cell_h()
    }

    /// Cells covered by a pixel rectangle, clipped to the field.
    fn cells_in(&self, rect: &Rect) -> Vec<(u16, u16)> {
        let mut cells = Vec::new();
        let (cw, ch) = (self.cell_w(), self.cell_h());
        let mut y = rect.y + ch / 2.0;
        while y <= rect.y + rect.h.max(ch / 2.0) {
            let mut x = rect.x + cw / 2.0;
            while x <= rect.x + rect.w.max(cw / 2.0) {
                if let Some(cell) = self.to_cell(x, y) {
                    cells.push(cell);
                }
                x += cw;
            }
            y += ch;
        }
        cells
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    view: &Viewport,
    now: Millis,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let cfg = game.config();
    draw_border(out, view)?;
    draw_road(out, cfg, view)?;

    match game.status() {
        GameStatus::NotStarted => draw_start_screen(out, view)?,
        GameStatus::Active => {
            if let Some(session) = game.session() {
                draw_hud(out, view, session)?;
                draw_session(out, cfg, view, session, now)?;
            }
        }
        GameStatus::Ended => draw_game_over(out, view, game.score())?,
    }

    draw_controls_hint(out, view, game.status())?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.term_rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_session<W: Write>(
    out: &mut W,
    cfg: &GameConfig,
    view: &Viewport,
    session: &Session,
    now: Millis,
) -> std::io::Result<()> {
    // Near cars first so the far ones stack on top of them.
    let mut vehicles: Vec<&Vehicle> = session.vehicles.iter().collect();
    vehicles.sort_by(|a, b| b.y.total_cmp(&a.y));
    for vehicle in vehicles {
        draw_vehicle(out, cfg, view, vehicle, now)?;
    }

    for shot in &session.shots {
        draw_shot(out, cfg, view, shot, now)?;
    }
    draw_water_source(out, cfg, view)?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let left = view.left.saturating_sub(1);
    let right = view.left + view.cols;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(left, view.top - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(left, view.top + view.rows))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in view.top..view.top + view.rows {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(right, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// Road edges and lane markers, one row at a time so the trapezoid narrows
/// towards the top.
fn draw_road<W: Write>(out: &mut W, cfg: &GameConfig, view: &Viewport) -> std::io::Result<()> {
    for r in 0..view.rows {
        let depth = view.row_depth(r);
        let left = road_offset_at(cfg, depth);
        let right = left + road_width_at(cfg, depth);

        out.queue(style::SetForegroundColor(C_ROAD_EDGE))?;
        if let Some((col, row)) = view.to_cell(left, depth) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("/"))?;
        }
        if let Some((col, row)) = view.to_cell(right.min(cfg.field_width - 0.01), depth) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("\\"))?;
        }

        // Dashed: every other row.
        if r % 2 == 0 {
            out.queue(style::SetForegroundColor(C_LANE_MARKER))?;
            for divider in 0..cfg.lane_count.saturating_sub(1) {
                if let Some((col, row)) = view.to_cell(lane_divider_x(cfg, divider, depth), depth) {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(Print("¦"))?;
                }
            }
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn vehicle_color(color: VehicleColor) -> Color {
    match color {
        VehicleColor::Blue => Color::Blue,
        VehicleColor::Green => Color::Green,
        VehicleColor::Red => Color::Red,
        VehicleColor::Yellow => Color::Yellow,
        VehicleColor::Purple => Color::Magenta,
        VehicleColor::Teal => Color::Cyan,
        VehicleColor::Indigo => Color::DarkBlue,
    }
}

fn draw_vehicle<W: Write>(
    out: &mut W,
    cfg: &GameConfig,
    view: &Viewport,
    vehicle: &Vehicle,
    now: Millis,
) -> std::io::Result<()> {
    let scale = scale_at(cfg, vehicle.y);
    let mut body = vehicle_rect(cfg, vehicle);
    let (ex, ey) = exhaust_center(cfg, vehicle);

    let (color, glyph, dim) = match vehicle.hit_at {
        Some(hit_at) => {
            let age = now.saturating_sub(hit_at);
            // Hop sideways over the course of the effect.
            let progress = (age as f32 / cfg.hit_effect_ms as f32).min(1.0);
            body.x += vehicle.burst_dir as f32 * progress * body.w;
            let (color, glyph) = hit_body_look(age);
            (color, glyph, progress > 0.5)
        }
        None => (
            vehicle_color(vehicle.color),
            "█",
            vehicle_opacity(cfg, scale) < 0.5,
        ),
    };

    if dim {
        out.queue(style::SetAttribute(Attribute::Dim))?;
    }
    out.queue(style::SetForegroundColor(color))?;
    for (col, row) in view.cells_in(&body) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }
    if dim {
        out.queue(style::SetAttribute(Attribute::NormalIntensity))?;
    }

    match vehicle.hit_at {
        Some(hit_at) => {
            let age = now.saturating_sub(hit_at);
            // The glaze grows in, then lingers until the car is retired.
            let grow = (age as f32 / GLAZE_APPEAR_MS as f32).min(1.0);
            let glaze = Rect::centered(ex, ey, GLAZE_BASE_SIZE * scale * grow);
            out.queue(style::SetForegroundColor(C_SPLASH))?;
            for (col, row) in view.cells_in(&glaze) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("*"))?;
            }
        }
        None => {
            if let Some((col, row)) = view.to_cell(ex, ey) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_EXHAUST))?;
                out.queue(Print("o"))?;
            }
        }
    }
    Ok(())
}

/// Colour and glyph for a hit car's body `age` ms after the hit.
fn hit_body_look(age: Millis) -> (Color, &'static str) {
    if age < BURST_MS {
        (C_BURST, "✸")
    } else {
        (C_HIT, "█")
    }
}

/// Water stream from the source to the target, with a splash on the target.
fn draw_shot<W: Write>(
    out: &mut W,
    cfg: &GameConfig,
    view: &Viewport,
    shot: &Shot,
    now: Millis,
) -> std::io::Result<()> {
    let (sx, sy) = cfg.water_origin();
    let steps = (((shot.x - sx) / view.cell_w()).abs())
        .max(((shot.y - sy) / view.cell_h()).abs())
        .ceil()
        .max(1.0) as u32;

    let fading = shot.age(now) * 2 > cfg.shot_visual_ms;
    if fading {
        out.queue(style::SetAttribute(Attribute::Dim))?;
    }

    out.queue(style::SetForegroundColor(C_STREAM))?;
    for i in 1..steps {
        let t = i as f32 / steps as f32;
        if let Some((col, row)) = view.to_cell(sx + (shot.x - sx) * t, sy + (shot.y - sy) * t) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("·"))?;
        }
    }

    let splash_x = shot.x.min(cfg.field_width - 0.01);
    let splash_y = shot.y.min(cfg.field_height - 0.01);
    if let Some((col, row)) = view.to_cell(splash_x, splash_y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(C_SPLASH))?;
        out.queue(Print("✱"))?;
    }

    if fading {
        out.queue(style::SetAttribute(Attribute::NormalIntensity))?;
    }
    Ok(())
}

fn draw_water_source<W: Write>(
    out: &mut W,
    cfg: &GameConfig,
    view: &Viewport,
) -> std::io::Result<()> {
    let (sx, sy) = cfg.water_origin();
    if let Some((col, row)) = view.to_cell(sx, sy) {
        out.queue(style::SetForegroundColor(C_SOURCE))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
        out.queue(Print("(▲)"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, session: &Session) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(view.left, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>4}", session.score)))?;

    let time = format!("Time: {:>2}s", session.time_left);
    let tx = (view.left + view.cols).saturating_sub(time.chars().count() as u16);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    view: &Viewport,
    status: GameStatus,
) -> std::io::Result<()> {
    let hint = match status {
        GameStatus::NotStarted => "ENTER : Start   Q : Quit",
        GameStatus::Active => "Mouse : Aim   Hold click : Spray   Q : Quit",
        GameStatus::Ended => "R : Back to start   Q : Quit",
    };
    out.queue(cursor::MoveTo(view.left, view.term_rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered_lines<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = view.term_cols / 2;
    let start_row = (view.top + view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_start_screen<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_centered_lines(
        out,
        view,
        &[
            ("╔══════════════════════╗", Color::Cyan),
            ("║   EXHAUST  BLASTER   ║", Color::Cyan),
            ("╚══════════════════════╝", Color::Cyan),
            ("Aim with the mouse, click to spray", Color::White),
            ("the exhaust pipes of passing cars!", Color::White),
            ("", Color::White),
            ("Press ENTER to start", Color::Yellow),
        ],
    )
}

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, score: u32) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>4}", score);
    draw_centered_lines(
        out,
        view,
        &[
            ("╔════════════════════╗", Color::Red),
            ("║    GAME  OVER      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            (score_line.as_str(), Color::Yellow),
            ("R - Play Again  Q - Quit", Color::White),
        ],
    )
}
