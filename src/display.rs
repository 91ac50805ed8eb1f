/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session. No game logic is performed; world coordinates are scaled onto
/// the terminal grid and everything else is read straight off the snapshot.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use taxi_rush::compute::Session;
use taxi_rush::damage::{Effect, EffectKind};
use taxi_rush::entities::{GameStatus, LossReason, Point};
use taxi_rush::people::PassengerState;
use taxi_rush::powerups::{PowerUp, PowerUpKind};
use taxi_rush::scores::ScoreEntry;
use taxi_rush::vehicles::{Vehicle, VehicleKind};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_ROAD_SUNNY: Color = Color::DarkGrey;
const C_ROAD_RAIN: Color = Color::Blue;
const C_HUD_EARNINGS: Color = Color::Yellow;
const C_HUD_FRAMES: Color = Color::White;
const C_HUD_HEALTH: Color = Color::Red;
const C_TAXI: Color = Color::Yellow;
const C_DRIVER: Color = Color::White;
const C_PASSENGER: Color = Color::Cyan;
const C_MARKER: Color = Color::Green;
const C_CAR: Color = Color::Grey;
const C_HOSTILE: Color = Color::Red;
const C_PROJECTILE: Color = Color::Magenta;
const C_COIN: Color = Color::Yellow;
const C_INVINCIBLE: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// First terminal row of the play field; rows above it hold the HUD.
const FIELD_TOP: u16 = 3;
/// World units between two lane dashes.
const DASH_PERIOD: f64 = 96.0;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Maps world space onto the bordered play field of the current terminal.
struct Viewport {
    cols: u16,
    rows: u16,
    world_w: f64,
    world_h: f64,
}

impl Viewport {
    fn new(session: &Session) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let window = &session.config().window;
        Ok(Self {
            cols,
            rows,
            world_w: window.width,
            world_h: window.height,
        })
    }

    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(FIELD_TOP + 2)
    }

    fn field_cols(&self) -> u16 {
        self.cols.saturating_sub(2)
    }

    /// Terminal cell for a world point, or `None` when it is off screen.
    fn cell(&self, p: Point) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.world_w || p.y >= self.world_h {
            return None;
        }
        let col = 1 + (p.x / self.world_w * f64::from(self.field_cols())) as u16;
        let row = FIELD_TOP + (p.y / self.world_h * f64::from(self.field_rows())) as u16;
        Some((col, row))
    }

    fn world_y(&self, row: u16) -> f64 {
        f64::from(row.saturating_sub(FIELD_TOP)) / f64::from(self.field_rows().max(1)) * self.world_h
    }
}

fn put<W: Write>(out: &mut W, view: &Viewport, at: Point, glyph: &str, color: Color) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(at) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    session: &Session,
    leaderboard: &[ScoreEntry],
) -> std::io::Result<()> {
    let view = Viewport::new(session)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_road(out, &view, session)?;
    draw_hud(out, &view, session)?;

    for power_up in session.power_ups() {
        draw_power_up(out, &view, power_up)?;
    }
    draw_passengers(out, &view, session)?;
    for car in session.traffic() {
        draw_vehicle(out, &view, car)?;
    }
    draw_vehicle(out, &view, session.taxi())?;
    draw_driver(out, &view, session)?;
    draw_controls_hint(out, &view)?;

    if session.status().is_over() {
        draw_game_over(out, &view, session, leaderboard)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border and road ───────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let top = FIELD_TOP - 1;
    let bottom = view.rows.saturating_sub(2);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in FIELD_TOP..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

/// Dashed lane dividers that slide with the background offsets.
fn draw_road<W: Write>(out: &mut W, view: &Viewport, session: &Session) -> std::io::Result<()> {
    let background = session.background();
    let (phase, _) = background.offsets();
    let lanes = session.config().lanes;
    let dividers = [(lanes[0] + lanes[1]) / 2.0, (lanes[1] + lanes[2]) / 2.0];
    let color = if background.is_raining() { C_ROAD_RAIN } else { C_ROAD_SUNNY };

    for row in FIELD_TOP..FIELD_TOP + view.field_rows() {
        let y = view.world_y(row);
        let dashed = (y - phase).rem_euclid(DASH_PERIOD) < DASH_PERIOD / 2.0;
        for x in dividers {
            if dashed {
                put(out, view, Point::new(x, y), "¦", color)?;
            }
        }
        if background.is_raining() && (y - phase).rem_euclid(DASH_PERIOD / 3.0) < 4.0 {
            put(out, view, Point::new(view.world_w * 0.1, y), "'", C_ROAD_RAIN)?;
            put(out, view, Point::new(view.world_w * 0.9, y), "'", C_ROAD_RAIN)?;
        }
    }
    Ok(())
}

// ── HUD (rows 0-1) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, session: &Session) -> std::io::Result<()> {
    // Earnings and target, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_EARNINGS))?;
    out.queue(Print(format!(
        "PAY {:.2}  TARGET {:.2}",
        session.total_earnings(),
        session.target()
    )))?;

    // Frames remaining and active coin, right
    let mut right = format!("FRAMES {}", session.frames_left());
    if let Some(frames) = session.active_coin_frames() {
        right = format!("COIN {frames}  {right}");
    }
    let rx = view.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_FRAMES))?;
    out.queue(Print(&right))?;

    // Health readouts, second row left
    let driver = session.driver();
    let mut health = format!(
        "TAXI {:.2}  DRIVER {:.2}",
        session.taxi().damage.health(),
        driver.person.damage.health()
    );
    if let Some(passenger) = session.featured_passenger() {
        health.push_str(&format!("  PASSENGER {:.1}", passenger.person.damage.health()));
    }
    out.queue(cursor::MoveTo(1, 1))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health))?;

    // Current or last trip, second row right
    if let Some(trip) = session.current_trip() {
        let mut line = format!(
            "TRIP {:.1}  P{}",
            trip.earnings(),
            trip.priority()
        );
        if trip.is_completed() {
            line.push_str(&format!("  PENALTY {:.2}", trip.penalty()));
        }
        let rx = view.cols.saturating_sub(line.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, 1))?;
        out.queue(style::SetForegroundColor(C_MARKER))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_power_up<W: Write>(out: &mut W, view: &Viewport, power_up: &PowerUp) -> std::io::Result<()> {
    if !power_up.body.visible {
        return Ok(());
    }
    let (glyph, color) = match power_up.kind() {
        PowerUpKind::Coin => ("$", C_COIN),
        PowerUpKind::Invincibility => ("✦", C_INVINCIBLE),
    };
    put(out, view, power_up.body.position, glyph, color)
}

fn draw_passengers<W: Write>(out: &mut W, view: &Viewport, session: &Session) -> std::io::Result<()> {
    for passenger in session.passengers() {
        let marker = passenger.trip.marker();
        if marker.visible {
            put(out, view, marker.position, "⚑", C_MARKER)?;
        }
        if let Some(effect) = passenger.person.damage.effect() {
            draw_effect(out, view, effect)?;
        }
        if !passenger.person.body.visible {
            continue;
        }
        let glyph = match passenger.state() {
            PassengerState::Waiting | PassengerState::Approaching => "☺",
            _ => "☻",
        };
        put(out, view, passenger.position(), glyph, C_PASSENGER)?;
        if passenger.state() == PassengerState::Waiting {
            let label = format!("{} {:.1}", passenger.trip.priority(), passenger.trip.earnings());
            put(out, view, passenger.position().offset(-100.0, 0.0), &label, C_PASSENGER)?;
        }
    }
    Ok(())
}

fn draw_vehicle<W: Write>(out: &mut W, view: &Viewport, car: &Vehicle) -> std::io::Result<()> {
    for projectile in car.projectiles() {
        if projectile.body.visible {
            put(out, view, projectile.body.position, "•", C_PROJECTILE)?;
        }
    }
    if let Some(effect) = car.damage.effect() {
        draw_effect(out, view, effect)?;
    }
    if !car.body.visible {
        return Ok(());
    }
    let (glyph, color) = match &car.kind {
        VehicleKind::Taxi if car.is_dead() => ("▓", C_HINT),
        VehicleKind::Taxi => ("▣", C_TAXI),
        VehicleKind::Hostile { .. } => ("▼", C_HOSTILE),
        VehicleKind::Ordinary { variant } if *variant % 2 == 0 => ("▢", C_CAR),
        VehicleKind::Ordinary { .. } => ("□", C_CAR),
    };
    put(out, view, car.body.position, glyph, color)
}

fn draw_driver<W: Write>(out: &mut W, view: &Viewport, session: &Session) -> std::io::Result<()> {
    let driver = session.driver();
    if let Some(effect) = driver.person.damage.effect() {
        draw_effect(out, view, effect)?;
    }
    if !driver.person.body.visible {
        return Ok(());
    }
    let color = if driver.is_invulnerable() { C_INVINCIBLE } else { C_DRIVER };
    put(out, view, driver.position(), "♂", color)
}

fn draw_effect<W: Write>(out: &mut W, view: &Viewport, effect: &Effect) -> std::io::Result<()> {
    let (glyph, color) = match effect.kind {
        EffectKind::Smoke => ("≈", Color::Grey),
        EffectKind::Fire => ("✹", Color::DarkRed),
        EffectKind::Blood => ("✱", Color::Red),
    };
    put(out, view, effect.anchor, glyph, color)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ ← → / W S A D : Move   Q : Quit"))?;
    Ok(())
}

// ── Start screen ──────────────────────────────────────────────────────────────

pub fn draw_start_screen<W: Write>(out: &mut W, name: &str) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let lines: &[(String, Color)] = &[
        ("▣  TAXI  RUSH  ▣".to_string(), Color::Yellow),
        (String::new(), Color::White),
        (format!("Driver: {name}"), Color::White),
        (String::new(), Color::White),
        ("Walk to the taxi, stop next to a passenger to pick them up,".to_string(), C_HINT),
        ("and stop at the green flag to drop them off.".to_string(), C_HINT),
        ("$ raises fares for a while   ✦ makes you invincible".to_string(), C_HINT),
        (String::new(), Color::White),
        ("ENTER : Start   Q : Quit".to_string(), Color::White),
    ];
    let start_row = cy.saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    session: &Session,
    leaderboard: &[ScoreEntry],
) -> std::io::Result<()> {
    let (banner, banner_color) = match session.status() {
        GameStatus::Won => ("║      YOU  WIN      ║", Color::Green),
        _ => ("║     GAME  OVER     ║", Color::Red),
    };
    let reason = match session.status() {
        GameStatus::Lost(LossReason::PassengerDied) => "A passenger died",
        GameStatus::Lost(LossReason::DriverDied) => "The driver died",
        GameStatus::Lost(LossReason::TaxiLeftScreen) => "The taxi was left behind",
        GameStatus::Lost(LossReason::OutOfFrames) => "Out of time",
        _ => "Target reached",
    };

    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), banner_color),
        (banner.to_string(), banner_color),
        ("╚════════════════════╝".to_string(), banner_color),
        (reason.to_string(), Color::White),
        (format!("Final Pay: {:.2}", session.total_earnings()), Color::Yellow),
        (String::new(), Color::White),
        ("TOP SCORES".to_string(), Color::White),
    ];
    for (rank, entry) in leaderboard.iter().enumerate() {
        lines.push((
            format!("{}. {:<12} {:>10.2}", rank + 1, entry.name, entry.score),
            Color::Yellow,
        ));
    }
    lines.push((String::new(), Color::White));
    lines.push(("R - Play Again  Q - Quit".to_string(), Color::White));

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
