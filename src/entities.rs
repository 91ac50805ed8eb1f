/// Shared plain data used by every actor. No game rules live here.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A position in screen-space world units (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

// ── Mobile entity ─────────────────────────────────────────────────────────────

/// The primitive every world object is built on.
///
/// `radius` is fixed at construction; the position only changes through the
/// scroll broadcast or an explicit movement call.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Point,
    radius: f64,
    /// Forward speed in units per frame (positive = up the screen).
    pub speed_y: f64,
    pub visible: bool,
}

impl Body {
    pub fn new(position: Point, radius: f64, speed_y: f64) -> Self {
        debug_assert!(radius >= 0.0, "negative radius");
        Self {
            position,
            radius: radius.max(0.0),
            speed_y,
            visible: true,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn move_y(&mut self, dist: f64) {
        self.position.y += dist;
    }

    pub fn move_x(&mut self, dist: f64) {
        self.position.x += dist;
    }

    /// True when the two circles touch or overlap.
    pub fn touches(&self, other: &Body) -> bool {
        self.position.distance_to(&other.position) <= self.radius + other.radius
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Directional keys held during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// No directional key is held.
    pub fn is_stationary(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

// ── Session outcome ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LossReason {
    PassengerDied,
    DriverDied,
    TaxiLeftScreen,
    OutOfFrames,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Continue,
    Won,
    Lost(LossReason),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Continue)
    }
}
