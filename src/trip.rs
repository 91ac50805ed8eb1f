/// Fare pricing for one passenger's journey.
///
/// Earnings are always `rate_per_y * distance_y + fee(priority)`; the only
/// inputs that change are the priority adjustments from rain and coins, and
/// those stop once the trip is completed.
use crate::config::TripConfig;
use crate::entities::{Body, Point};

pub const PRIORITY_MIN: u8 = 1;
pub const PRIORITY_MAX: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FareTable {
    pub rate_per_y: f64,
    /// Indexed by `priority - 1`.
    pub priority_fees: [f64; 3],
    pub penalty_per_y: f64,
}

impl FareTable {
    pub fn from_config(config: &TripConfig) -> Self {
        Self {
            rate_per_y: config.rate_per_y,
            priority_fees: config.priority_fees,
            penalty_per_y: config.penalty_per_y,
        }
    }

    pub fn fee(&self, priority: u8) -> f64 {
        let idx = priority.clamp(PRIORITY_MIN, PRIORITY_MAX) - PRIORITY_MIN;
        self.priority_fees[usize::from(idx)]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    marker: Body,
    distance_y: f64,
    priority: u8,
    original_priority: u8,
    has_umbrella: bool,
    raining: bool,
    coin_adjusted: bool,
    fares: FareTable,
    penalty: f64,
    completed: bool,
}

impl Trip {
    /// The destination marker sits `distance_y` above `start`, at `end_x`.
    pub fn new(
        start: Point,
        end_x: f64,
        distance_y: f64,
        priority: u8,
        has_umbrella: bool,
        fares: FareTable,
        marker_radius: f64,
    ) -> Self {
        debug_assert!((PRIORITY_MIN..=PRIORITY_MAX).contains(&priority));
        let priority = priority.clamp(PRIORITY_MIN, PRIORITY_MAX);
        let mut marker = Body::new(Point::new(end_x, start.y - distance_y), marker_radius, 0.0);
        marker.visible = false;
        Self {
            marker,
            distance_y,
            priority,
            original_priority: priority,
            has_umbrella,
            raining: false,
            coin_adjusted: false,
            fares,
            penalty: 0.0,
            completed: false,
        }
    }

    pub fn marker(&self) -> &Body {
        &self.marker
    }

    pub fn distance_y(&self) -> f64 {
        self.distance_y
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn original_priority(&self) -> u8 {
        self.original_priority
    }

    pub fn has_umbrella(&self) -> bool {
        self.has_umbrella
    }

    pub fn is_coin_adjusted(&self) -> bool {
        self.coin_adjusted
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn earnings(&self) -> f64 {
        self.fares.rate_per_y * self.distance_y + self.fares.fee(self.priority)
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// What the driver banks: earnings less the drop-off penalty.
    pub fn payout(&self) -> f64 {
        self.earnings() - self.penalty
    }

    pub fn scroll(&mut self, delta: f64) {
        self.marker.move_y(delta);
    }

    pub fn show_marker(&mut self) {
        self.marker.visible = true;
    }

    pub fn hide_marker(&mut self) {
        self.marker.visible = false;
    }

    /// A taxi at `position` may let the passenger out: inside the marker's
    /// radius, or level with / past it going forward.
    pub fn can_drop_off_at(&self, position: Point) -> bool {
        position.y <= self.marker.position.y
            || position.distance_to(&self.marker.position) <= self.marker.radius()
    }

    // ── Priority adjustments ─────────────────────────────────────────────────

    /// Rain forces the top priority on passengers without an umbrella.
    pub fn apply_rain_start(&mut self) {
        if self.completed || self.has_umbrella {
            return;
        }
        self.raining = true;
        self.priority = PRIORITY_MIN;
    }

    /// Back to the booked priority, keeping a coin bump picked up before the rain.
    pub fn apply_rain_end(&mut self) {
        if self.completed || self.has_umbrella || !self.raining {
            return;
        }
        self.raining = false;
        self.priority = self.original_priority;
        if self.coin_adjusted {
            self.priority = self.priority.saturating_sub(1).max(PRIORITY_MIN);
        }
    }

    /// One step up while a coin is held. Skipped while rain already holds the
    /// priority at the top.
    pub fn apply_coin(&mut self) {
        if self.completed || self.raining || self.coin_adjusted {
            return;
        }
        if self.original_priority == PRIORITY_MIN {
            return;
        }
        self.coin_adjusted = true;
        self.priority = self.priority.saturating_sub(1).max(PRIORITY_MIN);
    }

    /// Undoes `apply_coin`. During rain only the flag is cleared; the rain-end
    /// restore then lands on the booked priority.
    pub fn expire_coin(&mut self) {
        if self.completed || !self.coin_adjusted {
            return;
        }
        self.coin_adjusted = false;
        if !self.raining {
            self.priority = (self.priority + 1).min(self.original_priority);
        }
    }

    // ── Completion ───────────────────────────────────────────────────────────

    /// Fixes the penalty for a drop-off at `taxi_position` and freezes the trip.
    /// Returns the payout. Calling it again returns the already-fixed payout.
    pub fn complete(&mut self, taxi_position: Point) -> f64 {
        if self.completed {
            return self.payout();
        }
        self.completed = true;
        let marker = self.marker.position;
        self.penalty = if taxi_position.distance_to(&marker) <= self.marker.radius() {
            0.0
        } else {
            let overshoot = (marker.y - taxi_position.y).abs();
            (overshoot * self.fares.penalty_per_y).clamp(0.0, self.earnings().max(0.0))
        };
        self.payout()
    }
}
