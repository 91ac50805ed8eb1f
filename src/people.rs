/// People on the road: the driver (walking or driving) and passengers with
/// their pickup / ride / drop-off state machine.
use crate::config::{GameConfig, PersonConfig};
use crate::damage::{DamageOutcome, DamageState, EffectProfile, Knockback};
use crate::entities::{Body, Point};
use crate::trip::Trip;

/// Per-frame push applied to a knocked-back person.
pub const PERSON_KNOCKBACK_STEP: f64 = 2.0;
/// Sideways distance a driver (and passenger) lands from a wrecked taxi.
pub const EJECT_OFFSET: f64 = 50.0;

// ── Person ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub body: Body,
    pub damage: DamageState,
    pub knockback: Knockback,
    pub speed_x: f64,
}

impl Person {
    pub fn new(config: &PersonConfig, position: Point, blood_frames: u32) -> Self {
        Self {
            body: Body::new(position, config.radius, config.walk_speed_y),
            damage: DamageState::new(config.health, EffectProfile::person(blood_frames)),
            knockback: Knockback::default(),
            speed_x: config.walk_speed_x,
        }
    }

    /// Out of play (inside a taxi) counts as invulnerable.
    pub fn is_invulnerable(&self) -> bool {
        self.damage.is_invulnerable() || !self.body.visible
    }

    pub fn is_dead(&self) -> bool {
        self.damage.is_dead()
    }

    pub fn receive_hit(&mut self, from: Point, amount: f64) -> DamageOutcome {
        self.knockback
            .start_away_from(from, self.body.position, PERSON_KNOCKBACK_STEP);
        self.damage.set_immune_for();
        self.damage.take_damage(amount, self.body.position)
    }

    pub fn upkeep(&mut self) {
        if self.damage.upkeep() {
            self.body.visible = false;
        }
    }

    /// One walking step towards `destination`, x and y independently, never
    /// overshooting. Returns `true` once standing on it.
    pub fn approach(&mut self, destination: Point) -> bool {
        let pos = self.body.position;
        self.body.position = Point::new(
            step_towards(pos.x, destination.x, self.speed_x),
            step_towards(pos.y, destination.y, self.body.speed_y),
        );
        self.body.position == destination
    }
}

fn step_towards(from: f64, to: f64, step: f64) -> f64 {
    let gap = to - from;
    if gap.abs() <= step {
        to
    } else {
        from + step.copysign(gap)
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    Walking,
    Driving,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Driver {
    pub person: Person,
    occupancy: Occupancy,
    /// Index into the session's passenger list.
    passenger: Option<usize>,
    /// Passenger whose trip is shown in the HUD (current or last completed).
    last_trip: Option<usize>,
    /// Indices into the session's power-up list.
    coin: Option<usize>,
    invincible: Option<usize>,
}

impl Driver {
    pub fn new(config: &GameConfig, position: Point) -> Self {
        Self {
            person: Person::new(&config.driver, position, config.effects.blood_ttl),
            occupancy: Occupancy::Walking,
            passenger: None,
            last_trip: None,
            coin: None,
            invincible: None,
        }
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub fn is_driving(&self) -> bool {
        self.occupancy == Occupancy::Driving
    }

    pub fn is_walking(&self) -> bool {
        self.occupancy == Occupancy::Walking
    }

    pub fn position(&self) -> Point {
        self.person.body.position
    }

    pub fn is_dead(&self) -> bool {
        self.person.is_dead()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.person.is_invulnerable() || self.invincible.is_some()
    }

    /// Gets into the taxi parked at `taxi_position`.
    pub fn board(&mut self, taxi_position: Point) {
        self.occupancy = Occupancy::Driving;
        self.person.body.visible = false;
        self.person.body.position = taxi_position;
    }

    /// Thrown out beside a wrecked taxi.
    pub fn eject(&mut self) {
        self.occupancy = Occupancy::Walking;
        self.person.body.visible = true;
        self.person.body.move_x(-EJECT_OFFSET);
    }

    pub fn passenger(&self) -> Option<usize> {
        self.passenger
    }

    pub fn take_passenger(&mut self, idx: usize) {
        self.passenger = Some(idx);
        self.last_trip = Some(idx);
    }

    pub fn release_passenger(&mut self) -> Option<usize> {
        self.passenger.take()
    }

    pub fn last_trip(&self) -> Option<usize> {
        self.last_trip
    }

    pub fn coin(&self) -> Option<usize> {
        self.coin
    }

    pub fn invincible(&self) -> Option<usize> {
        self.invincible
    }

    pub fn has_invincibility(&self) -> bool {
        self.invincible.is_some()
    }

    /// Holds a new coin, returning the one it replaces.
    pub fn hold_coin(&mut self, idx: usize) -> Option<usize> {
        self.coin.replace(idx)
    }

    pub fn hold_invincible(&mut self, idx: usize) -> Option<usize> {
        self.invincible.replace(idx)
    }

    pub fn drop_coin(&mut self) {
        self.coin = None;
    }

    pub fn drop_invincible(&mut self) {
        self.invincible = None;
    }
}

// ── Passenger ─────────────────────────────────────────────────────────────────

/// ```text
/// Waiting ⇄ Approaching ──▶ Riding ──▶ Exiting ──▶ Arrived
///                             │  ▲
///                  taxi wreck ▼  │ reached taxi
///                        Ejected ──driver boards──▶ Reboarding
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassengerState {
    Waiting,
    Approaching,
    Riding,
    /// Thrown out of a wrecked taxi; follows the walking driver.
    Ejected,
    /// Walking back to the taxi the driver just got into.
    Reboarding,
    Exiting,
    Arrived,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Passenger {
    pub person: Person,
    pub trip: Trip,
    state: PassengerState,
    taxi_detect_radius: f64,
}

impl Passenger {
    pub fn new(config: &GameConfig, position: Point, trip: Trip) -> Self {
        let person_config = PersonConfig {
            radius: config.passenger.radius,
            walk_speed_x: config.passenger.walk_speed_x,
            walk_speed_y: config.passenger.walk_speed_y,
            health: config.passenger.health,
        };
        Self {
            person: Person::new(&person_config, position, config.effects.blood_ttl),
            trip,
            state: PassengerState::Waiting,
            taxi_detect_radius: config.passenger.taxi_detect_radius,
        }
    }

    pub fn state(&self) -> PassengerState {
        self.state
    }

    pub fn position(&self) -> Point {
        self.person.body.position
    }

    pub fn taxi_detect_radius(&self) -> f64 {
        self.taxi_detect_radius
    }

    /// Still on the kerb and alive.
    pub fn can_be_picked_up(&self) -> bool {
        matches!(self.state, PassengerState::Waiting | PassengerState::Approaching)
            && !self.person.is_dead()
    }

    /// Has been picked up and not yet let out.
    pub fn is_collected(&self) -> bool {
        matches!(
            self.state,
            PassengerState::Riding | PassengerState::Ejected | PassengerState::Reboarding
        )
    }

    pub fn has_arrived(&self) -> bool {
        self.state == PassengerState::Arrived
    }

    /// Walks towards the taxi for a pickup. Returns `true` on reaching it.
    pub fn approach_taxi(&mut self, taxi_position: Point) -> bool {
        self.state = PassengerState::Approaching;
        self.person.approach(taxi_position)
    }

    /// The taxi drove off mid-approach.
    pub fn stop_approach(&mut self) {
        if self.state == PassengerState::Approaching {
            self.state = PassengerState::Waiting;
        }
    }

    /// In the taxi; the destination marker appears.
    pub fn collect(&mut self) {
        self.state = PassengerState::Riding;
        self.person.body.visible = false;
        self.trip.show_marker();
    }

    /// Thrown out of a wrecked taxi at `position`.
    pub fn eject_to(&mut self, position: Point) {
        self.state = PassengerState::Ejected;
        self.person.body.visible = true;
        self.person.body.position = position;
    }

    /// The taxi was wrecked while this passenger was walking back to it.
    pub fn fall_back(&mut self) {
        if self.state == PassengerState::Reboarding {
            self.state = PassengerState::Ejected;
        }
    }

    pub fn start_reboarding(&mut self) {
        if self.state == PassengerState::Ejected {
            self.state = PassengerState::Reboarding;
        }
    }

    /// One step back towards the taxi; climbs in on arrival.
    pub fn reboard_step(&mut self, taxi_position: Point) -> bool {
        if self.state != PassengerState::Reboarding {
            return false;
        }
        if self.person.approach(taxi_position) {
            self.state = PassengerState::Riding;
            self.person.body.visible = false;
            return true;
        }
        false
    }

    /// Out of the taxi and walking to the marker.
    pub fn drop_off(&mut self) {
        self.state = PassengerState::Exiting;
        self.person.body.visible = true;
    }

    /// One step towards the marker. Returns `true` on the frame of arrival.
    pub fn walk_to_destination(&mut self) -> bool {
        if self.state != PassengerState::Exiting {
            return false;
        }
        if self.person.approach(self.trip.marker().position) {
            self.state = PassengerState::Arrived;
            self.trip.hide_marker();
            return true;
        }
        false
    }

    /// World delta for the passenger and its destination marker; knock-back
    /// adds its own push on top.
    pub fn scroll(&mut self, delta: f64) {
        let offset = self.person.knockback.advance().map_or(0.0, |(dir, _)| dir);
        self.person.body.move_y(delta + offset);
        self.person.damage.scroll(delta);
        self.trip.scroll(delta);
    }
}
