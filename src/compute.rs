/// The game session and its per-frame step.
///
/// `Session` owns every actor list for one play-through. `step` consumes one
/// frame of input plus the session's `SpawnService` (which owns all
/// randomness) and returns the new status. The getters are read-only
/// snapshots for rendering; the hidden `*_mut` hooks exist only to stage
/// scenarios in tests.
use rand::Rng;
use tracing::{debug, info};

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{GameStatus, InputState, LossReason, Point};
use crate::error::{GameError, Result};
use crate::level::{Level, LevelObject};
use crate::people::{Driver, Passenger, PassengerState, EJECT_OFFSET};
use crate::powerups::{PowerUp, PowerUpKind};
use crate::scroll::Background;
use crate::spawn::SpawnService;
use crate::trip::{FareTable, Trip};
use crate::vehicles::Vehicle;
use crate::weather::{WeatherKind, WeatherTimeline};

/// Traffic and projectiles further than this many window heights above the
/// top edge (or below the bottom edge) are dropped.
const PRUNE_MARGIN: f64 = 1.0;

pub struct Session {
    config: GameConfig,
    background: Background,
    weather: WeatherTimeline,
    driver: Driver,
    taxi: Vehicle,
    traffic: Vec<Vehicle>,
    passengers: Vec<Passenger>,
    power_ups: Vec<PowerUp>,
    total_earnings: f64,
    frames_left: u32,
    frame: u64,
    status: GameStatus,
}

// ── Construction ─────────────────────────────────────────────────────────────

impl Session {
    pub fn new(config: GameConfig, level: &Level) -> Result<Self> {
        config.validate()?;
        let driver_at = level
            .driver_position()
            .ok_or_else(|| GameError::level(0, "level has no DRIVER"))?;
        let taxi_at = level
            .taxi_position()
            .ok_or_else(|| GameError::level(0, "level has no TAXI"))?;

        let fares = FareTable::from_config(&config.trip);
        let mut passengers = Vec::new();
        let mut power_ups = Vec::new();
        for object in &level.objects {
            match *object {
                LevelObject::Coin(at) => {
                    power_ups.push(PowerUp::new(PowerUpKind::Coin, &config.coin, at));
                }
                LevelObject::Invincible(at) => {
                    power_ups.push(PowerUp::new(PowerUpKind::Invincibility, &config.invincible, at));
                }
                LevelObject::Passenger {
                    position,
                    priority,
                    end_x,
                    distance_y,
                    has_umbrella,
                } => {
                    let trip = Trip::new(
                        position,
                        end_x,
                        distance_y,
                        priority,
                        has_umbrella,
                        fares,
                        config.trip.end_flag_radius,
                    );
                    passengers.push(Passenger::new(&config, position, trip));
                }
                LevelObject::Driver(_) | LevelObject::Taxi(_) => {}
            }
        }

        let mut session = Self {
            background: Background::new(config.window.height),
            weather: WeatherTimeline::new(level.weather.clone()),
            driver: Driver::new(&config, driver_at),
            taxi: Vehicle::taxi(&config, taxi_at),
            traffic: Vec::new(),
            passengers,
            power_ups,
            total_earnings: 0.0,
            frames_left: config.game_play.max_frames,
            frame: 0,
            status: GameStatus::Continue,
            config,
        };
        // events scheduled for frame 0 set the opening weather
        session.advance_weather(0);
        info!(
            passengers = session.passengers.len(),
            power_ups = session.power_ups.len(),
            "session started"
        );
        Ok(session)
    }
}

// ── Per-frame step ───────────────────────────────────────────────────────────

impl Session {
    /// Advances the simulation by one frame.
    ///
    /// Once the session is over further calls are no-ops that return the final
    /// status.
    pub fn step<R: Rng>(&mut self, input: &InputState, spawner: &mut SpawnService<R>) -> GameStatus {
        if self.status.is_over() {
            return self.status;
        }
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frame += 1;

        // ── 1. Timers ────────────────────────────────────────────────────────
        self.upkeep();

        // ── 2. New traffic, taxi replacement ─────────────────────────────────
        self.spawn_traffic(spawner);
        if self.taxi.is_dead() {
            self.replace_taxi(spawner);
        }

        // ── 3. Weather, then held power-ups ──────────────────────────────────
        let elapsed = self.config.game_play.max_frames - self.frames_left;
        self.advance_weather(elapsed);
        self.tick_power_ups();

        // ── 4. Hostile fire ──────────────────────────────────────────────────
        for car in self.traffic.iter_mut().filter(|c| c.is_hostile()) {
            if car.body.visible && spawner.roll_projectile() {
                car.fire(&self.config.projectile);
                debug!(x = car.body.position.x, y = car.body.position.y, "projectile fired");
            }
        }

        // ── 5. World scroll, then horizontal movement ────────────────────────
        let delta = self.scroll_delta(input);
        self.broadcast_scroll(delta, spawner);
        self.check_boarding();
        self.steer(input);

        // ── 6. Pickups, drop-offs, power-ups ─────────────────────────────────
        for passenger in &mut self.passengers {
            if passenger.walk_to_destination() {
                debug!("passenger reached destination");
            }
        }
        if input.is_stationary() {
            self.check_passengers();
        }
        self.collect_power_ups();

        // ── 7. Collisions ────────────────────────────────────────────────────
        self.taxi.shielded = self.driver.is_driving() && self.driver.has_invincibility();
        let report = collision::resolve(
            &mut self.traffic,
            &mut self.taxi,
            &mut self.driver,
            &mut self.passengers,
        );
        if report.hits > 0 {
            debug!(hits = report.hits, kills = report.kills, "collisions resolved");
        }

        self.prune();

        self.status = self.evaluate();
        if self.status.is_over() {
            info!(
                status = ?self.status,
                earnings = self.total_earnings,
                frame = self.frame,
                "session over"
            );
        }
        self.status
    }

    fn upkeep(&mut self) {
        self.driver.person.upkeep();
        self.taxi.upkeep();
        for car in &mut self.traffic {
            car.upkeep();
        }
        for passenger in &mut self.passengers {
            passenger.person.upkeep();
        }
    }

    fn spawn_traffic<R: Rng>(&mut self, spawner: &mut SpawnService<R>) {
        if let Some(car) = spawner.roll_ordinary() {
            self.traffic.push(car);
        }
        if let Some(car) = spawner.roll_hostile() {
            self.traffic.push(car);
        }
    }

    /// The wreck joins the traffic as inert scenery and a fresh taxi takes its
    /// place. A driver inside is thrown out beside the wreck together with a
    /// riding passenger.
    fn replace_taxi<R: Rng>(&mut self, spawner: &mut SpawnService<R>) {
        let fresh = spawner.replacement_taxi();
        let wreck = std::mem::replace(&mut self.taxi, fresh);
        info!(
            x = self.taxi.body.position.x,
            y = self.taxi.body.position.y,
            "replacement taxi"
        );
        self.traffic.push(wreck);

        if !self.driver.is_driving() {
            return;
        }
        self.driver.eject();
        info!("driver ejected");
        let landing = self.driver.position().offset(-EJECT_OFFSET, 0.0);
        if let Some(passenger) = self
            .driver
            .passenger()
            .and_then(|idx| self.passengers.get_mut(idx))
        {
            match passenger.state() {
                PassengerState::Riding => passenger.eject_to(landing),
                PassengerState::Reboarding => passenger.fall_back(),
                _ => {}
            }
        }
    }

    fn advance_weather(&mut self, elapsed: u32) {
        for event in self.weather.advance(elapsed) {
            let raining = event.kind == WeatherKind::Raining;
            info!(weather = %event.kind, frame = self.frame, "weather changed");
            self.background.set_raining(raining);
            for passenger in &mut self.passengers {
                if raining {
                    passenger.trip.apply_rain_start();
                } else {
                    passenger.trip.apply_rain_end();
                }
            }
        }
    }

    fn tick_power_ups(&mut self) {
        if let Some(idx) = self.driver.coin() {
            if self.power_ups.get_mut(idx).map_or(true, |c| c.tick()) {
                self.driver.drop_coin();
                self.expire_coin_on_trips();
                info!("coin expired");
            }
        }
        if let Some(idx) = self.driver.invincible() {
            if self.power_ups.get_mut(idx).map_or(true, |p| p.tick()) {
                self.driver.drop_invincible();
                info!("invincibility expired");
            }
        }
    }

    fn expire_coin_on_trips(&mut self) {
        for passenger in &mut self.passengers {
            passenger.trip.expire_coin();
        }
    }

    /// The signed world delta for this frame. Knock-back overrides input.
    fn scroll_delta(&mut self, input: &InputState) -> f64 {
        if self.driver.is_walking() {
            if let Some((dir, _)) = self.driver.person.knockback.advance() {
                self.driver.person.body.move_x(dir);
                return -dir;
            }
            if self.driver.is_dead() {
                return 0.0;
            }
            if input.up {
                // on foot the world still scrolls at taxi speed while the
                // driver walks up the screen
                let step = self.driver.person.body.speed_y;
                self.driver.person.body.move_y(-step);
                return self.taxi.body.speed_y;
            }
            if input.down {
                let step = self.driver.person.body.speed_y;
                self.driver.person.body.move_y(step);
            }
            0.0
        } else {
            if let Some((dir, _)) = self.taxi.knockback.advance() {
                return -dir;
            }
            if input.up {
                return self.taxi.body.speed_y;
            }
            0.0
        }
    }

    fn broadcast_scroll<R: Rng>(&mut self, delta: f64, spawner: &mut SpawnService<R>) {
        self.background.move_y(delta);
        for power_up in &mut self.power_ups {
            power_up.scroll(delta);
        }
        for passenger in &mut self.passengers {
            passenger.scroll(delta);
        }
        for car in &mut self.traffic {
            if car.scroll(delta) {
                if let Some(class) = car.speed_class() {
                    car.body.speed_y = spawner.draw_speed(class);
                }
            }
        }
        if self.driver.is_walking() {
            self.taxi.scroll(delta);
        } else {
            self.taxi.damage.scroll(delta);
        }
        self.driver.person.damage.scroll(delta);
    }

    /// A walking driver who reaches the taxi gets in; an ejected passenger
    /// starts walking back to it.
    fn check_boarding(&mut self) {
        if !self.driver.is_walking() || self.driver.is_dead() || self.taxi.is_dead() {
            return;
        }
        let reach = self.taxi.body.radius();
        if self.driver.position().distance_to(&self.taxi.body.position) >= reach {
            return;
        }
        self.driver.board(self.taxi.body.position);
        info!("driver boarded taxi");
        if let Some(passenger) = self
            .driver
            .passenger()
            .and_then(|idx| self.passengers.get_mut(idx))
        {
            passenger.start_reboarding();
        }
    }

    fn steer(&mut self, input: &InputState) {
        if self.driver.is_walking() {
            if self.driver.is_dead() {
                return;
            }
            let speed = self.driver.person.speed_x;
            if input.right {
                self.driver.person.body.move_x(speed);
            }
            if input.left {
                self.driver.person.body.move_x(-speed);
            }
            let follow = self.driver.position().offset(-EJECT_OFFSET, 0.0);
            if let Some(passenger) = self.carried_passenger_mut() {
                if passenger.state() == PassengerState::Ejected {
                    passenger.person.approach(follow);
                }
            }
            return;
        }

        // a smoking or burning taxi cannot be steered
        if !self.taxi.damage.has_active_effect() {
            let speed = self.config.taxi.speed_x;
            if input.right {
                self.driver.person.body.move_x(speed);
            }
            if input.left {
                self.driver.person.body.move_x(-speed);
            }
        }
        let at = self.driver.position();
        self.taxi.body.position = at;
        if let Some(passenger) = self.carried_passenger_mut() {
            if passenger.state() == PassengerState::Riding {
                passenger.person.body.position = at;
            }
        }
    }

    fn carried_passenger_mut(&mut self) -> Option<&mut Passenger> {
        let idx = self.driver.passenger()?;
        self.passengers.get_mut(idx)
    }

    /// Pickup, drop-off and re-boarding, all of which need a stationary player.
    fn check_passengers(&mut self) {
        if !self.driver.is_driving() {
            return;
        }
        let taxi_at = self.taxi.body.position;

        let Some(idx) = self.driver.passenger() else {
            self.try_pickup(taxi_at);
            return;
        };
        let Some(passenger) = self.passengers.get_mut(idx) else {
            self.driver.release_passenger();
            return;
        };
        match passenger.state() {
            PassengerState::Riding if passenger.trip.can_drop_off_at(taxi_at) => {
                let payout = passenger.trip.complete(taxi_at);
                passenger.drop_off();
                self.total_earnings += payout;
                self.driver.release_passenger();
                info!(
                    payout,
                    penalty = passenger.trip.penalty(),
                    total = self.total_earnings,
                    "passenger dropped off"
                );
            }
            PassengerState::Reboarding => {
                if passenger.reboard_step(taxi_at) {
                    debug!("passenger back in taxi");
                }
            }
            _ => {}
        }
    }

    fn try_pickup(&mut self, taxi_at: Point) {
        let mut picked = None;
        for (idx, passenger) in self.passengers.iter_mut().enumerate() {
            if !passenger.can_be_picked_up() {
                continue;
            }
            let in_range =
                passenger.position().distance_to(&taxi_at) <= passenger.taxi_detect_radius();
            if !in_range {
                passenger.stop_approach();
                continue;
            }
            if picked.is_none() && passenger.approach_taxi(taxi_at) {
                passenger.collect();
                picked = Some(idx);
            }
        }
        if let Some(idx) = picked {
            self.driver.take_passenger(idx);
            info!(passenger = idx, "passenger picked up");
        }
    }

    fn collect_power_ups(&mut self) {
        if self.driver.is_dead() {
            return;
        }
        let reach = self.driver.person.body.radius();
        let at = self.driver.position();
        for idx in 0..self.power_ups.len() {
            let power_up = &mut self.power_ups[idx];
            if power_up.is_collected()
                || at.distance_to(&power_up.body.position) >= reach + power_up.body.radius()
            {
                continue;
            }
            power_up.collect();
            let kind = power_up.kind();
            info!(?kind, "power-up collected");
            match kind {
                PowerUpKind::Coin => self.take_coin(idx),
                PowerUpKind::Invincibility => {
                    if let Some(old) = self.driver.hold_invincible(idx) {
                        if let Some(p) = self.power_ups.get_mut(old) {
                            p.expire_now();
                        }
                    }
                }
            }
        }
    }

    /// A second coin first expires the one already held, so trips never stack
    /// two bumps.
    fn take_coin(&mut self, idx: usize) {
        if let Some(old) = self.driver.hold_coin(idx) {
            if let Some(p) = self.power_ups.get_mut(old) {
                p.expire_now();
            }
            self.expire_coin_on_trips();
        }
        if !self.power_ups.get(idx).is_some_and(|p| p.is_active()) {
            self.driver.drop_coin();
            return;
        }
        for passenger in &mut self.passengers {
            passenger.trip.apply_coin();
        }
    }

    fn prune(&mut self) {
        let h = self.config.window.height;
        let (min_y, max_y) = (-PRUNE_MARGIN * h, (1.0 + PRUNE_MARGIN) * h);
        for car in &mut self.traffic {
            car.prune_projectiles(min_y, max_y);
        }
        self.traffic.retain(|car| {
            let y = car.body.position.y;
            let on_road = y >= min_y && y <= max_y;
            let in_play = car.body.visible || !car.projectiles().is_empty();
            on_road && in_play
        });
    }

    fn evaluate(&self) -> GameStatus {
        if self
            .passengers
            .iter()
            .any(|p| p.person.damage.death_effect_elapsed())
        {
            return GameStatus::Lost(LossReason::PassengerDied);
        }
        if self.taxi.body.position.y > self.config.window.height {
            return GameStatus::Lost(LossReason::TaxiLeftScreen);
        }
        if self.driver.person.damage.death_effect_elapsed() {
            return GameStatus::Lost(LossReason::DriverDied);
        }
        if self.frames_left == 0 {
            return GameStatus::Lost(LossReason::OutOfFrames);
        }
        if self.total_earnings >= self.config.game_play.target {
            return GameStatus::Won;
        }
        GameStatus::Continue
    }
}

// ── Snapshot ─────────────────────────────────────────────────────────────────

impl Session {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn weather(&self) -> &WeatherTimeline {
        &self.weather
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn taxi(&self) -> &Vehicle {
        &self.taxi
    }

    pub fn traffic(&self) -> &[Vehicle] {
        &self.traffic
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn total_earnings(&self) -> f64 {
        self.total_earnings
    }

    pub fn target(&self) -> f64 {
        self.config.game_play.target
    }

    pub fn frames_left(&self) -> u32 {
        self.frames_left
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The trip shown in the HUD: the one in progress, else the last one.
    pub fn current_trip(&self) -> Option<&Trip> {
        let idx = self.driver.last_trip()?;
        self.passengers.get(idx).map(|p| &p.trip)
    }

    /// Frames the held coin has been active for.
    pub fn active_coin_frames(&self) -> Option<u32> {
        let idx = self.driver.coin()?;
        self.power_ups.get(idx)?.active_frames()
    }

    /// The passenger whose health the HUD shows: the one being carried, else
    /// the weakest that has not yet arrived.
    pub fn featured_passenger(&self) -> Option<&Passenger> {
        if let Some(p) = self.driver.passenger().and_then(|i| self.passengers.get(i)) {
            return Some(p);
        }
        self.passengers
            .iter()
            .filter(|p| !p.has_arrived())
            .min_by(|a, b| {
                a.person
                    .damage
                    .health()
                    .total_cmp(&b.person.damage.health())
            })
    }
}

// ── Test hooks ───────────────────────────────────────────────────────────────

impl Session {
    /// Places a vehicle directly into the traffic list.
    #[doc(hidden)]
    pub fn push_traffic(&mut self, vehicle: Vehicle) {
        self.traffic.push(vehicle);
    }

    #[doc(hidden)]
    pub fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }

    #[doc(hidden)]
    pub fn taxi_mut(&mut self) -> &mut Vehicle {
        &mut self.taxi
    }

    #[doc(hidden)]
    pub fn passengers_mut(&mut self) -> &mut [Passenger] {
        &mut self.passengers
    }
}
