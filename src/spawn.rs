/// Stochastic traffic: decides each frame whether a new car or hostile car
/// appears, where, and how fast. All randomness in a session flows through the
/// RNG owned here, so a seeded RNG replays the same session.
use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::Point;
use crate::vehicles::{SpeedClass, Vehicle};

/// Number of stock ordinary-car sprites.
const CAR_VARIANTS: u8 = 2;

pub struct SpawnService<R: Rng> {
    rng: R,
    config: GameConfig,
}

impl<R: Rng> SpawnService<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            rng,
            config: config.clone(),
        }
    }

    fn entry_point(&mut self) -> Point {
        let lanes = self.config.lanes;
        let edges = self.config.spawn.edge_y;
        let x = lanes[self.rng.gen_range(0..lanes.len())];
        let y = edges[self.rng.gen_range(0..edges.len())];
        Point::new(x, y)
    }

    /// Uniform integer speed from the class's inclusive range.
    pub fn draw_speed(&mut self, class: SpeedClass) -> f64 {
        let car = match class {
            SpeedClass::Ordinary => &self.config.other_car,
            SpeedClass::Hostile => &self.config.enemy_car,
        };
        let (min, max) = (car.min_speed_y, car.max_speed_y);
        f64::from(self.rng.gen_range(min..=max))
    }

    pub fn roll_ordinary(&mut self) -> Option<Vehicle> {
        if !self.rng.gen_bool(self.config.spawn.ordinary_probability) {
            return None;
        }
        let position = self.entry_point();
        let variant = self.rng.gen_range(1..=CAR_VARIANTS);
        let speed = self.draw_speed(SpeedClass::Ordinary);
        debug!(x = position.x, y = position.y, speed, "ordinary car spawned");
        Some(Vehicle::ordinary(&self.config, position, speed, variant))
    }

    pub fn roll_hostile(&mut self) -> Option<Vehicle> {
        if !self.rng.gen_bool(self.config.spawn.hostile_probability) {
            return None;
        }
        let position = self.entry_point();
        let speed = self.draw_speed(SpeedClass::Hostile);
        debug!(x = position.x, y = position.y, speed, "hostile car spawned");
        Some(Vehicle::hostile(&self.config, position, speed))
    }

    /// Whether a visible hostile car fires this frame.
    pub fn roll_projectile(&mut self) -> bool {
        self.rng.gen_bool(self.config.spawn.projectile_probability)
    }

    /// A fresh taxi in an outer lane, somewhere in the configured vertical band.
    pub fn replacement_taxi(&mut self) -> Vehicle {
        let lanes = [self.config.lanes[0], self.config.lanes[2]];
        let x = lanes[self.rng.gen_range(0..lanes.len())];
        let taxi = &self.config.taxi;
        let y = if taxi.next_spawn_min_y < taxi.next_spawn_max_y {
            self.rng.gen_range(taxi.next_spawn_min_y..taxi.next_spawn_max_y)
        } else {
            taxi.next_spawn_min_y
        };
        Vehicle::taxi(&self.config, Point::new(x, y.floor()))
    }
}
