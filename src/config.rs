/// Tunables for a session.
///
/// Every section carries `#[serde(default)]`, so a JSON file only needs the
/// keys it wants to override:
///
/// ```json
/// { "trip": { "rate_per_y": 0.2 }, "game_play": { "target": 800 } }
/// ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    /// x-centres of the three road lanes, left to right.
    pub lanes: [f64; 3],
    pub taxi: TaxiConfig,
    pub driver: PersonConfig,
    pub passenger: PassengerConfig,
    pub other_car: CarConfig,
    pub enemy_car: CarConfig,
    pub projectile: ProjectileConfig,
    pub effects: EffectConfig,
    pub coin: PowerUpConfig,
    pub invincible: PowerUpConfig,
    pub trip: TripConfig,
    pub spawn: SpawnConfig,
    pub game_play: GamePlayConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxiConfig {
    pub radius: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub damage: f64,
    pub health: f64,
    /// Vertical band a replacement taxi appears in.
    pub next_spawn_min_y: f64,
    pub next_spawn_max_y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonConfig {
    pub radius: f64,
    pub walk_speed_x: f64,
    pub walk_speed_y: f64,
    pub health: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassengerConfig {
    pub radius: f64,
    pub walk_speed_x: f64,
    pub walk_speed_y: f64,
    pub health: f64,
    /// How close an occupied taxi must be before a waiting passenger walks over.
    pub taxi_detect_radius: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarConfig {
    pub radius: f64,
    pub damage: f64,
    pub health: f64,
    pub min_speed_y: i32,
    pub max_speed_y: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f64,
    pub damage: f64,
    pub shoot_speed_y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub smoke_ttl: u32,
    pub fire_ttl: u32,
    pub blood_ttl: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub radius: f64,
    pub max_frames: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    pub rate_per_y: f64,
    /// Fee for priority 1, 2 and 3.
    pub priority_fees: [f64; 3],
    pub penalty_per_y: f64,
    pub end_flag_radius: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Chance per frame of a new ordinary car.
    pub ordinary_probability: f64,
    /// Chance per frame of a new hostile car.
    pub hostile_probability: f64,
    /// Chance per frame that a visible hostile car fires.
    pub projectile_probability: f64,
    /// Top and bottom y at which traffic enters.
    pub edge_y: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamePlayConfig {
    pub target: f64,
    pub max_frames: u32,
}

// ── Stock tuning ──────────────────────────────────────────────────────────────

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            lanes: [360.0, 480.0, 620.0],
            taxi: TaxiConfig::default(),
            driver: PersonConfig::default(),
            passenger: PassengerConfig::default(),
            other_car: CarConfig::default(),
            enemy_car: CarConfig {
                radius: 50.0,
                damage: 15.0,
                health: 80.0,
                min_speed_y: 3,
                max_speed_y: 6,
            },
            projectile: ProjectileConfig::default(),
            effects: EffectConfig::default(),
            coin: PowerUpConfig::default(),
            invincible: PowerUpConfig {
                radius: 30.0,
                max_frames: 1000,
            },
            trip: TripConfig::default(),
            spawn: SpawnConfig::default(),
            game_play: GamePlayConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Default for TaxiConfig {
    fn default() -> Self {
        Self {
            radius: 40.0,
            speed_x: 3.0,
            speed_y: 5.0,
            damage: 20.0,
            health: 100.0,
            next_spawn_min_y: 200.0,
            next_spawn_max_y: 400.0,
        }
    }
}

impl Default for PersonConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            walk_speed_x: 2.0,
            walk_speed_y: 2.0,
            health: 20.0,
        }
    }
}

impl Default for PassengerConfig {
    fn default() -> Self {
        Self {
            radius: 25.0,
            walk_speed_x: 1.0,
            walk_speed_y: 1.0,
            health: 20.0,
            taxi_detect_radius: 100.0,
        }
    }
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            damage: 10.0,
            health: 50.0,
            min_speed_y: 2,
            max_speed_y: 5,
        }
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            damage: 10.0,
            shoot_speed_y: 10.0,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            smoke_ttl: 20,
            fire_ttl: 20,
            blood_ttl: 20,
        }
    }
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            max_frames: 500,
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            rate_per_y: 0.1,
            priority_fees: [40.0, 25.0, 10.0],
            penalty_per_y: 0.05,
            end_flag_radius: 80.0,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ordinary_probability: 0.005,
            hostile_probability: 0.002,
            projectile_probability: 0.003,
            edge_y: [-50.0, 768.0],
        }
    }
}

impl Default for GamePlayConfig {
    fn default() -> Self {
        Self {
            target: 500.0,
            max_frames: 15_000,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Rejects tunables the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(GameError::invalid("window", "dimensions must be positive"));
        }
        check_car("other_car", &self.other_car)?;
        check_car("enemy_car", &self.enemy_car)?;
        if self.taxi.next_spawn_min_y > self.taxi.next_spawn_max_y {
            return Err(GameError::invalid(
                "taxi.next_spawn_min_y",
                "must not exceed next_spawn_max_y",
            ));
        }
        let radii = [
            ("taxi.radius", self.taxi.radius),
            ("driver.radius", self.driver.radius),
            ("passenger.radius", self.passenger.radius),
            ("projectile.radius", self.projectile.radius),
            ("coin.radius", self.coin.radius),
            ("invincible.radius", self.invincible.radius),
            ("trip.end_flag_radius", self.trip.end_flag_radius),
        ];
        for (field, radius) in radii {
            if !(radius >= 0.0) {
                return Err(GameError::invalid(field, format!("radius {radius} is negative")));
            }
        }
        let chances = [
            ("spawn.ordinary_probability", self.spawn.ordinary_probability),
            ("spawn.hostile_probability", self.spawn.hostile_probability),
            ("spawn.projectile_probability", self.spawn.projectile_probability),
        ];
        for (field, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(GameError::invalid(field, format!("{p} is not a probability")));
            }
        }
        if self.trip.priority_fees.iter().any(|fee| *fee < 0.0) {
            return Err(GameError::invalid("trip.priority_fees", "fees must be non-negative"));
        }
        if self.trip.rate_per_y < 0.0 || self.trip.penalty_per_y < 0.0 {
            return Err(GameError::invalid("trip", "rates must be non-negative"));
        }
        if self.game_play.max_frames == 0 {
            return Err(GameError::invalid("game_play.max_frames", "must be at least 1"));
        }
        Ok(())
    }
}

fn check_car(field: &'static str, car: &CarConfig) -> Result<()> {
    if car.min_speed_y > car.max_speed_y {
        return Err(GameError::invalid(
            field,
            format!(
                "min_speed_y {} exceeds max_speed_y {}",
                car.min_speed_y, car.max_speed_y
            ),
        ));
    }
    if !(car.radius >= 0.0) {
        return Err(GameError::invalid(field, "radius is negative"));
    }
    Ok(())
}
