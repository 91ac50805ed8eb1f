/// Cars: ordinary traffic, hostile cars with their projectiles, and the
/// player's taxi. One struct, behaviour chosen by `VehicleKind`.
use crate::config::{CarConfig, GameConfig, ProjectileConfig};
use crate::damage::{DamageOutcome, DamageState, EffectProfile, Knockback, HEALTH_SCALE};
use crate::entities::{Body, Point};

/// Per-frame push applied to a knocked-back vehicle.
pub const VEHICLE_KNOCKBACK_STEP: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedClass {
    Ordinary,
    Hostile,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VehicleKind {
    /// `variant` picks one of the stock car sprites.
    Ordinary { variant: u8 },
    Hostile { projectiles: Vec<Projectile> },
    Taxi,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub body: Body,
    pub damage: DamageState,
    pub knockback: Knockback,
    pub kind: VehicleKind,
    /// Set each frame while the taxi is driven by a driver holding invincibility.
    pub shielded: bool,
    damage_dealt: f64,
}

impl Vehicle {
    fn from_car(config: &GameConfig, car: &CarConfig, position: Point, speed_y: f64, kind: VehicleKind) -> Self {
        Self {
            body: Body::new(position, car.radius, speed_y),
            damage: DamageState::new(
                car.health,
                EffectProfile::vehicle(config.effects.smoke_ttl, config.effects.fire_ttl),
            ),
            knockback: Knockback::default(),
            kind,
            shielded: false,
            damage_dealt: car.damage * HEALTH_SCALE,
        }
    }

    pub fn ordinary(config: &GameConfig, position: Point, speed_y: f64, variant: u8) -> Self {
        Self::from_car(config, &config.other_car, position, speed_y, VehicleKind::Ordinary { variant })
    }

    pub fn hostile(config: &GameConfig, position: Point, speed_y: f64) -> Self {
        Self::from_car(
            config,
            &config.enemy_car,
            position,
            speed_y,
            VehicleKind::Hostile {
                projectiles: Vec::new(),
            },
        )
    }

    pub fn taxi(config: &GameConfig, position: Point) -> Self {
        let taxi = &config.taxi;
        Self {
            body: Body::new(position, taxi.radius, taxi.speed_y),
            damage: DamageState::new(
                taxi.health,
                EffectProfile::vehicle(config.effects.smoke_ttl, config.effects.fire_ttl),
            ),
            knockback: Knockback::default(),
            kind: VehicleKind::Taxi,
            shielded: false,
            damage_dealt: taxi.damage * HEALTH_SCALE,
        }
    }

    /// Scaled damage this vehicle inflicts on contact.
    pub fn damage_dealt(&self) -> f64 {
        self.damage_dealt
    }

    pub fn is_taxi(&self) -> bool {
        matches!(self.kind, VehicleKind::Taxi)
    }

    pub fn is_hostile(&self) -> bool {
        matches!(self.kind, VehicleKind::Hostile { .. })
    }

    pub fn is_dead(&self) -> bool {
        self.damage.is_dead()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.damage.is_invulnerable() || self.shielded
    }

    /// Speed range a vehicle redraws from after knock-back; the taxi keeps its own.
    pub fn speed_class(&self) -> Option<SpeedClass> {
        match self.kind {
            VehicleKind::Ordinary { .. } => Some(SpeedClass::Ordinary),
            VehicleKind::Hostile { .. } => Some(SpeedClass::Hostile),
            VehicleKind::Taxi => None,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        match &self.kind {
            VehicleKind::Hostile { projectiles } => projectiles,
            _ => &[],
        }
    }

    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        match &mut self.kind {
            VehicleKind::Hostile { projectiles } => projectiles,
            _ => &mut [],
        }
    }

    /// Launches a projectile from the current position. No-op for non-hostiles.
    pub fn fire(&mut self, config: &ProjectileConfig) {
        let origin = self.body.position;
        if let VehicleKind::Hostile { projectiles } = &mut self.kind {
            projectiles.push(Projectile::new(config, origin));
        }
    }

    pub fn knock_away_from(&mut self, from: Point) {
        self.knockback
            .start_away_from(from, self.body.position, VEHICLE_KNOCKBACK_STEP);
    }

    /// Knock-back away from `from`, a fresh immunity window, then the damage.
    pub fn receive_hit(&mut self, from: Point, amount: f64) -> DamageOutcome {
        self.knock_away_from(from);
        self.damage.set_immune_for();
        self.damage.take_damage(amount, self.body.position)
    }

    /// Applies this frame's world delta.
    ///
    /// Returns `true` when a knock-back ended this frame and the vehicle needs a
    /// fresh cruising speed.
    pub fn scroll(&mut self, delta: f64) -> bool {
        let mut needs_speed = false;
        if let Some((offset, finished)) = self.knockback.advance() {
            self.body.move_y(delta + offset);
            needs_speed = finished && self.speed_class().is_some();
        } else if self.is_taxi() || self.damage.has_active_effect() {
            // parked taxi, or stalled while smoking / burning
            self.body.move_y(delta);
        } else {
            self.body.move_y(delta - self.body.speed_y);
        }
        self.damage.scroll(delta);

        for projectile in self.projectiles_mut() {
            let speed = projectile.body.speed_y;
            projectile.body.move_y(delta - speed);
        }
        needs_speed
    }

    pub fn upkeep(&mut self) {
        if self.damage.upkeep() {
            self.body.visible = false;
        }
    }

    /// Drops spent projectiles and ones that have left the band `[min_y, max_y]`.
    pub fn prune_projectiles(&mut self, min_y: f64, max_y: f64) {
        if let VehicleKind::Hostile { projectiles } = &mut self.kind {
            projectiles.retain(|p| {
                p.body.visible && p.body.position.y >= min_y && p.body.position.y <= max_y
            });
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A one-shot fireball launched by a hostile car.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub body: Body,
    damage: f64,
}

impl Projectile {
    pub fn new(config: &ProjectileConfig, position: Point) -> Self {
        Self {
            body: Body::new(position, config.radius, config.shoot_speed_y),
            damage: config.damage * HEALTH_SCALE,
        }
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn is_spent(&self) -> bool {
        !self.body.visible
    }
}
