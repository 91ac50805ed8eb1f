/// Once-per-frame collision pass.
///
/// Attackers are the traffic list (ordinary cars, hostile cars and their
/// projectiles, wrecks). Victims are the other traffic, the player taxi, every
/// passenger, and the driver while on foot. Each unordered pair of vehicles is
/// exchanged once, the earlier vehicle in the traffic list striking first;
/// the struck vehicle then strikes back if it still can. A fresh immunity
/// window on every victim is what stops a pair from trading blows twice.
use tracing::{debug, info};

use crate::damage::DamageOutcome;
use crate::entities::{Body, Point};
use crate::people::{Driver, Passenger};
use crate::vehicles::{Projectile, Vehicle, VehicleKind};

/// Something that can be hit.
pub trait Damageable {
    fn body(&self) -> &Body;
    fn is_dead(&self) -> bool;
    fn is_invulnerable(&self) -> bool;
    /// Knock-back, immunity, then damage.
    fn receive_hit(&mut self, from: Point, amount: f64) -> DamageOutcome;
    fn label(&self) -> &'static str;
}

/// Something that deals damage on contact.
pub trait Collidable {
    fn position(&self) -> Point;
    /// Scaled damage per hit.
    fn damage_amount(&self) -> f64;
    fn can_hit<V: Damageable + ?Sized>(&self, victim: &V) -> bool;
}

impl Damageable for Vehicle {
    fn body(&self) -> &Body {
        &self.body
    }

    fn is_dead(&self) -> bool {
        Vehicle::is_dead(self)
    }

    fn is_invulnerable(&self) -> bool {
        Vehicle::is_invulnerable(self)
    }

    fn receive_hit(&mut self, from: Point, amount: f64) -> DamageOutcome {
        Vehicle::receive_hit(self, from, amount)
    }

    fn label(&self) -> &'static str {
        match self.kind {
            VehicleKind::Ordinary { .. } => "car",
            VehicleKind::Hostile { .. } => "hostile car",
            VehicleKind::Taxi => "taxi",
        }
    }
}

impl Damageable for Passenger {
    fn body(&self) -> &Body {
        &self.person.body
    }

    fn is_dead(&self) -> bool {
        self.person.is_dead()
    }

    fn is_invulnerable(&self) -> bool {
        self.person.is_invulnerable()
    }

    fn receive_hit(&mut self, from: Point, amount: f64) -> DamageOutcome {
        self.person.receive_hit(from, amount)
    }

    fn label(&self) -> &'static str {
        "passenger"
    }
}

impl Damageable for Driver {
    fn body(&self) -> &Body {
        &self.person.body
    }

    fn is_dead(&self) -> bool {
        Driver::is_dead(self)
    }

    fn is_invulnerable(&self) -> bool {
        Driver::is_invulnerable(self)
    }

    fn receive_hit(&mut self, from: Point, amount: f64) -> DamageOutcome {
        self.person.receive_hit(from, amount)
    }

    fn label(&self) -> &'static str {
        "driver"
    }
}

impl Collidable for Vehicle {
    fn position(&self) -> Point {
        self.body.position
    }

    fn damage_amount(&self) -> f64 {
        self.damage_dealt()
    }

    fn can_hit<V: Damageable + ?Sized>(&self, victim: &V) -> bool {
        !self.is_dead()
            && !victim.is_dead()
            && !victim.is_invulnerable()
            && self.body.touches(victim.body())
    }
}

impl Collidable for Projectile {
    fn position(&self) -> Point {
        self.body.position
    }

    fn damage_amount(&self) -> f64 {
        self.damage()
    }

    fn can_hit<V: Damageable + ?Sized>(&self, victim: &V) -> bool {
        self.body.visible
            && !victim.is_dead()
            && !victim.is_invulnerable()
            && self.body.touches(victim.body())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub hits: u32,
    pub kills: u32,
    pub taxi_destroyed: bool,
}

fn strike<A, V>(attacker: &A, victim: &mut V, report: &mut CollisionReport)
where
    A: Collidable + ?Sized,
    V: Damageable + ?Sized,
{
    report.hits += 1;
    let outcome = victim.receive_hit(attacker.position(), attacker.damage_amount());
    if outcome == DamageOutcome::Killed {
        report.kills += 1;
        debug!(victim = victim.label(), "killed in collision");
    }
}

/// `a` strikes `b`, then `b` strikes back if it still can.
fn exchange(a: &mut Vehicle, b: &mut Vehicle, report: &mut CollisionReport) {
    if a.can_hit(&*b) {
        strike(&*a, &mut *b, report);
    }
    if b.can_hit(&*a) {
        strike(&*b, &mut *a, report);
    }
}

/// One-way contact damage from a vehicle to a person.
fn run_over<V: Damageable>(car: &Vehicle, victim: &mut V, report: &mut CollisionReport) {
    if car.can_hit(&*victim) {
        strike(car, victim, report);
    }
}

/// The shooter's live projectiles against one victim; a projectile is spent on
/// its first hit.
fn shoot<V: Damageable>(shooter: &mut Vehicle, victim: &mut V, report: &mut CollisionReport) {
    for projectile in shooter.projectiles_mut() {
        if projectile.can_hit(&*victim) {
            strike(&*projectile, &mut *victim, report);
            projectile.body.visible = false;
        }
    }
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Runs the collision pass for one frame.
///
/// A taxi killed here hands its driver a fresh immunity window on the spot,
/// before any later attacker in the same pass can reach the driver.
pub fn resolve(
    traffic: &mut [Vehicle],
    taxi: &mut Vehicle,
    driver: &mut Driver,
    passengers: &mut [Passenger],
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for i in 0..traffic.len() {
        for j in 0..traffic.len() {
            if i == j {
                continue;
            }
            let (attacker, victim) = pair_mut(traffic, i, j);
            shoot(attacker, victim, &mut report);
            if i < j {
                exchange(attacker, victim, &mut report);
            }
        }

        let attacker = &mut traffic[i];

        let taxi_was_alive = !taxi.is_dead();
        shoot(attacker, taxi, &mut report);
        exchange(attacker, taxi, &mut report);
        if taxi_was_alive && taxi.is_dead() {
            driver.person.damage.set_immune_for();
            report.taxi_destroyed = true;
            info!("taxi destroyed");
        }

        for passenger in passengers.iter_mut() {
            shoot(attacker, passenger, &mut report);
            run_over(attacker, passenger, &mut report);
        }

        if driver.is_walking() {
            shoot(attacker, driver, &mut report);
            run_over(attacker, driver, &mut report);
        }
    }

    report
}
