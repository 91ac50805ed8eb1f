/// Health, death, immunity and knock-back: the state machine shared by every
/// actor that can be hit.
///
/// ```text
///   Alive-Vulnerable ──hit / grant──▶ Alive-Invulnerable ──window ends──▶ Alive-Vulnerable
///          │                                  │
///          └──────── health ≤ 0 ──────────────┴──▶ Dead (effect runs, then vanishes)
/// ```
use crate::countdown::Countdown;
use crate::entities::Point;

/// Immunity granted after a hit or by an explicit grant, in frames.
pub const IMMUNITY_FRAMES: u32 = 200;
/// How long a victim is pushed away after a collision.
pub const KNOCKBACK_FRAMES: u32 = 10;
/// Health and damage are stored multiplied by this to keep two decimals exact.
pub const HEALTH_SCALE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Smoke,
    Fire,
    Blood,
}

impl EffectKind {
    /// Death-class effects take the actor out of play once they finish.
    pub fn removes_actor(self) -> bool {
        matches!(self, EffectKind::Fire | EffectKind::Blood)
    }
}

/// A damage indicator pinned to the scene where it started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub anchor: Point,
    pub timer: Countdown,
}

/// Which effects an actor shows when hurt and when killed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectProfile {
    pub hit: Option<(EffectKind, u32)>,
    pub death: (EffectKind, u32),
}

impl EffectProfile {
    pub fn vehicle(smoke_frames: u32, fire_frames: u32) -> Self {
        Self {
            hit: Some((EffectKind::Smoke, smoke_frames)),
            death: (EffectKind::Fire, fire_frames),
        }
    }

    pub fn person(blood_frames: u32) -> Self {
        Self {
            hit: None,
            death: (EffectKind::Blood, blood_frames),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead; nothing changed.
    Ignored,
    Hurt,
    Killed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DamageState {
    health: f64,
    dead: bool,
    immunity: Countdown,
    effect: Option<Effect>,
    profile: EffectProfile,
}

impl DamageState {
    /// `health` is given in display units and scaled internally.
    pub fn new(health: f64, profile: EffectProfile) -> Self {
        Self {
            health: health * HEALTH_SCALE,
            dead: false,
            immunity: Countdown::idle(),
            effect: None,
            profile,
        }
    }

    /// Health in display units.
    pub fn health(&self) -> f64 {
        self.health / HEALTH_SCALE
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtracts an already-scaled `amount`. Once dead, further hits are ignored.
    pub fn take_damage(&mut self, amount: f64, at: Point) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.die(at);
            return DamageOutcome::Killed;
        }
        if let Some((kind, frames)) = self.profile.hit {
            self.effect = Some(Effect {
                kind,
                anchor: at,
                timer: Countdown::started(frames),
            });
        }
        DamageOutcome::Hurt
    }

    /// Forces the dead state. Returns `false` if the actor was already dead.
    pub fn die(&mut self, at: Point) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        let (kind, frames) = self.profile.death;
        self.effect = Some(Effect {
            kind,
            anchor: at,
            timer: Countdown::started(frames),
        });
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.immunity.is_active()
    }

    pub fn set_immune_for(&mut self) {
        self.immunity.start(IMMUNITY_FRAMES);
    }

    pub fn immunity_remaining(&self) -> u32 {
        self.immunity.remaining()
    }

    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    pub fn has_active_effect(&self) -> bool {
        self.effect.is_some()
    }

    /// Dead, and the death effect has run its full course.
    pub fn death_effect_elapsed(&self) -> bool {
        self.dead && self.effect.is_none()
    }

    /// Keeps the effect pinned to its scene position while the world scrolls.
    pub fn scroll(&mut self, delta: f64) {
        if let Some(effect) = self.effect.as_mut() {
            effect.anchor.y += delta;
        }
    }

    /// Per-frame upkeep. Returns `true` when a death-class effect has just
    /// finished and the actor must leave play.
    pub fn upkeep(&mut self) -> bool {
        self.immunity.tick();
        let Some(effect) = self.effect.as_mut() else {
            return false;
        };
        if !effect.timer.is_active() || effect.timer.tick() {
            let kind = effect.kind;
            self.effect = None;
            return kind.removes_actor();
        }
        false
    }
}

// ── Knock-back ────────────────────────────────────────────────────────────────

/// Forced displacement after a collision; overrides normal movement while active.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Knockback {
    timer: Countdown,
    direction: f64,
}

impl Knockback {
    /// Pushes `own` away from `from` along y by `step` per frame.
    pub fn start_away_from(&mut self, from: Point, own: Point, step: f64) {
        self.timer.start(KNOCKBACK_FRAMES);
        self.direction = if from.y > own.y { -step } else { step };
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn remaining(&self) -> u32 {
        self.timer.remaining()
    }

    /// Consumes one frame of knock-back: `(offset, finished_this_frame)`.
    pub fn advance(&mut self) -> Option<(f64, bool)> {
        if !self.timer.is_active() {
            return None;
        }
        let finished = self.timer.tick();
        Some((self.direction, finished))
    }
}
