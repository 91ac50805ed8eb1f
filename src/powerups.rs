use crate::config::PowerUpConfig;
use crate::countdown::Countdown;
use crate::entities::{Body, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Bumps every open trip's priority by one while held.
    Coin,
    /// Makes its holder (and a taxi they drive) immune while held.
    Invincibility,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpState {
    Available,
    Active(Countdown),
    Expired,
}

/// Placed at level load, collected at most once, gone for good on expiry.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub body: Body,
    kind: PowerUpKind,
    state: PowerUpState,
    max_frames: u32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, config: &PowerUpConfig, position: Point) -> Self {
        Self {
            body: Body::new(position, config.radius, 0.0),
            kind,
            state: PowerUpState::Available,
            max_frames: config.max_frames,
        }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn state(&self) -> PowerUpState {
        self.state
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    pub fn is_collected(&self) -> bool {
        !matches!(self.state, PowerUpState::Available)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PowerUpState::Active(_))
    }

    /// Frames since collection, while active.
    pub fn active_frames(&self) -> Option<u32> {
        match self.state {
            PowerUpState::Active(timer) => Some(self.max_frames - timer.remaining()),
            _ => None,
        }
    }

    /// Picks the power-up up. Returns `false` if it was already taken.
    pub fn collect(&mut self) -> bool {
        if self.is_collected() {
            return false;
        }
        self.body.visible = false;
        self.state = if self.max_frames == 0 {
            PowerUpState::Expired
        } else {
            PowerUpState::Active(Countdown::started(self.max_frames))
        };
        true
    }

    /// One frame of holding. Returns `true` on the frame the effect runs out.
    pub fn tick(&mut self) -> bool {
        let PowerUpState::Active(mut timer) = self.state else {
            return false;
        };
        if timer.tick() {
            self.state = PowerUpState::Expired;
            return true;
        }
        self.state = PowerUpState::Active(timer);
        false
    }

    /// Ends an active effect early (a second one of the same kind replaced it).
    pub fn expire_now(&mut self) {
        if self.is_active() {
            self.state = PowerUpState::Expired;
        }
    }

    pub fn scroll(&mut self, delta: f64) {
        self.body.move_y(delta);
    }
}
