/// Frame-count timer shared by immunity, knock-back, effects and power-ups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    pub const fn started(frames: u32) -> Self {
        Self { remaining: frames }
    }

    /// (Re)starts the countdown at `frames`.
    pub fn start(&mut self, frames: u32) {
        self.remaining = frames;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Advances one frame. Returns `true` only on the frame the counter hits 0.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}
