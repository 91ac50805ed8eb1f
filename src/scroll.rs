/// Two stacked copies of the road image, scrolled together to fake forward
/// motion. Whichever copy leaves the wrap band is re-stacked against the other,
/// so `|offset1 - offset2|` always equals the window height.

/// Wrap band, as multiples of the window height.
const BACKGROUND_MIN: f64 = -0.5;
const BACKGROUND_MAX: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    offset1: f64,
    offset2: f64,
    window_height: f64,
    raining: bool,
}

impl Background {
    pub fn new(window_height: f64) -> Self {
        let offset1 = window_height / 2.0;
        Self {
            offset1,
            offset2: -offset1,
            window_height,
            raining: false,
        }
    }

    /// Centre y of each copy.
    pub fn offsets(&self) -> (f64, f64) {
        (self.offset1, self.offset2)
    }

    /// Distance between the two copies; always the window height.
    pub fn seam_gap(&self) -> f64 {
        (self.offset1 - self.offset2).abs()
    }

    pub fn is_raining(&self) -> bool {
        self.raining
    }

    pub fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
    }

    pub fn move_y(&mut self, delta: f64) {
        let h = self.window_height;
        self.offset1 += delta;
        self.offset2 += delta;

        // moving forward
        if self.offset1 >= BACKGROUND_MAX * h {
            self.offset1 = self.offset2 - h;
        }
        if self.offset2 >= BACKGROUND_MAX * h {
            self.offset2 = self.offset1 - h;
        }

        // moving backward
        if self.offset1 < BACKGROUND_MIN * h {
            self.offset1 = self.offset2 + h;
        }
        if self.offset2 < BACKGROUND_MIN * h {
            self.offset2 = self.offset1 + h;
        }
    }
}
