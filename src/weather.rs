use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeatherKind {
    #[default]
    Sunny,
    Raining,
}

impl FromStr for WeatherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUNNY" => Ok(WeatherKind::Sunny),
            "RAINING" => Ok(WeatherKind::Raining),
            other => Err(format!("unknown weather `{other}`")),
        }
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherKind::Sunny => write!(f, "SUNNY"),
            WeatherKind::Raining => write!(f, "RAINING"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeatherEvent {
    pub kind: WeatherKind,
    pub start: u32,
    pub end: u32,
}

/// Scheduled weather, consumed front to back exactly once per session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherTimeline {
    pending: VecDeque<WeatherEvent>,
    current: WeatherKind,
}

impl WeatherTimeline {
    /// Events are ordered by start frame; ties keep their input order.
    pub fn new(mut events: Vec<WeatherEvent>) -> Self {
        events.sort_by_key(|e| e.start);
        Self {
            pending: events.into(),
            current: WeatherKind::Sunny,
        }
    }

    pub fn current(&self) -> WeatherKind {
        self.current
    }

    pub fn is_raining(&self) -> bool {
        self.current == WeatherKind::Raining
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Dequeues every event whose start frame has been reached by `elapsed`,
    /// returning them in order.
    pub fn advance(&mut self, elapsed: u32) -> Vec<WeatherEvent> {
        let mut fired = Vec::new();
        while self.pending.front().is_some_and(|e| e.start <= elapsed) {
            if let Some(event) = self.pending.pop_front() {
                self.current = event.kind;
                fired.push(event);
            }
        }
        fired
    }
}
