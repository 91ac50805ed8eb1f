/// Level definitions: initial placements and the weather schedule, both CSV.
///
/// Objects, one per line:
///
/// ```text
/// DRIVER,360,500
/// TAXI,360,420
/// COIN,480,-900
/// INVINCIBLE_POWER,620,-2200
/// # x,y,priority,endX,distY,hasUmbrella
/// PASSENGER,480,100,2,620,1500,false
/// ```
///
/// Weather, one event per line: `RAINING,300,900`.
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::entities::Point;
use crate::error::{GameError, Result};
use crate::trip::{PRIORITY_MAX, PRIORITY_MIN};
use crate::weather::{WeatherEvent, WeatherKind};

#[derive(Clone, Debug, PartialEq)]
pub enum LevelObject {
    Driver(Point),
    Taxi(Point),
    Coin(Point),
    Invincible(Point),
    Passenger {
        position: Point,
        priority: u8,
        end_x: f64,
        distance_y: f64,
        has_umbrella: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub objects: Vec<LevelObject>,
    pub weather: Vec<WeatherEvent>,
}

impl Level {
    pub fn from_readers(objects: impl Read, weather: impl Read) -> Result<Self> {
        let level = Self {
            objects: parse_objects(objects)?,
            weather: parse_weather(weather)?,
        };
        level.validate()?;
        Ok(level)
    }

    pub fn from_paths(objects: impl AsRef<Path>, weather: impl AsRef<Path>) -> Result<Self> {
        Self::from_readers(File::open(objects)?, File::open(weather)?)
    }

    pub fn driver_position(&self) -> Option<Point> {
        self.objects.iter().find_map(|o| match o {
            LevelObject::Driver(p) => Some(*p),
            _ => None,
        })
    }

    pub fn taxi_position(&self) -> Option<Point> {
        self.objects.iter().find_map(|o| match o {
            LevelObject::Taxi(p) => Some(*p),
            _ => None,
        })
    }

    /// Exactly one driver and one taxi.
    pub fn validate(&self) -> Result<()> {
        let count = |want: fn(&LevelObject) -> bool| self.objects.iter().filter(|o| want(o)).count();
        let drivers = count(|o| matches!(o, LevelObject::Driver(_)));
        let taxis = count(|o| matches!(o, LevelObject::Taxi(_)));
        if drivers != 1 {
            return Err(GameError::level(0, format!("expected one DRIVER, found {drivers}")));
        }
        if taxis != 1 {
            return Err(GameError::level(0, format!("expected one TAXI, found {taxis}")));
        }
        Ok(())
    }

    /// The level the binary plays when none is given.
    pub fn demo() -> Self {
        let p = Point::new;
        Self {
            objects: vec![
                LevelObject::Driver(p(360.0, 560.0)),
                LevelObject::Taxi(p(360.0, 470.0)),
                LevelObject::Coin(p(480.0, -400.0)),
                LevelObject::Coin(p(620.0, -2600.0)),
                LevelObject::Invincible(p(360.0, -1500.0)),
                LevelObject::Passenger {
                    position: p(290.0, 250.0),
                    priority: 2,
                    end_x: 620.0,
                    distance_y: 1500.0,
                    has_umbrella: false,
                },
                LevelObject::Passenger {
                    position: p(700.0, -1800.0),
                    priority: 3,
                    end_x: 360.0,
                    distance_y: 2200.0,
                    has_umbrella: true,
                },
                LevelObject::Passenger {
                    position: p(290.0, -4500.0),
                    priority: 1,
                    end_x: 480.0,
                    distance_y: 2800.0,
                    has_umbrella: false,
                },
            ],
            weather: vec![
                WeatherEvent {
                    kind: WeatherKind::Sunny,
                    start: 0,
                    end: 600,
                },
                WeatherEvent {
                    kind: WeatherKind::Raining,
                    start: 601,
                    end: 1800,
                },
                WeatherEvent {
                    kind: WeatherKind::Sunny,
                    start: 1801,
                    end: 15_000,
                },
            ],
        }
    }
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(source)
}

fn line_of(record: &StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback as u64 + 1)
}

fn field<T: FromStr>(record: &StringRecord, idx: usize, name: &str, line: u64) -> Result<T> {
    let raw = record
        .get(idx)
        .ok_or_else(|| GameError::level(line, format!("missing field `{name}`")))?;
    raw.parse()
        .map_err(|_| GameError::level(line, format!("`{name}` has malformed value `{raw}`")))
}

fn point(record: &StringRecord, line: u64) -> Result<Point> {
    Ok(Point::new(
        field(record, 1, "x", line)?,
        field(record, 2, "y", line)?,
    ))
}

fn flag(record: &StringRecord, idx: usize, name: &str, line: u64) -> Result<bool> {
    let raw = record
        .get(idx)
        .ok_or_else(|| GameError::level(line, format!("missing field `{name}`")))?;
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(GameError::level(line, format!("`{name}` must be true or false, got `{raw}`"))),
    }
}

pub fn parse_objects(source: impl Read) -> Result<Vec<LevelObject>> {
    let mut objects = Vec::new();
    for (i, record) in reader(source).records().enumerate() {
        let record = record?;
        let line = line_of(&record, i);
        let tag = record.get(0).unwrap_or_default();
        let object = match tag {
            "DRIVER" => LevelObject::Driver(point(&record, line)?),
            "TAXI" => LevelObject::Taxi(point(&record, line)?),
            "COIN" => LevelObject::Coin(point(&record, line)?),
            "INVINCIBLE_POWER" => LevelObject::Invincible(point(&record, line)?),
            "PASSENGER" => {
                let priority: u8 = field(&record, 3, "priority", line)?;
                if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
                    return Err(GameError::level(
                        line,
                        format!("priority {priority} outside {PRIORITY_MIN}..={PRIORITY_MAX}"),
                    ));
                }
                LevelObject::Passenger {
                    position: point(&record, line)?,
                    priority,
                    end_x: field(&record, 4, "endX", line)?,
                    distance_y: field(&record, 5, "distY", line)?,
                    has_umbrella: flag(&record, 6, "hasUmbrella", line)?,
                }
            }
            other => {
                return Err(GameError::level(line, format!("unknown object `{other}`")));
            }
        };
        objects.push(object);
    }
    Ok(objects)
}

pub fn parse_weather(source: impl Read) -> Result<Vec<WeatherEvent>> {
    let mut events = Vec::new();
    for (i, record) in reader(source).records().enumerate() {
        let record = record?;
        let line = line_of(&record, i);
        let kind: WeatherKind = record
            .get(0)
            .unwrap_or_default()
            .parse()
            .map_err(|reason: String| GameError::level(line, reason))?;
        let start: u32 = field(&record, 1, "start", line)?;
        let end: u32 = field(&record, 2, "end", line)?;
        if end < start {
            return Err(GameError::level(line, format!("weather ends ({end}) before it starts ({start})")));
        }
        events.push(WeatherEvent { kind, start, end });
    }
    events.sort_by_key(|e| e.start);
    Ok(events)
}
