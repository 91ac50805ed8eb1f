use taxi_rush::entities::Point;
use taxi_rush::error::GameError;
use taxi_rush::level::*;
use taxi_rush::weather::WeatherKind;

const OBJECTS: &str = "\
DRIVER,360,500
TAXI,360,420
COIN,480,-900
INVINCIBLE_POWER, 620, -2200
PASSENGER,480,100,2,620,1500,false
PASSENGER,290,-300,1,360,800,TRUE
";

const WEATHER: &str = "\
RAINING,300,900
SUNNY,0,299
";

#[test]
fn parses_a_complete_level() {
    let level = Level::from_readers(OBJECTS.as_bytes(), WEATHER.as_bytes()).unwrap();
    assert_eq!(level.objects.len(), 6);
    assert_eq!(level.driver_position(), Some(Point::new(360.0, 500.0)));
    assert_eq!(level.taxi_position(), Some(Point::new(360.0, 420.0)));
    assert_eq!(level.objects[3], LevelObject::Invincible(Point::new(620.0, -2200.0)));
    assert_eq!(
        level.objects[4],
        LevelObject::Passenger {
            position: Point::new(480.0, 100.0),
            priority: 2,
            end_x: 620.0,
            distance_y: 1500.0,
            has_umbrella: false,
        }
    );
    assert!(matches!(
        level.objects[5],
        LevelObject::Passenger { has_umbrella: true, .. }
    ));

    // sorted by start frame
    assert_eq!(level.weather[0].kind, WeatherKind::Sunny);
    assert_eq!(level.weather[1].start, 300);
}

#[test]
fn comment_lines_are_skipped() {
    let objects = "# opening scene\nDRIVER,1,2\nTAXI,3,4\n";
    let parsed = parse_objects(objects.as_bytes()).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[test]
fn malformed_number_reports_its_line() {
    let objects = "DRIVER,360,500\nTAXI,abc,420\n";
    match parse_objects(objects.as_bytes()) {
        Err(GameError::Level { line, reason }) => {
            assert_eq!(line, 2);
            assert!(reason.contains("abc"), "{reason}");
        }
        other => panic!("expected level error, got {other:?}"),
    }
}

#[test]
fn missing_field_is_an_error() {
    let err = parse_objects("COIN,480\n".as_bytes()).unwrap_err();
    assert!(matches!(err, GameError::Level { line: 1, .. }));
}

#[test]
fn priority_must_be_one_to_three() {
    for bad in ["0", "4", "-1"] {
        let objects = format!("PASSENGER,1,2,{bad},3,4,false\n");
        assert!(matches!(
            parse_objects(objects.as_bytes()),
            Err(GameError::Level { .. })
        ));
    }
}

#[test]
fn umbrella_flag_must_be_boolean() {
    let err = parse_objects("PASSENGER,1,2,1,3,4,maybe\n".as_bytes()).unwrap_err();
    assert!(matches!(err, GameError::Level { .. }));
}

#[test]
fn unknown_tag_is_rejected() {
    let err = parse_objects("DRIVER,1,2\nBUS,1,2\n".as_bytes()).unwrap_err();
    assert!(matches!(err, GameError::Level { line: 2, .. }));
}

#[test]
fn weather_cannot_end_before_it_starts() {
    let err = parse_weather("RAINING,50,10\n".as_bytes()).unwrap_err();
    assert!(matches!(err, GameError::Level { line: 1, .. }));
}

#[test]
fn unknown_weather_is_rejected() {
    assert!(parse_weather("HAIL,1,2\n".as_bytes()).is_err());
}

#[test]
fn level_needs_one_driver_and_one_taxi() {
    let err = Level::from_readers("TAXI,1,2\n".as_bytes(), "".as_bytes()).unwrap_err();
    assert!(matches!(err, GameError::Level { .. }));

    let two_taxis = "DRIVER,1,2\nTAXI,1,2\nTAXI,3,4\n";
    assert!(Level::from_readers(two_taxis.as_bytes(), "".as_bytes()).is_err());
}

#[test]
fn demo_level_is_valid() {
    let level = Level::demo();
    level.validate().unwrap();
    assert!(level.weather.windows(2).all(|w| w[0].start <= w[1].start));
}

#[test]
fn loads_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let objects = dir.path().join("level.csv");
    let weather = dir.path().join("weather.csv");
    std::fs::write(&objects, OBJECTS).unwrap();
    std::fs::write(&weather, WEATHER).unwrap();
    let level = Level::from_paths(&objects, &weather).unwrap();
    assert_eq!(level.objects.len(), 6);
    assert_eq!(level.weather.len(), 2);

    assert!(matches!(
        Level::from_paths(dir.path().join("nope.csv"), &weather),
        Err(GameError::Io(_))
    ));
}
