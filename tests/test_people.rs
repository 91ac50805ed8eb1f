use taxi_rush::config::GameConfig;
use taxi_rush::entities::Point;
use taxi_rush::people::*;
use taxi_rush::trip::{FareTable, Trip};

fn config() -> GameConfig {
    GameConfig::default()
}

fn passenger_at(cfg: &GameConfig, at: Point) -> Passenger {
    let trip = Trip::new(
        at,
        at.x,
        300.0,
        2,
        false,
        FareTable::from_config(&cfg.trip),
        cfg.trip.end_flag_radius,
    );
    Passenger::new(cfg, at, trip)
}

// ── Person ────────────────────────────────────────────────────────────────────

#[test]
fn approach_steps_each_axis_without_overshoot() {
    let cfg = config();
    let mut person = Person::new(&cfg.driver, Point::new(0.0, 0.0), 20);
    let target = Point::new(3.0, -5.0);

    assert!(!person.approach(target));
    assert_eq!(person.body.position, Point::new(2.0, -2.0));
    assert!(!person.approach(target));
    assert_eq!(person.body.position, Point::new(3.0, -4.0));
    assert!(person.approach(target));
    assert_eq!(person.body.position, target);
}

#[test]
fn hidden_person_cannot_be_hit() {
    let cfg = config();
    let mut person = Person::new(&cfg.driver, Point::new(0.0, 0.0), 20);
    assert!(!person.is_invulnerable());
    person.body.visible = false;
    assert!(person.is_invulnerable());
}

#[test]
fn person_hit_knocks_back_two_units() {
    let cfg = config();
    let mut person = Person::new(&cfg.driver, Point::new(0.0, 100.0), 20);
    person.receive_hit(Point::new(0.0, 120.0), 500.0);
    assert_eq!(person.knockback.direction(), -PERSON_KNOCKBACK_STEP);
    assert_eq!(person.damage.health(), 15.0);
    assert!(person.is_invulnerable());
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[test]
fn driver_boards_and_is_ejected_beside_the_taxi() {
    let cfg = config();
    let mut driver = Driver::new(&cfg, Point::new(360.0, 500.0));
    assert!(driver.is_walking());

    driver.board(Point::new(360.0, 480.0));
    assert!(driver.is_driving());
    assert!(!driver.person.body.visible);
    assert!(driver.is_invulnerable());
    assert_eq!(driver.position(), Point::new(360.0, 480.0));

    driver.eject();
    assert_eq!(driver.occupancy(), Occupancy::Walking);
    assert!(driver.person.body.visible);
    assert_eq!(driver.position(), Point::new(360.0 - EJECT_OFFSET, 480.0));
}

#[test]
fn invincibility_protects_the_driver() {
    let cfg = config();
    let mut driver = Driver::new(&cfg, Point::new(0.0, 0.0));
    assert!(!driver.is_invulnerable());
    assert_eq!(driver.hold_invincible(3), None);
    assert!(driver.is_invulnerable());
    assert_eq!(driver.hold_invincible(4), Some(3));
    driver.drop_invincible();
    assert!(!driver.has_invincibility());
}

#[test]
fn taking_a_passenger_records_the_trip() {
    let cfg = config();
    let mut driver = Driver::new(&cfg, Point::new(0.0, 0.0));
    driver.take_passenger(2);
    assert_eq!(driver.passenger(), Some(2));
    assert_eq!(driver.last_trip(), Some(2));
    assert_eq!(driver.release_passenger(), Some(2));
    assert_eq!(driver.passenger(), None);
    assert_eq!(driver.last_trip(), Some(2));
}

// ── Passenger ─────────────────────────────────────────────────────────────────

#[test]
fn passenger_pickup_ride_and_arrival() {
    let cfg = config();
    let mut passenger = passenger_at(&cfg, Point::new(362.0, 480.0));
    assert_eq!(passenger.state(), PassengerState::Waiting);
    assert!(passenger.can_be_picked_up());
    assert!(!passenger.trip.marker().visible);

    let taxi = Point::new(360.0, 480.0);
    assert!(!passenger.approach_taxi(taxi));
    assert_eq!(passenger.state(), PassengerState::Approaching);
    assert!(passenger.approach_taxi(taxi));

    passenger.collect();
    assert_eq!(passenger.state(), PassengerState::Riding);
    assert!(passenger.is_collected());
    assert!(!passenger.person.body.visible);
    assert!(passenger.trip.marker().visible);

    passenger.drop_off();
    assert_eq!(passenger.state(), PassengerState::Exiting);
    assert!(passenger.person.body.visible);

    // marker is 300 straight up; one unit per frame
    let mut frames = 0;
    while !passenger.walk_to_destination() {
        frames += 1;
        assert!(frames < 1000);
    }
    assert_eq!(frames, 299);
    assert!(passenger.has_arrived());
    assert!(!passenger.trip.marker().visible);
}

#[test]
fn approach_abandoned_returns_to_waiting() {
    let cfg = config();
    let mut passenger = passenger_at(&cfg, Point::new(400.0, 480.0));
    passenger.approach_taxi(Point::new(360.0, 480.0));
    passenger.stop_approach();
    assert_eq!(passenger.state(), PassengerState::Waiting);
}

#[test]
fn ejected_passenger_reboards() {
    let cfg = config();
    let mut passenger = passenger_at(&cfg, Point::new(360.0, 480.0));
    passenger.collect();
    passenger.eject_to(Point::new(260.0, 480.0));
    assert_eq!(passenger.state(), PassengerState::Ejected);
    assert!(passenger.is_collected());
    assert!(passenger.person.body.visible);

    // not reboarding yet
    assert!(!passenger.reboard_step(Point::new(262.0, 480.0)));

    passenger.start_reboarding();
    assert_eq!(passenger.state(), PassengerState::Reboarding);
    passenger.fall_back();
    assert_eq!(passenger.state(), PassengerState::Ejected);

    passenger.start_reboarding();
    assert!(!passenger.reboard_step(Point::new(262.0, 480.0)));
    assert!(passenger.reboard_step(Point::new(262.0, 480.0)));
    assert_eq!(passenger.state(), PassengerState::Riding);
    assert!(!passenger.person.body.visible);
}

#[test]
fn passenger_and_marker_scroll_together() {
    let cfg = config();
    let mut passenger = passenger_at(&cfg, Point::new(360.0, 480.0));
    let marker_y = passenger.trip.marker().position.y;
    passenger.scroll(5.0);
    assert_eq!(passenger.position().y, 485.0);
    assert_eq!(passenger.trip.marker().position.y, marker_y + 5.0);
}

#[test]
fn dead_passenger_cannot_be_picked_up() {
    let cfg = config();
    let mut passenger = passenger_at(&cfg, Point::new(360.0, 480.0));
    passenger.person.damage.die(passenger.position());
    assert!(!passenger.can_be_picked_up());
}
