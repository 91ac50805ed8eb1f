use taxi_rush::entities::Point;
use taxi_rush::trip::*;

fn fares(rate: f64, fees: [f64; 3], penalty: f64) -> FareTable {
    FareTable {
        rate_per_y: rate,
        priority_fees: fees,
        penalty_per_y: penalty,
    }
}

fn trip(priority: u8, has_umbrella: bool) -> Trip {
    Trip::new(
        Point::new(360.0, 1000.0),
        360.0,
        300.0,
        priority,
        has_umbrella,
        fares(0.1, [60.0, 50.0, 40.0], 0.5),
        10.0,
    )
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Pricing ───────────────────────────────────────────────────────────────────

#[test]
fn earnings_are_distance_plus_priority_fee() {
    let t = trip(2, false);
    assert!(approx(t.earnings(), 80.0), "got {}", t.earnings());
}

#[test]
fn marker_sits_distance_above_start() {
    let t = trip(2, false);
    assert_eq!(t.marker().position, Point::new(360.0, 700.0));
    assert!(!t.marker().visible);
}

#[test]
fn stopping_short_costs_a_penalty() {
    let mut t = trip(2, false);
    let payout = t.complete(Point::new(360.0, 740.0));
    assert!(approx(t.penalty(), 20.0));
    assert!(approx(payout, 60.0));
    assert!(t.is_completed());
}

#[test]
fn penalty_never_exceeds_earnings() {
    let mut t = Trip::new(
        Point::new(0.0, 1000.0),
        0.0,
        300.0,
        3,
        false,
        fares(0.01, [20.0, 15.0, 10.0], 0.5),
        10.0,
    );
    let earnings = t.earnings();
    assert!(approx(earnings, 13.0));
    let payout = t.complete(Point::new(0.0, 740.0));
    assert!(approx(t.penalty(), earnings));
    assert!(approx(payout, 0.0));
}

#[test]
fn penalty_bounds_hold_for_any_stop() {
    for y in (-2000..3000).step_by(37) {
        let mut t = trip(1, false);
        t.complete(Point::new(360.0, f64::from(y)));
        assert!(t.penalty() >= 0.0);
        assert!(t.penalty() <= t.earnings());
    }
}

#[test]
fn no_penalty_inside_marker_radius() {
    let mut t = trip(2, false);
    t.complete(Point::new(365.0, 705.0));
    assert_eq!(t.penalty(), 0.0);
}

#[test]
fn completion_is_frozen() {
    let mut t = trip(2, false);
    let first = t.complete(Point::new(360.0, 740.0));
    let second = t.complete(Point::new(360.0, 700.0));
    assert_eq!(first, second);

    t.apply_rain_start();
    t.apply_coin();
    assert_eq!(t.priority(), 2);
    assert!(approx(t.payout(), first));
}

#[test]
fn drop_off_allowed_at_or_past_the_marker() {
    let t = trip(2, false);
    assert!(t.can_drop_off_at(Point::new(600.0, 700.0)));
    assert!(t.can_drop_off_at(Point::new(600.0, 650.0)));
    assert!(t.can_drop_off_at(Point::new(363.0, 708.0)));
    assert!(!t.can_drop_off_at(Point::new(360.0, 740.0)));
}

// ── Priority adjustments ──────────────────────────────────────────────────────

#[test]
fn rain_forces_top_priority_and_restores_it() {
    let mut t = trip(3, false);
    t.apply_rain_start();
    assert_eq!(t.priority(), 1);
    assert!(approx(t.earnings(), 90.0));
    t.apply_rain_end();
    assert_eq!(t.priority(), 3);
}

#[test]
fn umbrella_ignores_rain() {
    let mut t = trip(3, true);
    t.apply_rain_start();
    assert_eq!(t.priority(), 3);
    t.apply_rain_end();
    assert_eq!(t.priority(), 3);
}

#[test]
fn coin_round_trip_restores_original() {
    for p in PRIORITY_MIN..=PRIORITY_MAX {
        let mut t = trip(p, false);
        t.apply_coin();
        t.expire_coin();
        assert_eq!(t.priority(), p);
    }
}

#[test]
fn coin_cannot_stack() {
    let mut t = trip(3, false);
    t.apply_coin();
    t.apply_coin();
    assert_eq!(t.priority(), 2);
}

#[test]
fn coin_before_rain_survives_rain_end() {
    let mut t = trip(3, false);
    t.apply_coin();
    t.apply_rain_start();
    assert_eq!(t.priority(), 1);
    t.apply_rain_end();
    assert_eq!(t.priority(), 2);
    t.expire_coin();
    assert_eq!(t.priority(), 3);
}

#[test]
fn coin_expiring_during_rain_leaves_rain_in_charge() {
    let mut t = trip(3, false);
    t.apply_coin();
    t.apply_rain_start();
    t.expire_coin();
    assert_eq!(t.priority(), 1);
    t.apply_rain_end();
    assert_eq!(t.priority(), 3);
}

#[test]
fn coin_during_rain_is_skipped() {
    let mut t = trip(3, false);
    t.apply_rain_start();
    t.apply_coin();
    assert!(!t.is_coin_adjusted());
    t.apply_rain_end();
    assert_eq!(t.priority(), 3);
}

#[test]
fn rain_end_without_rain_is_ignored() {
    let mut t = trip(2, false);
    t.apply_coin();
    t.apply_rain_end();
    assert_eq!(t.priority(), 1);
}

#[test]
fn priority_stays_in_range_under_any_event_order() {
    // 0 = rain start, 1 = rain end, 2 = coin, 3 = coin expiry
    for p in PRIORITY_MIN..=PRIORITY_MAX {
        for umbrella in [false, true] {
            for code in 0..4u32.pow(5) {
                let mut t = trip(p, umbrella);
                let mut c = code;
                for _ in 0..5 {
                    match c % 4 {
                        0 => t.apply_rain_start(),
                        1 => t.apply_rain_end(),
                        2 => t.apply_coin(),
                        _ => t.expire_coin(),
                    }
                    c /= 4;
                    assert!((PRIORITY_MIN..=PRIORITY_MAX).contains(&t.priority()));
                    assert!(t.priority() <= t.original_priority());
                }
            }
        }
    }
}
