use taxi_rush::damage::*;
use taxi_rush::entities::Point;

const AT: Point = Point::new(100.0, 200.0);

fn person(health: f64, blood: u32) -> DamageState {
    DamageState::new(health, EffectProfile::person(blood))
}

fn vehicle(health: f64) -> DamageState {
    DamageState::new(health, EffectProfile::vehicle(20, 20))
}

// ── Death ─────────────────────────────────────────────────────────────────────

#[test]
fn lethal_damage_kills_exactly_once() {
    for overkill in [0.0, 1.0, 500.0, 1e6] {
        let mut state = person(20.0, 20);
        let outcome = state.take_damage(20.0 * HEALTH_SCALE + overkill, AT);
        assert_eq!(outcome, DamageOutcome::Killed);
        assert!(state.is_dead());

        let health = state.health();
        let effect = *state.effect().expect("death effect");
        assert_eq!(effect.kind, EffectKind::Blood);

        // further hits change nothing and do not restart the effect
        assert_eq!(state.take_damage(1000.0, Point::new(0.0, 0.0)), DamageOutcome::Ignored);
        assert!(!state.die(Point::new(0.0, 0.0)));
        assert_eq!(state.health(), health);
        assert_eq!(state.effect(), Some(&effect));
    }
}

#[test]
fn health_reaching_zero_runs_death_effect_for_its_full_duration() {
    let mut state = vehicle(10.0);
    assert_eq!(state.take_damage(10.0 * HEALTH_SCALE, AT), DamageOutcome::Killed);
    assert_eq!(state.health(), 0.0);

    let effect = state.effect().expect("fire");
    assert_eq!(effect.kind, EffectKind::Fire);
    assert_eq!(effect.anchor, AT);
    assert_eq!(effect.timer.remaining(), 20);

    for frame in 1..20 {
        assert!(!state.upkeep(), "removed early on frame {frame}");
        assert!(state.has_active_effect());
        assert!(!state.death_effect_elapsed());
    }
    assert!(state.upkeep(), "fire ends on frame 20");
    assert!(state.death_effect_elapsed());
    assert!(!state.upkeep());
}

#[test]
fn die_forces_death_regardless_of_health() {
    let mut state = vehicle(100.0);
    assert!(state.die(AT));
    assert!(state.is_dead());
    assert_eq!(state.health(), 100.0);
}

#[test]
fn zero_length_effect_clears_on_next_upkeep() {
    let mut state = DamageState::new(1.0, EffectProfile::vehicle(0, 0));
    state.take_damage(HEALTH_SCALE, AT);
    assert!(state.is_dead());
    assert!(state.upkeep());
    assert!(state.death_effect_elapsed());
}

// ── Hits and immunity ─────────────────────────────────────────────────────────

#[test]
fn hit_starts_smoke_that_does_not_remove_the_actor() {
    let mut state = vehicle(50.0);
    assert_eq!(state.take_damage(10.0 * HEALTH_SCALE, AT), DamageOutcome::Hurt);
    assert_eq!(state.health(), 40.0);
    assert_eq!(state.effect().map(|e| e.kind), Some(EffectKind::Smoke));

    for _ in 0..20 {
        assert!(!state.upkeep());
    }
    assert!(!state.has_active_effect());
    assert!(!state.is_dead());
}

#[test]
fn people_bleed_only_on_death() {
    let mut state = person(20.0, 20);
    assert_eq!(state.take_damage(5.0 * HEALTH_SCALE, AT), DamageOutcome::Hurt);
    assert!(!state.has_active_effect());
}

#[test]
fn immunity_counts_down_to_exactly_zero() {
    let mut state = person(20.0, 20);
    assert!(!state.is_invulnerable());
    state.set_immune_for();
    assert_eq!(state.immunity_remaining(), IMMUNITY_FRAMES);

    let mut last = state.immunity_remaining();
    while state.is_invulnerable() {
        state.upkeep();
        let now = state.immunity_remaining();
        assert_eq!(now + 1, last);
        last = now;
    }
    assert_eq!(state.immunity_remaining(), 0);
}

#[test]
fn effect_anchor_scrolls_with_the_world() {
    let mut state = vehicle(50.0);
    state.take_damage(100.0, AT);
    state.scroll(5.0);
    state.scroll(-2.0);
    assert_eq!(state.effect().map(|e| e.anchor), Some(Point::new(100.0, 203.0)));
}

// ── Knock-back ────────────────────────────────────────────────────────────────

#[test]
fn knockback_pushes_away_for_fixed_frames() {
    let mut kb = Knockback::default();
    assert!(kb.advance().is_none());

    // attacker below → pushed up (negative y)
    kb.start_away_from(Point::new(0.0, 300.0), Point::new(0.0, 200.0), 2.0);
    assert_eq!(kb.direction(), -2.0);
    assert_eq!(kb.remaining(), KNOCKBACK_FRAMES);

    for _ in 1..KNOCKBACK_FRAMES {
        assert_eq!(kb.advance(), Some((-2.0, false)));
    }
    assert_eq!(kb.advance(), Some((-2.0, true)));
    assert!(!kb.is_active());
    assert!(kb.advance().is_none());

    // attacker above → pushed down
    kb.start_away_from(Point::new(0.0, 100.0), Point::new(0.0, 200.0), 1.0);
    assert_eq!(kb.direction(), 1.0);
}
