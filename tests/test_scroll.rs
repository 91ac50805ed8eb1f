use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use taxi_rush::scroll::Background;

const H: f64 = 768.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn starts_with_copies_stacked_around_the_screen() {
    let bg = Background::new(H);
    assert_eq!(bg.offsets(), (H / 2.0, -H / 2.0));
    assert_eq!(bg.seam_gap(), H);
    assert!(!bg.is_raining());
}

#[test]
fn forward_scroll_wraps_the_leading_copy() {
    let mut bg = Background::new(H);
    // o1 reaches 1.5H after one window height of travel
    for _ in 0..(H as usize / 8) {
        bg.move_y(8.0);
    }
    let (o1, o2) = bg.offsets();
    assert_eq!(o2, H / 2.0);
    assert_eq!(o1, -H / 2.0);
}

#[test]
fn backward_scroll_wraps_the_trailing_copy() {
    let mut bg = Background::new(H);
    bg.move_y(-1.0);
    let (o1, o2) = bg.offsets();
    assert_eq!(o1, H / 2.0 - 1.0);
    assert_eq!(o2, o1 + H);
}

#[test]
fn seam_gap_holds_for_any_delta_sequence() {
    let mut rng = seeded_rng();
    let mut bg = Background::new(H);
    for _ in 0..10_000 {
        let delta = f64::from(rng.gen_range(-12..=12));
        bg.move_y(delta);
        assert_eq!(bg.seam_gap(), H, "offsets {:?}", bg.offsets());
    }
}

#[test]
fn rain_flag_switches_variant() {
    let mut bg = Background::new(H);
    bg.set_raining(true);
    assert!(bg.is_raining());
    bg.set_raining(false);
    assert!(!bg.is_raining());
}
