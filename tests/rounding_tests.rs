use floor_split::rounding::round_to_nearest_increment;
use floor_split::{CURRENCY_STEP, RoundingRule, round_up_to_increment};

#[test]
fn rounds_up_to_the_next_ten_centimos() {
    assert_eq!(round_up_to_increment(15.21, CURRENCY_STEP), 15.30);
    assert_eq!(round_up_to_increment(25.67, CURRENCY_STEP), 25.70);
    assert_eq!(round_up_to_increment(33.333333333333336, CURRENCY_STEP), 33.40);
    assert_eq!(round_up_to_increment(0.01, CURRENCY_STEP), 0.10);
    assert_eq!(round_up_to_increment(40.0, CURRENCY_STEP), 40.0);
}

/// Older worked examples list `14.34 -> 14.30`, which is round-to-nearest.
/// The calculator uses the ceiling rule everywhere, so 14.34 becomes 14.40;
/// the nearest rule is kept only to show where the two disagree.
#[test]
fn fourteen_thirty_four_goes_up_under_the_ceiling_rule() {
    assert_eq!(round_up_to_increment(14.34, CURRENCY_STEP), 14.40);
    assert_eq!(round_to_nearest_increment(14.34, CURRENCY_STEP), 14.30);
    assert_eq!(RoundingRule::default(), RoundingRule::Ceiling);
    assert_ne!(
        RoundingRule::Ceiling.apply(14.34, CURRENCY_STEP),
        RoundingRule::Nearest.apply(14.34, CURRENCY_STEP)
    );
}

#[test]
fn ceiling_never_reduces_and_adds_less_than_one_step() {
    let mut value = 0.0;
    while value < 200.0 {
        let rounded = round_up_to_increment(value, CURRENCY_STEP);
        assert!(rounded + 1e-9 >= value, "{value} -> {rounded}");
        assert!(rounded - value < CURRENCY_STEP, "{value} -> {rounded}");
        value += 0.37;
    }
}

#[test]
fn nearest_rounds_halves_up() {
    assert_eq!(round_to_nearest_increment(14.35, CURRENCY_STEP), 14.40);
    assert_eq!(round_to_nearest_increment(14.349, CURRENCY_STEP), 14.30);
}
