use serde::{Deserialize, Serialize};

/// Bills are settled in multiples of ten céntimos.
pub const CURRENCY_STEP: f64 = 0.10;

/// Slack for float noise when deciding whether a value already sits on a step
/// (`0.3 / 0.1` is `2.9999999999999996`, not `3`).
const STEP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// Always up to the next step. Shares never shrink, so the collector is
    /// never short.
    #[default]
    Ceiling,
    /// Half-up to the closest step. Reproduces figures such as `14.34 -> 14.30`
    /// found in older worked examples; not used by the calculator.
    Nearest,
}

impl RoundingRule {
    pub fn apply(self, value: f64, step: f64) -> f64 {
        match self {
            RoundingRule::Ceiling => round_up_to_increment(value, step),
            RoundingRule::Nearest => round_to_nearest_increment(value, step),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundingRule::Ceiling => "ceiling",
            RoundingRule::Nearest => "nearest",
        }
    }
}

/// `ceil(value / step) * step`, snapped to whole cents.
pub fn round_up_to_increment(value: f64, step: f64) -> f64 {
    let scaled = value / step;
    let nearest = scaled.round();
    let units = if (scaled - nearest).abs() < STEP_EPSILON {
        nearest
    } else {
        scaled.ceil()
    };
    to_cents(units * step)
}

pub fn round_to_nearest_increment(value: f64, step: f64) -> f64 {
    let scaled = value / step;
    // nudge exact halves that float division lands just below
    let units = (scaled + STEP_EPSILON).round();
    to_cents(units * step)
}

fn to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
