use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::classifier::ClassProbabilities;

pub const OPINION_GOOD: &str = "Looks Good to Buy!";
pub const OPINION_HIGH_RISK: &str = "Warning: High Risk of Fake Reviews.";
pub const OPINION_MIXED: &str = "Mixed Reviews. Be Cautious (50/50).";
pub const OPINION_NO_TEXT: &str = "Error: No text was provided to analyze.";

const GOOD_ABOVE: u8 = 75;
const HIGH_RISK_BELOW: u8 = 40;

/// Genuine/fake split returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    pub genuine_percent: u8,
    pub fake_percent: u8,
    pub opinion: String,
}

impl Verdict {
    /// Returned when there was nothing to classify.
    pub fn no_text() -> Self {
        Self {
            genuine_percent: 0,
            fake_percent: 0,
            opinion: OPINION_NO_TEXT.to_string(),
        }
    }
}

/// Map class probabilities to whole percentages and an opinion.
///
/// Each side is rounded on its own (half to even). Exact complementary ties
/// still sum to 100, but a side that `f64` stores just off its tie rounds
/// independently, so the pair can come out at 99 or 101.
pub fn compose(probabilities: ClassProbabilities) -> Verdict {
    let fake_percent = to_percent(probabilities.fake());
    let genuine_percent = to_percent(probabilities.genuine());
    Verdict {
        genuine_percent,
        fake_percent,
        opinion: opinion_for(genuine_percent).to_string(),
    }
}

pub fn opinion_for(genuine_percent: u8) -> &'static str {
    if genuine_percent > GOOD_ABOVE {
        OPINION_GOOD
    } else if genuine_percent < HIGH_RISK_BELOW {
        OPINION_HIGH_RISK
    } else {
        OPINION_MIXED
    }
}

fn to_percent(probability: f64) -> u8 {
    (probability * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}
