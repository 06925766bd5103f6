use serde::Serialize;
use std::fmt;

/// Qualitative label for a mean rating on the 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SatisfactionLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    NoData,
}

impl fmt::Display for SatisfactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SatisfactionLevel::Excellent => "Excellent",
            SatisfactionLevel::Good => "Good",
            SatisfactionLevel::Fair => "Fair",
            SatisfactionLevel::Poor => "Poor",
            SatisfactionLevel::NoData => "No data",
        })
    }
}

/// Converts a mean rating into a [`SatisfactionLevel`].
///
/// | Range       | Level     |
/// |-------------|-----------|
/// | >= 4.5      | Excellent |
/// | >= 3.5      | Good      |
/// | >= 2.5      | Fair      |
/// | > 0         | Poor      |
/// | 0           | No data   |
pub fn satisfaction_level(average: f64) -> SatisfactionLevel {
    match average {
        a if a >= 4.5 => SatisfactionLevel::Excellent,
        a if a >= 3.5 => SatisfactionLevel::Good,
        a if a >= 2.5 => SatisfactionLevel::Fair,
        a if a > 0.0 => SatisfactionLevel::Poor,
        _ => SatisfactionLevel::NoData,
    }
}

/// Band for a Net Promoter Score in -100..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NpsBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl fmt::Display for NpsBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NpsBand::Excellent => "Excellent",
            NpsBand::Good => "Good",
            NpsBand::NeedsImprovement => "Needs improvement",
        })
    }
}

pub fn nps_band(score: i32) -> NpsBand {
    match score {
        s if s >= 50 => NpsBand::Excellent,
        s if s >= 0 => NpsBand::Good,
        _ => NpsBand::NeedsImprovement,
    }
}
