//! Overall score and letter grade classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CategoryScore;
use crate::error::{AuditError, Result};

/// Letter grade for a score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    /// 90 and above.
    A,
    /// 80 to below 90.
    B,
    /// 70 to below 80.
    C,
    /// 60 to below 70.
    D,
    /// Below 60.
    F,
}

impl Grade {
    /// Classify a percentage. Lower band bounds are inclusive; NaN is `F`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::A
        } else if percentage >= 80.0 {
            Self::B
        } else if percentage >= 70.0 {
            Self::C
        } else if percentage >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Classify an integer score.
    pub fn from_score(score: u8) -> Self {
        Self::from_percentage(f64::from(score))
    }

    /// Grade letter.
    pub const fn letter(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Short human description.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Fair",
            Self::D => "Poor",
            Self::F => "Failing",
        }
    }

    /// Display color as a hex string.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::A => "#22c55e",
            Self::B => "#3b82f6",
            Self::C => "#eab308",
            Self::D => "#f97316",
            Self::F => "#ef4444",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Precision the mean is snapped to before rounding.
///
/// Absorbs float summation error so an exact `.5` mean always rounds up.
const MEAN_PRECISION: f64 = 1e9;

/// Mean of all category percentages, rounded half away from zero and clamped
/// to `0..=100`.
///
/// The result does not depend on the order of `scores`.
///
/// Fails with [`AuditError::EmptyInput`] when there are no categories.
pub fn overall_score(scores: &[CategoryScore]) -> Result<u8> {
    if scores.is_empty() {
        return Err(AuditError::EmptyInput);
    }
    let mut values: Vec<f64> = scores.iter().map(|item| item.percentage).collect();
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    let mean = sum / values.len() as f64;
    if mean.is_nan() {
        return Ok(0);
    }
    let snapped = (mean * MEAN_PRECISION).round() / MEAN_PRECISION;
    Ok(snapped.round().clamp(0.0, 100.0) as u8)
}

/// The highest scoring category; ties go to the earliest entry.
pub fn best_category(scores: &[CategoryScore]) -> Result<&CategoryScore> {
    let mut iter = scores.iter();
    let first = iter.next().ok_or(AuditError::EmptyInput)?;
    Ok(iter.fold(first, |best, item| {
        if item.percentage > best.percentage {
            item
        } else {
            best
        }
    }))
}

/// Overall score, grade and best category for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    /// Rounded mean of the category percentages.
    pub overall_score: u8,
    /// Grade of the overall score.
    pub grade: Grade,
    /// Highest scoring category.
    pub best_category: CategoryScore,
}

/// Classify a list of category scores.
pub fn summarize(scores: &[CategoryScore]) -> Result<ScoreSummary> {
    let overall_score = overall_score(scores)?;
    let best_category = best_category(scores)?.clone();
    Ok(ScoreSummary {
        overall_score,
        grade: Grade::from_score(overall_score),
        best_category,
    })
}
