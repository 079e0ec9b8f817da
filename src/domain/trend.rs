//! Mood trend classification.
//!
//! A time-ordered sequence of moods is split into an earlier and a later
//! half and the averages compared. For odd lengths the middle element
//! belongs to the later half.

use crate::domain::{entry::Entry, mood::Mood};

/// Qualitative direction of a mood sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Fewer than two moods.
    InsufficientData,
    /// The later half averages more than half a point above the earlier.
    Improving,
    /// The later half averages more than half a point below the earlier.
    Declining,
    /// Within half a point either way.
    Stable,
}

impl Trend {
    /// Message shown under the mood chart.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InsufficientData => "Continue registrando para ver sua evolução.",
            Self::Improving => {
                "Seu índice de paz interior está crescendo. Continue cultivando a gratidão e a fé."
            }
            Self::Declining => {
                "Você enfrentou alguns dias de incerteza, mas a fé prevalece. Lembre-se: cada \
                 passo é um aprendizado."
            }
            Self::Stable => {
                "Você tem mantido um equilíbrio em sua jornada. A constância é uma virtude."
            }
        }
    }
}

/// Result of analysing a mood sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendReport {
    /// The classification.
    pub trend: Trend,
    /// Mean of the earlier half, absent with insufficient data.
    pub first_half_average: Option<f64>,
    /// Mean of the later half, absent with insufficient data.
    pub second_half_average: Option<f64>,
}

/// Analyse moods given oldest first.
#[must_use]
pub fn analyze(moods: &[Mood]) -> TrendReport {
    if moods.len() < 2 {
        return TrendReport {
            trend: Trend::InsufficientData,
            first_half_average: None,
            second_half_average: None,
        };
    }

    let (first, second) = moods.split_at(moods.len() / 2);
    let (first_sum, first_len) = sum_and_len(first);
    let (second_sum, second_len) = sum_and_len(second);

    // second/n2 > first/n1 + 1/2  <=>  2*second*n1 > 2*first*n2 + n1*n2
    let lhs = 2 * second_sum * first_len;
    let rhs_base = 2 * first_sum * second_len;
    let margin = first_len * second_len;

    let trend = if lhs > rhs_base + margin {
        Trend::Improving
    } else if lhs + margin < rhs_base {
        Trend::Declining
    } else {
        Trend::Stable
    };

    TrendReport {
        trend,
        first_half_average: Some(average(first_sum, first_len)),
        second_half_average: Some(average(second_sum, second_len)),
    }
}

/// Analyse entries given in display order (newest first).
#[must_use]
pub fn analyze_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> TrendReport {
    let mut moods: Vec<Mood> = entries.into_iter().map(Entry::mood).collect();
    moods.reverse();
    analyze(&moods)
}

fn sum_and_len(moods: &[Mood]) -> (u64, u64) {
    let sum = moods.iter().map(|m| u64::from(m.get())).sum();
    (sum, moods.len() as u64)
}

#[allow(clippy::cast_precision_loss)]
fn average(sum: u64, len: u64) -> f64 {
    sum as f64 / len as f64
}
