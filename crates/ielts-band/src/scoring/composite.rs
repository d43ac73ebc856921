use super::band::{BandScore, RawScore};
use super::tables::{listening_band, reading_band, Module};
use serde::Serialize;

/// Floors to the nearest half band. Applied to criterion averages.
pub fn round_down_to_half(value: f64) -> f64 {
    (value * 2.0).floor() / 2.0
}

/// Ceils to the nearest half band. Applied to final aggregates only.
pub fn round_up_to_half(value: f64) -> f64 {
    (value * 2.0).ceil() / 2.0
}

fn half_point_sum(bands: &[BandScore]) -> u16 {
    bands
        .iter()
        .map(|band| u16::from(band.half_points()))
        .sum()
}

fn from_half_points(half_points: u16) -> BandScore {
    // Means and weighted means of bands never leave 2..=18.
    BandScore::from_half_points(half_points as u8)
}

/// Mean of the four task criteria, rounded down to the nearest half band.
pub fn writing_task_score(criteria: [BandScore; 4]) -> BandScore {
    from_half_points(half_point_sum(&criteria) / 4)
}

/// Task 1 weighs one third and Task 2 two thirds; rounded up.
pub fn writing_overall(task1: BandScore, task2: BandScore) -> BandScore {
    let weighted = u16::from(task1.half_points()) + 2 * u16::from(task2.half_points());
    from_half_points(weighted.div_ceil(3))
}

/// Mean of the four speaking criteria, rounded down to the nearest half band.
pub fn speaking_overall(criteria: [BandScore; 4]) -> BandScore {
    from_half_points(half_point_sum(&criteria) / 4)
}

/// Mean of the four component bands, rounded up to the nearest half band.
pub fn overall_band(
    listening: BandScore,
    reading: BandScore,
    writing: BandScore,
    speaking: BandScore,
) -> BandScore {
    let sum = half_point_sum(&[listening, reading, writing, speaking]);
    from_half_points(sum.div_ceil(4))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListeningResult {
    pub raw: RawScore,
    pub band: BandScore,
}

impl ListeningResult {
    pub fn from_raw(raw: RawScore) -> Self {
        Self {
            raw,
            band: listening_band(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingResult {
    pub module: Module,
    pub raw: RawScore,
    pub band: BandScore,
}

impl ReadingResult {
    pub fn from_raw(raw: RawScore, module: Module) -> Self {
        Self {
            module,
            raw,
            band: reading_band(raw, module),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WritingResult {
    pub task1: BandScore,
    pub task2: BandScore,
    pub overall: BandScore,
}

impl WritingResult {
    pub fn from_criteria(task1: [BandScore; 4], task2: [BandScore; 4]) -> Self {
        let task1 = writing_task_score(task1);
        let task2 = writing_task_score(task2);
        Self {
            task1,
            task2,
            overall: writing_overall(task1, task2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakingResult {
    pub fluency_coherence: BandScore,
    pub lexical_resource: BandScore,
    pub grammatical_range: BandScore,
    pub pronunciation: BandScore,
    pub overall: BandScore,
}

impl SpeakingResult {
    pub fn from_criteria(criteria: [BandScore; 4]) -> Self {
        let [fluency_coherence, lexical_resource, grammatical_range, pronunciation] = criteria;
        Self {
            fluency_coherence,
            lexical_resource,
            grammatical_range,
            pronunciation,
            overall: speaking_overall(criteria),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallResult {
    pub module: Module,
    pub listening: BandScore,
    pub reading: BandScore,
    pub writing: BandScore,
    pub speaking: BandScore,
    pub overall: BandScore,
}

impl OverallResult {
    pub fn from_components(
        module: Module,
        listening: BandScore,
        reading: BandScore,
        writing: BandScore,
        speaking: BandScore,
    ) -> Self {
        Self {
            module,
            listening,
            reading,
            writing,
            speaking,
            overall: overall_band(listening, reading, writing, speaking),
        }
    }
}

/// Final output of one completed calculation, tagged by workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "workflow", rename_all = "snake_case")]
pub enum ScoreReport {
    Listening(ListeningResult),
    Reading(ReadingResult),
    Writing(WritingResult),
    Speaking(SpeakingResult),
    Overall(OverallResult),
}

impl ScoreReport {
    /// The band the workflow was run to produce.
    pub fn headline_band(&self) -> BandScore {
        match self {
            ScoreReport::Listening(result) => result.band,
            ScoreReport::Reading(result) => result.band,
            ScoreReport::Writing(result) => result.overall,
            ScoreReport::Speaking(result) => result.overall,
            ScoreReport::Overall(result) => result.overall,
        }
    }
}
