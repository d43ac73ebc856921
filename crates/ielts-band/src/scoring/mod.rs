//! Raw-score conversion tables and band rounding rules.
//!
//! Everything here is pure. Inputs are validated on construction of
//! [`RawScore`] and [`BandScore`], so the conversion and composite functions
//! cannot fail.

mod band;
mod composite;
mod tables;

pub use band::{BandScore, BandScoreError, RawScore, RawScoreError, MAX_RAW_SCORE};
pub use composite::{
    overall_band, round_down_to_half, round_up_to_half, speaking_overall, writing_overall,
    writing_task_score, ListeningResult, OverallResult, ReadingResult, ScoreReport,
    SpeakingResult, WritingResult,
};
pub use tables::{listening_band, reading_band, Module};
