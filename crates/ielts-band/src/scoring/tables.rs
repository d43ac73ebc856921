use super::band::{BandScore, RawScore};
use serde::{Deserialize, Serialize};

/// Reading paper variant; each has its own conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Academic,
    GeneralTraining,
}

impl Module {
    pub const fn ordered() -> [Self; 2] {
        [Self::Academic, Self::GeneralTraining]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::GeneralTraining => "General Training",
        }
    }

    /// Matches the display label, ignoring case and `-`/`_`/space separators.
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        match normalized.as_str() {
            "academic" => Some(Self::Academic),
            "general training" => Some(Self::GeneralTraining),
            _ => None,
        }
    }
}

/// Ordered `(minimum raw score, band)` rows, highest threshold first.
type ConversionTable = &'static [(u8, f64)];

/// Raw scores below the last threshold of every table convert to this band.
const FLOOR_BAND: f64 = 1.0;

const LISTENING: ConversionTable = &[
    (39, 9.0),
    (37, 8.5),
    (35, 8.0),
    (32, 7.5),
    (30, 7.0),
    (26, 6.5),
    (23, 6.0),
    (18, 5.5),
    (16, 5.0),
    (13, 4.5),
    (10, 4.0),
    (8, 3.5),
    (6, 3.0),
    (4, 2.5),
    (2, 2.0),
];

const READING_ACADEMIC: ConversionTable = &[
    (39, 9.0),
    (37, 8.5),
    (35, 8.0),
    (33, 7.5),
    (30, 7.0),
    (27, 6.5),
    (23, 6.0),
    (19, 5.5),
    (15, 5.0),
    (13, 4.5),
    (10, 4.0),
    (8, 3.5),
    (6, 3.0),
    (4, 2.5),
    (2, 2.0),
];

const READING_GENERAL_TRAINING: ConversionTable = &[
    (40, 9.0),
    (39, 8.5),
    (37, 8.0),
    (34, 7.5),
    (30, 7.0),
    (26, 6.5),
    (23, 6.0),
    (19, 5.5),
    (15, 5.0),
    (12, 4.5),
    (9, 4.0),
    (6, 3.5),
    (4, 3.0),
    (2, 2.5),
];

fn lookup(table: ConversionTable, raw: RawScore) -> BandScore {
    let band = table
        .iter()
        .find(|(threshold, _)| raw.get() >= *threshold)
        .map(|(_, band)| *band)
        .unwrap_or(FLOOR_BAND);

    BandScore::from_half_points((band * 2.0) as u8)
}

pub fn listening_band(raw: RawScore) -> BandScore {
    lookup(LISTENING, raw)
}

pub fn reading_band(raw: RawScore, module: Module) -> BandScore {
    let table = match module {
        Module::Academic => READING_ACADEMIC,
        Module::GeneralTraining => READING_GENERAL_TRAINING,
    };
    lookup(table, raw)
}
