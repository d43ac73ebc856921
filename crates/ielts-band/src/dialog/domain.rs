use crate::scoring::{BandScore, BandScoreError, Module, RawScore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport-assigned identifier of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five calculations offered from the top-level menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    Listening,
    Reading,
    Writing,
    Speaking,
    Overall,
}

impl Workflow {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Listening,
            Self::Reading,
            Self::Writing,
            Self::Speaking,
            Self::Overall,
        ]
    }

    /// Menu button text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Listening => "🎧 Listening",
            Self::Reading => "📖 Reading",
            Self::Writing => "✍️ Writing",
            Self::Speaking => "🗣️ Speaking",
            Self::Overall => "📊 Overall Score",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Listening => "listening",
            Self::Reading => "reading",
            Self::Writing => "writing",
            Self::Speaking => "speaking",
            Self::Overall => "overall score",
        }
    }

    /// Accepts the exact button label or the bare workflow name.
    pub fn from_menu_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();
        Self::ordered().into_iter().find(|workflow| {
            trimmed == workflow.label()
                || lowered == workflow.name()
                || (*workflow == Self::Overall && lowered == "overall")
        })
    }

    pub const fn first_state(self) -> DialogState {
        match self {
            Self::Listening => DialogState::AwaitRawListening,
            Self::Reading => DialogState::AwaitReadingModule,
            Self::Writing => DialogState::AwaitT1TA,
            Self::Speaking => DialogState::AwaitFC,
            Self::Overall => DialogState::AwaitOverallModule,
        }
    }
}

/// Whether an Overall component is entered as a raw score or a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    RawScore,
    BandScore,
}

impl InputKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::RawScore, Self::BandScore]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RawScore => "Raw Score (0 - 40)",
            Self::BandScore => "Band Score (1.0 - 9.0)",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::RawScore => "Raw Score",
            Self::BandScore => "Band Score",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();
        Self::ordered().into_iter().find(|kind| {
            trimmed == kind.label()
                || lowered == kind.short_label().to_lowercase()
                || lowered == kind.short_label().to_lowercase().trim_end_matches(" score")
        })
    }
}

/// Shape of the reply a state waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedInput {
    MenuChoice,
    Module,
    InputKind,
    RawScore,
    BandScore,
    /// Raw or band, decided by the input kind chosen one step earlier.
    ComponentScore,
}

/// One pending input per state; workflows visit them in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Menu,
    AwaitRawListening,
    AwaitReadingModule,
    AwaitRawReading,
    #[serde(rename = "await_t1_ta")]
    AwaitT1TA,
    #[serde(rename = "await_t1_cc")]
    AwaitT1CC,
    #[serde(rename = "await_t1_lr")]
    AwaitT1LR,
    #[serde(rename = "await_t1_gra")]
    AwaitT1GRA,
    #[serde(rename = "await_t2_tr")]
    AwaitT2TR,
    #[serde(rename = "await_t2_cc")]
    AwaitT2CC,
    #[serde(rename = "await_t2_lr")]
    AwaitT2LR,
    #[serde(rename = "await_t2_gra")]
    AwaitT2GRA,
    #[serde(rename = "await_fc")]
    AwaitFC,
    #[serde(rename = "await_lr")]
    AwaitLR,
    #[serde(rename = "await_gra")]
    AwaitGRA,
    #[serde(rename = "await_pr")]
    AwaitPR,
    AwaitOverallModule,
    AwaitListeningInputKind,
    AwaitListeningValue,
    AwaitReadingInputKind,
    AwaitReadingValue,
    AwaitWritingBand,
    AwaitSpeakingBand,
}

impl DialogState {
    pub const fn workflow(self) -> Option<Workflow> {
        match self {
            Self::Menu => None,
            Self::AwaitRawListening => Some(Workflow::Listening),
            Self::AwaitReadingModule | Self::AwaitRawReading => Some(Workflow::Reading),
            Self::AwaitT1TA
            | Self::AwaitT1CC
            | Self::AwaitT1LR
            | Self::AwaitT1GRA
            | Self::AwaitT2TR
            | Self::AwaitT2CC
            | Self::AwaitT2LR
            | Self::AwaitT2GRA => Some(Workflow::Writing),
            Self::AwaitFC | Self::AwaitLR | Self::AwaitGRA | Self::AwaitPR => {
                Some(Workflow::Speaking)
            }
            Self::AwaitOverallModule
            | Self::AwaitListeningInputKind
            | Self::AwaitListeningValue
            | Self::AwaitReadingInputKind
            | Self::AwaitReadingValue
            | Self::AwaitWritingBand
            | Self::AwaitSpeakingBand => Some(Workflow::Overall),
        }
    }

    pub const fn expected_input(self) -> ExpectedInput {
        match self {
            Self::Menu => ExpectedInput::MenuChoice,
            Self::AwaitReadingModule | Self::AwaitOverallModule => ExpectedInput::Module,
            Self::AwaitListeningInputKind | Self::AwaitReadingInputKind => {
                ExpectedInput::InputKind
            }
            Self::AwaitRawListening | Self::AwaitRawReading => ExpectedInput::RawScore,
            Self::AwaitListeningValue | Self::AwaitReadingValue => ExpectedInput::ComponentScore,
            _ => ExpectedInput::BandScore,
        }
    }

    /// State entered after a valid reply; `None` once the workflow is complete.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Menu => None,
            Self::AwaitRawListening => None,
            Self::AwaitReadingModule => Some(Self::AwaitRawReading),
            Self::AwaitRawReading => None,
            Self::AwaitT1TA => Some(Self::AwaitT1CC),
            Self::AwaitT1CC => Some(Self::AwaitT1LR),
            Self::AwaitT1LR => Some(Self::AwaitT1GRA),
            Self::AwaitT1GRA => Some(Self::AwaitT2TR),
            Self::AwaitT2TR => Some(Self::AwaitT2CC),
            Self::AwaitT2CC => Some(Self::AwaitT2LR),
            Self::AwaitT2LR => Some(Self::AwaitT2GRA),
            Self::AwaitT2GRA => None,
            Self::AwaitFC => Some(Self::AwaitLR),
            Self::AwaitLR => Some(Self::AwaitGRA),
            Self::AwaitGRA => Some(Self::AwaitPR),
            Self::AwaitPR => None,
            Self::AwaitOverallModule => Some(Self::AwaitListeningInputKind),
            Self::AwaitListeningInputKind => Some(Self::AwaitListeningValue),
            Self::AwaitListeningValue => Some(Self::AwaitReadingInputKind),
            Self::AwaitReadingInputKind => Some(Self::AwaitReadingValue),
            Self::AwaitReadingValue => Some(Self::AwaitWritingBand),
            Self::AwaitWritingBand => Some(Self::AwaitSpeakingBand),
            Self::AwaitSpeakingBand => None,
        }
    }
}

/// Out-of-band instructions a transport may deliver in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Restart,
    Cancel,
    Clear,
}

/// One message for the transport to display, with optional reply buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Vec<String>>>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: None,
        }
    }

    pub fn with_choices<R, L>(text: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = L>,
        L: IntoIterator<Item = &'static str>,
    {
        let choices = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        Self {
            text: text.into(),
            choices: Some(choices),
        }
    }
}

/// Recoverable reply rejection; the session stays in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("raw score is outside 0 - 40")]
    RawOutOfRange,
    #[error("raw score is not a whole number")]
    RawUnparsable,
    #[error("band score is outside 1.0 - 9.0")]
    BandOutOfRange,
    #[error("band score is not a number")]
    BandUnparsable,
    #[error("band score is not a multiple of 0.5")]
    BandNotHalfStep,
    #[error("reply is not one of the offered modules")]
    UnknownModule,
    #[error("reply is not one of the offered input kinds")]
    UnknownInputKind,
    #[error("reply is not one of the menu choices")]
    UnrecognizedMenuChoice,
}

/// Coarse grouping of [`InputError`] for logging and clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputErrorKind {
    OutOfRange,
    Unparsable,
    UnrecognizedMenuChoice,
}

impl InputError {
    pub const fn kind(self) -> InputErrorKind {
        match self {
            Self::RawOutOfRange | Self::BandOutOfRange | Self::BandNotHalfStep => {
                InputErrorKind::OutOfRange
            }
            Self::RawUnparsable
            | Self::BandUnparsable
            | Self::UnknownModule
            | Self::UnknownInputKind => InputErrorKind::Unparsable,
            Self::UnrecognizedMenuChoice => InputErrorKind::UnrecognizedMenuChoice,
        }
    }
}

pub fn parse_raw_score(text: &str) -> Result<RawScore, InputError> {
    let value = text
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::RawUnparsable)?;
    RawScore::try_from(value).map_err(|_| InputError::RawOutOfRange)
}

pub fn parse_band_score(text: &str) -> Result<BandScore, InputError> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| InputError::BandUnparsable)?;
    BandScore::new(value).map_err(|err| match err {
        BandScoreError::NotFinite => InputError::BandUnparsable,
        BandScoreError::OutOfRange { .. } => InputError::BandOutOfRange,
        BandScoreError::NotHalfStep { .. } => InputError::BandNotHalfStep,
    })
}

pub fn parse_module(text: &str) -> Result<Module, InputError> {
    Module::from_label(text).ok_or(InputError::UnknownModule)
}

pub fn parse_input_kind(text: &str) -> Result<InputKind, InputError> {
    InputKind::from_label(text).ok_or(InputError::UnknownInputKind)
}
