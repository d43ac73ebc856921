use super::domain::{
    parse_band_score, parse_input_kind, parse_module, parse_raw_score, DialogState, InputError,
    InputKind, OutboundMessage, Workflow,
};
use super::prompts;
use crate::scoring::{
    listening_band, reading_band, BandScore, ListeningResult, Module, OverallResult, RawScore,
    ReadingResult, ScoreReport, SpeakingResult, WritingResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListeningValues {
    pub raw: Option<RawScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingValues {
    pub module: Option<Module>,
    pub raw: Option<RawScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WritingValues {
    pub t1_ta: Option<BandScore>,
    pub t1_cc: Option<BandScore>,
    pub t1_lr: Option<BandScore>,
    pub t1_gra: Option<BandScore>,
    pub t2_tr: Option<BandScore>,
    pub t2_cc: Option<BandScore>,
    pub t2_lr: Option<BandScore>,
    pub t2_gra: Option<BandScore>,
}

impl WritingValues {
    fn slot(&mut self, state: DialogState) -> Option<&mut Option<BandScore>> {
        let slot = match state {
            DialogState::AwaitT1TA => &mut self.t1_ta,
            DialogState::AwaitT1CC => &mut self.t1_cc,
            DialogState::AwaitT1LR => &mut self.t1_lr,
            DialogState::AwaitT1GRA => &mut self.t1_gra,
            DialogState::AwaitT2TR => &mut self.t2_tr,
            DialogState::AwaitT2CC => &mut self.t2_cc,
            DialogState::AwaitT2LR => &mut self.t2_lr,
            DialogState::AwaitT2GRA => &mut self.t2_gra,
            _ => return None,
        };
        Some(slot)
    }

    fn report(&self) -> Result<ScoreReport, SessionError> {
        let task1 = [
            require(self.t1_ta, "t1_ta")?,
            require(self.t1_cc, "t1_cc")?,
            require(self.t1_lr, "t1_lr")?,
            require(self.t1_gra, "t1_gra")?,
        ];
        let task2 = [
            require(self.t2_tr, "t2_tr")?,
            require(self.t2_cc, "t2_cc")?,
            require(self.t2_lr, "t2_lr")?,
            require(self.t2_gra, "t2_gra")?,
        ];
        Ok(ScoreReport::Writing(WritingResult::from_criteria(
            task1, task2,
        )))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpeakingValues {
    pub fc: Option<BandScore>,
    pub lr: Option<BandScore>,
    pub gra: Option<BandScore>,
    pub pr: Option<BandScore>,
}

impl SpeakingValues {
    fn slot(&mut self, state: DialogState) -> Option<&mut Option<BandScore>> {
        let slot = match state {
            DialogState::AwaitFC => &mut self.fc,
            DialogState::AwaitLR => &mut self.lr,
            DialogState::AwaitGRA => &mut self.gra,
            DialogState::AwaitPR => &mut self.pr,
            _ => return None,
        };
        Some(slot)
    }

    fn report(&self) -> Result<ScoreReport, SessionError> {
        let criteria = [
            require(self.fc, "fc")?,
            require(self.lr, "lr")?,
            require(self.gra, "gra")?,
            require(self.pr, "pr")?,
        ];
        Ok(ScoreReport::Speaking(SpeakingResult::from_criteria(
            criteria,
        )))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverallValues {
    pub module: Option<Module>,
    pub listening_input_kind: Option<InputKind>,
    pub listening: Option<BandScore>,
    pub reading_input_kind: Option<InputKind>,
    pub reading: Option<BandScore>,
    pub writing: Option<BandScore>,
    pub speaking: Option<BandScore>,
}

impl OverallValues {
    fn report(&self) -> Result<ScoreReport, SessionError> {
        Ok(ScoreReport::Overall(OverallResult::from_components(
            require(self.module, "module")?,
            require(self.listening, "listening")?,
            require(self.reading, "reading")?,
            require(self.writing, "writing")?,
            require(self.speaking, "speaking")?,
        )))
    }
}

/// Values gathered so far, one structured record per workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "workflow", rename_all = "snake_case")]
pub enum CollectedValues {
    Menu,
    Listening(ListeningValues),
    Reading(ReadingValues),
    Writing(WritingValues),
    Speaking(SpeakingValues),
    Overall(OverallValues),
}

impl CollectedValues {
    fn for_workflow(workflow: Workflow) -> Self {
        match workflow {
            Workflow::Listening => Self::Listening(ListeningValues::default()),
            Workflow::Reading => Self::Reading(ReadingValues::default()),
            Workflow::Writing => Self::Writing(WritingValues::default()),
            Workflow::Speaking => Self::Speaking(SpeakingValues::default()),
            Workflow::Overall => Self::Overall(OverallValues::default()),
        }
    }

    fn report(&self) -> Result<ScoreReport, SessionError> {
        match self {
            Self::Menu => Err(SessionError::MissingField { field: "workflow" }),
            Self::Listening(values) => Ok(ScoreReport::Listening(ListeningResult::from_raw(
                require(values.raw, "raw")?,
            ))),
            Self::Reading(values) => Ok(ScoreReport::Reading(ReadingResult::from_raw(
                require(values.raw, "raw")?,
                require(values.module, "module")?,
            ))),
            Self::Writing(values) => values.report(),
            Self::Speaking(values) => values.report(),
            Self::Overall(values) => values.report(),
        }
    }

    /// Input kind chosen for the Overall component `state` is waiting on.
    fn pending_input_kind(&self, state: DialogState) -> Option<InputKind> {
        match (self, state) {
            (Self::Overall(values), DialogState::AwaitListeningValue) => {
                values.listening_input_kind
            }
            (Self::Overall(values), DialogState::AwaitReadingValue) => values.reading_input_kind,
            _ => None,
        }
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, SessionError> {
    value.ok_or(SessionError::MissingField { field })
}

/// Controller defect: the state and the collected values disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session reached a step without its required field `{field}`")]
    MissingField { field: &'static str },
    #[error("state {state:?} does not belong to the active workflow")]
    WorkflowMismatch { state: DialogState },
}

/// Value stored by the last accepted reply, kept for the confirmation echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Accepted {
    Module(Module),
    InputKind(InputKind),
    Converted { raw: RawScore, band: BandScore },
    Band(BandScore),
}

/// Outcome of feeding one reply to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Reply rejected; state and values are unchanged.
    Rejected {
        error: InputError,
        messages: Vec<OutboundMessage>,
    },
    /// Value stored and the next state entered.
    Advanced { messages: Vec<OutboundMessage> },
    /// Workflow complete; the session should be discarded.
    Completed {
        report: ScoreReport,
        messages: Vec<OutboundMessage>,
    },
}

enum StepError {
    Input(InputError),
    Session(SessionError),
}

impl From<InputError> for StepError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<SessionError> for StepError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

/// Progress of one conversation through a calculator workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: DialogState,
    values: CollectedValues,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: DialogState::Menu,
            values: CollectedValues::Menu,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn values(&self) -> &CollectedValues {
        &self.values
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn opening_messages(&self) -> Vec<OutboundMessage> {
        vec![prompts::menu()]
    }

    /// Validates `text` against the current state and applies it.
    ///
    /// Invalid replies never touch the state or the collected values. An
    /// `Err` means the session itself is inconsistent and must be dropped.
    pub fn handle_reply(&mut self, text: &str) -> Result<Transition, SessionError> {
        let transition = match self.step(text) {
            Ok(transition) => transition,
            Err(StepError::Input(error)) => Transition::Rejected {
                error,
                messages: vec![prompts::rejection(error)],
            },
            Err(StepError::Session(error)) => return Err(error),
        };
        self.updated_at = Utc::now();
        Ok(transition)
    }

    fn step(&mut self, text: &str) -> Result<Transition, StepError> {
        if self.state == DialogState::Menu {
            return self.choose_workflow(text);
        }

        let state = self.state;
        let accepted = self.accept(text)?;

        match state.next() {
            Some(next) => {
                self.state = next;
                let question =
                    prompts::question(next, self.values.pending_input_kind(next));
                Ok(Transition::Advanced {
                    messages: vec![prompts::confirmation(state, &accepted), question],
                })
            }
            None => {
                let report = self.values.report()?;
                let messages = vec![prompts::summary(&report), prompts::restart_hint()];
                Ok(Transition::Completed { report, messages })
            }
        }
    }

    fn choose_workflow(&mut self, text: &str) -> Result<Transition, StepError> {
        let workflow =
            Workflow::from_menu_text(text).ok_or(InputError::UnrecognizedMenuChoice)?;
        let first = workflow.first_state();

        self.values = CollectedValues::for_workflow(workflow);
        self.state = first;

        let mut messages: Vec<_> = prompts::intro(workflow).into_iter().collect();
        messages.push(prompts::question(first, None));
        Ok(Transition::Advanced { messages })
    }

    /// Parses the reply for the current state and stores it.
    fn accept(&mut self, text: &str) -> Result<Accepted, StepError> {
        let state = self.state;
        let mismatch = SessionError::WorkflowMismatch { state };

        let accepted = match (&mut self.values, state) {
            (CollectedValues::Listening(values), DialogState::AwaitRawListening) => {
                let raw = parse_raw_score(text)?;
                values.raw = Some(raw);
                Accepted::Converted {
                    raw,
                    band: listening_band(raw),
                }
            }
            (CollectedValues::Reading(values), DialogState::AwaitReadingModule) => {
                let module = parse_module(text)?;
                values.module = Some(module);
                Accepted::Module(module)
            }
            (CollectedValues::Reading(values), DialogState::AwaitRawReading) => {
                let module = require(values.module, "module")?;
                let raw = parse_raw_score(text)?;
                values.raw = Some(raw);
                Accepted::Converted {
                    raw,
                    band: reading_band(raw, module),
                }
            }
            (CollectedValues::Writing(values), _) => {
                let band = parse_band_score(text)?;
                *values.slot(state).ok_or(mismatch)? = Some(band);
                Accepted::Band(band)
            }
            (CollectedValues::Speaking(values), _) => {
                let band = parse_band_score(text)?;
                *values.slot(state).ok_or(mismatch)? = Some(band);
                Accepted::Band(band)
            }
            (CollectedValues::Overall(values), DialogState::AwaitOverallModule) => {
                let module = parse_module(text)?;
                values.module = Some(module);
                Accepted::Module(module)
            }
            (CollectedValues::Overall(values), DialogState::AwaitListeningInputKind) => {
                let kind = parse_input_kind(text)?;
                values.listening_input_kind = Some(kind);
                Accepted::InputKind(kind)
            }
            (CollectedValues::Overall(values), DialogState::AwaitReadingInputKind) => {
                let kind = parse_input_kind(text)?;
                values.reading_input_kind = Some(kind);
                Accepted::InputKind(kind)
            }
            (CollectedValues::Overall(values), DialogState::AwaitListeningValue) => {
                let kind = require(values.listening_input_kind, "listening_input_kind")?;
                let (accepted, band) = component_value(text, kind, listening_band)?;
                values.listening = Some(band);
                accepted
            }
            (CollectedValues::Overall(values), DialogState::AwaitReadingValue) => {
                let kind = require(values.reading_input_kind, "reading_input_kind")?;
                let module = require(values.module, "module")?;
                let (accepted, band) =
                    component_value(text, kind, |raw| reading_band(raw, module))?;
                values.reading = Some(band);
                accepted
            }
            (CollectedValues::Overall(values), DialogState::AwaitWritingBand) => {
                let band = parse_band_score(text)?;
                values.writing = Some(band);
                Accepted::Band(band)
            }
            (CollectedValues::Overall(values), DialogState::AwaitSpeakingBand) => {
                let band = parse_band_score(text)?;
                values.speaking = Some(band);
                Accepted::Band(band)
            }
            _ => return Err(mismatch.into()),
        };

        Ok(accepted)
    }
}

/// Reads an Overall component either as a raw score to convert or as a band.
fn component_value(
    text: &str,
    kind: InputKind,
    convert: impl Fn(RawScore) -> BandScore,
) -> Result<(Accepted, BandScore), InputError> {
    match kind {
        InputKind::RawScore => {
            let raw = parse_raw_score(text)?;
            let band = convert(raw);
            Ok((Accepted::Converted { raw, band }, band))
        }
        InputKind::BandScore => {
            let band = parse_band_score(text)?;
            Ok((Accepted::Band(band), band))
        }
    }
}
