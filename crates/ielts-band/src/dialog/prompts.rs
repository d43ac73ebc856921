//! Display text for every prompt, echo, rejection and summary.
//!
//! Control flow never inspects these strings; replies are matched against
//! [`Workflow`], [`Module`] and [`InputKind`] instead.

use super::domain::{DialogState, InputError, InputKind, OutboundMessage, Workflow};
use super::session::Accepted;
use crate::scoring::{Module, ScoreReport};

pub const RESTART_HINT: &str = "If you want to calculate again, use the /start command.";

const MODULE_CHOICES: [[&str; 2]; 1] = [[Module::Academic.label(), Module::GeneralTraining.label()]];

const INPUT_KIND_CHOICES: [[&str; 2]; 1] =
    [[InputKind::RawScore.label(), InputKind::BandScore.label()]];

pub fn menu() -> OutboundMessage {
    OutboundMessage::with_choices(
        "Welcome to the IELTS Score Calculator! 📊\n\nPlease select what you'd like to calculate:",
        [
            vec![Workflow::Listening.label(), Workflow::Reading.label()],
            vec![Workflow::Writing.label(), Workflow::Speaking.label()],
            vec![Workflow::Overall.label()],
        ],
    )
}

pub fn help() -> OutboundMessage {
    OutboundMessage::text(
        "IELTS Score Calculator Commands\n\n\
         /start - Start a new IELTS score calculation\n\
         /clear - Clear conversation history\n\
         /help - Show this help message\n\
         /cancel - Cancel current calculation",
    )
}

pub fn cancelled() -> OutboundMessage {
    OutboundMessage::text("Operation cancelled. Send /start to begin again.")
}

pub fn cleared() -> OutboundMessage {
    OutboundMessage::text(
        "✅ Conversation history has been cleared.\n\nType /start to begin a new calculation.",
    )
}

pub fn no_active_session() -> OutboundMessage {
    OutboundMessage::text("There is no calculation in progress. Send /start to begin.")
}

pub fn restart_hint() -> OutboundMessage {
    OutboundMessage::text(RESTART_HINT)
}

/// Lead-in shown once when a workflow is picked from the menu.
pub(crate) fn intro(workflow: Workflow) -> Option<OutboundMessage> {
    let text = match workflow {
        Workflow::Listening | Workflow::Reading => return None,
        Workflow::Writing => "Let's calculate your WRITING score.",
        Workflow::Speaking => "Let's calculate your SPEAKING score.",
        Workflow::Overall => "Let's calculate your overall IELTS score.",
    };
    Some(OutboundMessage::text(text))
}

/// Task number (writing only) and display name of a criterion state.
fn criterion(state: DialogState) -> Option<(Option<u8>, &'static str)> {
    let criterion = match state {
        DialogState::AwaitT1TA => (Some(1), "Task Achievement (TA)"),
        DialogState::AwaitT1CC => (Some(1), "Coherence & Cohesion (CC)"),
        DialogState::AwaitT1LR => (Some(1), "Lexical Resource (LR)"),
        DialogState::AwaitT1GRA => (Some(1), "Grammatical Range & Accuracy (GRA)"),
        DialogState::AwaitT2TR => (Some(2), "Task Response (TR)"),
        DialogState::AwaitT2CC => (Some(2), "Coherence & Cohesion (CC)"),
        DialogState::AwaitT2LR => (Some(2), "Lexical Resource (LR)"),
        DialogState::AwaitT2GRA => (Some(2), "Grammatical Range & Accuracy (GRA)"),
        DialogState::AwaitFC => (None, "Fluency & Coherence (FC)"),
        DialogState::AwaitLR => (None, "Lexical Resource (LR)"),
        DialogState::AwaitGRA => (None, "Grammatical Range & Accuracy (GRA)"),
        DialogState::AwaitPR => (None, "Pronunciation (PR)"),
        _ => return None,
    };
    Some(criterion)
}

fn component_name(state: DialogState) -> &'static str {
    match state {
        DialogState::AwaitRawListening
        | DialogState::AwaitListeningInputKind
        | DialogState::AwaitListeningValue => "LISTENING",
        DialogState::AwaitRawReading
        | DialogState::AwaitReadingInputKind
        | DialogState::AwaitReadingValue => "READING",
        DialogState::AwaitWritingBand => "WRITING",
        _ => "SPEAKING",
    }
}

/// Question for `state`. `kind` is the input kind chosen for the pending
/// Overall component, when the state needs one.
pub(crate) fn question(state: DialogState, kind: Option<InputKind>) -> OutboundMessage {
    match state {
        DialogState::Menu => menu(),
        DialogState::AwaitRawListening => {
            OutboundMessage::text("Please enter your raw LISTENING score (0 - 40):")
        }
        DialogState::AwaitRawReading => {
            OutboundMessage::text("Please enter your raw READING score (0 - 40):")
        }
        DialogState::AwaitReadingModule => {
            OutboundMessage::with_choices("Please select your IELTS module:", MODULE_CHOICES)
        }
        DialogState::AwaitOverallModule => OutboundMessage::with_choices(
            "First, please select your IELTS module:",
            MODULE_CHOICES,
        ),
        DialogState::AwaitListeningInputKind | DialogState::AwaitReadingInputKind => {
            OutboundMessage::with_choices(
                format!(
                    "For {}, do you want to enter a raw score or band score?",
                    component_name(state)
                ),
                INPUT_KIND_CHOICES,
            )
        }
        DialogState::AwaitListeningValue | DialogState::AwaitReadingValue => {
            let component = component_name(state);
            let text = match kind {
                Some(InputKind::RawScore) => {
                    format!("Please enter your raw {component} score (0 - 40):")
                }
                Some(InputKind::BandScore) => {
                    format!("Please enter your {component} band score (1.0 - 9.0):")
                }
                None => format!("Please enter your {component} score:"),
            };
            OutboundMessage::text(text)
        }
        DialogState::AwaitWritingBand | DialogState::AwaitSpeakingBand => OutboundMessage::text(
            format!(
                "Please enter your {} band score (1.0 - 9.0):",
                component_name(state)
            ),
        ),
        _ => {
            let (task, name) = criterion(state).unwrap_or((None, "band"));
            let ask = format!("Please enter your {name} score (1.0 - 9.0):");
            let opens_task = matches!(state, DialogState::AwaitT1TA | DialogState::AwaitT2TR);
            match task {
                Some(task) if opens_task => OutboundMessage::text(format!("Task {task}\n\n{ask}")),
                _ => OutboundMessage::text(ask),
            }
        }
    }
}

/// Echo of a value the session just stored.
pub(crate) fn confirmation(state: DialogState, accepted: &Accepted) -> OutboundMessage {
    let text = match accepted {
        Accepted::Module(module) if state == DialogState::AwaitOverallModule => {
            format!("✅ You selected: {} module", module.label())
        }
        Accepted::Module(module) => format!("✅ You selected: {}", module.label()),
        Accepted::InputKind(kind) => format!("✅ You selected: {} input", kind.short_label()),
        Accepted::Converted { raw, band } => format!(
            "✅ {} raw score: {raw}/40 → Band score: {band}",
            component_name(state)
        ),
        Accepted::Band(band) => match criterion(state) {
            Some((Some(task), name)) => format!("✅ Task {task} · {name}: {band}"),
            Some((None, name)) => format!("✅ {name}: {band}"),
            None => format!("✅ {} band score: {band}", component_name(state)),
        },
    };
    OutboundMessage::text(text)
}

pub(crate) fn rejection(error: InputError) -> OutboundMessage {
    match error {
        InputError::RawUnparsable => {
            OutboundMessage::text("Please enter a valid number between 0 and 40.")
        }
        InputError::RawOutOfRange => {
            OutboundMessage::text("Please enter a valid score between 0 and 40.")
        }
        InputError::BandUnparsable => {
            OutboundMessage::text("Please enter a valid number (example: 6.5).")
        }
        InputError::BandOutOfRange => {
            OutboundMessage::text("Please enter a valid band score between 1.0 and 9.0.")
        }
        InputError::BandNotHalfStep => {
            OutboundMessage::text("Band scores move in steps of 0.5 (example: 6.5).")
        }
        InputError::UnknownModule => OutboundMessage::with_choices(
            "Please select a valid module using the keyboard buttons.",
            MODULE_CHOICES,
        ),
        InputError::UnknownInputKind => {
            OutboundMessage::with_choices("Please select a valid option.", INPUT_KIND_CHOICES)
        }
        InputError::UnrecognizedMenuChoice => menu(),
    }
}

/// Final result text for a completed workflow.
pub fn summary(report: &ScoreReport) -> OutboundMessage {
    let text = match report {
        ScoreReport::Listening(result) => format!(
            "🎧 IELTS LISTENING Band Score\n\nRaw score: {}/40\nBand score: {}",
            result.raw, result.band
        ),
        ScoreReport::Reading(result) => format!(
            "📖 IELTS READING Band Score\n\nModule: {}\nRaw score: {}/40\nBand score: {}",
            result.module.label(),
            result.raw,
            result.band
        ),
        ScoreReport::Writing(result) => format!(
            "✍️ IELTS WRITING Band Score\n\nTask 1 Score: {}\nTask 2 Score: {}\n\nOverall Writing Score: {}",
            result.task1, result.task2, result.overall
        ),
        ScoreReport::Speaking(result) => format!(
            "🗣️ IELTS SPEAKING Band Score\n\n\
             Fluency & Coherence: {}\n\
             Lexical Resource: {}\n\
             Grammatical Range & Accuracy: {}\n\
             Pronunciation: {}\n\n\
             Overall Speaking Score: {}",
            result.fluency_coherence,
            result.lexical_resource,
            result.grammatical_range,
            result.pronunciation,
            result.overall
        ),
        ScoreReport::Overall(result) => format!(
            "📊 IELTS Overall Band Score\n\nModule: {}\n\n\
             🎧 LISTENING: {}\n\
             📖 READING: {}\n\
             ✍️ WRITING: {}\n\
             🗣️ SPEAKING: {}\n\n\
             Overall Band Score: {}",
            result.module.label(),
            result.listening,
            result.reading,
            result.writing,
            result.speaking,
            result.overall
        ),
    };
    OutboundMessage::text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{BandScore, RawScore, ReadingResult, WritingResult};

    #[test]
    fn menu_offers_every_workflow() {
        let menu = menu();
        let choices = menu.choices.expect("menu has buttons");
        let flattened: Vec<_> = choices.into_iter().flatten().collect();
        for workflow in Workflow::ordered() {
            assert!(flattened.iter().any(|label| label == workflow.label()));
        }
    }

    #[test]
    fn writing_questions_announce_each_task_once() {
        assert!(question(DialogState::AwaitT1TA, None)
            .text
            .starts_with("Task 1"));
        assert!(question(DialogState::AwaitT2TR, None)
            .text
            .starts_with("Task 2"));
        let cc = question(DialogState::AwaitT1CC, None).text;
        assert!(!cc.starts_with("Task"));
        assert!(cc.contains("Coherence & Cohesion (CC)"));
    }

    #[test]
    fn component_question_follows_chosen_kind() {
        let raw = question(DialogState::AwaitReadingValue, Some(InputKind::RawScore));
        assert!(raw.text.contains("raw READING score (0 - 40)"));
        let band = question(DialogState::AwaitListeningValue, Some(InputKind::BandScore));
        assert!(band.text.contains("LISTENING band score (1.0 - 9.0)"));
    }

    #[test]
    fn confirmations_echo_accepted_values() {
        let band = BandScore::new(6.5).unwrap();
        assert_eq!(
            confirmation(DialogState::AwaitT2LR, &Accepted::Band(band)).text,
            "✅ Task 2 · Lexical Resource (LR): 6.5"
        );
        assert_eq!(
            confirmation(
                DialogState::AwaitListeningValue,
                &Accepted::Converted {
                    raw: RawScore::new(30).unwrap(),
                    band: BandScore::new(7.0).unwrap(),
                },
            )
            .text,
            "✅ LISTENING raw score: 30/40 → Band score: 7.0"
        );
        assert_eq!(
            confirmation(
                DialogState::AwaitOverallModule,
                &Accepted::Module(Module::GeneralTraining)
            )
            .text,
            "✅ You selected: General Training module"
        );
    }

    #[test]
    fn raw_paper_states_name_their_component() {
        let converted = Accepted::Converted {
            raw: RawScore::new(26).unwrap(),
            band: BandScore::new(6.5).unwrap(),
        };
        assert_eq!(
            confirmation(DialogState::AwaitRawReading, &converted).text,
            "✅ READING raw score: 26/40 → Band score: 6.5"
        );
        assert!(confirmation(DialogState::AwaitRawListening, &converted)
            .text
            .starts_with("✅ LISTENING"));
    }

    #[test]
    fn choice_rejections_reoffer_buttons() {
        assert!(rejection(InputError::UnknownModule).choices.is_some());
        assert!(rejection(InputError::UnknownInputKind).choices.is_some());
        assert!(rejection(InputError::RawOutOfRange).choices.is_none());
        assert!(rejection(InputError::RawOutOfRange).text.contains("0 and 40"));
    }

    #[test]
    fn summaries_list_sub_scores() {
        let reading = ScoreReport::Reading(ReadingResult::from_raw(
            RawScore::new(26).unwrap(),
            Module::GeneralTraining,
        ));
        let text = summary(&reading).text;
        assert!(text.contains("Module: General Training"));
        assert!(text.contains("Raw score: 26/40"));
        assert!(text.ends_with("Band score: 6.5"));

        let band = |value| BandScore::new(value).unwrap();
        let writing = ScoreReport::Writing(WritingResult::from_criteria(
            [band(6.5), band(7.0), band(6.0), band(6.5)],
            [band(7.0), band(7.0), band(6.5), band(7.0)],
        ));
        let text = summary(&writing).text;
        assert!(text.contains("Task 1 Score: 6.5"));
        assert!(text.contains("Task 2 Score: 6.5"));
        assert!(text.ends_with("Overall Writing Score: 6.5"));
    }
}
