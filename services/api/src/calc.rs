use crate::infra::{parse_band, parse_criteria, parse_module, parse_raw};
use clap::Subcommand;
use ielts_band::dialog::prompts;
use ielts_band::scoring::{
    BandScore, ListeningResult, Module, OverallResult, RawScore, ReadingResult, ScoreReport,
    SpeakingResult, WritingResult,
};
use tracing::debug;

#[derive(Subcommand, Debug)]
pub(crate) enum CalcCommand {
    /// Convert a raw listening score to a band
    Listening {
        /// Correct answers out of 40
        #[arg(long, value_parser = parse_raw)]
        raw: RawScore,
    },
    /// Convert a raw reading score to a band for the given module
    Reading {
        /// academic or general-training
        #[arg(long, value_parser = parse_module)]
        module: Module,
        /// Correct answers out of 40
        #[arg(long, value_parser = parse_raw)]
        raw: RawScore,
    },
    /// Combine writing criterion bands into task and overall scores
    Writing {
        /// Task 1 bands as TA,CC,LR,GRA
        #[arg(long, value_parser = parse_criteria)]
        task1: [BandScore; 4],
        /// Task 2 bands as TR,CC,LR,GRA
        #[arg(long, value_parser = parse_criteria)]
        task2: [BandScore; 4],
    },
    /// Average speaking criterion bands
    Speaking {
        /// Bands as FC,LR,GRA,PR
        #[arg(long, value_parser = parse_criteria)]
        criteria: [BandScore; 4],
    },
    /// Combine the four component bands into the overall band
    Overall {
        #[arg(long, value_parser = parse_module, default_value = "academic")]
        module: Module,
        #[arg(long, value_parser = parse_band)]
        listening: BandScore,
        #[arg(long, value_parser = parse_band)]
        reading: BandScore,
        #[arg(long, value_parser = parse_band)]
        writing: BandScore,
        #[arg(long, value_parser = parse_band)]
        speaking: BandScore,
    },
}

pub(crate) fn report(command: CalcCommand) -> ScoreReport {
    match command {
        CalcCommand::Listening { raw } => ScoreReport::Listening(ListeningResult::from_raw(raw)),
        CalcCommand::Reading { module, raw } => {
            ScoreReport::Reading(ReadingResult::from_raw(raw, module))
        }
        CalcCommand::Writing { task1, task2 } => {
            ScoreReport::Writing(WritingResult::from_criteria(task1, task2))
        }
        CalcCommand::Speaking { criteria } => {
            ScoreReport::Speaking(SpeakingResult::from_criteria(criteria))
        }
        CalcCommand::Overall {
            module,
            listening,
            reading,
            writing,
            speaking,
        } => ScoreReport::Overall(OverallResult::from_components(
            module, listening, reading, writing, speaking,
        )),
    }
}

pub(crate) fn run_calc(command: CalcCommand) {
    let report = report(command);
    debug!(band = %report.headline_band(), "one-shot calculation");
    println!("{}", prompts::summary(&report).text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(value: f64) -> BandScore {
        BandScore::new(value).unwrap()
    }

    #[test]
    fn reading_uses_requested_module() {
        let report = report(CalcCommand::Reading {
            module: Module::GeneralTraining,
            raw: RawScore::new(26).unwrap(),
        });
        assert_eq!(report.headline_band(), band(6.5));
    }

    #[test]
    fn writing_weights_second_task() {
        let report = report(CalcCommand::Writing {
            task1: [band(6.5), band(7.0), band(6.0), band(6.5)],
            task2: [band(7.0), band(7.0), band(6.5), band(7.0)],
        });
        let ScoreReport::Writing(result) = report else {
            panic!("expected writing report");
        };
        assert_eq!(result.task1, band(6.5));
        assert_eq!(result.task2, band(6.5));
        assert_eq!(result.overall, band(6.5));
    }

    #[test]
    fn overall_rounds_quarter_up() {
        let report = report(CalcCommand::Overall {
            module: Module::Academic,
            listening: band(7.0),
            reading: band(6.5),
            writing: band(6.5),
            speaking: band(6.5),
        });
        assert_eq!(report.headline_band(), band(7.0));
    }
}
