use crate::calc::{run_calc, CalcCommand};
use crate::chat::{run_chat, ChatArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ielts_band::config::AppConfig;
use ielts_band::dialog::{ConversationId, DialogService, InMemorySessionStore};
use ielts_band::error::AppError;
use ielts_band::telemetry;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(
    name = "IELTS Band Calculator",
    about = "Calculate IELTS band scores over HTTP, in the terminal or in one shot",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the calculator dialog interactively on stdin/stdout
    Chat(ChatArgs),
    /// Compute a single score from command-line values
    Calc {
        #[command(subcommand)]
        command: CalcCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Chat(args) => {
            let config = AppConfig::load()?;
            telemetry::init(&config.telemetry)?;

            let service = DialogService::new(Arc::new(InMemorySessionStore::default()));
            let conversation = ConversationId::new(args.conversation);
            let input = BufReader::new(tokio::io::stdin());
            let mut output = tokio::io::stdout();
            run_chat(&service, &conversation, input, &mut output).await
        }
        Command::Calc { command } => {
            run_calc(command);
            Ok(())
        }
    }
}
