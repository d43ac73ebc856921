use clap::Args;
use ielts_band::dialog::{
    prompts, ConversationId, DialogService, DialogServiceError, OutboundMessage, Reply,
    SessionStore, SignalKind,
};
use ielts_band::error::AppError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    /// Conversation identifier used for the terminal session
    #[arg(long, default_value = "terminal")]
    pub(crate) conversation: String,
}

/// Commands recognized at the transport layer; anything else is a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Help,
    Cancel,
    Clear,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/cancel" => Some(Self::Cancel),
            "/clear" => Some(Self::Clear),
            "/quit" | "/exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Runs one conversation over line-oriented input until `/quit` or EOF.
pub(crate) async fn run_chat<S, R, W>(
    service: &DialogService<S>,
    conversation: &ConversationId,
    input: R,
    output: &mut W,
) -> Result<(), AppError>
where
    S: SessionStore + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(%conversation, "terminal chat attached");
    render(output, &service.start(conversation)?.messages).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let messages = match Command::parse(line) {
            Some(Command::Quit) => break,
            Some(Command::Help) => vec![service.help()],
            Some(Command::Start) => service.signal(conversation, SignalKind::Restart)?.messages,
            Some(Command::Cancel) => service.signal(conversation, SignalKind::Cancel)?.messages,
            Some(Command::Clear) => service.signal(conversation, SignalKind::Clear)?.messages,
            None => match service.reply(conversation, line) {
                Ok(Reply { messages, .. }) => messages,
                Err(DialogServiceError::NoActiveSession) => {
                    debug!(%conversation, "reply outside a calculation");
                    vec![prompts::no_active_session()]
                }
                Err(err) => return Err(err.into()),
            },
        };
        render(output, &messages).await?;
    }

    info!(%conversation, "terminal chat detached");
    Ok(())
}

async fn render<W>(output: &mut W, messages: &[OutboundMessage]) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    let mut buffer = String::new();
    for message in messages {
        buffer.push_str(&message.text);
        buffer.push('\n');
        for row in message.choices.iter().flatten() {
            let buttons: Vec<_> = row.iter().map(|label| format!("[{label}]")).collect();
            buffer.push_str("  ");
            buffer.push_str(&buttons.join(" "));
            buffer.push('\n');
        }
        buffer.push('\n');
    }
    output.write_all(buffer.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
