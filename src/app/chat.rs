use crate::config::Config;
use crate::error::Result;
use crate::llm::GeminiProvider;
use crate::llm::streaming::{CliStreamSink, NullStreamSink, StreamSink};
use crate::llm::traits::Provider;
use crate::llm::types::ChatMessage;
use crate::reply;
use crate::transcript::{Session, Speaker, TranscriptStore};
use crate::ui::style as ui;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct ChatOptions {
    pub message: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

/// Everything one conversation turn needs besides its mutable state.
pub struct TurnParams<'a> {
    pub provider: &'a dyn Provider,
    pub store: &'a TranscriptStore,
    pub user: &'a Speaker,
    pub model: &'a str,
    pub temperature: f64,
    pub sink: &'a dyn StreamSink,
}

/// One full exchange: send the history plus `input`, drain the reply stream
/// (echoing fragments through the sink as they arrive), then log the user
/// entry and the assistant entry, in that order, only once the stream
/// completed. A failed stream leaves the transcript exactly as it was.
pub async fn run_turn(
    params: &TurnParams<'_>,
    active: &mut Option<Session>,
    history: &mut Vec<ChatMessage>,
    input: &str,
) -> Result<String> {
    let mut messages = history.clone();
    messages.push(ChatMessage::user(input));

    let stream = params
        .provider
        .chat_stream(&messages, params.model, params.temperature)
        .await?;
    let reply = reply::drain_reply(stream, params.sink).await?;

    params.store.append_message(active, params.user, input).await?;
    params
        .store
        .append_message(active, &Speaker::Assistant, &reply)
        .await?;

    history.push(ChatMessage::user(input));
    history.push(ChatMessage::assistant(reply.clone()));
    Ok(reply)
}

pub async fn run_chat(config: &Config, options: ChatOptions) -> anyhow::Result<()> {
    let model = options
        .model
        .as_deref()
        .or(config.default_model.as_deref())
        .unwrap_or(DEFAULT_MODEL)
        .to_string();
    let temperature = options.temperature.unwrap_or(config.default_temperature);

    let provider = GeminiProvider::new(config.api_key.as_deref());
    let store = TranscriptStore::new(config.transcript_dir());
    let user = Speaker::User(config.display_name.clone());

    let mut active: Option<Session> = None;
    let mut history: Vec<ChatMessage> = Vec::new();

    if let Some(message) = options.message {
        let params = TurnParams {
            provider: &provider,
            store: &store,
            user: &user,
            model: &model,
            temperature,
            sink: &NullStreamSink,
        };
        let reply = run_turn(&params, &mut active, &mut history, message.trim()).await?;
        println!("{reply}");
        store.end_session(&mut active).await?;
        return Ok(());
    }

    let sink = CliStreamSink::new();
    let params = TurnParams {
        provider: &provider,
        store: &store,
        user: &user,
        model: &model,
        temperature,
        sink: &sink,
    };

    println!("{}", ui::dim("Commands: history, restart, exit"));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}: ", ui::accent(&config.display_name));
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            // EOF closes an open session the same way `exit` would
            if active.is_some() {
                store.end_session(&mut active).await?;
            }
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            println!("Please enter some text.");
            continue;
        }

        match input.to_lowercase().as_str() {
            "history" => match store.display_history(active.as_ref()).await? {
                Some(contents) => print!("{contents}"),
                None => println!("No active chat session yet."),
            },
            "restart" => {
                store.end_session(&mut active).await?;
                history.clear();
                active = Some(store.start_session().await?);
            }
            "exit" => {
                store.end_session(&mut active).await?;
                break;
            }
            _ => {
                // Recoverable at the prompt: completed turns stay logged,
                // the failed one is not.
                if let Err(error) = run_turn(&params, &mut active, &mut history, input).await {
                    eprintln!("An error occurred: {error}");
                }
            }
        }
    }

    Ok(())
}
