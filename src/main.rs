//! chatdeck terminal host
//!
//! Reads lines from stdin and drives a chat runtime. Plain text is sent as a
//! chat message; lines starting with `/` are commands (`/help` lists them).

use chatdeck::config::AppConfig;
use chatdeck::overview::{Overview, SortField};
use chatdeck::runtime::{AppEvent, ChatRuntime, RuntimeHandle, Snapshot, UiEvent};
use chatdeck::session::Event;
use chatdeck::simulator::{CannedResponder, LoggingSimulator};
use chatdeck::store::{Conversation, Message, Rating, Sender, Store, Verdict};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
commands:
  /new                 start a conversation
  /list                list conversations
  /open <n>            switch to conversation n
  /like <n>            like message n of the active conversation
  /dislike <n>         dislike message n
  /retry               retry the last failed reply
  /rate <1-5> [text]   rate the active conversation
  /feedback            show rated conversations
  /sort date|rating    sort the feedback view (again flips the order)
  /filter <1-5>|off    filter the feedback view by rating
  /theme               toggle light/dark
  /dump                print the full state as JSON
  /quit                exit
anything else is sent as a message";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatdeck=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        reply_delay_ms = %config.reply_delay.as_millis(),
        failure_rate = config.failure_rate,
        "Configuration loaded"
    );

    let simulator = LoggingSimulator::new(CannedResponder::new(
        config.reply_delay,
        config.failure_rate,
    ));
    let (runtime, handle) = ChatRuntime::new(Store::new(), simulator, &config);
    let runtime_task = runtime.spawn();
    tokio::spawn(render(handle.clone()));

    println!("chatdeck - type /help for commands");
    let mut overview = Overview::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Err(message) = handle_line(&handle, &mut overview, line).await {
            println!("! {message}");
        }
    }

    handle.send(AppEvent::Shutdown).await?;
    runtime_task.await?;
    Ok(())
}

async fn handle_line(
    handle: &RuntimeHandle,
    overview: &mut Overview,
    line: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = line.strip_prefix('/') else {
        handle.send(Event::InputChanged(line.to_string())).await?;
        handle.send(Event::Submit).await?;
        return Ok(());
    };

    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default().trim();
    // Earlier commands may still be queued
    let snapshot = handle.settled().await?;

    match name {
        "help" => println!("{HELP}"),
        "new" => handle.send(AppEvent::CreateConversation).await?,
        "list" => print_list(&snapshot),
        "open" => {
            let index = parse_index(arg, snapshot.store.conversations.len())?;
            let conversation_id = snapshot.store.conversations[index].id.clone();
            handle
                .send(AppEvent::SelectConversation { conversation_id })
                .await?;
        }
        "like" | "dislike" => {
            let messages = snapshot.store.active_messages();
            let index = parse_index(arg, messages.len())?;
            let verdict = if name == "like" {
                Verdict::Like
            } else {
                Verdict::Dislike
            };
            handle
                .send(Event::MessageFeedback {
                    message_id: messages[index].id.clone(),
                    verdict,
                })
                .await?;
        }
        "retry" => handle.send(Event::Retry).await?,
        "rate" => {
            let conversation_id = snapshot
                .store
                .active_conversation_id
                .clone()
                .ok_or("no active conversation")?;
            let mut rate_args = arg.splitn(2, ' ');
            let value: u8 = rate_args.next().unwrap_or_default().parse()?;
            let rating = Rating::new(value)?;
            let feedback = rate_args.next().map(|t| t.trim().to_string());
            handle
                .send(AppEvent::RateConversation {
                    conversation_id,
                    rating,
                    feedback,
                })
                .await?;
        }
        "feedback" => print_overview(overview, &snapshot),
        "sort" => {
            let field = match arg {
                "date" => SortField::Date,
                "rating" => SortField::Rating,
                _ => return Err("expected `date` or `rating`".into()),
            };
            overview.toggle_sort(field);
            print_overview(overview, &snapshot);
        }
        "filter" => {
            let filter = if arg == "off" {
                None
            } else {
                Some(Rating::new(arg.parse()?)?)
            };
            overview.set_rating_filter(filter);
            print_overview(overview, &snapshot);
        }
        "theme" => handle.send(AppEvent::ToggleTheme).await?,
        "dump" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        _ => return Err(format!("unknown command /{name}, try /help").into()),
    }
    Ok(())
}

/// 1-based index from the user, checked against `len`
fn parse_index(arg: &str, len: usize) -> Result<usize, Box<dyn std::error::Error>> {
    let n: usize = arg.parse()?;
    if n == 0 || n > len {
        return Err(format!("expected a number between 1 and {len}").into());
    }
    Ok(n - 1)
}

/// Print transcript changes as snapshots arrive
async fn render(handle: RuntimeHandle) {
    let mut events = handle.subscribe();
    let mut previous = handle.snapshot();

    while let Ok(event) = events.recv().await {
        match event {
            UiEvent::StateChanged(snapshot) => {
                render_diff(&previous, &snapshot);
                previous = snapshot;
            }
            UiEvent::Error { message } => println!("! {message}"),
        }
    }
}

fn render_diff(previous: &Snapshot, current: &Snapshot) {
    let switched = previous.store.active_conversation_id != current.store.active_conversation_id;
    if switched {
        if let Some(conversation) = current.store.active_conversation() {
            println!("== {}", conversation_label(conversation));
        }
    }

    let already_shown = if switched {
        0
    } else {
        previous.store.active_messages().len()
    };
    let messages = current.store.active_messages();
    for (index, message) in messages.iter().enumerate().skip(already_shown) {
        println!("{}", format_message(index + 1, message));
    }

    if current.chat.awaiting_reply && !previous.chat.awaiting_reply {
        println!("   ...");
    }
    if current.chat.error.is_some() && current.chat.error != previous.chat.error {
        if let Some(error) = &current.chat.error {
            println!("! {error} (/retry)");
        }
    }
    if current.store.theme != previous.store.theme {
        println!("theme: {:?}", current.store.theme);
    }
}

fn format_message(number: usize, message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "ai ",
    };
    let mark = match message.feedback.as_ref().and_then(|f| f.verdict()) {
        Some(Verdict::Like) => " [+]",
        Some(Verdict::Dislike) => " [-]",
        None => "",
    };
    format!("{number:>3} {who}> {}{mark}", message.content)
}

fn conversation_label(conversation: &Conversation) -> String {
    format!(
        "Conversation {}",
        conversation.timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

fn stars(rating: Option<Rating>) -> String {
    "*".repeat(rating.map_or(0, |r| usize::from(r.get())))
}

fn print_list(snapshot: &Snapshot) {
    if snapshot.store.conversations.is_empty() {
        println!("no conversations, /new starts one");
        return;
    }
    for (index, summary) in snapshot.store.conversation_summaries().iter().enumerate() {
        let marker = if summary.is_active { ">" } else { " " };
        println!(
            "{marker}{:>3} Conversation {} ({} messages) {}",
            index + 1,
            summary.created_at.format("%Y-%m-%d %H:%M:%S"),
            summary.message_count,
            stars(summary.rating)
        );
    }
}

fn print_overview(overview: &Overview, snapshot: &Snapshot) {
    let rows = overview.project(&snapshot.store.conversations);
    let filter = overview
        .rating_filter
        .map_or_else(|| "none".to_string(), |r| r.to_string());
    println!(
        "feedback (sort: {:?} {:?}, filter: {filter})",
        overview.sort_field, overview.sort_order
    );
    if rows.is_empty() {
        println!("  no rated conversations");
    }
    for conversation in rows {
        println!(
            "  {}  {:<5}  {}",
            conversation.timestamp.format("%Y-%m-%d"),
            stars(conversation.rating),
            conversation.feedback.as_deref().unwrap_or("-")
        );
    }
}
