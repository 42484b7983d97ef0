//! services/app/src/bin/app.rs

use app_lib::{
    adapters::{FirestoreAdapter, IdentityAdapter, StorageAdapter},
    config::Config,
    error::AppError,
    notes::{detail, feed_task, save_task, FeedUpdate},
    state::AppState,
};
use daily_memo_core::domain::{Note, NoteId, UserId};
use daily_memo_core::ports::AuthService;
use futures::StreamExt;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            config.log_level.to_string(),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Connecting to the backend...");

    // --- 2. Initialize Backend Adapters ---
    let http = reqwest::Client::new();
    let notes = Arc::new(FirestoreAdapter::new(
        http.clone(),
        &config.project_id,
        config.api_key.clone(),
        config.feed_poll_interval,
    ));
    let blobs = Arc::new(StorageAdapter::new(http.clone(), &config.storage_bucket));
    let auth = Arc::new(IdentityAdapter::new(http, config.api_key.clone()));

    // --- 3. Build the Shared AppState ---
    let state = AppState {
        notes,
        blobs,
        auth: auth.clone(),
        config: config.clone(),
    };

    // --- 4. Sign In & Open the Feed ---
    let owner = auth.sign_in(&config.email, &config.password).await?;
    info!("Signed in as {}", owner);

    let token = CancellationToken::new();
    let mut feed = feed_task::subscribe(&state, &owner, token.clone()).await?;

    println!("MY DAILY MEMO. Type a note to save it, 'open <id>' to view one, 'delete <id>' to remove one; ctrl-c quits.");

    // --- 5. Tail the Feed & Accept Commands on Stdin ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                token.cancel();
                break;
            }
            update = feed.next() => match update {
                Some(update) => render(&update),
                None => break,
            },
            line = lines.next_line() => match line? {
                Some(input) => handle_line(&state, &owner, &input).await,
                None => {
                    token.cancel();
                    break;
                }
            },
        }
    }

    info!("Feed subscription closed.");
    Ok(())
}

/// Interprets one stdin line: `open <id>` shows the note detail, `delete
/// <id>` removes a note, and any other non-empty line is saved as a new
/// note.
async fn handle_line(state: &AppState, owner: &UserId, input: &str) {
    if let Some(id) = input.strip_prefix("open ") {
        match detail::get_note(state, &NoteId::from(id.trim())).await {
            Ok(note) => render_detail(&note),
            Err(e) => warn!("{}", e),
        }
    } else if let Some(id) = input.strip_prefix("delete ") {
        match detail::delete_note(state, &NoteId::from(id.trim())).await {
            Ok(()) => info!("Note deleted successfully"),
            Err(e) => warn!("{}", e),
        }
    } else if input.is_empty() {
        warn!("Note cannot be empty");
    } else {
        match save_task::save_note(state, owner, input, None).await {
            Ok(id) => info!("Note saved successfully ({})", id),
            Err(e) => warn!("{}", e),
        }
    }
}

/// Renders the single-note detail view: the full date line, the text, and
/// the photo link when the note carries one.
fn render_detail(note: &Note) {
    println!("{}", detail::date_line(note));
    println!("{}", note.text);
    if let Some(url) = &note.photo_url {
        println!("photo: {}", url);
    }
    println!();
}

/// Renders one feed emission: a month header, then a day column beside that
/// day's notes, newest first.
fn render(update: &FeedUpdate) {
    if update.stale {
        println!("(connection trouble; showing the last loaded notes)");
    }
    for month in &update.feed.months {
        println!("== {} ==", month.label);
        for day in &month.days {
            for (i, note) in day.notes.iter().enumerate() {
                let day_column = if i == 0 { day.day.as_str() } else { "  " };
                println!(
                    "{:>2}  {}  {}  ({})",
                    day_column,
                    note.timestamp.format("%H:%M"),
                    note.text,
                    note.id
                );
            }
        }
    }
    println!();
}
