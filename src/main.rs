//! clipdeckd — clipboard history daemon with a global recall hotkey.
//!
//! Two worker threads (hotkey listener, clipboard watcher) feed channels
//! into this task; everything user-visible — arbitration, the history
//! store, rendering, stdin commands — runs serialized here.

mod clipboard;
mod history;
mod hotkey;

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use clipboard::{arbiter, watch};
use history::HistoryStore;
use hotkey::{KeyCombination, ListenerEvent, listener};

#[derive(Parser)]
#[command(
    name = "clipdeckd",
    about = "Clipboard history daemon — recall recent entries with Ctrl+Alt+V"
)]
struct Args {
    /// Clipboard poll interval in milliseconds.
    #[arg(long, default_value_t = 200)]
    poll_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (hotkey_listener, mut hotkey_rx) = listener::spawn(KeyCombination::ctrl_alt_v());
    let (watcher, mut watch_rx) = watch::spawn(Duration::from_millis(args.poll_ms));

    let mut history = HistoryStore::default();
    let mut restore_clipboard = arboard::Clipboard::new()
        .map_err(|e| tracing::warn!(error = %e, "clipboard unavailable — restore disabled"))
        .ok();

    let mut visible = false;
    let mut hotkey_open = true;
    let mut watch_open = true;
    let mut stdin_open = true;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(poll_ms = args.poll_ms, "clipdeckd running");
    println!("commands: <index> to copy an entry, clear, quit");

    loop {
        tokio::select! {
            event = hotkey_rx.recv(), if hotkey_open => match event {
                Some(ListenerEvent::Activated) => {
                    visible = !visible;
                    if visible {
                        render(&history);
                    }
                }
                Some(ListenerEvent::Completed) | None => {
                    hotkey_open = false;
                    tracing::warn!(
                        "hotkey listener terminated — history capture continues without the hotkey"
                    );
                }
            },

            payload = watch_rx.recv(), if watch_open => match payload {
                Some(payload) => {
                    if let Some(snapshot) = arbiter::arbitrate(&payload) {
                        let label = snapshot.label();
                        history.append(snapshot);
                        tracing::debug!(
                            entries = history.len(),
                            entry = %label,
                            "clipboard change recorded"
                        );
                        if visible {
                            render(&history);
                        }
                    }
                }
                None => {
                    watch_open = false;
                    tracing::warn!("clipboard watcher terminated — no further history capture");
                }
            },

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if !handle_command(line.trim(), &mut history, &mut restore_clipboard, &mut visible) {
                        break;
                    }
                }
                Ok(None) | Err(_) => stdin_open = false,
            },

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    tracing::info!("shutting down");
    watcher.request_stop();
    if hotkey_open {
        hotkey_listener.request_stop();
        // Wait for Completed so the thread has released its X11 resources
        // before we join it.
        while let Some(event) = hotkey_rx.recv().await {
            if event == ListenerEvent::Completed {
                break;
            }
        }
    }
    hotkey_listener.join();
    watcher.join();
}

/// Handle one stdin command. Returns `false` to quit.
fn handle_command(
    command: &str,
    history: &mut HistoryStore,
    restore_clipboard: &mut Option<arboard::Clipboard>,
    visible: &mut bool,
) -> bool {
    match command {
        "" => {}
        "quit" | "q" => return false,
        "clear" => {
            history.clear();
            println!("history cleared");
        }
        other => match other.parse::<usize>() {
            Ok(index) => match history.select(index) {
                Ok(snapshot) => match restore_clipboard {
                    Some(target) => match clipboard::restore(target, snapshot) {
                        Ok(()) => {
                            println!("copied: {}", snapshot.label());
                            *visible = false;
                        }
                        Err(e) => tracing::error!(error = %e, "clipboard restore failed"),
                    },
                    None => println!("clipboard unavailable — cannot restore"),
                },
                Err(e) => println!("{e}"),
            },
            Err(_) => println!("commands: <index> to copy an entry, clear, quit"),
        },
    }
    true
}

/// Print the numbered history, most recent first.
fn render(history: &HistoryStore) {
    if history.is_empty() {
        println!("(history empty)");
        return;
    }
    for (index, snapshot) in history.iter().enumerate() {
        println!("{index:>2}  {}", snapshot.label());
    }
}
