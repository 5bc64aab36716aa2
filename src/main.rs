//! Realty Backend CLI
//!
//! Ops surface over the notification store: list, mark read, delete, purge.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use realty_backend::{NotificationStore, DEFAULT_LIST_LIMIT};

#[derive(Parser)]
#[command(name = "realty")]
#[command(about = "Real-estate listing backend - notification store ops")]
#[command(version)]
struct Cli {
    /// Store file (default: ~/.config/realty-backend/notifications.jsonl)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a user's notifications (newest first, capped)
    List {
        /// User ID
        user: String,
        /// Page cap
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark one notification as read
    MarkRead {
        /// Notification ID
        id: String,
        /// Owning user ID
        user: String,
    },
    /// Mark all of a user's notifications as read
    MarkAllRead {
        /// User ID
        user: String,
    },
    /// Delete one notification
    Delete {
        /// Notification ID
        id: String,
        /// Owning user ID
        user: String,
    },
    /// Purge unread notifications referencing a property (admin)
    Purge {
        /// Property ID
        property: String,
    },
}

fn main() -> Result<()> {
    // Log level via RUST_LOG, default info
    // e.g.: RUST_LOG=debug realty list u1
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("realty_backend=info,realty=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let store = match cli.store {
        Some(path) => NotificationStore::new(path),
        None => NotificationStore::open_default(),
    };

    match cli.command {
        Commands::List { user, limit, json } => {
            let page = store.list_for_user(&user, Some(limit))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                println!(
                    "{} notifications ({} unread):\n",
                    page.notifications.len(),
                    page.unread_count
                );
                for n in &page.notifications {
                    let marker = if n.read { " " } else { "*" };
                    println!(
                        "{} {} | {} | {} - {}",
                        marker,
                        n.created_at.format("%Y-%m-%d %H:%M"),
                        n.id,
                        n.title,
                        n.message
                    );
                }
            }
        }
        Commands::MarkRead { id, user } => {
            let updated = store.mark_read(&id, &user)?;
            println!("Marked {} as read", updated.id);
        }
        Commands::MarkAllRead { user } => {
            let affected = store.mark_all_read(&user)?;
            println!("Marked {} notifications as read", affected);
        }
        Commands::Delete { id, user } => {
            store.delete(&id, &user)?;
            println!("Deleted {}", id);
        }
        Commands::Purge { property } => {
            let deleted = store.purge_unread_for_property(&property)?;
            println!("Purged {} unread notifications", deleted);
        }
    }

    Ok(())
}
