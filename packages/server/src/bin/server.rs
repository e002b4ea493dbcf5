//! Hiroba chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --database-url sqlite://hiroba.db
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    domain::{MessageRepository, PresenceRegistry},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageRepository, SqliteMessageRepository},
    },
    ui::Server,
    usecase::{ChatSessionCoordinator, DEFAULT_HISTORY_LIMIT},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Group chat relay with presence tracking and message history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// SQLite database for message history (e.g. sqlite://hiroba.db); in-memory when omitted
    #[arg(long)]
    database_url: Option<String>,

    /// Number of recent messages sent to a joining connection
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Drop stored history before starting
    #[arg(long)]
    reset_history: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Presence Registry + Coordinator
    // 4. Server

    // 1. Create Repository
    let repository: Arc<dyn MessageRepository> = match &args.database_url {
        Some(database_url) => match open_sqlite(database_url, args.reset_history).await {
            Ok(repository) => Arc::new(repository),
            Err(e) => {
                tracing::error!("Failed to open message history '{}': {}", database_url, e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("No database configured, message history is kept in memory");
            Arc::new(InMemoryMessageRepository::new())
        }
    };

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create Presence Registry and Coordinator
    let coordinator = Arc::new(ChatSessionCoordinator::new(
        Arc::new(PresenceRegistry::new()),
        repository,
        message_pusher.clone(),
        Arc::new(SystemClock),
        args.history_limit,
    ));

    // 4. Create and run the server
    let server = Server::new(coordinator, message_pusher);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn open_sqlite(
    database_url: &str,
    reset_history: bool,
) -> Result<SqliteMessageRepository, hiroba_server::domain::RepositoryError> {
    let repository = SqliteMessageRepository::connect(database_url).await?;
    if reset_history {
        repository.reset().await?;
    }
    Ok(repository)
}
