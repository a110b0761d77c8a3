//! Roombook CLI
//!
//! Command-line client for the hotel booking backend.

use clap::Parser;
use tracing::info;

use roombook_cli::context::AppContext;
use roombook_cli::{admin_cmd, auth_cmd, booking_cmd, hotel_cmd, open_cmd, room_cmd};
use roombook_core::{Config, tracing_init};

#[derive(Parser, Debug)]
#[command(name = "roombook")]
#[command(version, about = "Hotel booking client", long_about = None)]
struct Cli {
    /// API base URL (overrides config and ROOMBOOK_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Session management.
    Auth {
        #[command(subcommand)]
        action: auth_cmd::AuthAction,
    },
    /// Browse hotels.
    Hotel {
        #[command(subcommand)]
        action: hotel_cmd::HotelAction,
    },
    /// Browse rooms.
    Room {
        #[command(subcommand)]
        action: room_cmd::RoomAction,
    },
    /// Manage my bookings.
    Booking {
        #[command(subcommand)]
        action: booking_cmd::BookingAction,
    },
    /// Administration (requires the ADMIN role).
    Admin {
        #[command(subcommand)]
        action: admin_cmd::AdminAction,
    },
    /// Resolve and load a page path, honoring the admin guard.
    Open {
        /// Page path, e.g. "/hotels/3" or "/admin/users".
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    tracing_init::init_tracing(&config.log_level, cli.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "starting roombook CLI");

    let ctx = AppContext::new(config)?;

    match cli.command {
        Command::Auth { action } => auth_cmd::run(&ctx, action).await,
        Command::Hotel { action } => hotel_cmd::run(&ctx, action).await,
        Command::Room { action } => room_cmd::run(&ctx, action).await,
        Command::Booking { action } => booking_cmd::run(&ctx, action).await,
        Command::Admin { action } => admin_cmd::run(&ctx, action).await,
        Command::Open { path } => open_cmd::run(&ctx, &path).await,
    }
}
