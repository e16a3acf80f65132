//! seaport - a command-line front-end for the Internal Sea Core API.
//!
//! Log in once, then browse the dashboard, manage items, update your
//! profile and list organizations. The session token is kept between runs.

mod render;
mod utils;
mod views;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use seaport_core::config::{Config, TokenStoreKind};
use seaport_core::AppContext;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "seaport", version, about = "Internal Sea Core API client")]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long, env = "SEAPORT_API_URL", global = true)]
    api_url: Option<String>,

    /// Where to keep the session token: file or keyring
    #[arg(long, env = "SEAPORT_TOKEN_STORE", global = true)]
    token_store: Option<TokenStoreKind>,

    /// Directory for the file token store
    #[arg(long, env = "SEAPORT_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, env = "SEAPORT_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long, env = "SEAPORT_EMAIL")]
        email: Option<String>,
        #[arg(long, env = "SEAPORT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show where the client points and the session state
    Status,
    /// User and item counts plus the most recent items
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Manage items
    Items(ItemsCommand),
    /// Update your profile
    Profile(ProfileCommand),
    /// List organizations
    Orgs {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ItemsCommand {
    #[command(subcommand)]
    command: ItemsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemsSubcommand {
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must stay alive for the file writer to flush.
fn init_tracing(log_file: Option<&PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "seaport.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Some(ref url) = cli.api_url {
        config.api_url = Some(url.clone());
    }
    if let Some(kind) = cli.token_store {
        config.token_store = kind;
    }
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    config
}

async fn run(cli: Cli, ctx: &mut AppContext, config: &mut Config) -> Result<()> {
    match cli.command {
        Command::Login { email, password } => views::login(ctx, config, email, password).await,
        Command::Logout => views::logout(ctx),
        Command::Whoami => views::whoami(ctx).await,
        Command::Status => {
            views::status(ctx, config);
            Ok(())
        }
        Command::Dashboard { json } => views::dashboard(ctx, json).await,
        Command::Items(items) => match items.command {
            ItemsSubcommand::List { json } => views::list_items(ctx, json).await,
            ItemsSubcommand::Show { id } => views::show_item(ctx, id).await,
            ItemsSubcommand::Create { title, description } => {
                views::create_item(ctx, &title, &description).await
            }
            ItemsSubcommand::Delete { id, yes } => views::delete_item(ctx, id, yes).await,
        },
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Update {
                full_name,
                email,
                password,
            } => views::update_profile(ctx, full_name, email, password).await,
        },
        Command::Orgs { json } => views::organizations(ctx, json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_ref());
    info!("seaport starting");

    let mut config = load_config(&cli);
    let mut ctx = match AppContext::from_config(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let state = ctx.restore();
    debug!(?state, "Session restored");

    let code = match run(cli, &mut ctx, &mut config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", views::user_message(&e));
            if views::is_unauthorized(&e) {
                // Expired sessions end here; the user is sent back to `login`
                ctx.session_mut().acknowledge_expiry();
                eprintln!("Run `seaport login` to start a new session.");
                ExitCode::from(views::EXIT_UNAUTHORIZED)
            } else {
                ExitCode::FAILURE
            }
        }
    };

    info!("seaport shutting down");
    code
}
