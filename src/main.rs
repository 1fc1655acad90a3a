use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

mod app;
mod config;
mod controller;
mod error;
mod handler;
mod locale;
mod message;
mod relay;
mod server;
mod tui;
mod ui;

use app::App;
use config::Config;
use controller::WidgetController;
use locale::Locale;
use relay::{Relay, RelayClient};

#[derive(Parser)]
#[command(name = "souqcoom")]
#[command(about = "Souqcoom support chat: terminal widget and relay endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat widget (default)
    Chat {
        /// Locale for widget strings (en, ar, fr, es, de, tr)
        #[arg(short, long)]
        locale: Option<String>,
        /// Override the configured relay URL
        #[arg(long)]
        relay_url: Option<String>,
    },
    /// Run the relay endpoint
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:8090")]
        bind: String,
        /// Override the configured upstream chat service URL
        #[arg(long)]
        upstream_url: Option<String>,
    },
    /// Send a single message and print the reply
    Send {
        message: String,
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// List supported locales
    Locales,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|_| Config::new());

    match cli.command.unwrap_or(Commands::Chat {
        locale: None,
        relay_url: None,
    }) {
        Commands::Chat { locale, relay_url } => {
            // No tracing here: the raw-mode terminal owns stderr
            let locale = resolve_locale(locale.as_deref(), &config);
            let url = relay_url.unwrap_or_else(|| config.relay_url.clone());
            run_chat(&config, locale, &url).await?
        }
        Commands::Serve { bind, upstream_url } => {
            init_tracing();
            let mut config = config;
            if let Some(url) = upstream_url {
                config.upstream_url = url;
            }
            let state = server::ServerState::from_config(&config)?;
            server::run(&bind, state).await?
        }
        Commands::Send { message, locale } => {
            init_tracing();
            let locale = resolve_locale(locale.as_deref(), &config);
            send_once(&config, locale, message).await?
        }
        Commands::Locales => list_locales(),
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "souqcoom_support=info".into()),
        )
        .init();
}

fn resolve_locale(flag: Option<&str>, config: &Config) -> Locale {
    flag.or(config.locale.as_deref())
        .and_then(Locale::from_str)
        .unwrap_or(Locale::En)
}

/// Client timeout sits above the relay's upstream bound so the widget
/// sees the relay's error envelope rather than its own timeout.
fn relay_client(config: &Config, url: &str) -> Result<RelayClient> {
    RelayClient::new(
        url,
        Duration::from_secs(config.upstream_timeout_secs + 15),
    )
}

async fn run_chat(config: &Config, locale: Locale, relay_url: &str) -> Result<()> {
    let relay = relay_client(config, relay_url)?;
    let controller = WidgetController::new(locale, config.widget.clone(), config.resolved_token());
    let mut app = App::new(controller, relay);
    app.controller.open();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;
        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event).await?;
        }
    }

    tui::restore()?;
    Ok(())
}

async fn send_once(config: &Config, locale: Locale, message: String) -> Result<()> {
    let relay = relay_client(config, &config.relay_url)?;
    let mut controller =
        WidgetController::new(locale, config.widget.clone(), config.resolved_token());
    controller.draft = message;

    let Some(request) = controller.begin_submit() else {
        println!("{}", "Nothing to send".yellow());
        return Ok(());
    };

    println!("{} {}", "You:".cyan().bold(), request.message);
    let outcome = relay.send(request).await;
    controller.complete_submit(outcome);

    if let Some(reply) = controller.transcript().last() {
        let title = format!("{}:", locale.strings().title);
        if reply.error {
            println!("{} {}", title.red().bold(), reply.text.red());
        } else {
            println!("{} {}", title.green().bold(), reply.text);
        }
    }

    Ok(())
}

fn list_locales() {
    println!("\n{}", "Supported locales".bold().blue());
    for locale in Locale::all() {
        let direction = match locale.direction() {
            locale::Direction::RightToLeft => " (RTL)".dimmed(),
            locale::Direction::LeftToRight => "".dimmed(),
        };
        println!(
            "  {} {}{}",
            locale.as_str().green(),
            locale.display_name(),
            direction
        );
    }
}
