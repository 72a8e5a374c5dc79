use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use aipfs_chat::config::Config;
use aipfs_chat::conversation::{
    ConversationController, Input, RejectReason, SendOutcome, SlashCommand, get_help_text,
    parse_input, render_message,
};
use aipfs_chat::events::{Role, View};
use aipfs_chat::store::ConversationStore;
use aipfs_chat::terminal;
use aipfs_chat::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "aipfs-chat")]
#[command(version)]
#[command(about = "Chat with the AIPFS library agent", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.aipfs/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Agent base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Attempts per message
    #[arg(long, global = true)]
    retries: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Send { message: String },
    /// Print the effective configuration
    Config,
}

type Controller = ConversationController<HttpTransport>;

const THINKING_AFTER: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.api_url, cli.retries);
    config.validate()?;

    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&config).await,
        Commands::Send { message } => send_once(&config, &message).await,
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config).context("Failed to serialize config")?);
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_controller(config: &Config) -> Result<Controller> {
    let user_id = config
        .user_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let store = ConversationStore::bootstrap(user_id).into_shared();
    let transport = HttpTransport::from_config(config).context("Failed to create HTTP client")?;
    tracing::debug!(endpoint = transport.endpoint(), "agent transport ready");

    Ok(ConversationController::new(store, transport, config.max_retries)
        .with_escape(|| eprintln!("{}", terminal::format_view(View::Unavailable))))
}

async fn send_once(config: &Config, message: &str) -> Result<()> {
    let controller = build_controller(config)?;
    match controller.send_message(message).await {
        SendOutcome::Delivered => {
            print_last_reply(&controller, config).await;
            Ok(())
        }
        SendOutcome::Exhausted => {
            bail!("agent unavailable after {} attempt(s)", config.max_retries)
        }
        SendOutcome::Rejected(reason) => bail!("message not sent: {:?}", reason),
    }
}

async fn run_chat(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    println!("{}", terminal::format_view(View::Terminal));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", terminal::PROMPT);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Message(text) => match send_with_indicator(&controller, &text).await {
                SendOutcome::Delivered => print_last_reply(&controller, config).await,
                SendOutcome::Exhausted => {
                    println!("{}", terminal::format_line(&Role::Info, "back to terminal"));
                }
                SendOutcome::Rejected(RejectReason::EmptyMessage) => {}
                SendOutcome::Rejected(reason) => {
                    let text = format!("message not sent ({:?})", reason);
                    println!("{}", terminal::format_line(&Role::Info, &text));
                }
            },
            Input::Command(command) => {
                if !run_command(&controller, command).await? {
                    break;
                }
            }
            Input::UnexpectedArgument(command) => {
                let text = format!("/{} takes no arguments", command.command());
                println!("{}", terminal::format_line(&Role::Info, &text));
            }
            Input::UnknownCommand(raw) => {
                let text = format!("unknown command {}, try /help", raw);
                println!("{}", terminal::format_line(&Role::Info, &text));
            }
        }
    }

    Ok(())
}

async fn send_with_indicator(controller: &Controller, text: &str) -> SendOutcome {
    controller
        .send_message_watched(text, THINKING_AFTER, || {
            println!("{}", terminal::format_line(&Role::Info, terminal::THINKING));
        })
        .await
}

/// Returns `false` when the session should end
async fn run_command(controller: &Controller, command: SlashCommand) -> Result<bool> {
    match command {
        SlashCommand::New => {
            let chat_id = controller.start_conversation().await;
            let text = format!("started conversation {}", chat_id);
            println!("{}", terminal::format_line(&Role::Info, &text));
        }
        SlashCommand::Chats => {
            let store = controller.store().read().await;
            let active = store.active_conversation_id();
            for chat_id in &store.profile().conversation_ids {
                let marker = if Some(chat_id.as_str()) == active { "*" } else { " " };
                println!("{} {} ({} messages)", marker, chat_id, store.messages(chat_id).len());
            }
        }
        SlashCommand::Export => {
            let store = controller.store().read().await;
            let messages = store
                .active_conversation_id()
                .map(|id| store.messages(id))
                .unwrap_or_default();
            println!(
                "{}",
                serde_json::to_string_pretty(messages).context("Failed to serialize history")?
            );
        }
        SlashCommand::Help => println!("{}", get_help_text()),
        SlashCommand::Bye => return Ok(false),
    }
    Ok(true)
}

async fn print_last_reply(controller: &Controller, config: &Config) {
    let store = controller.store().read().await;
    let Some(reply) = store
        .active_conversation_id()
        .and_then(|id| store.messages(id).last())
    else {
        return;
    };
    for block in render_message(reply, &config.tool_kind) {
        println!("{}", terminal::format_block(&block));
    }
}
