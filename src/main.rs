//! ADK Proxy - HTTP proxy and terminal chat for a remote shopping assistant
//!
//! `serve` runs the proxy routes in front of the remote agent; `chat` talks
//! to a running proxy through the session/message client.

use adk_proxy::{
    agent::CustomerData,
    client::{encode_data_url, mime_type_for_path, AdkClient, Session},
    config::ProxyConfig,
    server::ProxyServerBuilder,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "adk-proxy")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Session-aware HTTP proxy for a remote shopping assistant agent")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ADK_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Remote agent base URL
        #[arg(long)]
        agent_url: Option<String>,
    },

    /// Chat with the agent through a running proxy
    Chat {
        /// Proxy base URL
        #[arg(long)]
        proxy_url: Option<String>,

        /// User identifier
        #[arg(short, long)]
        user_id: Option<String>,

        /// Send a single message and exit (interactive when omitted)
        #[arg(short, long)]
        message: Option<String>,

        /// Image file attached to the single message
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Customer first name
        #[arg(long)]
        first_name: Option<String>,

        /// Preferred language
        #[arg(long)]
        language: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("adk_proxy={},tower_http=debug", log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = ProxyConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            agent_url,
        } => {
            run_server(config, host, port, agent_url).await?;
        }
        Commands::Chat {
            proxy_url,
            user_id,
            message,
            image,
            first_name,
            language,
        } => {
            let mut config = config;
            if let Some(url) = proxy_url {
                config.client.proxy_url = url;
            }
            if let Some(user) = user_id {
                config.client.user_id = user;
            }
            let customer = CustomerData {
                first_name,
                preferred_language: language,
                ..Default::default()
            };
            run_chat(config, customer, message, image).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(
    config: ProxyConfig,
    host: Option<String>,
    port: Option<u16>,
    agent_url: Option<String>,
) -> Result<()> {
    let mut builder = ProxyServerBuilder::new().config(config);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let Some(url) = agent_url {
        builder = builder.agent_url(url);
    }
    let server = builder.build()?;

    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

async fn run_chat(
    config: ProxyConfig,
    customer: CustomerData,
    message: Option<String>,
    image: Option<PathBuf>,
) -> Result<()> {
    let client = AdkClient::from_config(&config.client);
    let mut session = Session::new(config.client.user_id.clone());

    let created = client.create_session(&mut session, customer).await;
    if !created.success {
        anyhow::bail!(
            "Failed to create session: {}",
            created.error.unwrap_or_default()
        );
    }
    println!(
        "Session {} ready.",
        client.current_session_id(&session).unwrap_or("?")
    );

    if let Some(text) = message {
        let image = match image {
            Some(path) => Some(read_image(&path).await?),
            None => None,
        };
        let reply = client.send_message(&mut session, &text, image.as_deref()).await;
        print_reply(reply);
        return Ok(());
    }

    println!("Type a message, /image <path> [text] to attach an image, /reset or /quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                client.reset_session(&mut session);
                println!("Session reset.");
            }
            _ => {
                let (text, image) = match line.strip_prefix("/image ") {
                    Some(rest) => {
                        let (path, text) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
                        match read_image(Path::new(path)).await {
                            Ok(url) => (text.to_string(), Some(url)),
                            Err(e) => {
                                println!("! {:#}", e);
                                continue;
                            }
                        }
                    }
                    None => (line.to_string(), None),
                };
                let reply = client.send_message(&mut session, &text, image.as_deref()).await;
                print_reply(reply);
            }
        }
    }

    Ok(())
}

async fn read_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(encode_data_url(mime_type_for_path(path), &bytes))
}

fn print_reply(reply: adk_proxy::agent::MessageEnvelope) {
    match (reply.success, reply.response) {
        (true, Some(content)) => println!("{}> {}", content.role, content.text()),
        _ => println!("! {}", reply.error.unwrap_or_else(|| "Unknown error".to_string())),
    }
}

fn show_config(config: Option<&ProxyConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
