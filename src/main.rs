// ABOUTME: Entry point for the myipd binary.
// ABOUTME: Parses CLI arguments, initializes tracing, loads the stores, and starts the HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use myipd_server::config::{
    DEFAULT_IPV4_SOURCE, DEFAULT_IPV6_SOURCE, DEFAULT_LISTEN_PORT, DEFAULT_TOKENS_FILE,
};
use myipd_server::{AppState, ServerConfig, create_router};

/// Publish this host's public IP addresses to token-authenticated HTTP clients.
#[derive(Debug, Parser)]
#[command(name = "myipd", version, about)]
struct Cli {
    /// Address and port to listen on.
    #[arg(short, long, env = "MYIPD_LISTEN", default_value_t = default_listen())]
    listen: SocketAddr,

    /// File with one accepted token per line.
    #[arg(short, long, env = "MYIPD_TOKENS_FILE", default_value = DEFAULT_TOKENS_FILE)]
    tokens_file: PathBuf,

    /// File with extra `[tag] address` lines to report. Empty disables extras.
    #[arg(short, long, env = "MYIPD_EXTRAS_FILE", value_parser = any_path)]
    extras_file: Option<PathBuf>,

    /// Do not look up the public IPv4 address.
    #[arg(long)]
    disable_ipv4: bool,

    /// Also look up the public IPv6 address.
    #[arg(short = '6', long)]
    enable_ipv6: bool,

    /// Never print tags in listings.
    #[arg(long)]
    no_tags: bool,

    /// Endpoint that answers with the caller's public IPv4 address.
    #[arg(long, env = "MYIPD_IPV4_SOURCE", default_value = DEFAULT_IPV4_SOURCE)]
    ipv4_source: String,

    /// Endpoint that answers with the caller's public IPv6 address.
    #[arg(long, env = "MYIPD_IPV6_SOURCE", default_value = DEFAULT_IPV6_SOURCE)]
    ipv6_source: String,

    /// Seconds to wait for each address lookup.
    #[arg(long, env = "MYIPD_LOOKUP_TIMEOUT", default_value_t = 5)]
    lookup_timeout: u64,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Disable logging entirely.
    #[arg(long)]
    no_log: bool,

    /// Leave timestamps out of log lines.
    #[arg(long)]
    no_time: bool,

    /// Skip the startup banner.
    #[arg(long)]
    no_hello: bool,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_LISTEN_PORT))
}

/// Like clap's path parser, but an empty value is accepted so it can mean "off".
fn any_path(value: &str) -> Result<PathBuf, Infallible> {
    Ok(PathBuf::from(value))
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            listen: self.listen,
            tokens_file: self.tokens_file.clone(),
            extras_file: self
                .extras_file
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            enable_ipv4: !self.disable_ipv4,
            enable_ipv6: self.enable_ipv6,
            no_tags: self.no_tags,
            ipv4_source: self.ipv4_source.clone(),
            ipv6_source: self.ipv6_source.clone(),
            lookup_timeout: Duration::from_secs(self.lookup_timeout),
        }
    }

    fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            "myipd=info,myipd_server=info,myipd_store=info,tower_http=warn"
        }
    }
}

fn init_tracing(cli: &Cli) {
    if cli.no_log {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.default_log_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cli.no_time {
        builder.without_time().init();
    } else {
        builder.init();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn print_hello(config: &ServerConfig) {
    println!("myipd {} ({})", myipd_core::VERSION, myipd_core::CODENAME);
    println!("  listen:      {}", config.listen);
    println!("  tokens file: {}", config.tokens_file.display());
    match &config.extras_file {
        Some(path) => println!("  extras file: {}", path.display()),
        None => println!("  extras file: (none)"),
    }
    println!(
        "  ipv4: {}  ipv6: {}  tags: {}",
        on_off(config.enable_ipv4),
        on_off(config.enable_ipv6),
        on_off(!config.no_tags)
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = cli.server_config();
    config.validate()?;
    if !cli.no_hello {
        print_hello(&config);
    }

    let listen = config.listen;
    let state = Arc::new(AppState::with_http_lookup(config)?);
    state.load_stores().await;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {}", listen))?;
    tracing::info!("myipd listening on {}", listen);

    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
