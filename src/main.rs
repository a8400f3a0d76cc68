//! HTTP payload ingestion sink.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │                 INGESTION SINK               │
//!                  │                                              │
//!   POST /route    │  ┌────────┐   ┌─────────┐   ┌────────────┐  │
//!   ───────────────┼─▶│  http  │──▶│ routing │──▶│   record   │  │
//!                  │  │ server │   │ + auth  │   │  envelope  │  │
//!                  │  └────────┘   └─────────┘   └─────┬──────┘  │
//!                  │                                   │         │
//!                  │                                   ▼         │
//!   200 text/plain │                     ┌──────────────────────┐│
//!   ◀──────────────┼─────────────────────│ storage: append with ││
//!                  │                     │ rotation, or fresh   ││
//!                  │                     │ file per request     ││
//!                  │                     └──────────────────────┘│
//!                  │                                              │
//!                  │  config (flags + JSON file) · tracing ·      │
//!                  │  graceful shutdown                           │
//!                  └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ingest_sink::config::loader::{finalize_routes, load_routes};
use ingest_sink::config::{RouteConfig, RouteMap};
use ingest_sink::http::HttpServer;
use ingest_sink::lifecycle::Shutdown;

/// HTTP ingestion sink: receive POSTed payloads into files.
#[derive(Parser, Debug)]
#[command(name = "ingest-sink", version, about)]
struct Cli {
    /// Server bind address.
    #[arg(long, default_value = "0.0.0.0:8777")]
    addr: String,

    /// Access token for the default route.
    #[arg(long, default_value = "")]
    secret: String,

    /// Path template to write files to; %T gets a timestamp.
    #[arg(long, default_value = "")]
    out: String,

    /// Append to one (rotating) file instead of writing files.
    #[arg(long, default_value = "")]
    append: String,

    /// Append window length in seconds; 0 disables rotation.
    #[arg(long = "append-window", default_value_t = 0)]
    append_window: i64,

    /// Offset applied to the append window boundary, in seconds.
    #[arg(long = "append-window-offset", default_value_t = 0)]
    append_window_offset: i64,

    /// Maximum object size to receive, in bytes.
    #[arg(long, default_value_t = 10_000_000)]
    max: i64,

    /// Write raw data instead of a CBOR envelope record.
    #[arg(long)]
    raw: bool,

    /// Only accept this Content-Type.
    #[arg(long = "content-type", default_value = "")]
    content_type: String,

    /// JSON config file mapping route names to route configs.
    #[arg(long = "cfg")]
    cfg: Option<PathBuf>,
}

impl Cli {
    /// The default (empty-named) route described by the flags, if any
    /// output flag was given.
    fn default_route(&self) -> Option<RouteConfig> {
        if self.out.is_empty() && self.append.is_empty() {
            return None;
        }
        Some(RouteConfig {
            raw: self.raw,
            secret: self.secret.clone(),
            out_template: self.out.clone(),
            append_path: self.append.clone(),
            append_window_secs: self.append_window,
            append_window_offset: self.append_window_offset,
            content_type: self.content_type.clone(),
            max_bytes: self.max,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingest_sink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut routes = match &cli.cfg {
        Some(path) => match load_routes(path) {
            Ok(routes) => routes,
            Err(e) => {
                tracing::error!(config = %path.display(), error = %e, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => RouteMap::new(),
    };
    if let Some(default_route) = cli.default_route() {
        routes.insert(String::new(), default_route);
    }
    if routes.is_empty() {
        tracing::error!("no routes configured; pass --cfg, --out, or --append");
        return ExitCode::FAILURE;
    }
    if let Err(e) = finalize_routes(&mut routes) {
        tracing::error!(error = %e, "invalid route configuration");
        return ExitCode::FAILURE;
    }

    tracing::info!(routes = routes.len(), addr = %cli.addr, "configuration loaded");

    let listener = match TcpListener::bind(&cli.addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %cli.addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_handle = shutdown.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
        }
        shutdown.trigger();
    });

    let server = HttpServer::new(routes);
    if let Err(e) = server.run(listener, server_handle).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("shutdown complete");
    ExitCode::SUCCESS
}
