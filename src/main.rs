//! Origin Gate demo server.
//!
//! A small axum service gated by a configured allow- or block-list,
//! exercising the matching engine end-to-end.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{middleware, Json, Router};
use clap::Parser;
use serde::Serialize;
use tokio::net::TcpListener;

use origin_gate::config::GateConfig;
use origin_gate::cors::enforce;
use origin_gate::OriginGate;

/// Origin Gate demo server
#[derive(Parser, Debug)]
#[command(name = "origin-gate")]
#[command(version)]
#[command(about = "CORS origin allow/block-list gate")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Allow-list: reject requests whose origin is NOT in this list
    #[arg(long, value_name = "LIST", conflicts_with = "block")]
    allow: Option<String>,

    /// Block-list: reject requests whose origin IS in this list
    #[arg(long, value_name = "LIST")]
    block: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

async fn index() -> &'static str {
    "origin-gate: request passed the gate\n"
}

fn router(gate: OriginGate) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(Arc::new(gate), enforce))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // CLI lists win; otherwise fall back to the environment.
    let (gate, bind_addr) = if let Some(list) = &args.allow {
        (OriginGate::allow(list.as_str()), parse_host(&args.host)?)
    } else if let Some(list) = &args.block {
        (OriginGate::block(list.as_str()), parse_host(&args.host)?)
    } else {
        let config = GateConfig::from_env().context("no list configured via CLI or environment")?;
        (config.gate(), config.bind_addr)
    };

    let addr = SocketAddr::new(bind_addr, args.port);
    tracing::info!(%addr, mode = ?gate.mode(), "origin-gate starting");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        router(gate).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}

fn parse_host(host: &str) -> anyhow::Result<IpAddr> {
    host.parse::<IpAddr>()
        .with_context(|| format!("invalid host address: {host}"))
}
