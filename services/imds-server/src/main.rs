// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Instance-metadata mimic service
//!
//! Emulates a cloud provider's instance-metadata HTTP API for machines that
//! are not running inside that provider. Callers are identified by source
//! address against a directory of machine records; metadata about the
//! matching machine is served as plain text under the provider's versioned
//! paths.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use imds_core::{Dispatcher, RouteTable};
use tracing::info;

use imds_server::config::ServerConfig;
use imds_server::http::build_router;
use imds_server::resolver::FileResolver;

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let buildstamp = option_env!("STAMP").unwrap_or("no-STAMP");
    println!("{} {} ({})", name, version, buildstamp);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --version and --help
    let args: Vec<String> = std::env::args().collect();
    #[allow(clippy::never_loop)] // Intentional: early return on first recognized arg
    for arg in &args[1..] {
        match arg.as_str() {
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            "-h" | "--help" => {
                print_version();
                println!("Usage: {} [OPTIONS]", args[0]);
                println!();
                println!("Options:");
                println!("  -h, --help       Display this information");
                println!("  -V, --version    Display the program's version number");
                println!();
                println!("Environment variables:");
                println!("  BIND_ADDRESS     Server bind address (default: 0.0.0.0:8080)");
                println!(
                    "  MACHINES_DIR     Directory of machine record files (default: /var/tmp/imds/machines)"
                );
                println!("  RUST_LOG         Log filter (default: imds_server=info)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "imds_server=info".to_string()),
        ))
        .init();

    print_version();

    // Load configuration and the machine directory
    let config = ServerConfig::from_env();
    info!("Machine records directory: {}", config.machines_dir.display());

    let resolver = FileResolver::from_dir(&config.machines_dir)
        .context("Failed to load machine records")?;
    info!("Loaded {} machine record(s)", resolver.machine_count());

    let dispatcher = Arc::new(Dispatcher::new(
        RouteTable::standard(),
        Arc::new(resolver),
    ));

    // Start the server
    let bind_address: SocketAddr = config
        .bind_address
        .parse()
        .context("Invalid BIND_ADDRESS")?;
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Instance-metadata mimic listening on http://{}", bind_address);
    info!("Available endpoints:");
    info!("  GET /");
    info!("  GET /latest/meta-data/");
    info!("  GET /latest/meta-data/instance-id");
    info!("  GET /latest/meta-data/public-keys/");
    info!("  GET /latest/user-data/");

    axum::serve(
        listener,
        build_router(dispatcher).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|error| anyhow::anyhow!("server failed: {}", error))
}
