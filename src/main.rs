//! Steamkeeper - headless entry point.
//!
//! The desktop GUI is an external shell over the library crate; this binary
//! stands in for it on the command line. It initializes logging, runs one
//! discovery pass (optionally against a Steam path or drive given as the
//! first argument) and reports what it found, including the installed build
//! id where a manifest is readable.
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/steamkeeper.<date>
//! 2. Resolve the Steam root from the optional argument
//! 3. Run discovery across all library roots
//! 4. Print one line per discovered server

use anyhow::Result;
use steamkeeper::services::{parse_library_folders, resolve_steam_root};
use steamkeeper::{APP_NAME, VERSION, find_installed_servers, get_server_build_id};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = steamkeeper::logging::setup_logging_with_console("logs", "steamkeeper", false, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let hint = std::env::args().nth(1);
    let servers = find_installed_servers(hint.as_deref()).await;

    if servers.is_empty() {
        println!("No installed servers found");
        return Ok(());
    }

    // Build ids come from the manifest next to each install's library root
    let library_roots = match resolve_steam_root(hint.as_deref()).await {
        Some(root) => parse_library_folders(&root).await,
        None => Vec::new(),
    };

    for server in &servers {
        let mut build_id = None;
        for root in &library_roots {
            build_id = get_server_build_id(server.app_id, root).await;
            if build_id.is_some() {
                break;
            }
        }

        println!(
            "{} (app {}) at {} [{}] build {}",
            server.name,
            server.app_id,
            server.install_path,
            if server.is_running { "running" } else { "stopped" },
            build_id.as_deref().unwrap_or("unknown"),
        );
    }

    Ok(())
}
