// Steamkeeper - discovery and lifecycle management for locally installed
// Steam dedicated servers.
//
// This is the library crate containing the core business logic and data
// structures. The binary crate (main.rs) provides a headless entry point;
// the GUI/IPC shell is an external consumer of this API.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;

// Re-export the surface the external shell consumes
pub use catalog::{ConfigFormat, SERVER_CATALOG, ServerCatalogEntry};
pub use config::{
    ConfigDocument, ConfigError, ConfigValue, load_server_config, parse_config,
    save_server_config, serialize_config,
};
pub use models::DiscoveredServer;
pub use services::{
    backup_server_save, find_installed_servers, get_common_steam_paths, get_server_build_id,
    is_process_running, launch_server, parse_library_folders, stop_server,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
