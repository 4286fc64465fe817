//! Static registry of known Steam dedicated-server applications.
//!
//! The catalog is a flat keyed table of plain records: one entry per supported
//! app id, carrying only the strings needed to locate, run, back up and
//! configure that server. There is no per-entry behavior, so entries are data,
//! not a type hierarchy.

use indexmap::IndexMap;
use std::sync::LazyLock;

/// On-disk format of a server's own configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Ini,
}

/// Metadata for one supported dedicated-server application.
///
/// Immutable for the lifetime of the process; looked up by app id.
#[derive(Debug, Clone)]
pub struct ServerCatalogEntry {
    /// Steam's numeric identifier for the application
    pub app_id: u32,

    /// Human-readable server name, also used as the backup subdirectory name
    pub display_name: &'static str,

    /// Install folder name under `steamapps/common` (matched case-insensitively)
    pub expected_folder_name: &'static str,

    /// Server executable file name, used for liveness checks and launch/stop
    pub executable_name: &'static str,

    /// Save-data directory, relative to the install path
    pub save_relative_path: &'static str,

    /// Config file relative to the install path; `None` means config editing
    /// is not supported for this server
    pub config_relative_path: Option<&'static str>,
}

impl ServerCatalogEntry {
    /// Config format inferred from the config file extension.
    ///
    /// `.json` files use the JSON codec; everything else uses the custom
    /// key=value dialect.
    pub fn config_format(&self) -> Option<ConfigFormat> {
        let path = self.config_relative_path?;
        if path.to_lowercase().ends_with(".json") {
            Some(ConfigFormat::Json)
        } else {
            Some(ConfigFormat::Ini)
        }
    }
}

/// Known Steam dedicated-server applications, keyed by app id.
///
/// Iteration order is declaration order, which fixes the scan order of a
/// discovery pass.
pub static SERVER_CATALOG: LazyLock<IndexMap<u32, ServerCatalogEntry>> = LazyLock::new(|| {
    let mut catalog = IndexMap::new();

    catalog.insert(
        2278520,
        ServerCatalogEntry {
            app_id: 2278520,
            display_name: "Enshrouded Dedicated Server",
            expected_folder_name: "EnshroudedServer",
            executable_name: "enshrouded_server.exe",
            save_relative_path: "savegame",
            config_relative_path: Some("enshrouded_server.json"),
        },
    );

    catalog.insert(
        892970,
        ServerCatalogEntry {
            app_id: 892970,
            display_name: "Valheim Server",
            expected_folder_name: "Valheim dedicated server",
            executable_name: "valheim_server.exe",
            save_relative_path: "savegame",
            config_relative_path: None,
        },
    );

    catalog.insert(
        1623730,
        ServerCatalogEntry {
            app_id: 1623730,
            display_name: "Palworld Dedicated Server",
            expected_folder_name: "PalServer",
            executable_name: "pal_server.exe",
            save_relative_path: "savegame",
            config_relative_path: Some("DefaultPalWorldSettings.ini"),
        },
    );

    catalog
});

/// Look up a catalog entry by app id.
pub fn catalog_entry(app_id: u32) -> Option<&'static ServerCatalogEntry> {
    SERVER_CATALOG.get(&app_id)
}
