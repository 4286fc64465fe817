//! Installed-server discovery: the orchestration at the heart of the core.
//!
//! A discovery pass crosses every catalog entry with every library root, in
//! declaration and parser order respectively, and stops at the first match
//! per entry — so a server installed in two libraries is reported once, from
//! the library scanned first. Every filesystem failure inside the loop means
//! "not present here, keep scanning"; nothing I/O-related propagates.

use crate::catalog::{SERVER_CATALOG, ServerCatalogEntry};
use crate::models::DiscoveredServer;
use crate::services::cover_art::fetch_cover_art;
use crate::services::library::parse_library_folders;
use crate::services::process::is_process_running;
use crate::services::steam_paths::resolve_steam_root;
use camino::Utf8Path;

/// Find all installed catalog servers under a Steam installation.
///
/// `hint` may be a full Steam root path, a bare volume designator to search,
/// or absent for the platform default lookup. An unresolvable hint yields an
/// empty list, not an error — "nothing found" is a normal answer.
pub async fn find_installed_servers(hint: Option<&str>) -> Vec<DiscoveredServer> {
    let steam_root = match resolve_steam_root(hint).await {
        Some(root) if !root.as_str().is_empty() => root,
        _ => {
            tracing::warn!("Steam installation not found");
            return Vec::new();
        }
    };

    tracing::info!("Searching for servers in: {}", steam_root);
    let library_roots = parse_library_folders(&steam_root).await;

    let mut servers = Vec::new();

    for entry in SERVER_CATALOG.values() {
        for library_root in &library_roots {
            let manifest_path = library_root.join(format!("appmanifest_{}.acf", entry.app_id));
            let manifest_exists = tokio::fs::metadata(&manifest_path).await.is_ok();
            if manifest_exists {
                tracing::info!(
                    "Found manifest for {} ({}) at {}",
                    entry.display_name,
                    entry.app_id,
                    manifest_path
                );
            }

            let common_path = library_root.join("common");

            match list_directories(&common_path).await {
                Ok(dir_names) => {
                    tracing::debug!(
                        "Searching {} for {} (appId {}): {:?}",
                        common_path,
                        entry.display_name,
                        entry.app_id,
                        dir_names
                    );

                    if let Some(matched) = match_install_dir(&dir_names, entry, manifest_exists) {
                        let install_path = common_path.join(&matched);
                        tracing::info!("Found {} at {}", entry.display_name, install_path);

                        let cover_art = fetch_cover_art(entry.app_id).await;
                        servers.push(DiscoveredServer {
                            name: entry.display_name.to_string(),
                            app_id: entry.app_id,
                            install_path,
                            is_running: is_process_running(entry.executable_name),
                            cover_art,
                        });
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        "Can't read common directory for {}: {}",
                        entry.display_name,
                        e
                    );
                    // Manifest present but common/ unreadable: Steam is still
                    // extracting (or the tree is partial). Report it anyway so
                    // the operator sees the install.
                    if manifest_exists {
                        let cover_art = fetch_cover_art(entry.app_id).await;
                        servers.push(DiscoveredServer {
                            name: entry.display_name.to_string(),
                            app_id: entry.app_id,
                            install_path: common_path,
                            is_running: false,
                            cover_art,
                        });
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Total servers found: {}", servers.len());
    servers
}

/// Select the install directory for a catalog entry from the contents of a
/// library's `common` directory.
///
/// Three tiers, in order:
/// 1. a directory literally named the decimal app id,
/// 2. a directory matching the expected folder name case-insensitively,
/// 3. with a manifest present, the first directory at all — a best-effort
///    fallback for installs renamed by hand. Known to misattribute when
///    unrelated folders coexist; kept as-is.
fn match_install_dir(
    dir_names: &[String],
    entry: &ServerCatalogEntry,
    manifest_exists: bool,
) -> Option<String> {
    let app_folder = entry.app_id.to_string();

    if let Some(name) = dir_names.iter().find(|name| **name == app_folder) {
        return Some(name.clone());
    }

    if let Some(name) = dir_names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(entry.expected_folder_name))
    {
        return Some(name.clone());
    }

    if manifest_exists {
        return dir_names.first().cloned();
    }

    None
}

/// Names of the subdirectories of `path`, in directory order.
async fn list_directories(path: &Utf8Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut names = Vec::new();

    while let Some(dir_entry) = entries.next_entry().await? {
        let is_dir = dir_entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if is_dir {
            names.push(dir_entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}
