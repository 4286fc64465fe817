//! Locating the Steam installation and enumerating storage volumes.
//!
//! Everything here is best-effort: a probe that fails for any reason is
//! treated as "not found" and the next candidate is tried. No function in this
//! module returns an error for routine absence.

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;

/// Matches `SteamPath    REG_SZ    <value>` in `reg query` output
static REG_STEAM_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SteamPath\s+REG_SZ\s+(.+)").expect("Invalid SteamPath regex"));

/// Matches drive roots like `C:\` in `fsutil fsinfo drives` output
static DRIVE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]:\\").expect("Invalid drive letter regex"));

/// Resolve the Steam root directory from an optional caller hint.
///
/// - A hint containing a path separator is taken as the Steam root directly,
///   without validation.
/// - Any other hint is treated as a volume designator (e.g. `D:`) and the
///   conventional install locations under that volume are probed in order.
/// - With no hint, the platform default lookup runs ([`find_steam_path`]).
///
/// Returns `None` when nothing is found; never fails.
pub async fn resolve_steam_root(hint: Option<&str>) -> Option<Utf8PathBuf> {
    match hint {
        Some(hint) if hint.contains('/') || hint.contains('\\') => {
            Some(Utf8PathBuf::from(hint))
        }
        Some(drive) => find_steam_path_on_drive(drive).await,
        None => find_steam_path().await,
    }
}

/// Probe the conventional Steam install locations under one volume.
///
/// Candidates are tried in a fixed order; the first existing directory wins.
pub async fn find_steam_path_on_drive(drive: &str) -> Option<Utf8PathBuf> {
    let root = drive_root(drive);
    let candidates = [
        root.join("Program Files (x86)").join("Steam"),
        root.join("Program Files").join("Steam"),
        root.join("Steam"),
        root.join("Games").join("Steam"),
    ];

    for candidate in candidates {
        if path_exists(&candidate).await {
            tracing::debug!("Found Steam on {}: {}", drive, candidate);
            return Some(candidate);
        }
    }

    tracing::debug!("No Steam installation on {}", drive);
    None
}

/// Locate the Steam installation at its platform default location.
///
/// Windows consults the user registry first and only probes the conventional
/// paths when the registry query itself fails. macOS and Linux each have a
/// single conventional location under the user's home directory.
pub async fn find_steam_path() -> Option<Utf8PathBuf> {
    if cfg!(target_os = "windows") {
        match query_registry_steam_path() {
            Ok(Some(path)) => {
                tracing::info!("Steam path from registry: {}", path);
                return Some(path);
            }
            Ok(None) => {
                // Query ran but the value is missing; the registry is
                // authoritative here, so do not second-guess it.
                tracing::warn!("Registry query returned no SteamPath value");
                return None;
            }
            Err(e) => {
                tracing::debug!("Registry query failed ({}), probing common paths", e);
            }
        }

        let program_files =
            std::env::var("PROGRAMFILES").unwrap_or_else(|_| r"C:\Program Files".to_string());
        let candidates = [
            Utf8PathBuf::from(r"C:\Program Files (x86)\Steam"),
            Utf8PathBuf::from(r"C:\Program Files\Steam"),
            Utf8PathBuf::from(program_files).join("Steam"),
        ];

        for candidate in candidates {
            if path_exists(&candidate).await {
                return Some(candidate);
            }
        }
        None
    } else if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").unwrap_or_default();
        let path = Utf8PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("Steam");
        path_exists(&path).await.then_some(path)
    } else {
        let home = std::env::var("HOME").unwrap_or_default();
        let path = Utf8PathBuf::from(home).join(".steam").join("steam");
        path_exists(&path).await.then_some(path)
    }
}

/// Enumerate volumes worth scanning for Steam installs.
///
/// Windows extracts drive letters from `fsutil fsinfo drives` and falls back
/// to `["C:"]` when the tool is unavailable or reports nothing. The Unix
/// branches return the conventional mount-point parents.
pub fn list_available_drives() -> Vec<String> {
    if cfg!(target_os = "windows") {
        let output = match Command::new("fsutil").args(["fsinfo", "drives"]).output() {
            Ok(output) if output.status.success() => output,
            Ok(_) | Err(_) => {
                tracing::warn!("fsutil failed, falling back to C:");
                return vec!["C:".to_string()];
            }
        };

        let text = String::from_utf8_lossy(&output.stdout);
        let mut drives: Vec<String> = DRIVE_LETTER
            .find_iter(&text)
            .map(|m| m.as_str().trim_end_matches('\\').to_string())
            .collect();

        if drives.is_empty() {
            return vec!["C:".to_string()];
        }
        drives.sort();
        drives
    } else if cfg!(target_os = "macos") {
        vec!["/Volumes".to_string()]
    } else {
        vec!["/mnt".to_string(), "/media".to_string()]
    }
}

/// Convenience composition for presenting install candidates to the operator:
/// every conventional Steam path, on every volume, that actually exists.
pub async fn get_common_steam_paths() -> Vec<Utf8PathBuf> {
    let mut found = Vec::new();

    for drive in list_available_drives() {
        let root = drive_root(&drive);
        let candidates: Vec<Utf8PathBuf> = if cfg!(target_os = "windows") {
            vec![
                root.join("Program Files").join("Steam"),
                root.join("Program Files (x86)").join("Steam"),
                root.join("SteamLibrary"),
            ]
        } else if cfg!(target_os = "macos") {
            vec![
                root.join("Library").join("Application Support").join("Steam"),
                root.join(".steam"),
            ]
        } else {
            vec![
                root.join(".steam"),
                root.join(".var").join("app").join("com.valvesoftware.Steam"),
            ]
        };

        for candidate in candidates {
            if path_exists(&candidate).await {
                found.push(candidate);
            }
        }
    }

    tracing::debug!("Common Steam paths present: {:?}", found);
    found
}

/// Query the per-user registry key Steam writes its install path to.
///
/// `Ok(None)` means the query ran but the value was absent; `Err` means the
/// query itself could not be run, which is the only case that triggers the
/// conventional-path fallback.
fn query_registry_steam_path() -> anyhow::Result<Option<Utf8PathBuf>> {
    let output = Command::new("reg")
        .args([
            "query",
            r"HKEY_CURRENT_USER\Software\Valve\Steam",
            "/v",
            "SteamPath",
        ])
        .output()?;

    if !output.status.success() {
        anyhow::bail!("reg query exited with {}", output.status);
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(REG_STEAM_PATH
        .captures(&text)
        .map(|caps| Utf8PathBuf::from(caps[1].trim())))
}

/// Turn a volume designator into a joinable root path.
///
/// Bare drive letters like `C:` need an explicit separator appended, otherwise
/// joining produces a drive-relative path on Windows.
fn drive_root(drive: &str) -> Utf8PathBuf {
    if drive.ends_with('/') || drive.ends_with('\\') {
        Utf8PathBuf::from(drive)
    } else {
        Utf8PathBuf::from(format!("{}{}", drive, std::path::MAIN_SEPARATOR))
    }
}

async fn path_exists(path: &Utf8Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}
