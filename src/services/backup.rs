//! Archiving a server's save data with the host OS's own tooling.
//!
//! No archive library: Windows gets PowerShell's `Compress-Archive`, the
//! Unix-likes get `zip -r`. Every failure path degrades to `None` — a missing
//! save directory is "nothing to back up", not an error — and a failed
//! archiver run leaves whatever partial file it produced in place.

use crate::catalog::catalog_entry;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;

/// Archive a server's save directory into a timestamped file under
/// `backup_root/<display name>/`.
///
/// Returns the absolute path of the created archive, or `None` when the app
/// id is unknown, the save directory does not exist, the backup directory
/// cannot be created, or the archiver fails. Each invocation names its file
/// from a second-precision timestamp, so repeated backups never overwrite
/// one another (same-second calls excepted).
pub async fn backup_server_save(
    app_id: u32,
    install_path: &Utf8Path,
    backup_root: &Utf8Path,
) -> Option<Utf8PathBuf> {
    let entry = match catalog_entry(app_id) {
        Some(entry) => entry,
        None => {
            tracing::error!("Unknown server app ID: {}", app_id);
            return None;
        }
    };

    let save_path = install_path.join(entry.save_relative_path);
    if tokio::fs::metadata(&save_path).await.is_err() {
        tracing::error!("Save directory not found: {}", save_path);
        return None;
    }

    let backup_dir = backup_root.join(entry.display_name);
    if let Err(e) = tokio::fs::create_dir_all(&backup_dir).await {
        tracing::error!("Failed to create backup directory {}: {}", backup_dir, e);
        return None;
    }

    // Sortable, filesystem-safe: ISO timestamp with colons flattened to dashes
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
    let backup_file = backup_dir.join(format!("{}.zip", timestamp));

    tracing::info!("Creating backup from {} to {}", save_path, backup_file);

    if run_archiver(&save_path, &backup_file).await {
        tracing::info!("Backup created successfully: {}", backup_file);
        Some(backup_file)
    } else {
        None
    }
}

/// Compress `save_path` into `backup_file` with the platform archiver.
async fn run_archiver(save_path: &Utf8Path, backup_file: &Utf8Path) -> bool {
    let status = if cfg!(target_os = "windows") {
        let ps_command = format!(
            "Compress-Archive -Path '{}' -DestinationPath '{}' -Force",
            save_path, backup_file
        );
        tokio::process::Command::new("powershell")
            .args(["-NoProfile", "-Command", &ps_command])
            .status()
            .await
    } else {
        tokio::process::Command::new("zip")
            .args(["-r", backup_file.as_str(), save_path.as_str()])
            .status()
            .await
    };

    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::error!("Archiver exited with {}", status);
            false
        }
        Err(e) => {
            tracing::error!("Failed to run archiver: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_app_id_yields_none() {
        let temp = TempDir::new().unwrap();
        let result = backup_server_save(999, &utf8(temp.path()), &utf8(temp.path())).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_missing_save_directory_yields_none() {
        let install = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();
        // Install path exists, but has no savegame/ subdirectory
        let result = backup_server_save(892970, &utf8(install.path()), &utf8(backups.path())).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_backup_dir_created_per_server_name() {
        let install = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();
        std::fs::create_dir_all(install.path().join("savegame")).unwrap();

        // The archiver may or may not exist on the test host; either way the
        // per-server backup directory must have been created first.
        let _ = backup_server_save(892970, &utf8(install.path()), &utf8(backups.path())).await;
        assert!(backups.path().join("Valheim Server").is_dir());
    }
}
