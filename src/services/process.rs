//! Process liveness checks and server lifecycle (launch/stop).
//!
//! Liveness is a heuristic, not an exact match. The Windows branch checks
//! whether `tasklist` output contains the executable file name as a
//! substring; the Unix branch uses `pgrep -f`, which also matches on
//! command-line substrings. Both kinds of looseness are deliberate and load
//! bearing for servers launched through wrappers.

use crate::catalog::catalog_entry;
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Command;

/// Whether a process with the given executable name is currently running.
///
/// Synchronous by contract; internal failures (missing utility, bad exit)
/// yield `false`, never an error.
pub fn is_process_running(executable_name: &str) -> bool {
    if cfg!(target_os = "windows") {
        let exe_name = file_name_of(executable_name);
        let output = match Command::new("tasklist")
            .args(["/FI", &format!("IMAGENAME eq {}", exe_name)])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("tasklist failed for {}: {}", exe_name, e);
                return false;
            }
        };

        let running =
            tasklist_output_indicates_running(&String::from_utf8_lossy(&output.stdout), &exe_name);
        tracing::debug!(
            "Process check for {}: {}",
            exe_name,
            if running { "RUNNING" } else { "NOT FOUND" }
        );
        running
    } else {
        let running = Command::new("pgrep")
            .args(["-f", executable_name])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);
        tracing::debug!(
            "Process check for {}: {}",
            executable_name,
            if running { "RUNNING" } else { "NOT FOUND" }
        );
        running
    }
}

/// The containment policy behind the Windows liveness check: the filtered
/// task list mentions the image name somewhere in its output.
pub fn tasklist_output_indicates_running(output: &str, exe_name: &str) -> bool {
    output.contains(exe_name)
}

/// Launch a server executable detached from this process.
///
/// Unlike discovery, a missing catalog entry or executable here is a real
/// error the caller must see: the operator explicitly asked for this server
/// to start.
pub async fn launch_server(app_id: u32, install_path: &Utf8Path) -> Result<()> {
    let entry = catalog_entry(app_id)
        .with_context(|| format!("Unknown server app ID: {}", app_id))?;

    if tokio::fs::metadata(install_path).await.is_err() {
        bail!("Install directory not found: {}", install_path);
    }

    let exe_path = install_path.join(entry.executable_name);
    if tokio::fs::metadata(&exe_path).await.is_err() {
        bail!("Server executable not found: {}", exe_path);
    }

    tracing::info!("Launching {} from {}", entry.executable_name, install_path);

    tokio::process::Command::new(exe_path.as_std_path())
        .current_dir(install_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {}", exe_path))?;

    Ok(())
}

/// Stop a running server by image name, best-effort.
///
/// The kill command failing (typically: process not found) is success; only
/// an unknown app id is an error.
pub async fn stop_server(app_id: u32) -> Result<()> {
    let entry = catalog_entry(app_id)
        .with_context(|| format!("Unknown server app ID: {}", app_id))?;

    let stem = file_stem_of(entry.executable_name);

    let status = if cfg!(target_os = "windows") {
        Command::new("taskkill")
            .args(["/F", "/IM", &format!("{}.exe", stem)])
            .status()
    } else {
        Command::new("pkill").args(["-f", &stem]).status()
    };

    match status {
        Ok(status) => {
            tracing::info!("Stop command for app {} exited with {}", app_id, status);
        }
        Err(e) => {
            tracing::warn!("Stop command for app {} could not run: {}", app_id, e);
        }
    }

    Ok(())
}

fn file_name_of(name: &str) -> String {
    Utf8PathBuf::from(name)
        .file_name()
        .unwrap_or(name)
        .to_string()
}

fn file_stem_of(name: &str) -> String {
    Utf8PathBuf::from(name)
        .file_stem()
        .unwrap_or(name)
        .to_string()
}
