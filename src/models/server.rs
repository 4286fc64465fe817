use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// One installed server found during a discovery pass.
///
/// Built fresh on every pass and never mutated afterwards; a new pass
/// produces a new list wholesale. A pass contains at most one record per
/// distinct app id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredServer {
    /// Display name from the catalog
    pub name: String,

    /// Steam app id
    pub app_id: u32,

    /// Absolute path to the install directory. When the manifest exists but
    /// the library's `common` directory could not be listed, this is the
    /// `common` directory itself (install still in progress).
    pub install_path: Utf8PathBuf,

    /// Whether the server executable is currently running
    pub is_running: bool,

    /// Steam CDN header image URL, when the CDN reports one exists
    pub cover_art: Option<String>,
}
