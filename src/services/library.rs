//! Tolerant extraction from Valve's library and manifest descriptors.
//!
//! This is deliberately not a VDF parser. Only two token shapes are ever
//! needed — `"path" "<value>"` pairs from `libraryfolders.vdf` and the
//! `"buildid" "<digits>"` pair from an app manifest — and both appear
//! identically in the legacy flat dialect and the modern nested one, so
//! targeted regex extraction covers every file Steam has ever written here.

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::LazyLock;

/// Matches `"path"    "<value>"` token pairs in libraryfolders.vdf
static LIBRARY_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""path"\s+"([^"]+)""#).expect("Invalid library path regex"));

/// Matches the `"buildid"    "<digits>"` token pair in an app manifest
static BUILD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"buildid"\s+"(\d+)""#).expect("Invalid buildid regex"));

/// All library roots reachable from a Steam install.
///
/// The install's own `steamapps` directory always comes first, whether or not
/// `libraryfolders.vdf` exists or parses — a missing descriptor is the normal
/// state of a default-location install, not an error. Additional roots keep
/// their order of appearance and are not deduplicated here; discovery dedups
/// at the server level.
pub async fn parse_library_folders(steam_root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut roots = vec![steam_root.join("steamapps")];

    let descriptor = steam_root.join("steamapps").join("libraryfolders.vdf");
    match tokio::fs::read_to_string(&descriptor).await {
        Ok(content) => {
            for path in extract_library_paths(&content) {
                roots.push(Utf8PathBuf::from(path).join("steamapps"));
            }
        }
        Err(e) => {
            tracing::debug!("No readable library descriptor at {}: {}", descriptor, e);
        }
    }

    tracing::debug!("Library roots: {:?}", roots);
    roots
}

/// The installed build id recorded in `appmanifest_<appId>.acf`.
///
/// Returns the captured digit string. An unreadable manifest and a manifest
/// without a buildid token are the same outcome: `None`.
pub async fn get_server_build_id(app_id: u32, library_root: &Utf8Path) -> Option<String> {
    let manifest = library_root.join(format!("appmanifest_{}.acf", app_id));

    let content = match tokio::fs::read_to_string(&manifest).await {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Could not read manifest for app {}: {}", app_id, e);
            return None;
        }
    };

    match extract_build_id(&content) {
        Some(build_id) => {
            tracing::info!("App {} current buildid: {}", app_id, build_id);
            Some(build_id)
        }
        None => {
            tracing::warn!("No buildid token in manifest for app {}", app_id);
            None
        }
    }
}

/// Every non-empty `"path"` value in a library descriptor, in order of
/// appearance, duplicates included.
pub fn extract_library_paths(content: &str) -> Vec<String> {
    LIBRARY_PATH
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .filter(|path| !path.is_empty())
        .collect()
}

/// The buildid digit string from manifest text, if present.
pub fn extract_build_id(content: &str) -> Option<String> {
    BUILD_ID.captures(content).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_DIALECT: &str = r#"
"libraryfolders"
{
    "0"
    {
        "path"        "C:\\Program Files (x86)\\Steam"
        "label"        ""
    }
    "1"
    {
        "path"        "D:\\Games\\Steam"
    }
}
"#;

    const FLAT_DIALECT: &str = r#"
"LibraryFolders"
{
    "TimeNextStatsReport"    "123"
    "1"    "E:\\MoreSteam"
    "path"    "E:\\MoreSteam"
}
"#;

    #[test]
    fn test_extract_paths_nested_dialect() {
        let paths = extract_library_paths(NESTED_DIALECT);
        assert_eq!(
            paths,
            vec![r"C:\\Program Files (x86)\\Steam", r"D:\\Games\\Steam"]
        );
    }

    #[test]
    fn test_extract_paths_flat_dialect() {
        let paths = extract_library_paths(FLAT_DIALECT);
        assert_eq!(paths, vec![r"E:\\MoreSteam"]);
    }

    #[test]
    fn test_extract_paths_preserves_duplicates() {
        let content = "\"path\" \"/a\"\n\"path\" \"/a\"\n\"path\" \"/b\"";
        assert_eq!(extract_library_paths(content), vec!["/a", "/a", "/b"]);
    }

    #[test]
    fn test_extract_build_id() {
        let manifest = "\"AppState\"\n{\n\t\"appid\"\t\t\"892970\"\n\t\"buildid\"\t\t\"123456\"\n}";
        assert_eq!(extract_build_id(manifest), Some("123456".to_string()));
    }

    #[test]
    fn test_extract_build_id_case_insensitive() {
        assert_eq!(
            extract_build_id("\"BuildID\" \"42\""),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_extract_build_id_absent() {
        assert_eq!(extract_build_id("\"appid\" \"892970\""), None);
        assert_eq!(extract_build_id("\"buildid\" \"notdigits\""), None);
    }
}
