//! Services module - the Steam discovery and management core.
//!
//! Everything the external GUI/IPC shell calls lives here, as
//! **framework-agnostic** async functions with no UI dependencies:
//!
//! - [`steam_paths`]: locating the Steam root per platform (registry query
//!   with fallbacks on Windows, conventional home paths elsewhere) and
//!   enumerating storage volumes.
//! - [`library`]: tolerant extraction from `libraryfolders.vdf` and
//!   `appmanifest_*.acf` — targeted token matching, deliberately not a full
//!   VDF parser.
//! - [`discovery`]: the installed-server matcher crossing the static catalog
//!   with every library root, deduplicated by app id.
//! - [`process`]: liveness checks plus launch/stop by image name.
//! - [`cover_art`]: best-effort header-image lookup against the Steam CDN.
//! - [`backup`]: timestamped save archives via the platform archiver.
//!
//! # Failure philosophy
//!
//! Absence is the dominant case and is never an error: a missing file,
//! directory, registry key or process folds into `None`/`false`/skip. Only
//! operations the operator explicitly requested (launch, stop, config
//! editing) surface real errors.

pub mod backup;
pub mod cover_art;
pub mod discovery;
pub mod library;
pub mod process;
pub mod steam_paths;

pub use backup::backup_server_save;
pub use cover_art::fetch_cover_art;
pub use discovery::find_installed_servers;
pub use library::{get_server_build_id, parse_library_folders};
pub use process::{is_process_running, launch_server, stop_server};
pub use steam_paths::{get_common_steam_paths, list_available_drives, resolve_steam_root};
