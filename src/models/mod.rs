//! Data models shared between the core services and the external shell.
//!
//! Currently a single record type:
//! - [`DiscoveredServer`]: one installed server found during a discovery pass,
//!   serializable so the GUI/IPC layer can hand it across the process boundary
//!   unchanged.

pub mod server;

pub use server::DiscoveredServer;
