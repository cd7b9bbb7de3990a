//! # zstack-paths
//!
//! File location for a volumetric (z-stack) imaging pipeline.
//!
//! ## Pipeline
//!
//! ```text
//! ScanKey
//!     │
//!     ├──> Session lookup (externally-owned table)
//!     │      └─> relative session directory
//!     │
//!     ├──> Root resolution (ordered candidate roots from config)
//!     │      └─> absolute session directory
//!     │
//!     └──> Recursive glob (*.tif)
//!            └─> first raw acquisition file
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use zstack_paths::{Config, InMemorySessionDirectories, ScanKey, VolumeFileLocator};
//!
//! fn main() -> zstack_paths::Result<()> {
//!     let config = Config::load_with_env("dj_local_conf.json")?;
//!
//!     let mut sessions = InMemorySessionDirectories::new();
//!     sessions.insert("subject1", 0, "sub1");
//!
//!     let locator = VolumeFileLocator::new(config, sessions);
//!     let tiff = locator.volume_tif_file(&ScanKey::new("subject1", 0, 0))?;
//!     println!("raw stack: {}", tiff.display());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod locator;
mod session;

pub use config::{Config, CustomConfig, DEFAULT_CONFIG_FILE};
pub use error::{PathsError, Result};
pub use locator::{find_files, find_full_path, VolumeFileLocator, TIFF_PATTERN};
pub use session::{InMemorySessionDirectories, ScanKey, SessionDirectorySource};
