//! Portal directory - where a service desk keeps its state
//!
//! A portal is any directory containing a `.hrsd/` marker with the
//! configuration file, the request database, and the uploads area.
//! Commands discover the portal by walking up from the working
//! directory, the same way version-control tools find their root.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Marker directory at the portal root
pub const PORTAL_DIR: &str = ".hrsd";

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Not inside a portal (no {PORTAL_DIR} directory found). Run 'hrsd init' first")]
    NotFound,

    #[error("Portal already initialized at {}", .path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a portal root directory
#[derive(Debug, Clone)]
pub struct Portal {
    root: PathBuf,
}

impl Portal {
    /// Initialize a new portal at the given directory
    pub fn init(path: &Path) -> Result<Self, PortalError> {
        let marker = path.join(PORTAL_DIR);
        if marker.exists() {
            return Err(PortalError::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        fs::create_dir_all(&marker)?;
        let portal = Self {
            root: path.to_path_buf(),
        };
        fs::create_dir_all(portal.uploads_dir())?;
        Ok(portal)
    }

    /// Find the portal containing the current working directory
    pub fn discover() -> Result<Self, PortalError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Find the portal containing `start`, walking up toward the root
    pub fn discover_from(start: &Path) -> Result<Self, PortalError> {
        let mut dir = start;
        loop {
            if dir.join(PORTAL_DIR).is_dir() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return Err(PortalError::NotFound),
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(PORTAL_DIR).join("config.yaml")
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(PORTAL_DIR).join("requests.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(PORTAL_DIR).join("uploads")
    }
}
