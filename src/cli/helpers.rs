//! Shared command plumbing: portal discovery, store opening, id lookup

use std::sync::Arc;

use miette::{IntoDiagnostic, Result};

use crate::core::category::Category;
use crate::core::config::Config;
use crate::core::portal::Portal;
use crate::core::request::RequestId;
use crate::core::store::RequestStore;

/// Everything a command needs to touch the portal
pub struct Desk {
    pub portal: Portal,
    pub config: Config,
    pub store: RequestStore,
}

/// Discover the portal from the working directory and open its store
pub fn open_desk() -> Result<Desk> {
    let portal = Portal::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load(&portal);
    let registry = config
        .registry()
        .map_err(|e| miette::miette!("Invalid category override: {}", e))?;
    let store = RequestStore::open(&portal.db_path(), Arc::new(registry))
        .map_err(|e| miette::miette!("{}", e))?;
    Ok(Desk {
        portal,
        config,
        store,
    })
}

/// Resolve a user-supplied reference (full id or unique prefix)
pub fn resolve_request(desk: &Desk, reference: &str) -> Result<RequestId> {
    desk.store
        .resolve_ref(reference)
        .map_err(|e| miette::miette!("{}", e))
}

/// Parse a category argument, listing the valid names on failure
pub fn parse_category(s: &str) -> Result<Category> {
    s.parse::<Category>().map_err(|e| {
        let names: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
        miette::miette!("{}. Valid categories: {}", e, names.join(", "))
    })
}

/// Write bytes to disk, creating parent directories as needed
pub fn write_output(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    std::fs::write(path, bytes).into_diagnostic()
}
