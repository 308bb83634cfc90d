//! Portal configuration
//!
//! YAML file under `.hrsd/`. Everything has a sensible default, so a
//! freshly-initialized portal works with no config at all. Category
//! overrides let a company tune assignee teams and SLA budgets without
//! rebuilding; the resulting registry is still the closed built-in set.

use std::collections::HashMap;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::core::category::{default_table, Category, CategoryRegistry};
use crate::core::portal::Portal;

/// Per-category override; unset fields keep the built-in values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_hours: Option<i64>,
}

/// Chat relay settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model id to request; env `GROQ_MODEL_ID` still wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shown in listings and reports
    pub company_name: String,

    /// Actor recorded on mutations when --actor is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_actor: Option<String>,

    /// Routing-table overrides keyed by category name
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub categories: HashMap<String, CategoryOverride>,

    pub chat: ChatConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company_name: "My Company".to_string(),
            default_actor: None,
            categories: HashMap::new(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Load the portal's config, falling back to defaults when the file
    /// is missing or unreadable
    pub fn load(portal: &Portal) -> Self {
        let path = portal.config_path();
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(config) = serde_yml::from_str(&contents) {
                return config;
            }
        }
        Self::default()
    }

    pub fn save(&self, portal: &Portal) -> std::io::Result<()> {
        let contents = serde_yml::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(portal.config_path(), contents)
    }

    /// Build the category registry: built-in table plus overrides
    ///
    /// Fails on an override key that names no known category, so a typo
    /// in the config surfaces instead of silently routing to defaults.
    pub fn registry(&self) -> Result<CategoryRegistry, String> {
        let mut table = default_table();
        for (key, over) in &self.categories {
            let category: Category = key.parse()?;
            let entry = table
                .get_mut(&category)
                .expect("built-in table covers every category");
            if let Some(ref assignee) = over.assignee {
                entry.assignee = assignee.clone();
            }
            if let Some(sla_hours) = over.sla_hours {
                if sla_hours < 0 {
                    return Err(format!(
                        "sla_hours for '{}' must not be negative",
                        category
                    ));
                }
                entry.sla_hours = sla_hours;
            }
        }
        Ok(CategoryRegistry::new(table))
    }

    /// Resolve the actor name: explicit flag, then config, then $USER
    pub fn actor(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.default_actor.clone())
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
