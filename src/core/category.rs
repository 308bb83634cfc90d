//! Category registry - the closed classification that drives routing
//!
//! Each category maps to a default assignee team and an SLA duration.
//! The registry is an explicit object handed to the router at startup,
//! and reloads swap the whole table atomically so readers never observe
//! a partially-updated mapping.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum Category {
    DocumentsAndLetters,
    PersonalDataUpdates,
    AttendanceAndSchedule,
    ItRequests,
    CardServices,
    HealthInsurance,
    #[default]
    OtherHrSupport,
}

impl Category {
    /// All categories, in intake-form order
    pub const ALL: [Category; 7] = [
        Category::DocumentsAndLetters,
        Category::PersonalDataUpdates,
        Category::AttendanceAndSchedule,
        Category::ItRequests,
        Category::CardServices,
        Category::HealthInsurance,
        Category::OtherHrSupport,
    ];

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            Category::DocumentsAndLetters => "Documents & Letters",
            Category::PersonalDataUpdates => "Personal Data Updates",
            Category::AttendanceAndSchedule => "Attendance & Schedule",
            Category::ItRequests => "IT Requests",
            Category::CardServices => "Card Issue / Replacement",
            Category::HealthInsurance => "Health Insurance",
            Category::OtherHrSupport => "Other HR Support",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::DocumentsAndLetters => write!(f, "documents-and-letters"),
            Category::PersonalDataUpdates => write!(f, "personal-data-updates"),
            Category::AttendanceAndSchedule => write!(f, "attendance-and-schedule"),
            Category::ItRequests => write!(f, "it-requests"),
            Category::CardServices => write!(f, "card-services"),
            Category::HealthInsurance => write!(f, "health-insurance"),
            Category::OtherHrSupport => write!(f, "other-hr-support"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "documents-and-letters" | "documents" => Ok(Category::DocumentsAndLetters),
            "personal-data-updates" | "personal-data" => Ok(Category::PersonalDataUpdates),
            "attendance-and-schedule" | "attendance" => Ok(Category::AttendanceAndSchedule),
            "it-requests" | "it" => Ok(Category::ItRequests),
            "card-services" | "card" => Ok(Category::CardServices),
            "health-insurance" | "insurance" => Ok(Category::HealthInsurance),
            "other-hr-support" | "other" => Ok(Category::OtherHrSupport),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Routing data for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Default owning team for new requests in this category
    pub assignee: String,
    /// SLA budget in hours, added to creation time to get the due date
    pub sla_hours: i64,
}

impl CategoryInfo {
    pub fn sla(&self) -> Duration {
        Duration::hours(self.sla_hours)
    }
}

/// Registry lookup failed for a category absent from the loaded table
#[derive(Debug, Error)]
#[error("No routing entry for category '{category}'")]
pub struct UnknownCategory {
    pub category: String,
}

/// Immutable category table with atomic whole-table reload
pub struct CategoryRegistry {
    table: RwLock<Arc<HashMap<Category, CategoryInfo>>>,
}

impl CategoryRegistry {
    /// Build a registry from an explicit table
    pub fn new(table: HashMap<Category, CategoryInfo>) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Registry with the standard shared-services routing table
    pub fn with_defaults() -> Self {
        Self::new(default_table())
    }

    /// Resolve a category to its routing data
    pub fn resolve(&self, category: Category) -> Result<CategoryInfo, UnknownCategory> {
        let table = self.table.read().expect("registry lock poisoned");
        table
            .get(&category)
            .cloned()
            .ok_or_else(|| UnknownCategory {
                category: category.to_string(),
            })
    }

    /// Replace the whole table in one swap
    pub fn reload(&self, table: HashMap<Category, CategoryInfo>) {
        let mut guard = self.table.write().expect("registry lock poisoned");
        *guard = Arc::new(table);
    }

    /// Snapshot of the current table
    pub fn snapshot(&self) -> Arc<HashMap<Category, CategoryInfo>> {
        Arc::clone(&self.table.read().expect("registry lock poisoned"))
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The built-in routing table
pub fn default_table() -> HashMap<Category, CategoryInfo> {
    let entries = [
        (Category::DocumentsAndLetters, "HRSS-Docs Team", 48),
        (Category::PersonalDataUpdates, "HRSS-Personnel Team", 72),
        (Category::AttendanceAndSchedule, "HRSS-Attendance Team", 48),
        (Category::ItRequests, "IT Support", 24),
        (Category::CardServices, "Admin Services", 48),
        (Category::HealthInsurance, "Benefits Team", 72),
        (Category::OtherHrSupport, "HRSS-General", 72),
    ];

    entries
        .into_iter()
        .map(|(category, assignee, sla_hours)| {
            (
                category,
                CategoryInfo {
                    assignee: assignee.to_string(),
                    sla_hours,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_category() {
        let registry = CategoryRegistry::with_defaults();
        for category in Category::ALL {
            registry.resolve(category).unwrap();
        }
    }

    #[test]
    fn test_default_routing_entries() {
        let registry = CategoryRegistry::with_defaults();

        let it = registry.resolve(Category::ItRequests).unwrap();
        assert_eq!(it.assignee, "IT Support");
        assert_eq!(it.sla_hours, 24);

        let docs = registry.resolve(Category::DocumentsAndLetters).unwrap();
        assert_eq!(docs.assignee, "HRSS-Docs Team");
        assert_eq!(docs.sla_hours, 48);
    }

    #[test]
    fn test_resolve_missing_entry_fails() {
        let mut table = default_table();
        table.remove(&Category::HealthInsurance);
        let registry = CategoryRegistry::new(table);

        let err = registry.resolve(Category::HealthInsurance).unwrap_err();
        assert!(err.to_string().contains("health-insurance"));
    }

    #[test]
    fn test_reload_swaps_whole_table() {
        let registry = CategoryRegistry::with_defaults();

        let mut table = default_table();
        table.insert(
            Category::ItRequests,
            CategoryInfo {
                assignee: "IT Tier 2".to_string(),
                sla_hours: 8,
            },
        );
        registry.reload(table);

        let it = registry.resolve(Category::ItRequests).unwrap();
        assert_eq!(it.assignee, "IT Tier 2");
        assert_eq!(it.sla_hours, 8);
        // Untouched entries survive the swap
        assert_eq!(
            registry.resolve(Category::CardServices).unwrap().assignee,
            "Admin Services"
        );
    }

    #[test]
    fn test_category_parse_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(category, parsed);
        }
        assert_eq!("it".parse::<Category>().unwrap(), Category::ItRequests);
        assert!("payroll-magic".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Category::ItRequests).unwrap(),
            "\"it-requests\""
        );
        assert_eq!(
            serde_json::from_str::<Category>("\"health-insurance\"").unwrap(),
            Category::HealthInsurance
        );
    }
}
