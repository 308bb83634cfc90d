//! Routing engine - initial assignee and due date for a request
//!
//! Deterministic by design: the same category and the same timestamp
//! always produce the same routing. There is no load balancing or
//! randomness; this is a fixed-table policy, not a scheduler.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::category::{Category, CategoryRegistry, UnknownCategory};

/// Result of routing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub assignee: String,
    pub due_at: DateTime<Utc>,
}

/// Routing engine over an injected category registry
pub struct Router {
    registry: Arc<CategoryRegistry>,
}

impl Router {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    /// Compute assignee and due date for a request created at `created_at`
    ///
    /// Pure: persisting the result is the caller's responsibility.
    pub fn route(
        &self,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Result<Routing, UnknownCategory> {
        let info = self.registry.resolve(category)?;
        Ok(Routing {
            due_at: created_at + info.sla(),
            assignee: info.assignee,
        })
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn router() -> Router {
        Router::new(Arc::new(CategoryRegistry::with_defaults()))
    }

    #[test]
    fn test_route_is_deterministic() {
        let router = router();
        let now = Utc::now();

        let a = router.route(Category::ItRequests, now).unwrap();
        let b = router.route(Category::ItRequests, now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_due_at_is_created_plus_sla() {
        let router = router();
        let now = Utc::now();

        let routed = router.route(Category::ItRequests, now).unwrap();
        assert_eq!(routed.assignee, "IT Support");
        assert_eq!(routed.due_at, now + Duration::hours(24));

        let routed = router.route(Category::HealthInsurance, now).unwrap();
        assert_eq!(routed.assignee, "Benefits Team");
        assert_eq!(routed.due_at, now + Duration::hours(72));
    }

    #[test]
    fn test_due_at_never_precedes_created_at() {
        let router = router();
        let now = Utc::now();
        for category in Category::ALL {
            let routed = router.route(category, now).unwrap();
            assert!(routed.due_at >= now, "{} violated due_at >= created_at", category);
        }
    }

    #[test]
    fn test_registry_miss_propagates() {
        let mut table = crate::core::category::default_table();
        table.remove(&Category::CardServices);
        let router = Router::new(Arc::new(CategoryRegistry::new(table)));

        assert!(router.route(Category::CardServices, Utc::now()).is_err());
    }
}
