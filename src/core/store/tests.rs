//! Unit tests for the request store

use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};

use super::*;
use crate::core::category::default_table;

fn store() -> RequestStore {
    RequestStore::open_in_memory(Arc::new(CategoryRegistry::with_defaults())).unwrap()
}

fn draft(category: Category) -> RequestDraft {
    RequestDraft {
        category,
        summary: "Salary certificate".to_string(),
        details: "Needed for a bank application".to_string(),
        employee_id: "E-1042".to_string(),
        employee_name: "Amal Hassan".to_string(),
        department: "Finance".to_string(),
    }
}

#[test]
fn test_create_routes_and_persists() {
    let store = store();
    let t0 = Utc::now();

    let req = store.create_at(draft(Category::ItRequests), t0).unwrap();
    assert_eq!(req.status, Status::Submitted);
    assert_eq!(req.assignee, "IT Support");
    assert_eq!(req.due_at, t0 + Duration::hours(24));
    assert_eq!(req.revision, 1);
    assert!(req.completed_at.is_none());

    let fetched = store.get(&req.id).unwrap();
    assert_eq!(fetched.summary, "Salary certificate");
    assert_eq!(fetched.employee_name, "Amal Hassan");
    assert_eq!(to_millis(fetched.due_at), to_millis(req.due_at));
}

#[test]
fn test_create_rejects_missing_fields() {
    let store = store();

    let mut d = draft(Category::OtherHrSupport);
    d.summary = "  ".to_string();
    assert!(matches!(
        store.create(d).unwrap_err(),
        StoreError::Validation { .. }
    ));

    let mut d = draft(Category::OtherHrSupport);
    d.employee_name = String::new();
    assert!(matches!(
        store.create(d).unwrap_err(),
        StoreError::Validation { .. }
    ));
}

#[test]
fn test_create_fails_on_registry_miss() {
    let mut table = default_table();
    table.remove(&Category::CardServices);
    let store = RequestStore::open_in_memory(Arc::new(CategoryRegistry::new(table))).unwrap();

    assert!(matches!(
        store.create(draft(Category::CardServices)).unwrap_err(),
        StoreError::UnknownCategory(_)
    ));
}

#[test]
fn test_get_unknown_id_fails() {
    let store = store();
    let id = RequestId::new();
    assert!(matches!(
        store.get(&id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn test_full_lifecycle_with_audit() {
    let store = store();
    let t0 = Utc::now();
    let req = store.create_at(draft(Category::ItRequests), t0).unwrap();
    let due = req.due_at;

    let req = store
        .update_status(&req.id, Status::UnderReview, "reviewer")
        .unwrap();
    assert_eq!(req.status, Status::UnderReview);
    assert_eq!(store.audit(&req.id).unwrap().len(), 1);

    // Direct jump to completed is not an edge
    let err = store
        .update_status(&req.id, Status::Completed, "reviewer")
        .unwrap_err();
    assert!(matches!(err, StoreError::Transition(_)));

    let req = store
        .update_status(&req.id, Status::Processing, "agent")
        .unwrap();
    let req = store
        .update_status(&req.id, Status::Completed, "agent")
        .unwrap();

    assert_eq!(req.status, Status::Completed);
    assert!(req.completed_at.is_some());
    // SLA deadline untouched by transitions
    assert_eq!(to_millis(req.due_at), to_millis(due));

    let audit = store.audit(&req.id).unwrap();
    assert_eq!(audit.len(), 3);
    assert_eq!(audit[0].old_status, Status::Submitted);
    assert_eq!(audit[0].new_status, Status::UnderReview);
    assert_eq!(audit[2].new_status, Status::Completed);
    assert_eq!(audit[2].actor, "agent");
    // Chronological order preserved
    assert!(audit.windows(2).all(|w| w[0].at <= w[1].at));
}

#[test]
fn test_same_status_transition_fails() {
    let store = store();
    let req = store.create(draft(Category::ItRequests)).unwrap();

    let err = store
        .update_status(&req.id, Status::Submitted, "agent")
        .unwrap_err();
    assert!(matches!(err, StoreError::Transition(_)));
    // The failed attempt leaves no audit entry
    assert!(store.audit(&req.id).unwrap().is_empty());
}

#[test]
fn test_completed_at_iff_completed() {
    let store = store();
    let req = store.create(draft(Category::ItRequests)).unwrap();
    assert!(req.completed_at.is_none());

    let req = store
        .update_status(&req.id, Status::UnderReview, "a")
        .unwrap();
    assert!(req.completed_at.is_none());

    // Bounce back and forth; still no completion time
    let req = store
        .update_status(&req.id, Status::Submitted, "a")
        .unwrap();
    assert!(req.completed_at.is_none());

    store
        .update_status(&req.id, Status::UnderReview, "a")
        .unwrap();
    store
        .update_status(&req.id, Status::Processing, "a")
        .unwrap();
    let req = store
        .update_status(&req.id, Status::Completed, "a")
        .unwrap();
    assert!(req.completed_at.is_some());
}

#[test]
fn test_reassign_keeps_due_date() {
    let store = store();
    let req = store.create(draft(Category::HealthInsurance)).unwrap();
    let due = req.due_at;

    let req = store.reassign(&req.id, "Benefits Tier 2", "lead").unwrap();
    assert_eq!(req.assignee, "Benefits Tier 2");
    assert_eq!(to_millis(req.due_at), to_millis(due));

    let audit = store.audit(&req.id).unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, AuditAction::Reassign);
    assert_eq!(
        audit[0].note.as_deref(),
        Some("Benefits Team -> Benefits Tier 2")
    );
}

#[test]
fn test_reassign_rejects_empty_assignee() {
    let store = store();
    let req = store.create(draft(Category::ItRequests)).unwrap();
    assert!(matches!(
        store.reassign(&req.id, "  ", "lead").unwrap_err(),
        StoreError::Validation { .. }
    ));
}

#[test]
fn test_recategorize_recomputes_due_from_created_at() {
    let store = store();
    let t0 = Utc::now() - Duration::hours(10);
    let req = store.create_at(draft(Category::ItRequests), t0).unwrap();
    assert_eq!(req.due_at, t0 + Duration::hours(24));

    let req = store
        .recategorize(&req.id, Category::HealthInsurance, "triage")
        .unwrap();
    assert_eq!(req.category, Category::HealthInsurance);
    // Anchored to intake time, not the recategorization time
    assert_eq!(to_millis(req.due_at), to_millis(t0 + Duration::hours(72)));
    assert!(req.due_at >= req.created_at);
    // Assignee changes only through reassign
    assert_eq!(req.assignee, "IT Support");

    let audit = store.audit(&req.id).unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, AuditAction::Recategorize);
    assert_eq!(
        audit[0].note.as_deref(),
        Some("it-requests -> health-insurance")
    );
}

#[test]
fn test_list_filters() {
    let store = store();
    let a = store.create(draft(Category::ItRequests)).unwrap();
    let b = store.create(draft(Category::HealthInsurance)).unwrap();
    store
        .update_status(&b.id, Status::UnderReview, "agent")
        .unwrap();

    let all = store.list(&RequestFilter::default()).unwrap();
    assert_eq!(all.len(), 2);

    let submitted = store
        .list(&RequestFilter {
            status: Some(Status::Submitted),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, a.id);

    let it = store
        .list(&RequestFilter {
            category: Some(Category::ItRequests),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(it.len(), 1);

    let benefits = store
        .list(&RequestFilter {
            assignee: Some("Benefits Team".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(benefits.len(), 1);
    assert_eq!(benefits[0].id, b.id);
}

#[test]
fn test_list_order_is_stable() {
    let store = store();
    for _ in 0..5 {
        store.create(draft(Category::OtherHrSupport)).unwrap();
    }
    let first = store.list(&RequestFilter::default()).unwrap();
    let second = store.list(&RequestFilter::default()).unwrap();
    let ids = |v: &[Request]| v.iter().map(|r| r.id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_overdue_boundaries() {
    let store = store();
    let t0 = Utc::now();
    let req = store.create_at(draft(Category::ItRequests), t0).unwrap();
    let due = req.due_at;

    // Before any due date: empty
    assert!(store.overdue(t0).unwrap().is_empty());
    assert!(store.overdue(due).unwrap().is_empty());

    // Past the due date: included
    let late = due + Duration::minutes(1);
    let overdue = store.overdue(late).unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, req.id);

    // Completed requests are excluded regardless of as_of
    store
        .update_status(&req.id, Status::UnderReview, "a")
        .unwrap();
    store
        .update_status(&req.id, Status::Processing, "a")
        .unwrap();
    store
        .update_status(&req.id, Status::Completed, "a")
        .unwrap();
    assert!(store.overdue(late).unwrap().is_empty());
}

#[test]
fn test_overdue_only_filter() {
    let store = store();
    let t0 = Utc::now() - Duration::hours(100);
    store.create_at(draft(Category::ItRequests), t0).unwrap();
    store.create(draft(Category::ItRequests)).unwrap();

    let overdue = store
        .list(&RequestFilter {
            overdue_only: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(overdue.len(), 1);
}

#[test]
fn test_attachments_ordered() {
    let store = store();
    let req = store.create(draft(Category::DocumentsAndLetters)).unwrap();

    store.add_attachment(&req.id, "ref-aaa", "scan.pdf").unwrap();
    let req = store.add_attachment(&req.id, "ref-bbb", "photo.jpg").unwrap();

    assert_eq!(req.attachments.len(), 2);
    assert_eq!(req.attachments[0].blob_ref, "ref-aaa");
    assert_eq!(req.attachments[0].filename, "scan.pdf");
    assert_eq!(req.attachments[1].blob_ref, "ref-bbb");
}

#[test]
fn test_resolve_ref_exact_prefix_ambiguous() {
    let store = store();
    let a = store.create(draft(Category::ItRequests)).unwrap();
    store.create(draft(Category::ItRequests)).unwrap();

    // Exact
    assert_eq!(store.resolve_ref(a.id.as_str()).unwrap(), a.id);
    // Unique prefix (ULIDs share a timestamp prefix, so use most of the id)
    let prefix = &a.id.as_str()[..a.id.as_str().len() - 2];
    assert_eq!(store.resolve_ref(prefix).unwrap(), a.id);
    // Shared prefix is ambiguous
    assert!(matches!(
        store.resolve_ref("REQ-").unwrap_err(),
        StoreError::Validation { .. }
    ));
    // No match
    assert!(matches!(
        store.resolve_ref("REQ-7ZZZZZZZZZ").unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn test_concurrent_transitions_single_winner() {
    let store = Arc::new(store());
    let req = store.create(draft(Category::ItRequests)).unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        let id = req.id.clone();
        handles.push(thread::spawn(move || {
            store.update_status(&id, Status::UnderReview, "racer")
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(updated) => {
                wins += 1;
                assert_eq!(updated.status, Status::UnderReview);
            }
            Err(StoreError::Transition(_)) | Err(StoreError::Conflict { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    let final_state = store.get(&req.id).unwrap();
    assert_eq!(final_state.status, Status::UnderReview);
    assert_eq!(store.audit(&req.id).unwrap().len(), 1);
}
