mod common;

use clubhours::core::notify::NullNotifier;
use clubhours::core::workflow::{DraftPatch, WorkflowEngine};
use clubhours::db::{audit_sink, entry_store, messages};
use clubhours::errors::AppError;
use clubhours::models::message::MessageKind;
use clubhours::models::status::EntryStatus;
use clubhours::models::user::Capability;
use common::{open_pool, reload, seed_actor, seed_draft, seed_draft_for, setup_test_db};

#[test]
fn test_submit_bumps_version_and_writes_one_audit_row() {
    let db = setup_test_db("wf_submit");
    let mut pool = open_pool(&db);
    let member = seed_actor(&pool, "Alice", &[Capability::Member]);

    let entry = seed_draft(&mut pool, &member, "2026-08-01", 4.5);
    assert_eq!(entry.version, 1);
    assert_eq!(
        audit_sink::count_for_entry(&pool.conn, &entry.entry_number).unwrap(),
        1 // the "created" row
    );

    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let updated = engine.submit(&mut pool, &entry, &member).unwrap();

    assert_eq!(updated.status, EntryStatus::Submitted);
    assert_eq!(updated.version, 2);
    assert!(updated.submitted_at.is_some());
    assert_eq!(
        audit_sink::count_for_entry(&pool.conn, &entry.entry_number).unwrap(),
        2
    );

    let trail = audit_sink::list(&pool.conn, Some(&entry.entry_number)).unwrap();
    let last = trail.last().unwrap();
    assert_eq!(last.action, "status_change");
    assert!(last.after_state.as_ref().unwrap().contains("submitted"));
}

#[test]
fn test_invalid_transition_leaves_entry_untouched() {
    let db = setup_test_db("wf_invalid_transition");
    let mut pool = open_pool(&db);
    let member = seed_actor(&pool, "Alice", &[Capability::Member]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    // Approving a draft skips the submitted state entirely.
    let entry = seed_draft(&mut pool, &member, "2026-08-01", 2.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let err = engine.approve(&mut pool, &entry, &reviewer).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let fresh = reload(&pool, entry.id);
    assert_eq!(fresh.status, EntryStatus::Draft);
    assert_eq!(fresh.version, 1);
    assert_eq!(
        audit_sink::count_for_entry(&pool.conn, &entry.entry_number).unwrap(),
        1
    );
}

#[test]
fn test_approved_and_rejected_are_terminal() {
    let db = setup_test_db("wf_terminal");
    let mut pool = open_pool(&db);
    let member = seed_actor(&pool, "Alice", &[Capability::Member]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &member, "2026-08-01", 2.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let entry = engine.submit(&mut pool, &entry, &member).unwrap();
    let entry = engine.approve(&mut pool, &entry, &reviewer).unwrap();

    let err = engine.submit(&mut pool, &entry, &member).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
    let err = engine.cancel(&mut pool, &entry, &member).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[test]
fn test_owner_with_reviewer_capability_cannot_approve_own_entry() {
    let db = setup_test_db("wf_self_approve");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member, Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 3.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();

    let err = engine.approve(&mut pool, &entry, &owner).unwrap_err();
    assert!(matches!(err, AppError::SelfActionDenied(_)));

    let fresh = reload(&pool, entry.id);
    assert_eq!(fresh.status, EntryStatus::Submitted);
    assert_eq!(fresh.version, entry.version);
}

#[test]
fn test_creator_cannot_review_entry_entered_on_behalf() {
    let db = setup_test_db("wf_creator_review");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let creator = seed_actor(&pool, "Rita", &[Capability::Reviewer]);
    let other = seed_actor(&pool, "Remy", &[Capability::Reviewer]);

    // Rita entered the hours on Alice's behalf, so Rita controls the
    // entry and must not review it.
    let entry = seed_draft_for(&mut pool, &creator, owner.id(), "2026-08-02", 2.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &creator).unwrap();

    let err = engine.approve(&mut pool, &entry, &creator).unwrap_err();
    assert!(matches!(err, AppError::SelfActionDenied(_)));

    // A third party with the capability approves just fine.
    let approved = engine.approve(&mut pool, &entry, &other).unwrap();
    assert_eq!(approved.status, EntryStatus::Approved);
    assert_eq!(approved.reviewer_user_id, Some(other.id()));
}

#[test]
fn test_administrator_is_not_exempt_from_self_approval() {
    let db = setup_test_db("wf_admin_self");
    let mut pool = open_pool(&db);
    let admin = seed_actor(&pool, "Ada", &[Capability::Administrator]);

    let entry = seed_draft(&mut pool, &admin, "2026-08-03", 1.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &admin).unwrap();

    let err = engine.approve(&mut pool, &entry, &admin).unwrap_err();
    assert!(matches!(err, AppError::SelfActionDenied(_)));
}

#[test]
fn test_member_without_capability_cannot_review() {
    let db = setup_test_db("wf_no_capability");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let bystander = seed_actor(&pool, "Bob", &[Capability::Member]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 2.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();

    let err = engine.approve(&mut pool, &entry, &bystander).unwrap_err();
    assert!(matches!(err, AppError::AuthorizationDenied(_)));
}

#[test]
fn test_blank_rejection_reason_fails_without_writing() {
    let db = setup_test_db("wf_blank_reason");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 2.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let audits_before = audit_sink::count_for_entry(&pool.conn, &entry.entry_number).unwrap();

    let err = engine.reject(&mut pool, &entry, &reviewer, "   ").unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let fresh = reload(&pool, entry.id);
    assert_eq!(fresh.status, EntryStatus::Submitted);
    assert_eq!(fresh.version, entry.version);
    assert_eq!(
        audit_sink::count_for_entry(&pool.conn, &entry.entry_number).unwrap(),
        audits_before
    );
}

#[test]
fn test_stale_snapshot_surfaces_concurrency_conflict() {
    let db = setup_test_db("wf_stale_snapshot");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let first = seed_actor(&pool, "Rita", &[Capability::Reviewer]);
    let second = seed_actor(&pool, "Remy", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 2.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let submitted = engine.submit(&mut pool, &entry, &owner).unwrap();

    // Both reviewers read the same submitted snapshot; Rita decides first.
    let stale = submitted.clone();
    engine.approve(&mut pool, &submitted, &first).unwrap();

    let err = engine
        .reject(&mut pool, &stale, &second, "duplicate entry")
        .unwrap_err();
    match err {
        AppError::ConcurrencyConflict {
            entry_number,
            expected,
        } => {
            assert_eq!(entry_number, stale.entry_number);
            assert_eq!(expected, stale.version);
        }
        other => panic!("expected ConcurrencyConflict, got {other}"),
    }

    // The losing write left no trace: created + submit + approve only.
    let fresh = reload(&pool, entry.id);
    assert_eq!(fresh.status, EntryStatus::Approved);
    assert_eq!(
        audit_sink::count_for_entry(&pool.conn, &entry.entry_number).unwrap(),
        3
    );
}

#[test]
fn test_correction_pins_original_hours_once() {
    let db = setup_test_db("wf_correction");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 4.5);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let entry = engine.approve(&mut pool, &entry, &reviewer).unwrap();

    let entry = engine
        .correct(&mut pool, &entry, &reviewer, 3.0, "mis-keyed duration")
        .unwrap();
    assert_eq!(entry.status, EntryStatus::Approved);
    assert_eq!(entry.hours, 3.0);
    assert_eq!(entry.original_hours, Some(4.5));
    assert!(entry.is_corrected);
    assert_eq!(entry.corrected_by_user_id, Some(reviewer.id()));

    // A second correction moves the hours but never the baseline.
    let entry = engine
        .correct(&mut pool, &entry, &reviewer, 2.0, "further review")
        .unwrap();
    assert_eq!(entry.hours, 2.0);
    assert_eq!(entry.original_hours, Some(4.5));

    let trail = audit_sink::list(&pool.conn, Some(&entry.entry_number)).unwrap();
    let corrections: Vec<_> = trail.iter().filter(|r| r.action == "correction").collect();
    assert_eq!(corrections.len(), 2);
    assert!(corrections[0]
        .metadata
        .as_ref()
        .unwrap()
        .contains("\"old_hours\":4.5"));
}

#[test]
fn test_owner_cannot_correct_own_approved_entry() {
    let db = setup_test_db("wf_self_correct");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member, Capability::Reviewer]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 4.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let entry = engine.approve(&mut pool, &entry, &reviewer).unwrap();

    let err = engine
        .correct(&mut pool, &entry, &owner, 3.0, "typo")
        .unwrap_err();
    assert!(matches!(err, AppError::SelfActionDenied(_)));
}

#[test]
fn test_return_for_revision_logs_a_question() {
    let db = setup_test_db("wf_return");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 8.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);

    // Only a submitted entry can be returned.
    let err = engine
        .return_for_revision(&mut pool, &entry, &reviewer, "which project?")
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let entry = engine
        .return_for_revision(&mut pool, &entry, &reviewer, "which project?")
        .unwrap();
    assert_eq!(entry.status, EntryStatus::Clarification);
    assert_eq!(entry.return_reason.as_deref(), Some("which project?"));

    let log = messages::list_for_entry(&pool.conn, entry.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, MessageKind::Question);
    assert_eq!(log[0].body, "which project?");
    assert_eq!(log[0].author_user_id, reviewer.id());
}

#[test]
fn test_cancel_and_reactivate_round_trip() {
    let db = setup_test_db("wf_cancel");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 1.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let entry = engine.cancel(&mut pool, &entry, &owner).unwrap();
    assert_eq!(entry.status, EntryStatus::Cancelled);

    let entry = engine.reactivate(&mut pool, &entry, &owner).unwrap();
    assert_eq!(entry.status, EntryStatus::Draft);
    assert_eq!(entry.version, 4);
}

#[test]
fn test_withdraw_from_clarification() {
    let db = setup_test_db("wf_withdraw");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);
    let reviewer = seed_actor(&pool, "Rita", &[Capability::Reviewer]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 1.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let entry = engine
        .return_for_revision(&mut pool, &entry, &reviewer, "dates look off")
        .unwrap();
    let entry = engine.withdraw(&mut pool, &entry, &owner).unwrap();
    assert_eq!(entry.status, EntryStatus::Draft);
}

#[test]
fn test_edit_draft_is_draft_only() {
    let db = setup_test_db("wf_edit");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 1.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let patch = DraftPatch {
        hours: Some(2.25),
        description: Some("setup and teardown".to_string()),
        ..DraftPatch::default()
    };
    let entry = engine.edit_draft(&mut pool, &entry, &owner, &patch).unwrap();
    assert_eq!(entry.hours, 2.25);
    assert_eq!(entry.description, "setup and teardown");
    assert_eq!(entry.version, 2);

    let entry = engine.submit(&mut pool, &entry, &owner).unwrap();
    let err = engine.edit_draft(&mut pool, &entry, &owner, &patch).unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
}

#[test]
fn test_soft_deleted_entry_leaves_the_active_set() {
    let db = setup_test_db("wf_soft_delete");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);

    let entry = seed_draft(&mut pool, &owner, "2026-08-01", 1.0);
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    engine.soft_delete(&mut pool, &entry, &owner).unwrap();

    assert!(entry_store::get_by_id(&pool.conn, entry.id).unwrap().is_none());
    let listed = entry_store::list_entries(&pool.conn, None, None).unwrap();
    assert!(listed.is_empty());

    // Mutating the deleted entry through a stale snapshot is reported
    // as "not found", not as a version conflict.
    let err = engine.submit(&mut pool, &entry, &owner).unwrap_err();
    assert!(matches!(err, AppError::EntryNotFound(_)));
}

#[test]
fn test_hours_validation_rules() {
    let db = setup_test_db("wf_hours");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);

    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    for bad in [0.0, -1.0, 24.5, 1.1] {
        let err = engine
            .create_draft(
                &mut pool,
                &owner,
                &clubhours::db::entry_store::NewEntry {
                    owner_user_id: owner.id(),
                    creator_user_id: owner.id(),
                    category: "general",
                    work_date: date,
                    time_from: None,
                    time_to: None,
                    hours: bad,
                    project: "",
                    description: "",
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidHours(_)), "hours {bad}");
    }
}

#[test]
fn test_entry_numbers_are_sequential_per_year() {
    let db = setup_test_db("wf_numbers");
    let mut pool = open_pool(&db);
    let owner = seed_actor(&pool, "Alice", &[Capability::Member]);

    let a = seed_draft(&mut pool, &owner, "2026-08-01", 1.0);
    let b = seed_draft(&mut pool, &owner, "2026-08-02", 1.0);
    let c = seed_draft(&mut pool, &owner, "2025-12-31", 1.0);

    assert_eq!(a.entry_number, "VH-2026-0001");
    assert_eq!(b.entry_number, "VH-2026-0002");
    assert_eq!(c.entry_number, "VH-2025-0001");
}
