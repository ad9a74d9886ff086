//! Failure and cancellation scenarios.
//!
//! Test modules:
//! - missing_markers: Targets deleted before or during a run
//! - store_faults: Rejected writes and commits roll everything back
//! - cancellation: Stopping before or after the first target

use mark_tests::prelude::*;

fn mark_done(keys: &[MarkerKey]) -> UpdateMarkersOperation {
    UpdateMarkersOperation::new(keys.to_vec(), attrs! { "done" => true }, "Mark done", MergePolicy::Merge)
}

mod missing_markers {
    use super::*;

    #[test]
    fn test_deleted_target_fails_before_any_write() {
        // GIVEN
        let (mut ws, keys) = seeded_workspace(2);
        let before = snapshot_of(&ws, &keys[..1]);
        ws.delete_marker(&keys[1]).unwrap();
        let mut op = mark_done(&keys);

        // WHEN
        let err = op.execute(&mut ws, &mut NullProgress).unwrap_err();

        // THEN
        assert_eq!(err, MutationError::record_missing(keys[1].clone()));
        assert!(err.is_fatal());
        assert_eq!(snapshot_of(&ws, &keys[..1]), before);
        assert!(!op.has_executed());
        assert!(!ws.in_transaction());
    }

    #[test]
    fn test_missing_targets_reported_in_order() {
        // GIVEN
        let (mut ws, keys) = seeded_workspace(4);
        ws.delete_marker(&keys[3]).unwrap();
        ws.delete_marker(&keys[1]).unwrap();
        let op = mark_done(&keys);

        // THEN
        assert!(!op.can_execute(&ws));
        assert_eq!(op.missing_targets(&ws), vec![keys[1].clone(), keys[3].clone()]);
    }

    #[test]
    fn test_marker_vanishing_mid_run_writes_nothing() {
        // GIVEN k1 disappears as soon as k0 has been read
        let (ws, keys) = seeded_workspace(3);
        let before = snapshot_of(&ws, &keys);
        let mut store = FlakyStore::new(ws).vanish_on_read(keys[0].clone(), keys[1].clone());
        let mut op = mark_done(&keys);

        // WHEN
        let err = op.execute(&mut store, &mut NullProgress).unwrap_err();

        // THEN
        assert_eq!(err, MutationError::record_missing(keys[1].clone()));
        assert!(err.applied_targets().is_empty());
        assert_eq!(snapshot_of(store.workspace(), &keys), before);
        assert!(!store.workspace().in_transaction());
        assert!(!op.has_executed());
    }

    #[test]
    fn test_failed_execute_can_be_retried() {
        // GIVEN
        let (ws, keys) = seeded_workspace(2);
        let mut store = FlakyStore::new(ws).vanish_on_read(keys[0].clone(), keys[1].clone());
        let mut op = mark_done(&keys);
        op.execute(&mut store, &mut NullProgress).unwrap_err();

        // WHEN
        store.heal();
        let outcome = op.execute(&mut store, &mut NullProgress).unwrap();

        // THEN
        assert_eq!(outcome.updated_count(), 2);
        assert_eq!(
            store.get_attributes(&keys[1]).unwrap().get("done"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_undo_fails_when_marker_deleted_after_execute() {
        // GIVEN
        let (mut ws, keys) = seeded_workspace(2);
        let mut op = mark_done(&keys);
        op.execute(&mut ws, &mut NullProgress).unwrap();
        ws.delete_marker(&keys[0]).unwrap();

        // WHEN
        let err = op.undo(&mut ws, &mut NullProgress).unwrap_err();

        // THEN the surviving marker keeps its executed state
        assert!(!op.can_undo(&ws));
        assert_eq!(err, MutationError::record_missing(keys[0].clone()));
        assert_eq!(
            ws.get_attributes(&keys[1]).unwrap().get("done"),
            Some(&Value::Bool(true))
        );
        assert_eq!(op.prior_snapshots().len(), 2);
    }
}

mod store_faults {
    use super::*;

    #[test]
    fn test_rejected_batch_write_rolls_back() {
        // GIVEN a store that writes the first update, then rejects the next
        let (ws, keys) = seeded_workspace(3);
        let before = snapshot_of(&ws, &keys);
        let mut store = FlakyStore::new(ws).reject_batch_writes();
        let mut op = mark_done(&keys);

        // WHEN
        let err = op.execute(&mut store, &mut NullProgress).unwrap_err();

        // THEN
        assert!(matches!(
            err,
            MutationError::StoreTransaction {
                source: StoreError::WriteRejected { .. }
            }
        ));
        assert_eq!(err.affected_markers(), vec![keys[1].clone()]);
        assert_eq!(snapshot_of(store.workspace(), &keys), before);
        assert!(!store.workspace().in_transaction());
        assert!(!op.has_executed());
    }

    #[test]
    fn test_rejected_commit_rolls_back() {
        // GIVEN
        let (ws, keys) = seeded_workspace(2);
        let before = snapshot_of(&ws, &keys);
        let mut store = FlakyStore::new(ws).reject_commit();
        let mut op = mark_done(&keys);

        // WHEN
        let err = op.execute(&mut store, &mut NullProgress).unwrap_err();

        // THEN
        assert_eq!(
            err,
            MutationError::from(StoreError::commit_failed("injected commit failure"))
        );
        assert_eq!(snapshot_of(store.workspace(), &keys), before);
        assert!(!store.workspace().in_transaction());
    }

    #[test]
    fn test_failed_undo_keeps_operation_undoable() {
        // GIVEN
        let (ws, keys) = seeded_workspace(2);
        let mut store = FlakyStore::new(ws);
        let mut op = mark_done(&keys);
        op.execute(&mut store, &mut NullProgress).unwrap();
        let executed = snapshot_of(store.workspace(), &keys);
        store = store.reject_commit();

        // WHEN
        op.undo(&mut store, &mut NullProgress).unwrap_err();

        // THEN
        assert_eq!(snapshot_of(store.workspace(), &keys), executed);

        // WHEN
        store.heal();
        let outcome = op.undo(&mut store, &mut NullProgress).unwrap();

        // THEN
        assert_eq!(outcome.direction, Direction::Restored);
        assert_eq!(int_attr(&store, &keys[1], "priority"), Some(1));
        assert_eq!(
            store.get_attributes(&keys[1]).unwrap().get("done"),
            Some(&Value::Bool(false))
        );
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn test_cancel_before_first_target() {
        // GIVEN
        let (mut ws, keys) = seeded_workspace(3);
        let before = snapshot_of(&ws, &keys);
        let mut progress = RecordingProgress::cancelling_after(0);
        let mut op = mark_done(&keys);

        // WHEN
        let err = op.execute(&mut ws, &mut progress).unwrap_err();

        // THEN
        assert_eq!(err, MutationError::Cancelled);
        assert!(!err.is_fatal());
        assert_eq!(snapshot_of(&ws, &keys), before);
        assert!(!op.has_executed());
        assert_eq!(
            progress.events(),
            &[ProgressEvent::Begin(DEFAULT_TOTAL_WORK), ProgressEvent::Done]
        );
    }

    #[test]
    fn test_cancel_after_prefix_commits_prefix() {
        // GIVEN
        let (mut ws, keys) = seeded_workspace(4);
        let mut progress = RecordingProgress::cancelling_after(2);
        let mut op = mark_done(&keys);

        // WHEN
        let err = op.execute(&mut ws, &mut progress).unwrap_err();

        // THEN
        assert_eq!(
            err,
            MutationError::partial_failure(keys[..2].to_vec(), keys[2..].to_vec(), MutationError::Cancelled)
        );
        assert_eq!(err.to_string(), "Updated 2 of 4 markers: Operation cancelled");
        assert_eq!(err.applied_targets(), &keys[..2]);
        assert!(op.is_partially_applied());
        for (index, key) in keys.iter().enumerate() {
            let done = ws.get_attributes(key).unwrap().get("done").cloned();
            assert_eq!(done, Some(Value::Bool(index < 2)));
        }
        assert_eq!(progress.deltas(), vec![25, 25]);
    }

    #[test]
    fn test_undo_compensates_prefix_then_execute_resumes() {
        // GIVEN a run cancelled after one of three targets
        let (mut ws, keys) = seeded_workspace(3);
        let before = snapshot_of(&ws, &keys);
        let mut op = mark_done(&keys);
        op.execute(&mut ws, &mut RecordingProgress::cancelling_after(1))
            .unwrap_err();

        // WHEN
        let outcome = op.undo(&mut ws, &mut NullProgress).unwrap();

        // THEN only the written prefix was restored
        assert_eq!(outcome.direction, Direction::Compensated);
        assert_eq!(outcome.updated, vec![keys[0].clone()]);
        assert_eq!(snapshot_of(&ws, &keys), before);
        assert!(!op.has_executed());

        // WHEN
        let outcome = op.execute(&mut ws, &mut NullProgress).unwrap();

        // THEN
        assert_eq!(outcome.direction, Direction::Applied);
        assert_eq!(outcome.updated, keys);
        assert_eq!(op.policy(), MergePolicy::Replace);
    }

    #[test]
    fn test_cancelled_undo_can_be_finished() {
        // GIVEN
        let (mut ws, keys) = seeded_workspace(3);
        let before = snapshot_of(&ws, &keys);
        let mut op = mark_done(&keys);
        op.execute(&mut ws, &mut NullProgress).unwrap();
        let executed = snapshot_of(&ws, &keys);

        // WHEN undo stops after two targets
        let err = op
            .undo(&mut ws, &mut RecordingProgress::cancelling_after(2))
            .unwrap_err();

        // THEN
        assert_eq!(err.applied_targets(), &keys[..2]);
        assert_eq!(snapshot_of(&ws, &keys)[2], executed[2]);

        // WHEN the opposite command reverses the partial undo
        let outcome = op.redo(&mut ws, &mut NullProgress).unwrap();

        // THEN the executed state is back and undo still works
        assert_eq!(outcome.direction, Direction::Compensated);
        assert_eq!(snapshot_of(&ws, &keys), executed);
        op.undo(&mut ws, &mut NullProgress).unwrap();
        assert_eq!(snapshot_of(&ws, &keys), before);
    }
}
