use copyutil::engine::FailureReason;
use copyutil::{CancelToken, ExclusionConfig, RunConfig, TransferEngine, TransferEvent};
use std::fs;
use tempfile::tempdir;

fn no_reserved() -> ExclusionConfig {
    ExclusionConfig {
        ignore_system_reserved: true,
        ..ExclusionConfig::default()
    }
}

#[test]
fn handling_the_same_path_twice_records_it_once() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let dst = tempdir()?;
    fs::write(src.path().join("a.txt"), "alpha")?;

    let mut copies = 0;
    let mut engine = TransferEngine::new(RunConfig::new(src.path(), dst.path()), no_reserved())?
        .with_observer(|event| {
            if matches!(event, TransferEvent::BeforeCopy { .. }) {
                copies += 1;
            }
        });
    engine.handle_request("a.txt");
    engine.handle_request("a.txt");
    engine.handle_request("/");
    assert_eq!(engine.ledger().len(), 1);
    let report = engine.finish();

    assert_eq!(copies, 1);
    assert_eq!(report.succeeded_count, 1);
    Ok(())
}

#[test]
fn missing_source_path_is_a_failure_without_destination() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let dst = tempdir()?;
    fs::write(src.path().join("a.txt"), "alpha")?;

    let mut reasons = Vec::new();
    let cfg = RunConfig::new(src.path(), dst.path()).with_paths(["nope.txt", "a.txt"]);
    let report = TransferEngine::new(cfg, no_reserved())?
        .with_observer(|event| {
            if let TransferEvent::Failed { reason, .. } = event {
                reasons.push(reason.clone());
            }
        })
        .run();

    assert_eq!(report.entries.len(), 2);
    let failed = &report.entries[0];
    assert!(!failed.success);
    assert_eq!(failed.source, src.path().join("nope.txt"));
    assert_eq!(failed.destination, None);
    assert_eq!(reasons, vec![FailureReason::IncorrectSourcePath]);
    // the run carried on with the next path
    assert!(report.entries[1].success);
    Ok(())
}

#[test]
fn destination_nested_in_source_is_not_copied_into_itself() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let dst = src.path().join("backup");
    fs::create_dir_all(&dst)?;
    fs::write(dst.join("old.txt"), "previous run")?;
    fs::create_dir_all(src.path().join("sub"))?;
    fs::write(src.path().join("a.txt"), "alpha")?;
    fs::write(src.path().join("sub/b.txt"), "beta")?;

    let report = copyutil::run(RunConfig::new(src.path(), &dst), no_reserved())?;

    assert_eq!(report.succeeded_count, 2);
    assert!(report.entries.iter().all(|e| !e.source.starts_with(&dst)));
    assert!(dst.join("a.txt").exists());
    assert!(dst.join("sub/b.txt").exists());
    assert!(!dst.join("backup").exists());
    Ok(())
}

#[test]
fn cancelled_before_start_processes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let dst = tempdir()?;
    fs::write(src.path().join("a.txt"), "alpha")?;

    let cancel = CancelToken::new();
    cancel.cancel();
    let report = TransferEngine::new(RunConfig::new(src.path(), dst.path()), no_reserved())?
        .with_cancel(cancel)
        .run();

    assert!(report.interrupted);
    assert!(report.entries.is_empty());
    assert!(!dst.path().join("a.txt").exists());
    Ok(())
}

#[test]
fn cancellation_stops_the_copy_pass_between_files() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let dst = tempdir()?;
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(src.path().join(name), name)?;
    }

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let report = TransferEngine::new(RunConfig::new(src.path(), dst.path()), no_reserved())?
        .with_cancel(cancel)
        .with_observer(move |event| {
            if matches!(event, TransferEvent::Succeeded { .. }) {
                trigger.cancel();
            }
        })
        .run();

    assert!(report.interrupted);
    assert_eq!(report.entries.len(), 1);
    assert!(dst.path().join("a.txt").exists());
    assert!(!dst.path().join("b.txt").exists());
    Ok(())
}

#[test]
fn copy_pass_emits_events_in_decision_order() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let dst = tempdir()?;
    fs::write(src.path().join("a.txt"), "alpha")?;
    fs::write(dst.path().join("a.txt"), "old")?;

    let cfg = RunConfig {
        force_overwrite: true,
        ..RunConfig::new(src.path(), dst.path())
    };
    let mut kinds = Vec::new();
    TransferEngine::new(cfg, no_reserved())?
        .with_observer(|event| kinds.push(event.kind()))
        .run();

    assert_eq!(
        kinds,
        vec![
            "calculating_size",
            "processing",
            "confirm_copy",
            "before_copy",
            "exists",
            "succeeded",
        ]
    );
    Ok(())
}

#[test]
fn invalid_roots_are_rejected_up_front() -> Result<(), Box<dyn std::error::Error>> {
    let src = tempdir()?;
    let same = TransferEngine::new(RunConfig::new(src.path(), src.path()), no_reserved());
    assert!(matches!(same, Err(copyutil::CopyUtilError::SameRoots(_))));

    let missing = TransferEngine::new(
        RunConfig::new(src.path().join("missing"), src.path().join("out")),
        no_reserved(),
    );
    assert!(matches!(missing, Err(copyutil::CopyUtilError::SourceRootMissing(_))));
    Ok(())
}
