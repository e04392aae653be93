//! End-to-end tests for the run coordinator using scripted checkers and
//! tempdir-backed stores — no network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use badgewatch_core::{BadgeKind, RunResult, StatusCheck, StatusSignal};
use badgewatch_pipeline::{
    FileStore, JsonFileResultStore, LocalFileStore, PollOutcome, ResultStore, RunCoordinator,
    RunSettings, StoreError, TriggerOutcome,
};

/// Checker returning scripted signals, optionally gated on a [`Notify`] so a
/// test can hold a run open.
#[derive(Default)]
struct ScriptedCheck {
    signals: HashMap<String, StatusSignal>,
    gate: Option<Arc<Notify>>,
    fail_prepare: bool,
    check_calls: AtomicUsize,
}

#[async_trait]
impl StatusCheck for ScriptedCheck {
    async fn prepare(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_prepare {
            return Err("invalid_grant".into());
        }
        Ok(())
    }

    async fn check(&self, asin: &str) -> StatusSignal {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.signals
            .get(asin)
            .cloned()
            .unwrap_or(StatusSignal::NoChange)
    }
}

/// Result store wrapper that counts writes.
struct CountingResultStore {
    inner: JsonFileResultStore,
    saves: AtomicUsize,
}

#[async_trait]
impl ResultStore for CountingResultStore {
    async fn save(&self, result: &RunResult) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(result).await
    }

    async fn load(&self) -> Result<Option<RunResult>, StoreError> {
        self.inner.load().await
    }
}

fn settings() -> RunSettings {
    RunSettings {
        source_name: "Master_Catalogue.csv".to_string(),
        batch_size: 2,
        batch_concurrency: 2,
        report_unchanged: false,
    }
}

async fn seed_catalogue(dir: &tempfile::TempDir, contents: &str) -> Arc<LocalFileStore> {
    let store = Arc::new(LocalFileStore::new(dir.path().to_path_buf()));
    store
        .upload("Master_Catalogue.csv", contents.as_bytes())
        .await
        .expect("seed catalogue");
    store
}

async fn wait_for_terminal(coordinator: &RunCoordinator) -> PollOutcome {
    for _ in 0..500 {
        let outcome = coordinator.poll().await;
        if outcome != PollOutcome::NotReady {
            return outcome;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run did not reach a terminal state in time");
}

#[tokio::test]
async fn run_reports_changes_and_isolates_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(
        &dir,
        "Amazon ASIN,Amazon URL\n\
         A1,https://www.amazon.de/dp/A1\n\
         A2,https://www.amazon.de/dp/A2\n\
         A3,https://www.amazon.de/dp/A3\n",
    )
    .await;

    let mut checker = ScriptedCheck::default();
    checker.signals.insert("A1".to_string(), StatusSignal::NoChange);
    checker.signals.insert(
        "A2".to_string(),
        StatusSignal::BadgeAdded(BadgeKind::BestSeller),
    );
    checker.signals.insert(
        "A3".to_string(),
        StatusSignal::Error("timeout".to_string()),
    );

    let results = Arc::new(JsonFileResultStore::new(dir.path().join("last_run.json")));
    let coordinator = RunCoordinator::new(Arc::new(checker), files, results, settings());

    assert_eq!(coordinator.trigger().await, TriggerOutcome::Started);

    let outcome = wait_for_terminal(&coordinator).await;
    let PollOutcome::Completed(report) = outcome else {
        panic!("expected Completed, got: {outcome:?}");
    };

    assert_eq!(report.checked, 3);
    assert_eq!(report.products.len(), 1, "only A2 changed");
    assert_eq!(report.products[0].asin, "A2");
    assert_eq!(report.products[0].update, "New Best Seller Badge Added");
    assert_eq!(report.errors.len(), 1, "A3 recorded as error, not fatal");
    assert_eq!(report.errors[0].asin, "A3");
}

#[tokio::test]
async fn completed_result_is_persisted_before_poll_observes_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(&dir, "Amazon ASIN,Amazon URL\nA1,https://example.com\n").await;

    let result_path = dir.path().join("last_run.json");
    let results = Arc::new(JsonFileResultStore::new(result_path.clone()));
    let coordinator =
        RunCoordinator::new(Arc::new(ScriptedCheck::default()), files, results, settings());

    coordinator.trigger().await;
    let outcome = wait_for_terminal(&coordinator).await;

    assert!(matches!(outcome, PollOutcome::Completed(_)));
    assert!(
        result_path.exists(),
        "persisted result must exist once completion is observable"
    );
}

#[tokio::test]
async fn trigger_while_running_is_rejected_and_writes_one_result() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(&dir, "Amazon ASIN,Amazon URL\nA1,https://example.com\n").await;

    let gate = Arc::new(Notify::new());
    let checker = ScriptedCheck {
        gate: Some(Arc::clone(&gate)),
        ..ScriptedCheck::default()
    };

    let results = Arc::new(CountingResultStore {
        inner: JsonFileResultStore::new(dir.path().join("last_run.json")),
        saves: AtomicUsize::new(0),
    });
    let coordinator =
        RunCoordinator::new(Arc::new(checker), files, Arc::clone(&results) as _, settings());

    assert_eq!(coordinator.trigger().await, TriggerOutcome::Started);

    // Give the background task time to reach the gated check.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(coordinator.poll().await, PollOutcome::NotReady);
    assert_eq!(coordinator.trigger().await, TriggerOutcome::AlreadyRunning);
    assert_eq!(coordinator.trigger().await, TriggerOutcome::AlreadyRunning);

    gate.notify_waiters();
    gate.notify_one();
    let outcome = wait_for_terminal(&coordinator).await;

    assert!(matches!(outcome, PollOutcome::Completed(_)));
    assert_eq!(
        results.saves.load(Ordering::SeqCst),
        1,
        "rejected triggers must not produce extra result writes"
    );
}

#[tokio::test]
async fn poll_is_idempotent_after_completion() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(&dir, "Amazon ASIN,Amazon URL\nA1,https://example.com\n").await;

    let results = Arc::new(JsonFileResultStore::new(dir.path().join("last_run.json")));
    let coordinator =
        RunCoordinator::new(Arc::new(ScriptedCheck::default()), files, results, settings());

    coordinator.trigger().await;
    let first = wait_for_terminal(&coordinator).await;
    let second = coordinator.poll().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_required_column_fails_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    // No "Amazon ASIN" header.
    let files = seed_catalogue(&dir, "Product Name,Amazon URL\nKettle,https://example.com\n").await;

    let results = Arc::new(JsonFileResultStore::new(dir.path().join("last_run.json")));
    let coordinator =
        RunCoordinator::new(Arc::new(ScriptedCheck::default()), files, results, settings());

    coordinator.trigger().await;
    let outcome = wait_for_terminal(&coordinator).await;

    let PollOutcome::Failed(reason) = outcome else {
        panic!("expected Failed, got: {outcome:?}");
    };
    assert!(
        reason.contains("missing required columns"),
        "reason: {reason}"
    );
}

#[tokio::test]
async fn missing_source_file_fails_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = Arc::new(LocalFileStore::new(dir.path().to_path_buf()));

    let results = Arc::new(JsonFileResultStore::new(dir.path().join("last_run.json")));
    let coordinator =
        RunCoordinator::new(Arc::new(ScriptedCheck::default()), files, results, settings());

    coordinator.trigger().await;
    let outcome = wait_for_terminal(&coordinator).await;

    let PollOutcome::Failed(reason) = outcome else {
        panic!("expected Failed, got: {outcome:?}");
    };
    assert!(reason.contains("source file unavailable"), "reason: {reason}");
}

#[tokio::test]
async fn rejected_credentials_fail_the_run_before_any_check() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(&dir, "Amazon ASIN,Amazon URL\nA1,https://example.com\n").await;

    let checker = Arc::new(ScriptedCheck {
        fail_prepare: true,
        ..ScriptedCheck::default()
    });

    let results = Arc::new(JsonFileResultStore::new(dir.path().join("last_run.json")));
    let coordinator =
        RunCoordinator::new(Arc::clone(&checker) as _, files, results, settings());

    coordinator.trigger().await;
    let outcome = wait_for_terminal(&coordinator).await;

    let PollOutcome::Failed(reason) = outcome else {
        panic!("expected Failed, got: {outcome:?}");
    };
    assert!(reason.contains("authentication failed"), "reason: {reason}");
    assert_eq!(
        checker.check_calls.load(Ordering::SeqCst),
        0,
        "no catalog calls after auth failure"
    );
}

#[tokio::test]
async fn recover_restores_persisted_outcome() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(&dir, "Amazon ASIN,Amazon URL\nA1,https://example.com\n").await;
    let result_path = dir.path().join("last_run.json");

    // First coordinator completes a run and persists it.
    {
        let results = Arc::new(JsonFileResultStore::new(result_path.clone()));
        let coordinator = RunCoordinator::new(
            Arc::new(ScriptedCheck::default()),
            Arc::clone(&files) as _,
            results,
            settings(),
        );
        coordinator.trigger().await;
        wait_for_terminal(&coordinator).await;
    }

    // A fresh coordinator (simulated restart) recovers the same outcome.
    let results = Arc::new(JsonFileResultStore::new(result_path));
    let coordinator =
        RunCoordinator::new(Arc::new(ScriptedCheck::default()), files, results, settings());

    assert_eq!(coordinator.poll().await, PollOutcome::NotReady);
    coordinator.recover().await;
    assert!(matches!(
        coordinator.poll().await,
        PollOutcome::Completed(_)
    ));
}

#[tokio::test]
async fn diagnostic_mode_reports_unchanged_products() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_catalogue(&dir, "Amazon ASIN,Amazon URL\nA1,https://example.com\n").await;

    let results = Arc::new(JsonFileResultStore::new(dir.path().join("last_run.json")));
    let mut run_settings = settings();
    run_settings.report_unchanged = true;
    let coordinator = RunCoordinator::new(
        Arc::new(ScriptedCheck::default()),
        files,
        results,
        run_settings,
    );

    coordinator.trigger().await;
    let outcome = wait_for_terminal(&coordinator).await;

    let PollOutcome::Completed(report) = outcome else {
        panic!("expected Completed, got: {outcome:?}");
    };
    assert_eq!(report.products.len(), 1);
    assert_eq!(report.products[0].update, "No updates");
}
