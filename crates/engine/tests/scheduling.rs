// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scheduling: create a job, fire it through the blockout gate
//! and run it with output resolution

#![allow(clippy::unwrap_used, clippy::panic)]

use async_trait::async_trait;
use chrono::Duration;
use rj_adapters::{
    AllowAll, FakeBlockoutPredicate, FakeContentStore, FakeNotifyAdapter, Identity,
    MemorySettings, MemoryTriggerBackend, OutputStream, TaskLocalIdentity, TriggerBackend,
};
use rj_core::{
    keys, Clock, FakeClock, JobParams, JobTrigger, SequentialIdGen, SimpleTrigger, TriggerTiming,
    TriggerTranslator, UiHint, BLOCKOUT_ACTION_ID,
};
use rj_engine::{
    Action, ActionError, ActionExecutionCoordinator, BlockoutGate, BlockoutManager,
    ExecutionClass, ExecutionStatus, FireOutcome, JobScheduler, OutputPathResolver, OutputSink,
    RecordingListener, SchedulerConfig, SchedulerError, StreamProvider,
};
use std::io::Write;

#[derive(Default)]
struct CsvExport {
    stream: Option<OutputStream>,
    runs: usize,
}

#[async_trait]
impl Action for CsvExport {
    async fn execute(&mut self, _params: &JobParams) -> Result<(), ActionError> {
        self.runs += 1;
        if let Some(stream) = self.stream.as_mut() {
            stream
                .write_all(b"region,total\n")
                .map_err(|e| ActionError::new(e.to_string()))?;
        }
        Ok(())
    }

    fn output_sink(&mut self) -> Option<&mut dyn OutputSink> {
        Some(self)
    }
}

impl OutputSink for CsvExport {
    fn set_output(&mut self, _path: &str, stream: OutputStream) {
        self.stream = Some(stream);
    }

    fn take_output(&mut self) -> Option<OutputStream> {
        self.stream.take()
    }
}

fn daily(secs: i64) -> JobTrigger {
    JobTrigger::Simple(SimpleTrigger {
        timing: TriggerTiming {
            ui_hint: Some(UiHint::Daily),
            ..TriggerTiming::default()
        },
        repeat_interval_secs: secs,
        repeat_count: -1,
    })
}

#[tokio::test]
async fn scheduled_job_fires_and_produces_output() {
    let backend = MemoryTriggerBackend::new();
    let clock = FakeClock::new();
    let scheduler = JobScheduler::new(
        backend.clone(),
        TriggerTranslator::default(),
        clock.clone(),
        SequentialIdGen::new("job"),
    );
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), daily(172_800))
        .await
        .unwrap();

    let content = FakeContentStore::new(TaskLocalIdentity::new());
    content.add_folder("/home/admin", "admin");
    let settings = MemorySettings::new();
    let listener = RecordingListener::new();
    let coordinator = ActionExecutionCoordinator::new(
        OutputPathResolver::new(
            content.clone(),
            settings,
            TaskLocalIdentity::new(),
            AllowAll,
            SchedulerConfig::default(),
        ),
        FakeNotifyAdapter::new(),
        listener.clone(),
        SequentialIdGen::new("lineage"),
    );
    let gate = BlockoutGate::new(
        BlockoutManager::new(backend.clone(), clock.clone()),
        backend.clone(),
        clock.clone(),
    );

    let key = job.key().unwrap();
    let owner = Identity::new(key.owner());
    let provider = StreamProvider::new("/home/admin/sales.csv");
    let mut action = CsvExport::default();

    let (coordinator, owner, provider, work) = (&coordinator, &owner, &provider, &mut action);
    let outcome = gate
        .fire(&key, job.params.clone(), move |params| async move {
            let outcome = coordinator.run(owner, work, params, Some(provider)).await?;
            Ok::<bool, SchedulerError>(outcome.success)
        })
        .await
        .unwrap();

    assert_eq!(outcome, FireOutcome::Executed(ExecutionClass::FirstSuccess));
    assert_eq!(action.runs, 1);
    assert_eq!(
        content.file_content("/home/admin/sales.csv"),
        Some(b"region,total\n".to_vec())
    );
    assert_eq!(
        listener.statuses(),
        vec![ExecutionStatus::Running, ExecutionStatus::Succeeded]
    );

    let fetched = scheduler.get_job(&job.id).await.unwrap();
    assert_eq!(fetched.last_run, Some(clock.now()));
    match fetched.trigger {
        Some(JobTrigger::Simple(simple)) => assert_eq!(simple.repeat_interval_secs, 172_800),
        other => panic!("expected simple trigger, got {:?}", other),
    }
}

#[tokio::test]
async fn blockout_window_suppresses_ordinary_jobs_only() {
    let backend = MemoryTriggerBackend::new();
    let clock = FakeClock::new();
    let scheduler = JobScheduler::new(
        backend.clone(),
        TriggerTranslator::default(),
        clock.clone(),
        SequentialIdGen::new("job"),
    );

    let mut window = daily(604_800);
    window.timing_mut().duration_millis = 2 * 3_600_000;
    let blockout = scheduler
        .create_job(
            "maintenance",
            "admin",
            JobParams::new().with(keys::ACTION_ID, BLOCKOUT_ACTION_ID),
            window,
        )
        .await
        .unwrap();
    let report = scheduler
        .create_job("sales", "admin", JobParams::new(), daily(86_400))
        .await
        .unwrap();

    backend.mark_fired(&blockout.id, clock.now());
    clock.advance(Duration::minutes(90));

    let gate = BlockoutGate::new(
        BlockoutManager::new(backend.clone(), clock.clone()),
        backend.clone(),
        clock.clone(),
    );
    let suppressed = gate
        .fire(&report.key().unwrap(), report.params.clone(), |_| async { Ok(true) })
        .await
        .unwrap();
    assert_eq!(suppressed, FireOutcome::Suppressed);
    assert_eq!(scheduler.get_job(&report.id).await.unwrap().last_run, None);

    let allowed = gate
        .fire(&blockout.key().unwrap(), blockout.params.clone(), |_| async { Ok(true) })
        .await
        .unwrap();
    assert_eq!(allowed, FireOutcome::Executed(ExecutionClass::FirstSuccess));

    clock.advance(Duration::minutes(31));
    let later = gate
        .fire(&report.key().unwrap(), report.params.clone(), |_| async { Ok(true) })
        .await
        .unwrap();
    assert_eq!(later, FireOutcome::Executed(ExecutionClass::FirstSuccess));
}

#[tokio::test]
async fn unavailable_blockout_check_still_runs_the_job_once() {
    let backend = MemoryTriggerBackend::new();
    let scheduler = JobScheduler::new(
        backend.clone(),
        TriggerTranslator::default(),
        FakeClock::new(),
        SequentialIdGen::new("job"),
    );
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), daily(86_400))
        .await
        .unwrap();

    let gate = BlockoutGate::new(FakeBlockoutPredicate::unavailable(), backend.clone(), FakeClock::new());
    let mut runs = 0;
    gate.fire(&job.key().unwrap(), job.params.clone(), |_| {
        runs += 1;
        async { Ok(true) }
    })
    .await
    .unwrap();

    assert_eq!(runs, 1);
    let detail = backend.job_detail(&job.key().unwrap()).await.unwrap().unwrap();
    assert!(detail.params.last_actual_execution().is_some());
}
