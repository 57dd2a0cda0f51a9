// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;
use rj_adapters::MemoryTriggerBackend;
use rj_core::{
    BackendTriggerState, ComplexTrigger, FakeClock, RecurrenceRule, SequentialIdGen,
    SimpleTrigger, TriggerTiming, UiHint, BLOCKOUT_ACTION_ID,
};
use std::sync::Arc;

type TestScheduler = JobScheduler<MemoryTriggerBackend, FakeClock, SequentialIdGen>;

fn scheduler() -> (TestScheduler, MemoryTriggerBackend, FakeClock) {
    let backend = MemoryTriggerBackend::new();
    let clock = FakeClock::new();
    let scheduler = JobScheduler::new(
        backend.clone(),
        TriggerTranslator::default(),
        clock.clone(),
        SequentialIdGen::new("id"),
    );
    (scheduler, backend, clock)
}

fn every(secs: i64, hint: UiHint) -> JobTrigger {
    JobTrigger::Simple(SimpleTrigger {
        timing: TriggerTiming {
            ui_hint: Some(hint),
            ..TriggerTiming::default()
        },
        repeat_interval_secs: secs,
        repeat_count: -1,
    })
}

fn weekday_mornings(start: chrono::DateTime<chrono::Utc>) -> JobTrigger {
    JobTrigger::Complex(
        ComplexTrigger::new()
            .with_seconds(vec![RecurrenceRule::values([0])])
            .with_minutes(vec![RecurrenceRule::values([30])])
            .with_hours(vec![RecurrenceRule::values([9])])
            .with_days_of_week(vec![RecurrenceRule::range(2, 6)])
            .with_timing(TriggerTiming {
                start_time: Some(start),
                ..TriggerTiming::default()
            }),
    )
}

fn simple_interval(job: &Job) -> i64 {
    match &job.trigger {
        Some(JobTrigger::Simple(simple)) => simple.repeat_interval_secs,
        other => panic!("expected simple trigger, got {:?}", other),
    }
}

#[tokio::test]
async fn daily_interval_round_trips() {
    let (scheduler, backend, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(172_800, UiHint::Daily))
        .await
        .unwrap();

    let key = job.key().unwrap();
    let triggers = backend.triggers_of_job(&key).await.unwrap();
    assert_eq!(
        triggers[0].schedule,
        BackendSchedule::Interval {
            value: 2,
            unit: IntervalUnit::Day,
            repeat_count: -1,
        }
    );

    let fetched = scheduler.get_job(&job.id).await.unwrap();
    assert_eq!(simple_interval(&fetched), 172_800);
    assert_eq!(fetched.trigger.as_ref().and_then(JobTrigger::ui_hint), Some(UiHint::Daily));
    assert_eq!(fetched.owner, "admin");
    assert_eq!(fetched.name, "sales");
    assert_eq!(fetched.state, JobState::Normal);
    assert_eq!(fetched.next_run, Some(FakeClock::new().now()));
    assert_eq!(fetched.last_run, None);
}

#[tokio::test]
async fn empty_names_are_invalid_arguments() {
    let (scheduler, _, _) = scheduler();
    let err = scheduler
        .create_job("", "admin", JobParams::new(), every(60, UiHint::Seconds))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidArgument(_)));
}

#[tokio::test]
async fn malformed_ids_are_invalid_format() {
    let (scheduler, _, _) = scheduler();
    let err = scheduler.get_job("not-a-key").await.unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidFormat(_)));
}

#[tokio::test]
async fn unknown_jobs_are_not_found() {
    let (scheduler, _, _) = scheduler();
    let err = scheduler.get_job("bob:job1:abc123").await.unwrap_err();
    assert!(matches!(err, SchedulerError::JobNotFound(_)));
    let err = scheduler.pause_job("bob:job1:abc123").await.unwrap_err();
    assert!(matches!(err, SchedulerError::JobNotFound(_)));
}

#[tokio::test]
async fn bounded_complex_trigger_gets_a_calendar() {
    let (scheduler, backend, clock) = scheduler();
    let start = clock.now() + Duration::days(1);
    let job = scheduler
        .create_job("digest", "admin", JobParams::new(), weekday_mornings(start))
        .await
        .unwrap();

    let key = job.key().unwrap();
    let name = format!("availability_{}", key.unique_id());
    let window = backend.calendar(&name).await.unwrap().unwrap();
    assert_eq!(window.start_time, Some(start.timestamp_millis()));
    assert_eq!(window.end_time, None);

    match job.trigger {
        Some(JobTrigger::Complex(complex)) => {
            assert_eq!(complex.cron_expression.as_deref(), Some("0 30 9 ? * 2-6"));
            assert_eq!(complex.timing.start_time, Some(start));
        }
        other => panic!("expected complex trigger, got {:?}", other),
    }
}

#[tokio::test]
async fn trigger_now_stamps_and_adds_a_manual_trigger() {
    let (scheduler, backend, clock) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(3_600, UiHint::Hours))
        .await
        .unwrap();
    clock.advance(Duration::minutes(5));

    let fired = scheduler.trigger_now(&job.id).await.unwrap();

    assert_eq!(
        fired.params.get_i64(keys::LAST_MANUAL_FIRE),
        Some(clock.now_millis())
    );
    let triggers = backend.triggers_of_job(&job.key().unwrap()).await.unwrap();
    assert_eq!(triggers.len(), 2);
    assert!(triggers[1].name.starts_with(MANUAL_TRIGGER_PREFIX));
    assert_eq!(triggers[1].start_time, clock.now());
    assert_eq!(simple_interval(&fired), 3_600);
}

#[tokio::test]
async fn pause_and_resume() {
    let (scheduler, _, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    let paused = scheduler.pause_job(&job.id).await.unwrap();
    assert_eq!(paused.state, JobState::Paused);
    assert_eq!(scheduler.job_state(&job.id).await.unwrap(), JobState::Paused);

    let resumed = scheduler.resume_job(&job.id).await.unwrap();
    assert_eq!(resumed.state, JobState::Normal);
}

#[tokio::test]
async fn backend_state_is_mirrored() {
    let (scheduler, backend, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();
    backend.set_trigger_state(&job.id, BackendTriggerState::Blocked);

    assert_eq!(scheduler.job_state(&job.id).await.unwrap(), JobState::Blocked);
}

#[tokio::test]
async fn remove_job() {
    let (scheduler, _, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    assert!(scheduler.remove_job(&job.id).await.unwrap());
    assert!(!scheduler.remove_job(&job.id).await.unwrap());
    assert!(matches!(
        scheduler.get_job(&job.id).await,
        Err(SchedulerError::JobNotFound(_))
    ));
}

#[tokio::test]
async fn update_replaces_trigger_and_params() {
    let (scheduler, _, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    let params = JobParams::new().with(keys::EMAIL_TO, "ops@example.com");
    let updated = scheduler
        .update_job(&job.id, Some(params), every(7_200, UiHint::Hours))
        .await
        .unwrap();

    assert_eq!(updated.id, job.id);
    assert_eq!(simple_interval(&updated), 7_200);
    assert_eq!(updated.params.get_str(keys::EMAIL_TO), Some("ops@example.com"));
    assert_eq!(updated.params.get_str(keys::UI_HINT), Some("HOURS"));
}

#[tokio::test]
async fn invalid_update_leaves_job_untouched() {
    let (scheduler, _, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    let err = scheduler
        .update_job(&job.id, None, every(-5, UiHint::Seconds))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Translate(_)));
    assert_eq!(simple_interval(&scheduler.get_job(&job.id).await.unwrap()), 60);
}

#[tokio::test]
async fn blockout_duration_is_kept_with_the_job() {
    let (scheduler, _, _) = scheduler();
    let mut trigger = every(604_800, UiHint::Daily);
    trigger.timing_mut().duration_millis = 3_600_000;
    let params = JobParams::new().with(keys::ACTION_ID, BLOCKOUT_ACTION_ID);

    let job = scheduler
        .create_job("maintenance", "admin", params, trigger)
        .await
        .unwrap();

    assert_eq!(job.params.get_i64(keys::DURATION_MILLIS), Some(3_600_000));
    assert_eq!(job.trigger.unwrap().timing().duration_millis, 3_600_000);
}

#[tokio::test]
async fn list_jobs_returns_every_job() {
    let (scheduler, _, _) = scheduler();
    for name in ["a", "b", "c"] {
        scheduler
            .create_job(name, "admin", JobParams::new(), every(60, UiHint::Minutes))
            .await
            .unwrap();
    }

    let mut names: Vec<String> = scheduler
        .list_jobs()
        .await
        .unwrap()
        .into_iter()
        .map(|j| j.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_trigger_now_and_reads_stay_consistent() {
    let (scheduler, backend, _) = scheduler();
    let scheduler = Arc::new(scheduler);
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let writer = Arc::clone(&scheduler);
        let id = job.id.clone();
        handles.push(tokio::spawn(async move {
            writer.trigger_now(&id).await.map(|_| ())
        }));
        let reader = Arc::clone(&scheduler);
        let id = job.id.clone();
        handles.push(tokio::spawn(async move {
            let job = reader.get_job(&id).await?;
            assert!(job.trigger.is_some());
            Ok::<(), SchedulerError>(())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let triggers = backend.triggers_of_job(&job.key().unwrap()).await.unwrap();
    assert_eq!(triggers.iter().filter(|t| t.is_manual()).count(), 10);
}

#[tokio::test]
async fn out_of_range_complex_trigger_is_never_stored() {
    let (scheduler, backend, _) = scheduler();
    let trigger = JobTrigger::Complex(
        ComplexTrigger::new()
            .with_seconds(vec![RecurrenceRule::values([75])])
            .with_months(vec![RecurrenceRule::values([12])]),
    );
    let err = scheduler
        .create_job("digest", "admin", JobParams::new(), trigger)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Translate(_)), "{err:?}");
    assert!(backend.job_keys().await.unwrap().is_empty());
    assert!(scheduler.list_jobs().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_detail_write_on_update_restores_the_trigger() {
    let (scheduler, backend, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    backend.fail_detail_writes(true);
    let err = scheduler
        .update_job(&job.id, None, every(7_200, UiHint::Hours))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Backend(_)), "{err:?}");
    backend.fail_detail_writes(false);

    let key = job.key().unwrap();
    let triggers = backend.triggers_of_job(&key).await.unwrap();
    assert_eq!(
        triggers[0].schedule,
        BackendSchedule::Interval {
            value: 1,
            unit: IntervalUnit::Minute,
            repeat_count: -1,
        }
    );
    let fetched = scheduler.get_job(&job.id).await.unwrap();
    assert_eq!(simple_interval(&fetched), 60);
    assert_eq!(fetched.params.get_str(keys::UI_HINT), Some("MINUTES"));
}

#[tokio::test]
async fn failed_detail_write_on_trigger_now_withdraws_the_manual_trigger() {
    let (scheduler, backend, _) = scheduler();
    let job = scheduler
        .create_job("sales", "admin", JobParams::new(), every(60, UiHint::Minutes))
        .await
        .unwrap();

    backend.fail_detail_writes(true);
    assert!(scheduler.trigger_now(&job.id).await.is_err());
    backend.fail_detail_writes(false);

    let key = job.key().unwrap();
    let triggers = backend.triggers_of_job(&key).await.unwrap();
    assert_eq!(triggers.len(), 1);
    assert!(!triggers[0].is_manual());
    let detail = backend.job_detail(&key).await.unwrap().unwrap();
    assert!(!detail.params.contains(keys::LAST_MANUAL_FIRE));
}
