use crate::e2e::helpers;

use helpers::fakes::{locator_for, output_uri_for, FakeBlobRepository, FakeSynthesisRepository};
use helpers::TestContext;
use polly_audiobook::domain::audiobook::AudiobookServiceApi;
use polly_audiobook::domain::book::Chapter;
use polly_audiobook::domain::tts::{
    AudioFormat, JobMonitor, MonitorSettings, RemoteJobStatus, RemoteTaskStatus, SynthesisJob,
};
use polly_audiobook::infrastructure::output::OutputDirectory;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn settings(poll_secs: u64, wait_secs: u64) -> MonitorSettings {
    MonitorSettings {
        poll_interval: Duration::from_secs(poll_secs),
        max_wait: Duration::from_secs(wait_secs),
        bucket: "books".to_string(),
    }
}

fn submitted(n: usize) -> SynthesisJob {
    SynthesisJob::submitted(
        Chapter::new(n, format!("Глава {}", n), "text"),
        format!("task-{}", n),
    )
}

fn scheduled() -> RemoteJobStatus {
    RemoteJobStatus {
        status: RemoteTaskStatus::Scheduled,
        output_uri: None,
        failure_reason: None,
    }
}

#[tokio::test(start_paused = true)]
async fn it_should_time_out_a_stuck_task() {
    let root = tempfile::tempdir().unwrap();
    let mut output = OutputDirectory::recreate(root.path().join("book"), AudioFormat::Mp3)
        .await
        .unwrap();
    let synthesis = Arc::new(
        FakeSynthesisRepository::new().script(1, vec![Ok(RemoteJobStatus::in_progress())]),
    );
    let blobs = Arc::new(FakeBlobRepository::new());
    let monitor = JobMonitor::new(synthesis.clone(), blobs.clone(), settings(1, 2));

    let start = Instant::now();
    let report = monitor
        .monitor_and_retrieve(vec![submitted(1)], &mut output)
        .await;
    let waited = start.elapsed();

    assert_eq!(report.timed_out.len(), 1);
    assert!(report.completed.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(synthesis.polls_of("task-1"), 3);
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));

    assert!(blobs.downloads().is_empty());
    assert!(blobs.deletes().is_empty());
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn it_should_follow_a_task_until_it_completes() {
    let root = tempfile::tempdir().unwrap();
    let mut output = OutputDirectory::recreate(root.path().join("book"), AudioFormat::Mp3)
        .await
        .unwrap();
    let synthesis = Arc::new(FakeSynthesisRepository::new().script(
        1,
        vec![
            Ok(scheduled()),
            Ok(RemoteJobStatus::in_progress()),
            Err("ServiceUnavailable".to_string()),
            Ok(RemoteJobStatus::in_progress()),
            Ok(RemoteJobStatus::completed(output_uri_for(1))),
        ],
    ));
    let blobs = Arc::new(FakeBlobRepository::new());
    let monitor = JobMonitor::new(synthesis.clone(), blobs.clone(), settings(10, 30 * 60));

    let start = Instant::now();
    let report = monitor
        .monitor_and_retrieve(vec![submitted(1)], &mut output)
        .await;

    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].error, None);
    assert_eq!(synthesis.polls_of("task-1"), 5);
    let waited = start.elapsed();
    assert!(waited >= Duration::from_secs(40) && waited < Duration::from_secs(50));
    assert_eq!(blobs.deletes(), vec![locator_for(1)]);
    assert!(output.path().join("Глава 1.mp3").is_file());
}

#[tokio::test(start_paused = true)]
async fn it_should_stop_polling_finished_tasks() {
    let root = tempfile::tempdir().unwrap();
    let mut output = OutputDirectory::recreate(root.path().join("book"), AudioFormat::Mp3)
        .await
        .unwrap();
    let synthesis = Arc::new(
        FakeSynthesisRepository::new()
            .script(1, vec![Ok(RemoteJobStatus::completed(output_uri_for(1)))])
            .script(2, vec![Ok(RemoteJobStatus::failed("Voice not available"))])
            .script(
                3,
                vec![
                    Ok(RemoteJobStatus::in_progress()),
                    Ok(RemoteJobStatus::in_progress()),
                    Ok(RemoteJobStatus::completed(output_uri_for(3))),
                ],
            ),
    );
    let blobs = Arc::new(FakeBlobRepository::new());
    let monitor = JobMonitor::new(synthesis.clone(), blobs.clone(), settings(5, 60));

    let report = monitor
        .monitor_and_retrieve(vec![submitted(1), submitted(2), submitted(3)], &mut output)
        .await;

    assert_eq!(synthesis.polls_of("task-1"), 1);
    assert_eq!(synthesis.polls_of("task-2"), 1);
    assert_eq!(synthesis.polls_of("task-3"), 3);
    assert_eq!(synthesis.total_polls(), 5);

    assert_eq!(report.completed.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(blobs.downloads(), vec![locator_for(1), locator_for(3)]);
    assert_eq!(blobs.deletes(), vec![locator_for(1), locator_for(3)]);
}

#[tokio::test(start_paused = true)]
async fn it_should_keep_polling_through_unknown_status_and_errors() {
    let root = tempfile::tempdir().unwrap();
    let mut output = OutputDirectory::recreate(root.path().join("book"), AudioFormat::Mp3)
        .await
        .unwrap();
    let synthesis = Arc::new(FakeSynthesisRepository::new().script(
        1,
        vec![
            Ok(RemoteJobStatus {
                status: RemoteTaskStatus::Unknown("paused".to_string()),
                output_uri: None,
                failure_reason: None,
            }),
            Err("RequestTimeout".to_string()),
        ],
    ));
    let blobs = Arc::new(FakeBlobRepository::new());
    let monitor = JobMonitor::new(synthesis.clone(), blobs.clone(), settings(1, 3));

    let report = monitor
        .monitor_and_retrieve(vec![submitted(1)], &mut output)
        .await;

    assert_eq!(synthesis.polls_of("task-1"), 4);
    assert_eq!(report.timed_out.len(), 1);
    assert!(report.timed_out[0]
        .error
        .as_deref()
        .unwrap()
        .contains("RequestTimeout"));
}

#[tokio::test(start_paused = true)]
async fn it_should_time_out_only_the_stuck_chapter() {
    let synthesis = FakeSynthesisRepository::new()
        .script(2, vec![Ok(RemoteJobStatus::in_progress())]);
    let ctx = TestContext::with_timing(
        synthesis,
        FakeBlobRepository::new(),
        Duration::from_secs(1),
        Duration::from_secs(2),
    );

    let report = ctx
        .service
        .narrate("Глава 1\nHello\nГлава 2\nWorld\nГлава 3\n!")
        .await
        .unwrap();

    assert_eq!(report.completed.len(), 2);
    assert_eq!(report.timed_out.len(), 1);
    assert_eq!(report.timed_out[0].chapter_index, 2);
    assert_eq!(report.timed_out[0].job_id.as_deref(), Some("task-2"));
    assert_eq!(ctx.output_files(), vec!["Глава 1.mp3", "Глава 3.mp3"]);
    assert!(!ctx.output_file("Глава 2").exists());
}

#[tokio::test(start_paused = true)]
async fn it_should_name_duplicate_titles_in_document_order() {
    let root = tempfile::tempdir().unwrap();
    let mut output = OutputDirectory::recreate(root.path().join("book"), AudioFormat::Mp3)
        .await
        .unwrap();
    let synthesis = Arc::new(
        FakeSynthesisRepository::new()
            .script(
                1,
                vec![
                    Ok(RemoteJobStatus::in_progress()),
                    Ok(RemoteJobStatus::completed(output_uri_for(1))),
                ],
            )
            .script(2, vec![Ok(RemoteJobStatus::completed(output_uri_for(2)))]),
    );
    let blobs = Arc::new(FakeBlobRepository::new());
    let monitor = JobMonitor::new(synthesis.clone(), blobs.clone(), settings(5, 60));

    let jobs = vec![
        SynthesisJob::submitted(Chapter::new(1, "Глава 1", "first"), "task-1"),
        SynthesisJob::submitted(Chapter::new(2, "Глава 1", "second"), "task-2"),
    ];
    let report = monitor.monitor_and_retrieve(jobs, &mut output).await;

    // The later chapter finished first
    assert_eq!(blobs.downloads(), vec![locator_for(2), locator_for(1)]);

    let path_of = |index: usize| {
        report
            .completed
            .iter()
            .find(|outcome| outcome.chapter_index == index)
            .and_then(|outcome| outcome.local_path.clone())
            .unwrap()
    };
    assert_eq!(path_of(1), output.path().join("Глава 1.mp3"));
    assert_eq!(path_of(2), output.path().join("Глава 1 (2).mp3"));
}

#[tokio::test]
async fn it_should_never_poll_a_rejected_job() {
    let root = tempfile::tempdir().unwrap();
    let mut output = OutputDirectory::recreate(root.path().join("book"), AudioFormat::Mp3)
        .await
        .unwrap();
    let synthesis = Arc::new(FakeSynthesisRepository::new());
    let blobs = Arc::new(FakeBlobRepository::new());
    let monitor = JobMonitor::new(synthesis.clone(), blobs.clone(), settings(1, 2));

    let rejected = SynthesisJob::rejected(Chapter::new(1, "Глава 1", "text"), "quota");
    let report = monitor.monitor_and_retrieve(vec![rejected], &mut output).await;

    assert_eq!(synthesis.total_polls(), 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.tasks_started, 0);
    assert_eq!(report.failed[0].error.as_deref(), Some("quota"));
}
