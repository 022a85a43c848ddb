mod common;

use std::sync::atomic::Ordering;

use uuid::Uuid;

use reportgen_core::models::job::JobDescriptor;
use reportgen_core::models::report::ReportStatus;
use reportgen_worker::error::SubmitError;
use reportgen_worker::submit::request_report;

use common::{FakeQueue, InMemoryReports, QUEUE_URL};

#[tokio::test]
async fn request_creates_row_and_enqueues_descriptor() {
    let reports = InMemoryReports::default();
    let queue = FakeQueue::default();
    let user_id = Uuid::new_v4();

    let report = request_report(&reports, &queue, QUEUE_URL, user_id, "monsters")
        .await
        .unwrap();

    assert_eq!(report.user_id, user_id);
    assert_eq!(report.report_type, "monsters");
    assert_eq!(report.status(), ReportStatus::Requested);
    assert_eq!(reports.get(user_id, report.id), Some(report.clone()));

    let sent = queue.sent();
    assert_eq!(sent.len(), 1);
    let job = JobDescriptor::from_body(Some(&sent[0])).unwrap();
    assert_eq!(job, JobDescriptor::new(user_id, report.id));
}

#[tokio::test]
async fn blank_report_type_is_rejected() {
    let reports = InMemoryReports::default();
    let queue = FakeQueue::default();

    let err = request_report(&reports, &queue, QUEUE_URL, Uuid::new_v4(), "  ")
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::InvalidRequest(_)));
    assert_eq!(reports.len(), 0);
    assert!(queue.sent().is_empty());
}

#[tokio::test]
async fn enqueue_failure_is_reported() {
    let reports = InMemoryReports::default();
    let queue = FakeQueue::default();
    queue.fail_sends.store(true, Ordering::SeqCst);

    let err = request_report(&reports, &queue, QUEUE_URL, Uuid::new_v4(), "monsters")
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Queue(_)));
    // The requested row stays behind and is never picked up.
    assert_eq!(reports.len(), 1);
}

#[tokio::test]
async fn create_failure_enqueues_nothing() {
    let reports = InMemoryReports::default();
    reports.fail_creates.store(true, Ordering::SeqCst);
    let queue = FakeQueue::default();

    let err = request_report(&reports, &queue, QUEUE_URL, Uuid::new_v4(), "monsters")
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Persistence(_)));
    assert!(queue.sent().is_empty());
}
