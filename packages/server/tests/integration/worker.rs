use std::time::Duration;

use ::common::JobStatus;
use uuid::Uuid;

use crate::common::{TestApp, routes};

mod worker_trigger {
    use super::*;

    #[tokio::test]
    async fn idle_queue_reports_no_messages() {
        let app = TestApp::spawn().await;
        let res = app.run_worker().await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "No messages in queue");
        assert!(res.body.get("jobId").is_none());
    }

    #[tokio::test]
    async fn submitted_job_is_uppercased() {
        let app = TestApp::spawn().await;
        let id = app.submit("hello world").await;

        let res = app.run_worker().await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Job processed successfully");
        assert_eq!(res.body["jobId"], id.as_str());
        assert_eq!(res.body["status"], "completed");
        assert!(res.body["msgId"].is_i64());

        let job = app.get(&routes::job(&id)).await;
        assert_eq!(job.body["status"], "completed");
        assert_eq!(job.body["result"], "HELLO WORLD");
        assert!(job.body["error_message"].is_null());
        assert!(job.body["processed_at"].is_string());

        let res = app.run_worker().await;
        assert_eq!(res.body["message"], "No messages in queue");
    }

    #[tokio::test]
    async fn jobs_are_processed_in_submission_order() {
        let app = TestApp::spawn().await;
        let first = app.submit("first").await;
        let second = app.submit("second").await;

        assert_eq!(app.run_worker().await.body["jobId"], first.as_str());
        assert_eq!(app.run_worker().await.body["jobId"], second.as_str());
    }

    #[tokio::test]
    async fn deleted_job_drops_its_message() {
        let app = TestApp::spawn().await;
        let id = app.submit("about to vanish").await;
        let job_id: Uuid = id.parse().unwrap();
        assert!(app.state.jobs.delete(job_id).await.unwrap());

        let res = app.run_worker().await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Job not found");

        assert_eq!(app.get(&routes::job(&id)).await.status, 404);
        let res = app.run_worker().await;
        assert_eq!(res.body["message"], "No messages in queue");
    }

    #[tokio::test]
    async fn already_finished_job_is_not_touched_again() {
        let app = TestApp::spawn().await;
        let id = app.submit("once").await;
        app.run_worker().await;
        let before = app.get(&routes::job(&id)).await.body;

        app.state.queue.enqueue(id.parse().unwrap()).await.unwrap();
        let res = app.run_worker().await;
        assert_eq!(res.status, 500);

        assert_eq!(app.get(&routes::job(&id)).await.body, before);
        let res = app.run_worker().await;
        assert_eq!(res.body["message"], "No messages in queue");
    }
}

mod embedded_worker {
    use super::*;

    #[tokio::test]
    async fn loop_processes_jobs_without_trigger() {
        let app = TestApp::spawn().await;
        let worker = app.state.worker.clone();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            worker
                .run_loop(Duration::from_millis(10), async {
                    let _ = stopped.await;
                })
                .await;
        });

        let id = app.submit("background").await;
        let job_id: Uuid = id.parse().unwrap();

        let mut status = JobStatus::Queued;
        for _ in 0..100 {
            status = app.state.jobs.get(job_id).await.unwrap().unwrap().status;
            if status == JobStatus::Completed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(status, JobStatus::Completed);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }
}
