use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

mod job_submission {
    use super::*;

    #[tokio::test]
    async fn valid_text_is_queued() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::SUBMIT, &json!({ "text": "hello world" })).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "queued");

        let job_id = res.body["jobId"].as_str().unwrap();
        assert!(Uuid::parse_str(job_id).is_ok());
        assert_eq!(app.state.queue.name(), "text_jobs");
    }

    #[tokio::test]
    async fn stored_input_is_trimmed() {
        let app = TestApp::spawn().await;
        let id = app.submit("   padded text \n").await;

        let res = app.get(&routes::job(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["text_input"], "padded text");
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_creating_a_job() {
        let app = TestApp::spawn().await;

        for text in ["", "   ", "\n\t"] {
            let res = app.post(routes::SUBMIT, &json!({ "text": text })).await;
            assert_eq!(res.status, 400, "text {text:?}: {}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }

        let res = app.run_worker().await;
        assert_eq!(res.body["message"], "No messages in queue");
    }

    #[tokio::test]
    async fn blank_and_missing_messages() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::SUBMIT, &json!({})).await;
        assert_eq!(res.body["message"], "Text is required");

        let res = app.post(routes::SUBMIT, &json!({ "text": "   " })).await;
        assert_eq!(res.body["message"], "Text cannot be empty");

        let res = app.post(routes::SUBMIT, &json!({ "text": 12 })).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Text must be a string");
    }

    #[tokio::test]
    async fn over_length_text_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::SUBMIT, &json!({ "text": "a".repeat(10_001) }))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "Text exceeds maximum length of 10000 characters"
        );

        let res = app.run_worker().await;
        assert_eq!(res.body["message"], "No messages in queue");
    }

    #[tokio::test]
    async fn text_at_limit_is_accepted() {
        let app = TestApp::spawn().await;
        let res = app
            .post(routes::SUBMIT, &json!({ "text": "a".repeat(10_000) }))
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn configured_limit_is_used() {
        let app = TestApp::spawn_with(|c| c.submission.max_length = 5).await;
        let res = app.post(routes::SUBMIT, &json!({ "text": "toolong" })).await;
        assert_eq!(
            res.body["message"],
            "Text exceeds maximum length of 5 characters"
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let res = app.post_raw(routes::SUBMIT, "{ not json").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod job_status {
    use super::*;

    #[tokio::test]
    async fn submitted_job_is_returned_with_matching_id() {
        let app = TestApp::spawn().await;
        let id = app.submit("lookup me").await;

        let res = app.get(&routes::job(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["status"], "queued");
        assert!(res.body["result"].is_null());
        assert!(res.body["error_message"].is_null());
        assert!(res.body["processed_at"].is_null());
        assert!(res.body["created_at"].is_string());
        assert!(res.body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;
        let res = app.get(&routes::job(Uuid::new_v4())).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Job not found");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.get(&routes::job("not-a-uuid")).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_id_is_rejected() {
        let app = TestApp::spawn().await;
        for path in ["/api/jobs/", "/api/jobs"] {
            let res = app.get(path).await;
            assert_eq!(res.status, 400, "{path}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
            assert_eq!(res.body["message"], "Job ID is required");
        }
    }
}

mod api_docs {
    use super::*;

    #[tokio::test]
    async fn openapi_lists_every_route() {
        let app = TestApp::spawn().await;
        let res = app.get(routes::OPENAPI).await;
        assert_eq!(res.status, 200);

        let paths = res.body["paths"].as_object().expect("paths object");
        for path in [
            "/api/jobs/submit",
            "/api/jobs/{id}",
            "/api/hooks/job-status",
            "/api/worker/run",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
