use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

fn notification(job_id: Uuid) -> serde_json::Value {
    json!({
        "type": "UPDATE",
        "table": "jobs",
        "schema": "public",
        "record": { "id": job_id, "status": "completed" },
        "old_record": { "id": job_id, "status": "processing" },
    })
}

mod webhook_auth {
    use super::*;

    #[tokio::test]
    async fn open_when_no_secret_configured() {
        let app = TestApp::spawn().await;
        let res = app.post(routes::HOOK, &notification(Uuid::new_v4())).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
    }

    #[tokio::test]
    async fn requires_matching_signature() {
        let app = TestApp::spawn_with(|c| c.webhook.secret = Some("s3cret".into())).await;
        let body = notification(Uuid::new_v4());

        let res = app.post(routes::HOOK, &body).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");

        let res = app.post_with_signature(routes::HOOK, &body, "wrong").await;
        assert_eq!(res.status, 401);

        let res = app.post_with_signature(routes::HOOK, &body, "s3cret").await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn signature_checked_before_body() {
        let app = TestApp::spawn_with(|c| c.webhook.secret = Some("s3cret".into())).await;

        let res = app
            .post_raw_with_signature(routes::HOOK, r#"{"table":1"#, "wrong")
            .await;
        assert_eq!(res.status, 401, "{}", res.text);
        assert_eq!(res.body["code"], "UNAUTHORIZED");

        let res = app
            .post_raw_with_signature(routes::HOOK, "", "wrong")
            .await;
        assert_eq!(res.status, 401);

        let res = app
            .post_raw_with_signature(routes::HOOK, r#"{"table":1"#, "s3cret")
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.post_raw(routes::HOOK, "").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Missing webhook payload");
    }

    #[tokio::test]
    async fn null_payload_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.post(routes::HOOK, &serde_json::Value::Null).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Missing webhook payload");
    }
}

mod webhook_events {
    use super::*;

    #[tokio::test]
    async fn events_saved_when_enabled() {
        let app = TestApp::spawn_with(|c| c.webhook.save_events = true).await;
        let job_id = Uuid::new_v4();

        let res = app.post(routes::HOOK, &notification(job_id)).await;
        assert_eq!(res.status, 200);

        let events = app.state.events.list_for_job(job_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "UPDATE");
        assert_eq!(events[0].payload["table"], "jobs");
    }

    #[tokio::test]
    async fn saved_event_keeps_extra_fields() {
        let app = TestApp::spawn_with(|c| c.webhook.save_events = true).await;
        let job_id = Uuid::new_v4();
        let mut body = notification(job_id);
        body["created_at"] = json!("2024-01-01T00:00:00Z");
        body["x-webhook-id"] = json!("wh_1");

        let res = app.post(routes::HOOK, &body).await;
        assert_eq!(res.status, 200);

        let events = app.state.events.list_for_job(job_id).await.unwrap();
        assert_eq!(events[0].payload["created_at"], "2024-01-01T00:00:00Z");
        assert_eq!(events[0].payload, body);
    }

    #[tokio::test]
    async fn odd_typed_fields_are_acknowledged() {
        let app = TestApp::spawn_with(|c| c.webhook.save_events = true).await;
        let job_id = Uuid::new_v4();

        for body in [
            json!({ "type": 5, "record": { "id": job_id, "status": "completed" } }),
            json!({ "table": 1 }),
            json!(["not", "an", "object"]),
        ] {
            let res = app.post(routes::HOOK, &body).await;
            assert_eq!(res.status, 200, "{body}: {}", res.text);
            assert_eq!(res.body["success"], true);
        }

        let events = app.state.events.list_for_job(job_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "UPDATE");
    }

    #[tokio::test]
    async fn events_not_saved_by_default() {
        let app = TestApp::spawn().await;
        let job_id = Uuid::new_v4();

        app.post(routes::HOOK, &notification(job_id)).await;

        assert!(app.state.events.list_for_job(job_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_without_id_is_still_acknowledged() {
        let app = TestApp::spawn_with(|c| c.webhook.save_events = true).await;
        let res = app
            .post(routes::HOOK, &json!({ "type": "DELETE", "record": null }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
    }
}
