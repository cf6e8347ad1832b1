use std::net::SocketAddr;

use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;

use server::config::AppConfig;
use server::state::AppState;

pub mod routes {
    pub const SUBMIT: &str = "/api/jobs/submit";
    pub const HOOK: &str = "/api/hooks/job-status";
    pub const WORKER_RUN: &str = "/api/worker/run";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn job(id: impl std::fmt::Display) -> String {
        format!("/api/jobs/{id}")
    }
}

/// A running test server backed by in-memory stores.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.stale_jobs.enabled = false;
        configure(&mut config);

        Self::serve(AppState::in_memory(config)).await
    }

    pub async fn serve(state: AppState) -> Self {
        let app = server::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_signature(
        &self,
        path: &str,
        body: &Value,
        signature: &str,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("x-webhook-signature", signature)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw_with_signature(
        &self,
        path: &str,
        body: &'static str,
        signature: &str,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .header("x-webhook-signature", signature)
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Submit text and return the new job id.
    pub async fn submit(&self, text: &str) -> String {
        let res = self
            .post(routes::SUBMIT, &serde_json::json!({ "text": text }))
            .await;
        assert_eq!(res.status, 201, "Submission failed: {}", res.text);
        res.body["jobId"]
            .as_str()
            .expect("jobId should be a string")
            .to_string()
    }

    pub async fn run_worker(&self) -> TestResponse {
        self.post(routes::WORKER_RUN, &Value::Null).await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
