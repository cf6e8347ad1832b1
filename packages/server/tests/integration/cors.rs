use crate::common::{TestApp, routes};

#[tokio::test]
async fn preflight_allows_any_origin_and_listed_headers() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .request(reqwest::Method::OPTIONS, app.url(routes::SUBMIT))
        .header("Origin", "https://example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type,x-csrf-token")
        .send()
        .await
        .expect("Failed to send preflight");

    assert!(res.status().is_success());
    let headers = res.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");

    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    for method in ["GET", "OPTIONS", "PATCH", "DELETE", "POST", "PUT"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }

    let allowed = headers["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    for header in ["x-csrf-token", "content-type", "x-api-version", "content-md5"] {
        assert!(allowed.contains(header), "missing {header} in {allowed}");
    }
    assert_eq!(headers["access-control-max-age"], "86400");
}

#[tokio::test]
async fn simple_response_carries_origin_header() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .get(app.url(&routes::job(uuid::Uuid::new_v4())))
        .header("Origin", "https://example.com")
        .send()
        .await
        .expect("Failed to send GET");

    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn restricted_origins_are_echoed_only_when_listed() {
    let app = TestApp::spawn_with(|c| {
        c.server.cors.allow_origins = vec!["https://app.example.com".into()]
    })
    .await;

    let allowed = app
        .client
        .get(app.url(routes::OPENAPI))
        .header("Origin", "https://app.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );

    let denied = app
        .client
        .get(app.url(routes::OPENAPI))
        .header("Origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
