use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Institution, MockConfig};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_institutions_empty() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/institutions").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let institutions: Vec<Institution> = body_json(resp).await;
    assert!(institutions.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_institution_returns_200() {
    let resp = app()
        .oneshot(json_request("POST", "/api/institutions", r#"{"name":"Alpha University"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let institution: Institution = body_json(resp).await;
    assert_eq!(institution.name, "Alpha University");
    assert_eq!(institution.id, 1);
}

#[tokio::test]
async fn create_institution_blank_name_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/institutions", r#"{"name":"   "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_institution_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/institutions", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_institution_injected_failure_returns_500() {
    let resp = app_with(MockConfig::default().fail_on("Flaky College"))
        .oneshot(json_request("POST", "/api/institutions", r#"{"name":"Flaky College"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app_with(MockConfig::default().with_token("secret"))
        .oneshot(json_request("POST", "/api/institutions", r#"{"name":"Alpha"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn wrong_token_returns_401_before_body_validation() {
    let resp = app_with(MockConfig::default().with_token("secret"))
        .oneshot(authed("POST", "/api/institutions", "stale", "not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_is_accepted() {
    let resp = app_with(MockConfig::default().with_token("secret"))
        .oneshot(authed("POST", "/api/institutions", "secret", r#"{"name":"Alpha"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- get / delete ---

#[tokio::test]
async fn get_institution_not_found() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/institutions/99").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_institution_bad_id_returns_400() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/institutions/not-a-number")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_institution_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/institutions/1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn institution_lifecycle() {
    use tower::Service;

    let mut app = app_with(MockConfig::default().with_token("secret")).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("POST", "/api/institutions", "secret", r#"{"name":"Beta Institute"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Institution = body_json(resp).await;
    let id = created.id;

    // duplicate, compared without case
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("POST", "/api/institutions", "secret", r#"{"name":"beta institute"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/institutions", "secret", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let institutions: Vec<Institution> = body_json(resp).await;
    assert_eq!(institutions.len(), 1);
    assert_eq!(institutions[0].id, id);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/api/institutions/{id}"), "secret", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Institution = body_json(resp).await;
    assert_eq!(fetched.name, "Beta Institute");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("DELETE", &format!("/api/institutions/{id}"), "secret", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/api/institutions/{id}"), "secret", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
