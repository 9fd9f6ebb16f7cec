pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::assessment::handlers;
use crate::state::AppState;

/// Open CORS: any origin, and `OPTIONS` preflights get an empty 200.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/generate-assessment",
            post(handlers::handle_generate_assessment),
        )
        .route(
            "/api/v1/assessments",
            get(handlers::handle_list_assessments).post(handlers::handle_create_assessment),
        )
        .route("/api/v1/assessments/:id", get(handlers::handle_get_assessment))
        .route(
            "/api/v1/assessments/:id/results",
            post(handlers::handle_submit_result),
        )
        .route("/api/v1/results", get(handlers::handle_list_results))
        .route(
            "/api/v1/results/:id/selection",
            patch(handlers::handle_update_selection),
        )
        .route("/api/v1/stats", get(handlers::handle_get_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::assessment::fallback::StaticSampleProvider;
    use crate::assessment::generator::tests::{completion, hooks_questions, FakeProvider, Reply};
    use crate::assessment::generator::{AssessmentGenerator, FailurePolicy};
    use crate::config::{Config, FailureMode};
    use crate::llm_client::DEFAULT_API_URL;

    fn test_config(failure_mode: FailureMode) -> Config {
        Config {
            database_url: "postgres://localhost/testera_test".to_string(),
            openai_api_key: Some("sk-test".to_string()),
            openai_api_url: DEFAULT_API_URL.to_string(),
            failure_mode,
            port: 0,
            rust_log: "error".to_string(),
        }
    }

    /// Router backed by a lazy pool (never connected) and a scripted provider.
    fn app(provider: Arc<FakeProvider>, on_failure: FailurePolicy) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/testera_test")
            .unwrap();
        app_with_pool(db, provider, on_failure)
    }

    fn app_with_pool(
        db: PgPool,
        provider: Arc<FakeProvider>,
        on_failure: FailurePolicy,
    ) -> Router {
        let config = test_config(match on_failure {
            FailurePolicy::Propagate => FailureMode::Propagate,
            FailurePolicy::Fallback(_) => FailureMode::Fallback,
        });
        build_router(AppState {
            db,
            generator: Arc::new(AssessmentGenerator::new(provider, on_failure)),
            config,
        })
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/generate-assessment")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "https://testera.example")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_validated_questions() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let response = app(provider.clone(), FailurePolicy::Propagate)
            .oneshot(generate_request(json!({ "topic": "React Hooks" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let body = json_body(response).await;
        assert_eq!(body, json!({ "questions": hooks_questions(5) }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_failure_is_generic_500() {
        let provider = FakeProvider::new(Reply::Text(completion(4)));
        let response = app(provider, FailurePolicy::Propagate)
            .oneshot(generate_request(json!({ "topic": "React Hooks" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to generate assessment");
        assert!(body.get("questions").is_none());
    }

    #[tokio::test]
    async fn test_generate_without_topic_is_400() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let response = app(provider.clone(), FailurePolicy::Propagate)
            .oneshot(generate_request(json!({ "companyDescription": "A bank" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_uses_fallback_when_upstream_is_down() {
        let provider = FakeProvider::new(Reply::Status(503));
        let response = app(
            provider,
            FailurePolicy::Fallback(Arc::new(StaticSampleProvider)),
        )
        .oneshot(generate_request(json!({ "skills": "Go", "jobTitle": "SRE" })))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_preflight_is_empty_200() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/generate-assessment")
            .header(header::ORIGIN, "https://testera.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization, content-type")
            .body(Body::empty())
            .unwrap();

        let response = app(provider.clone(), FailurePolicy::Propagate)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let response = app(provider, FailurePolicy::Propagate)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "testera-api");
        assert_eq!(body["fallback_enabled"], false);
    }

    #[tokio::test]
    async fn test_mistyped_body_gets_json_error() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let response = app(provider.clone(), FailurePolicy::Propagate)
            .oneshot(generate_request(json!({ "topic": 42 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid type"));
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unparseable_body_gets_json_error() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/generate-assessment")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"topic\": "))
            .unwrap();
        let response = app(provider, FailurePolicy::Propagate)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_query_and_path_get_json_errors() {
        for request in [
            get_request("/api/v1/assessments?user_id=not-a-uuid"),
            get_request("/api/v1/stats"),
            get_request("/api/v1/assessments/not-a-uuid"),
        ] {
            let provider = FakeProvider::new(Reply::Text(completion(5)));
            let response = app(provider, FailurePolicy::Propagate)
                .oneshot(request)
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = json_body(response).await;
            assert!(body["error"].is_string());
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_unknown_selection_status_is_400() {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let uri = format!("/api/v1/results/{}/selection", Uuid::new_v4());
        let response = app(provider, FailurePolicy::Propagate)
            .oneshot(json_request(Method::PATCH, &uri, json!({ "status": "maybe" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_submit_select_and_stats(pool: PgPool) {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let app = app_with_pool(pool, provider, FailurePolicy::Propagate);
        let user_id = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/assessments",
                json!({ "userId": user_id, "companyName": "Acme", "topic": "React Hooks" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let assessment = json_body(response).await;
        assert_eq!(assessment["questions"], json!(hooks_questions(5)));
        assert_eq!(assessment["is_ai_generated"], true);
        let assessment_id = assessment["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/assessments/{assessment_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["questions"], json!(hooks_questions(5)));

        // Correct answers are [1, 2, 3, 0, 1]; the last one is wrong.
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/assessments/{assessment_id}/results"),
                json!({ "userId": user_id, "answers": [1, 2, 3, 0, 0] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let result = json_body(response).await;
        assert_eq!(result["score"], 80);
        assert_eq!(result["company_selection_status"], "pending");
        let result_id = result["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/v1/results/{result_id}/selection"),
                json!({ "status": "selected", "message": "See you Monday" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let selected = json_body(response).await;
        assert_eq!(selected["company_selection_status"], "selected");
        assert_eq!(selected["selection_message"], "See you Monday");

        let response = app
            .oneshot(get_request(&format!("/api/v1/stats?user_id={user_id}")))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await,
            json!({
                "totalAssessments": 1,
                "completedTests": 1,
                "highestScore": 80,
                "pendingTests": 0
            })
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_assessment_is_404(pool: PgPool) {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let app = app_with_pool(pool, provider, FailurePolicy::Propagate);
        let missing = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/assessments/{missing}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(json_body(response).await["error"].is_string());

        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/assessments/{missing}/results"),
                json!({ "userId": Uuid::new_v4(), "answers": [0, 0, 0, 0, 0] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_with_wrong_answer_count_is_400(pool: PgPool) {
        let provider = FakeProvider::new(Reply::Text(completion(5)));
        let app = app_with_pool(pool, provider, FailurePolicy::Propagate);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/assessments",
                json!({ "userId": Uuid::new_v4(), "skills": "Go" }),
            ))
            .await
            .unwrap();
        let assessment_id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/assessments/{assessment_id}/results"),
                json!({ "userId": Uuid::new_v4(), "answers": [1, 2] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "VALIDATION_ERROR");
    }

}
