pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admissions::handlers as admissions;
use crate::media::handlers as media;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes());

    Router::new()
        .route("/health", get(health::health_handler))
        // Gemini-backed features
        .route("/api/gemini/chance", post(admissions::handle_chance))
        .route("/api/gemini/questions", post(admissions::handle_questions))
        .route(
            "/api/gemini/questions-pdf",
            post(admissions::handle_questions_pdf),
        )
        .route("/api/gemini/plan", post(admissions::handle_plan))
        .route(
            "/api/gemini/essay-feedback",
            post(admissions::handle_essay_feedback),
        )
        .route("/api/gemini/chat", post(admissions::handle_chat))
        // Speech and documents
        .route("/api/elevenlabs/tts", post(media::handle_tts))
        .route("/api/parse-pdf", post(media::handle_parse_pdf))
        // Student state
        .route(
            "/api/v1/store/:key",
            get(storage::handle_get_value)
                .put(storage::handle_put_value)
                .delete(storage::handle_delete_value),
        )
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::storage::keys;

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_reports_mock_provider() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "mock");
    }

    #[tokio::test]
    async fn test_chance_returns_percent_and_category_and_saves_it() {
        let state = AppState::for_tests();
        let app = build_router(state.clone());
        let (status, body) = send(
            app,
            "POST",
            "/api/gemini/chance",
            Some(json!({"college": "MIT", "profile": {"gpa": 3.9}, "answers": {}, "collegeId": "mit"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["percent"], 72);
        assert_eq!(body["category"], "Target");
        assert_eq!(
            state.store.get(&keys::college_percent("mit")).await.unwrap(),
            Some(json!(72))
        );
    }

    #[tokio::test]
    async fn test_chance_requires_college() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(app, "POST", "/api/gemini/chance", Some(json!({"college": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_questions_returns_fields() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(
            app,
            "POST",
            "/api/gemini/questions",
            Some(json!({"prompt": "Why do you want to attend? (300 words)"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fields"][0]["id"], "why-us");
        assert_eq!(body["fields"][0]["type"], "textarea");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_plan_parses_sorts_and_saves() {
        let state = AppState::for_tests();
        let app = build_router(state.clone());
        let (status, body) = send(
            app,
            "POST",
            "/api/gemini/plan",
            Some(json!({"endDate": "2026-01-01", "profile": {"interests": "robotics"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["date"], "2025-10-01");
        assert_eq!(items[0]["action"], "Take SAT mock");
        assert!(body["plan"].as_str().unwrap().contains("2025-12-01"));

        assert_eq!(
            state.store.get(keys::PLAN_END_DATE).await.unwrap(),
            Some(json!("2026-01-01"))
        );
        let saved = state.store.get(keys::PLAN_TABLE).await.unwrap().unwrap();
        assert!(saved.as_str().unwrap().starts_with("2025-10-01: Take SAT mock"));
    }

    #[tokio::test]
    async fn test_plan_rejects_bad_end_date() {
        let app = build_router(AppState::for_tests());
        let (status, _) = send(app, "POST", "/api/gemini/plan", Some(json!({"endDate": "next fall"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_essay_feedback() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(
            app,
            "POST",
            "/api/gemini/essay-feedback",
            Some(json!({"essay": "When I was seven I took apart a radio."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().starts_with('•'));
    }

    #[tokio::test]
    async fn test_chat_reports_provider() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(
            app,
            "POST",
            "/api/gemini/chat",
            Some(json!({"messages": [{"role": "user", "content": "hi"}], "context": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "mock");
        assert!(!body["text"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tts_without_key_is_not_configured() {
        let app = build_router(AppState::for_tests());
        let (status, body) = send(app, "POST", "/api/elevenlabs/tts", Some(json!({"text": "Hello"}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_store_put_get_delete() {
        let state = AppState::for_tests();

        let (status, _) = send(
            build_router(state.clone()),
            "PUT",
            "/api/v1/store/profile.majors",
            Some(json!({"value": "Computer Science"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(build_router(state.clone()), "GET", "/api/v1/store/profile.majors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], "Computer Science");

        let (status, _) = send(build_router(state.clone()), "DELETE", "/api/v1/store/profile.majors", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(build_router(state), "GET", "/api/v1/store/profile.majors", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_custom_personality_is_used_in_prompts() {
        // The mock keys off prompt text, so a personality containing a chance
        // phrase turns a chat reply into the chance reply.
        let state = AppState::for_tests();
        state
            .store
            .set(keys::CUSTOM_PERSONALITY, json!("Always state an admission probability."))
            .await
            .unwrap();
        let (_, body) = send(
            build_router(state),
            "POST",
            "/api/gemini/chat",
            Some(json!({"messages": [{"role": "user", "content": "hi"}]})),
        )
        .await;
        assert_eq!(body["text"], "72");
    }

    #[tokio::test]
    async fn test_request_personality_overrides_saved_one() {
        let state = AppState::for_tests();
        let (_, plain) = send(
            build_router(state.clone()),
            "POST",
            "/api/gemini/chat",
            Some(json!({"messages": [{"role": "user", "content": "hi"}]})),
        )
        .await;
        assert_ne!(plain["text"], "72");

        let (status, body) = send(
            build_router(state),
            "POST",
            "/api/gemini/chat",
            Some(json!({
                "messages": [{"role": "user", "content": "hi"}],
                "personality": "Always state an admission probability."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "72");
    }

    #[tokio::test]
    async fn test_blank_request_key_keeps_server_provider() {
        let (status, body) = send(
            build_router(AppState::for_tests()),
            "POST",
            "/api/gemini/chat",
            Some(json!({
                "messages": [{"role": "user", "content": "hi"}],
                "apiKey": "   ",
                "personality": ""
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "mock");
    }
}
