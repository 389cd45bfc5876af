pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route("/api/v1/resumes/ai", post(handlers::handle_create_ai))
        .route("/api/v1/resumes/import", post(handlers::handle_import))
        .route(
            "/api/v1/resumes/import/profile",
            post(handlers::handle_import_profile),
        )
        .route(
            "/api/v1/resumes/public/:username/:slug",
            get(handlers::handle_get_public),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get)
                .patch(handlers::handle_update)
                .delete(handlers::handle_remove),
        )
        .route("/api/v1/resumes/:id/lock", patch(handlers::handle_lock))
        .route(
            "/api/v1/resumes/:id/statistics",
            get(handlers::handle_statistics),
        )
        .route("/api/v1/resumes/:id/print", get(handlers::handle_print))
        .route("/api/v1/resumes/:id/preview", get(handlers::handle_preview))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::enrichment::HttpProfileEnricher;
    use crate::llm_client::MockTextGenerator;
    use crate::models::user::UserProfile;
    use crate::printer::MockRenderer;
    use crate::resume::memory::InMemoryStore;
    use crate::resume::service::{Collaborators, ResumeService};
    use crate::storage::MockArtifactStorage;

    fn app() -> (Router, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let owner = store.add_user(
            "jane",
            UserProfile {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                picture: None,
            },
        );

        let mut storage = MockArtifactStorage::new();
        storage.expect_delete_object().returning(|_, _, _| Ok(()));
        let mut printer = MockRenderer::new();
        printer
            .expect_print_resume()
            .returning(|r| Ok(format!("https://cdn.example.com/{}.pdf", r.id)));

        let resumes = ResumeService::new(Collaborators {
            resumes: store.clone(),
            statistics: store.clone(),
            users: store,
            generator: Arc::new(MockTextGenerator::new()),
            storage: Arc::new(storage),
            printer: Arc::new(printer),
        });
        let state = AppState {
            resumes: Arc::new(resumes),
            enricher: Arc::new(HttpProfileEnricher::new(reqwest::Client::new(), None)),
        };
        (build_router(state), owner)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let (app, owner) = app();
        let (status, created) = send(
            &app,
            "POST",
            &format!("/api/v1/resumes?user_id={owner}"),
            Some(json!({"title": "Engineer Resume"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["slug"], "engineer-resume");
        assert_eq!(created["visibility"], "private");

        let id = created["id"].as_str().unwrap();
        let (status, fetched) =
            send(&app, "GET", &format!("/api/v1/resumes/{id}?user_id={owner}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["basics"]["name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_locked_update_returns_423() {
        let (app, owner) = app();
        let (_, created) = send(
            &app,
            "POST",
            &format!("/api/v1/resumes?user_id={owner}"),
            Some(json!({"title": "Frozen"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/v1/resumes/{id}/lock?user_id={owner}"),
            Some(json!({"set": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/v1/resumes/{id}?user_id={owner}"),
            Some(json!({"title": "Thawed"})),
        )
        .await;
        assert_eq!(status, StatusCode::LOCKED);
        assert_eq!(body["error"]["code"], "RESUME_LOCKED");
    }

    #[tokio::test]
    async fn test_public_read_and_anonymous_download_are_counted() {
        let (app, owner) = app();
        let (_, created) = send(
            &app,
            "POST",
            &format!("/api/v1/resumes?user_id={owner}"),
            Some(json!({"title": "Open Book", "visibility": "public"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(&app, "GET", "/api/v1/resumes/public/jane/open-book", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, printed) =
            send(&app, "GET", &format!("/api/v1/resumes/{id}/print"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(printed["url"].as_str().unwrap().ends_with(".pdf"));

        let (_, stats) = send(
            &app,
            "GET",
            &format!("/api/v1/resumes/{id}/statistics?user_id={owner}"),
            None,
        )
        .await;
        assert_eq!(stats, json!({"views": 1, "downloads": 1}));
    }

    #[tokio::test]
    async fn test_private_resume_cannot_be_printed_anonymously() {
        let (app, owner) = app();
        let (_, created) = send(
            &app,
            "POST",
            &format!("/api/v1/resumes?user_id={owner}"),
            Some(json!({"title": "Secret"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, body) =
            send(&app, "GET", &format!("/api/v1/resumes/{id}/print"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_remove_then_fetch_is_404() {
        let (app, owner) = app();
        let (_, created) = send(
            &app,
            "POST",
            &format!("/api/v1/resumes?user_id={owner}"),
            Some(json!({"title": "Short Lived"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();
        let uri = format!("/api/v1/resumes/{id}?user_id={owner}");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_slug_returns_409() {
        let (app, owner) = app();
        let uri = format!("/api/v1/resumes?user_id={owner}");
        send(&app, "POST", &uri, Some(json!({"title": "Twin"}))).await;
        let (status, body) = send(&app, "POST", &uri, Some(json!({"title": "twin"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_profile_import_unconfigured_returns_501() {
        let (app, _) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/resumes/import/profile",
            Some(json!({"profile_url": "https://www.linkedin.com/in/jane"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }
}
