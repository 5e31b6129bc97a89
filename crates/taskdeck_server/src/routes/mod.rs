use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{config::ConfigError, state::AppState};

pub mod projects;
pub mod sections;
pub mod todos;

pub async fn health_check() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Browser access is limited to the configured origins.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .merge(todos::router())
        .merge(projects::router())
        .merge(sections::router());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use taskdeck_core::open_db_in_memory;
    use tower::ServiceExt;

    use super::{cors_layer, router};
    use crate::state::AppState;

    fn app() -> Router {
        let conn = open_db_in_memory().unwrap();
        let cors = cors_layer(&["http://localhost:5173".to_string()]).unwrap();
        router(AppState::new(conn), cors)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
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
    async fn health_reports_ok() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn todo_soft_delete_restore_and_cleanup_flow() {
        let app = app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/todos",
            Some(json!({ "title": "Buy milk" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "PENDING");
        assert_eq!(created["completed"], false);
        assert_eq!(created["priority"], "MEDIUM");
        assert_eq!(created["deletedAt"], Value::Null);
        let id = created["id"].as_i64().unwrap();

        let (status, deleted) = send(&app, Method::DELETE, &format!("/api/todos/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(deleted["deletedAt"].is_string());

        let (_, live) = send(&app, Method::GET, "/api/todos", None).await;
        assert_eq!(live, json!([]));

        let (_, all) = send(&app, Method::GET, "/api/todos?includeDeleted=1", None).await;
        assert_eq!(all.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::GET, &format!("/api/todos/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/todos/{id}?includeDeleted=true"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, restored) = send(
            &app,
            Method::POST,
            &format!("/api/todos/{id}/restore"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(restored["deletedAt"], Value::Null);

        send(&app, Method::DELETE, &format!("/api/todos/{id}"), None).await;
        let (status, report) = send(&app, Method::POST, "/api/todos/cleanup", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report, json!({ "deleted": 1 }));

        let (_, report) = send(&app, Method::POST, "/api/todos/cleanup", None).await;
        assert_eq!(report, json!({ "deleted": 0 }));
    }

    #[tokio::test]
    async fn todo_validation_and_not_found_use_error_body() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/todos",
            Some(json!({ "title": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/todos/41",
            Some(json!({ "title": "Nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "todo not found: 41");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/todos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn todo_list_filters_by_status_and_search() {
        let app = app();
        for body in [
            json!({ "title": "Buy milk" }),
            json!({ "title": "Finish layout", "description": "Landing hero + form" }),
            json!({ "title": "Call client", "status": "DONE" }),
        ] {
            send(&app, Method::POST, "/api/todos", Some(body)).await;
        }

        let (_, done) = send(&app, Method::GET, "/api/todos?status=DONE", None).await;
        assert_eq!(done.as_array().unwrap().len(), 1);
        assert_eq!(done[0]["completed"], true);

        let (_, found) = send(&app, Method::GET, "/api/todos?search=hero", None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["title"], "Finish layout");

        let (_, newest_first) = send(&app, Method::GET, "/api/todos", None).await;
        assert_eq!(newest_first[0]["title"], "Call client");

        let (status, _) = send(&app, Method::GET, "/api/todos?status=LATER", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn project_archive_lifecycle() {
        let app = app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(json!({ "name": "Home", "archived": true })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["archived"], false);
        assert_eq!(created["_count"]["sections"], 0);
        let home = created["id"].as_i64().unwrap();

        let (_, work) = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(json!({ "name": "Work" })),
        )
        .await;

        let (status, archived) = send(
            &app,
            Method::POST,
            &format!("/api/projects/{home}/archive"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(archived["archived"], true);

        let (_, visible) = send(&app, Method::GET, "/api/projects", None).await;
        assert_eq!(visible.as_array().unwrap().len(), 1);
        assert_eq!(visible[0]["id"], work["id"]);

        let (_, all) = send(&app, Method::GET, "/api/projects?includeArchived=yes", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, report) =
            send(&app, Method::POST, "/api/projects/cleanup/archived", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report, json!({ "deleted": 1 }));

        let (status, _) = send(&app, Method::GET, &format!("/api/projects/{home}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn project_update_and_delete() {
        let app = app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(json!({ "name": "Home" })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/projects/{id}"),
            Some(json!({ "color": "#00ff00", "archived": "1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["color"], "#00ff00");
        assert_eq!(updated["archived"], true);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/projects/{id}"),
            Some(json!({ "color": "green" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        let (status, body) =
            send(&app, Method::DELETE, &format!("/api/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sections_require_project_and_detach_todos_on_delete() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sections",
            Some(json!({ "name": "Kitchen", "projectId": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        let (_, project) = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(json!({ "name": "Home" })),
        )
        .await;
        let project_id = project["id"].as_i64().unwrap();

        let (status, section) = send(
            &app,
            Method::POST,
            "/api/sections",
            Some(json!({ "name": "Kitchen", "projectId": project_id, "position": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(section["project"]["name"], "Home");
        assert_eq!(section["_count"]["todos"], 0);
        let section_id = section["id"].as_i64().unwrap();

        let (_, todo) = send(
            &app,
            Method::POST,
            "/api/todos",
            Some(json!({ "title": "Buy milk", "sectionId": section_id })),
        )
        .await;
        assert_eq!(todo["section"]["name"], "Kitchen");

        let (_, listed) = send(
            &app,
            Method::GET,
            &format!("/api/sections?projectId={project_id}"),
            None,
        )
        .await;
        assert_eq!(listed[0]["_count"]["todos"], 1);

        let (status, detail) =
            send(&app, Method::GET, &format!("/api/sections/{section_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["todos"].as_array().unwrap().len(), 1);

        let (status, _) =
            send(&app, Method::DELETE, &format!("/api/sections/{section_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let todo_id = todo["id"].as_i64().unwrap();
        let (status, orphan) = send(&app, Method::GET, &format!("/api/todos/{todo_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(orphan["sectionId"], Value::Null);
        assert_eq!(orphan["section"], Value::Null);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let app = app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/todos")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("http://localhost:5173")
        );
    }
}
