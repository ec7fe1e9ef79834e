//! API Router with OpenAPI document

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::FromRef, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use super::modules::users::{
    self, AppUserService, CreateUserRequest, UpdateUserRequest, UserDto, UserHandlerState,
    UserPageDto,
};

/// Unified router state. Axum extracts each handler's own state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<AppUserService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(user_service: Arc<AppUserService>, db: DatabaseConnection) -> Self {
        Self {
            user_service,
            db,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Users Backend API", description = "User CRUD with role assignment"),
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::list_users_page,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            UserDto,
            UserPageDto,
            CreateUserRequest,
            UpdateUserRequest,
            HealthResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Users", description = "User management"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the REST API router
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Users
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/api/users/page/{page}", get(users::list_users_page))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // OpenAPI
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::identity::UserService;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{BcryptPasswordHasher, SeaOrmTransactionManager};

    async fn test_router() -> Router {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let service = UserService::new(
            Arc::new(SeaOrmTransactionManager::new(db.clone())),
            Arc::new(BcryptPasswordHasher::new(4)),
        );
        create_api_router(AppState::new(Arc::new(service), db))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn ana() -> Value {
        json!({
            "name": "Ana",
            "lastname": "Lopez",
            "username": "ana",
            "email": "ana@example.com",
            "password": "pw123"
        })
    }

    #[tokio::test]
    async fn create_then_get() {
        let router = test_router().await;

        let (status, body) = send(&router, Method::POST, "/api/users", Some(ana())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["roles"], json!(["ROLE_USER"]));
        assert!(body["data"].get("password").is_none());

        let (status, body) = send(&router, Method::GET, "/api/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "ana");
    }

    #[tokio::test]
    async fn missing_user_is_404() {
        let router = test_router().await;

        let (status, body) = send(&router, Method::GET, "/api/users/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let update = json!({
            "name": "X", "lastname": "Y", "username": "x", "email": "x@example.com"
        });
        let (status, _) = send(&router, Method::PUT, "/api/users/9", Some(update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_grants_admin() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/users", Some(ana())).await;

        let update = json!({
            "name": "Ana2",
            "lastname": "Lopez",
            "username": "ana",
            "email": "ana@example.com",
            "admin": true
        });
        let (status, body) = send(&router, Method::PUT, "/api/users/1", Some(update)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Ana2");
        assert_eq!(body["data"]["admin"], true);
        assert_eq!(body["data"]["roles"], json!(["ROLE_USER", "ROLE_ADMIN"]));
    }

    #[tokio::test]
    async fn duplicate_create_is_409() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/users", Some(ana())).await;

        let (status, body) = send(&router, Method::POST, "/api/users", Some(ana())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn delete_is_204_even_when_absent() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/users", Some(ana())).await;

        let (status, _) = send(&router, Method::DELETE, "/api/users/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, Method::DELETE, "/api/users/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, Method::GET, "/api/users/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_and_page() {
        let router = test_router().await;
        for name in ["carl", "ana", "bob"] {
            let user = json!({
                "name": name,
                "lastname": "X",
                "username": name,
                "email": format!("{}@example.com", name),
                "password": "pw"
            });
            send(&router, Method::POST, "/api/users", Some(user)).await;
        }

        let (status, body) = send(&router, Method::GET, "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/users/page/0?size=2&sort=username&direction=desc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"][0]["username"], "carl");
        assert_eq!(body["data"]["content"][1]["username"], "bob");
        assert_eq!(body["data"]["total_pages"], 2);
        assert_eq!(body["data"]["last"], false);

        let (status, body) = send(&router, Method::GET, "/api/users/page/7", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], json!([]));
    }

    #[tokio::test]
    async fn huge_page_index_is_an_empty_page() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/users", Some(ana())).await;

        let (status, body) =
            send(&router, Method::GET, "/api/users/page/3000000000000000000", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], json!([]));
        assert_eq!(body["data"]["total_elements"], 1);

        let (status, body) =
            send(&router, Method::GET, "/api/users/page/18446744073709551615", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], json!([]));
        assert_eq!(body["data"]["last"], true);
    }

    #[tokio::test]
    async fn huge_page_size_is_clamped() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/users", Some(ana())).await;

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/users/page/0?size=18446744073709551615",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["size"], 1000);

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/users/page/1?size=18446744073709551615",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], json!([]));
    }

    #[tokio::test]
    async fn health_reports_database() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_lists_user_routes() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/api/users/{id}").is_some());
        assert!(body["paths"].get("/api/users/page/{page}").is_some());
    }
}
