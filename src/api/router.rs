use axum::{middleware, routing::get, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::actions;
use super::console;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Form actions
        .merge(actions::create_actions_router())
        // JSON reads for the console pages
        .nest("/api", console::create_console_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::domain::activity::ActivityLogRepository;
    use crate::domain::user::{MockUserRepository, UserRepository};
    use crate::infrastructure::activity::InMemoryActivityLogRepository;
    use crate::infrastructure::auth::{test_hasher, SessionConfig, SessionManager};
    use crate::infrastructure::storage::Repositories;

    struct TestApp {
        router: Router,
        activity: InMemoryActivityLogRepository,
    }

    fn build_state(repos: Repositories) -> AppState {
        let sessions = Arc::new(SessionManager::new(
            SessionConfig::new("router-test-secret", 24).unwrap().with_secure_cookie(false),
        ));
        crate::build_state(repos, Arc::new(test_hasher()), sessions)
    }

    fn test_app() -> TestApp {
        let activity = InMemoryActivityLogRepository::new();
        let mut repos = Repositories::in_memory();
        repos.activity = Arc::new(activity.clone()) as Arc<dyn ActivityLogRepository>;

        TestApp {
            router: create_router_with_state(build_state(repos)),
            activity,
        }
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "198.51.100.7");

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` pair of the session cookie set by a response
    fn session_cookie(response: &Response) -> String {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_string()
    }

    async fn sign_up(app: &TestApp, email: &str) -> String {
        let response = app
            .router
            .clone()
            .oneshot(form_post(
                "/auth/sign-up",
                &format!("email={email}&password=secret123"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(get_request("/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .router
            .oneshot(get_request("/ready", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_store_failure() {
        let mut repos = Repositories::in_memory();
        repos.users = Arc::new(MockUserRepository::failing()) as Arc<dyn UserRepository>;
        let router = create_router_with_state(build_state(repos));

        let response = router.oneshot(get_request("/ready", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_sign_up_sets_cookie_and_redirects() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(form_post(
                "/auth/sign-up",
                "email=new%40example.com&password=secret123",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/dashboard");

        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));

        let entries = app.activity.all().await;
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|e| e.ip_address.as_deref() == Some("198.51.100.7")));
    }

    #[tokio::test]
    async fn test_sign_up_ignores_forged_forwarded_header() {
        let app = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/auth/sign-up")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "x".repeat(80))
            .body(Body::from("email=forged%40example.com&password=secret123"))
            .unwrap();

        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let entries = app.activity.all().await;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.ip_address.is_none()));
    }

    #[tokio::test]
    async fn test_sign_in_validation_error() {
        let app = test_app();

        let response = app
            .router
            .oneshot(form_post("/auth/sign-in", "email=not-an-email&password=x", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["status"], "validation_error");
        assert_eq!(body["message"], "Invalid email");
        assert_eq!(body["fields"]["email"], "not-an-email");
        assert!(body["fields"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_is_auth_error() {
        let app = test_app();
        sign_up(&app, "owner%40example.com").await;

        let response = app
            .router
            .oneshot(form_post(
                "/auth/sign-in",
                "email=owner%40example.com&password=wrong-password",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Invalid email or password. Please try again.");
    }

    #[tokio::test]
    async fn test_read_endpoints_follow_session() {
        let app = test_app();
        let cookie = sign_up(&app, "reader%40example.com").await;

        let response = app
            .router
            .clone()
            .oneshot(get_request("/api/user", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let user = json_body(response).await;
        assert_eq!(user["email"], "reader@example.com");
        assert!(user.get("password_hash").is_none());

        let response = app
            .router
            .clone()
            .oneshot(get_request("/api/team", Some(&cookie)))
            .await
            .unwrap();
        let team = json_body(response).await;
        assert_eq!(team["teamMembers"].as_array().unwrap().len(), 1);

        let response = app
            .router
            .clone()
            .oneshot(get_request("/api/activity", Some(&cookie)))
            .await
            .unwrap();
        let activity = json_body(response).await;
        assert_eq!(activity.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_read_endpoints_without_session() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(get_request("/api/user", None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, Value::Null);

        let response = app
            .router
            .clone()
            .oneshot(get_request("/api/user", Some("session=forged.token.value")))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, Value::Null);

        let response = app
            .router
            .oneshot(get_request("/api/activity", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_action_without_session() {
        let app = test_app();

        let response = app
            .router
            .oneshot(form_post(
                "/account/password",
                "currentPassword=secret123&newPassword=secret456&confirmPassword=secret456",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "unauthenticated");
        assert_eq!(body["message"], "User not authenticated");
        assert!(app.activity.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_clears_cookie() {
        let app = test_app();
        let cookie = sign_up(&app, "leaver%40example.com").await;

        let response = app
            .router
            .clone()
            .oneshot(form_post("/auth/sign-out", "", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let removal = session_cookie(&response);
        assert_eq!(removal, "session=");
    }

    #[tokio::test]
    async fn test_delete_account_signs_out() {
        let app = test_app();
        let cookie = sign_up(&app, "gone%40example.com").await;

        let response = app
            .router
            .clone()
            .oneshot(form_post("/account/delete", "password=secret123", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // The old cookie no longer resolves to a user
        let response = app
            .router
            .oneshot(get_request("/api/user", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, Value::Null);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = test_app();

        let response = app
            .router
            .oneshot(get_request("/live", None))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_update_password_route() {
        let app = test_app();
        let cookie = sign_up(&app, "rotate%40example.com").await;

        let response = app
            .router
            .clone()
            .oneshot(form_post(
                "/account/password",
                "currentPassword=secret123&newPassword=secret456&confirmPassword=secret456",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Password updated successfully.");

        let response = app
            .router
            .oneshot(form_post(
                "/auth/sign-in",
                "email=rotate%40example.com&password=secret456",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_update_account_route() {
        let app = test_app();
        let cookie = sign_up(&app, "before%40example.com").await;

        let response = app
            .router
            .clone()
            .oneshot(form_post(
                "/account",
                "name=Jane+Doe&email=after%40example.com",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Account updated successfully.");
        assert_eq!(body["fields"]["name"], "Jane Doe");

        let response = app
            .router
            .oneshot(get_request("/api/user", Some(&cookie)))
            .await
            .unwrap();
        let user = json_body(response).await;
        assert_eq!(user["email"], "after@example.com");
        assert_eq!(user["name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_invite_and_remove_member_routes() {
        let app = test_app();
        let owner = sign_up(&app, "lead%40example.com").await;
        sign_up(&app, "joiner%40example.com").await;

        let response = app
            .router
            .clone()
            .oneshot(form_post(
                "/team/invite",
                "email=joiner%40example.com&role=member",
                Some(&owner),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Member added successfully.");

        let response = app
            .router
            .clone()
            .oneshot(get_request("/api/team", Some(&owner)))
            .await
            .unwrap();
        let team = json_body(response).await;
        let members = team["teamMembers"].as_array().unwrap();
        assert_eq!(members.len(), 2);
        let joiner_id = members
            .iter()
            .find(|m| m["user"]["email"] == "joiner@example.com")
            .map(|m| m["id"].as_i64().unwrap())
            .unwrap();

        let response = app
            .router
            .clone()
            .oneshot(form_post(
                "/team/remove",
                &format!("memberId={joiner_id}"),
                Some(&owner),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Team member removed successfully.");

        let response = app
            .router
            .oneshot(get_request("/api/team", Some(&owner)))
            .await
            .unwrap();
        let team = json_body(response).await;
        assert_eq!(team["teamMembers"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invite_route_rejects_bad_role() {
        let app = test_app();
        let owner = sign_up(&app, "boss%40example.com").await;

        let response = app
            .router
            .oneshot(form_post(
                "/team/invite",
                "email=someone%40example.com&role=admin",
                Some(&owner),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Role must be either owner or member");
    }
}
