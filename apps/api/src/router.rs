use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use intake_cell::router::intake_routes;
use patient_cell::router::patient_routes;
use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Patient intake scheduler is running!" }))
        .nest("/schedules", schedule_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/intake", intake_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use shared_utils::test_utils::TestConfig;

    async fn status_of(app: Router, method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_liveness() {
        let config = TestConfig::default();
        let response = create_router(config.to_arc())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Patient intake scheduler is running!");
    }

    #[tokio::test]
    async fn test_cells_are_mounted() {
        let config = TestConfig::default();
        let app = create_router(config.to_arc());

        assert_eq!(status_of(app.clone(), "GET", "/schedules/doctors").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "GET", "/appointments").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "GET", "/appointments/latest").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of(app.clone(), "POST", "/intake/sessions").await, StatusCode::CREATED);
        assert_eq!(
            status_of(app, "GET", "/patients/lookup?first_name=A&last_name=B&dob=1990-01-01").await,
            StatusCode::OK
        );
    }
}
