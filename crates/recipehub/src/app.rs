use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::health,
        recipes::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .layer(cors);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn recipe_json() -> &'static str {
        r#"{
            "name": "Pancakes",
            "ingredients": "flour,milk,eggs",
            "prep_time": 10,
            "cook_time": 15,
            "instructions": "Whisk and fry."
        }"#
    }

    async fn create_sample(app: &Router) -> i64 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recipes")
                    .header("Content-Type", "application/json")
                    .body(Body::from(recipe_json()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
        created["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_recipes_empty() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/recipes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert!(json.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_recipe() {
        let app = create_app(AppState::default());

        let id = create_sample(&app).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/recipes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let recipe: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(recipe["id"].as_i64().unwrap(), id);
        assert_eq!(recipe["name"], "Pancakes");
        assert_eq!(recipe["prep_time"], 10);
    }

    #[tokio::test]
    async fn test_create_with_empty_name_is_bad_request() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recipes")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"name": "  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_nonexistent_recipe() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/recipes/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_recipe() {
        let app = create_app(AppState::default());
        let id = create_sample(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/recipes/{id}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"name": "Crepes", "ingredients": "flour,milk", "prep_time": 5, "cook_time": 10, "instructions": "Thin batter."}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let result: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(result["success"], true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/recipes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let recipe: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(recipe["name"], "Crepes");
    }

    #[tokio::test]
    async fn test_update_nonexistent_is_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/recipes/9999")
                    .header("Content-Type", "application/json")
                    .body(Body::from(recipe_json()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_recipe() {
        let app = create_app(AppState::default());
        let id = create_sample(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/recipes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // Verify the recipe is gone
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/recipes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/recipes/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_after_create() {
        let app = create_app(AppState::default());
        let id = create_sample(&app).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/recipes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 1);
        assert_eq!(json[0]["id"].as_i64().unwrap(), id);
    }
}
