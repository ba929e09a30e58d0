use super::*;
use axum::body::to_bytes;
use serde_json::Value;

async fn response_parts(err: ApiError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_validation_maps_to_400_with_message() {
    let (status, body) = response_parts(ApiError::Validation(
        "Source text must be at least 1000 characters long".to_string(),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(
        body["message"],
        "Source text must be at least 1000 characters long"
    );
}

#[tokio::test]
async fn test_ai_service_maps_to_500_with_retry_wording() {
    let (status, body) =
        response_parts(ApiError::AiService("upstream 429".to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "AI Service Error");
    // The upstream detail stays in the logs; the user gets retryable wording.
    assert_eq!(body["message"], "Failed to generate flashcards. Please try again.");
}

#[tokio::test]
async fn test_database_maps_to_500_without_detail() {
    let (status, body) =
        response_parts(ApiError::Database(anyhow::anyhow!("disk I/O error"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(!body["message"].as_str().unwrap().contains("disk I/O"));
}

#[tokio::test]
async fn test_ownership_statuses() {
    let (status, _) = response_parts(ApiError::Unauthorized("Invalid credentials".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = response_parts(ApiError::Forbidden("not yours".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = response_parts(ApiError::NotFound("no such card".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = response_parts(ApiError::Conflict("already registered".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = response_parts(ApiError::MethodNotAllowed).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
