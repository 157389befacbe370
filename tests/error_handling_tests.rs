//! Integration tests for typed errors and their HTTP rendering
//!
//! Verifies that storage operations surface the typed `BlogError` variants
//! and that every variant renders to the expected status, code and body.

use axum::body::to_bytes;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use blog::core::error::*;
use blog::prelude::*;
use serde_json::Value;

async fn body_json(err: BlogError) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = err.into_response();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

fn draft(title: &str, owner_id: UserId) -> NewArticle {
    NewArticle::new(title, "summary", "body", None, owner_id).unwrap()
}

// =============================================================================
// Response rendering
// =============================================================================

mod response_tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, _, body) = body_json(
            ArticleError::NotFound {
                slug: "missing".to_string(),
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ARTICLE_NOT_FOUND");
        assert_eq!(body["details"]["slug"], "missing");
    }

    #[tokio::test]
    async fn test_unauthorized_carries_basic_challenge() {
        let (status, headers, body) = body_json(
            RequestError::Unauthorized {
                message: "Authentication credentials were not provided.".to_string(),
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(
            headers.get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"api\""
        );
    }

    #[tokio::test]
    async fn test_forbidden_has_no_challenge() {
        let (status, headers, _) = body_json(
            RequestError::Forbidden {
                message: "not the owner".to_string(),
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(headers.get(header::WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn test_field_error_lists_fields() {
        let (status, _, body) =
            body_json(BlogError::field("title", "This field is required.")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["fields"][0]["field"], "title");
        assert_eq!(
            body["details"]["fields"][0]["message"],
            "This field is required."
        );
    }

    #[tokio::test]
    async fn test_storage_error_is_500_without_details() {
        let (status, _, body) = body_json(
            StorageError::LockPoisoned {
                message: "articles".to_string(),
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let (status, _, body) = body_json(
            ValidationError::InvalidId {
                value: "abc".to_string(),
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("abc"));
    }
}

// =============================================================================
// Article service errors
// =============================================================================

mod article_service_error_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_slug_returns_typed_error() {
        let service = InMemoryArticleService::new();
        service.create(draft("Hello World", 1)).await.unwrap();

        let err = service.create(draft("Hello World", 2)).await.unwrap_err();

        match err {
            BlogError::Article(ArticleError::SlugTaken { slug }) => assert_eq!(slug, "hello-world"),
            other => panic!("Expected ArticleError::SlugTaken, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_deleted_article_returns_not_found() {
        let service = InMemoryArticleService::new();
        let mut article = service.create(draft("Kept", 1)).await.unwrap();
        service.delete(&article).await.unwrap();
        article.title = "Changed".to_string();

        let err = service.update(article).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "ARTICLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_renaming_onto_taken_slug_is_conflict() {
        let service = InMemoryArticleService::new();
        service.create(draft("First", 1)).await.unwrap();
        let mut second = service.create(draft("Second", 1)).await.unwrap();
        second.slug = "first".to_string();

        let err = service.update(second).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        // the original row is untouched
        assert!(service.get("second").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let service = InMemoryArticleService::new();
        let once = service.create(draft("Once", 1)).await.unwrap();

        assert!(service.delete(&once).await.is_ok());
        let err = service.delete(&once).await.unwrap_err();

        assert!(matches!(
            err,
            BlogError::Article(ArticleError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unsluggable_title_is_field_error() {
        let err = NewArticle::new("!!!", "summary", "body", None, 1).unwrap_err();

        match err {
            BlogError::Validation(ValidationError::FieldError { field, .. }) => {
                assert_eq!(field, "slug")
            }
            other => panic!("Expected a slug field error, got {:?}", other),
        }
    }
}
