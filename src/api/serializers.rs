//! Request payloads and hyperlinked representations
//!
//! Payloads carry the writable article fields only. `owner`, `url` and the
//! dates are read-only: unknown keys in a request body are ignored, so a
//! client-supplied owner never reaches the store.

use crate::core::hyperlink::Links;
use crate::core::slug::SLUG_PATTERN;
use crate::core::BlogResult;
use crate::entities::{Article, ArticleChanges, NewArticle, User, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::Validate;

fn rule(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut err = validator::ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("blank", "This field may not be blank."));
    }
    Ok(())
}

/// An empty slug means "derive it"; anything else must already be a slug
fn slug_shape(value: &str) -> Result<(), validator::ValidationError> {
    if value.is_empty() || SLUG_PATTERN.is_match(value) {
        return Ok(());
    }
    Err(rule(
        "invalid_slug",
        "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
    ))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Body of `POST /articles/` and `PUT /articles/{slug}/`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ArticleInput {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 250, message = "Ensure this field has no more than 250 characters.")
    )]
    pub summary: Option<String>,

    #[validate(required(message = "This field is required."), custom(function = "not_blank"))]
    pub article: Option<String>,

    #[validate(
        length(max = 50, message = "Ensure this field has no more than 50 characters."),
        custom(function = "slug_shape")
    )]
    pub slug: Option<String>,
}

impl ArticleInput {
    /// Build the article to insert on behalf of `owner_id`
    pub fn into_new_article(self, owner_id: UserId) -> BlogResult<NewArticle> {
        NewArticle::new(
            trimmed(self.title).unwrap_or_default(),
            trimmed(self.summary).unwrap_or_default(),
            trimmed(self.article).unwrap_or_default(),
            self.slug,
            owner_id,
        )
    }

    /// Full replacement of the writable fields; an omitted slug is kept
    pub fn into_changes(self) -> ArticleChanges {
        ArticleChanges {
            title: trimmed(self.title),
            summary: trimmed(self.summary),
            article: trimmed(self.article),
            slug: self.slug,
        }
    }
}

/// Body of `PATCH /articles/{slug}/`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ArticlePatch {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub title: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 250, message = "Ensure this field has no more than 250 characters.")
    )]
    pub summary: Option<String>,

    #[validate(custom(function = "not_blank"))]
    pub article: Option<String>,

    #[validate(
        length(max = 50, message = "Ensure this field has no more than 50 characters."),
        custom(function = "slug_shape")
    )]
    pub slug: Option<String>,
}

impl ArticlePatch {
    pub fn into_changes(self) -> ArticleChanges {
        ArticleChanges {
            title: trimmed(self.title),
            summary: trimmed(self.summary),
            article: trimmed(self.article),
            slug: self.slug,
        }
    }
}

/// External form of an article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRepresentation {
    pub url: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub article: String,
    pub created: NaiveDate,
    pub updated: NaiveDate,
    /// Username of the owner
    pub owner: String,
}

impl ArticleRepresentation {
    pub fn new(article: Article, owner: impl Into<String>, links: &Links) -> Self {
        Self {
            url: links.detail(&article),
            owner: owner.into(),
            slug: article.slug,
            title: article.title,
            summary: article.summary,
            article: article.article,
            created: article.created,
            updated: article.updated,
        }
    }
}

/// External form of a user with links to the articles they own
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRepresentation {
    pub url: String,
    pub id: UserId,
    pub username: String,
    pub articles: Vec<String>,
}

impl UserRepresentation {
    pub fn new(user: User, articles: &[Article], links: &Links) -> Self {
        Self {
            url: links.detail(&user),
            id: user.id,
            username: user.username,
            articles: articles.iter().map(|a| links.detail(a)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{BlogError, ValidationError};
    use crate::core::slug::SLUG_MAX_LENGTH;

    const REQUIRED: &str = "This field is required.";
    const TITLE_TOO_LONG: &str = "Ensure this field has no more than 100 characters.";
    const SUMMARY_TOO_LONG: &str = "Ensure this field has no more than 250 characters.";
    const SLUG_TOO_LONG: &str = "Ensure this field has no more than 50 characters.";

    fn input(title: &str, summary: &str, article: &str) -> ArticleInput {
        ArticleInput {
            title: Some(title.to_string()),
            summary: Some(summary.to_string()),
            article: Some(article.to_string()),
            slug: None,
        }
    }

    fn failing_fields(err: validator::ValidationErrors) -> Vec<(String, String)> {
        match ValidationError::from(err) {
            ValidationError::FieldErrors(fields) => fields
                .into_iter()
                .map(|f| (f.field, f.message))
                .collect(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input("Hello World", "s", "body").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let fields = failing_fields(ArticleInput::default().validate().unwrap_err());
        assert_eq!(
            fields,
            vec![
                ("article".to_string(), REQUIRED.to_string()),
                ("summary".to_string(), REQUIRED.to_string()),
                ("title".to_string(), REQUIRED.to_string()),
            ]
        );
    }

    #[test]
    fn test_length_limits() {
        let long_title = "t".repeat(101);
        let fields = failing_fields(input(&long_title, "s", "b").validate().unwrap_err());
        assert_eq!(fields, vec![("title".to_string(), TITLE_TOO_LONG.to_string())]);

        let long_summary = "s".repeat(251);
        let fields = failing_fields(input("t", &long_summary, "b").validate().unwrap_err());
        assert_eq!(
            fields,
            vec![("summary".to_string(), SUMMARY_TOO_LONG.to_string())]
        );

        assert!(input(&"t".repeat(100), &"s".repeat(250), "b").validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let err = input("   ", "s", "b").validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));
    }

    #[test]
    fn test_slug_rules() {
        let mut payload = input("t", "s", "b");
        payload.slug = Some("not a slug!".to_string());
        assert!(payload.validate().unwrap_err().field_errors().contains_key("slug"));

        payload.slug = Some("x".repeat(SLUG_MAX_LENGTH + 1));
        let fields = failing_fields(payload.validate().unwrap_err());
        assert!(fields.contains(&("slug".to_string(), SLUG_TOO_LONG.to_string())));

        payload.slug = Some("fine_slug-1".to_string());
        assert!(payload.validate().is_ok());

        payload.slug = Some(String::new());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_owner_in_body_is_ignored() {
        let payload: ArticleInput = serde_json::from_value(serde_json::json!({
            "title": "Hello World",
            "summary": "s",
            "article": "body",
            "owner": "mallory",
        }))
        .unwrap();

        let new = payload.into_new_article(1).unwrap();
        assert_eq!(new.owner_id, 1);
        assert_eq!(new.slug, "hello-world");
    }

    #[test]
    fn test_unsluggable_title_is_field_error() {
        let err = input("!!!", "s", "b").into_new_article(1).unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));
        let details = err.to_response().details.unwrap();
        assert_eq!(details["fields"][0]["field"], "slug");
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let new = input("  Padded Title ", "\tsummary\n", "\n  body text  \n")
            .into_new_article(1)
            .unwrap();
        assert_eq!(new.title, "Padded Title");
        assert_eq!(new.summary, "summary");
        assert_eq!(new.article, "body text");
        assert_eq!(new.slug, "padded-title");

        let changes = ArticlePatch {
            article: Some("  edited \n".to_string()),
            ..Default::default()
        }
        .into_changes();
        assert_eq!(changes.article.as_deref(), Some("edited"));
    }

    #[test]
    fn test_patch_accepts_subsets() {
        let patch = ArticlePatch {
            summary: Some("only this".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        let changes = patch.into_changes();
        assert_eq!(changes.summary.as_deref(), Some("only this"));
        assert!(changes.title.is_none());
    }

    #[test]
    fn test_article_representation() {
        let links = Links::new("http://testserver");
        let created = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let article = input("Hello World", "s", "body")
            .into_new_article(1)
            .unwrap()
            .into_article(1, created);

        let json = serde_json::to_value(ArticleRepresentation::new(article, "alice", &links))
            .unwrap();

        assert_eq!(json["url"], "http://testserver/articles/hello-world/");
        assert_eq!(json["owner"], "alice");
        assert_eq!(json["created"], "2024-01-02");
        assert_eq!(json["updated"], "2024-01-02");
        assert!(json.get("id").is_none());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_user_representation() {
        let links = Links::new("http://testserver");
        let created = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let article = input("First", "s", "b")
            .into_new_article(3)
            .unwrap()
            .into_article(1, created);
        let user = User::new(3, "carol", "digest");

        let json = serde_json::to_value(UserRepresentation::new(user, &[article], &links)).unwrap();

        assert_eq!(json["url"], "http://testserver/users/3/");
        assert_eq!(json["id"], 3);
        assert_eq!(json["username"], "carol");
        assert_eq!(
            json["articles"],
            serde_json::json!(["http://testserver/articles/first/"])
        );
        assert!(json.get("password_sha256").is_none());
    }
}
