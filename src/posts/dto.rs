use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::posts::repo::{CommentWithAuthor, LikeWithUser, PostWithMeta};
use crate::util::truncate_text;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn has_more(&self, total: i64) -> bool {
        self.offset() + self.limit() < total
    }
}

/// Body for creating or updating a post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub featured_image: Option<String>,
}

impl PostInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".into()));
        }
        if self.content.trim().is_empty() {
            return Err(ApiError::Validation("Content is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct PostIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub content: String,
}

impl CommentInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.content.trim().is_empty() {
            return Err(ApiError::Validation("Comment cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorBrief {
    pub name: String,
    pub username: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorDetail {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

/// A post as it appears in listings: scalars plus author and counts. A
/// missing excerpt falls back to a truncated slice of the content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: AuthorBrief,
    pub like_count: i64,
    pub comment_count: i64,
}

impl From<PostWithMeta> for PostListItem {
    fn from(m: PostWithMeta) -> Self {
        let excerpt = m
            .excerpt
            .unwrap_or_else(|| truncate_text(&m.content, 150));
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            excerpt,
            content: m.content,
            tags: m.tags,
            published: m.published,
            featured_image: m.featured_image,
            created_at: m.created_at,
            author: AuthorBrief {
                name: m.author_name,
                username: m.author_username,
                avatar: m.author_avatar,
            },
            like_count: m.like_count,
            comment_count: m.comment_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostListItem>,
    pub has_more: bool,
    pub total: i64,
}

/// Response for create/update: the post scalars plus its author.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: AuthorBrief,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub id: Uuid,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: AuthorBrief,
}

impl From<CommentWithAuthor> for CommentPayload {
    fn from(c: CommentWithAuthor) -> Self {
        Self {
            id: c.id,
            content: c.content,
            created_at: c.created_at,
            author: AuthorBrief {
                name: c.author_name,
                username: c.author_username,
                avatar: c.author_avatar,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LikerBrief {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LikePayload {
    pub id: Uuid,
    pub user: LikerBrief,
}

impl From<LikeWithUser> for LikePayload {
    fn from(l: LikeWithUser) -> Self {
        Self {
            id: l.id,
            user: LikerBrief {
                name: l.user_name,
                username: l.user_username,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: AuthorDetail,
    pub comments: Vec<CommentPayload>,
    pub likes: Vec<LikePayload>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_offsets() {
        let p = Pagination { page: 1, limit: 10 };
        assert_eq!(p.offset(), 0);
        let p = Pagination { page: 3, limit: 10 };
        assert_eq!(p.offset(), 20);
        // out-of-range input is clamped rather than rejected
        let p = Pagination { page: 0, limit: -5 };
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn has_more_tracks_the_remaining_window() {
        let p = Pagination { page: 1, limit: 10 };
        assert!(p.has_more(11));
        assert!(!p.has_more(10));
        let p = Pagination { page: 2, limit: 10 };
        assert!(!p.has_more(20));
        assert!(p.has_more(21));
    }

    #[test]
    fn post_input_requires_title_and_content() {
        let input = PostInput {
            title: "  ".into(),
            content: "body".into(),
            excerpt: None,
            tags: vec![],
            published: false,
            featured_image: None,
        };
        assert!(input.validate().unwrap_err().to_string().contains("Title"));

        let input = PostInput {
            title: "Title".into(),
            content: "".into(),
            excerpt: None,
            tags: vec![],
            published: false,
            featured_image: None,
        };
        assert!(input
            .validate()
            .unwrap_err()
            .to_string()
            .contains("Content"));
    }

    #[test]
    fn comment_input_rejects_blank_content() {
        let input = CommentInput { content: " ".into() };
        assert!(input.validate().is_err());
        let input = CommentInput {
            content: "nice post".into(),
        };
        assert!(input.validate().is_ok());
    }
}
