use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Bare post row.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured_image: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Post row joined with its author and like/comment counts, as listings
/// need it.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithMeta {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured_image: Option<String>,
    pub created_at: OffsetDateTime,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthorDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured_image: Option<String>,
    pub created_at: OffsetDateTime,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub author_bio: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LikeWithUser {
    pub id: Uuid,
    pub user_name: String,
    pub user_username: String,
}

const POST_META_COLUMNS: &str = r#"
    p.id, p.author_id, p.title, p.slug, p.content, p.excerpt, p.tags,
    p.published, p.featured_image, p.created_at,
    u.name AS author_name, u.username AS author_username, u.avatar AS author_avatar,
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
"#;

impl Post {
    pub async fn list_published(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PostWithMeta>> {
        let rows = sqlx::query_as::<_, PostWithMeta>(&format!(
            r#"
            SELECT {POST_META_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.published
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_published(db: &PgPool) -> anyhow::Result<i64> {
        let total =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM posts WHERE published"#)
                .fetch_one(db)
                .await?;
        Ok(total)
    }

    /// All of one author's posts, drafts included.
    pub async fn list_by_author(
        db: &PgPool,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PostWithMeta>> {
        let rows = sqlx::query_as::<_, PostWithMeta>(&format!(
            r#"
            SELECT {POST_META_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_author(db: &PgPool, author_id: Uuid) -> anyhow::Result<i64> {
        let total =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM posts WHERE author_id = $1"#)
                .bind(author_id)
                .fetch_one(db)
                .await?;
        Ok(total)
    }

    /// Every post regardless of state; the admin dashboard listing.
    pub async fn list_all(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PostWithMeta>> {
        let rows = sqlx::query_as::<_, PostWithMeta>(&format!(
            r#"
            SELECT {POST_META_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_all(db: &PgPool) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM posts"#)
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, slug, content, excerpt, tags, published,
                   featured_image, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn find_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, slug, content, excerpt, tags, published,
                   featured_image, created_at
            FROM posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn find_detail_by_slug(
        db: &PgPool,
        slug: &str,
    ) -> anyhow::Result<Option<PostWithAuthorDetail>> {
        let post = sqlx::query_as::<_, PostWithAuthorDetail>(
            r#"
            SELECT p.id, p.author_id, p.title, p.slug, p.content, p.excerpt, p.tags,
                   p.published, p.featured_image, p.created_at,
                   u.name AS author_name, u.username AS author_username,
                   u.avatar AS author_avatar, u.bio AS author_bio
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    /// Collision check before persisting a (re)generated slug; on update the
    /// post's own row is excluded.
    pub async fn slug_exists(
        db: &PgPool,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM posts WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        author_id: Uuid,
        title: &str,
        slug: &str,
        content: &str,
        excerpt: Option<&str>,
        tags: &[String],
        published: bool,
        featured_image: Option<&str>,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, title, slug, content, excerpt, tags, published, featured_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, author_id, title, slug, content, excerpt, tags, published,
                      featured_image, created_at
            "#,
        )
        .bind(author_id)
        .bind(title)
        .bind(slug)
        .bind(content)
        .bind(excerpt)
        .bind(tags)
        .bind(published)
        .bind(featured_image)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: &str,
        slug: &str,
        content: &str,
        excerpt: Option<&str>,
        tags: &[String],
        published: bool,
        featured_image: Option<&str>,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, slug = $3, content = $4, excerpt = $5, tags = $6,
                published = $7, featured_image = $8
            WHERE id = $1
            RETURNING id, author_id, title, slug, content, excerpt, tags, published,
                      featured_image, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(slug)
        .bind(content)
        .bind(excerpt)
        .bind(tags)
        .bind(published)
        .bind(featured_image)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM posts WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl CommentWithAuthor {
    pub async fn list_for_post(db: &PgPool, post_id: Uuid) -> anyhow::Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            r#"
            SELECT c.id, c.content, c.created_at,
                   u.name AS author_name, u.username AS author_username,
                   u.avatar AS author_avatar
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
}

pub async fn create_comment(
    db: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> anyhow::Result<CommentRow> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO comments (post_id, author_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, content, created_at
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .fetch_one(db)
    .await?;
    Ok(row)
}

impl LikeWithUser {
    pub async fn list_for_post(db: &PgPool, post_id: Uuid) -> anyhow::Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            r#"
            SELECT l.id, u.name AS user_name, u.username AS user_username
            FROM likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

/// Idempotent like toggle. Existing like is removed; otherwise one is
/// inserted with ON CONFLICT DO NOTHING, so a concurrent duplicate insert
/// still resolves to "liked" instead of a constraint error.
pub async fn toggle_like(db: &PgPool, user_id: Uuid, post_id: Uuid) -> anyhow::Result<bool> {
    let removed = sqlx::query(r#"DELETE FROM likes WHERE user_id = $1 AND post_id = $2"#)
        .bind(user_id)
        .bind(post_id)
        .execute(db)
        .await?
        .rows_affected();
    if removed > 0 {
        return Ok(false);
    }
    sqlx::query(
        r#"
        INSERT INTO likes (user_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, post_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(db)
    .await?;
    Ok(true)
}
