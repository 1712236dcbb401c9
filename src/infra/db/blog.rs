use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::{
        pagination::{Page, PageRequest},
        repos::{BlogRepo, RepoError},
    },
    domain::entities::{BlogCategoryRecord, BlogPostAggregate, BlogPostRecord},
};

use super::{
    PostgresRepositories, map_sqlx_error,
    util::{convert_count, escape_like},
};

const POST_SELECT: &str = r#"
    SELECT
        p.id, p.title, p.slug, p.excerpt, p.content, p.author_name, p.author_id,
        p.category_id, p.featured_image_url, p.read_time,
        COALESCE(p.tags, '{}') AS tags,
        p.meta_description, p.is_published, p.is_featured,
        p.published_at, p.created_at, p.updated_at,
        bc.name AS category_name,
        bc.slug AS category_slug,
        bc.description AS category_description,
        bc.sort_order AS category_sort_order,
        bc.is_active AS category_is_active,
        bc.created_at AS category_created_at
    FROM blog_posts p
    LEFT JOIN blog_categories bc ON bc.id = p.category_id
"#;

const POST_COUNT: &str = "SELECT COUNT(*) FROM blog_posts p";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    author_name: Option<String>,
    author_id: Option<Uuid>,
    category_id: Option<Uuid>,
    featured_image_url: Option<String>,
    read_time: Option<i32>,
    tags: Vec<String>,
    meta_description: Option<String>,
    is_published: bool,
    is_featured: bool,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    category_name: Option<String>,
    category_slug: Option<String>,
    category_description: Option<String>,
    category_sort_order: Option<i32>,
    category_is_active: Option<bool>,
    category_created_at: Option<OffsetDateTime>,
}

impl From<PostRow> for BlogPostAggregate {
    fn from(row: PostRow) -> Self {
        let category = match (
            row.category_id,
            row.category_name,
            row.category_slug,
            row.category_created_at,
        ) {
            (Some(id), Some(name), Some(slug), Some(created_at)) => Some(BlogCategoryRecord {
                id,
                name,
                slug,
                description: row.category_description,
                sort_order: row.category_sort_order.unwrap_or_default(),
                is_active: row.category_is_active.unwrap_or(true),
                created_at,
            }),
            _ => None,
        };

        Self {
            post: BlogPostRecord {
                id: row.id,
                title: row.title,
                slug: row.slug,
                excerpt: row.excerpt,
                content: row.content,
                author_name: row.author_name,
                author_id: row.author_id,
                category_id: row.category_id,
                featured_image_url: row.featured_image_url,
                read_time: row.read_time,
                tags: row.tags,
                meta_description: row.meta_description,
                is_published: row.is_published,
                is_featured: row.is_featured,
                published_at: row.published_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            category,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    sort_order: i32,
    is_active: bool,
    created_at: OffsetDateTime,
}

impl From<CategoryRow> for BlogCategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PostScope<'a> {
    Published,
    Category(Uuid),
    Search(&'a str),
}

fn push_post_scope<'q>(qb: &mut QueryBuilder<'q, Postgres>, scope: PostScope<'q>) {
    qb.push(" WHERE p.is_published = TRUE");
    match scope {
        PostScope::Published => {}
        PostScope::Category(category_id) => {
            qb.push(" AND p.category_id = ");
            qb.push_bind(category_id);
        }
        PostScope::Search(query) => {
            let pattern = format!("%{}%", escape_like(query));
            qb.push(" AND (p.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.content ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.excerpt ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }
}

impl PostgresRepositories {
    async fn post_page(
        &self,
        scope: PostScope<'_>,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        let mut count_qb = QueryBuilder::<Postgres>::new(POST_COUNT);
        push_post_scope(&mut count_qb, scope);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let sort = page.sort();
        let mut qb = QueryBuilder::<Postgres>::new(POST_SELECT);
        push_post_scope(&mut qb, scope);
        qb.push(" ORDER BY ");
        qb.push(sort.column());
        qb.push(" ");
        qb.push(sort.direction().as_sql());
        qb.push(" NULLS LAST, p.id ASC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<PostRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Page::new(
            rows.into_iter().map(BlogPostAggregate::from).collect(),
            page,
            convert_count(total)?,
        ))
    }
}

#[async_trait]
impl BlogRepo for PostgresRepositories {
    async fn find_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogPostAggregate>, RepoError> {
        let sql = format!("{POST_SELECT} WHERE p.slug = $1 AND p.is_published = TRUE");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(BlogPostAggregate::from))
    }

    async fn find_published_page(
        &self,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.post_page(PostScope::Published, page).await
    }

    async fn find_posts_by_category_page(
        &self,
        category_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.post_page(PostScope::Category(category_id), page).await
    }

    async fn search_posts_page(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.post_page(PostScope::Search(query), page).await
    }

    async fn find_featured_posts(&self) -> Result<Vec<BlogPostAggregate>, RepoError> {
        let sql = format!(
            "{POST_SELECT} WHERE p.is_published = TRUE AND p.is_featured = TRUE \
             ORDER BY p.published_at DESC NULLS LAST, p.id ASC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogPostAggregate::from).collect())
    }

    async fn active_categories(&self) -> Result<Vec<BlogCategoryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, slug, description, sort_order, is_active, created_at
            FROM blog_categories
            WHERE is_active = TRUE
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogCategoryRecord::from).collect())
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogCategoryRecord>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, slug, description, sort_order, is_active, created_at
            FROM blog_categories
            WHERE slug = $1 AND is_active = TRUE
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(BlogCategoryRecord::from))
    }
}
