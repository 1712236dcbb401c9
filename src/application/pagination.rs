//! Offset pagination and sort normalization shared by every paged finder.
//!
//! Raw `page`/`size`/`sortBy`/`sortDir` query values are normalized into a
//! [`PageRequest`] exactly once at the service boundary. The normalized
//! request is what the query layer consumes and what the cache layer keys
//! on, so two requests that normalize to the same value always share a
//! cache slot and two that differ never do.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page index must be zero or greater, got {0}")]
    NegativePage(i64),
    #[error("page index {requested} exceeds the maximum of {max}")]
    PageIndexTooLarge { requested: i64, max: u32 },
    #[error("page size must be greater than zero, got {0}")]
    EmptyPage(i64),
    #[error("page size {requested} exceeds the maximum of {max}")]
    PageTooLarge { requested: i64, max: u32 },
    #[error("cannot sort {entity} by `{field}`")]
    UnsupportedSort { entity: &'static str, field: String },
    #[error("sort direction must be `asc` or `desc`, got `{0}`")]
    InvalidDirection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, PaginationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(PaginationError::InvalidDirection(raw.to_string())),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Allow-list of sortable fields for one entity: API name to column.
#[derive(Debug)]
pub struct SortableFields {
    pub entity: &'static str,
    pub fields: &'static [(&'static str, &'static str)],
    pub default_field: &'static str,
    pub default_direction: SortDirection,
}

impl SortableFields {
    fn resolve(&self, field: &str) -> Option<(&'static str, &'static str)> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .copied()
    }
}

pub const DESTINATION_SORT: SortableFields = SortableFields {
    entity: "destinations",
    fields: &[
        ("name", "d.name"),
        ("rating", "d.rating"),
        ("reviewCount", "d.review_count"),
        ("category", "d.category"),
        ("createdAt", "d.created_at"),
        ("updatedAt", "d.updated_at"),
    ],
    default_field: "name",
    default_direction: SortDirection::Asc,
};

pub const BLOG_POST_SORT: SortableFields = SortableFields {
    entity: "blog posts",
    fields: &[
        ("publishedAt", "p.published_at"),
        ("title", "p.title"),
        ("readTime", "p.read_time"),
        ("createdAt", "p.created_at"),
    ],
    default_field: "publishedAt",
    default_direction: SortDirection::Desc,
};

/// A validated sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    field: &'static str,
    column: &'static str,
    direction: SortDirection,
}

impl SortSpec {
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Qualified column name; only ever one of the allow-listed literals.
    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_sql())
    }
}

/// Raw, unvalidated paging parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Normalized page descriptor: zero-based index, bounded size, allow-listed sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: SortSpec,
}

impl PageRequest {
    pub fn normalize(
        params: &PageParams,
        sortable: &SortableFields,
        max_size: u32,
    ) -> Result<Self, PaginationError> {
        let page = params.page.unwrap_or(0);
        if page < 0 {
            return Err(PaginationError::NegativePage(page));
        }
        let page = u32::try_from(page).map_err(|_| PaginationError::PageIndexTooLarge {
            requested: page,
            max: u32::MAX,
        })?;

        let size = params.size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
        if size <= 0 {
            return Err(PaginationError::EmptyPage(size));
        }
        if size > i64::from(max_size) {
            return Err(PaginationError::PageTooLarge {
                requested: size,
                max: max_size,
            });
        }
        let size = size as u32;

        let requested_field = params
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(sortable.default_field);
        let (field, column) =
            sortable
                .resolve(requested_field)
                .ok_or_else(|| PaginationError::UnsupportedSort {
                    entity: sortable.entity,
                    field: requested_field.to_string(),
                })?;

        let direction = match params.sort_dir.as_deref() {
            Some(raw) if !raw.trim().is_empty() => SortDirection::parse(raw)?,
            _ => sortable.default_direction,
        };

        Ok(Self {
            page,
            size,
            sort: SortSpec {
                field,
                column,
                direction,
            },
        })
    }

    /// First page of `sortable` with its default ordering.
    pub fn first(size: u32, sortable: &SortableFields) -> Result<Self, PaginationError> {
        Self::normalize(
            &PageParams {
                size: Some(i64::from(size)),
                ..PageParams::default()
            },
            sortable,
            size.max(1),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Canonical `page_size_field:DIR` rendering used verbatim in cache keys.
    pub fn cache_key(&self) -> String {
        format!("{}_{}_{}", self.page, self.size, self.sort)
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        let total_pages = total_elements.div_ceil(size);
        let page = request.page();
        Self {
            content,
            page,
            size: request.size(),
            total_elements,
            total_pages,
            first: page == 0,
            last: u64::from(page) + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}
