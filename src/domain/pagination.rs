//! Pagination over list queries.
//!
//! Page numbers are 1-based. Out-of-range requests are normalised rather
//! than rejected: a limit below 1 becomes 10 and a page below 1 becomes 1.

use std::str::FromStr;


/// Page size used when the caller asks for less than one row.
pub const DEFAULT_LIMIT: u64 = 10;

/// Page used when the caller asks for a page below 1.
pub const DEFAULT_PAGE: u64 = 1;

// =============================================================================
// Sorting
// =============================================================================

/// Column a list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    /// Column name shared by both tables.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "created_at" | "createdat" => Ok(Self::CreatedAt),
            "updated_at" | "updatedat" => Ok(Self::UpdatedAt),
            _ => Err(format!("Unknown sort key: '{value}'")),
        }
    }
}

/// Direction of ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(format!("Unknown sort order: '{value}'")),
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Normalised pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
    /// Ordering column.
    pub sort: SortKey,
    /// Ordering direction.
    pub order: SortOrder,
}

impl Pagination {
    /// Creates pagination from raw caller input, applying the defaults.
    #[must_use]
    pub fn new(requested_page: i64, requested_limit: i64) -> Self {
        Self {
            page: normalize_page(requested_page),
            limit: normalize_limit(requested_limit),
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortKey, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows skipped before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

fn normalize_page(requested: i64) -> u64 {
    u64::try_from(requested)
        .ok()
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

fn normalize_limit(requested: i64) -> u64 {
    u64::try_from(requested)
        .ok()
        .filter(|limit| *limit >= 1)
        .unwrap_or(DEFAULT_LIMIT)
}

// =============================================================================
// Page Window
// =============================================================================

/// Offset, limit and page count for one list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// Computes the window for a list call given the total matching rows.
///
/// ```
/// use farm_service::domain::paginate;
///
/// let window = paginate(25, 3, 10);
/// assert_eq!(window.offset, 20);
/// assert_eq!(window.total_pages, 3);
/// ```
#[must_use]
pub fn paginate(total_rows: u64, requested_page: i64, requested_limit: i64) -> PageWindow {
    let pagination = Pagination::new(requested_page, requested_limit);
    PageWindow {
        offset: pagination.offset(),
        limit: pagination.limit(),
        page: pagination.page(),
        total_pages: total_rows.div_ceil(pagination.limit()),
    }
}

// =============================================================================
// Page
// =============================================================================

/// One page of a list result with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Current page (1-based).
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Rows matching the filter across all pages.
    pub total_rows: u64,
    /// `ceil(total_rows / limit)`.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a page for the given pagination and total row count.
    #[must_use]
    pub const fn new(items: Vec<T>, pagination: &Pagination, total_rows: u64) -> Self {
        Self {
            items,
            page: pagination.page(),
            limit: pagination.limit(),
            total_rows,
            total_pages: total_rows.div_ceil(pagination.limit()),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transforms the items, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, function: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(function).collect(),
            page: self.page,
            limit: self.limit,
            total_rows: self.total_rows,
            total_pages: self.total_pages,
        }
    }
}
