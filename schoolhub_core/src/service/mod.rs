pub mod contact;
pub mod newsletter;
pub mod reviews;
pub mod schools;
pub mod stats;

/// Hard ceiling on any page size a client can ask for.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// SQLite binds OFFSET as a signed 64-bit integer.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Highest page number accepted; any page past it is empty anyway.
pub const MAX_PAGE: u64 = MAX_OFFSET / MAX_PAGE_LIMIT;

/// Resolved page number and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Lenient parse of raw `page`/`limit` query values: anything missing,
    /// unparsable or below 1 takes the default. Both are capped.
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> Self {
        let page = positive(page).unwrap_or(1).min(MAX_PAGE);
        let limit = positive(limit).unwrap_or(default_limit).min(MAX_PAGE_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|n| *n >= 1)
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Same shape as `\S+@\S+\.\S+`.
pub(crate) fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    match domain.rsplit_once('.') {
        Some((host, tld)) => !local.is_empty() && !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Mean rounded to one decimal place, 0.0 for no ratings.
pub(crate) fn rounded_mean(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
