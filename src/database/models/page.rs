use crate::config::PaginationConfig;

/// A validated page window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Parse raw `page`/`limit` query values, falling back to the configured defaults.
    ///
    /// `page` must be at least 1 and `limit` must lie in `1..=max_limit`.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, String> {
        let page = match page {
            Some(raw) => parse_positive("page", raw)?,
            None => 1,
        };
        let limit = match limit {
            Some(raw) => parse_positive("limit", raw)?,
            None => config.default_limit,
        };
        if limit > config.max_limit {
            return Err(format!("limit must not exceed {}", config.max_limit));
        }
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<i64, String> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("{} must be a positive integer", name)),
    }
}
