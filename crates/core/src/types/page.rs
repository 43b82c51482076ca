pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 50;

/// Keyset page over post ids: rows with `id < cursor`, newest first. A zero
/// cursor means the first page; a negative one matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<i64>,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(cursor: Option<i64>, limit: Option<i64>) -> Self {
        let limit = limit
            .filter(|value| *value > 0)
            .map_or(DEFAULT_PAGE_LIMIT, |value| value.min(MAX_PAGE_LIMIT));
        Self {
            cursor: cursor.filter(|value| *value != 0),
            limit,
        }
    }

    /// Lenient query-string form: blank or unparsable values fall back to defaults.
    pub fn parse(cursor: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(cursor.and_then(parse_i64), limit.and_then(parse_i64))
    }

    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(DEFAULT_PAGE_LIMIT as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn parse_i64(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
