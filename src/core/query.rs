//! Query parameters and pagination utilities

use serde::Deserialize;

/// Fixed number of records per page
pub const PAGE_SIZE: usize = 10;

/// Response header carrying the total page count
pub const LAST_PAGE_HEADER: &str = "last-page";

/// Query parameters for paginated listings
///
/// The page is kept as raw text and resolved by [`paginate`], so that
/// unparseable values fall back to the first page instead of rejecting
/// the request.
///
/// # Example
/// ```text
/// GET /api/users?page=2
/// POST /api/users/find?page=3
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PageQuery {
    /// Requested page number (starts at 1)
    pub page: Option<String>,
}

impl PageQuery {
    /// Resolve the requested page into store bounds
    pub fn window(&self) -> PageWindow {
        paginate(self.page.as_deref(), PAGE_SIZE)
    }
}

/// Store bounds for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Resolved page number
    pub page: i64,

    /// Records to skip
    pub skip: usize,

    /// Records to return
    pub limit: usize,

    /// False when the resolved page is below 1; callers must reject
    /// before touching the store
    pub is_valid: bool,
}

/// Convert a requested page into skip/limit bounds
///
/// Absent, empty or unparseable pages resolve to 1.
pub fn paginate(requested_page: Option<&str>, page_size: usize) -> PageWindow {
    let page = requested_page.and_then(parse_page).unwrap_or(1);

    if page < 1 {
        return PageWindow {
            page,
            skip: 0,
            limit: page_size,
            is_valid: false,
        };
    }

    let skip = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(page_size))
        .unwrap_or(usize::MAX);

    PageWindow {
        page,
        skip,
        limit: page_size,
        is_valid: true,
    }
}

/// Number of pages needed to show `total_count` records
pub fn last_page(total_count: u64, page_size: usize) -> u64 {
    let page_size = (page_size as u64).max(1);
    total_count.div_ceil(page_size)
}

/// Parse a leading decimal integer, ignoring trailing characters
///
/// `"2"`, `" 2"`, `"2abc"` and `"2.9"` all parse as 2; `"-1"` as -1.
/// Text without leading digits yields `None`.
fn parse_page(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate absurdly long page numbers instead of falling back to page 1.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_one() {
        let window = PageQuery::default().window();
        assert_eq!(window.page, 1);
        assert_eq!(window.skip, 0);
        assert_eq!(window.limit, PAGE_SIZE);
        assert!(window.is_valid);
    }

    #[test]
    fn test_empty_and_unparseable_pages_default_to_one() {
        assert_eq!(paginate(Some(""), 10).page, 1);
        assert_eq!(paginate(Some("abc"), 10).page, 1);
        assert_eq!(paginate(Some("-"), 10).page, 1);
    }

    #[test]
    fn test_skip_is_page_minus_one_times_size() {
        let window = paginate(Some("3"), 10);
        assert_eq!(window.skip, 20);
        assert_eq!(window.limit, 10);
    }

    #[test]
    fn test_leading_integer_prefix_is_used() {
        assert_eq!(paginate(Some("2abc"), 10).page, 2);
        assert_eq!(paginate(Some("2.9"), 10).page, 2);
        assert_eq!(paginate(Some(" 4"), 10).page, 4);
    }

    #[test]
    fn test_pages_below_one_are_invalid() {
        assert!(!paginate(Some("0"), 10).is_valid);
        assert!(!paginate(Some("-3"), 10).is_valid);
    }

    #[test]
    fn test_huge_page_saturates_skip() {
        let window = paginate(Some("99999999999999999999999"), 10);
        assert!(window.is_valid);
        assert_eq!(window.skip, usize::MAX);
    }

    #[test]
    fn test_last_page() {
        assert_eq!(last_page(0, 10), 0);
        assert_eq!(last_page(1, 10), 1);
        assert_eq!(last_page(10, 10), 1);
        assert_eq!(last_page(11, 10), 2);
        assert_eq!(last_page(145, 10), 15);
    }

    #[test]
    fn test_last_page_matches_ceiling_for_many_counts() {
        for count in 0..500u64 {
            let expected = (count as f64 / 10.0).ceil() as u64;
            assert_eq!(last_page(count, 10), expected, "count = {}", count);
        }
    }
}
