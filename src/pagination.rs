use serde::Deserialize;

pub const PAGE_SIZE: i64 = 10;

/// `?page=N` query string. Kept as text so junk values fall back to page 1
/// instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// One page of results plus what the templates need for navigation links.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
}

/// Where to read a page from, once the requested number has been clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub limit: i64,
    pub offset: i64,
}

pub fn num_pages(total: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

/// Resolves a raw page parameter against the row count.
///
/// Missing or unparsable values give page 1; out-of-range values are clamped
/// into `1..=num_pages`.
pub fn window(raw: Option<&str>, total: i64) -> PageWindow {
    let num_pages = num_pages(total);
    let requested = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(1);
    let number = requested.clamp(1, num_pages.max(1));

    PageWindow {
        number,
        num_pages,
        limit: PAGE_SIZE,
        offset: (number - 1) * PAGE_SIZE,
    }
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then(|| self.number + 1)
    }
}
