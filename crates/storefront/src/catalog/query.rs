//! Filters for the records listing endpoint.

/// A single-page request against the records listing.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RecordQuery {
    page: u32,
    search: Option<String>,
    style: Option<String>,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self::all()
    }
}

impl RecordQuery {
    /// Every record, first page.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            page: 1,
            search: None,
            style: None,
        }
    }

    /// Free-text search. The term is trimmed and lowercased; a blank term
    /// yields `None` since the listing would not be filtered at all.
    #[must_use]
    pub fn search(term: &str) -> Option<Self> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            search: Some(term),
            ..Self::all()
        })
    }

    /// Records tagged with a style.
    #[must_use]
    pub fn style(name: &str) -> Self {
        Self {
            style: Some(name.to_owned()),
            ..Self::all()
        }
    }

    /// Select a 1-based page. Page 0 is treated as page 1.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn style_name(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Query-string pairs in the order the API documents them.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(style) = &self.style {
            pairs.push(("style", style.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}
