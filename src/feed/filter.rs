use crate::api::Post;

/// Ordering applied to the displayed posts.
///
/// The wire names are historical: `date_asc` is shown as "Newest first" and
/// orders the newest post first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    DateAsc,
    DateDesc,
}

impl SortOrder {
    pub const ALL: [Self; 2] = [Self::DateAsc, Self::DateDesc];

    /// Parse a wire value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date_asc" => Some(Self::DateAsc),
            "date_desc" => Some(Self::DateDesc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateAsc => "Date (Newest first)",
            Self::DateDesc => "Date (Oldest first)",
        }
    }
}

/// Client-side search and ordering over the post list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: Option<String>,
    pub sort: Option<SortOrder>,
}

impl Filter {
    /// Build a filter, treating a blank query as no query.
    #[must_use]
    pub fn new(query: Option<&str>, sort: Option<SortOrder>) -> Self {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Self { query, sort }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.sort.is_none()
    }

    /// Case-insensitive substring match on title or content.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let query = query.to_lowercase();
        post.title.to_lowercase().contains(&query) || post.content.to_lowercase().contains(&query)
    }

    /// Project `posts` through the filter. Sorting is stable.
    #[must_use]
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let mut out: Vec<Post> = posts.iter().filter(|p| self.matches(p)).cloned().collect();
        match self.sort {
            Some(SortOrder::DateAsc) => {
                out.sort_by(|a, b| b.created_datetime.cmp(&a.created_datetime));
            }
            Some(SortOrder::DateDesc) => {
                out.sort_by(|a, b| a.created_datetime.cmp(&b.created_datetime));
            }
            None => {}
        }
        out
    }
}
