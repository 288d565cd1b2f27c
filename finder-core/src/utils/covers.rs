pub const PLACEHOLDER_MEDIUM: &str = "https://via.placeholder.com/150x200?text=No+Cover";
pub const PLACEHOLDER_LARGE: &str = "https://via.placeholder.com/200x300?text=No+Cover";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    /// Result grid thumbnail.
    Medium,
    /// Detail view.
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            CoverSize::Medium => PLACEHOLDER_MEDIUM,
            CoverSize::Large => PLACEHOLDER_LARGE,
        }
    }
}

pub fn cover_url(covers_url: &str, cover_id: Option<i64>, size: CoverSize) -> String {
    match cover_id {
        Some(id) => format!(
            "{}/b/id/{}-{}.jpg",
            covers_url.trim_end_matches('/'),
            id,
            size.suffix()
        ),
        None => size.placeholder().to_string(),
    }
}
