use std::fmt;
use std::time::Duration;

use crate::identity::{CanonicalId, EntityKind};

/// Product types that commonly make a search too specific.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "cleanser",
    "cream",
    "lotion",
    "mask",
    "masque",
    "moisturizer",
    "serum",
    "sunblock",
    "sunscreen",
    "toner",
    "treatment",
];

/// Configuration for talking to the ingredient database site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Scheme and host of the site (e.g., `https://cosdna.com`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Pause between successive detail-page fetches in a batch.
    pub request_delay: Duration,
    /// Words stripped from a query on the single no-results retry.
    pub stop_words: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cosdna.com".to_owned(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("cosroutine/", env!("CARGO_PKG_VERSION")).to_owned(),
            request_delay: Duration::from_millis(500),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_owned()).collect(),
        }
    }
}

impl SiteConfig {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Search address for an already-normalized query.
    ///
    /// Only product searches honor a sort order.
    pub fn search_url(&self, kind: EntityKind, query: &str, sort: SortOrder) -> String {
        match kind {
            EntityKind::Ingredient => format!("{}/eng/stuff.php?q={query}", self.base()),
            EntityKind::Product => format!(
                "{}/eng/product.php?q={query}{}",
                self.base(),
                sort.query_suffix()
            ),
        }
    }

    /// Detail-page address for a known identifier.
    pub fn detail_url(&self, id: &CanonicalId) -> String {
        id.address(self.base())
    }

    /// Resolve a link found on a page against the site root.
    pub fn absolute(&self, href: &str) -> String {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_owned()
        } else if let Some(rest) = href.strip_prefix("//") {
            let scheme = self.base().split("://").next().unwrap_or("https");
            format!("{scheme}://{rest}")
        } else if href.starts_with('/') {
            format!("{}{href}", self.base())
        } else {
            format!("{}/eng/{href}", self.base())
        }
    }
}

/// Ordering requested from the product search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// The site's own ordering; no sort parameter.
    #[default]
    Default,
    Latest,
    Featured,
    Clicks,
    Reviews,
}

impl SortOrder {
    /// Parse a sort name. Unknown names fall back to [`SortOrder::Default`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "latest" => Self::Latest,
            "featured" => Self::Featured,
            "clicks" => Self::Clicks,
            "reviews" => Self::Reviews,
            _ => Self::Default,
        }
    }

    /// Query-string augmentation appended to a product search.
    pub fn query_suffix(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Latest => "&sort=date",
            Self::Featured => "&sort=featured",
            Self::Clicks => "&sort=click",
            Self::Reviews => "&sort=review",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Latest => write!(f, "latest"),
            Self::Featured => write!(f, "featured"),
            Self::Clicks => write!(f, "clicks"),
            Self::Reviews => write!(f, "reviews"),
        }
    }
}
