pub mod client;
pub mod config;
pub mod page;
pub mod selectors;

pub use client::{HttpClient, SiteClient};
pub use config::{SiteConfig, SortOrder};
pub use page::Page;
