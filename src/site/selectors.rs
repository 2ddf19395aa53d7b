//! CSS selectors for the site's search and detail pages.
//!
//! Keep every selector here so a markup change on the site is a one-file fix.

use std::sync::LazyLock;

use scraper::Selector;

fn parse(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// Selectors for search result pages.
pub mod search {
    use super::*;

    /// A cell of a result row; the first one holds the top hit.
    pub static RESULT_CELL: LazyLock<Selector> = LazyLock::new(|| parse("td"));

    /// Link inside a result cell.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| parse("a[href]"));

    /// Banner shown when a search matched nothing.
    pub static NO_RESULTS: LazyLock<Selector> = LazyLock::new(|| parse(".text-danger"));
}

/// Selectors for ingredient detail pages.
pub mod ingredient {
    use super::*;

    pub static NAME: LazyLock<Selector> = LazyLock::new(|| parse(".text-vampire"));

    /// Comma-separated alias list.
    pub static ALIASES: LazyLock<Selector> =
        LazyLock::new(|| parse("div.chem.mb-5 > div.mb-2"));

    /// Block holding molecular weight, HLB and CAS number.
    pub static CHEMISTRY: LazyLock<Selector> =
        LazyLock::new(|| parse("div.d-flex.justify-content-between"));

    pub static DESCRIPTION: LazyLock<Selector> =
        LazyLock::new(|| parse("div.chem.mb-5 > div.linkb1.ls-2.lh-1"));
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    pub static BRAND: LazyLock<Selector> = LazyLock::new(|| parse(".brand-name"));

    pub static NAME: LazyLock<Selector> = LazyLock::new(|| parse(".prod-name"));

    /// One row of the ingredient table.
    pub static INGREDIENT_ROW: LazyLock<Selector> = LazyLock::new(|| parse(".tr-i"));

    pub static CELL: LazyLock<Selector> = LazyLock::new(|| parse("td"));

    pub static LINK: LazyLock<Selector> = LazyLock::new(|| parse("a[href]"));

    /// Plain-text name of an ingredient the site could not link.
    pub static UNLINKED_NAME: LazyLock<Selector> = LazyLock::new(|| parse(".text-muted"));
}
