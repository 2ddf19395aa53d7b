//! In-memory site used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::site::{Page, SiteClient};

/// Serves canned HTML by address and records every request.
#[derive(Default)]
pub struct FakeSite {
    /// address → (final address after redirects, body)
    pages: HashMap<String, (String, String)>,
    requests: RefCell<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.redirect(url, url, body)
    }

    pub fn redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_owned(), (final_url.to_owned(), body.to_owned()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl SiteClient for FakeSite {
    fn get(&self, url: &str) -> Result<Page> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.pages.get(url) {
            Some((final_url, body)) => Ok(Page::parse(final_url.as_str(), body)),
            None => Err(Error::Transport {
                url: url.to_owned(),
                message: "http status: 404".to_owned(),
            }),
        }
    }
}

/// A search result page listing `hrefs` in order.
pub fn search_page(hrefs: &[&str]) -> String {
    let rows: String = hrefs
        .iter()
        .map(|href| format!(r#"<tr><td><a href="{href}">result</a></td><td>x</td></tr>"#))
        .collect();
    format!("<html><body><table>{rows}</table></body></html>")
}

/// A search page showing the site's no-results banner.
pub fn no_results_page() -> String {
    r#"<html><body><div class="text-danger">No results</div></body></html>"#.to_owned()
}

/// An ingredient detail page.
pub fn ingredient_page(name: &str, aliases: &str, chemistry: &str, description: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="text-vampire">{name}</h1>
        <div class="chem mb-5">
          <div class="mb-2">{aliases}</div>
          <div class="linkb1 ls-2 lh-1">{description}</div>
        </div>
        <div class="d-flex justify-content-between">{chemistry}</div>
        </body></html>"#
    )
}

/// A product detail page. Each row is `(name, Some(href))` for a linked
/// ingredient or `(name, None)` for one the site could not match.
pub fn product_page(brand: &str, product: &str, rows: &[(&str, Option<&str>)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(name, href)| match href {
            Some(href) => format!(
                r#"<tr class="tr-i"><td><a href="{href}">{name}</a></td><td>Solvent</td><td>0</td><td>0</td><td>1</td></tr>"#
            ),
            None => format!(
                r#"<tr class="tr-i"><td colspan="5"><span class="text-muted"> {name} </span></td></tr>"#
            ),
        })
        .collect();
    format!(
        r#"<html><body>
        <div class="brand-name">{brand}</div>
        <div class="prod-name">{product}</div>
        <table>{rows}</table>
        </body></html>"#
    )
}
