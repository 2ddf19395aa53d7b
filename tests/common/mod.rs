#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use cosroutine::Error;
use cosroutine::site::{Page, SiteClient};

pub const BASE: &str = "https://cosdna.com";

/// Canned pages keyed by address; every request is recorded.
#[derive(Default)]
pub struct FakeSite {
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

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == url).count()
    }
}

impl SiteClient for FakeSite {
    fn get(&self, url: &str) -> cosroutine::Result<Page> {
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

pub fn product_search(query: &str) -> String {
    format!("{BASE}/eng/product.php?q={query}&sort=featured")
}

pub fn ingredient_search(query: &str) -> String {
    format!("{BASE}/eng/stuff.php?q={query}")
}

pub fn search_page(hrefs: &[&str]) -> String {
    let rows: String = hrefs
        .iter()
        .map(|href| format!(r#"<tr><td><a href="{href}">result</a></td><td>-</td></tr>"#))
        .collect();
    format!("<html><body><table>{rows}</table></body></html>")
}

pub fn no_results_page() -> String {
    r#"<html><body><p class="text-danger">No results.</p></body></html>"#.to_owned()
}

pub fn ingredient_page(name: &str, aliases: &str, chemistry: &str) -> String {
    format!(
        r#"<html><body>
        <span class="text-vampire">{name}</span>
        <div class="chem mb-5"><div class="mb-2">{aliases}</div></div>
        <div class="d-flex justify-content-between">{chemistry}</div>
        </body></html>"#
    )
}

pub fn product_page(brand: &str, product: &str, rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(name, href)| {
            format!(
                r#"<tr class="tr-i"><td><a href="{href}">{name}</a></td><td>Humectant</td><td>0</td><td>0</td><td>1</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <h2 class="brand-name">{brand}</h2>
        <h1 class="prod-name">{product}</h1>
        <table>{rows}</table>
        </body></html>"#
    )
}

/// Product A = [X, Y], product B = [Y, Z].
pub fn two_products() -> FakeSite {
    FakeSite::new()
        .page(&product_search("product+a"), &search_page(&["/eng/cosmetic_aaa.html"]))
        .page(&product_search("product+b"), &search_page(&["/eng/cosmetic_bbb.html"]))
        .page(
            &format!("{BASE}/eng/cosmetic_aaa.html"),
            &product_page("", "", &[("X", "/eng/x01.html"), ("Y", "/eng/y01.html")]),
        )
        .page(
            &format!("{BASE}/eng/cosmetic_bbb.html"),
            &product_page("", "", &[("Y", "/eng/y01.html"), ("Z", "/eng/z01.html")]),
        )
}
