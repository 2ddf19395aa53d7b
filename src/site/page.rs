use scraper::{ElementRef, Html, Selector};

/// A fetched document together with the address that produced it.
///
/// `url` is the final address after redirects, which is how a search that
/// lands directly on a detail page is recognized.
#[derive(Debug)]
pub struct Page {
    pub url: String,
    html: Html,
}

impl Page {
    /// Parse an HTML body fetched from `url`.
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// The first element matching `selector`, if any.
    pub fn first<'a>(&'a self, selector: &'a Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }

    /// Whether any element matches `selector`.
    pub fn has(&self, selector: &Selector) -> bool {
        self.first(selector).is_some()
    }

    /// Trimmed text of the first element matching `selector`.
    ///
    /// `None` means the element is absent; an empty string means it is
    /// present but blank.
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.first(selector).map(|el| text_of(el, " "))
    }
}

/// Text content of `el` with its text nodes joined by `sep`.
pub fn text_of(el: ElementRef<'_>, sep: &str) -> String {
    let parts: Vec<&str> = el.text().map(str::trim).filter(|t| !t.is_empty()).collect();
    parts.join(sep)
}

/// `attr` of the first descendant of `el` matching `selector`.
pub fn descendant_attr(el: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    el.select(selector)
        .next()
        .and_then(|found| found.value().attr(attr))
        .map(|value| value.trim().to_owned())
}
