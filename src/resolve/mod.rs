pub mod handler;

use std::fmt;

use crate::error::{Error, Result};
use crate::identity::{EntityKind, identifier_from_address};
use crate::site::page::descendant_attr;
use crate::site::selectors::search;
use crate::site::{Page, SiteClient, SiteConfig, SortOrder};
use crate::text::{normalize_query, strip_stop_words};

pub use handler::{GiveUp, NoResultsHandler, Prompt, Reply, SKIP, SkipAll};

/// Terminal link state of an ingredient or product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Not resolved yet; a later attempt may still succeed.
    #[default]
    Unlinked,
    /// Resolved to a detail address.
    Linked,
    /// The operator abandoned the search.
    Skipped,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlinked => write!(f, "unlinked"),
            Self::Linked => write!(f, "linked"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// A single search to run through the resolver.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub kind: EntityKind,
    /// Display name to search for.
    pub name: &'a str,
    /// Preferred search key (e.g., a CAS number); wins over `name`.
    pub priority_key: Option<&'a str>,
    pub sort: SortOrder,
}

impl<'a> SearchRequest<'a> {
    pub fn new(kind: EntityKind, name: &'a str) -> Self {
        Self {
            kind,
            name,
            priority_key: None,
            sort: SortOrder::Default,
        }
    }

    pub fn priority_key(mut self, key: Option<&'a str>) -> Self {
        self.priority_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// The normalized query this request starts from.
    pub fn seed_query(&self) -> String {
        normalize_query(self.priority_key.unwrap_or(self.name))
    }
}

/// Outcome of a completed resolution attempt.
#[derive(Debug)]
pub enum Resolution {
    /// Resolved to `address`. `page` is set when the search itself landed on
    /// the detail page, so extraction need not fetch it again.
    Linked { address: String, page: Option<Page> },
    /// The operator answered [`SKIP`].
    Skipped,
}

/// What a search response says about the query.
enum Outcome {
    /// The response is itself a detail page.
    Landed,
    /// Link of the top result row.
    TopHit(String),
    /// The site reported that nothing matched.
    NoResults,
}

/// Drives search → disambiguate → confirm against the site.
///
/// One request is in flight at a time; transport failures propagate
/// unretried.
pub struct Resolver<C> {
    client: C,
    config: SiteConfig,
    handler: Box<dyn NoResultsHandler>,
}

impl<C: SiteClient> Resolver<C> {
    pub fn new(client: C, config: SiteConfig, handler: impl NoResultsHandler + 'static) -> Self {
        Self {
            client,
            config,
            handler: Box::new(handler),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Replace the no-results strategy.
    pub fn set_handler(&mut self, handler: impl NoResultsHandler + 'static) {
        self.handler = Box::new(handler);
    }

    /// Fetch a detail page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the fetch fails.
    pub fn fetch(&self, url: &str) -> Result<Page> {
        self.client.get(url)
    }

    /// Search until the request is linked or skipped.
    ///
    /// Empty searches are retried once with the configured stop words
    /// removed; after that the handler decides whether to retry with a new
    /// query, skip, or give up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSearchResults`] if the handler gives up and
    /// [`Error::Transport`] if a request fails.
    pub fn resolve(&mut self, request: &SearchRequest<'_>) -> Result<Resolution> {
        let kind = request.kind;
        let mut query = request.seed_query();
        let mut stop_words_tried = false;

        loop {
            if !query.is_empty() {
                let url = self.config.search_url(kind, &query, request.sort);
                tracing::debug!(%kind, %query, "searching");
                let page = self.client.get(&url)?;

                match self.classify(&page, kind) {
                    Outcome::Landed => {
                        tracing::info!(%kind, %query, address = %page.url, "linked (direct hit)");
                        return Ok(Resolution::Linked {
                            address: page.url.clone(),
                            page: Some(page),
                        });
                    }
                    Outcome::TopHit(address) => {
                        tracing::info!(%kind, %query, %address, "linked (top result)");
                        return Ok(Resolution::Linked {
                            address,
                            page: None,
                        });
                    }
                    Outcome::NoResults => {}
                }

                if !stop_words_tried {
                    stop_words_tried = true;
                    let shorter = strip_stop_words(&query, &self.config.stop_words);
                    if !shorter.is_empty() && shorter != query {
                        tracing::debug!(%kind, from = %query, to = %shorter, "retrying without stop words");
                        query = shorter;
                        continue;
                    }
                }
            }

            match self.handler.on_no_results(kind, &query) {
                Reply::Retry(next) => {
                    tracing::debug!(%kind, from = %query, to = %next, "retrying with replacement query");
                    query = normalize_query(&next);
                }
                Reply::Skip => {
                    tracing::info!(%kind, %query, "skipped");
                    return Ok(Resolution::Skipped);
                }
                Reply::GiveUp => return Err(Error::NoSearchResults { kind, query }),
            }
        }
    }

    fn classify(&self, page: &Page, kind: EntityKind) -> Outcome {
        // A redirect straight to the detail page also carries result-like
        // table cells (the ingredient table), so check the address first.
        if identifier_from_address(&page.url, kind).is_ok() {
            return Outcome::Landed;
        }
        if let Some(href) = page
            .first(&search::RESULT_CELL)
            .and_then(|cell| descendant_attr(cell, &search::LINK, "href"))
        {
            return Outcome::TopHit(self.config.absolute(&href));
        }
        if page.has(&search::NO_RESULTS) {
            Outcome::NoResults
        } else {
            Outcome::Landed
        }
    }
}
