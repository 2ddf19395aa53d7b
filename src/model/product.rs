use crate::error::Result;
use crate::identity::{CanonicalId, EntityKind, identifier_from_address};
use crate::model::ingredient::{Ingredient, SKIP_TAG};
use crate::model::lookup::NameLookup;
use crate::resolve::{LinkState, Resolution, Resolver, SearchRequest};
use crate::site::page::{descendant_attr, text_of};
use crate::site::selectors::product as sel;
use crate::site::{Page, SiteClient, SortOrder};
use crate::text::normalize;

/// Cells in a fully matched ingredient row: ingredient, function, acne,
/// irritancy, safety.
const FULL_ROW_CELLS: usize = 5;

/// Options for linking and syncing products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Result ordering for product searches.
    pub sort: SortOrder,
    /// Re-read detail pages that were already extracted.
    pub force: bool,
    /// Also fetch every contained ingredient's detail page.
    pub deep: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::Featured,
            force: false,
            deep: false,
        }
    }
}

/// A product and its formulation in site-declared order.
#[derive(Debug, Clone, Default)]
pub struct Product {
    name: String,
    pub brand: Option<String>,
    pub product: Option<String>,
    id: Option<CanonicalId>,
    address: Option<String>,
    state: LinkState,
    synced: bool,
    ingredients: Vec<Ingredient>,
    unmatched: Vec<String>,
}

impl Product {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            ..Self::default()
        }
    }

    /// A product named by its brand and product line.
    pub fn from_parts(brand: &str, product: &str) -> Self {
        let brand = brand.trim();
        let product = product.trim();
        Self {
            name: join_name(brand, product),
            brand: (!brand.is_empty()).then(|| brand.to_owned()),
            product: (!product.is_empty()).then(|| product.to_owned()),
            ..Self::default()
        }
    }

    /// Display name: `"<brand> <product>"`, or the brand alone when the page
    /// gave no product name. Without a brand it is the caller's name. Skipped products carry the [`SKIP_TAG`] prefix.
    pub fn name(&self) -> String {
        let name = match (&self.brand, &self.product) {
            (Some(brand), product) => join_name(brand, product.as_deref().unwrap_or_default()),
            (None, _) => self.name.clone(),
        };
        match self.state {
            LinkState::Skipped => format!("{SKIP_TAG}{name}"),
            _ => name,
        }
    }

    pub fn id(&self) -> Option<&CanonicalId> {
        self.id.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == LinkState::Linked
    }

    pub fn is_skipped(&self) -> bool {
        self.state == LinkState::Skipped
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Linked ingredients in formulation order.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Raw text of rows the site could not match to an ingredient page.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(Ingredient::name).collect()
    }

    pub fn ingredient_ids(&self) -> Vec<&CanonicalId> {
        self.ingredients.iter().filter_map(Ingredient::id).collect()
    }

    pub fn ingredient_addresses(&self) -> Vec<&str> {
        self.ingredients.iter().filter_map(Ingredient::address).collect()
    }

    /// Link to an explicit detail address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedAddress`] if `address` is not a
    /// product page; the product is left as it was.
    pub fn link_to(&mut self, address: &str) -> Result<()> {
        let id = identifier_from_address(address, EntityKind::Product)?;
        self.id = Some(id);
        self.address = Some(address.trim().to_owned());
        self.state = LinkState::Linked;
        Ok(())
    }

    /// Give a skipped product another search on the next link.
    pub fn retry_skipped(&mut self) {
        if self.state == LinkState::Skipped {
            self.state = LinkState::Unlinked;
            self.synced = false;
        }
    }

    /// Resolve this product by name.
    ///
    /// Already linked or skipped products return immediately. Returns the
    /// detail page when the search landed on it.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors, plus [`crate::Error::MalformedAddress`]
    /// if the resolved address is not a product page.
    pub fn link<C: SiteClient>(&mut self, resolver: &mut Resolver<C>, sort: SortOrder) -> Result<Option<Page>> {
        if self.state != LinkState::Unlinked {
            return Ok(None);
        }

        let name = self.name();
        let request = SearchRequest::new(EntityKind::Product, &name).sort(sort);
        match resolver.resolve(&request)? {
            Resolution::Linked { address, page } => {
                self.link_to(&address)?;
                Ok(page)
            }
            Resolution::Skipped => {
                self.state = LinkState::Skipped;
                Ok(None)
            }
        }
    }

    /// Link if needed, then read the detail page and its ingredient table.
    ///
    /// Returns whether anything about the product changed. Skipped products
    /// sync to an empty formulation.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Product::link`] and page fetches.
    pub fn sync<C: SiteClient>(
        &mut self,
        resolver: &mut Resolver<C>,
        lookup: &NameLookup,
        options: SyncOptions,
    ) -> Result<bool> {
        let before = (self.state, self.synced);
        let landed = self.link(resolver, options.sort)?;

        match self.state {
            LinkState::Skipped => {
                if !self.synced {
                    self.ingredients.clear();
                    self.unmatched.clear();
                    self.synced = true;
                }
            }
            LinkState::Linked if !self.synced || options.force => {
                let page = match (landed, self.address.clone()) {
                    (Some(page), _) => page,
                    (None, Some(address)) => resolver.fetch(&address)?,
                    (None, None) => return Ok(false),
                };
                self.extract(&page, lookup);
                if options.deep {
                    self.sync_ingredients(resolver, lookup, options.force)?;
                }
                return Ok(true);
            }
            LinkState::Linked if options.deep => {
                if self.sync_ingredients(resolver, lookup, options.force)? {
                    return Ok(true);
                }
            }
            _ => {}
        }

        Ok(before != (self.state, self.synced))
    }

    /// Fetch each contained ingredient's detail page, pausing between
    /// requests.
    ///
    /// Returns whether any ingredient was fetched.
    ///
    /// # Errors
    ///
    /// Stops at the first failed fetch.
    pub fn sync_ingredients<C: SiteClient>(
        &mut self,
        resolver: &mut Resolver<C>,
        lookup: &NameLookup,
        force: bool,
    ) -> Result<bool> {
        let delay = resolver.config().request_delay;
        let mut first = true;
        for ingredient in &mut self.ingredients {
            if ingredient.is_synced() && !force {
                continue;
            }
            if !first && !delay.is_zero() {
                std::thread::sleep(delay);
            }
            first = false;
            ingredient.sync(resolver, lookup)?;
        }
        Ok(!first)
    }

    /// Populate this product from its detail page.
    pub fn extract(&mut self, page: &Page, lookup: &NameLookup) {
        if let Ok(id) = identifier_from_address(&page.url, EntityKind::Product) {
            self.id = Some(id);
            self.address = Some(page.url.clone());
            self.state = LinkState::Linked;
        }

        // An empty brand field means the page has no usable naming.
        let brand = page.first_text(&sel::BRAND).unwrap_or_default();
        if !brand.is_empty() {
            self.brand = Some(brand);
            self.product = page.first_text(&sel::NAME).filter(|p| !p.is_empty());
        }

        self.ingredients.clear();
        self.unmatched.clear();
        for row in page.select(&sel::INGREDIENT_ROW) {
            let cells: Vec<_> = row.select(&sel::CELL).collect();
            if cells.len() < FULL_ROW_CELLS {
                let text = row
                    .select(&sel::UNLINKED_NAME)
                    .next()
                    .map_or_else(|| text_of(row, " "), |el| text_of(el, " "));
                let text = text.trim().to_lowercase();
                if !text.is_empty() {
                    self.unmatched.push(text);
                }
                continue;
            }

            let cell = cells[0];
            let name = normalize(&text_of(cell, " "));
            let linked = descendant_attr(cell, &sel::LINK, "href")
                .map(|href| page_absolute(page, &href))
                .and_then(|address| {
                    identifier_from_address(&address, EntityKind::Ingredient)
                        .ok()
                        .map(|id| (id, address))
                });
            match linked {
                Some((id, address)) => {
                    let display = lookup.get(&id).map_or_else(|| name.clone(), str::to_owned);
                    self.ingredients.push(Ingredient::linked(&display, id, address));
                }
                None if !name.is_empty() => self.unmatched.push(name),
                None => {}
            }
        }

        self.synced = true;
        tracing::info!(
            product = %self.name(),
            ingredients = self.ingredients.len(),
            unmatched = self.unmatched.len(),
            "product synced"
        );
    }
}

fn join_name(brand: &str, product: &str) -> String {
    match (brand.is_empty(), product.is_empty()) {
        (false, false) => format!("{brand} {product}"),
        (false, true) => brand.to_owned(),
        _ => product.to_owned(),
    }
}

/// Make a table link absolute against the page it was found on.
fn page_absolute(page: &Page, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_owned();
    }
    let origin = page
        .url
        .find("://")
        .and_then(|scheme| page.url[scheme + 3..].find('/').map(|p| scheme + 3 + p))
        .map_or(page.url.as_str(), |end| &page.url[..end]);
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/eng/{href}")
    }
}
