pub mod analysis;
pub mod file;

use std::collections::HashSet;

use crate::error::Result;
use crate::identity::CanonicalId;
use crate::model::{Ingredient, NameLookup, Product, SyncOptions};
use crate::resolve::Resolver;
use crate::site::{SiteClient, SortOrder};

pub use analysis::{Analysis, UNAVAILABLE};
pub use file::RoutineFile;

/// Default size of [`Routine::top`].
pub const TOP_DEFAULT: usize = 10;

/// One or many products to add to a routine.
#[derive(Debug, Clone)]
pub enum RoutineEntry {
    /// A product known only by name.
    Name(String),
    Product(Box<Product>),
    Many(Vec<RoutineEntry>),
}

impl RoutineEntry {
    fn flatten_into(self, out: &mut Vec<Product>) {
        match self {
            Self::Name(name) if name.trim().is_empty() => {}
            Self::Name(name) => out.push(Product::new(&name)),
            Self::Product(product) => {
                if !product.name().trim().is_empty() || product.address().is_some() {
                    out.push(*product);
                }
            }
            Self::Many(entries) => {
                for entry in entries {
                    entry.flatten_into(out);
                }
            }
        }
    }
}

impl From<&str> for RoutineEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for RoutineEntry {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Product> for RoutineEntry {
    fn from(product: Product) -> Self {
        Self::Product(Box::new(product))
    }
}

impl<T: Into<RoutineEntry>> From<Vec<T>> for RoutineEntry {
    fn from(entries: Vec<T>) -> Self {
        Self::Many(entries.into_iter().map(Into::into).collect())
    }
}

/// An ordered collection of products whose ingredients are aggregated.
///
/// The routine owns the name lookup table it hands to extraction and keeps
/// an [`Analysis`] that is rebuilt whenever a product changes.
#[derive(Debug, Clone, Default)]
pub struct Routine {
    name: Option<String>,
    products: Vec<Product>,
    lookup: NameLookup,
    analysis: Analysis,
}

impl Routine {
    pub fn new(name: Option<&str>, lookup: NameLookup) -> Self {
        Self {
            name: name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned),
            lookup,
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Append products in order. Blank names are dropped.
    pub fn add(&mut self, entry: impl Into<RoutineEntry>) {
        let before = self.products.len();
        entry.into().flatten_into(&mut self.products);
        if self.products.len() != before {
            self.refresh();
        }
    }

    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(Product::name).collect()
    }

    /// Detail addresses of linked products.
    pub fn addresses(&self) -> Vec<&str> {
        self.products.iter().filter_map(Product::address).collect()
    }

    pub fn brands(&self) -> Vec<&str> {
        self.products.iter().filter_map(|p| p.brand.as_deref()).collect()
    }

    /// Whether every product is linked.
    pub fn is_linked(&self) -> bool {
        self.products.iter().all(Product::is_linked)
    }

    pub fn is_synced(&self) -> bool {
        self.products.iter().all(Product::is_synced)
    }

    /// Distinct ingredient display names in first-seen order.
    pub fn ingredients(&self) -> Vec<String> {
        self.analysis.column_names()
    }

    /// Product name and its unmatched ingredient text, for products that
    /// have any.
    pub fn unmatched(&self) -> Vec<(String, &[String])> {
        self.products
            .iter()
            .filter(|p| !p.unmatched().is_empty())
            .map(|p| (p.name(), p.unmatched()))
            .collect()
    }

    /// Resolve every product without reading detail pages.
    ///
    /// With `force`, skipped products are searched again. Products that
    /// cannot be found are logged and stay unlinked.
    ///
    /// # Errors
    ///
    /// Stops at the first transport failure.
    pub fn link_all<C: SiteClient>(&mut self, resolver: &mut Resolver<C>, sort: SortOrder, force: bool) -> Result<()> {
        for product in &mut self.products {
            if force {
                product.retry_skipped();
            }
            match product.link(resolver, sort) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(product = %product.name(), error = %e, "could not link product");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Resolve and extract every product, pausing between products.
    ///
    /// Aggregates are rebuilt once at the end if any product changed.
    ///
    /// # Errors
    ///
    /// Stops at the first transport failure, after rebuilding aggregates for
    /// whatever already changed.
    pub fn sync_all<C: SiteClient>(&mut self, resolver: &mut Resolver<C>, options: SyncOptions) -> Result<()> {
        let delay = resolver.config().request_delay;
        let mut changed = false;
        let mut outcome = Ok(());
        let mut first = true;

        for product in &mut self.products {
            if options.force {
                product.retry_skipped();
            }
            let idle = product.is_synced() && !options.force && !options.deep;
            if idle {
                continue;
            }
            if !first && !delay.is_zero() {
                std::thread::sleep(delay);
            }
            first = false;

            match product.sync(resolver, &self.lookup, options) {
                Ok(c) => changed |= c,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(product = %product.name(), error = %e, "could not sync product");
                }
                Err(e) => {
                    changed = true;
                    outcome = Err(e);
                    break;
                }
            }
        }

        if changed {
            self.refresh();
        }
        tracing::info!(
            products = self.products.len(),
            ingredients = self.analysis.universe().len(),
            changed,
            "routine synced"
        );
        outcome
    }

    /// The `limit` most frequent ingredients, ties in first-seen order.
    pub fn top_ingredients(&self, limit: Option<usize>) -> Vec<(String, usize)> {
        self.analysis.top(limit, None)
    }

    /// The ten most frequent ingredients.
    pub fn top(&self) -> Vec<(String, usize)> {
        self.top_ingredients(Some(TOP_DEFAULT))
    }

    /// Like [`Routine::top_ingredients`], counting only the ingredients
    /// named in `mask`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if resolving a mask name fails.
    pub fn top_masked<C: SiteClient>(
        &self,
        limit: Option<usize>,
        mask: &[String],
        resolver: &mut Resolver<C>,
    ) -> Result<Vec<(String, usize)>> {
        let mut ids = HashSet::new();
        for name in mask {
            if let Some(id) = self.locate(name, resolver)? {
                ids.insert(id);
            }
        }
        Ok(self.analysis.top(limit, Some(&ids)))
    }

    /// Names of the products containing `ingredient`.
    ///
    /// Ingredients absent from the routine yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns a transport error if resolving the name fails.
    pub fn has<C: SiteClient>(&self, ingredient: &str, resolver: &mut Resolver<C>) -> Result<Vec<String>> {
        let Some(id) = self.locate(ingredient, resolver)? else {
            return Ok(Vec::new());
        };
        let rows = self.analysis.rows_containing(&id);
        if rows.is_empty() {
            tracing::warn!(ingredient, %id, "ingredient is not in this routine");
        }
        Ok(rows.into_iter().map(|row| self.products[row].name()).collect())
    }

    /// Canonical identifier for an ingredient name, matched against the
    /// routine's own ingredients before searching the site.
    fn locate<C: SiteClient>(&self, name: &str, resolver: &mut Resolver<C>) -> Result<Option<CanonicalId>> {
        let local = self
            .products
            .iter()
            .flat_map(Product::ingredients)
            .find(|i| i.answers_to(name))
            .and_then(|i| i.id().cloned());
        if local.is_some() {
            return Ok(local);
        }

        let mut ingredient = Ingredient::new(name);
        match ingredient.link(resolver) {
            Ok(_) => {
                if ingredient.id().is_none() {
                    tracing::warn!(ingredient = name, "ingredient was skipped");
                }
                Ok(ingredient.id().cloned())
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(ingredient = name, error = %e, "could not resolve ingredient");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn refresh(&mut self) {
        self.analysis = Analysis::compute(&self.products);
    }
}
