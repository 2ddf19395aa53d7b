use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::{CanonicalId, EntityKind};
use crate::model::{NameLookup, Product};
use crate::routine::Routine;
use crate::site::SiteConfig;

/// A routine definition as written in YAML.
///
/// ```yaml
/// name: morning
/// products:
///   - cosrx low ph good morning gel cleanser
///   - brand: Klairs
///     product: Supple Preparation Facial Toner
///   - url: https://cosdna.com/eng/cosmetic_7ac2123.html
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

/// One product line: a bare name or a map of known fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductEntry {
    Name(String),
    Fields(ProductFields),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductFields {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub product: Option<String>,
    /// Bare product page token.
    pub id: Option<String>,
    /// Product detail address.
    pub url: Option<String>,
}

impl RoutineFile {
    /// # Errors
    ///
    /// Returns the YAML error for documents of another shape.
    pub fn parse(yaml: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(yaml)
    }

    /// Read a routine definition from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoutineFile`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let file_error = |message: String| Error::RoutineFile {
            path: path.to_owned(),
            message,
        };
        let yaml = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let file = Self::parse(&yaml).map_err(|e| file_error(e.to_string()))?;
        tracing::debug!(path = %path.display(), products = file.products.len(), "loaded routine");
        Ok(file)
    }

    /// Build an unsynced routine. Entries with an `id` or `url` start linked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAddress`] for an `id` or `url` that is not
    /// a product page.
    pub fn into_routine(self, lookup: NameLookup, config: &SiteConfig) -> Result<Routine> {
        let mut routine = Routine::new(self.name.as_deref(), lookup);
        let products = self
            .products
            .iter()
            .map(|entry| entry.to_product(config))
            .collect::<Result<Vec<_>>>()?;
        routine.add(products);
        Ok(routine)
    }
}

impl ProductEntry {
    /// # Errors
    ///
    /// Returns [`Error::MalformedAddress`] for an unusable `id` or `url`.
    pub fn to_product(&self, config: &SiteConfig) -> Result<Product> {
        let fields = match self {
            Self::Name(name) => return Ok(Product::new(name)),
            Self::Fields(fields) => fields,
        };

        let mut product = match (&fields.brand, &fields.product, &fields.name) {
            (Some(brand), Some(product), _) => Product::from_parts(brand, product),
            (_, _, Some(name)) => Product::new(name),
            (Some(brand), None, None) => Product::from_parts(brand, ""),
            (None, Some(product), None) => Product::from_parts("", product),
            (None, None, None) => Product::default(),
        };

        if let Some(url) = &fields.url {
            product.link_to(url)?;
        } else if let Some(token) = &fields.id {
            let id = CanonicalId::new(EntityKind::Product, token.trim())?;
            product.link_to(&config.detail_url(&id))?;
        }
        Ok(product)
    }
}
