use std::io::{stderr, stdin};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::emit::{Format, ToMarkdown, render};
use crate::model::{Ingredient, NameLookup, Product, SyncOptions};
use crate::report::{IngredientReport, ProductReport, RoutineReport};
use crate::resolve::{Prompt, Resolver, SkipAll};
use crate::routine::{RoutineFile, TOP_DEFAULT};
use crate::site::{HttpClient, SiteClient, SiteConfig, SortOrder};

/// Site and lookup options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct SiteOptions {
    pub base_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    /// Preferred ingredient names (JSON).
    pub names: Option<PathBuf>,
    /// Skip anything the site cannot find instead of prompting.
    pub batch: bool,
}

impl SiteOptions {
    pub fn config(&self) -> SiteConfig {
        let mut config = SiteConfig::default();
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(ms) = self.delay_ms {
            config.request_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    fn lookup(&self) -> Result<NameLookup, String> {
        match &self.names {
            Some(path) => NameLookup::load(path).map_err(|e| e.to_string()),
            None => Ok(NameLookup::new()),
        }
    }

    fn resolver<C: SiteClient>(&self, client: C) -> Resolver<C> {
        let mut resolver = Resolver::new(client, self.config(), SkipAll);
        if !self.batch {
            resolver.set_handler(Prompt::new(stdin().lock(), stderr()));
        }
        resolver
    }
}

/// Options for the `ingredient` command.
#[derive(Debug, Clone)]
pub struct IngredientOptions {
    pub site: SiteOptions,
    pub cas: Option<String>,
    pub url: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
}

/// Options for the `product` command.
#[derive(Debug, Clone)]
pub struct ProductOptions {
    pub site: SiteOptions,
    pub brand: Option<String>,
    pub product: Option<String>,
    pub url: Option<String>,
    pub sort: String,
    pub deep: bool,
    pub format: String,
    pub output: Option<PathBuf>,
}

impl Default for IngredientOptions {
    fn default() -> Self {
        Self {
            site: SiteOptions::default(),
            cas: None,
            url: None,
            format: "yaml".to_owned(),
            output: None,
        }
    }
}

impl Default for ProductOptions {
    fn default() -> Self {
        Self {
            site: SiteOptions::default(),
            brand: None,
            product: None,
            url: None,
            sort: "featured".to_owned(),
            deep: false,
            format: "yaml".to_owned(),
            output: None,
        }
    }
}

/// Options for the `routine` command.
#[derive(Debug, Clone)]
pub struct RoutineOptions {
    pub site: SiteOptions,
    pub sort: String,
    pub deep: bool,
    pub force: bool,
    pub top: usize,
    pub mask: Vec<String>,
    pub has: Vec<String>,
    pub format: String,
    pub output: Option<PathBuf>,
}

impl Default for RoutineOptions {
    fn default() -> Self {
        Self {
            site: SiteOptions::default(),
            sort: "featured".to_owned(),
            deep: false,
            force: false,
            top: TOP_DEFAULT,
            mask: Vec::new(),
            has: Vec::new(),
            format: "yaml".to_owned(),
            output: None,
        }
    }
}

/// Run the `ingredient` command: resolve one ingredient and report it.
///
/// # Errors
///
/// Returns an error string if the lookup table, resolution, or output fails.
pub fn run_ingredient(name: &str, options: &IngredientOptions) -> Result<String, String> {
    let client = HttpClient::new(&options.site.config());
    run_ingredient_with(client, name, options)
}

/// [`run_ingredient`] against an explicit site client.
///
/// # Errors
///
/// See [`run_ingredient`].
pub fn run_ingredient_with<C: SiteClient>(
    client: C,
    name: &str,
    options: &IngredientOptions,
) -> Result<String, String> {
    let format = Format::parse(&options.format)?;
    let lookup = options.site.lookup()?;
    let mut resolver = options.site.resolver(client);

    let mut ingredient = Ingredient::new(name);
    if let Some(cas) = &options.cas {
        ingredient = ingredient.with_cas(cas);
    }
    if let Some(url) = &options.url {
        ingredient.link_to(url).map_err(|e| e.to_string())?;
    }
    ingredient
        .sync(&mut resolver, &lookup)
        .map_err(|e| e.to_string())?;

    write_report(&IngredientReport::from(&ingredient), format, options.output.as_deref())
}

/// Run the `product` command: resolve one product and report its formulation.
///
/// # Errors
///
/// Returns an error string if the lookup table, resolution, or output fails.
pub fn run_product(name: &str, options: &ProductOptions) -> Result<String, String> {
    let client = HttpClient::new(&options.site.config());
    run_product_with(client, name, options)
}

/// [`run_product`] against an explicit site client.
///
/// # Errors
///
/// See [`run_product`].
pub fn run_product_with<C: SiteClient>(
    client: C,
    name: &str,
    options: &ProductOptions,
) -> Result<String, String> {
    let format = Format::parse(&options.format)?;
    let lookup = options.site.lookup()?;
    let mut resolver = options.site.resolver(client);

    let mut product = match (&options.brand, &options.product) {
        (Some(brand), Some(line)) => Product::from_parts(brand, line),
        _ => Product::new(name),
    };
    if let Some(url) = &options.url {
        product.link_to(url).map_err(|e| e.to_string())?;
    }
    let sync = SyncOptions {
        sort: SortOrder::parse(&options.sort),
        force: false,
        deep: options.deep,
    };
    product
        .sync(&mut resolver, &lookup, sync)
        .map_err(|e| e.to_string())?;

    write_report(&ProductReport::from(&product), format, options.output.as_deref())
}

/// Run the `routine` command: load a routine file, sync it, and report the
/// aggregates.
///
/// # Errors
///
/// Returns an error string if loading, syncing, or output fails.
pub fn run_routine(file: &Path, options: &RoutineOptions) -> Result<String, String> {
    let client = HttpClient::new(&options.site.config());
    run_routine_with(client, file, options)
}

/// [`run_routine`] against an explicit site client.
///
/// # Errors
///
/// See [`run_routine`].
pub fn run_routine_with<C: SiteClient>(
    client: C,
    file: &Path,
    options: &RoutineOptions,
) -> Result<String, String> {
    let format = Format::parse(&options.format)?;
    let lookup = options.site.lookup()?;
    let config = options.site.config();
    let mut routine = RoutineFile::load(file)
        .and_then(|f| f.into_routine(lookup, &config))
        .map_err(|e| e.to_string())?;
    let mut resolver = options.site.resolver(client);

    let sync = SyncOptions {
        sort: SortOrder::parse(&options.sort),
        force: options.force,
        deep: options.deep,
    };
    routine
        .sync_all(&mut resolver, sync)
        .map_err(|e| format!("{}: {e}", file.display()))?;

    let top = if options.mask.is_empty() {
        routine.top_ingredients(Some(options.top))
    } else {
        routine
            .top_masked(Some(options.top), &options.mask, &mut resolver)
            .map_err(|e| e.to_string())?
    };

    let mut report = RoutineReport::new(&routine, top);
    for name in &options.has {
        let products = routine.has(name, &mut resolver).map_err(|e| e.to_string())?;
        report = report.with_membership(name, products);
    }

    write_report(&report, format, options.output.as_deref())
}

fn write_report<T: serde::Serialize + ToMarkdown>(
    report: &T,
    format: Format,
    output: Option<&Path>,
) -> Result<String, String> {
    let rendered = render(report, format)?;
    if let Some(out_path) = output {
        std::fs::write(out_path, &rendered)
            .map_err(|e| format!("failed to write {}: {e}", out_path.display()))?;
        Ok(format!("report written to {}\n", out_path.display()))
    } else {
        Ok(rendered)
    }
}
