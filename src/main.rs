use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cosroutine::cli::commands::{self, IngredientOptions, ProductOptions, RoutineOptions, SiteOptions};

#[derive(Parser)]
#[command(
    name = "cosroutine",
    about = "Resolve cosmetics and aggregate ingredients across a skincare routine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SiteArgs {
    /// Preferred ingredient names (JSON object keyed by page token)
    #[arg(long)]
    names: Option<PathBuf>,

    /// Never prompt: skip anything the site cannot find
    #[arg(long)]
    batch: bool,

    /// Site root (default: https://cosdna.com)
    #[arg(long)]
    base_url: Option<String>,

    /// Pause between detail-page fetches, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl From<SiteArgs> for SiteOptions {
    fn from(args: SiteArgs) -> Self {
        Self {
            base_url: args.base_url,
            delay_ms: args.delay_ms,
            timeout_secs: args.timeout_secs,
            names: args.names,
            batch: args.batch,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one ingredient
    Ingredient {
        /// Ingredient name
        name: String,

        /// CAS number to search by instead of the name
        #[arg(long)]
        cas: Option<String>,

        /// Ingredient detail page to use instead of searching
        #[arg(long)]
        url: Option<String>,

        /// Output format: yaml, json, markdown
        #[arg(long, default_value = "yaml")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Look up one product and its ingredient list
    Product {
        /// Product name
        #[arg(default_value = "")]
        name: String,

        #[arg(long, requires = "product")]
        brand: Option<String>,

        #[arg(long, requires = "brand")]
        product: Option<String>,

        /// Product detail page to use instead of searching
        #[arg(long)]
        url: Option<String>,

        /// Search order: default, latest, featured, clicks, reviews
        #[arg(long, default_value = "featured")]
        sort: String,

        /// Also read every ingredient's detail page
        #[arg(long)]
        deep: bool,

        /// Output format: yaml, json, markdown
        #[arg(long, default_value = "yaml")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Sync a routine file and report shared ingredients
    Routine {
        /// Routine definition (YAML)
        file: PathBuf,

        /// Search order: default, latest, featured, clicks, reviews
        #[arg(long, default_value = "featured")]
        sort: String,

        /// Also read every ingredient's detail page
        #[arg(long)]
        deep: bool,

        /// Retry skipped products and re-read synced ones
        #[arg(long)]
        force: bool,

        /// How many top ingredients to report
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Only count these ingredients (repeatable)
        #[arg(long)]
        mask: Vec<String>,

        /// List the products containing this ingredient (repeatable)
        #[arg(long)]
        has: Vec<String>,

        /// Output format: yaml, json, markdown
        #[arg(long, default_value = "yaml")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        site: SiteArgs,
    },
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cosroutine=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Some(Commands::Ingredient {
            name,
            cas,
            url,
            format,
            output,
            site,
        }) => commands::run_ingredient(
            &name,
            &IngredientOptions {
                site: site.into(),
                cas,
                url,
                format,
                output,
            },
        ),
        Some(Commands::Product {
            name,
            brand,
            product,
            url,
            sort,
            deep,
            format,
            output,
            site,
        }) => {
            if name.trim().is_empty() && brand.is_none() && url.is_none() {
                eprintln!("error: give a product name, --brand and --product, or --url");
                std::process::exit(1);
            }
            commands::run_product(
                &name,
                &ProductOptions {
                    site: site.into(),
                    brand,
                    product,
                    url,
                    sort,
                    deep,
                    format,
                    output,
                },
            )
        }
        Some(Commands::Routine {
            file,
            sort,
            deep,
            force,
            top,
            mask,
            has,
            format,
            output,
            site,
        }) => commands::run_routine(
            &file,
            &RoutineOptions {
                site: site.into(),
                sort,
                deep,
                force,
                top,
                mask,
                has,
                format,
                output,
            },
        ),
        None => {
            // No subcommand: clap shows help and exits
            Cli::parse_from(["cosroutine", "--help"]);
            return;
        }
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
