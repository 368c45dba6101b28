//! Needledrop - vinyl storefront on the command line.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! needledrop browse --page 2
//! needledrop category liquid
//! needledrop search "basic channel"
//! needledrop show 17
//!
//! # Manage the cart
//! needledrop cart add 17
//! needledrop cart list
//! needledrop cart remove 17
//!
//! # Place an order for everything in the cart
//! needledrop checkout --name "Ann" --phone "+7 999 123 45 67" --address "Main St 1"
//! ```
//!
//! # Architecture
//!
//! - One `CartStore` per process, hydrated from `NEEDLEDROP_DATA_DIR` and
//!   handed to the command being run
//! - Catalog and order service reached over REST
//! - Sentry error tracking when `SENTRY_DSN` is set

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal output is this binary's user interface
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use needledrop_core::{CartItem, OrderContact, ProductId};
use needledrop_storefront::cart::{CartStorage, CartStore, FileStorage, MemoryStorage};
use needledrop_storefront::catalog::{CatalogClient, Page, Product, RecordQuery};
use needledrop_storefront::checkout::{self, HttpOrderSubmitter};
use needledrop_storefront::config::StorefrontConfig;
use needledrop_storefront::error::{self, StorefrontError};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Cart = CartStore<Box<dyn CartStorage>>;

#[derive(Parser)]
#[command(name = "needledrop")]
#[command(author, version, about = "Browse vinyl records and order them")]
struct Cli {
    /// Keep the cart in memory only (nothing is read or written on disk)
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all records
    Browse(PageArg),
    /// List the record categories (one per catalog style)
    Categories,
    /// List records in a category
    Category {
        /// Category slug (e.g. `jungle`, `dub-techno`)
        slug: String,
        #[command(flatten)]
        page: PageArg,
    },
    /// Search records by title, artist or label
    Search {
        /// Search term
        query: String,
        #[command(flatten)]
        page: PageArg,
    },
    /// Show full details of one record
    Show {
        /// Record id
        id: ProductId,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order everything in the cart
    Checkout {
        /// Contact name
        #[arg(short, long)]
        name: String,

        /// Contact phone number
        #[arg(short, long)]
        phone: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,
    },
}

#[derive(Args)]
struct PageArg {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and total
    List,
    /// Print the number of records in the cart
    Count,
    /// Add a record to the cart
    Add {
        /// Record id
        id: ProductId,
    },
    /// Remove a record from the cart
    Remove {
        /// Record id
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to warn so command output is not interleaved with logs
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "needledrop_storefront=warn,needledrop=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> error::Result<()> {
    let storage: Box<dyn CartStorage> = if cli.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        let files = FileStorage::new(&config.data_dir);
        tracing::debug!(dir = %files.dir().display(), "Using on-disk cart");
        Box::new(files)
    };
    let mut cart: Cart = CartStore::hydrate(storage);

    // Cart badge: every view that cares about the cart subscribes to it
    let _badge = cart.subscribe(|items| {
        tracing::info!(count = items.len(), "Cart updated");
    });

    let catalog = CatalogClient::new(config)?;

    match cli.command {
        Commands::Browse(PageArg { page }) => {
            let records = catalog.list_records(&RecordQuery::all().page(page)).await?;
            print_page("All records", &records, page, &cart);
        }
        Commands::Categories => {
            for category in catalog.categories().await {
                println!("{:<20} {}", category.slug(), category.name());
            }
        }
        Commands::Category {
            slug,
            page: PageArg { page },
        } => {
            if slug.trim().is_empty() {
                return Err(StorefrontError::UnknownCategory(slug));
            }
            let category = catalog.resolve_category(slug.trim()).await;
            let records = catalog.records_in_category(&category, page).await?;
            print_page(category.name(), &records, page, &cart);
        }
        Commands::Search {
            query,
            page: PageArg { page },
        } => {
            let records = catalog.search(&query, page).await?;
            if records.results.is_empty() {
                println!("Nothing found for \"{query}\"");
            } else {
                print_page(&format!("Results for \"{query}\""), &records, page, &cart);
            }
        }
        Commands::Show { id } => {
            let record = catalog.get_record(id).await?;
            print_record(&record, cart.contains(id));
        }
        Commands::Cart { action } => run_cart(action, &mut cart, &catalog).await?,
        Commands::Checkout {
            name,
            phone,
            address,
        } => {
            let contact = OrderContact::new(&name, &phone, &address)?;
            let submitter = HttpOrderSubmitter::new(config)?;
            error::add_breadcrumb("checkout", "Submitting order", None);

            let receipt = checkout::checkout(&mut cart, &submitter, &contact).await?;
            println!("{}", receipt.message());
            println!(
                "{} record(s), total {}",
                receipt.item_count(),
                receipt.total
            );
        }
    }

    Ok(())
}

async fn run_cart(action: CartAction, cart: &mut Cart, catalog: &CatalogClient) -> error::Result<()> {
    match action {
        CartAction::List => print_cart(cart),
        CartAction::Count => println!("{}", cart.item_count()),
        CartAction::Add { id } => {
            if cart.contains(id) {
                println!("Already in cart");
                return Ok(());
            }
            let record = catalog.get_record(id).await?;
            let item = CartItem::try_from(&record)?;
            let id_str = id.to_string();
            error::add_breadcrumb("cart", "Added record", Some(&[("record_id", id_str.as_str())]));
            cart.add_to_cart(item);
            println!("Added \"{}\" ({} in cart)", record.title, cart.item_count());
        }
        CartAction::Remove { id } => {
            if cart.remove_from_cart(id) {
                println!("Removed ({} in cart)", cart.item_count());
            } else {
                println!("Not in cart");
            }
        }
        CartAction::Clear => {
            cart.clear_cart();
            println!("Cart cleared");
        }
    }

    if let Some(e) = cart.last_persist_error() {
        eprintln!("Warning: cart could not be saved ({e})");
    }

    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn price_label(product: &Product) -> String {
    product
        .display_price()
        .map_or_else(|| "-".to_string(), |price| price.display())
}

fn print_page(title: &str, page: &Page<Product>, number: u32, cart: &Cart) {
    println!("{title}");
    for record in &page.results {
        let marker = if cart.contains(record.id) { "  [in cart]" } else { "" };
        let artists = record.artist_names();
        let name = if artists.is_empty() {
            record.title.clone()
        } else {
            format!("{artists} - {}", record.title)
        };
        println!("{:>6}  {name}  {}{marker}", record.id, price_label(record));
    }
    if let Some(next) = page.next_page_number(number) {
        println!("More records: --page {next}");
    }
}

fn print_record(record: &Product, in_cart: bool) {
    println!("{} - {}", record.artist_names(), record.title);
    if let Some(label) = record.label_name() {
        println!("Label:     {label}");
    }
    println!("Price:     {}", price_label(record));

    let details = [
        ("Year", record.release_year.map(|year| year.to_string())),
        ("Genres", Some(record.genre_names()).filter(|s| !s.is_empty())),
        ("Styles", Some(record.style_names()).filter(|s| !s.is_empty())),
        ("Country", record.country.clone()),
        ("Catalog", record.catalog_number.clone()),
        ("Barcode", record.barcode.clone()),
        ("Condition", record.condition.clone()),
        ("In stock", record.stock.map(|stock| stock.to_string())),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("{:<10} {value}", format!("{label}:"));
        }
    }

    if let Some(notes) = &record.notes {
        println!("\n{notes}");
    }

    if !record.tracks.is_empty() {
        println!("\nTracklist");
        for track in &record.tracks {
            println!(
                "  {:<4} {}  {}",
                track.position,
                track.title,
                track.duration.as_deref().unwrap_or("")
            );
        }
    }

    if let Some(preview) = &record.preview {
        println!("\nPreview:   {preview}");
    }

    println!();
    if in_cart {
        println!("In cart");
    } else if record.in_stock() {
        println!("Add to cart: needledrop cart add {}", record.id);
    } else {
        println!("Out of stock");
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        let price = item
            .price()
            .map_or_else(|| "-".to_string(), |price| price.display());
        println!("{:>6}  {}  {}  {price}", item.id(), item.title(), item.artist_names());
    }
    println!("Total: {}", cart.total());
}
