//! # Galley Storefront Entry Point
//!
//! Headless run of the trolley app: loads the catalog, fills a cart with one
//! product of each type, pays by card and prints the ticket.
//!
//! ## Usage
//! ```text
//! galley-storefront [--config <path>] [--demo-menu]
//!
//!   --config <path>   galley.toml to load (default: platform config dir)
//!   --demo-menu       use the built-in onboard menu instead of the catalog API
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file, then GALLEY_* overrides)
//! 3. Build the catalog client and payment gateway
//! 4. Load products into the store
//! 5. Run the scripted checkout

use std::error::Error;
use std::path::PathBuf;

use galley_core::PaymentMethod;
use galley_services::{CatalogService, HttpCatalog, StaticCatalog};
use galley_storefront::{init_tracing, AppStore, StorefrontConfig};
use tracing::info;

/// Test card the scripted checkout pays with.
const DEMO_CARD: [&str; 4] = ["4111 1111 1111 1111", "12/30", "123", "Demo Passenger"];

struct Args {
    config: Option<PathBuf>,
    demo_menu: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        demo_menu: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--demo-menu" => args.demo_menu = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let args = parse_args()?;
    let config = StorefrontConfig::load_or_default(args.config);
    info!(catalog = %config.catalog.base_url, "Starting Galley storefront");

    let catalog: Box<dyn CatalogService> = if args.demo_menu {
        Box::new(StaticCatalog::onboard_menu())
    } else {
        Box::new(HttpCatalog::new(config.catalog_config())?)
    };
    let gateway = config.payment_gateway()?;

    let mut store = AppStore::from_config(&config.session);
    store.initialize(catalog.as_ref()).await?;

    // One of each type
    let selection = store.selection_mut();
    let picks: Vec<String> = selection
        .product_types()
        .into_iter()
        .skip(1)
        .filter_map(|kind| {
            selection
                .products()
                .iter()
                .find(|p| p.product_type.as_deref() == Some(kind.as_str()))
                .map(|p| p.id.clone())
        })
        .collect();
    for id in &picks {
        selection.add_to_cart(id)?;
    }

    let quote = selection.quote();
    println!("Seat {}  |  {}", store.payment().seat(), quote.discount_label);
    for line in &quote.lines {
        println!(
            "  {:>3} x {:<24} {:>10}",
            line.quantity, line.name, line.formatted_line_total
        );
    }
    println!("  Total: {}", quote.formatted_total);
    for (currency, amount) in &quote.alternatives {
        println!("         {amount} ({currency})");
    }

    store.begin_checkout()?;
    let payment = store.payment_mut();
    let [number, expiry, cvv, holder] = DEMO_CARD;
    payment.set_card_number(number);
    payment.set_expiry_date(expiry);
    payment.set_cvv(cvv);
    payment.set_cardholder_name(holder);
    payment.process_payment(&gateway, PaymentMethod::Card).await?;

    let confirmation = store.complete_checkout()?;
    println!(
        "{} ({})",
        confirmation.message,
        confirmation.transaction_id.as_deref().unwrap_or("no transaction id")
    );

    Ok(())
}
