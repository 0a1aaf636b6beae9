use std::path::PathBuf;

use anyhow::Context;
use catalog::{Catalog, Comparison, IdSequence, Lookup, Product, load_products};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Product catalog indexed by unbalanced and balanced search trees")]
struct Cli {
    /// Product file: a count line, then `kind;description;cost;margin[;expiry]` lines
    #[arg(long, default_value = "products.txt")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the indexes and list every product
    Load,
    /// Look a product up in both indexes and compare the cost
    Search {
        #[arg(value_enum)]
        by: Dimension,
        key: String,
    },
    /// Remove a product from every index
    Remove {
        #[arg(value_enum)]
        by: Dimension,
        key: String,
    },
    /// List products whose key lies in the closed interval [from, to]
    Range {
        #[arg(value_enum)]
        by: Dimension,
        from: String,
        to: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dimension {
    Id,
    Name,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let products = load_products(&cli.data, &mut IdSequence::default())
        .with_context(|| format!("loading {}", cli.data.display()))?;
    let mut catalog = Catalog::build(products);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Load => {
            for product in catalog.products() {
                println!("{}", describe(product, today));
            }
            let (bst, avl) = catalog.id_heights();
            let times = catalog.build_times();
            println!();
            println!("products: {}", catalog.len());
            println!("height by id: bst {bst}, avl {avl}");
            println!(
                "build by id: bst {:.3} ms, avl {:.3} ms",
                millis(times.bst_by_id),
                millis(times.avl_by_id)
            );
            println!(
                "build by name: bst {:.3} ms, avl {:.3} ms",
                millis(times.bst_by_name),
                millis(times.avl_by_name)
            );
        }
        Command::Search { by, key } => {
            let comparison = match by {
                Dimension::Id => catalog.find_by_id(parse_id(&key)?),
                Dimension::Name => catalog.find_by_name(&key),
            };
            report(&comparison, today);
        }
        Command::Remove { by, key } => {
            let removed = match by {
                Dimension::Id => catalog.remove_by_id(parse_id(&key)?),
                Dimension::Name => catalog.remove_by_name(&key),
            }
            .with_context(|| format!("removing `{key}`"))?;
            println!("removed {}", describe(&removed, today));
            println!("{} products left", catalog.len());
        }
        Command::Range { by, from, to } => {
            let found = match by {
                Dimension::Id => catalog.range_by_id(parse_id(&from)?, parse_id(&to)?),
                Dimension::Name => catalog.range_by_name(&from, &to),
            };
            if found.is_empty() {
                println!("no products in [{from}, {to}]");
            }
            for product in &found {
                println!("{}", describe(product, today));
            }
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> anyhow::Result<u32> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid product id `{raw}`"))
}

fn describe(product: &Product, today: NaiveDate) -> String {
    match product.price_on(today) {
        Some(price) => format!("{product} | today $ {price:.2}"),
        None => format!("{product} | expired"),
    }
}

fn report(comparison: &Comparison, today: NaiveDate) {
    match &comparison.unbalanced.product {
        Some(product) => println!("{}", describe(product, today)),
        None => println!("not found"),
    }
    print_lookup("bst", &comparison.unbalanced);
    print_lookup("avl", &comparison.balanced);
}

fn print_lookup(label: &str, lookup: &Lookup) {
    println!(
        "{label}: {} comparisons, {:.4} ms",
        lookup.comparisons, lookup.elapsed_ms
    );
}

fn millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
