use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use spooldex::config::AppConfig;
use spooldex::logging::{LoggingConfig, init_logging};
use spooldex::model::{FilamentColor, SpoolStatus};
use spooldex::storage::JsonFileStore;
use spooldex::{Session, SessionOptions};

#[derive(Parser)]
#[command(name = "spooldex")]
#[command(about = "Filament spool inventory", long_about = None)]
struct Cli {
    /// Directory holding catalog.json and inventory.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "spooldex=trace"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spool counts and remaining weight
    Summary,
    /// Print the whole catalog tree
    Catalog,
    /// Search catalog colors by color, material or brand name
    Search { query: String },
    /// List inventory items and their spools
    List {
        /// Only items running low
        #[arg(long)]
        low: bool,
    },
    /// Seed the starter catalog, and optionally the demo inventory
    Seed {
        #[arg(long)]
        samples: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from_default_path().unwrap_or_default();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        default_level: config.preferences.log_level.to_level_filter(),
        ..LoggingConfig::default()
    });

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir())
        .context("Could not determine a data directory; pass --data-dir")?;
    log::debug!("Using data directory {:?}", data_dir);

    let mut session = Session::open(
        JsonFileStore::new(data_dir),
        SessionOptions::from(&config),
    );

    if session.catalog_read_only() || session.inventory_read_only() {
        eprintln!("warning: stored data could not be read; changes will not be saved");
    }

    match cli.command {
        Commands::Summary => print_summary(&session),
        Commands::Catalog => print_catalog(&session),
        Commands::Search { query } => {
            let results = session.search(&query);
            if results.is_empty() {
                println!("No colors match {:?}", query);
            }
            for color in results {
                print_search_hit(&session, color);
            }
        }
        Commands::List { low } => print_inventory(&session, low),
        Commands::Seed { samples } => {
            let seeded = session.seeded_on_open();
            if seeded.catalog {
                println!("Seeded starter catalog");
            } else if session.catalog_read_only() {
                println!("Stored catalog is unreadable; not seeding over it");
            } else {
                println!(
                    "Catalog already has {} colors",
                    session.catalog().color_count()
                );
            }

            let added = seeded.sample_items
                + if samples {
                    session.seed_sample_inventory()
                } else {
                    0
                };
            if added > 0 {
                println!("Added {} sample items", added);
            } else if samples {
                println!(
                    "Inventory already has {} items; samples not added",
                    session.inventory().len()
                );
            }
        }
    }

    Ok(())
}

fn print_summary(session: &Session<JsonFileStore>) {
    let summary = session.summary();
    println!("Items:            {}", summary.item_count);
    println!("Spools:           {}", summary.total_spools);
    println!("  full:           {}", summary.full_spools);
    println!("  partially used: {}", summary.partially_used_spools);
    println!("  empty:          {}", summary.empty_spools);
    println!(
        "Remaining:        {:.0} g",
        summary.estimated_remaining_grams
    );

    if !summary.by_brand.is_empty() {
        println!("\nBy brand:");
        for group in &summary.by_brand {
            println!("  {:<24} {}", group.name, group.spool_count);
        }
    }
    if !summary.by_type.is_empty() {
        println!("\nBy material:");
        for group in &summary.by_type {
            println!("  {:<24} {}", group.name, group.spool_count);
        }
    }

    let low = session.low_stock();
    if !low.is_empty() {
        println!("\nRunning low:");
        for item in low {
            println!(
                "  {} {} ({:.0}%)",
                item.display_name(),
                item.color_name,
                item.average_remaining_percentage()
            );
        }
    }
}

fn color_flags(color: &FilamentColor) -> String {
    let mut flags = Vec::new();
    if color.is_transparent {
        flags.push("transparent");
    }
    if color.is_metallic {
        flags.push("metallic");
    }
    if color.is_gradient() {
        flags.push(color.gradient_kind.name());
    }
    if !color.has_spool {
        flags.push("refill");
    }
    if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    }
}

fn print_catalog(session: &Session<JsonFileStore>) {
    let catalog = session.catalog();
    for brand in catalog.fetch_brands() {
        println!("{}", brand.name);
        for material in catalog.fetch_material_types(brand.id) {
            match &material.properties {
                Some(props) => println!("  {} ({})", material.name, props),
                None => println!("  {}", material.name),
            }
            for color in catalog.fetch_colors(material.id) {
                let code = color
                    .product_code
                    .as_deref()
                    .map(|c| format!(" #{}", c))
                    .unwrap_or_default();
                println!(
                    "    {} {}{}{}",
                    color.color.to_hex(),
                    color.name,
                    code,
                    color_flags(color)
                );
            }
        }
    }
}

fn print_search_hit(session: &Session<JsonFileStore>, color: &FilamentColor) {
    if let Some(path) = session.catalog().color_path(color.id) {
        println!(
            "{} {} / {} / {}{}",
            color.color.to_hex(),
            path.brand.name,
            path.material_type.name,
            color.name,
            color_flags(color)
        );
    }
}

fn print_inventory(session: &Session<JsonFileStore>, low_only: bool) {
    let items = if low_only {
        session.low_stock()
    } else {
        session.inventory().iter().collect()
    };
    if items.is_empty() {
        println!("Inventory is empty");
        return;
    }

    for item in items {
        println!(
            "{} {} - {} ({} g, {})",
            item.resolved_color().to_hex(),
            item.display_name(),
            item.color_name,
            item.weight_grams,
            item.diameter_mm
        );
        for spool in &item.spools {
            let status = match spool.status() {
                SpoolStatus::Full => "full",
                SpoolStatus::Partial => "partial",
                SpoolStatus::Empty => "empty",
            };
            if spool.notes.is_empty() {
                println!("    {:>5.1}% {}", spool.remaining_percentage(), status);
            } else {
                println!(
                    "    {:>5.1}% {} - {}",
                    spool.remaining_percentage(),
                    status,
                    spool.notes
                );
            }
        }
        if !item.notes.is_empty() {
            println!("    note: {}", item.notes);
        }
    }
}
