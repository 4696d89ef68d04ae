use clap::Parser;
use pricefeed_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nInterrupted, shutting down");
                process::exit(130);
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {error}");
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Pricefeed Processor - Supplier Feed Ingestion and Publication");
    println!("=============================================================");
    println!();
    println!("Ingest supplier price/stock feeds, apply per-profile markup and");
    println!("currency conversion, and publish versioned artifacts.");
    println!();
    println!("USAGE:");
    println!("    pricefeed-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Run the full pipeline for one supplier");
    println!("    rate        Fetch and print the effective EUR/UAH rate");
    println!("    search      Search the product catalog");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Single combined feed:");
    println!("    pricefeed-processor process autopartner /feeds/ap.csv.gz");
    println!();
    println!("    # Split feed with a brand lookup file:");
    println!("    pricefeed-processor process maxgear \\");
    println!("        --file prices=/feeds/mg_prices.csv \\");
    println!("        --file stock=/feeds/mg_stock.csv \\");
    println!("        --file brands=/feeds/mg_brands.csv");
    println!();
    println!("    # Search the published catalog:");
    println!("    pricefeed-processor search OF935");
    println!();
    println!("For detailed help on any command, use:");
    println!("    pricefeed-processor <COMMAND> --help");
}
