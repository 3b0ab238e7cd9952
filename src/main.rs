//! wslnet - WSL network setup helper
//!
//! (Re)creates the WSL virtual network with a fixed /24 subnet and adds a
//! stable address for the guest inside it.

mod address;
mod cli;
mod error;
mod guest;
mod manifest;
mod network;
mod provision;

use address::DerivedBlock;
use cli::Cli;
use error::Result;
use guest::WslGuest;
use network::NetworkDocument;
use provision::{Outcome, Provisioner};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if let Some(shell) = cli.completion {
        Cli::generate_completion(shell);
        return Ok(());
    }

    init_logging(cli.verbose);

    println!("\nwslnet: WSL network setup helper\n");

    let config = manifest::load_or_default(cli.config.as_deref())?;
    let input = cli.address.as_deref().unwrap_or("");

    if cli.dry_run {
        let block = DerivedBlock::resolve(input, &config.default_address)?;
        print_summary(&block);
        println!("{}", NetworkDocument::for_block(&block).to_json_pretty()?);
        return Ok(());
    }

    let host = network::DefaultHost::default();
    let guest = WslGuest::new(config.guest.clone());
    let report = Provisioner::new(&host, &guest, &config.guest.interface)
        .provision(input, &config.default_address)?;

    if let Outcome::Created { alias, replaced } = &report.outcome {
        tracing::debug!(replaced, "network provisioned");
        if let Err(e) = alias {
            println!("Warning: {} (ignore if the address is already set)", e);
        }

        println!("\nWSL network setup done");
        print_summary(&report.block);
    }

    if report.needs_guest_restart() {
        println!(
            "Note: WSL is already running - use 'wsl --shutdown' and restart to enforce new settings!\n"
        );
    }

    Ok(())
}

fn print_summary(block: &DerivedBlock) {
    println!("----------------------------------------");
    println!("Address: [{}]", block.address);
    println!("Network: [{}]", block.network);
    println!("Gateway: [{}]\n", block.gateway);
}

/// Log to stderr; `--verbose` enables debug output, `RUST_LOG` overrides
fn init_logging(verbose: bool) {
    let default = if verbose { "wslnet=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
