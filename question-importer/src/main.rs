mod cli;

use clap::Parser;
use colored::*;

use cli::{Cli, Commands};

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level());
    // RUST_LOG, when set, takes precedence over -v
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Commands::Import(args) => cli::commands::import::handle_import_command(args).await,
        Commands::Template(args) => cli::commands::template::handle_template_command(args),
    };

    if let Err(err) = result {
        log::debug!("{:?}", err);
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
