//! idmap CLI - Main entry point

use clap::Parser;
use idmap_cli::commands::translate::TranslateRequest;
use idmap_cli::{CacheCommand, Cli, Commands, ConfigCommand};
use idmap_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("idmap")
        .build();

    // LOG_* variables take precedence over the flag
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn execute_command(cli: Cli) -> idmap_cli::Result<()> {
    let Some(command) = cli.command else {
        return Ok(());
    };

    let config = idmap_cli::config::load(
        cli.config.as_deref(),
        cli.cache_dir.as_deref(),
        cli.organism.as_deref(),
    )?;

    match command {
        Commands::Translate {
            id_type,
            target_id_type,
            names,
            strict,
            no_cleanup,
            keep_complexes,
            first,
            format,
        } => idmap_cli::commands::translate::run(
            config,
            TranslateRequest {
                id_type,
                target_id_type,
                names,
                strict,
                no_cleanup,
                keep_complexes,
                first,
                format,
            },
        ),
        Commands::Table {
            id_type,
            target_id_type,
            output,
            format,
        } => idmap_cli::commands::table::run(config, id_type, target_id_type, output, format),
        Commands::IdTypes { entity } => idmap_cli::commands::id_types::run(entity),
        Commands::Cache { command } => match command {
            CacheCommand::List => idmap_cli::commands::cache::list(&config),
            CacheCommand::Clean { all, older_than_days } => {
                idmap_cli::commands::cache::clean(&config, all, older_than_days)
            },
        },
        Commands::Config { command } => match command {
            ConfigCommand::Show => idmap_cli::commands::config::show(&config),
        },
    }
}
