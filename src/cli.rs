use crate::fetch::FetchOptions;
use crate::models::{Args, Commands};
use crate::{config, fetch, refresh, render};
use anyhow::Result;
use clap::Parser;

/// Main CLI entry point
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::List { config, tags } => {
            let location = config::config_location(config.as_deref())?;
            let loaded = config::load(&location)?;
            render::print_list(&loaded.repositories, &expand_tags(tags.as_deref()));
        }
        Commands::Tags { config } => {
            let location = config::config_location(config.as_deref())?;
            let loaded = config::load(&location)?;
            render::print_tags(&loaded.repositories);
        }
        Commands::Refresh { config } => {
            let location = config::config_location(config.as_deref())?;
            let loaded = config::load(&location)?;
            refresh::run(&location, loaded.auth.token.as_deref())?;
        }
        Commands::Fetch {
            argument,
            config,
            update,
            tags,
            dry_run,
        } => {
            let location = config::config_location(config.as_deref())?;
            let opts = FetchOptions {
                update,
                tags: expand_tags(tags.as_deref()),
                dry_run,
            };
            fetch::run(&location, argument.as_deref(), &opts)?;
        }
    }

    Ok(())
}

/// Split a comma-separated tag list into individual tags
fn expand_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
