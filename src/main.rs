mod cli;

use cineref::{
    config,
    context::AppContext,
    reference::{recognize, ReferenceProvider},
    server,
};
use cineref_common::UserId;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn load_context(config_path: Option<&Path>) -> Result<AppContext> {
    let resolved = config::find_config_path(config_path);
    let config = config::load_config_or_default(resolved.as_deref())?;
    AppContext::new(config, resolved).context("Failed to initialize application")
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let resolved = config::find_config_path(config_path);
    let mut config = config::load_config_or_default(resolved.as_deref())?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting cineref server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let ctx = AppContext::new(config, resolved).context("Failed to initialize application")?;
    server::start_server(ctx).await
}

async fn resolve_text(text: &str, user: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let ctx = load_context(config_path)?;
    let user = user.map(UserId::new);

    let preview = ctx.references.provider().resolve(user.as_ref(), text).await?;
    match preview {
        Some(preview) => println!("{}", serde_json::to_string_pretty(&preview)?),
        None => println!("No preview"),
    }
    Ok(())
}

fn match_text(text: &str, user: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let ctx = load_context(config_path)?;
    let user = user.map(UserId::new);

    if ctx.references.provider().matches(user.as_ref(), text) {
        // matches() implies a recognized kind
        let kind = recognize(text).map(|k| k.to_string()).unwrap_or_default();
        println!("✓ Matches ({kind})");
    } else {
        println!("✗ No match");
    }
    Ok(())
}

async fn search(
    provider_id: &str,
    term: &str,
    user: Option<String>,
    limit: usize,
    config_path: Option<&Path>,
) -> Result<()> {
    let ctx = load_context(config_path)?;
    let user = user.map(UserId::new);

    let entries = ctx
        .search
        .search(user.as_ref(), provider_id, term, 0, limit)
        .await?;
    if entries.is_empty() {
        println!("No results");
    }
    for entry in entries {
        if entry.subline.is_empty() {
            println!("{}  {}", entry.title, entry.resource_url);
        } else {
            println!("{} ({})  {}", entry.title, entry.subline, entry.resource_url);
        }
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match config::find_config_path(path) {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(&p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Public URL: {}", config.server.public_url);
            println!("  TMDB API: {}", config.tmdb.api_base_url);
            println!("  Language: {}", config.tmdb.language);
            println!(
                "  Cache: {} entries per user, {}s TTL",
                config.cache.max_entries, config.cache.ttl_secs
            );
            println!("  Users with settings: {}", config.users.len());
        }
        None => {
            println!("No config file found, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cineref=trace,cineref_common=debug,tower_http=debug".to_string()
        } else {
            "cineref=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, config_path))
        }
        Commands::Resolve { text, user } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve_text(&text, user, config_path))
        }
        Commands::Match { text, user } => match_text(&text, user, config_path),
        Commands::Search {
            provider_id,
            term,
            user,
            limit,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(search(&provider_id, &term, user, limit, config_path))
        }
        Commands::Validate {
            config: validate_path,
        } => validate_config(validate_path.as_deref().or(config_path)),
        Commands::Version => {
            println!("cineref {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
