mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use kennel_core::config::Config;
use std::path::Path;

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => {
            Config::load(p).with_context(|| format!("Failed to load config {}", p.display()))
        }
        None => Ok(Config::load_or_default(None)),
    }
}

fn open_db(config: &Config) -> Result<kennel_db::pool::DbPool> {
    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(kennel_db::pool::init_pool(&db_path.to_string_lossy())?)
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting kennel server");
    kennel_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "kennel=trace,kennel_server=trace,kennel_db=debug,kennel_core=debug,tower_http=debug"
                .to_string()
        } else {
            "kennel=info,kennel_server=info,kennel_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("kennel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::AddDog { name } => add_dog(&name, cli.config.as_deref()),
        Commands::Dogs { json } => list_dogs(cli.config.as_deref(), json),
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    match path {
        Some(p) => println!("Configuration: {}", p.display()),
        None => println!("Configuration: built-in defaults"),
    }

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration is valid.");
    } else {
        println!("Configuration is valid with {} warning(s):", warnings.len());
        for w in &warnings {
            println!("  - {w}");
        }
    }

    println!("\nServer: {}:{}", config.server.host, config.server.port);
    println!("Database: {}", config.server.db_path.display());
    println!("Photo storage: {}", config.photos.storage_dir.display());
    println!("Upload limit: {} bytes", config.photos.max_upload_bytes);
    Ok(())
}

fn add_dog(name: &str, config_path: Option<&Path>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Dog name must not be empty");
    }

    let config = load_config(config_path)?;
    let pool = open_db(&config)?;
    let conn = kennel_db::pool::get_conn(&pool)?;
    let dog = kennel_db::queries::dogs::create_dog(&conn, name)?;

    tracing::info!(dog_id = %dog.id, "Dog registered");
    println!("Added dog {} ({})", dog.id, dog.name);
    Ok(())
}

fn list_dogs(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let pool = open_db(&config)?;
    let conn = kennel_db::pool::get_conn(&pool)?;
    let dogs = kennel_db::queries::dogs::list_dogs_by_name(&conn)?;

    if json {
        let entries: Vec<serde_json::Value> = dogs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id.get(),
                    "name": d.name,
                    "created_at": d.created_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if dogs.is_empty() {
        println!("No dogs registered.");
        return Ok(());
    }
    for dog in &dogs {
        println!("{:>6}  {}", dog.id, dog.name);
    }
    Ok(())
}
