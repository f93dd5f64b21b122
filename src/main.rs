mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mq_core::config::Config;
use mq_db::pool::{init_memory_pool, init_pool};
use mq_db::seed::seed_fixtures;
use mq_db::SessionFactory;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "menuql=trace,mq_server=debug,mq_db=debug,mq_query=debug,tower_http=debug".to_string()
        } else {
            "menuql=info,mq_server=info,mq_db=info,mq_query=warn,tower_http=info".to_string()
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
        Commands::Query {
            oql,
            json,
            memory,
            explain,
        } => run_query(&oql, cli.config.as_deref(), json, memory, explain),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("menuql {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    mq_server::start(config).await?;
    Ok(())
}

fn run_query(
    oql: &str,
    config_path: Option<&Path>,
    json: bool,
    memory: bool,
    explain: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path);

    let pool = if memory {
        init_memory_pool()?
    } else {
        if let Some(parent) = config.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        init_pool(
            &config.server.db_path.to_string_lossy(),
            config.database.pool_size.max(1),
        )?
    };
    let sessions = SessionFactory::new(pool);
    let session = sessions.open_session()?;
    if memory || config.database.seed_fixtures {
        seed_fixtures(&session)?;
    }

    let query = session.create_query(oql)?;
    if explain {
        println!("{}", query.sql());
        return Ok(());
    }

    let rows = query.result_list()?;
    if json {
        let values: Vec<serde_json::Value> = rows.iter().map(|row| row.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for row in &rows {
            println!("{row}");
        }
        eprintln!("({} rows)", rows.len());
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let contents = std::fs::read_to_string(p)?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!("  Pool size: {}", config.database.pool_size);
    println!("  Seed fixtures: {}", config.database.seed_fixtures);

    for warning in config.validate() {
        println!("  warning: {warning}");
    }

    Ok(())
}
