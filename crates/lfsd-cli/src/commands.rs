use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use lfsd_reconcile::{CancelFlag, FsTreeSource, ReconcileOptions, Reconciler};
use lfsd_server::{LfsdServer, ServerConfig};
use lfsd_store::{DbMetaStore, MetaStore};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Refresh(args) => cmd_refresh(config, args, &cli.format),
        Command::Objects(args) => cmd_objects(config, args, &cli.format),
        Command::Users(args) => cmd_users(config, args, &cli.format),
    }
}

/// Defaults, overlaid by the TOML file when one is given.
fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn apply_store_args(config: &mut ServerConfig, args: StoreArgs) {
    if let Some(meta_db) = args.meta_db {
        config.meta_db = meta_db;
    }
}

fn open_store(config: &ServerConfig) -> anyhow::Result<DbMetaStore> {
    DbMetaStore::open(&config.meta_db)
        .with_context(|| format!("opening metadata store {}", config.meta_db.display()))
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(listen) = args.listen {
        config.bind_addr = listen;
    }
    if let Some(content_path) = args.content_path {
        config.content_path = content_path;
    }
    apply_store_args(&mut config, args.store);
    if let Some(user) = args.admin_user {
        config.admin_user = user;
    }
    if let Some(pass) = args.admin_pass {
        config.admin_pass = pass;
    }
    tracing::debug!(?config, "resolved configuration");

    if !config.admin_enabled() {
        tracing::warn!("admin user or password not set, admin surface disabled");
    }

    let server = LfsdServer::open(config)?;
    println!(
        "{} lfsd admin on {} (content: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().content_path.display()
    );
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_refresh(mut config: ServerConfig, args: RefreshArgs, format: &OutputFormat) -> anyhow::Result<()> {
    if let Some(content_path) = args.content_path {
        config.content_path = content_path;
    }
    apply_store_args(&mut config, args.store);
    if let Some(batch_size) = args.batch_size {
        config.refresh_batch_size = batch_size;
    }

    let store = Arc::new(open_store(&config)?);
    let reconciler = Reconciler::with_options(
        store,
        ReconcileOptions {
            batch_size: config.refresh_batch_size,
        },
    );
    let source = FsTreeSource::new(config.content_path.clone());
    let report = reconciler.run(&source, &CancelFlag::new());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let mark = if report.failures() == 0 {
                "✓".green().bold()
            } else {
                "!".yellow().bold()
            };
            println!("{mark} Refreshed {}", config.content_path.display().to_string().bold());
            println!("  {report}");
        }
    }
    Ok(())
}

fn cmd_objects(mut config: ServerConfig, args: StoreArgs, format: &OutputFormat) -> anyhow::Result<()> {
    apply_store_args(&mut config, args);
    let objects = open_store(&config)?.objects()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&objects)?),
        OutputFormat::Text => {
            if objects.is_empty() {
                println!("No objects.");
            }
            for o in &objects {
                println!("{}  {}", o.id.to_string().yellow(), o.size);
            }
        }
    }
    Ok(())
}

fn cmd_users(mut config: ServerConfig, args: UsersArgs, format: &OutputFormat) -> anyhow::Result<()> {
    apply_store_args(&mut config, args.store);
    let store = open_store(&config)?;

    match args.action.unwrap_or(UsersAction::List) {
        UsersAction::List => {
            let users = store.users()?;
            match format {
                OutputFormat::Json => {
                    // Credentials stay out of the listing.
                    let view: Vec<_> = users
                        .iter()
                        .map(|u| json!({ "name": u.name, "created_at": u.created_at.to_rfc3339() }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
                OutputFormat::Text => {
                    if users.is_empty() {
                        println!("No users.");
                    }
                    for u in &users {
                        println!("{}  {}", u.name.bold(), u.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed());
                    }
                }
            }
        }
        UsersAction::Add { name, password } => {
            store.add_user(&name, &password)?;
            println!("{} Added user {}", "✓".green().bold(), name.yellow());
        }
        UsersAction::Del { name } => {
            store.delete_user(&name)?;
            println!("{} Deleted user {}", "✓".green().bold(), name.yellow());
        }
    }
    Ok(())
}
