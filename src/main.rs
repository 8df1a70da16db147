mod cli;

use gallery::{
    config,
    processor::{parse_collections, ProcessOptions, Processor},
    storage,
    thumbnail::ThumbnailSettings,
};
use gallery_core::PhotoId;
use gallery_db::pool::{get_conn, init_pool, DbPool};
use gallery_db::queries::{collections, memberships, photos};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, CollectionCommand, Commands, PhotoCommand};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Missing .env is fine
    let _ = dotenvy::dotenv();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "gallery=trace,gallery_db=debug".to_string()
        } else {
            "gallery=info,gallery_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .chain()
                .find_map(|c| c.downcast_ref::<gallery_core::Error>())
                .map_or(1, |e| e.exit_code());
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Validate { config: path } = &cli.command {
        let path = path.clone().or(cli.config);
        return validate_config(path.as_deref());
    }

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    config::apply_env_overrides(&mut config);
    if let Some(db) = cli.database {
        config.database.path = db;
    }
    config::validate_config(&config)?;

    let db_path = config::database_path(&config);

    match cli.command {
        Commands::Process {
            source,
            width,
            quality,
            effort,
            collections: collection_list,
            offline_only,
            upload_only,
            overwrite,
            dry_run,
        } => {
            let options = ProcessOptions {
                settings: ThumbnailSettings::from_config(&config.thumbnail, width, quality, effort),
                collections: collection_list
                    .as_deref()
                    .map(parse_collections)
                    .unwrap_or_default(),
                offline_only,
                upload_only,
                overwrite,
                dry_run,
            };
            let store = storage::build_store(&config.storage, offline_only || dry_run)?;
            let processor =
                Processor::with_database_path(db_path, store, config.thumbnail.dir_name.clone());

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(process(&processor, &source, &options))
        }
        Commands::Collection(cmd) => collection_command(&open_database(&db_path)?, cmd),
        Commands::Photo(cmd) => photo_command(&open_database(&db_path)?, cmd),
        Commands::Validate { .. } => Ok(()),
    }
}

fn open_database(db_path: &str) -> Result<DbPool> {
    tracing::debug!("Opening database at {}", db_path);
    init_pool(db_path).with_context(|| format!("Failed to open database {db_path}"))
}

async fn process(processor: &Processor, source: &Path, options: &ProcessOptions) -> Result<()> {
    let report = processor.run(source, options).await?;

    println!("Found {} photos", report.photos.len());
    for (path, reason) in &report.skipped {
        println!("Skipped {}: {}", path.display(), reason);
    }
    if options.dry_run {
        for p in &report.photos {
            println!("  {} -> {}", p.source.display(), p.thumbnail.display());
        }
        println!("\n[DRY RUN] Nothing was written");
        return Ok(());
    }
    if let Some(t) = &report.thumbnails {
        println!(
            "Thumbnails: {} generated, {} skipped, {} failed",
            t.generated,
            t.skipped,
            t.failed.len()
        );
    }
    if !report.registered.is_empty() {
        println!("Registered: {}", report.registered.len());
    }
    if let Some(u) = &report.uploads {
        println!("Uploaded: {} ({} failed)", u.uploaded, u.failed.len());
    }
    for (name, count) in &report.added {
        println!("Collection {}: {} added", name, count);
    }

    if report.failures() > 0 {
        anyhow::bail!("{} files failed", report.failures());
    }
    Ok(())
}

fn collection_command(pool: &DbPool, cmd: CollectionCommand) -> Result<()> {
    let conn = get_conn(pool)?;

    match cmd {
        CollectionCommand::Create { name } => {
            let c = collections::create_collection(&conn, &name)?;
            println!("Created collection {} ({})", c.name, c.id);
        }
        CollectionCommand::Delete { name } => {
            if !collections::delete_collection(&conn, &name)? {
                return Err(gallery_core::Error::not_found("collection", name.trim()).into());
            }
            println!("Deleted collection {}", name.trim());
        }
        CollectionCommand::Add { name, photo } => {
            let (m, inserted) = memberships::add_photo_to_collection(&conn, photo, &name)?;
            if inserted {
                println!(
                    "Added photo {} to {} at position {}",
                    photo,
                    name.trim(),
                    m.sort_order
                );
            } else {
                println!(
                    "Photo {} is already in {} at position {}",
                    photo,
                    name.trim(),
                    m.sort_order
                );
            }
        }
        CollectionCommand::Remove { name, photo } => {
            if memberships::remove_photo_from_collection(&conn, photo, &name)? {
                println!("Removed photo {} from {}", photo, name.trim());
            } else {
                println!("Photo {} was not in {}", photo, name.trim());
            }
        }
        CollectionCommand::Show { name, json } => {
            let members = memberships::list_collection_photos(&conn, &name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&members)?);
            } else {
                println!("{} ({} photos)", name.trim(), members.len());
                for m in &members {
                    println!("  {:>4}. [{}] {}", m.sort_order, m.photo.id, m.photo.filename);
                }
            }
        }
        CollectionCommand::List { json } => {
            let list = collections::list_collections(&conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.is_empty() {
                println!("No collections");
            } else {
                for c in &list {
                    println!("{} ({} photos)", c.name, c.photo_count);
                }
            }
        }
        CollectionCommand::Move {
            name,
            photo,
            position,
        } => {
            memberships::set_sort_order(&conn, photo, &name, position)?;
            println!("Moved photo {} in {} to position {}", photo, name.trim(), position);
        }
    }

    Ok(())
}

fn photo_command(pool: &DbPool, cmd: PhotoCommand) -> Result<()> {
    let conn = get_conn(pool)?;

    match cmd {
        PhotoCommand::List { json } => {
            let list = photos::list_photos(&conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.is_empty() {
                println!("No photos");
            } else {
                for p in &list {
                    println!("[{}] {} ({})", p.id, p.filename, p.thumbnail);
                }
            }
        }
        PhotoCommand::Show { photo, json } => {
            let found = match photo.parse::<PhotoId>() {
                Ok(id) => photos::get_photo(&conn, id)?,
                Err(_) => photos::get_photo_by_filename(&conn, &photo)?,
            };
            let p = found.ok_or_else(|| gallery_core::Error::not_found("photo", &photo))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&p)?);
            } else {
                println!("ID:        {}", p.id);
                println!("Filename:  {}", p.filename);
                println!("Thumbnail: {}", p.thumbnail);
                let m = &p.metadata;
                let fields = [
                    ("Taken", &m.date_taken),
                    ("Camera", &m.camera_model),
                    ("Lens", &m.lens),
                    ("Focal", &m.focal_length),
                    ("F-stop", &m.f_stop),
                    ("Exposure", &m.exposure_time),
                    ("ISO", &m.iso),
                ];
                for (label, value) in fields {
                    if let Some(v) = value {
                        println!("{:<10} {}", format!("{label}:"), v);
                    }
                }
            }
        }
        PhotoCommand::Delete { photo } => {
            if !photos::delete_photo(&conn, photo)? {
                return Err(gallery_core::Error::not_found("photo", photo).into());
            }
            println!("Deleted photo {}", photo);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Database: {}", config.database.path.display());
    println!(
        "  Thumbnails: width {}, quality {}, effort {}, dir {}",
        config.thumbnail.width,
        config.thumbnail.quality,
        config.thumbnail.effort,
        config.thumbnail.dir_name
    );
    println!(
        "  Storage: {}",
        match (&config.storage.endpoint, &config.storage.bucket) {
            (Some(e), Some(b)) => format!("{}/{}", e.trim_end_matches('/'), b),
            _ => "not configured (offline only)".to_string(),
        }
    );

    Ok(())
}
