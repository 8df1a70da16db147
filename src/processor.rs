//! The `process` pipeline: scan, thumbnails, register, upload, collections.
//!
//! Per-file thumbnail and upload failures, and photos skipped for a
//! thumbnail name clash, are logged and counted; the run carries on.
//! Database failures abort it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use gallery_db::models::{NewPhoto, Photo};
use gallery_db::pool::{get_conn, init_pool, DbPool};
use gallery_db::queries::{collections, memberships, photos};

use crate::storage::{upload_files, ObjectStore, UploadReport};
use crate::thumbnail::{
    read_metadata, scan_source, PhotoPaths, ThumbnailReport, ThumbnailSettings, Thumbnailer,
};

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub settings: ThumbnailSettings,
    /// Collections every processed photo is appended to.
    pub collections: Vec<String>,
    /// Generate thumbnails only; no database writes, no uploads.
    pub offline_only: bool,
    /// Skip thumbnail generation.
    pub upload_only: bool,
    /// Regenerate thumbnails that already exist.
    pub overwrite: bool,
    /// Scan and report without writing anything.
    pub dry_run: bool,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub photos: Vec<PhotoPaths>,
    /// Sources left out because their thumbnail name belongs to another photo.
    pub skipped: Vec<(PathBuf, String)>,
    pub thumbnails: Option<ThumbnailReport>,
    pub registered: Vec<Photo>,
    pub uploads: Option<UploadReport>,
    /// Memberships created, per collection, in the order given.
    pub added: Vec<(String, usize)>,
}

impl ProcessReport {
    /// Files that were skipped, or failed thumbnailing or upload.
    pub fn failures(&self) -> usize {
        self.skipped.len()
            + self.thumbnails.as_ref().map_or(0, |t| t.failed.len())
            + self.uploads.as_ref().map_or(0, |u| u.failed.len())
    }
}

/// Split a `;`-delimited collection list, trimming names and dropping
/// blanks and repeats.
pub fn parse_collections(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(';').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Where the pipeline finds its database.
enum Database {
    Open(DbPool),
    /// Opened on first use, so dry and offline-only runs never create the file.
    Deferred { path: String, pool: OnceLock<DbPool> },
}

impl Database {
    fn pool(&self) -> Result<DbPool> {
        match self {
            Database::Open(pool) => Ok(pool.clone()),
            Database::Deferred { path, pool } => {
                if let Some(pool) = pool.get() {
                    return Ok(pool.clone());
                }
                tracing::debug!("Opening database at {}", path);
                let opened =
                    init_pool(path).with_context(|| format!("Failed to open database {path}"))?;
                Ok(pool.get_or_init(|| opened).clone())
            }
        }
    }
}

pub struct Processor {
    db: Arc<Database>,
    store: Arc<dyn ObjectStore>,
    dir_name: String,
}

impl Processor {
    pub fn new(pool: DbPool, store: Arc<dyn ObjectStore>, dir_name: impl Into<String>) -> Self {
        Self {
            db: Arc::new(Database::Open(pool)),
            store,
            dir_name: dir_name.into(),
        }
    }

    /// Like [`Processor::new`], but the database file at `db_path` is only
    /// opened (and created) once a step needs it.
    pub fn with_database_path(
        db_path: impl Into<String>,
        store: Arc<dyn ObjectStore>,
        dir_name: impl Into<String>,
    ) -> Self {
        Self {
            db: Arc::new(Database::Deferred {
                path: db_path.into(),
                pool: OnceLock::new(),
            }),
            store,
            dir_name: dir_name.into(),
        }
    }

    pub async fn run(&self, source: &Path, options: &ProcessOptions) -> Result<ProcessReport> {
        if options.offline_only && options.upload_only {
            anyhow::bail!("offline-only and upload-only cannot be combined");
        }

        let scan = scan_source(source, &self.dir_name)
            .with_context(|| format!("Failed to scan {}", source.display()))?;
        let mut report = ProcessReport {
            photos: scan.photos,
            skipped: scan
                .clashes
                .into_iter()
                .map(|(dropped, kept)| {
                    let reason = format!("same thumbnail name as {}", kept.display());
                    (dropped, reason)
                })
                .collect(),
            ..Default::default()
        };

        if report.photos.is_empty() {
            tracing::info!("No photos found. Exiting early.");
            return Ok(report);
        }
        if options.dry_run {
            tracing::info!("Dry run: {} photos would be processed", report.photos.len());
            return Ok(report);
        }

        let mut usable = report.photos.clone();
        if !options.offline_only {
            let taken = self.thumbnails_owned_elsewhere(&usable).await?;
            usable.retain(|p| !taken.iter().any(|(src, _)| *src == p.source));
            report.skipped.extend(taken);
        }

        if options.upload_only {
            tracing::info!("Thumbnail generation DISABLED");
        } else {
            let thumbnails = self.generate_thumbnails(&usable, options).await?;
            usable.retain(|p| !thumbnails.failed.iter().any(|(src, _)| *src == p.source));
            report.thumbnails = Some(thumbnails);
        }

        if options.offline_only {
            tracing::info!("File uploads DISABLED");
            if !options.collections.is_empty() {
                tracing::warn!("Collections are ignored in offline-only mode");
            }
            return Ok(report);
        }

        tracing::info!("Updating photo table...");
        report.registered = self.register(&usable).await?;

        tracing::info!("Pushing images and thumbnails to {}...", self.store.name());
        let files: Vec<PathBuf> = usable
            .iter()
            .flat_map(|p| [p.source.clone(), p.thumbnail.clone()])
            .collect();
        report.uploads = Some(upload_files(self.store.as_ref(), &files).await);

        if !options.collections.is_empty() {
            report.added = self
                .add_to_collections(&report.registered, &options.collections)
                .await?;
        }

        Ok(report)
    }

    async fn generate_thumbnails(
        &self,
        paths: &[PhotoPaths],
        options: &ProcessOptions,
    ) -> Result<ThumbnailReport> {
        let thumbnailer = Thumbnailer::new(options.settings).with_overwrite(options.overwrite);
        let paths = paths.to_vec();
        tokio::task::spawn_blocking(move || thumbnailer.generate_all(&paths))
            .await
            .context("Thumbnail worker panicked")
    }

    /// Photos whose thumbnail name is already registered to a different
    /// file, with the reason they are skipped.
    async fn thumbnails_owned_elsewhere(
        &self,
        paths: &[PhotoPaths],
    ) -> Result<Vec<(PathBuf, String)>> {
        let db = Arc::clone(&self.db);
        let paths = paths.to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<(PathBuf, String)>> {
            let conn = get_conn(&db.pool()?)?;
            let mut taken = Vec::new();
            for p in &paths {
                let thumbnail = p.thumbnail_name();
                let Some(owner) = photos::get_photo_by_thumbnail(&conn, &thumbnail)? else {
                    continue;
                };
                if owner.filename != p.source_name() {
                    tracing::warn!(
                        "Skipping {}: thumbnail {} is registered to {}",
                        p.source.display(),
                        thumbnail,
                        owner.filename
                    );
                    let reason =
                        format!("thumbnail {thumbnail} is registered to {}", owner.filename);
                    taken.push((p.source.clone(), reason));
                }
            }
            Ok(taken)
        })
        .await
        .context("Database worker panicked")?
    }

    async fn register(&self, paths: &[PhotoPaths]) -> Result<Vec<Photo>> {
        let db = Arc::clone(&self.db);
        let paths = paths.to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<Photo>> {
            let batch: Vec<NewPhoto> = paths
                .iter()
                .map(|p| {
                    NewPhoto::new(p.source_name(), p.thumbnail_name())
                        .with_metadata(read_metadata(&p.source))
                })
                .collect();
            let conn = get_conn(&db.pool()?)?;
            let registered = photos::register_photos(&conn, &batch)
                .context("Failed to register photos")?;
            tracing::info!("Registered {} photos", registered.len());
            Ok(registered)
        })
        .await
        .context("Database worker panicked")?
    }

    async fn add_to_collections(
        &self,
        registered: &[Photo],
        names: &[String],
    ) -> Result<Vec<(String, usize)>> {
        let db = Arc::clone(&self.db);
        let ids: Vec<_> = registered.iter().map(|p| p.id).collect();
        let names = names.to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<(String, usize)>> {
            let conn = get_conn(&db.pool()?)?;
            let mut added = Vec::with_capacity(names.len());
            for name in names {
                let collection = collections::get_or_create_collection(&conn, &name)
                    .with_context(|| format!("Failed to open collection {name}"))?;
                let mut count = 0;
                for id in &ids {
                    let (_, inserted) =
                        memberships::add_photo_to_collection(&conn, *id, &collection.name)
                            .with_context(|| format!("Failed to add photo {id} to {name}"))?;
                    if inserted {
                        count += 1;
                    }
                }
                tracing::info!("Added {} photos to collection {}", count, name);
                added.push((name, count));
            }
            Ok(added)
        })
        .await
        .context("Database worker panicked")?
    }
}
