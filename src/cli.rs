use clap::{Parser, Subcommand};
use gallery_core::PhotoId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(author, version, about = "Photo gallery helper: thumbnails, uploads and collections")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides config and GALLERY_DATABASE)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate thumbnails, register photos, upload, and add to collections
    Process {
        /// Source directory or image file
        #[arg(required = true)]
        source: PathBuf,

        /// Thumbnail width in pixels (minimum 64)
        #[arg(short, long)]
        width: Option<u32>,

        /// AVIF quality, 0-100
        #[arg(short, long)]
        quality: Option<u8>,

        /// CPU effort spent on compression (0 fastest, 9 slowest)
        #[arg(short, long)]
        effort: Option<u8>,

        /// Collection(s) to add photos to, separated by ';'
        #[arg(short = 'c', long = "collections")]
        collections: Option<String>,

        /// Only generate thumbnails locally; no database writes or uploads
        #[arg(long, conflicts_with = "upload_only")]
        offline_only: bool,

        /// Skip thumbnail generation
        #[arg(long)]
        upload_only: bool,

        /// Regenerate thumbnails that already exist
        #[arg(long)]
        overwrite: bool,

        /// Show what would be processed without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionCommand),

    /// Inspect registered photos
    #[command(subcommand)]
    Photo(PhotoCommand),

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CollectionCommand {
    /// Create an empty collection
    Create { name: String },

    /// Delete a collection and its memberships
    Delete { name: String },

    /// Append a photo to a collection
    Add { name: String, photo: PhotoId },

    /// Remove a photo from a collection
    Remove { name: String, photo: PhotoId },

    /// List a collection's photos in display order
    Show {
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all collections with photo counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a photo to an explicit position within a collection
    Move {
        name: String,
        photo: PhotoId,
        /// New position (1 or greater)
        position: i64,
    },
}

#[derive(Subcommand)]
pub enum PhotoCommand {
    /// List registered photos
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a photo by ID or filename
    Show {
        /// Photo ID or filename
        photo: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a photo (removes it from every collection)
    Delete { photo: PhotoId },
}
