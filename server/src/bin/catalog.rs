use camino::Utf8PathBuf as PathBuf;
use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use itertools::Itertools;
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

use kavian_core::{
    catalog::upload::{format_size, UploadFile},
    config::CatalogConfig,
    core::storage::{InMemoryStorage, LocalFileStorage, Storage, StorageArea},
    model::{Album, Asset},
    Catalog,
};

#[derive(Parser)]
#[command(version, about = "Manage the local asset catalog", long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List assets, or albums with --albums
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        albums: bool,
    },
    /// Case-insensitive search over name, description and tags
    Search { query: String },
    /// Assets in a folder and its subfolders, "all" for everything
    Folder { folder: String },
    /// Totals and per category/folder counts as JSON
    Stats,
    /// Add image files as assets
    Upload {
        files: Vec<PathBuf>,
        #[arg(long, default_value = "projects")]
        folder: String,
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// Write both collections to a timestamped JSON file
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Replace the collections present in an exported file
    Import { file: PathBuf },
    /// Delete the stored collections; the sample assets come back on the next run
    Reset,
}

fn open_storage(config: &CatalogConfig) -> Result<Storage> {
    match &config.storage_path {
        Some(path) => {
            let storage = LocalFileStorage::open(path.clone())
                .wrap_err_with(|| format!("error opening catalog storage {}", path))?;
            info!(path = %storage.path(), keys = storage.keys().len(), "opened catalog storage");
            Ok(storage.into())
        }
        None => {
            warn!("no storage_path configured, changes will not be kept");
            Ok(InMemoryStorage::new().into())
        }
    }
}

fn print_assets(assets: &[Asset]) {
    for asset in assets {
        println!(
            "{:>16}  {:<36} {:<28} {:>9}  {}",
            asset.id.0,
            asset.name,
            asset.folder,
            format_size(asset.size),
            asset.tags.iter().join(",")
        );
    }
}

fn print_albums(albums: &[Album]) {
    for album in albums {
        println!(
            "{:>16}  {:<40} {:>3} images  {}",
            album.id.0,
            album.title.as_deref().unwrap_or("(untitled)"),
            album.count(),
            album.location.as_deref().unwrap_or_default()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_env("KAVIAN_LOG"))
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = PathBuf::from(args.config);
    let config = kavian_core::config::read_config(&config_path).await?;
    let storage = open_storage(&config.catalog)?;
    let catalog = Catalog::new(storage, &config.catalog.namespace);
    // reset must not seed first
    if !matches!(args.command, Command::Reset) {
        catalog.init()?;
    }

    match args.command {
        Command::List {
            albums: true,
            category: _,
        } => print_albums(&catalog.albums().get_all_albums()?),
        Command::List {
            category: Some(category),
            ..
        } => print_assets(&catalog.assets().get_assets_by_category(&category)?),
        Command::List { .. } => print_assets(&catalog.assets().get_all_assets()?),
        Command::Search { query } => print_assets(&catalog.assets().search_assets(&query)?),
        Command::Folder { folder } => print_assets(&catalog.assets().get_assets_by_folder(&folder)?),
        Command::Stats => {
            let stats = catalog.get_statistics()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Upload {
            files,
            folder,
            category,
        } => {
            let files = files.iter().map(|path| UploadFile::from_path(path));
            let uploaded = catalog.upload_files(files, &folder, &category)?;
            info!(count = uploaded.len(), "upload finished");
            print_assets(&uploaded);
        }
        Command::Export { dir } => {
            let path = catalog.export_to_dir(&dir)?;
            println!("{}", path);
        }
        Command::Import { file } => {
            let imported = catalog
                .import_file(&file)
                .wrap_err_with(|| format!("error importing {}", file))?;
            println!(
                "imported {} assets, {} albums",
                imported.assets.map(|a| a.len()).unwrap_or_default(),
                imported.albums.map(|a| a.len()).unwrap_or_default()
            );
        }
        Command::Reset => {
            let removed = catalog.reset()?;
            println!("removed {}", removed.iter().join(", "));
        }
    }
    Ok(())
}
