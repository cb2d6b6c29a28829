use anyhow::Result;
use clap::Parser;
use icdi_localdb::{ensure_seeded, EphemeralBackend, FileBackend, LocalDb, StorageBackend};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "icdi")]
#[command(about = "Local document store for the incident dashboard", long_about = None)]
struct Args {
    /// Path to the store blob (default: .icdi/icdi_local_db_v1.json)
    #[arg(long, env = "ICDI_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Run without a durable medium; nothing survives process end
    #[arg(long, default_value_t = false)]
    ephemeral: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // The backend strategy is chosen exactly once, here; the store never
    // branches on the environment again.
    let backend: Box<dyn StorageBackend> = if args.ephemeral {
        info!("Running ephemeral, nothing will be persisted");
        Box::new(EphemeralBackend)
    } else {
        let backend = match args.db_path {
            Some(path) => FileBackend::new(path),
            None => FileBackend::in_dir(".icdi"),
        };
        info!("Using store blob at {:?}", backend.path());
        Box::new(backend)
    };

    let mut db = LocalDb::open(backend);
    ensure_seeded(&mut db);

    for (name, records) in &db.dump().tables {
        info!("{}: {} records", name, records.len());
    }

    Ok(())
}
