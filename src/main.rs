use baw_storage::config::resolve_config;
use baw_storage::{
    AUDIO_FORMATS_ENV, LEGACY_UTC_OFFSET_ENV, ORIGINAL_AUDIO_DIRS_ENV, OriginalAudioStorage,
    ScanSummary,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the original audio audit
///
/// Resolves storage configuration once, then walks every existing storage root and reports
/// what it finds: each stored recording at `debug`, each skipped file and unreadable directory
/// at `warn`, and a final summary at `info`.
///
/// # Environment Variables
/// - `BAW_ORIGINAL_AUDIO_DIRS`: storage roots as a path list (required)
/// - `BAW_LEGACY_UTC_OFFSET`: offset legacy names were written at (default: "+10:00")
/// - `BAW_AUDIO_FORMATS`: comma-separated recognised formats (default: built-in list)
///
/// # Returns
/// * `Ok(())` - If the audit completed against at least one existing root
/// * `Err(anyhow::Error)` - If configuration is invalid or no storage root exists
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("baw=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = resolve_config(
        std::env::var_os(ORIGINAL_AUDIO_DIRS_ENV).as_deref(),
        std::env::var(LEGACY_UTC_OFFSET_ENV).ok(),
        std::env::var(AUDIO_FORMATS_ENV).ok(),
    )?;
    let storage = OriginalAudioStorage::new(config);

    for dir in storage.possible_dirs() {
        tracing::info!("++ Configured storage root {}", dir.display());
    }

    // Directory walks block; keep them off the async workers.
    let summary = tokio::task::spawn_blocking(move || audit(&storage)).await??;

    tracing::info!(
        "++ Audit finished: {} recordings, {} skipped files, {} unreadable directories",
        summary.found,
        summary.skipped,
        summary.errors
    );

    Ok(())
}

fn audit(storage: &OriginalAudioStorage) -> anyhow::Result<ScanSummary> {
    let existing = storage.existing_dirs()?;
    if existing.is_empty() {
        anyhow::bail!(baw_storage::StorageError::NoStorageRoot);
    }
    for dir in &existing {
        tracing::info!("++ Scanning {}", dir.display());
    }

    let mut files = storage.existing_files();
    for entry in files.by_ref() {
        match entry {
            Ok(file) => {
                tracing::debug!(
                    "{} [{}] {}",
                    file.identity.uuid(),
                    file.generation,
                    file.path.display()
                );
                if !storage
                    .config()
                    .is_recognised_format(file.identity.original_format())
                {
                    tracing::warn!(
                        "Stored recording has unrecognised format: {}",
                        file.path.display()
                    );
                }
            }
            Err(e) => tracing::warn!("Listing error: {}", e),
        }
    }

    Ok(files.summary())
}
