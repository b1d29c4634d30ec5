use baw_storage::config::{
    audio_formats_from_env_value, legacy_offset_from_env_value, resolve_config,
};
use baw_storage::{
    AudioFormat, OriginalAudioStorage, PathNamer, RecordingIdentity, StorageResult,
    AUDIO_FORMATS_ENV, LEGACY_UTC_OFFSET_ENV, ORIGINAL_AUDIO_DIRS_ENV,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "baw")]
#[command(about = "Original audio storage addressing CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show legacy and UTC file names for a recording (no storage roots needed)
    Name {
        /// Recording UUID (lowercase, hyphenated)
        uuid: String,
        /// Recording start with explicit offset, e.g. 2012-03-02T16:05:37+11:00
        recorded_at: String,
        /// Original format extension, e.g. mp3
        format: String,
    },
    /// Show absolute paths a recording may be stored at
    Paths {
        /// Recording UUID (lowercase, hyphenated)
        uuid: String,
        /// Recording start with explicit offset
        recorded_at: String,
        /// Original format extension
        format: String,
        /// Only list paths that exist on disk
        #[arg(long)]
        existing: bool,
    },
    /// Parse stored file paths back into recording metadata
    Parse {
        /// Paths to parse
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// List storage roots
    Dirs {
        /// Only list roots that exist on disk
        #[arg(long)]
        existing: bool,
    },
    /// List every stored recording
    List {
        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

fn load_storage() -> Result<OriginalAudioStorage, Box<dyn std::error::Error>> {
    let config = resolve_config(
        std::env::var_os(ORIGINAL_AUDIO_DIRS_ENV).as_deref(),
        std::env::var(LEGACY_UTC_OFFSET_ENV).ok(),
        std::env::var(AUDIO_FORMATS_ENV).ok(),
    )?;
    Ok(OriginalAudioStorage::new(config))
}

/// Naming only needs the legacy offset and the recognised formats, not the storage roots.
fn naming_config(
    legacy_offset: Option<String>,
    audio_formats: Option<String>,
) -> StorageResult<(PathNamer, Vec<AudioFormat>)> {
    Ok((
        PathNamer::new(legacy_offset_from_env_value(legacy_offset)?),
        audio_formats_from_env_value(audio_formats)?,
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("baw=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Name {
            uuid,
            recorded_at,
            format,
        }) => {
            let (namer, formats) = naming_config(
                std::env::var(LEGACY_UTC_OFFSET_ENV).ok(),
                std::env::var(AUDIO_FORMATS_ENV).ok(),
            )?;
            let identity = RecordingIdentity::from_parts(&uuid, &recorded_at, &format)?;
            if !formats.contains(identity.original_format()) {
                tracing::warn!(
                    "'{}' is not a recognised audio format",
                    identity.original_format()
                );
            }
            println!("shard:  {}", namer.partial_path(&identity));
            println!("legacy: {}", namer.name_legacy(&identity));
            println!("utc:    {}", namer.name_utc(&identity));
        }
        Some(Commands::Paths {
            uuid,
            recorded_at,
            format,
            existing,
        }) => {
            let storage = load_storage()?;
            let identity = RecordingIdentity::from_parts(&uuid, &recorded_at, &format)?;
            let paths = if existing {
                storage.existing_paths(&identity)
            } else {
                storage.possible_paths(&identity)
            };
            for path in paths {
                println!("{}", path.display());
            }
        }
        Some(Commands::Parse { paths, json }) => {
            let storage = load_storage()?;
            for path in paths {
                match storage.parse_path(&path) {
                    Ok(identity) if json => println!("{}", serde_json::to_string(&identity)?),
                    Ok(identity) => println!(
                        "{}: uuid={} recorded_at={} format={}",
                        path.display(),
                        identity.uuid(),
                        identity.recorded_at().to_rfc3339(),
                        identity.original_format()
                    ),
                    Err(e) => eprintln!("Error parsing {}: {}", path.display(), e),
                }
            }
        }
        Some(Commands::Dirs { existing }) => {
            let storage = load_storage()?;
            let dirs = if existing {
                storage.existing_dirs()?
            } else {
                storage.possible_dirs().to_vec()
            };
            for dir in dirs {
                println!("{}", dir.display());
            }
        }
        Some(Commands::List { json }) => {
            let storage = load_storage()?;
            let mut files = storage.existing_files();
            for entry in files.by_ref() {
                match entry {
                    Ok(file) if json => println!("{}", serde_json::to_string(&file)?),
                    Ok(file) => println!(
                        "{} [{}] {}",
                        file.identity.uuid(),
                        file.generation,
                        file.path.display()
                    ),
                    Err(e) => eprintln!("Error listing storage: {}", e),
                }
            }
            let summary = files.summary();
            eprintln!(
                "Found {} recordings, skipped {} files, {} unreadable directories",
                summary.found, summary.skipped, summary.errors
            );
        }
        None => {
            println!("Use 'baw --help' for commands");
        }
    }

    Ok(())
}
