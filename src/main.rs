use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emojify::models::AppConfig;
use emojify::rendering::encode_png;
use emojify::server;
use emojify::services::MosaicEngine;

#[derive(Parser)]
#[command(name = "emojify")]
#[command(about = "Emojify - turn photos into emoji mosaics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a photo to a mosaic PNG file
    Render {
        /// Input photo (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Cells per row and column
        #[arg(short, long)]
        grid: Option<u32>,

        /// Output edge in pixels
        #[arg(short, long)]
        size: Option<u32>,

        /// Seed for random cell skipping
        #[arg(long)]
        seed: Option<u64>,

        /// Probability of leaving an opaque cell empty (0 to 1)
        #[arg(long)]
        skip: Option<f64>,

        /// Emoji library (.npy); overrides the configured path
        #[arg(short, long)]
        library: Option<PathBuf>,
    },
    /// Print details of an emoji library
    Inspect {
        /// Emoji library (.npy); overrides the configured path
        #[arg(short, long)]
        library: Option<PathBuf>,

        /// Tile edge in pixels; overrides the configured edge
        #[arg(short, long)]
        edge: Option<usize>,

        /// Write the sprite atlas to this PNG file
        #[arg(long)]
        atlas: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            grid,
            size,
            seed,
            skip,
            library,
        }) => run_render_command(&input, &output, grid, size, seed, skip, library),
        Some(Commands::Inspect {
            library,
            edge,
            atlas,
        }) => run_inspect_command(library, edge, atlas.as_deref()),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emojify=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Render a photo directly to a PNG file (no server needed)
fn run_render_command(
    input: &Path,
    output: &Path,
    grid: Option<u32>,
    size: Option<u32>,
    seed: Option<u64>,
    skip: Option<f64>,
    library: Option<PathBuf>,
) -> anyhow::Result<()> {
    init_cli_logging();

    let mut config = AppConfig::load_from_env().with_library_override(library);
    if let Some(grid) = grid {
        config.mosaic.grid_dim = grid;
    }
    if let Some(size) = size {
        config.mosaic.target_size = size;
    }
    if let Some(skip) = skip {
        config.mosaic.skip_probability = skip;
    }
    if seed.is_some() {
        config.mosaic.seed = seed;
    }

    let engine = MosaicEngine::load(&config).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load emoji library {}: {e}",
            config.library.path.display()
        )
    })?;

    let photo = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    let composite = engine.compose_bytes(&photo)?;
    let png_bytes = composite.encode_png(config.output.optimize_png)?;

    std::fs::write(output, &png_bytes)?;
    println!(
        "Rendered {} ({} bytes, {} cells placed, {} skipped)",
        output.display(),
        png_bytes.len(),
        composite.placed(),
        composite.skipped()
    );

    Ok(())
}

/// Load a library and print what it contains
fn run_inspect_command(
    library: Option<PathBuf>,
    edge: Option<usize>,
    atlas_output: Option<&Path>,
) -> anyhow::Result<()> {
    init_cli_logging();

    let mut config = AppConfig::load_from_env().with_library_override(library);
    if let Some(edge) = edge {
        config.library.tile_edge = edge;
    }

    let bytes = std::fs::read(&config.library.path).map_err(|e| {
        anyhow::anyhow!("Failed to read {}: {e}", config.library.path.display())
    })?;
    let engine = MosaicEngine::from_container_bytes(&bytes, &config)?;
    let info = engine.info();
    let palette = engine.palette();
    let atlas = engine.atlas();

    println!("Library:  {}", info.path);
    println!("Version:  {}", info.version);
    println!("Dtype:    {}", info.dtype);
    println!("Shape:    {:?}", info.shape);
    println!("Tiles:    {} ({}x{} px)", info.tile_count, info.tile_edge, info.tile_edge);
    println!(
        "Atlas:    {}x{} px ({} columns, {} rows)",
        atlas.width(),
        atlas.height(),
        atlas.columns(),
        atlas.rows()
    );
    println!("SHA-256:  {}", info.sha256);

    let luma = |c: &[f32; 3]| 0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2];
    let by_luma = |a: &(usize, &[f32; 3]), b: &(usize, &[f32; 3])| luma(a.1).total_cmp(&luma(b.1));
    if let (Some((dark, dc)), Some((light, lc))) = (
        palette.colors().iter().enumerate().min_by(by_luma),
        palette.colors().iter().enumerate().max_by(by_luma),
    ) {
        println!("\nPalette:");
        println!(
            "  darkest   tile {dark} ({:.0}, {:.0}, {:.0})",
            dc[0], dc[1], dc[2]
        );
        println!(
            "  lightest  tile {light} ({:.0}, {:.0}, {:.0})",
            lc[0], lc[1], lc[2]
        );
    }

    if let Some(path) = atlas_output {
        let png_bytes = encode_png(
            atlas.width() as u32,
            atlas.height() as u32,
            png::ColorType::Rgba,
            atlas.rgba(),
            false,
        )?;
        std::fs::write(path, &png_bytes)?;
        println!("\nWrote atlas to {} ({} bytes)", path.display(), png_bytes.len());
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let emoji_library = std::env::var("EMOJI_LIBRARY").ok();

    // Header
    println!("Emojify v{VERSION}");
    println!("Photo to emoji mosaic server\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR     = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  EMOJI_LIBRARY = {}",
        emoji_library.as_deref().unwrap_or("(not set)")
    );

    // Sources section
    println!("\nSources:");
    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("  Config:  {config_source}");

    let config = AppConfig::load_from_env();
    let library = &config.library.path;
    let library_state = if library.exists() { "" } else { " (not found)" };
    println!("  Library: {}{library_state}", library.display());
    println!(
        "  Mosaic:  {0}x{0} px, {1}x{1} cells",
        config.mosaic.target_size, config.mosaic.grid_dim
    );

    // Commands section
    println!("\nCommands:");
    println!("  emojify serve     Start the HTTP server");
    println!("  emojify render    Render a photo to a mosaic PNG");
    println!("  emojify inspect   Print details of an emoji library");
    println!("\nRun 'emojify --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emojify=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
        "Configuration source"
    );

    let config = AppConfig::load_from_env();
    let state = server::create_app_state(config)?;
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Emojify server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
