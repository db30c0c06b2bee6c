use clap::{Parser, Subcommand};
use resource_build::catalog::Catalog;
use resource_build::config::{self, ProjectConfig};
use resource_build::imaging::RustBackend;
use resource_build::naming::SourceKind;
use resource_build::render::{self, Renderer};
use resource_build::sources::SourceStore;
use resource_build::{copier, output, settings};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resource-build")]
#[command(about = "Build icons, launch images and Lua settings for a mobile game project")]
#[command(long_about = "\
Build icons, launch images and Lua settings for a mobile game project

A few large master images are turned into every icon and launch image iOS
and Android ask for. Each output is rendered from the source whose size is
closest, pasted centered on a square canvas and resized.

Project structure:

  project/
  ├── config.toml          # Project config (optional)
  ├── media/
  │   ├── system/          # Sources: icon*.png, default*.png, launch*.png
  │   └── sounds/          # Copied to source/media/ with lower-case names
  └── source/              # Output: Icon*.png, Default*.png, *.lua, build.settings

Source classes:
  icon*.png             → square icons
  default*.png, launch*.png → launch images

Run 'resource-build gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project directory
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Source image directory, relative to the project
    #[arg(long, default_value = "media/system", global = true)]
    media: PathBuf,

    /// Output directory, relative to the project
    #[arg(long, default_value = "source", global = true)]
    output: PathBuf,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run everything: icons, launch images, settings, media
    Build,
    /// Render every icon
    Icons,
    /// Render every launch image
    Launch,
    /// Write config.lua, build.settings and information.lua
    Settings,
    /// Copy media files into the output directory
    CopyMedia,
    /// Remove every generated icon and launch image
    Clean,
    /// List the required graphics for an orientation
    Requirements {
        /// Orientation to list (defaults to the configured one)
        #[arg(long)]
        orientation: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_dir = cli.project.join(&cli.output);

    match &cli.command {
        Command::Build => {
            let config = config::load_config(&cli.project)?;
            let catalog = Catalog::new(config.application.orientation)?;
            let renderer = load_renderer(&cli, &config)?;

            println!("==> Rendering into {}", output_dir.display());
            let icons = render_kind(&renderer, &catalog, &config, SourceKind::Icon, &output_dir)?;
            let launch =
                render_kind(&renderer, &catalog, &config, SourceKind::Launch, &output_dir)?;

            println!("==> Writing settings");
            let written = settings::write_all(&output_dir, &catalog, &config)?;
            output::print_settings_output(&written, &output_dir);

            println!("==> Copying media");
            let copied = copier::copy_media(&cli.project, &output_dir, &config.media)?;
            output::print_copy_output(&copied, &cli.project, &output_dir);

            println!(
                "==> {}",
                output::format_build_summary(icons, launch, written.len(), copied.len())
            );
        }
        Command::Icons | Command::Launch => {
            let kind = if matches!(cli.command, Command::Icons) {
                SourceKind::Icon
            } else {
                SourceKind::Launch
            };
            let config = config::load_config(&cli.project)?;
            let catalog = Catalog::new(config.application.orientation)?;
            let renderer = load_renderer(&cli, &config)?;
            render_kind(&renderer, &catalog, &config, kind, &output_dir)?;
        }
        Command::Settings => {
            let config = config::load_config(&cli.project)?;
            let catalog = Catalog::new(config.application.orientation)?;
            let written = settings::write_all(&output_dir, &catalog, &config)?;
            output::print_settings_output(&written, &output_dir);
        }
        Command::CopyMedia => {
            let config = config::load_config(&cli.project)?;
            let copied = copier::copy_media(&cli.project, &output_dir, &config.media)?;
            output::print_copy_output(&copied, &cli.project, &output_dir);
        }
        Command::Clean => {
            let removed = render::remove_generated(&output_dir)?;
            output::print_clean_output(&removed, &output_dir);
        }
        Command::Requirements { orientation, json } => {
            let catalog = match orientation {
                Some(name) => Catalog::for_orientation_name(name)?,
                None => Catalog::new(config::load_config(&cli.project)?.application.orientation)?,
            };
            if *json {
                let entries: Vec<_> = catalog.iter().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                output::print_requirements(&catalog);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, `info` by default or `debug` with `--verbose`.
/// `RUST_LOG` still takes precedence.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn load_renderer(
    cli: &Cli,
    config: &ProjectConfig,
) -> Result<Renderer<RustBackend>, Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);
    let backend = RustBackend::new();
    let media_dir = cli.project.join(&cli.media);
    let store = SourceStore::load(&backend, &media_dir)?;
    log::info!(
        "loaded {} icon and {} launch sources from {}",
        store.count(SourceKind::Icon),
        store.count(SourceKind::Launch),
        media_dir.display()
    );
    Ok(Renderer::new(backend, store))
}

/// Render one class of requirements, printing progress as files complete.
fn render_kind(
    renderer: &Renderer<RustBackend>,
    catalog: &Catalog,
    config: &ProjectConfig,
    kind: SourceKind,
    output_dir: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let background = match kind {
        SourceKind::Icon => config.icons.background,
        SourceKind::Launch => config.launch.background,
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_render_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = renderer.render_all(catalog, kind, output_dir, background, Some(tx));
    printer.join().map_err(|_| "output thread panicked")?;
    Ok(result?.len())
}
