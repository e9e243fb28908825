use artcheck::analysis::{self, BatchItem, BatchSummary};
use artcheck::config::{self, ArtcheckConfig};
use artcheck::ingest::Source;
use artcheck::platforms::PreviewState;
use artcheck::session::{CommitOutcome, Session};
use artcheck::view::{Device, Layout, ThemeMode, ViewEvent, ViewState};
use artcheck::{output, preview};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "artcheck")]
#[command(about = "Album artwork validation and streaming platform preview")]
#[command(long_about = "\
Album artwork validation and streaming platform preview

Checks cover art against distribution requirements, extracts a five-color
palette, scores brightness, contrast and mood, and renders a static preview
page showing the artwork across streaming platforms.

Sources:
  cover.jpg                  a local image file
  art/                       every image under a directory
  https://host/cover.png     a remote image
  sample                     the built-in sample artwork

Exit status: 0 when every image is ready, 1 when any needs review,
2 when an image cannot be loaded or another error occurs.

Run 'artcheck gen-config' to generate a documented artcheck.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing artcheck.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate, extract the palette and score local files or directories
    Check {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Same as check, for a remote image
    Url { url: String },
    /// Same as check, for the built-in sample artwork
    Sample,
    /// Render the static platform preview page
    Preview(PreviewArgs),
    /// List the streaming platform catalog
    Platforms,
    /// Print a stock artcheck.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Path, URL, or `sample`
    source: String,

    /// Output directory for index.html and artwork.png
    #[arg(long, default_value = "artcheck-preview")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    layout: Layout,

    #[arg(long, value_enum, default_value_t)]
    device: Device,

    #[arg(long, value_enum, default_value_t)]
    state: PreviewState,

    #[arg(long, value_enum, default_value_t)]
    theme: ThemeMode,

    /// Platforms to select, replacing the default selection (repeatable)
    #[arg(long = "select", value_name = "NAME")]
    select: Vec<String>,

    /// Flip one platform card between light and dark (repeatable)
    #[arg(long = "toggle", value_name = "NAME")]
    toggle: Vec<String>,
}

impl PreviewArgs {
    /// Replay the flags as view events, in the order a user would click them.
    fn view_events(&self) -> Vec<ViewEvent> {
        let mut events = vec![
            ViewEvent::SetLayout(self.layout),
            ViewEvent::SetDevice(self.device),
            ViewEvent::SetState(self.state),
            ViewEvent::SetTheme(self.theme),
        ];
        if !self.select.is_empty() {
            events.extend(
                ViewState::default()
                    .selected()
                    .into_iter()
                    .map(|p| ViewEvent::Deselect(p.name.to_string())),
            );
            events.extend(self.select.iter().cloned().map(ViewEvent::Select));
        }
        events.extend(self.toggle.iter().cloned().map(ViewEvent::ToggleCardTheme));
        events
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artcheck=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Check { paths } => {
            let config = config::load_config(&cli.config)?;
            let sources = analysis::collect_sources(&paths);
            if sources.is_empty() {
                return Err("no images found".into());
            }
            check(&sources, &config, cli.json)
        }
        Command::Url { url } => {
            let config = config::load_config(&cli.config)?;
            check(&[Source::Url(url)], &config, cli.json)
        }
        Command::Sample => {
            let config = config::load_config(&cli.config)?;
            check(&[Source::Sample], &config, cli.json)
        }
        Command::Preview(args) => {
            let config = config::load_config(&cli.config)?;
            let source = Source::parse(&args.source);
            let mut session = Session::new();
            if session.load(&source, &config) != CommitOutcome::Applied {
                let reason = session.last_error().unwrap_or("unknown error");
                return Err(format!("{source}: {reason}").into());
            }
            let Some(snapshot) = session.current() else {
                return Err(format!("{source}: nothing loaded").into());
            };

            let view = ViewState::default().apply_all(args.view_events());
            let page = preview::write_preview(&snapshot, &view, &args.output)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot.analysis)?);
            } else {
                output::print_preview_output(&page, &view);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Platforms => {
            output::print_platforms();
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(
    sources: &[Source],
    config: &ArtcheckConfig,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);
    let items: Vec<BatchItem> = analysis::analyze_batch(sources, config);
    if json {
        println!("{}", output::format_json(&items)?);
    } else {
        output::print_batch(&items);
    }

    let summary = BatchSummary::of(&items);
    Ok(if summary.failed > 0 {
        ExitCode::from(2)
    } else if summary.needs_review > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can lower it, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
