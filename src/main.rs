// ConsoleLink - main.rs
//
// Headless host entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Filter preference restore
// 4. Feeding host events (stdin or a followed file) into the console
// 5. Final save, optional clipboard copy and stdout print

use clap::Parser;
use consolelink::app::console::{Console, Flow};
use consolelink::app::export::ExportSink;
use consolelink::app::feed::{self, FeedProgress, FeedWatcher};
use consolelink::app::prefs;
use consolelink::core::filter::FilterState;
use consolelink::platform::clipboard::SystemClipboard;
use consolelink::platform::config::{self, PlatformPaths};
use consolelink::util;
use consolelink::util::error::{ConsoleLinkError, FeedError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// ConsoleLink - editor console capture with Markdown export.
///
/// Reads host events as JSON lines and keeps a filtered, deduplicated
/// Markdown rendering of the console on disk.
#[derive(Parser, Debug)]
#[command(name = "consolelink", version, about)]
struct Cli {
    /// Feed of host events, one JSON object per line ("-" or omitted = stdin).
    feed: Option<PathBuf>,

    /// Project root the output path is resolved against.
    #[arg(short = 'C', long = "project", default_value = ".")]
    project: PathBuf,

    /// Markdown output file (overrides config and the project default).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Keep polling the feed file for appended events until a quit event.
    #[arg(short = 'f', long = "follow", requires = "feed")]
    follow: bool,

    /// Print the final rendering to stdout.
    #[arg(long = "print")]
    print: bool,

    /// Copy the final rendering to the system clipboard.
    #[arg(long = "copy")]
    copy: bool,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Ignore saved filter preferences and start with every category enabled.
    #[arg(long = "reset-filters")]
    reset_filters: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "ConsoleLink failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> util::error::Result<()> {
    let platform_paths = PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Config problem; using defaults");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ConsoleLink starting"
    );

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| app_config.output_path(&cli.project));
    let prefs_path = prefs::preferences_path(&platform_paths.data_dir);
    let filter = if cli.reset_filters {
        FilterState::default()
    } else {
        prefs::load_or_default(&prefs_path)
    };

    tracing::info!(
        output = %output_path.display(),
        ?filter,
        auto_save = app_config.auto_save,
        "Console ready"
    );

    let mut console = Console::new(ExportSink::new(output_path), SystemClipboard::new(), filter)
        .with_preferences(prefs_path)
        .with_auto_save(app_config.auto_save);

    // The output file reflects the (empty) session from the start.
    if let Err(e) = console.save() {
        tracing::warn!(error = %e, "Initial save failed");
    }

    let mut watcher = FeedWatcher::new();
    let rx = open_feed(&cli, &mut watcher, app_config.feed_poll_interval_ms)?;

    let mut quit = false;
    'feed: for msg in rx.iter() {
        match msg {
            FeedProgress::Events(events) => {
                for event in events {
                    match console.apply(event) {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => {
                            quit = true;
                            break 'feed;
                        }
                        Err(e) => tracing::warn!(error = %e, "Host event failed"),
                    }
                }
            }
            FeedProgress::Warning(e) => tracing::warn!(error = %e, "Feed problem"),
            FeedProgress::Ended | FeedProgress::Stopped => break,
        }
    }
    watcher.stop();

    if !quit {
        console.shutdown()?;
    }

    if cli.copy {
        console.copy_to_clipboard()?;
    }

    if cli.print {
        let rendered = console.rendered();
        std::io::stdout()
            .write_all(rendered.as_bytes())
            .map_err(|e| ConsoleLinkError::Io {
                path: PathBuf::from("<stdout>"),
                operation: "print",
                source: e,
            })?;
    }

    tracing::info!(
        entries = console.entries().len(),
        writes = console.sink().write_count(),
        "ConsoleLink finished"
    );
    Ok(())
}

/// Start the feed reader selected on the command line and return its
/// progress channel.
fn open_feed(
    cli: &Cli,
    watcher: &mut FeedWatcher,
    poll_interval_ms: u64,
) -> util::error::Result<mpsc::Receiver<FeedProgress>> {
    let path = cli.feed.as_deref().filter(|p| *p != Path::new("-"));

    match path {
        None => {
            if cli.follow {
                tracing::warn!("--follow has no effect when reading stdin");
            }
            let (tx, rx) = mpsc::channel();
            std::thread::spawn(move || {
                let stdin = std::io::stdin();
                feed::read_stream(stdin.lock(), Path::new("<stdin>"), &tx);
            });
            Ok(rx)
        }
        Some(path) if cli.follow => {
            watcher.start(path.to_path_buf(), poll_interval_ms)?;
            watcher.progress_rx.take().ok_or_else(|| {
                ConsoleLinkError::Feed(FeedError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "feed follower did not start",
                    ),
                })
            })
        }
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|e| FeedError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            let source = path.to_path_buf();
            let (tx, rx) = mpsc::channel();
            std::thread::spawn(move || {
                feed::read_stream(std::io::BufReader::new(file), &source, &tx);
            });
            Ok(rx)
        }
    }
}
