use clap::Parser;
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use gamepad_shortcuts::config::ShortcutConfig;
use gamepad_shortcuts::controller::DeviceReader;
use gamepad_shortcuts::executor::ShellExecutor;
use gamepad_shortcuts::mapping::Dispatcher;
use gamepad_shortcuts::{run, RunOutcome};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(version, about = "Run shell commands from gamepad buttons", long_about = None)]
struct Args {
    /// Joystick device node, overrides the config file
    #[arg(short, long)]
    device: Option<PathBuf>,

    /// Config file (default: ~/.config/gamepad-shortcuts/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every decoded event
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup(args.verbose)?;

    let (config, config_path) = ShortcutConfig::load_or_init(args.config.as_deref()).await?;
    info!("Loaded config from {}", config_path.display());

    let mapping = config
        .button_mapping()
        .map_err(|e| eyre!("Invalid config {}: {}", config_path.display(), e))?;
    if mapping.is_empty() {
        warn!("No buttons are mapped, events will only be logged");
    }

    info!("Current mappings:");
    for (id, command) in mapping.iter() {
        match config.label(id) {
            Some(label) => info!("Button {}: {} ({})", id, label, command),
            None => info!("Button {}: {}", id, command),
        }
    }

    let device = args.device.unwrap_or_else(|| config.device.clone());
    let mut reader = match DeviceReader::create(&device).open() {
        Ok(reader) => reader,
        Err(e) => {
            let hint = e
                .guidance()
                .unwrap_or("Make sure the device exists and you have permission to access it.");
            return Err(e).wrap_err(hint);
        }
    };

    let mut dispatcher = Dispatcher::new(mapping, ShellExecutor::new(&config.shell));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_token.cancel(),
            Err(e) => error!("Unable to listen for Ctrl+C: {}", e),
        }
    });

    info!("Gamepad shortcut mapper running. Press Ctrl+C to exit.");
    let (outcome, stats) = run(&mut reader, &mut dispatcher, &shutdown)
        .await
        .wrap_err_with(|| format!("Reading {} failed", device.display()))?;

    match outcome {
        RunOutcome::Interrupted => info!("Exiting..."),
        RunOutcome::StreamClosed => warn!("Device {} closed the stream", device.display()),
    }
    info!(
        "Processed {} events, executed {} commands",
        stats.events, stats.fired
    );

    Ok(())
}

fn setup(verbose: bool) -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env(if verbose { Level::DEBUG } else { Level::INFO });
    Ok(())
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
