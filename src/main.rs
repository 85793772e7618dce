use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plate_scanner_lib::models::config::AppConfig;
use plate_scanner_lib::models::image::SelectedImage;
use plate_scanner_lib::services::config::{resolve_api_key, resolve_data_dir, ConfigManager};
use plate_scanner_lib::services::controller::{AppController, RecognitionOutcome};
use plate_scanner_lib::view::{self, text};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "plate-scanner")]
#[command(about = "Recognize license plates in vehicle photos and keep a short scan history")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Directory holding the scan history (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Recognition model name (overrides config)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize the plate in a photo and add it to the history
    Scan {
        /// Path to the vehicle photo
        image: PathBuf,
    },
    /// List recent scans
    History,
    /// Print the full scanner screen
    Show,
    /// Delete one scan by id
    Delete { id: String },
    /// Delete every scan
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Print the effective configuration
    Config,
    /// Launch the desktop window
    #[cfg(feature = "desktop")]
    Desktop,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // The webview owns the main thread and its own async runtime
    #[cfg(feature = "desktop")]
    {
        if matches!(cli.command, Commands::Desktop) {
            plate_scanner_lib::run();
            return Ok(ExitCode::SUCCESS);
        }
    }

    tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")?
        .block_on(run_cli(cli))
}

async fn run_cli(cli: Cli) -> Result<ExitCode> {
    plate_scanner_lib::init_tracing(cli.json_logs);

    let manager = ConfigManager::new().context("Failed to locate config directory")?;
    let mut config = manager.load_or_default();
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    if let Some(model) = cli.model {
        config.recognition.model = model;
    }

    match cli.command {
        Commands::Scan { image } => {
            let controller = init_controller(&config)?;
            let bytes = std::fs::read(&image)
                .with_context(|| format!("Failed to read {}", image.display()))?;
            controller.select_image(SelectedImage::from_bytes(&bytes)?)?;

            let outcome = controller.recognize().await?;
            print!("{}", text::render_text(&view::render(&controller.snapshot())));

            if let RecognitionOutcome::Failed(_) = outcome {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::History => {
            let controller = init_controller(&config)?;
            print!("{}", text::render_history_text(&view::render(&controller.snapshot())));
        }
        Commands::Show => {
            let controller = init_controller(&config)?;
            print!("{}", text::render_text(&view::render(&controller.snapshot())));
        }
        Commands::Delete { id } => {
            let controller = init_controller(&config)?;
            if controller.delete_record(&id) {
                println!("Deleted scan {}", id);
            } else {
                println!("No scan with id {}", id);
            }
        }
        Commands::Clear { yes } => {
            let controller = init_controller(&config)?;
            if !(yes || confirm(view::CLEAR_CONFIRM_PROMPT)?) {
                println!("Cancelled");
                return Ok(ExitCode::SUCCESS);
            }
            controller.clear_history(true)?;
            println!("History cleared");
        }
        Commands::Config => print_config(&manager, &config)?,
        #[cfg(feature = "desktop")]
        Commands::Desktop => plate_scanner_lib::run(),
    }

    Ok(ExitCode::SUCCESS)
}

fn init_controller(config: &AppConfig) -> Result<Arc<AppController>> {
    plate_scanner_lib::init_controller(config).map_err(anyhow::Error::msg)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_config(manager: &ConfigManager, config: &AppConfig) -> Result<()> {
    let mut shown = config.clone();
    shown.recognition.api_key = None;

    println!("config file: {}", manager.config_file_path().display());
    println!("data dir:    {}", resolve_data_dir(config)?.display());
    println!(
        "api key:     {}",
        if resolve_api_key(config).is_some() {
            "configured"
        } else {
            "missing (set GEMINI_API_KEY)"
        }
    );
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}
