//! qrstash entrypoint

use clap::Parser;
use qrstash::logging::{self, ConsoleLog};
use qrstash::output::{folder_message, render_error, render_outcome};
use qrstash::{Error, Platform, QrStash, Result, StashConfig, is_valid_payload, prompt, tui};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrstash",
    version,
    about = "Save text as QR code images under auto-numbered filenames"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrstash.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save into this folder as-is instead of ~/Downloads/QRCode_Images
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Subfolder created under the Downloads folder
    #[arg(long, value_name = "NAME")]
    folder_name: Option<String>,

    /// Filename prefix placed before the counter
    #[arg(long, value_name = "NAME")]
    base_name: Option<String>,

    /// Encode this text instead of prompting for it
    #[arg(long, value_name = "TEXT", conflicts_with = "tui")]
    text: Option<String>,

    /// Do not open the output folder after saving
    #[arg(long)]
    no_open: bool,

    /// Output the result as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Print a terminal rendering of the code after saving
    #[arg(long)]
    preview: bool,

    /// Open the interactive terminal window instead of the console prompt
    #[arg(long)]
    tui: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = StashConfig::load(cli.config.as_deref())?;

    if let Some(ref dir) = cli.output_dir {
        config.output.output_dir = Some(dir.clone());
    }
    if let Some(ref name) = cli.folder_name {
        config.output.folder_name = name.clone();
    }
    if let Some(ref name) = cli.base_name {
        config.output.base_name = name.clone();
    }
    if cli.no_open {
        config.open_folder = false;
    }
    config.validate()?;

    let console = if cli.tui {
        ConsoleLog::Off
    } else {
        ConsoleLog::Stderr
    };
    logging::init(&config.logging, console)?;

    let platform = Platform::current();
    let stash = QrStash::from_config(&config, platform.clone())?;
    info!(
        folder = %stash.location().folder_path().display(),
        %platform,
        "Starting qrstash"
    );

    if cli.tui {
        return tui::run_tui(stash).await;
    }

    let folder = stash.prepare_folder()?;
    if !cli.json {
        println!("{}", folder_message(&folder));
    }

    let text = match cli.text {
        Some(text) if is_valid_payload(&text) => text,
        Some(_) => return Err(Error::EmptyPayload),
        None => prompt::prompt_stdin().await?,
    };

    let outcome = stash.save_and_open(&text)?;
    let rendered = render_outcome(&outcome);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
        if cli.preview {
            println!("{}", outcome.saved.preview);
        }
    }

    Ok(())
}

fn report_error(err: &Error, json: bool) {
    tracing::error!("{err}");
    let rendered = render_error(err);

    if json {
        match serde_json::to_string_pretty(&rendered.json) {
            Ok(body) => println!("{body}"),
            Err(_) => println!("{}", rendered.json),
        }
    } else {
        for line in &rendered.human {
            eprintln!("{line}");
        }
    }
}
