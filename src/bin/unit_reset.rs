use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use unit_reset::config::{SECRET_ID_ENV, SETTINGS_FILE_ENV};
use unit_reset::observability::LoggingConfig;
use unit_reset::{InvocationEvent, UnitResetConfig, UnitResetHandler};

#[derive(Parser, Debug)]
#[command(name = "unit-reset")]
#[command(about = "Reset an Alexa Smart Properties unit to its default configuration")]
struct Cli {
    /// Unit to reset. When omitted, a `{"unitId": ...}` event is read from stdin.
    #[arg(long)]
    unit_id: Option<String>,

    /// Secret holding the LWA credentials
    #[arg(long, env = SECRET_ID_ENV)]
    secret_id: Option<String>,

    /// JSON file with reset settings
    #[arg(long, env = SETTINGS_FILE_ENV)]
    settings_file: Option<PathBuf>,
}

fn read_event(cli: &Cli) -> Result<InvocationEvent, Box<dyn std::error::Error>> {
    if let Some(unit_id) = &cli.unit_id {
        return Ok(InvocationEvent::new(unit_id.clone()));
    }

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(serde_json::from_str(&input)?)
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let event = read_event(&cli)?;

    let mut builder = UnitResetConfig::builder().from_env();
    if let Some(secret_id) = cli.secret_id {
        builder = builder.secret_id(secret_id);
    }
    if let Some(path) = cli.settings_file {
        builder = builder.settings_file(path);
    }
    let config = builder.build()?;

    let handler = UnitResetHandler::from_config(&config)?;
    let response = handler.handle(event).await;

    println!("{}", serde_json::to_string(&response)?);
    Ok(response.status_code == 200)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = match LoggingConfig::from_env() {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("unit-reset: {}", e);
            return ExitCode::from(2);
        }
    };
    if let Err(e) = logging.init() {
        eprintln!("unit-reset: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "unit-reset failed");
            eprintln!("unit-reset: {}", e);
            ExitCode::from(2)
        }
    }
}
