use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use mclaunch::core::config::LauncherConfig;

/// Download and launch a vanilla Minecraft release.
#[derive(Debug, Parser)]
#[command(name = "mclaunch", version, about)]
struct Cli {
    /// Release id from the version manifest, e.g. 1.20.4
    #[arg(value_name = "VERSION")]
    release: String,
    /// Player name passed to the game as-is
    #[arg(value_name = "NICKNAME", allow_hyphen_values = true)]
    nickname: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{}", Cli::command().render_usage());
            return ExitCode::from(1);
        }
    };

    mclaunch::init_tracing();

    let result = match LauncherConfig::from_env() {
        Ok(config) => mclaunch::run(config, &cli.release, &cli.nickname).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
