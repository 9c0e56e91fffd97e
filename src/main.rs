use clap::Parser;
use sra_fetch::app::commands;
use sra_fetch::utils::logger;
use sra_fetch::{Cli, Commands, FetchError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("🚀 Starting sra-fetch");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let outcome = match cli.command {
        Commands::Fetch(args) => commands::fetch(args).await,
        Commands::Check(args) => commands::check(args).await,
        Commands::ExportEnv(args) => commands::export_environment(args).await,
    };

    match outcome {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let exit_code = match e.downcast_ref::<FetchError>() {
                Some(fetch_error) => {
                    tracing::error!(
                        "❌ sra-fetch failed: {:#} (Category: {:?}, Severity: {:?})",
                        e,
                        fetch_error.category(),
                        fetch_error.severity()
                    );
                    eprintln!("❌ {}", fetch_error.user_friendly_message());
                    eprintln!("💡 Suggestion: {}", fetch_error.recovery_suggestion());
                    fetch_error.severity().exit_code()
                }
                None => {
                    tracing::error!("❌ sra-fetch failed: {:#}", e);
                    eprintln!("❌ {:#}", e);
                    1
                }
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
