//! Stock analysis crew front-ends
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_BASE="http://localhost:1234/v1"
//! export OPENAI_MODEL_NAME="your-model-name"
//!
//! stock-crew ask AAPL
//! stock-crew chat
//! TELEGRAM_TOKEN=... stock-crew telegram
//! ```

use clap::{Parser, Subcommand};
use crew_llm::providers::OpenAIProvider;
use crew_utils::LogFormat;
use std::path::PathBuf;
use std::sync::Arc;
use stock_crew::platforms::{run_repl, telegram};
use stock_crew::{StockConfig, StockCrew};
use tokio::io::BufReader;

#[derive(Debug, Parser)]
#[command(name = "stock-crew", version, about = "Four-agent stock analysis crew")]
struct Cli {
    /// Override the recommendation report path
    #[arg(long, global = true)]
    output_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse one company and print the recommendation
    Ask {
        /// Company name or ticker, passed to the crew as typed
        #[arg(required = true, num_args = 1..)]
        company: Vec<String>,
    },
    /// Read requests from the console until `exit`
    Chat,
    /// Serve requests from Telegram
    Telegram,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    crew_utils::init_tracing_with(
        "warn,stock_crew=info,crew_runtime=info,crew_workflow=info",
        format,
    );

    let mut config = StockConfig::from_env()?;
    if let Some(path) = cli.output_file {
        config.output_file = path;
    }

    let provider = Arc::new(OpenAIProvider::with_config(config.openai_config())?);
    let crew = Arc::new(StockCrew::new(&config, provider)?);

    match cli.command {
        Command::Ask { company } => {
            println!("{}", crew.handle(&company.join(" ")).await);
        }
        Command::Chat => {
            println!("Ask about a company, or type `exit` to quit.");
            run_repl(&crew, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        }
        Command::Telegram => {
            let token = config
                .telegram_token
                .clone()
                .ok_or_else(|| anyhow::anyhow!("TELEGRAM_TOKEN is not set"))?;
            telegram::run(token, crew).await;
        }
    }

    Ok(())
}
