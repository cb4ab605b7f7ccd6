mod assistant;
mod gate;
mod search;
mod shell;
mod table;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placescout")]
#[command(about = "Collect business leads from Google Places and check them on WhatsApp")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search places for a sector in a city and print the enriched rows
    Search {
        /// Business sector or category, e.g. "Cafe"
        #[arg(long)]
        sector: String,

        /// City to search in, e.g. "Izmir"
        #[arg(long)]
        city: String,

        /// Write the rows to an .xlsx file (timestamped name when no path is given)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Mark numbers that are not on WhatsApp before printing/exporting
        #[arg(long)]
        check_whatsapp: bool,
    },
    /// Ask the assistant a single question
    Ask {
        /// Question text; multiple words are joined with spaces
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Interactive question/answer session with the assistant
    Chat,
    /// Print a click-to-chat WhatsApp link for a phone number
    Link {
        phone: String,
    },
    /// Interactive shell holding one result table across commands
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = placescout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search {
            sector,
            city,
            export,
            check_whatsapp,
        }) => {
            search::run_search(&config, &sector, &city, export, check_whatsapp).await?;
        }
        Some(Commands::Ask { prompt }) => {
            assistant::run_ask(&config, &prompt.join(" ")).await?;
        }
        Some(Commands::Chat) => assistant::run_chat(&config).await?,
        Some(Commands::Link { phone }) => run_link(&config, &phone)?,
        Some(Commands::Shell) | None => shell::run_shell(config).await?,
    }

    Ok(())
}

fn run_link(config: &placescout_core::AppConfig, phone: &str) -> anyhow::Result<()> {
    let link = placescout_core::whatsapp_chat_link(phone, &config.country_code)
        .ok_or_else(|| anyhow::anyhow!("'{phone}' does not contain a phone number"))?;
    println!("{link}");
    Ok(())
}
