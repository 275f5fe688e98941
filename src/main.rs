use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use weather_history::config::{
    DEFAULT_BASE_URL, DEFAULT_CITY, DEFAULT_MAX_RETRIES, DEFAULT_RENDER_WAIT_SECS, DEFAULT_YEAR,
};
use weather_history::html::read_html_file;
use weather_history::prompt::{AssumeYes, Confirm, StdinConfirm, should_scrape};
use weather_history::{
    FetchStrategy, ScrapeConfig, ThreadSleeper, build_fetcher, extract_records, save_annual_data,
    scrape_year,
};

#[derive(Parser)]
#[command(name = "weather-history")]
#[command(about = "Scrapes a year of daily weather history for one city into a CSV file")]
struct Cli {
    /// City slug as used in the site's URLs
    #[arg(long, env = "WEATHER_HISTORY_CITY", default_value = DEFAULT_CITY)]
    city: String,

    #[arg(long, env = "WEATHER_HISTORY_YEAR", default_value_t = DEFAULT_YEAR)]
    year: i32,

    #[arg(long, env = "WEATHER_HISTORY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// How month pages are retrieved
    #[arg(long, env = "WEATHER_HISTORY_FETCHER", value_enum, default_value_t = FetchStrategy::Browser)]
    fetcher: FetchStrategy,

    /// Attempts per month page
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Seconds to let the browser render a page before reading it
    #[arg(long, default_value_t = DEFAULT_RENDER_WAIT_SECS)]
    render_wait: u64,

    /// Output CSV (defaults to {city}_{year}_weather.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file without asking
    #[arg(long)]
    yes: bool,

    /// Extract from a saved month page instead of scraping the site
    #[arg(long)]
    html: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> ScrapeConfig {
        let output = self
            .output
            .unwrap_or_else(|| ScrapeConfig::default_output(&self.city, self.year));
        ScrapeConfig {
            city: self.city,
            year: self.year,
            base_url: self.base_url,
            strategy: self.fetcher,
            max_retries: self.max_retries,
            render_wait: Duration::from_secs(self.render_wait),
            output,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let assume_yes = cli.yes;
    let html = cli.html.clone();
    let config = cli.into_config();

    let confirm: Box<dyn Confirm> = if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };
    if !should_scrape(&config.output, confirm.as_ref())? {
        println!("Keeping existing data in {}", config.output.display());
        return Ok(());
    }

    let mut records = match html {
        Some(path) => {
            info!("Extracting records from {}", path.display());
            extract_records(&read_html_file(&path)?)?
        }
        None => {
            info!("Scraping {} weather for {}", config.city, config.year);
            let fetcher = build_fetcher(&config)?;
            scrape_year(
                fetcher.as_ref(),
                &ThreadSleeper,
                &config.base_url,
                &config.city,
                config.year,
                config.max_retries,
            )
        }
    };

    match save_annual_data(&mut records, &config.output) {
        Ok(Some(_)) => println!(
            "Finished {} {}: data saved to {}",
            config.city,
            config.year,
            config.output.display()
        ),
        Ok(None) => error!("Nothing was collected for {} {}", config.city, config.year),
        Err(e) => error!("Failed to save {}: {:#}", config.output.display(), e),
    }

    Ok(())
}
