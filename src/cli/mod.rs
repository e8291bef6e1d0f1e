use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use num_format::{Locale, ToFormattedString};

use crate::client::{self, AzureClient, RateCardCache};
use crate::services::summarizer::DEFAULT_TOP_N;
use crate::services::{renderer, report};
use crate::types::{DateWindow, RateCard};

/// Rate card offers are durable offer ids, e.g. "MS-AZR-0003P"
const OFFER_PREFIX: &str = "MS-AZR-";

/// Azure usage cost report for a date range
#[derive(Parser)]
#[command(name = "azcost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Offer ID for the rate card; must start with "MS-AZR-"
    #[arg(short, long)]
    offer: String,

    /// Start date (YYYY-MM-DD, inclusive, UTC)
    #[arg(short, long)]
    from: String,

    /// End date (YYYY-MM-DD, inclusive, UTC)
    #[arg(short, long)]
    to: String,

    /// Show the top n most expensive entries per day
    #[arg(short, long, default_value_t = DEFAULT_TOP_N as u32,
          value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Ignore the cached rate card and fetch a fresh one
    #[arg(long)]
    refresh: bool,
}

fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("\"{}\" is not a valid date in the format \"YYYY-MM-DD\"", value))
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let window = self.window()?;
        if !self.offer.starts_with(OFFER_PREFIX) {
            bail!("you must specify a valid offer beginning with \"{}\"", OFFER_PREFIX);
        }

        let token = client::auth::acquire()?;
        let azure = AzureClient::new(&token)?;

        let rate_card = self.load_rate_card(&azure)?;
        println!(
            "{} rates loaded.",
            rate_card.meters.len().to_formatted_string(&Locale::en)
        );

        eprintln!("[azcost] Fetching usage...");
        let usage = azure.fetch_usage(&window)?;

        let result = report::build(&rate_card, &usage, &window, self.count as usize);
        for diagnostic in &result.diagnostics {
            eprintln!("[azcost] Warning: {}", diagnostic);
        }
        for line in renderer::render(&result.report) {
            println!("{}", line);
        }
        Ok(())
    }

    fn window(&self) -> anyhow::Result<DateWindow> {
        let from = parse_date(&self.from)?;
        let to = parse_date(&self.to)?;
        if from > to {
            bail!("--from ({}) must not be after --to ({})", from, to);
        }
        Ok(DateWindow::new(from, to))
    }

    /// Cached rate card if present (unless --refresh), otherwise fetch and
    /// cache; a failed save only costs the next run a refetch
    fn load_rate_card(&self, azure: &AzureClient) -> anyhow::Result<RateCard> {
        let cache = RateCardCache::new().ok();

        if !self.refresh {
            if let Some(cache) = &cache {
                if let Ok(card) = cache.load(&self.offer) {
                    return Ok(card);
                }
            }
        }

        eprintln!("[azcost] Fetching rate card (can take a few minutes)...");
        let card = azure.fetch_rate_card(&self.offer)?;
        if let Some(cache) = &cache {
            if let Err(e) = cache.save(&self.offer, &card) {
                eprintln!("[azcost] Warning: failed to cache rate card: {}", e);
            }
        }
        Ok(card)
    }
}
