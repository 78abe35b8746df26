use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_agg_core::{Config, ProviderId, aggregator_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-agg",
    version,
    about = "Current weather merged from AccuWeather and OpenWeather"
)]
pub struct Cli {
    /// Verbose logging to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "accuweather" or "openweather".
        provider: String,
    },

    /// Show merged current weather.
    Show {
        /// City name, looked up on AccuWeather.
        city: String,

        /// Postal code, looked up on OpenWeather (e.g. "10001" or "E14,GB").
        zip: String,

        /// Print the merged record as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, zip, json } => show(&city, &zip, json).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let prompt = format!("API key for {id}:");
    let api_key = Password::new(&prompt)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key for '{id}' must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    println!("Saved {id} API key to {}", Config::config_file_path()?.display());

    let missing = config.missing_providers();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|id| id.as_str()).collect();
        println!("Still missing: {}", names.join(", "));
    }

    Ok(())
}

async fn show(city: &str, zip: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let aggregator = aggregator_from_config(&config)?;

    let weather = aggregator
        .get_weather_details(city, zip)
        .await
        .with_context(|| format!("Could not get weather for '{city}' / '{zip}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&weather)?);
    } else {
        println!("{}", render::summary(city, zip, &weather));
    }

    Ok(())
}
