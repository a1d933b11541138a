use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceApi {
    CoinMarketCap,
    CoinGecko,
    Binance,
}

impl PriceApi {
    fn from_name(name: &str) -> Result<PriceApi> {
        match name.to_ascii_lowercase().as_str() {
            "coinmarketcap" => Ok(PriceApi::CoinMarketCap),
            "coingecko" => Ok(PriceApi::CoinGecko),
            "binance" => Ok(PriceApi::Binance),
            other => bail!("\"{}\" api is not implemented", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbols: Vec<String>,
    pub currency: String,
    pub api: PriceApi,
    pub api_key: Option<String>,
    pub sandbox: bool,
    pub refresh_rate: Duration,
    pub render_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let symbols = parse_symbols(&env::var("SYMBOLS").unwrap_or_default());
        let currency = env::var("CURRENCY")
            .unwrap_or_else(|_| "USD".to_owned())
            .to_ascii_uppercase();
        let api =
            PriceApi::from_name(&env::var("PRICE_API").unwrap_or_else(|_| "coinmarketcap".to_owned()))?;
        let api_key = require_api_key(api, env::var("CMC_API_KEY").ok())?;
        let sandbox = env::var("SANDBOX").map(|v| v == "true").unwrap_or(false);
        let refresh_rate = Duration::from_secs(parse_seconds(
            "REFRESH_RATE",
            env::var("REFRESH_RATE").ok(),
            300,
        )?);
        let render_interval =
            Duration::from_secs(parse_seconds("SLEEP", env::var("SLEEP").ok(), 3)?);
        Ok(Config {
            symbols,
            currency,
            api,
            api_key,
            sandbox,
            refresh_rate,
            render_interval,
        })
    }
}

fn parse_symbols(raw: &str) -> Vec<String> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if symbols.is_empty() {
        vec!["BTC".to_owned(), "ETH".to_owned()]
    } else {
        symbols
    }
}

fn require_api_key(api: PriceApi, api_key: Option<String>) -> Result<Option<String>> {
    if api == PriceApi::CoinMarketCap && api_key.is_none() {
        bail!("CMC_API_KEY environment variable must be set");
    }
    Ok(api_key)
}

fn parse_seconds(var: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds, got \"{}\"", var, raw)),
        None => Ok(default),
    }
}
