use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::source::{Asset, FetchError, PriceSnapshot, PriceSource};

const API: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct CoinListEntry {
    id: String,
    symbol: String,
}

pub struct CoinGeckoSource {
    client: Arc<Client>,
    // Ticker symbol to Coingecko id, in configured order. Resolved once at
    // startup so the hot path stays a single request.
    resolved: Vec<(String, String)>,
}

impl CoinGeckoSource {
    pub async fn connect(
        client: Arc<Client>,
        symbols: &[String],
    ) -> Result<CoinGeckoSource, FetchError> {
        let mut listed: HashMap<String, String> = HashMap::new();
        if symbols.iter().any(|s| known_id(s).is_none()) {
            info!("Coingecko: resolving unknown symbols via /coins/list");
            let coins: Vec<CoinListEntry> = client
                .get(format!("{}/coins/list", API))
                .send()
                .await?
                .json()
                .await?;
            for coin in coins {
                // Symbols collide on Coingecko; keep the first listing.
                listed
                    .entry(coin.symbol.to_ascii_uppercase())
                    .or_insert(coin.id);
            }
        }
        let mut resolved = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let id = known_id(symbol)
                .map(str::to_owned)
                .or_else(|| listed.get(symbol.as_str()).cloned());
            match id {
                Some(id) => resolved.push((symbol.clone(), id)),
                None => warn!("Coingecko: no id found for {}, it will be skipped", symbol),
            }
        }
        Ok(CoinGeckoSource { client, resolved })
    }

    fn id_for(&self, symbol: &str) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(sym, _)| sym == symbol)
            .map(|(_, id)| id.as_str())
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch(
        &self,
        symbols: &[String],
        currency: &str,
    ) -> Result<PriceSnapshot, FetchError> {
        let ids: Vec<&str> = symbols.iter().filter_map(|s| self.id_for(s)).collect();
        if ids.is_empty() {
            return Err(FetchError::NoData);
        }
        let response: JsonValue = self
            .client
            .get(format!("{}/simple/price", API))
            .query(&[
                ("ids", ids.join(",")),
                ("vs_currencies", currency.to_ascii_lowercase()),
                ("include_24hr_change", "true".to_owned()),
            ])
            .send()
            .await?
            .json()
            .await?;
        parse_simple_price(&response, &self.resolved, symbols, currency)
    }

    fn name(&self) -> &'static str {
        "coingecko"
    }
}

fn known_id(symbol: &str) -> Option<&'static str> {
    match symbol.to_ascii_uppercase().as_str() {
        "BTC" => Some("bitcoin"),
        "ETH" => Some("ethereum"),
        "SOL" => Some("solana"),
        "BNB" => Some("binancecoin"),
        "XRP" => Some("ripple"),
        "ADA" => Some("cardano"),
        "DOGE" => Some("dogecoin"),
        "DOT" => Some("polkadot"),
        "LTC" => Some("litecoin"),
        "USDT" => Some("tether"),
        "USDC" => Some("usd-coin"),
        _ => None,
    }
}

fn parse_simple_price(
    response: &JsonValue,
    resolved: &[(String, String)],
    symbols: &[String],
    currency: &str,
) -> Result<PriceSnapshot, FetchError> {
    if let Some(code) = response["status"]["error_code"].as_i64() {
        return Err(FetchError::Api {
            vendor: "coingecko",
            message: response["status"]["error_message"]
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("error code {}", code)),
        });
    }
    let price_key = currency.to_ascii_lowercase();
    let change_key = format!("{}_24h_change", price_key);
    let mut assets = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let entry = match resolved.iter().find(|(sym, _)| sym == symbol) {
            Some((_, id)) => &response[id.as_str()],
            None => continue,
        };
        let price = entry[price_key.as_str()].as_f64().and_then(Decimal::from_f64);
        let change = entry[change_key.as_str()].as_f64().and_then(Decimal::from_f64);
        match (price, change) {
            (Some(price), Some(change)) => {
                assets.push(Asset::new(symbol.clone(), price, change, currency))
            }
            _ => info!("Coingecko: incomplete entry for {}, skipping", symbol),
        }
    }
    if assets.is_empty() {
        return Err(FetchError::NoData);
    }
    Ok(PriceSnapshot::new(assets))
}
