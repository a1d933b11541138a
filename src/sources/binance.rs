use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::warn;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use super::source::{Asset, FetchError, PriceSnapshot, PriceSource};

const API: &str = "https://api.binance.com";

pub struct BinanceSource {
    client: Arc<Client>,
}

impl BinanceSource {
    pub fn new(client: Arc<Client>) -> BinanceSource {
        BinanceSource { client }
    }

    async fn query_symbol(&self, symbol: &str, currency: &str) -> Result<Asset, FetchError> {
        let pair = format!("{}{}", symbol, quote_asset(currency));
        let response: JsonValue = self
            .client
            .get(format!("{}/api/v3/ticker/24hr", API))
            .query(&[("symbol", pair.as_str())])
            .send()
            .await?
            .json()
            .await?;
        parse_ticker(&response, symbol, currency)
    }
}

#[async_trait]
impl PriceSource for BinanceSource {
    async fn fetch(
        &self,
        symbols: &[String],
        currency: &str,
    ) -> Result<PriceSnapshot, FetchError> {
        let queries = symbols.iter().map(|s| self.query_symbol(s, currency));
        let results = join_all(queries).await;
        let mut assets = Vec::with_capacity(symbols.len());
        for (symbol, result) in symbols.iter().zip(results) {
            match result {
                Ok(asset) => assets.push(asset),
                Err(err) => warn!("Binance: skipping {}: {}", symbol, err),
            }
        }
        if assets.is_empty() {
            return Err(FetchError::NoData);
        }
        Ok(PriceSnapshot::new(assets))
    }

    fn name(&self) -> &'static str {
        "binance"
    }
}

// Binance trades against stablecoins, not fiat.
fn quote_asset(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "USD" => "USDT".to_owned(),
        other => other.to_owned(),
    }
}

fn parse_ticker(response: &JsonValue, symbol: &str, currency: &str) -> Result<Asset, FetchError> {
    if response["msg"] != JsonValue::Null {
        return Err(FetchError::Api {
            vendor: "binance",
            message: response["msg"]
                .as_str()
                .unwrap_or("unknown error")
                .to_owned(),
        });
    }
    let price = decimal_field(response, "lastPrice")?;
    let change = decimal_field(response, "priceChangePercent")?;
    Ok(Asset::new(symbol.to_owned(), price, change, currency))
}

fn decimal_field(response: &JsonValue, field: &str) -> Result<Decimal, FetchError> {
    response[field]
        .as_str()
        .and_then(|raw| Decimal::from_str(raw).ok())
        .ok_or_else(|| FetchError::Malformed {
            vendor: "binance",
            detail: format!("missing or invalid {}", field),
        })
}
