use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use super::source::{Asset, FetchError, PriceSnapshot, PriceSource};

const PRODUCTION_API: &str = "https://pro-api.coinmarketcap.com";
const SANDBOX_API: &str = "https://sandbox-api.coinmarketcap.com";

pub struct CoinMarketCapSource {
    client: Arc<Client>,
    api_key: String,
    base_url: &'static str,
}

impl CoinMarketCapSource {
    pub fn new(client: Arc<Client>, api_key: String, sandbox: bool) -> CoinMarketCapSource {
        CoinMarketCapSource {
            client,
            api_key,
            base_url: if sandbox { SANDBOX_API } else { PRODUCTION_API },
        }
    }
}

#[async_trait]
impl PriceSource for CoinMarketCapSource {
    async fn fetch(
        &self,
        symbols: &[String],
        currency: &str,
    ) -> Result<PriceSnapshot, FetchError> {
        let response: JsonValue = self
            .client
            .get(format!("{}/v1/cryptocurrency/quotes/latest", self.base_url))
            .query(&[
                ("symbol", symbols.join(",")),
                ("convert", currency.to_ascii_uppercase()),
            ])
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .send()
            .await?
            .json()
            .await?;
        parse_quotes(&response, symbols, currency)
    }

    fn name(&self) -> &'static str {
        "coinmarketcap"
    }
}

fn parse_quotes(
    response: &JsonValue,
    symbols: &[String],
    currency: &str,
) -> Result<PriceSnapshot, FetchError> {
    if let Some(code) = response["status"]["error_code"].as_i64() {
        if code != 0 {
            return Err(FetchError::Api {
                vendor: "coinmarketcap",
                message: response["status"]["error_message"]
                    .as_str()
                    .unwrap_or("unknown error")
                    .to_owned(),
            });
        }
    }
    let data = response["data"].as_object().ok_or(FetchError::Malformed {
        vendor: "coinmarketcap",
        detail: "missing data object".to_owned(),
    })?;
    let currency_key = currency.to_ascii_uppercase();
    let mut assets = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let quote = match data.get(symbol) {
            Some(entry) => &entry["quote"][currency_key.as_str()],
            None => {
                info!("Coinmarketcap: no data for {}, skipping", symbol);
                continue;
            }
        };
        let price = quote["price"].as_f64().and_then(Decimal::from_f64);
        let change = quote["percent_change_24h"].as_f64().and_then(Decimal::from_f64);
        match (price, change) {
            (Some(price), Some(change)) => {
                assets.push(Asset::new(symbol.clone(), price, change, currency))
            }
            _ => info!("Coinmarketcap: incomplete quote for {}, skipping", symbol),
        }
    }
    if assets.is_empty() {
        return Err(FetchError::NoData);
    }
    Ok(PriceSnapshot::new(assets))
}
