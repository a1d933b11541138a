use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[async_trait]
pub trait PriceSource: Sync + Send {
    async fn fetch(&self, symbols: &[String], currency: &str)
        -> Result<PriceSnapshot, FetchError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{vendor}: {message}")]
    Api { vendor: &'static str, message: String },
    #[error("{vendor}: malformed response: {detail}")]
    Malformed { vendor: &'static str, detail: String },
    #[error("no usable price data in response")]
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub symbol: String,
    pub price: String,
    pub change: String,
    // The change string never carries a minus sign; the renderer decides
    // how to mark direction (color on the panel).
    pub change_is_negative: bool,
}

impl Asset {
    pub fn new(symbol: String, price: Decimal, change_pct: Decimal, currency: &str) -> Asset {
        let (change, change_is_negative) = format_change(change_pct);
        Asset {
            symbol,
            price: format_price(price, currency),
            change,
            change_is_negative,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    pub assets: Vec<Asset>,
    pub fetched_at: SystemTime,
}

impl PriceSnapshot {
    pub fn new(assets: Vec<Asset>) -> PriceSnapshot {
        PriceSnapshot {
            assets,
            fetched_at: SystemTime::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    // Zero if the wall clock moved backwards.
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed().unwrap_or_default()
    }
}

fn format_price(value: Decimal, currency: &str) -> String {
    let rounded = value
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = rounded.to_string();
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole.to_owned(), format!("{:0<2}", frac)),
        None => (text, "00".to_owned()),
    };
    let grouped = group_thousands(&whole);
    match currency.to_ascii_uppercase().as_str() {
        "USD" => format!("${}.{}", grouped, frac),
        code => format!("{} {}.{}", code, grouped, frac),
    }
}

fn format_change(value: Decimal) -> (String, bool) {
    let negative = value.is_sign_negative() && !value.is_zero();
    let rounded = value
        .abs()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
    let text = rounded.to_string();
    let formatted = if text.contains('.') {
        format!("{}%", text)
    } else {
        format!("{}.0%", text)
    };
    (formatted, negative)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
