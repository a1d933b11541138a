mod binance;
mod coingecko;
mod coinmarketcap;
mod source;

pub use binance::BinanceSource;
pub use coingecko::CoinGeckoSource;
pub use coinmarketcap::CoinMarketCapSource;
pub use source::{Asset, FetchError, PriceSnapshot, PriceSource};
