use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use reqwest::Client;

use coinpanel::cache::PriceCache;
use coinpanel::config::{Config, PriceApi};
use coinpanel::render::CardRenderer;
use coinpanel::rotator::AssetRotator;
use coinpanel::scheduler::RenderScheduler;
use coinpanel::sources::{BinanceSource, CoinGeckoSource, CoinMarketCapSource, PriceSource};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env()?;
    info!(
        "showing {} in {}, refresh every {:?}, one frame every {:?}",
        config.symbols.join(","),
        config.currency,
        config.refresh_rate,
        config.render_interval
    );

    let client = Arc::new(
        Client::builder()
            .user_agent(concat!("coinpanel ", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed to build http client")?,
    );

    let source: Box<dyn PriceSource> = match config.api {
        PriceApi::CoinMarketCap => {
            let api_key = config
                .api_key
                .clone()
                .context("CMC_API_KEY environment variable must be set")?;
            Box::new(CoinMarketCapSource::new(client.clone(), api_key, config.sandbox))
        }
        PriceApi::CoinGecko => {
            Box::new(CoinGeckoSource::connect(client.clone(), &config.symbols).await?)
        }
        PriceApi::Binance => Box::new(BinanceSource::new(client.clone())),
    };
    info!("price source: {}", source.name());

    let cache = PriceCache::new(
        source,
        config.symbols.clone(),
        config.currency.clone(),
        config.refresh_rate,
    );
    let rotator = AssetRotator::new(cache);
    let mut scheduler = RenderScheduler::new(rotator, CardRenderer::new(), config.render_interval);

    tokio::select! {
        result = scheduler.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, exiting");
            Ok(())
        }
    }
}
