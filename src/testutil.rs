use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::scheduler::Renderer;
use crate::sources::{Asset, FetchError, PriceSnapshot, PriceSource};

pub(crate) fn asset(symbol: &str) -> Asset {
    Asset::new(
        symbol.to_owned(),
        Decimal::new(50_000, 0),
        Decimal::new(12, 1),
        "USD",
    )
}

pub(crate) fn snapshot(symbols: &[&str]) -> PriceSnapshot {
    PriceSnapshot::new(symbols.iter().map(|s| asset(s)).collect())
}

/// Shared handle onto a scripted source's fetch counter, usable after the
/// source itself has been boxed away into a cache.
pub(crate) struct FetchCount(Arc<AtomicUsize>);

impl FetchCount {
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Price source that replays a fixed script of responses, then reports
/// `NoData` once the script runs out.
pub(crate) struct ScriptedSource {
    responses: Mutex<VecDeque<Result<PriceSnapshot, FetchError>>>,
    count: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub(crate) fn new(responses: Vec<Result<PriceSnapshot, FetchError>>) -> ScriptedSource {
        ScriptedSource {
            responses: Mutex::new(responses.into()),
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn count(&self) -> FetchCount {
        FetchCount(self.count.clone())
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch(
        &self,
        _symbols: &[String],
        _currency: &str,
    ) -> Result<PriceSnapshot, FetchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::NoData))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DrawnFrame {
    Asset(String),
    Error,
}

/// Renderer that records what was committed instead of drawing anything.
pub(crate) struct RecordingRenderer {
    frames: Arc<Mutex<Vec<DrawnFrame>>>,
}

impl RecordingRenderer {
    pub(crate) fn new() -> (RecordingRenderer, Arc<Mutex<Vec<DrawnFrame>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingRenderer {
                frames: frames.clone(),
            },
            frames,
        )
    }
}

impl Renderer for RecordingRenderer {
    type Frame = DrawnFrame;

    fn draw_asset(&mut self, asset: &Asset) -> DrawnFrame {
        DrawnFrame::Asset(asset.symbol.clone())
    }

    fn draw_error(&mut self) -> DrawnFrame {
        DrawnFrame::Error
    }

    fn commit(&mut self, frame: DrawnFrame) -> Result<()> {
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}
