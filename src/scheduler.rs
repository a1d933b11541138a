use std::time::Duration;

use anyhow::Result;
use log::{debug, info};
use tokio::time::sleep;

use crate::rotator::AssetRotator;
use crate::sources::Asset;

pub trait Renderer {
    type Frame;

    fn draw_asset(&mut self, asset: &Asset) -> Self::Frame;
    fn draw_error(&mut self) -> Self::Frame;
    fn commit(&mut self, frame: Self::Frame) -> Result<()>;
}

pub struct RenderScheduler<R: Renderer> {
    rotator: AssetRotator,
    renderer: R,
    interval: Duration,
}

impl<R: Renderer> RenderScheduler<R> {
    pub fn new(rotator: AssetRotator, renderer: R, interval: Duration) -> RenderScheduler<R> {
        RenderScheduler {
            rotator,
            renderer,
            interval,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("render loop started, one frame every {:?}", self.interval);
        loop {
            self.tick().await?;
            sleep(self.interval).await;
        }
    }

    // Data problems never break the loop; they show as an error frame.
    // Only a dead display surface ends the run.
    pub async fn tick(&mut self) -> Result<()> {
        let frame = match self.rotator.next().await {
            Some(asset) => {
                debug!("rendering {}", asset.symbol);
                self.renderer.draw_asset(&asset)
            }
            None => {
                debug!("nothing to display, rendering error frame");
                self.renderer.draw_error()
            }
        };
        self.renderer.commit(frame)
    }
}
