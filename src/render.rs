use std::io;

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};

use crate::scheduler::Renderer;
use crate::sources::Asset;

const INNER_WIDTH: usize = 20;
const CONTENT_WIDTH: usize = INNER_WIDTH - 2;

/// Draws one asset per frame as a small bordered card, symbol and 24h
/// change on the top row, price underneath.
pub struct CardRenderer;

impl CardRenderer {
    pub fn new() -> CardRenderer {
        CardRenderer
    }
}

impl Renderer for CardRenderer {
    type Frame = String;

    fn draw_asset(&mut self, asset: &Asset) -> String {
        let change = if asset.change_is_negative {
            asset.change.clone().red()
        } else {
            asset.change.clone().green()
        };
        let top_fill = CONTENT_WIDTH.saturating_sub(asset.symbol.len() + asset.change.len());
        let price_fill = CONTENT_WIDTH.saturating_sub(asset.price.len());
        format!(
            "{}│ {}{}{} │\n{}│ {}{} │\n{}",
            border_top(),
            asset.symbol,
            " ".repeat(top_fill),
            change,
            blank_line(),
            asset.price,
            " ".repeat(price_fill),
            border_bottom(),
        )
    }

    fn draw_error(&mut self) -> String {
        let label = "ERROR";
        let left = (CONTENT_WIDTH - label.len()) / 2;
        let right = CONTENT_WIDTH - label.len() - left;
        format!(
            "{}{}│ {}{}{} │\n{}{}",
            border_top(),
            blank_line(),
            " ".repeat(left),
            label.red(),
            " ".repeat(right),
            blank_line(),
            border_bottom(),
        )
    }

    fn commit(&mut self, frame: String) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, MoveTo(0, 0), Clear(ClearType::All), Print(frame))?;
        Ok(())
    }
}

fn border_top() -> String {
    format!("┌{}┐\n", "─".repeat(INNER_WIDTH))
}

fn border_bottom() -> String {
    format!("└{}┘\n", "─".repeat(INNER_WIDTH))
}

fn blank_line() -> String {
    format!("│{}│\n", " ".repeat(INNER_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn btc() -> Asset {
        Asset::new(
            "BTC".to_owned(),
            Decimal::new(50_000, 0),
            Decimal::new(12, 1),
            "USD",
        )
    }

    #[test]
    fn asset_card_shows_symbol_price_and_change() {
        let frame = CardRenderer::new().draw_asset(&btc());
        assert!(frame.contains("BTC"));
        assert!(frame.contains("$50,000.00"));
        assert!(frame.contains("1.2%"));
        assert!(frame.starts_with('┌'));
        assert!(frame.ends_with("┘\n"));
    }

    #[test]
    fn change_color_follows_the_sign_flag() {
        let up = CardRenderer::new().draw_asset(&btc());
        let down = CardRenderer::new().draw_asset(&Asset::new(
            "BTC".to_owned(),
            Decimal::new(50_000, 0),
            Decimal::new(-12, 1),
            "USD",
        ));
        assert_ne!(up, down);
        assert!(down.contains("1.2%"));
        assert!(!down.contains("-1.2%"));
    }

    #[test]
    fn error_card_is_the_same_height_as_an_asset_card() {
        let mut renderer = CardRenderer::new();
        let error = renderer.draw_error();
        let asset = renderer.draw_asset(&btc());
        assert!(error.contains("ERROR"));
        assert_eq!(error.lines().count(), asset.lines().count());
    }
}
