// ============================================================================
// Widget : convertisseur de devises
// ============================================================================
// Entrées : fromAmount, fromCurrency, toCurrency
// Sorties : toAmount (2 décimales) et le panel "result"
//
// Règles :
// - montant vide, illisible, nul ou négatif → placeholder, aucune requête
// - from == to → taux 1.0, aucune requête
// - taux indisponible → message d'erreur
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::WidgetId;
use crate::api::{pair_rate, RateSource};
use crate::board::{ids, lock_board, Board, ConversionView, Panel, SharedBoard};
use crate::models::CurrencyCode;
use crate::refresh::Widget;

pub const PLACEHOLDER: &str = "Enter an amount to see the conversion result";
pub const CONVERSION_FAILED: &str = "Conversion failed. Please try again.";

/// Montant saisi, None si vide, illisible, nul, négatif ou non fini
pub fn parse_amount(input: &str) -> Option<f64> {
    let amount: f64 = input.trim().parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Lignes affichées pour une conversion réussie
pub fn conversion_view(amount: f64, from: CurrencyCode, to: CurrencyCode, rate: f64) -> ConversionView {
    let converted = amount * rate;
    ConversionView {
        headline: format!("{:.2} {}", converted, to),
        detail: format!("{} {} = {:.2} {}", amount, from, converted, to),
        rate_line: format!("1 {} = {:.4} {}", from, rate, to),
    }
}

/// Échange les devises du convertisseur (la reconversion est à déclencher)
pub fn swap_currencies(board: &mut Board) {
    board.swap_inputs(ids::FROM_CURRENCY, ids::TO_CURRENCY);
}

fn show_placeholder(board: &mut Board) {
    board.set_input(ids::TO_AMOUNT, "");
    board.set_panel(ids::RESULT, Panel::Message(PLACEHOLDER.to_string()));
}

pub struct ConverterWidget {
    source: Arc<dyn RateSource>,
    board: SharedBoard,
}

impl ConverterWidget {
    pub fn new(source: Arc<dyn RateSource>, board: SharedBoard) -> Self {
        Self { source, board }
    }
}

#[async_trait]
impl Widget for ConverterWidget {
    fn id(&self) -> WidgetId {
        WidgetId::Converter
    }

    fn period(&self) -> Option<Duration> {
        None
    }

    async fn refresh(&self) {
        let (amount, from, to) = {
            let mut board = lock_board(&self.board);
            let amount = parse_amount(board.input(ids::FROM_AMOUNT));
            let from = board.currency(ids::FROM_CURRENCY);
            let to = board.currency(ids::TO_CURRENCY);

            match (amount, from, to) {
                (Some(amount), Some(from), Some(to)) => (amount, from, to),
                _ => {
                    show_placeholder(&mut board);
                    return;
                }
            }
        };

        let Some(rate) = pair_rate(self.source.as_ref(), from, to).await else {
            warn!(%from, %to, "Conversion failed: rate unavailable");
            let mut board = lock_board(&self.board);
            board.set_input(ids::TO_AMOUNT, "");
            board.set_panel(ids::RESULT, Panel::Error(CONVERSION_FAILED.to_string()));
            return;
        };

        let view = conversion_view(amount, from, to, rate);
        info!(%from, %to, amount, rate, "Conversion done");

        let mut board = lock_board(&self.board);
        board.set_input(ids::TO_AMOUNT, format!("{:.2}", amount * rate));
        board.set_panel(ids::RESULT, Panel::Conversion(view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_conversion_view() {
        let view = conversion_view(100.0, CurrencyCode::USD, CurrencyCode::EUR, 0.90);
        assert_eq!(view.headline, "90.00 EUR");
        assert_eq!(view.detail, "100 USD = 90.00 EUR");
        assert_eq!(view.rate_line, "1 USD = 0.9000 EUR");
    }

    #[test]
    fn test_swap_currencies() {
        let mut board = Board::with_defaults();
        swap_currencies(&mut board);
        assert_eq!(board.currency(ids::FROM_CURRENCY), Some(CurrencyCode::EUR));
        assert_eq!(board.currency(ids::TO_CURRENCY), Some(CurrencyCode::MYR));
    }
}
