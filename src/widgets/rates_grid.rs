// ============================================================================
// Widget : grille des derniers taux (base MYR)
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::WidgetId;
use crate::api::{LatestRates, ReferenceSource};
use crate::board::{ids, lock_board, Panel, RateCard, SharedBoard};
use crate::models::CurrencyCode;
use crate::refresh::Widget;

pub const RATES_BASE: CurrencyCode = CurrencyCode::MYR;

pub const LOAD_FAILED: &str = "Failed to load exchange rates";
pub const NO_RATES: &str = "No rates available";

/// Cartes triées par code devise, taux à 4 décimales
pub fn rate_cards(latest: &LatestRates) -> Vec<RateCard> {
    // BTreeMap : déjà trié par code
    latest
        .rates
        .iter()
        .map(|(code, rate)| RateCard {
            code: code.to_string(),
            value: format!("{:.4}", rate),
        })
        .collect()
}

/// "Last updated: 2024-05-01"
pub fn last_updated_label(latest: &LatestRates) -> String {
    format!("Last updated: {}", latest.date.format("%Y-%m-%d"))
}

pub struct RatesGridWidget {
    reference: Arc<dyn ReferenceSource>,
    board: SharedBoard,
    period: Duration,
}

impl RatesGridWidget {
    pub fn new(reference: Arc<dyn ReferenceSource>, board: SharedBoard, period: Duration) -> Self {
        Self {
            reference,
            board,
            period,
        }
    }
}

#[async_trait]
impl Widget for RatesGridWidget {
    fn id(&self) -> WidgetId {
        WidgetId::RatesGrid
    }

    fn period(&self) -> Option<Duration> {
        Some(self.period)
    }

    async fn refresh(&self) {
        let latest = self.reference.latest_all(RATES_BASE).await;

        let mut board = lock_board(&self.board);
        match latest {
            Some(latest) if !latest.rates.is_empty() => {
                info!(base = %latest.base, count = latest.rates.len(), date = %latest.date, "Latest rates ready");
                board.set_panel(ids::RATES_CONTAINER, Panel::Rates(rate_cards(&latest)));
                board.set_text(ids::LAST_UPDATED, last_updated_label(&latest));
            }
            Some(_) => {
                board.set_panel(ids::RATES_CONTAINER, Panel::Error(NO_RATES.to_string()));
            }
            None => {
                warn!("Latest rates unavailable");
                board.set_panel(ids::RATES_CONTAINER, Panel::Error(LOAD_FAILED.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_cards_sorted_with_four_decimals() {
        let latest = LatestRates {
            base: CurrencyCode::MYR,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            rates: BTreeMap::from([
                (CurrencyCode::USD, 0.2105),
                (CurrencyCode::EUR, 0.19681),
                (CurrencyCode::JPY, 32.5),
            ]),
        };

        let cards = rate_cards(&latest);
        let codes: Vec<&str> = cards.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["EUR", "JPY", "USD"]);
        assert_eq!(cards[0].value, "0.1968");
        assert_eq!(cards[1].value, "32.5000");
        assert_eq!(last_updated_label(&latest), "Last updated: 2024-05-01");
    }
}
