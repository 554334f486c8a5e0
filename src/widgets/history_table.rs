// ============================================================================
// Widget : tableau d'historique d'une paire
// ============================================================================
// Garde les 5 dernières observations de la paire choisie dans les selects
// baseCurrency / targetCurrency, la plus récente en tête.
// ============================================================================

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{format_rate_4dp, WidgetId};
use crate::api::RateSource;
use crate::board::{ids, lock_board, Panel, SharedBoard, TableRow};
use crate::models::{HistoryBuffer, PairSnapshot};
use crate::refresh::Widget;

/// Nombre de lignes conservées
pub const TABLE_CAPACITY: usize = 5;

pub const SAME_CURRENCY_ALERT: &str = "Base and Target cannot be the same.";

/// Lignes du tableau, plus récente en premier
pub fn table_rows(history: &HistoryBuffer<PairSnapshot>) -> Vec<TableRow> {
    history
        .iter()
        .map(|snapshot| TableRow {
            timestamp: snapshot.observed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            base: snapshot.base.to_string(),
            target: snapshot.quote.to_string(),
            rate: format_rate_4dp(snapshot.rate),
        })
        .collect()
}

/// Panel du tableau : "No data" tant que l'historique est vide
pub fn table_panel(history: &HistoryBuffer<PairSnapshot>) -> Panel {
    if history.is_empty() {
        Panel::Message("No data".to_string())
    } else {
        Panel::Table(table_rows(history))
    }
}

pub struct HistoryTableWidget {
    source: Arc<dyn RateSource>,
    board: SharedBoard,
    history: Mutex<HistoryBuffer<PairSnapshot>>,
    period: Duration,
}

impl HistoryTableWidget {
    pub fn new(source: Arc<dyn RateSource>, board: SharedBoard, period: Duration) -> Self {
        Self {
            source,
            board,
            history: Mutex::new(HistoryBuffer::new(TABLE_CAPACITY)),
            period,
        }
    }
}

#[async_trait]
impl Widget for HistoryTableWidget {
    fn id(&self) -> WidgetId {
        WidgetId::HistoryTable
    }

    fn period(&self) -> Option<Duration> {
        Some(self.period)
    }

    async fn refresh(&self) {
        let (base, target) = {
            let board = lock_board(&self.board);
            (board.currency(ids::BASE_CURRENCY), board.currency(ids::TARGET_CURRENCY))
        };

        let (base, target) = match (base, target) {
            (Some(base), Some(target)) if base != target => (base, target),
            _ => {
                // Aucune requête : on prévient et le tableau reste tel quel
                warn!(?base, ?target, "History table skipped: invalid pair");
                lock_board(&self.board).set_alert(SAME_CURRENCY_ALERT);
                return;
            }
        };

        let rate = self.source.fetch_one(base, target).await;
        info!(%base, %target, ?rate, "History table rate fetched");

        let panel = {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            history.push(PairSnapshot::new(base, target, rate));
            table_panel(&history)
        };

        lock_board(&self.board).set_panel(ids::EXCHANGE_TABLE, panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrencyCode;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_rows_newest_first_with_na() {
        let mut history = HistoryBuffer::new(TABLE_CAPACITY);
        assert_eq!(table_panel(&history), Panel::Message("No data".to_string()));

        let at = |s| Local.with_ymd_and_hms(2024, 5, 1, 10, 0, s).unwrap();
        for (i, rate) in [Some(4.7), None, Some(4.71234), Some(4.72), Some(4.73), Some(4.74)]
            .into_iter()
            .enumerate()
        {
            history.push(PairSnapshot::observed(
                CurrencyCode::USD,
                CurrencyCode::MYR,
                rate,
                at(i as u32),
            ));
        }

        let rows = table_rows(&history);
        assert_eq!(rows.len(), 5);
        let rates: Vec<&str> = rows.iter().map(|r| r.rate.as_str()).collect();
        assert_eq!(rates, vec!["4.7400", "4.7300", "4.7200", "4.7123", "N/A"]);
        assert_eq!(rows[0].timestamp, "2024-05-01 10:00:05");
        assert_eq!(rows[0].base, "USD");
        assert_eq!(rows[0].target, "MYR");
    }
}
