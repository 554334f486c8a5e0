// ============================================================================
// Widget : barres des paires majeures (USD vs EUR, GBP, MYR, JPY, AUD, SGD)
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{ChartSlot, WidgetId};
use crate::api::RateSource;
use crate::board::{ids, lock_board, SharedBoard};
use crate::models::{ChartConfig, ChartData, ChartKind, CurrencyCode, DatasetStyle};
use crate::refresh::Widget;

pub const PAIRS_BASE: CurrencyCode = CurrencyCode::USD;

pub const PAIRS_TARGETS: [CurrencyCode; 6] = [
    CurrencyCode::EUR,
    CurrencyCode::GBP,
    CurrencyCode::MYR,
    CurrencyCode::JPY,
    CurrencyCode::AUD,
    CurrencyCode::SGD,
];

/// Une barre par cible, dans l'ordre des cibles ; une cible absente reste
/// absente (pas de barre à zéro)
pub fn pairs_chart_config(
    base: CurrencyCode,
    targets: &[CurrencyCode],
    rates: &HashMap<CurrencyCode, Option<f64>>,
) -> ChartConfig {
    let labels = targets.iter().map(|t| t.to_string()).collect();
    let values = targets
        .iter()
        .map(|t| rates.get(t).copied().flatten())
        .collect();

    ChartConfig::new(ChartKind::Bar, labels).legend(false).dataset(
        format!("Rate vs {}", base),
        ChartData::Values(values),
        DatasetStyle::default(),
    )
}

pub struct PairsChartWidget {
    source: Arc<dyn RateSource>,
    board: SharedBoard,
    slot: ChartSlot,
    period: Duration,
}

impl PairsChartWidget {
    pub fn new(source: Arc<dyn RateSource>, board: SharedBoard, period: Duration) -> Self {
        Self {
            source,
            board,
            slot: ChartSlot::new(ids::BAR_CHART),
            period,
        }
    }
}

#[async_trait]
impl Widget for PairsChartWidget {
    fn id(&self) -> WidgetId {
        WidgetId::PairsChart
    }

    fn period(&self) -> Option<Duration> {
        Some(self.period)
    }

    async fn refresh(&self) {
        let rates = self.source.fetch_multi(PAIRS_BASE, &PAIRS_TARGETS).await;
        info!(available = rates.values().flatten().count(), "Major pairs fetched");

        let config = pairs_chart_config(PAIRS_BASE, &PAIRS_TARGETS, &rates);
        let mut board = lock_board(&self.board);
        self.slot.render(&mut board, config, None);
    }

    fn dispose(&self) {
        let mut board = lock_board(&self.board);
        self.slot.dispose(&mut board);
    }
}
