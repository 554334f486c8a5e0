// ============================================================================
// Widget : courbe de tendance USD → MYR (14 jours)
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{ChartSlot, WidgetId};
use crate::api::RateSource;
use crate::board::{ids, lock_board, Panel, SharedBoard};
use crate::models::{ChartConfig, ChartData, ChartKind, CurrencyCode, DatasetStyle, RateSeries};
use crate::refresh::Widget;
use crate::series::build_series;

/// Nombre de jours affichés
pub const TREND_DAYS: usize = 14;

pub const TREND_UNAVAILABLE: &str = "Failed to load exchange rate trend";

/// Config de la courbe : un label par jour, les trous restent des trous
pub fn trend_chart_config(series: &RateSeries) -> ChartConfig {
    let style = DatasetStyle {
        fill: true,
        tension: 0.25,
        ..DatasetStyle::default()
    };

    ChartConfig::new(ChartKind::Line, series.labels())
        .legend(true)
        .dataset(
            format!("{} → {}", series.base, series.quote),
            ChartData::Values(series.values()),
            style,
        )
}

pub struct TrendChartWidget {
    source: Arc<dyn RateSource>,
    board: SharedBoard,
    slot: ChartSlot,
    period: Duration,
}

impl TrendChartWidget {
    pub fn new(source: Arc<dyn RateSource>, board: SharedBoard, period: Duration) -> Self {
        Self {
            source,
            board,
            slot: ChartSlot::new(ids::LINE_CHART),
            period,
        }
    }
}

#[async_trait]
impl Widget for TrendChartWidget {
    fn id(&self) -> WidgetId {
        WidgetId::TrendChart
    }

    fn period(&self) -> Option<Duration> {
        Some(self.period)
    }

    async fn refresh(&self) {
        let series = build_series(
            self.source.as_ref(),
            CurrencyCode::USD,
            CurrencyCode::MYR,
            TREND_DAYS,
        )
        .await;
        info!(available = series.available_count(), days = series.len(), "Trend series ready");

        // Aucun jour disponible : panneau d'erreur plutôt qu'une courbe vide
        if series.available_count() == 0 {
            warn!("Trend series unavailable");
            let mut board = lock_board(&self.board);
            self.slot.clear(&mut board);
            board.set_panel(ids::LINE_CHART, Panel::Error(TREND_UNAVAILABLE.to_string()));
            return;
        }

        let config = trend_chart_config(&series);
        let mut board = lock_board(&self.board);
        self.slot.render(&mut board, config, None);
    }

    fn dispose(&self) {
        let mut board = lock_board(&self.board);
        self.slot.dispose(&mut board);
    }
}
