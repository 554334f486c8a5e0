// ============================================================================
// Widgets : tuiles KPI
// ============================================================================
// - FX : USD → MYR et EUR → MYR, 2 décimales, "N/A" si indisponible
// - Macro : croissance du PIB et inflation SIMULÉES (aucune source réelle)
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use rand::Rng;
use tracing::debug;

use super::{format_rate_2dp, updated_label, WidgetId};
use crate::api::RateSource;
use crate::board::{ids, lock_board, SharedBoard};
use crate::models::CurrencyCode;
use crate::refresh::Widget;

// ============================================================================
// KPI de change
// ============================================================================

pub struct FxKpiWidget {
    source: Arc<dyn RateSource>,
    board: SharedBoard,
    period: Duration,
}

impl FxKpiWidget {
    pub fn new(source: Arc<dyn RateSource>, board: SharedBoard, period: Duration) -> Self {
        Self {
            source,
            board,
            period,
        }
    }
}

#[async_trait]
impl Widget for FxKpiWidget {
    fn id(&self) -> WidgetId {
        WidgetId::FxKpi
    }

    fn period(&self) -> Option<Duration> {
        Some(self.period)
    }

    async fn refresh(&self) {
        // Les deux requêtes partent ensemble
        let (usd, eur) = tokio::join!(
            self.source.fetch_one(CurrencyCode::USD, CurrencyCode::MYR),
            self.source.fetch_one(CurrencyCode::EUR, CurrencyCode::MYR),
        );
        debug!(?usd, ?eur, "FX KPI fetched");

        let updated = updated_label(Local::now());
        let mut board = lock_board(&self.board);
        board.set_text(ids::KPI_USDMYR, format_rate_2dp(usd));
        board.set_text(ids::KPI_EURMYR, format_rate_2dp(eur));
        board.set_text(ids::KPI_USDMYR_UPD, updated.clone());
        board.set_text(ids::KPI_EURMYR_UPD, updated);
    }
}

// ============================================================================
// KPI macro simulés
// ============================================================================

/// Un tirage des indicateurs macro, en %
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroReading {
    pub gdp_growth: f64,
    pub inflation: f64,
}

/// Tire des valeurs plausibles : PIB et inflation dans [1, 5)
///
/// CONCEPT RUST : Generics sur Rng
/// - En prod : thread_rng()
/// - En test : un StdRng seedé, donc déterministe
pub fn simulate_macro<R: Rng>(rng: &mut R) -> MacroReading {
    MacroReading {
        gdp_growth: rng.gen_range(1.0..5.0),
        inflation: rng.gen_range(1.0..5.0),
    }
}

/// "2.35%"
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub struct MacroKpiWidget {
    board: SharedBoard,
    period: Duration,
}

impl MacroKpiWidget {
    pub fn new(board: SharedBoard, period: Duration) -> Self {
        Self { board, period }
    }
}

#[async_trait]
impl Widget for MacroKpiWidget {
    fn id(&self) -> WidgetId {
        WidgetId::MacroKpi
    }

    fn period(&self) -> Option<Duration> {
        Some(self.period)
    }

    async fn refresh(&self) {
        let reading = simulate_macro(&mut rand::thread_rng());

        let updated = updated_label(Local::now());
        let mut board = lock_board(&self.board);
        board.set_text(ids::KPI_GDP, format_percent(reading.gdp_growth));
        board.set_text(ids::KPI_CPI, format_percent(reading.inflation));
        board.set_text(ids::KPI_GDP_UPD, updated.clone());
        board.set_text(ids::KPI_CPI_UPD, updated);
    }
}
