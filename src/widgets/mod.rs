// ============================================================================
// Module : widgets
// ============================================================================
// Render Adapters : chaque widget lit ses entrées sur le board, appelle sa
// source de données, transforme le résultat (fonctions pures testables) et
// écrit le rendu sur le board.
//
// CONCEPTS RUST :
// 1. Un struct par widget, qui possède son état (ChartSlot, historique)
// 2. Mutex interne : refresh(&self) peut tourner plusieurs fois en parallèle
// 3. Arc<dyn Trait> : sources et board partagés entre widgets
// ============================================================================

pub mod converter;     // Convertisseur de devises
pub mod currency_list; // Catalogue des devises (options des selects)
pub mod history_chart; // Graphique historique + statistiques
pub mod history_table; // Tableau des 5 dernières observations
pub mod kpi;           // Tuiles KPI (taux + macro simulée)
pub mod pairs_chart;   // Barres des paires majeures
pub mod rates_grid;    // Grille des derniers taux
pub mod trend_chart;   // Courbe USD → MYR sur 14 jours

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::api::{RateSource, ReferenceSource};
use crate::board::{Board, ChartHandle, SharedBoard};
use crate::config::RefreshPeriods;
use crate::models::{ChartConfig, ChartStats};
use crate::refresh::Widget;

pub use converter::ConverterWidget;
pub use currency_list::CurrencyListWidget;
pub use history_chart::HistoryChartWidget;
pub use history_table::HistoryTableWidget;
pub use kpi::{FxKpiWidget, MacroKpiWidget};
pub use pairs_chart::PairsChartWidget;
pub use rates_grid::RatesGridWidget;
pub use trend_chart::TrendChartWidget;

/// Identifiant de chaque widget du dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetId {
    FxKpi,
    MacroKpi,
    TrendChart,
    PairsChart,
    HistoryTable,
    Converter,
    HistoryChart,
    RatesGrid,
    CurrencyList,
}

// ============================================================================
// ChartSlot : une instance de graphique à la fois
// ============================================================================

#[derive(Debug, Default)]
struct SlotState {
    handle: Option<ChartHandle>,
    disposed: bool,
}

/// Emplacement de graphique possédé par un widget
///
/// CONCEPT : Détruire avant de recréer
/// - render() détruit l'instance précédente puis monte la nouvelle
/// - après dispose(), plus aucun montage n'est possible
///
/// Ordre des verrous : toujours le board, puis le slot.
#[derive(Debug)]
pub struct ChartSlot {
    target: &'static str,
    state: Mutex<SlotState>,
}

impl ChartSlot {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            state: Mutex::new(SlotState::default()),
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Remplace le graphique affiché ; None si le slot est disposé
    pub fn render(
        &self,
        board: &mut Board,
        config: ChartConfig,
        stats: Option<ChartStats>,
    ) -> Option<ChartHandle> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.disposed {
            debug!(element = self.target, "Render skipped: slot disposed");
            return None;
        }

        if let Some(previous) = state.handle.take() {
            board.destroy_chart(previous);
        }

        let handle = board.mount_chart(self.target, config, stats);
        state.handle = Some(handle);
        Some(handle)
    }

    /// Détruit le graphique courant sans fermer le slot (état d'erreur)
    pub fn clear(&self, board: &mut Board) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = state.handle.take() {
            board.destroy_chart(previous);
        }
    }

    /// Détruit le graphique courant et ferme le slot
    pub fn dispose(&self, board: &mut Board) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = state.handle.take() {
            board.destroy_chart(previous);
        }
        state.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).disposed
    }
}

// ============================================================================
// Helpers communs
// ============================================================================

/// "Updated: 14:05:09"
pub fn updated_label(at: DateTime<Local>) -> String {
    format!("Updated: {}", at.format("%H:%M:%S"))
}

/// Taux KPI à 2 décimales, "N/A" si indisponible
pub fn format_rate_2dp(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}", rate),
        None => "N/A".to_string(),
    }
}

/// Taux brut à 4 décimales, "N/A" si indisponible
pub fn format_rate_4dp(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.4}", rate),
        None => "N/A".to_string(),
    }
}

// ============================================================================
// Assemblage du dashboard
// ============================================================================

/// Tous les widgets, dans l'ordre de démarrage
pub fn dashboard_widgets(
    rates: Arc<dyn RateSource>,
    reference: Arc<dyn ReferenceSource>,
    board: SharedBoard,
    periods: &RefreshPeriods,
) -> Vec<Arc<dyn Widget>> {
    vec![
        Arc::new(CurrencyListWidget::new(reference.clone(), board.clone())),
        Arc::new(FxKpiWidget::new(rates.clone(), board.clone(), periods.kpi)),
        Arc::new(MacroKpiWidget::new(board.clone(), periods.kpi)),
        Arc::new(TrendChartWidget::new(rates.clone(), board.clone(), periods.trend)),
        Arc::new(PairsChartWidget::new(rates.clone(), board.clone(), periods.pairs)),
        Arc::new(HistoryTableWidget::new(rates.clone(), board.clone(), periods.table)),
        Arc::new(ConverterWidget::new(rates, board.clone())),
        Arc::new(HistoryChartWidget::new(reference.clone(), board.clone())),
        Arc::new(RatesGridWidget::new(reference, board, periods.rates)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ids;
    use crate::models::ChartKind;

    #[test]
    fn test_rerender_keeps_one_live_chart() {
        let mut board = Board::new();
        let slot = ChartSlot::new(ids::LINE_CHART);

        for _ in 0..5 {
            slot.render(&mut board, ChartConfig::new(ChartKind::Line, vec![]), None);
        }
        assert_eq!(board.live_chart_count(), 1);

        slot.clear(&mut board);
        assert_eq!(board.live_chart_count(), 0);
        assert!(slot.render(&mut board, ChartConfig::new(ChartKind::Bar, vec![]), None).is_some());
    }

    #[test]
    fn test_disposed_slot_never_mounts() {
        let mut board = Board::new();
        let slot = ChartSlot::new(ids::BAR_CHART);
        slot.render(&mut board, ChartConfig::new(ChartKind::Bar, vec![]), None);

        slot.dispose(&mut board);
        assert!(slot.is_disposed());
        assert_eq!(board.live_chart_count(), 0);

        assert!(slot.render(&mut board, ChartConfig::new(ChartKind::Bar, vec![]), None).is_none());
        assert_eq!(board.live_chart_count(), 0);
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_rate_2dp(Some(4.7251)), "4.73");
        assert_eq!(format_rate_2dp(None), "N/A");
        assert_eq!(format_rate_4dp(Some(0.9)), "0.9000");
        assert_eq!(format_rate_4dp(None), "N/A");
    }
}
