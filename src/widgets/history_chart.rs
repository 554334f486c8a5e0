// ============================================================================
// Widget : graphique historique avec statistiques
// ============================================================================
// Entrées : chartBaseCurrency, chartTargetCurrency, chartType, chartPeriod
// Sortie  : chartContainer (graphique + stats, chargement ou erreur)
//
// Un fetch en échec ou une plage vide affiche TOUJOURS un panneau d'erreur,
// jamais un graphique vide ou périmé.
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use tracing::{info, warn};

use super::{ChartSlot, WidgetId};
use crate::api::{HistoryError, RangeRates, ReferenceSource};
use crate::board::{ids, lock_board, Board, Panel, SharedBoard};
use crate::models::{
    Candle, ChartConfig, ChartData, ChartKind, ChartStats, CurrencyCode, DatasetStyle,
};
use crate::refresh::Widget;

/// Périodes proposées (en jours)
pub const PERIODS: [u32; 4] = [7, 14, 30, 90];
pub const DEFAULT_PERIOD: u32 = 7;

pub const SAME_CURRENCY_MESSAGE: &str = "Please select different currencies for comparison";
pub const LOADING_MESSAGE: &str = "Loading historical data...";
pub const NO_VALID_POINTS_MESSAGE: &str =
    "No valid data points found for this currency pair and time period.";

const ERROR_PREFIX: &str = "Failed to load historical data. ";

/// Période suivante dans le cycle des boutons (7 → 14 → 30 → 90 → 7)
pub fn next_period(days: u32) -> u32 {
    match PERIODS.iter().position(|p| *p == days) {
        Some(i) => PERIODS[(i + 1) % PERIODS.len()],
        None => DEFAULT_PERIOD,
    }
}

/// Message affiché pour un fetch de plage en échec
pub fn history_error_message(error: &HistoryError) -> String {
    let detail = match error {
        HistoryError::Status(404) => "Historical data not available for this currency pair.",
        HistoryError::Empty => "No data available for the selected time period.",
        _ => "Please check your internet connection and try again.",
    };
    format!("{}{}", ERROR_PREFIX, detail)
}

/// Points exploitables : taux présents et strictement positifs, par date
pub fn valid_points(rates: &RangeRates) -> Vec<(NaiveDate, f64)> {
    rates
        .iter()
        .filter_map(|(date, rate)| match rate {
            Some(rate) if *rate > 0.0 => Some((*date, *rate)),
            _ => None,
        })
        .collect()
}

/// Chandeliers journaliers : open = taux valide précédent (ou le sien pour
/// le premier), close = taux du jour
pub fn derive_candles(points: &[(NaiveDate, f64)]) -> Vec<Candle> {
    let mut previous: Option<f64> = None;
    points
        .iter()
        .map(|(date, close)| {
            let open = previous.unwrap_or(*close);
            previous = Some(*close);
            Candle::from_rates(*date, open, *close)
        })
        .collect()
}

/// Config et stats du graphique ; Err(message) si aucun point exploitable
pub fn history_chart(
    base: CurrencyCode,
    target: CurrencyCode,
    kind: ChartKind,
    days: u32,
    rates: &RangeRates,
) -> Result<(ChartConfig, ChartStats), String> {
    let points = valid_points(rates);
    let values: Vec<f64> = points.iter().map(|(_, rate)| *rate).collect();
    let stats = ChartStats::from_rates(&values).ok_or_else(|| NO_VALID_POINTS_MESSAGE.to_string())?;

    let labels: Vec<String> = points
        .iter()
        .map(|(date, _)| date.format("%Y-%m-%d").to_string())
        .collect();

    let (title, data, style) = match kind {
        ChartKind::Candlestick => (
            format!("{} to {} Exchange Rate - Candlestick ({} days)", base, target, days),
            ChartData::Candles(derive_candles(&points)),
            DatasetStyle::default(),
        ),
        ChartKind::Line | ChartKind::Bar => (
            format!("{} to {} Exchange Rate ({} days)", base, target, days),
            ChartData::Values(values.into_iter().map(Some).collect()),
            DatasetStyle {
                fill: kind == ChartKind::Line,
                tension: 0.4,
                border_width: 3,
                point_radius: if kind == ChartKind::Line { 4 } else { 0 },
                ..DatasetStyle::default()
            },
        ),
    };

    let config = ChartConfig::new(kind, labels)
        .title(title)
        .y_axis_title(format!("Rate ({})", target))
        .legend(false)
        .dataset(format!("{} to {}", base, target), data, style);

    Ok((config, stats))
}

/// Premier et dernier jour de la plage : [fin - days, fin]
pub fn date_range(end: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    (end - ChronoDuration::days(i64::from(days)), end)
}

/// Réglages lus sur le board au moment du rafraîchissement
struct ChartRequest {
    base: CurrencyCode,
    target: CurrencyCode,
    kind: ChartKind,
    days: u32,
}

fn read_request(board: &Board) -> Option<ChartRequest> {
    let kind = ChartKind::from_label(board.input(ids::CHART_TYPE)).unwrap_or_default();
    let days = board
        .input(ids::CHART_PERIOD)
        .parse::<u32>()
        .ok()
        .filter(|d| PERIODS.contains(d))
        .unwrap_or(DEFAULT_PERIOD);

    Some(ChartRequest {
        base: board.currency(ids::CHART_BASE_CURRENCY)?,
        target: board.currency(ids::CHART_TARGET_CURRENCY)?,
        kind,
        days,
    })
}

pub struct HistoryChartWidget {
    reference: Arc<dyn ReferenceSource>,
    board: SharedBoard,
    slot: ChartSlot,
}

impl HistoryChartWidget {
    pub fn new(reference: Arc<dyn ReferenceSource>, board: SharedBoard) -> Self {
        Self {
            reference,
            board,
            slot: ChartSlot::new(ids::CHART_CONTAINER),
        }
    }

    /// Remplace le graphique par un panneau d'erreur
    fn show_error(&self, message: String) {
        let mut board = lock_board(&self.board);
        self.slot.clear(&mut board);
        board.set_panel(ids::CHART_CONTAINER, Panel::Error(message));
    }

    /// Rafraîchit avec une date de fin explicite (aujourd'hui en prod)
    pub async fn refresh_ending(&self, end: NaiveDate) {
        let request = {
            let board = lock_board(&self.board);
            read_request(&board)
        };
        let Some(request) = request else {
            warn!("History chart skipped: no currency selected");
            return;
        };

        if request.base == request.target {
            self.show_error(SAME_CURRENCY_MESSAGE.to_string());
            return;
        }

        {
            let mut board = lock_board(&self.board);
            self.slot.clear(&mut board);
            board.set_panel(ids::CHART_CONTAINER, Panel::Loading(LOADING_MESSAGE.to_string()));
        }

        let (start, end) = date_range(end, request.days);
        let rates = match self
            .reference
            .fetch_range(start, end, request.base, request.target)
            .await
        {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "History chart fetch failed");
                self.show_error(history_error_message(&e));
                return;
            }
        };

        match history_chart(request.base, request.target, request.kind, request.days, &rates) {
            Ok((config, stats)) => {
                info!(
                    base = %request.base,
                    target = %request.target,
                    kind = request.kind.label(),
                    days = request.days,
                    points = rates.len(),
                    "History chart ready"
                );
                let mut board = lock_board(&self.board);
                self.slot.render(&mut board, config, Some(stats));
            }
            Err(message) => self.show_error(message),
        }
    }
}

#[async_trait]
impl Widget for HistoryChartWidget {
    fn id(&self) -> WidgetId {
        WidgetId::HistoryChart
    }

    fn period(&self) -> Option<Duration> {
        None
    }

    async fn refresh(&self) {
        self.refresh_ending(Utc::now().date_naive()).await;
    }

    fn dispose(&self) {
        let mut board = lock_board(&self.board);
        self.slot.dispose(&mut board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_rates() -> RangeRates {
        RangeRates::from([
            (date("2024-04-01"), Some(0.2100)),
            (date("2024-04-02"), None),
            (date("2024-04-03"), Some(0.2150)),
            (date("2024-04-04"), Some(0.0)),
            (date("2024-04-05"), Some(0.2120)),
        ])
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            history_error_message(&HistoryError::Status(404)),
            "Failed to load historical data. Historical data not available for this currency pair."
        );
        assert_eq!(
            history_error_message(&HistoryError::Empty),
            "Failed to load historical data. No data available for the selected time period."
        );
        assert_eq!(
            history_error_message(&HistoryError::Status(500)),
            "Failed to load historical data. Please check your internet connection and try again."
        );
        assert_eq!(
            history_error_message(&HistoryError::Transport("refused".into())),
            "Failed to load historical data. Please check your internet connection and try again."
        );
    }

    #[test]
    fn test_line_chart_drops_invalid_points() {
        let (config, stats) =
            history_chart(CurrencyCode::MYR, CurrencyCode::USD, ChartKind::Line, 7, &sample_rates()).unwrap();

        assert_eq!(config.title.as_deref(), Some("MYR to USD Exchange Rate (7 days)"));
        assert_eq!(config.y_axis_title.as_deref(), Some("Rate (USD)"));
        assert_eq!(config.labels, vec!["2024-04-01", "2024-04-03", "2024-04-05"]);
        assert_eq!(
            config.datasets[0].data,
            ChartData::Values(vec![Some(0.2100), Some(0.2150), Some(0.2120)])
        );
        assert!(config.datasets[0].style.fill);
        assert_eq!(config.datasets[0].style.point_radius, 4);

        assert_eq!(stats.current, 0.2120);
        assert_eq!(stats.high, 0.2150);
        assert_eq!(stats.low, 0.2100);
    }

    #[test]
    fn test_candles_open_on_previous_close() {
        let (config, _) = history_chart(
            CurrencyCode::MYR,
            CurrencyCode::USD,
            ChartKind::Candlestick,
            30,
            &sample_rates(),
        )
        .unwrap();

        assert_eq!(
            config.title.as_deref(),
            Some("MYR to USD Exchange Rate - Candlestick (30 days)")
        );
        let ChartData::Candles(candles) = &config.datasets[0].data else {
            panic!("candles expected");
        };
        assert_eq!(candles.len(), 3);
        assert_eq!((candles[0].open, candles[0].close), (0.2100, 0.2100));
        assert_eq!((candles[1].open, candles[1].close), (0.2100, 0.2150));
        assert!(candles[1].is_bullish());
        assert_eq!((candles[2].open, candles[2].close), (0.2150, 0.2120));
        assert_eq!(candles[2].high, 0.2150);
    }

    #[test]
    fn test_all_invalid_points_is_an_error() {
        let rates = RangeRates::from([(date("2024-04-01"), None), (date("2024-04-02"), Some(0.0))]);
        let result = history_chart(CurrencyCode::MYR, CurrencyCode::USD, ChartKind::Bar, 7, &rates);
        assert_eq!(result.unwrap_err(), NO_VALID_POINTS_MESSAGE);
    }

    #[test]
    fn test_period_cycle_and_range() {
        assert_eq!(next_period(7), 14);
        assert_eq!(next_period(90), 7);
        assert_eq!(next_period(3), DEFAULT_PERIOD);
        assert_eq!(date_range(date("2024-04-08"), 7), (date("2024-04-01"), date("2024-04-08")));
    }
}
