// ============================================================================
// Tests d'intégration : widgets contre des sources scriptées
// ============================================================================
// Les sources factices répondent des valeurs fixes et comptent leurs appels,
// ce qui permet de vérifier les cas où aucune requête ne doit partir.
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use lazyfx::api::{HistoryError, LatestRates, RangeRates, RateSource, ReferenceSource};
use lazyfx::board::{ids, lock_board, Board, Panel, SharedBoard};
use lazyfx::models::{ChartData, ChartKind, CurrencyCode};
use lazyfx::refresh::Widget;
use lazyfx::widgets::converter::{swap_currencies, PLACEHOLDER};
use lazyfx::widgets::history_chart::SAME_CURRENCY_MESSAGE;
use lazyfx::widgets::history_table::TABLE_CAPACITY;
use lazyfx::widgets::rates_grid::LOAD_FAILED;
use lazyfx::widgets::trend_chart::TREND_UNAVAILABLE;
use lazyfx::widgets::{
    ConverterWidget, CurrencyListWidget, FxKpiWidget, HistoryChartWidget, HistoryTableWidget,
    PairsChartWidget, RatesGridWidget, TrendChartWidget,
};

// ============================================================================
// Sources factices
// ============================================================================

/// RateSource qui répond toujours `rate`
struct ScriptedRates {
    rate: Option<f64>,
    calls: AtomicUsize,
}

impl ScriptedRates {
    fn new(rate: Option<f64>) -> Arc<Self> {
        Arc::new(Self {
            rate,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for ScriptedRates {
    async fn fetch_one(&self, _base: CurrencyCode, _quote: CurrencyCode) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate
    }

    async fn fetch_multi(
        &self,
        _base: CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> HashMap<CurrencyCode, Option<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        quotes.iter().map(|q| (*q, self.rate)).collect()
    }

    async fn fetch_historical_day(
        &self,
        _date: NaiveDate,
        _base: CurrencyCode,
        _quote: CurrencyCode,
    ) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate
    }
}

/// ReferenceSource avec une plage et des derniers taux préparés
struct ScriptedReference {
    range: Result<RangeRates, HistoryError>,
    latest: Option<LatestRates>,
    currencies: Option<BTreeMap<CurrencyCode, String>>,
    calls: AtomicUsize,
}

impl ScriptedReference {
    fn with_range(range: Result<RangeRates, HistoryError>) -> Arc<Self> {
        Arc::new(Self {
            range,
            latest: None,
            currencies: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceSource for ScriptedReference {
    async fn list_currencies(&self) -> Option<BTreeMap<CurrencyCode, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.currencies.clone()
    }

    async fn latest_all(&self, _base: CurrencyCode) -> Option<LatestRates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.latest.clone()
    }

    async fn fetch_range(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _base: CurrencyCode,
        _quote: CurrencyCode,
    ) -> Result<RangeRates, HistoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.range.clone()
    }
}

fn board() -> SharedBoard {
    Board::with_defaults().shared()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

const PERIOD: Duration = Duration::from_secs(60);

// ============================================================================
// Convertisseur
// ============================================================================

#[tokio::test]
async fn test_converter_renders_result() {
    let source = ScriptedRates::new(Some(0.90));
    let board = board();
    {
        let mut b = lock_board(&board);
        b.set_input(ids::FROM_AMOUNT, "100");
        b.set_currency(ids::FROM_CURRENCY, CurrencyCode::USD);
        b.set_currency(ids::TO_CURRENCY, CurrencyCode::EUR);
    }

    ConverterWidget::new(source.clone(), board.clone()).refresh().await;

    let b = lock_board(&board);
    assert_eq!(b.input(ids::TO_AMOUNT), "90.00");
    match b.panel(ids::RESULT) {
        Some(Panel::Conversion(view)) => {
            assert_eq!(view.headline, "90.00 EUR");
            assert_eq!(view.detail, "100 USD = 90.00 EUR");
            assert_eq!(view.rate_line, "1 USD = 0.9000 EUR");
        }
        other => panic!("unexpected panel: {:?}", other),
    }
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_converter_empty_amount_shows_placeholder_without_fetch() {
    let source = ScriptedRates::new(Some(0.90));
    let board = board();

    ConverterWidget::new(source.clone(), board.clone()).refresh().await;

    let b = lock_board(&board);
    assert_eq!(b.input(ids::TO_AMOUNT), "");
    assert_eq!(b.panel(ids::RESULT), Some(&Panel::Message(PLACEHOLDER.to_string())));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_converter_identity_pair_skips_network() {
    let source = ScriptedRates::new(None);
    let board = board();
    {
        let mut b = lock_board(&board);
        b.set_input(ids::FROM_AMOUNT, "42");
        b.set_currency(ids::FROM_CURRENCY, CurrencyCode::MYR);
        b.set_currency(ids::TO_CURRENCY, CurrencyCode::MYR);
    }

    ConverterWidget::new(source.clone(), board.clone()).refresh().await;

    assert_eq!(lock_board(&board).input(ids::TO_AMOUNT), "42.00");
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_converter_failure_shows_error() {
    let source = ScriptedRates::new(None);
    let board = board();
    lock_board(&board).set_input(ids::FROM_AMOUNT, "10");

    ConverterWidget::new(source, board.clone()).refresh().await;

    let b = lock_board(&board);
    assert_eq!(b.input(ids::TO_AMOUNT), "");
    assert!(matches!(b.panel(ids::RESULT), Some(Panel::Error(_))));
}

#[tokio::test]
async fn test_swap_then_convert_uses_new_direction() {
    let source = ScriptedRates::new(Some(0.25));
    let board = board();
    {
        let mut b = lock_board(&board);
        b.set_input(ids::FROM_AMOUNT, "8");
        swap_currencies(&mut b);
    }

    ConverterWidget::new(source, board.clone()).refresh().await;

    match lock_board(&board).panel(ids::RESULT) {
        Some(Panel::Conversion(view)) => assert_eq!(view.detail, "8 EUR = 2.00 MYR"),
        other => panic!("unexpected panel: {:?}", other),
    };
}

// ============================================================================
// Graphique historique
// ============================================================================

#[tokio::test]
async fn test_history_chart_same_currency_makes_no_request() {
    let reference = ScriptedReference::with_range(Err(HistoryError::Empty));
    let board = board();
    lock_board(&board).set_currency(ids::CHART_TARGET_CURRENCY, CurrencyCode::MYR);

    HistoryChartWidget::new(reference.clone(), board.clone())
        .refresh_ending(day(10))
        .await;

    assert_eq!(
        lock_board(&board).panel(ids::CHART_CONTAINER),
        Some(&Panel::Error(SAME_CURRENCY_MESSAGE.to_string()))
    );
    assert_eq!(reference.calls(), 0);
}

#[tokio::test]
async fn test_history_chart_empty_range_shows_error() {
    let reference = ScriptedReference::with_range(Err(HistoryError::Empty));
    let board = board();

    HistoryChartWidget::new(reference.clone(), board.clone())
        .refresh_ending(day(10))
        .await;

    let b = lock_board(&board);
    match b.panel(ids::CHART_CONTAINER) {
        Some(Panel::Error(message)) => {
            assert!(message.contains("No data available for the selected time period."))
        }
        other => panic!("unexpected panel: {:?}", other),
    }
    assert_eq!(b.live_chart_count(), 0);
    assert_eq!(reference.calls(), 1);
}

#[tokio::test]
async fn test_history_chart_renders_candles_with_stats() {
    let range: RangeRates = BTreeMap::from([
        (day(1), Some(0.21)),
        (day(2), None),
        (day(3), Some(0.22)),
        (day(6), Some(0.20)),
    ]);
    let reference = ScriptedReference::with_range(Ok(range));
    let board = board();
    lock_board(&board).set_input(ids::CHART_TYPE, ChartKind::Candlestick.label());

    let widget = HistoryChartWidget::new(reference, board.clone());
    widget.refresh_ending(day(7)).await;
    widget.refresh_ending(day(7)).await;

    let b = lock_board(&board);
    assert_eq!(b.live_chart_count(), 1);

    let (config, stats) = b.chart_in(ids::CHART_CONTAINER).unwrap();
    assert_eq!(config.kind, ChartKind::Candlestick);
    assert_eq!(config.labels, vec!["2024-05-01", "2024-05-03", "2024-05-06"]);
    match &config.datasets[0].data {
        ChartData::Candles(candles) => {
            assert_eq!(candles.len(), 3);
            assert_eq!(candles[1].open, 0.21);
            assert_eq!(candles[1].close, 0.22);
        }
        other => panic!("unexpected data: {:?}", other),
    }

    let stats = stats.unwrap();
    assert_eq!(stats.current, 0.20);
    assert_eq!(stats.high, 0.22);
    assert_eq!(stats.low, 0.20);
}

// ============================================================================
// Tableau, graphiques du dashboard, KPI
// ============================================================================

#[tokio::test]
async fn test_history_table_keeps_latest_rows() {
    let source = ScriptedRates::new(Some(4.7));
    let board = board();
    let widget = HistoryTableWidget::new(source.clone(), board.clone(), PERIOD);

    for _ in 0..TABLE_CAPACITY + 1 {
        widget.refresh().await;
    }

    match lock_board(&board).panel(ids::EXCHANGE_TABLE) {
        Some(Panel::Table(rows)) => {
            assert_eq!(rows.len(), TABLE_CAPACITY);
            assert!(rows.iter().all(|r| r.base == "USD" && r.target == "MYR" && r.rate == "4.7000"));
        }
        other => panic!("unexpected panel: {:?}", other),
    }
    assert_eq!(source.calls(), TABLE_CAPACITY + 1);
}

#[tokio::test]
async fn test_history_table_same_pair_alerts_without_request() {
    let source = ScriptedRates::new(Some(1.0));
    let board = board();
    lock_board(&board).set_currency(ids::TARGET_CURRENCY, CurrencyCode::USD);

    HistoryTableWidget::new(source.clone(), board.clone(), PERIOD)
        .refresh()
        .await;

    let b = lock_board(&board);
    assert!(b.alert().is_some());
    assert_eq!(b.panel(ids::EXCHANGE_TABLE), Some(&Panel::Message("No data".to_string())));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_trend_chart_rerender_keeps_one_instance() {
    let source = ScriptedRates::new(Some(4.7));
    let board = board();
    let widget = TrendChartWidget::new(source.clone(), board.clone(), PERIOD);

    widget.refresh().await;
    widget.refresh().await;
    widget.refresh().await;

    assert_eq!(lock_board(&board).live_chart_count(), 1);
    assert_eq!(source.calls(), 3 * 14);

    widget.dispose();
    assert_eq!(lock_board(&board).live_chart_count(), 0);
}

#[tokio::test]
async fn test_trend_chart_all_days_unavailable_shows_error() {
    let source = ScriptedRates::new(None);
    let board = board();

    TrendChartWidget::new(source.clone(), board.clone(), PERIOD).refresh().await;

    let b = lock_board(&board);
    assert_eq!(
        b.panel(ids::LINE_CHART),
        Some(&Panel::Error(TREND_UNAVAILABLE.to_string()))
    );
    assert_eq!(b.live_chart_count(), 0);
    assert_eq!(source.calls(), 14);
}

#[tokio::test]
async fn test_pairs_chart_with_unavailable_rates_still_renders() {
    let source = ScriptedRates::new(None);
    let board = board();

    PairsChartWidget::new(source, board.clone(), PERIOD).refresh().await;

    let b = lock_board(&board);
    let (config, _) = b.chart_in(ids::BAR_CHART).unwrap();
    assert_eq!(config.kind, ChartKind::Bar);
    assert_eq!(config.datasets[0].data, ChartData::Values(vec![None; 6]));
}

#[tokio::test]
async fn test_fx_kpi_shows_na_when_unavailable() {
    let source = ScriptedRates::new(None);
    let board = board();

    FxKpiWidget::new(source.clone(), board.clone(), PERIOD).refresh().await;

    let b = lock_board(&board);
    assert_eq!(b.text(ids::KPI_USDMYR), Some("N/A"));
    assert_eq!(b.text(ids::KPI_EURMYR), Some("N/A"));
    assert!(b.text(ids::KPI_USDMYR_UPD).unwrap().starts_with("Updated: "));
    assert_eq!(source.calls(), 2);
}

// ============================================================================
// Données de référence
// ============================================================================

#[tokio::test]
async fn test_rates_grid_failure_shows_error() {
    let reference = ScriptedReference::with_range(Err(HistoryError::Empty));
    let board = board();

    RatesGridWidget::new(reference, board.clone(), PERIOD).refresh().await;

    assert_eq!(
        lock_board(&board).panel(ids::RATES_CONTAINER),
        Some(&Panel::Error(LOAD_FAILED.to_string()))
    );
}

#[tokio::test]
async fn test_rates_grid_renders_cards() {
    let reference = Arc::new(ScriptedReference {
        range: Err(HistoryError::Empty),
        latest: Some(LatestRates {
            base: CurrencyCode::MYR,
            date: day(3),
            rates: BTreeMap::from([(CurrencyCode::USD, 0.2125), (CurrencyCode::EUR, 0.19)]),
        }),
        currencies: None,
        calls: AtomicUsize::new(0),
    });
    let board = board();

    RatesGridWidget::new(reference, board.clone(), PERIOD).refresh().await;

    let b = lock_board(&board);
    match b.panel(ids::RATES_CONTAINER) {
        Some(Panel::Rates(cards)) => {
            let codes: Vec<&str> = cards.iter().map(|c| c.code.as_str()).collect();
            assert_eq!(codes, vec!["EUR", "USD"]);
            assert_eq!(cards[1].value, "0.2125");
        }
        other => panic!("unexpected panel: {:?}", other),
    }
    assert_eq!(b.text(ids::LAST_UPDATED), Some("Last updated: 2024-05-03"));
}

#[tokio::test]
async fn test_currency_list_fills_catalogue() {
    let reference = Arc::new(ScriptedReference {
        range: Err(HistoryError::Empty),
        latest: None,
        currencies: Some(BTreeMap::from([(CurrencyCode::EUR, "Euro".to_string())])),
        calls: AtomicUsize::new(0),
    });
    let board = board();

    CurrencyListWidget::new(reference, board.clone()).refresh().await;

    assert_eq!(lock_board(&board).currency_label(CurrencyCode::EUR), "EUR - Euro");
}
