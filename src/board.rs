// ============================================================================
// Board : la surface d'affichage partagée
// ============================================================================
// Chaque élément affichable est adressé par un identifiant stable (ids::*) :
// - inputs  : valeurs saisies (devises sélectionnées, montant)
// - texts   : textes courts (KPI, "Updated: ...", montant converti)
// - panels  : contenus riches (résultat, graphique, grille, tableau)
// - charts  : registre des instances de graphique montées
//
// Les widgets écrivent dans le board, l'UI ne fait que le lire.
//
// CONCEPTS RUST :
// 1. Arc<Mutex<Board>> : un seul écrivain à la fois, verrou jamais gardé
//    à travers un .await
// 2. HashMap<&'static str, _> : les identifiants sont des constantes
// 3. Newtype ChartHandle : on ne confond pas un handle avec un entier
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::models::{ChartConfig, ChartKind, ChartStats, CurrencyCode};

/// Identifiants des éléments du board
pub mod ids {
    // KPI
    pub const KPI_USDMYR: &str = "kpi-usdmyr";
    pub const KPI_USDMYR_UPD: &str = "kpi-usdmyr-upd";
    pub const KPI_EURMYR: &str = "kpi-eurmyr";
    pub const KPI_EURMYR_UPD: &str = "kpi-eurmyr-upd";
    pub const KPI_GDP: &str = "kpi-gdp";
    pub const KPI_GDP_UPD: &str = "kpi-gdp-upd";
    pub const KPI_CPI: &str = "kpi-cpi";
    pub const KPI_CPI_UPD: &str = "kpi-cpi-upd";

    // Graphiques du dashboard
    pub const LINE_CHART: &str = "lineChart";
    pub const BAR_CHART: &str = "barChart";

    // Tableau d'historique
    pub const BASE_CURRENCY: &str = "baseCurrency";
    pub const TARGET_CURRENCY: &str = "targetCurrency";
    pub const EXCHANGE_TABLE: &str = "exchangeTable";

    // Convertisseur
    pub const FROM_AMOUNT: &str = "fromAmount";
    pub const FROM_CURRENCY: &str = "fromCurrency";
    pub const TO_CURRENCY: &str = "toCurrency";
    pub const TO_AMOUNT: &str = "toAmount";
    pub const RESULT: &str = "result";

    // Graphique historique
    pub const CHART_BASE_CURRENCY: &str = "chartBaseCurrency";
    pub const CHART_TARGET_CURRENCY: &str = "chartTargetCurrency";
    pub const CHART_CONTAINER: &str = "chartContainer";

    // Boutons du graphique historique (type et période actifs)
    pub const CHART_TYPE: &str = "chartType";
    pub const CHART_PERIOD: &str = "chartPeriod";

    // Derniers taux
    pub const RATES_CONTAINER: &str = "ratesContainer";
    pub const LAST_UPDATED: &str = "lastUpdated";
}

/// Handle d'une instance de graphique montée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(u64);

/// Résultat affiché par le convertisseur
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionView {
    /// "90.00 EUR"
    pub headline: String,
    /// "100 USD = 90.00 EUR"
    pub detail: String,
    /// "1 USD = 0.9000 EUR"
    pub rate_line: String,
}

/// Une ligne du tableau d'historique
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub timestamp: String,
    pub base: String,
    pub target: String,
    pub rate: String,
}

/// Une carte de la grille des derniers taux
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    pub code: String,
    pub value: String,
}

/// Contenu riche d'un élément du board
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// Texte neutre (placeholder, "No data")
    Message(String),
    /// Chargement en cours
    Loading(String),
    /// Erreur visible
    Error(String),
    Conversion(ConversionView),
    /// Graphique monté, avec les stats éventuelles affichées en dessous
    Chart {
        handle: ChartHandle,
        stats: Option<ChartStats>,
    },
    Rates(Vec<RateCard>),
    Table(Vec<TableRow>),
}

/// État d'affichage complet
#[derive(Debug, Default)]
pub struct Board {
    inputs: HashMap<&'static str, String>,
    texts: HashMap<&'static str, String>,
    panels: HashMap<&'static str, Panel>,
    charts: BTreeMap<ChartHandle, ChartConfig>,
    next_handle: u64,
    currencies: BTreeMap<CurrencyCode, String>,
    alert: Option<String>,
}

/// Board partagé entre le worker et l'UI
pub type SharedBoard = Arc<Mutex<Board>>;

/// Verrouille le board, même si un autre thread a paniqué en le tenant
///
/// CONCEPT RUST : PoisonError
/// - Un Mutex est "empoisonné" si un thread panique pendant le lock
/// - into_inner() récupère quand même le guard : le board reste affichable
pub fn lock_board(board: &SharedBoard) -> MutexGuard<'_, Board> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Board {
    /// Board vide, sans aucune sélection
    pub fn new() -> Self {
        Self::default()
    }

    /// Board avec les sélections et le placeholder par défaut
    pub fn with_defaults() -> Self {
        let mut board = Self::new();

        board.set_currency(ids::FROM_CURRENCY, CurrencyCode::MYR);
        board.set_currency(ids::TO_CURRENCY, CurrencyCode::EUR);
        board.set_currency(ids::CHART_BASE_CURRENCY, CurrencyCode::MYR);
        board.set_currency(ids::CHART_TARGET_CURRENCY, CurrencyCode::USD);
        board.set_currency(ids::BASE_CURRENCY, CurrencyCode::USD);
        board.set_currency(ids::TARGET_CURRENCY, CurrencyCode::MYR);
        board.set_input(ids::FROM_AMOUNT, "");
        board.set_input(ids::CHART_TYPE, ChartKind::default().label());
        board.set_input(ids::CHART_PERIOD, "7");

        board.set_panel(ids::EXCHANGE_TABLE, Panel::Message("No data".to_string()));

        board
    }

    /// Enveloppe le board dans un Arc<Mutex<>>
    pub fn shared(self) -> SharedBoard {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn input(&self, id: &str) -> &str {
        self.inputs.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn set_input(&mut self, id: &'static str, value: impl Into<String>) {
        self.inputs.insert(id, value.into());
    }

    /// Devise sélectionnée dans un select, None si vide ou invalide
    pub fn currency(&self, id: &str) -> Option<CurrencyCode> {
        self.input(id).parse().ok()
    }

    pub fn set_currency(&mut self, id: &'static str, code: CurrencyCode) {
        self.set_input(id, code.as_str());
    }

    /// Échange les valeurs de deux inputs
    pub fn swap_inputs(&mut self, a: &'static str, b: &'static str) {
        let first = self.inputs.remove(a).unwrap_or_default();
        let second = self.inputs.remove(b).unwrap_or_default();
        self.inputs.insert(a, second);
        self.inputs.insert(b, first);
    }

    // ------------------------------------------------------------------
    // Textes
    // ------------------------------------------------------------------

    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }

    pub fn set_text(&mut self, id: &'static str, value: impl Into<String>) {
        let value = value.into();
        trace!(id, value = %value, "Board text updated");
        self.texts.insert(id, value);
    }

    pub fn clear_text(&mut self, id: &str) {
        self.texts.remove(id);
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn set_panel(&mut self, id: &'static str, panel: Panel) {
        self.panels.insert(id, panel);
    }

    // ------------------------------------------------------------------
    // Registre des graphiques
    // ------------------------------------------------------------------

    /// Monte un graphique dans l'élément `target` et retourne son handle
    ///
    /// Ne détruit PAS l'instance précédente : c'est le rôle de ChartSlot.
    pub fn mount_chart(
        &mut self,
        target: &'static str,
        config: ChartConfig,
        stats: Option<ChartStats>,
    ) -> ChartHandle {
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);

        debug!(element = target, kind = config.kind.label(), handle = handle.0, "Chart mounted");
        self.charts.insert(handle, config);
        self.panels.insert(target, Panel::Chart { handle, stats });
        handle
    }

    /// Détruit une instance ; retourne false si elle n'existait plus
    pub fn destroy_chart(&mut self, handle: ChartHandle) -> bool {
        let removed = self.charts.remove(&handle).is_some();
        if removed {
            debug!(handle = handle.0, "Chart destroyed");
        }
        removed
    }

    pub fn chart(&self, handle: ChartHandle) -> Option<&ChartConfig> {
        self.charts.get(&handle)
    }

    /// Graphique actuellement affiché dans `target`, avec ses stats
    pub fn chart_in(&self, target: &str) -> Option<(&ChartConfig, Option<&ChartStats>)> {
        match self.panels.get(target)? {
            Panel::Chart { handle, stats } => Some((self.charts.get(handle)?, stats.as_ref())),
            _ => None,
        }
    }

    pub fn live_chart_count(&self) -> usize {
        self.charts.len()
    }

    // ------------------------------------------------------------------
    // Alerte (message bloquant côté navigateur, barre de statut ici)
    // ------------------------------------------------------------------

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    // ------------------------------------------------------------------
    // Catalogue des devises
    // ------------------------------------------------------------------

    pub fn currencies(&self) -> &BTreeMap<CurrencyCode, String> {
        &self.currencies
    }

    pub fn set_currencies(&mut self, currencies: BTreeMap<CurrencyCode, String>) {
        self.currencies = currencies;
    }

    /// Libellé d'option d'un select : "EUR - Euro"
    pub fn currency_label(&self, code: CurrencyCode) -> String {
        match self.currencies.get(&code) {
            Some(name) => format!("{} - {}", code, name),
            None => code.to_string(),
        }
    }

    /// Devise voisine dans le catalogue (ou dans la liste de repli si le
    /// catalogue n'est pas encore chargé), en bouclant
    pub fn cycle_currency(&mut self, id: &'static str, forward: bool) -> Option<CurrencyCode> {
        let codes: Vec<CurrencyCode> = if self.currencies.is_empty() {
            FALLBACK_CURRENCIES.to_vec()
        } else {
            self.currencies.keys().copied().collect()
        };

        let current = self.currency(id);
        let position = current.and_then(|c| codes.iter().position(|x| *x == c));
        let len = codes.len();
        if len == 0 {
            return None;
        }

        let next_index = match (position, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };

        let next = codes[next_index];
        self.set_currency(id, next);
        Some(next)
    }
}

/// Devises proposées tant que /currencies n'a pas répondu
pub const FALLBACK_CURRENCIES: [CurrencyCode; 7] = [
    CurrencyCode::AUD,
    CurrencyCode::EUR,
    CurrencyCode::GBP,
    CurrencyCode::JPY,
    CurrencyCode::MYR,
    CurrencyCode::SGD,
    CurrencyCode::USD,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let board = Board::with_defaults();
        assert_eq!(board.currency(ids::FROM_CURRENCY), Some(CurrencyCode::MYR));
        assert_eq!(board.currency(ids::TO_CURRENCY), Some(CurrencyCode::EUR));
        assert_eq!(board.currency(ids::CHART_BASE_CURRENCY), Some(CurrencyCode::MYR));
        assert_eq!(board.currency(ids::CHART_TARGET_CURRENCY), Some(CurrencyCode::USD));
        assert_eq!(board.currency(ids::BASE_CURRENCY), Some(CurrencyCode::USD));
        assert_eq!(board.currency(ids::TARGET_CURRENCY), Some(CurrencyCode::MYR));
        assert_eq!(board.input(ids::FROM_AMOUNT), "");
        assert_eq!(
            board.panel(ids::EXCHANGE_TABLE),
            Some(&Panel::Message("No data".to_string()))
        );
    }

    #[test]
    fn test_swap_inputs() {
        let mut board = Board::with_defaults();
        board.swap_inputs(ids::FROM_CURRENCY, ids::TO_CURRENCY);
        assert_eq!(board.currency(ids::FROM_CURRENCY), Some(CurrencyCode::EUR));
        assert_eq!(board.currency(ids::TO_CURRENCY), Some(CurrencyCode::MYR));
    }

    #[test]
    fn test_mount_and_destroy_chart() {
        let mut board = Board::new();
        let first = board.mount_chart(ids::LINE_CHART, ChartConfig::new(ChartKind::Line, vec![]), None);
        let second = board.mount_chart(ids::BAR_CHART, ChartConfig::new(ChartKind::Bar, vec![]), None);

        assert_ne!(first, second);
        assert_eq!(board.live_chart_count(), 2);
        assert!(board.chart_in(ids::BAR_CHART).is_some());

        assert!(board.destroy_chart(first));
        assert!(!board.destroy_chart(first));
        assert_eq!(board.live_chart_count(), 1);
        assert!(board.chart_in(ids::LINE_CHART).is_none());
    }

    #[test]
    fn test_cycle_currency_wraps() {
        let mut board = Board::with_defaults();
        board.set_currency(ids::FROM_CURRENCY, CurrencyCode::USD);

        assert_eq!(board.cycle_currency(ids::FROM_CURRENCY, true), Some(CurrencyCode::AUD));
        assert_eq!(board.cycle_currency(ids::FROM_CURRENCY, false), Some(CurrencyCode::USD));
    }

    #[test]
    fn test_currency_label_uses_catalogue() {
        let mut board = Board::new();
        assert_eq!(board.currency_label(CurrencyCode::EUR), "EUR");

        board.set_currencies(BTreeMap::from([(CurrencyCode::EUR, "Euro".to_string())]));
        assert_eq!(board.currency_label(CurrencyCode::EUR), "EUR - Euro");
    }
}
