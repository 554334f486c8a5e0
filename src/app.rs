// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de navigation de l'interface (écran, champ actif, carte, quit)
//
// Les DONNÉES affichées vivent dans le Board, partagé avec le worker.
// App ne contient que ce qui appartient à l'utilisateur qui navigue.
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Encapsulation : les champs sont privés, accès via méthodes publiques
// ============================================================================

use crate::board::ids;
use crate::models::map::{DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::models::{MapMarker, MARKERS};
use crate::widgets::WidgetId;

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Représente les différents écrans de l'application
// - Un seul écran actif à la fois, Tab passe au suivant
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// KPI, tendance, paires majeures, tableau d'historique
    Dashboard,

    /// Convertisseur, graphique historique, derniers taux
    Converter,

    /// Carte des devises
    Map,
}

impl Screen {
    /// Écran suivant (Dashboard → Converter → Map → Dashboard)
    pub fn next(&self) -> Screen {
        match self {
            Screen::Dashboard => Screen::Converter,
            Screen::Converter => Screen::Map,
            Screen::Map => Screen::Dashboard,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Converter => "Converter",
            Screen::Map => "Map",
        }
    }

    /// Champs éditables de l'écran, dans l'ordre de navigation ↑/↓
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Screen::Dashboard => &[Field::TableBase, Field::TableTarget],
            Screen::Converter => &[
                Field::Amount,
                Field::FromCurrency,
                Field::ToCurrency,
                Field::ChartBase,
                Field::ChartTarget,
            ],
            Screen::Map => &[],
        }
    }
}

// ============================================================================
// Enum : Field
// ============================================================================

/// Un champ éditable (select de devise ou montant)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TableBase,
    TableTarget,
    Amount,
    FromCurrency,
    ToCurrency,
    ChartBase,
    ChartTarget,
}

impl Field {
    /// Élément du board édité par ce champ
    pub fn element_id(&self) -> &'static str {
        match self {
            Field::TableBase => ids::BASE_CURRENCY,
            Field::TableTarget => ids::TARGET_CURRENCY,
            Field::Amount => ids::FROM_AMOUNT,
            Field::FromCurrency => ids::FROM_CURRENCY,
            Field::ToCurrency => ids::TO_CURRENCY,
            Field::ChartBase => ids::CHART_BASE_CURRENCY,
            Field::ChartTarget => ids::CHART_TARGET_CURRENCY,
        }
    }

    /// Widget à rafraîchir quand la valeur change
    pub fn widget(&self) -> WidgetId {
        match self {
            Field::TableBase | Field::TableTarget => WidgetId::HistoryTable,
            Field::Amount | Field::FromCurrency | Field::ToCurrency => WidgetId::Converter,
            Field::ChartBase | Field::ChartTarget => WidgetId::HistoryChart,
        }
    }

    pub fn is_currency(&self) -> bool {
        !matches!(self, Field::Amount)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::TableBase => "Base",
            Field::TableTarget => "Target",
            Field::Amount => "Amount",
            Field::FromCurrency => "From",
            Field::ToCurrency => "To",
            Field::ChartBase => "Chart base",
            Field::ChartTarget => "Chart target",
        }
    }
}

/// État principal de l'interface
#[derive(Debug)]
pub struct App {
    /// L'application doit-elle continuer à tourner ?
    running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Index du champ actif dans Screen::fields()
    focus_index: usize,

    /// Marqueur mis en évidence sur la carte (None = vue par défaut)
    selected_marker: Option<usize>,

    /// Confirmation de sortie : true si 'q' a été pressé une fois
    ///
    /// CONCEPT : Two-step quit pattern
    /// - Premier 'q' : active confirm_quit
    /// - Second 'q' : quitte réellement
    /// - Autre touche : annule
    confirm_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            focus_index: 0,
            selected_marker: None,
            confirm_quit: false,
        }
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    /// Arrête l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Demande la confirmation de quitter (premier 'q')
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit (toute autre touche)
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Navigation entre écrans et champs
    // ========================================================================

    /// Passe à l'écran suivant ; le focus revient sur le premier champ
    pub fn next_screen(&mut self) {
        self.current_screen = self.current_screen.next();
        self.focus_index = 0;
    }

    /// Champ actif, None sur un écran sans champ
    pub fn focused_field(&self) -> Option<Field> {
        self.current_screen.fields().get(self.focus_index).copied()
    }

    /// Champ suivant, en bouclant
    pub fn focus_next(&mut self) {
        let count = self.current_screen.fields().len();
        if count > 0 {
            self.focus_index = (self.focus_index + 1) % count;
        }
    }

    /// Champ précédent, en bouclant
    ///
    /// CONCEPT RUST : Arithmétique non signée
    /// - usize ne peut pas être négatif : on ajoute count avant de soustraire
    pub fn focus_previous(&mut self) {
        let count = self.current_screen.fields().len();
        if count > 0 {
            self.focus_index = (self.focus_index + count - 1) % count;
        }
    }

    // ========================================================================
    // Carte
    // ========================================================================

    /// Marqueur suivant (le premier si aucun n'est sélectionné)
    pub fn select_next_marker(&mut self) {
        self.selected_marker = Some(match self.selected_marker {
            Some(i) => (i + 1) % MARKERS.len(),
            None => 0,
        });
    }

    /// Marqueur précédent (le dernier si aucun n'est sélectionné)
    pub fn select_previous_marker(&mut self) {
        self.selected_marker = Some(match self.selected_marker {
            Some(i) => (i + MARKERS.len() - 1) % MARKERS.len(),
            None => MARKERS.len() - 1,
        });
    }

    /// Revient à la vue par défaut de la carte
    pub fn reset_map_view(&mut self) {
        self.selected_marker = None;
    }

    pub fn selected_marker_index(&self) -> Option<usize> {
        self.selected_marker
    }

    pub fn selected_marker(&self) -> Option<&'static MapMarker> {
        // &MARKERS est promu en référence 'static (constante sans Drop)
        let markers: &'static [MapMarker] = &MARKERS;
        self.selected_marker.and_then(|i| markers.get(i))
    }

    /// Centre et zoom de la vue : sur le marqueur sélectionné, sinon par défaut
    pub fn map_view(&self) -> ((f64, f64), u8) {
        match self.selected_marker() {
            Some(marker) => (marker.coordinates, DEFAULT_ZOOM + 2),
            None => (DEFAULT_CENTER, DEFAULT_ZOOM),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
