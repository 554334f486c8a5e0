// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod chart;    // Contrat du renderer (ChartConfig, datasets, stats)
pub mod currency; // Code devise validé (CurrencyCode)
pub mod history;  // Ring buffer borné (HistoryBuffer)
pub mod map;      // Marqueurs statiques de la carte
pub mod rate;     // RatePoint, RateSeries, PairSnapshot

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyfx::models::currency::CurrencyCode;
// On peut faire : use lazyfx::models::CurrencyCode;
pub use chart::{Candle, ChartConfig, ChartData, ChartDataset, ChartKind, ChartStats, DatasetStyle};
pub use currency::{CurrencyCode, InvalidCurrencyCode};
pub use history::HistoryBuffer;
pub use map::{MapMarker, MARKERS};
pub use rate::{PairSnapshot, RatePoint, RateSeries};
