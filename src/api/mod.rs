// ============================================================================
// Module : api
// ============================================================================
// Rate Client : une interface uniforme au-dessus des APIs de taux de change
//
// CONCEPTS RUST :
// 1. Traits async (async-trait) : même signature pour FastForex et Frankfurter
// 2. Option comme sentinelle : None = "indisponible", jamais de panic ni d'erreur
//    propagée au-delà du client
// 3. Trait objects (&dyn RateSource) : les widgets ne connaissent pas le fournisseur
// ============================================================================

pub mod fastforex;   // Client FastForex (clé API)
pub mod frankfurter; // Client Frankfurter (sans clé, + endpoints de référence)
pub mod http;        // Helpers HTTP partagés

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::models::CurrencyCode;

pub use fastforex::FastForexClient;
pub use frankfurter::FrankfurterClient;

// ============================================================================
// Trait RateSource : les trois opérations du Rate Client
// ============================================================================

/// Source de taux de change
///
/// Chaque méthode fait exactement une requête HTTP, sans retry ni cache.
/// Toute erreur (réseau, HTTP non-2xx, champ manquant) est loggée puis
/// convertie en `None` : l'appelant ne voit que l'absence de valeur.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Taux base → quote. N'effectue PAS le raccourci base == quote
    /// (voir [`pair_rate`]).
    async fn fetch_one(&self, base: CurrencyCode, quote: CurrencyCode) -> Option<f64>;

    /// Plusieurs quotes en une requête. Chaque quote demandée est présente
    /// dans la map ; une entrée absente de la réponse vaut None.
    async fn fetch_multi(
        &self,
        base: CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> HashMap<CurrencyCode, Option<f64>>;

    /// Taux base → quote à une date donnée
    async fn fetch_historical_day(
        &self,
        date: NaiveDate,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Option<f64>;
}

/// Taux d'une paire avec raccourci identité
///
/// CONCEPT : Invariant base ≠ quote
/// - USD → USD vaut toujours 1.0
/// - Aucune requête réseau dans ce cas
pub async fn pair_rate(
    source: &dyn RateSource,
    base: CurrencyCode,
    quote: CurrencyCode,
) -> Option<f64> {
    if base == quote {
        debug!(currency = %base, "Identity pair, skipping network call");
        return Some(1.0);
    }
    source.fetch_one(base, quote).await
}

// ============================================================================
// Trait ReferenceSource : endpoints de référence (Frankfurter)
// ============================================================================

/// Derniers taux publiés pour une devise de base
#[derive(Debug, Clone, PartialEq)]
pub struct LatestRates {
    pub base: CurrencyCode,
    pub date: NaiveDate,
    pub rates: BTreeMap<CurrencyCode, f64>,
}

/// Erreur d'un fetch de plage historique
///
/// Contrairement au RateSource, le graphique historique doit afficher un
/// message différent selon la cause : on garde donc une erreur typée.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("No historical data available for this period")]
    Empty,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Taux journaliers d'une plage ; None si la date existe sans la quote demandée
pub type RangeRates = BTreeMap<NaiveDate, Option<f64>>;

#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Code → nom affichable ("EUR" → "Euro")
    async fn list_currencies(&self) -> Option<BTreeMap<CurrencyCode, String>>;

    /// Tous les derniers taux pour `base`
    async fn latest_all(&self, base: CurrencyCode) -> Option<LatestRates>;

    /// Taux journaliers entre `start` et `end` inclus
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Result<RangeRates, HistoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source qui compte les appels et répond toujours 0.9
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for CountingSource {
        async fn fetch_one(&self, _base: CurrencyCode, _quote: CurrencyCode) -> Option<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(0.9)
        }

        async fn fetch_multi(
            &self,
            _base: CurrencyCode,
            quotes: &[CurrencyCode],
        ) -> HashMap<CurrencyCode, Option<f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            quotes.iter().map(|q| (*q, Some(0.9))).collect()
        }

        async fn fetch_historical_day(
            &self,
            _date: NaiveDate,
            _base: CurrencyCode,
            _quote: CurrencyCode,
        ) -> Option<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(0.9)
        }
    }

    #[tokio::test]
    async fn test_identity_pair_skips_network() {
        let source = CountingSource { calls: AtomicUsize::new(0) };

        for code in [CurrencyCode::USD, CurrencyCode::MYR, CurrencyCode::JPY] {
            assert_eq!(pair_rate(&source, code, code).await, Some(1.0));
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        assert_eq!(pair_rate(&source, CurrencyCode::USD, CurrencyCode::EUR).await, Some(0.9));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_history_error_messages() {
        assert_eq!(HistoryError::Status(404).to_string(), "HTTP error! status: 404");
        assert_eq!(HistoryError::Empty.to_string(), "No historical data available for this period");
    }
}
