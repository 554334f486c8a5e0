// ============================================================================
// Structures : RatePoint, RateSeries, PairSnapshot
// ============================================================================
// Les valeurs produites par le Rate Client et le Series Builder
//
// CONCEPTS RUST :
// 1. Option<f64> : un taux absent n'est JAMAIS converti en 0.0
// 2. NaiveDate : date calendaire sans fuseau (YYYY-MM-DD)
// 3. Vec ordonné : l'index correspond au décalage calendaire
// ============================================================================

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::CurrencyCode;

/// Un point de la série : une date et un taux (ou rien si le fetch a échoué)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Date calendaire (sérialisée en ISO 8601 : "2024-05-01")
    pub date: NaiveDate,

    /// Taux du jour, None = indisponible pour ce jour
    pub value: Option<f64>,
}

impl RatePoint {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }

    /// Label ISO de la date, utilisé comme label d'axe X
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Série de taux ordonnée par date croissante
///
/// CONCEPT : Positions stables
/// - La longueur est toujours le nombre de jours demandés
/// - Un jour en échec reste présent avec value = None
/// - On ne "compacte" jamais la série
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub points: Vec<RatePoint>,
}

impl RateSeries {
    pub fn new(base: CurrencyCode, quote: CurrencyCode, points: Vec<RatePoint>) -> Self {
        Self { base, quote, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Labels de l'axe X (une date par position)
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(RatePoint::label).collect()
    }

    /// Valeurs avec trous (None) conservés
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Nombre de jours pour lesquels on a un taux
    pub fn available_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}

/// Observation instantanée d'une paire de devises
#[derive(Debug, Clone, PartialEq)]
pub struct PairSnapshot {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub rate: Option<f64>,
    pub observed_at: DateTime<Local>,
}

impl PairSnapshot {
    pub fn new(base: CurrencyCode, quote: CurrencyCode, rate: Option<f64>) -> Self {
        Self::observed(base, quote, rate, Local::now())
    }

    pub fn observed(
        base: CurrencyCode,
        quote: CurrencyCode,
        rate: Option<f64>,
        observed_at: DateTime<Local>,
    ) -> Self {
        Self {
            base,
            quote,
            rate,
            observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_series_keeps_gaps() {
        let series = RateSeries::new(
            CurrencyCode::USD,
            CurrencyCode::MYR,
            vec![
                RatePoint::new(day(1), Some(4.7)),
                RatePoint::new(day(2), None),
                RatePoint::new(day(3), Some(4.71)),
            ],
        );

        assert_eq!(series.len(), 3);
        assert_eq!(series.available_count(), 2);
        assert_eq!(series.values(), vec![Some(4.7), None, Some(4.71)]);
        assert_eq!(series.labels()[1], "2024-05-02");
    }

    #[test]
    fn test_point_serializes_date_as_iso() {
        let json = serde_json::to_string(&RatePoint::new(day(9), None)).unwrap();
        assert_eq!(json, r#"{"date":"2024-05-09","value":null}"#);
    }
}
