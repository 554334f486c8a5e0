// ============================================================================
// Series Builder
// ============================================================================
// Construit une série journalière d'un taux de change à partir d'un appel
// `fetch_historical_day` par jour calendaire.
//
// CONCEPTS RUST :
// 1. join_all : toutes les futures avancent ensemble, le résultat garde
//    l'ordre de lancement (pas l'ordre de complétion)
// 2. Iterator + zip : associe chaque date à sa valeur par position
// ============================================================================

use chrono::{Duration, NaiveDate, Utc};
use futures_util::future::join_all;
use tracing::{debug, instrument};

use crate::api::RateSource;
use crate::models::{CurrencyCode, RatePoint, RateSeries};

/// Les `n` derniers jours calendaires se terminant à `end` (inclus), du plus
/// ancien au plus récent
pub fn last_n_dates(n: usize, end: NaiveDate) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .map(|offset| end - Duration::days(offset as i64))
        .collect()
}

/// Série des `day_count` derniers jours, se terminant aujourd'hui (UTC)
pub async fn build_series(
    source: &dyn RateSource,
    base: CurrencyCode,
    quote: CurrencyCode,
    day_count: usize,
) -> RateSeries {
    let today = Utc::now().date_naive();
    build_series_ending(source, base, quote, day_count, today).await
}

/// Série des `day_count` jours se terminant à `end`
///
/// CONCEPT : Jointure positionnelle
/// - Les requêtes sont lancées dans l'ordre des dates
/// - join_all renvoie les résultats dans ce même ordre
/// - Une requête échouée donne un point absent, jamais un trou dans la série
#[instrument(skip(source))]
pub async fn build_series_ending(
    source: &dyn RateSource,
    base: CurrencyCode,
    quote: CurrencyCode,
    day_count: usize,
    end: NaiveDate,
) -> RateSeries {
    let dates = last_n_dates(day_count, end);

    let fetches = dates
        .iter()
        .map(|date| source.fetch_historical_day(*date, base, quote));
    let values = join_all(fetches).await;

    let points: Vec<RatePoint> = dates
        .into_iter()
        .zip(values)
        .map(|(date, value)| RatePoint::new(date, value))
        .collect();

    let series = RateSeries::new(base, quote, points);
    debug!(
        days = series.len(),
        available = series.available_count(),
        "Series built"
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration as StdDuration;

    /// Les jours les plus anciens répondent en dernier ; le 3 du mois échoue
    struct ReversedSource {
        end: NaiveDate,
    }

    #[async_trait]
    impl RateSource for ReversedSource {
        async fn fetch_one(&self, _base: CurrencyCode, _quote: CurrencyCode) -> Option<f64> {
            None
        }

        async fn fetch_multi(
            &self,
            _base: CurrencyCode,
            quotes: &[CurrencyCode],
        ) -> HashMap<CurrencyCode, Option<f64>> {
            quotes.iter().map(|q| (*q, None)).collect()
        }

        async fn fetch_historical_day(
            &self,
            date: NaiveDate,
            _base: CurrencyCode,
            _quote: CurrencyCode,
        ) -> Option<f64> {
            let age = (self.end - date).num_days() as u64;
            tokio::time::sleep(StdDuration::from_millis(10 * (age + 1))).await;

            let day = date.format("%d").to_string().parse::<u32>().ok()?;
            if day == 3 {
                return None;
            }
            Some(4.0 + f64::from(day) / 100.0)
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_last_n_dates() {
        let dates = last_n_dates(3, date("2024-03-01"));
        assert_eq!(dates, vec![date("2024-02-28"), date("2024-02-29"), date("2024-03-01")]);
        assert!(last_n_dates(0, date("2024-03-01")).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_series_is_ordered_whatever_completion_order() {
        let end = date("2024-05-14");
        let source = ReversedSource { end };

        for day_count in [7usize, 14] {
            let series =
                build_series_ending(&source, CurrencyCode::USD, CurrencyCode::MYR, day_count, end)
                    .await;

            assert_eq!(series.len(), day_count);
            assert_eq!(series.points.last().map(|p| p.date), Some(end));

            let dates: Vec<NaiveDate> = series.points.iter().map(|p| p.date).collect();
            let mut sorted = dates.clone();
            sorted.sort();
            assert_eq!(dates, sorted);

            for point in &series.points {
                let day = point.label()[8..].parse::<u32>().unwrap();
                if day == 3 {
                    assert_eq!(point.value, None);
                } else {
                    assert_eq!(point.value, Some(4.0 + f64::from(day) / 100.0));
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_day_keeps_its_position() {
        let end = date("2024-05-05");
        let source = ReversedSource { end };

        let series =
            build_series_ending(&source, CurrencyCode::USD, CurrencyCode::MYR, 5, end).await;

        assert_eq!(series.labels(), vec!["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05"]);
        assert_eq!(series.values()[2], None);
        assert_eq!(series.available_count(), 4);
    }
}
