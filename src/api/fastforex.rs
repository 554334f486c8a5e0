// ============================================================================
// API Client : FastForex
// ============================================================================
// https://api.fastforex.io : fetch-one, fetch-multi, historical
//
// Contrat de réponse retenu (un seul par endpoint) :
// - /fetch-one   → { "result":  { "EUR": 0.92 } }
// - /fetch-multi → { "results": { "EUR": 0.92, "GBP": 0.79 } }
// - /historical  → { "results": { "EUR": 0.91 } }
//
// La clé API vient de la configuration (variable d'environnement), jamais
// d'une constante dans le code.
// ============================================================================

use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::http::{build_client, get_json, join_url, or_unavailable};
use super::RateSource;
use crate::models::CurrencyCode;

// ============================================================================
// Structures pour parser les réponses JSON
// ============================================================================

/// Réponse de /fetch-one
#[derive(Debug, Deserialize)]
struct FetchOneResponse {
    result: HashMap<String, Option<f64>>,
}

/// Réponse de /fetch-multi et /historical
#[derive(Debug, Deserialize)]
struct ResultsResponse {
    results: HashMap<String, Option<f64>>,
}

// ============================================================================
// Client
// ============================================================================

pub struct FastForexClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FastForexClient {
    /// Crée un client pour `base_url` (ex: "https://api.fastforex.io")
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub(crate) async fn try_fetch_one(&self, base: CurrencyCode, quote: CurrencyCode) -> Result<f64> {
        let url = join_url(&self.base_url, "fetch-one");
        let response: FetchOneResponse = get_json(
            &self.client,
            &url,
            &[
                ("from", base.as_str()),
                ("to", quote.as_str()),
                ("api_key", &self.api_key),
            ],
        )
        .await?;

        pick(&response.result, quote).with_context(|| format!("champ result.{} manquant", quote))
    }

    async fn try_fetch_multi(
        &self,
        base: CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> Result<HashMap<String, Option<f64>>> {
        let url = join_url(&self.base_url, "fetch-multi");
        let targets = join_codes(quotes);
        let response: ResultsResponse = get_json(
            &self.client,
            &url,
            &[
                ("from", base.as_str()),
                ("to", &targets),
                ("api_key", &self.api_key),
            ],
        )
        .await?;

        Ok(response.results)
    }

    async fn try_fetch_historical_day(
        &self,
        date: NaiveDate,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Result<f64> {
        let url = join_url(&self.base_url, "historical");
        let date_iso = date.format("%Y-%m-%d").to_string();
        let response: ResultsResponse = get_json(
            &self.client,
            &url,
            &[
                ("date", &date_iso),
                ("from", base.as_str()),
                ("to", quote.as_str()),
                ("api_key", &self.api_key),
            ],
        )
        .await?;

        pick(&response.results, quote)
            .with_context(|| format!("champ results.{} manquant pour {}", quote, date_iso))
    }
}

/// La clé API n'apparaît jamais dans les logs
impl fmt::Debug for FastForexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastForexClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl RateSource for FastForexClient {
    #[instrument(skip(self))]
    async fn fetch_one(&self, base: CurrencyCode, quote: CurrencyCode) -> Option<f64> {
        or_unavailable(self.try_fetch_one(base, quote).await, "fetch_one")
    }

    #[instrument(skip(self))]
    async fn fetch_multi(
        &self,
        base: CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> HashMap<CurrencyCode, Option<f64>> {
        if quotes.is_empty() {
            return HashMap::new();
        }

        // Échec global : chaque quote demandée devient indisponible
        let results = or_unavailable(self.try_fetch_multi(base, quotes).await, "fetch_multi")
            .unwrap_or_default();

        let map = spread(&results, quotes);
        debug!(requested = quotes.len(), available = map.values().flatten().count(), "Multi rates fetched");
        map
    }

    #[instrument(skip(self))]
    async fn fetch_historical_day(
        &self,
        date: NaiveDate,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Option<f64> {
        or_unavailable(
            self.try_fetch_historical_day(date, base, quote).await,
            "fetch_historical_day",
        )
    }
}

// ============================================================================
// Helpers de mapping
// ============================================================================

/// Valeur de `quote` dans une map keyée par code ; None si absente ou null
pub(crate) fn pick(map: &HashMap<String, Option<f64>>, quote: CurrencyCode) -> Option<f64> {
    map.get(quote.as_str()).copied().flatten()
}

/// Une entrée par quote demandée, None pour celles absentes de la réponse
pub(crate) fn spread(
    map: &HashMap<String, Option<f64>>,
    quotes: &[CurrencyCode],
) -> HashMap<CurrencyCode, Option<f64>> {
    quotes.iter().map(|q| (*q, pick(map, *q))).collect()
}

/// "EUR,GBP,MYR"
pub(crate) fn join_codes(quotes: &[CurrencyCode]) -> String {
    quotes.iter().map(CurrencyCode::as_str).collect::<Vec<_>>().join(",")
}
