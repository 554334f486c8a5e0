// ============================================================================
// API Client : Frankfurter
// ============================================================================
// https://api.frankfurter.app : API publique, sans clé
//
// Endpoints utilisés :
// - /latest?from=USD&to=EUR         → { "base", "date", "rates": { "EUR": 0.92 } }
// - /2024-05-01?from=USD&to=EUR     → même forme, pour une date passée
// - /currencies                     → { "EUR": "Euro", ... }
// - /2024-04-01..2024-04-30?from&to → { "rates": { "2024-04-02": { "EUR": 0.93 } } }
//
// Sert de RateSource quand aucune clé FastForex n'est configurée, et de
// ReferenceSource dans tous les cas.
// ============================================================================

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::fastforex::{join_codes, pick, spread};
use super::http::{build_client, get_json, join_url, or_unavailable};
use super::{HistoryError, LatestRates, RangeRates, RateSource, ReferenceSource};
use crate::models::CurrencyCode;

// ============================================================================
// Structures pour parser les réponses JSON
// ============================================================================

/// Réponse de /latest et /{date}
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    base: Option<String>,
    date: NaiveDate,
    rates: HashMap<String, Option<f64>>,
}

/// Réponse de /{start}..{end}
///
/// Les clés de `rates` sont des dates ISO, triées par la BTreeMap
#[derive(Debug, Deserialize)]
struct RangeResponse {
    #[serde(default)]
    rates: BTreeMap<NaiveDate, HashMap<String, Option<f64>>>,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterClient {
    /// Crée un client pour `base_url` (ex: "https://api.frankfurter.app")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    async fn get_rates(
        &self,
        path: &str,
        base: CurrencyCode,
        quotes: Option<&str>,
    ) -> Result<RatesResponse> {
        let url = join_url(&self.base_url, path);
        let mut query = vec![("from", base.as_str())];
        if let Some(to) = quotes {
            query.push(("to", to));
        }
        get_json(&self.client, &url, &query).await
    }

    async fn try_fetch_one(&self, path: &str, base: CurrencyCode, quote: CurrencyCode) -> Result<f64> {
        let response = self.get_rates(path, base, Some(quote.as_str())).await?;
        pick(&response.rates, quote)
            .with_context(|| format!("champ rates.{} manquant ({})", quote, response.date))
    }

    async fn try_list_currencies(&self) -> Result<BTreeMap<CurrencyCode, String>> {
        let url = join_url(&self.base_url, "currencies");
        let raw: BTreeMap<String, String> = get_json(&self.client, &url, &[]).await?;

        // On ignore silencieusement les codes non conformes
        let currencies: BTreeMap<CurrencyCode, String> = raw
            .into_iter()
            .filter_map(|(code, name)| code.parse::<CurrencyCode>().ok().map(|c| (c, name)))
            .collect();

        info!(count = currencies.len(), "Currency list loaded");
        Ok(currencies)
    }

    async fn try_latest_all(&self, base: CurrencyCode) -> Result<LatestRates> {
        let response = self.get_rates("latest", base, None).await?;

        let base = match response.base.as_deref() {
            Some(code) => code.parse::<CurrencyCode>().context("devise de base invalide dans la réponse")?,
            None => base,
        };

        let rates: BTreeMap<CurrencyCode, f64> = response
            .rates
            .into_iter()
            .filter_map(|(code, rate)| Some((code.parse::<CurrencyCode>().ok()?, rate?)))
            .collect();

        Ok(LatestRates {
            base,
            date: response.date,
            rates,
        })
    }
}

#[async_trait]
impl RateSource for FrankfurterClient {
    #[instrument(skip(self))]
    async fn fetch_one(&self, base: CurrencyCode, quote: CurrencyCode) -> Option<f64> {
        or_unavailable(self.try_fetch_one("latest", base, quote).await, "fetch_one")
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

        let targets = join_codes(quotes);
        let rates = or_unavailable(
            self.get_rates("latest", base, Some(&targets)).await,
            "fetch_multi",
        )
        .map(|response| response.rates)
        .unwrap_or_default();

        spread(&rates, quotes)
    }

    #[instrument(skip(self))]
    async fn fetch_historical_day(
        &self,
        date: NaiveDate,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Option<f64> {
        let path = date.format("%Y-%m-%d").to_string();
        or_unavailable(
            self.try_fetch_one(&path, base, quote).await,
            "fetch_historical_day",
        )
    }
}

#[async_trait]
impl ReferenceSource for FrankfurterClient {
    #[instrument(skip(self))]
    async fn list_currencies(&self) -> Option<BTreeMap<CurrencyCode, String>> {
        or_unavailable(self.try_list_currencies().await, "list_currencies")
    }

    #[instrument(skip(self))]
    async fn latest_all(&self, base: CurrencyCode) -> Option<LatestRates> {
        or_unavailable(self.try_latest_all(base).await, "latest_all")
    }

    /// Plage historique, avec une erreur typée pour l'affichage
    #[instrument(skip(self))]
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Result<RangeRates, HistoryError> {
        let path = format!("{}..{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        let url = join_url(&self.base_url, &path);
        debug!(url = %url, "Fetching historical range");

        let response = self
            .client
            .get(&url)
            .query(&[("from", base.as_str()), ("to", quote.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Historical range request failed");
                HistoryError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Historical range returned error status");
            return Err(HistoryError::Status(status.as_u16()));
        }

        let body: RangeResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Historical range response is not valid JSON");
            HistoryError::Malformed(e.to_string())
        })?;

        let rates = range_rates(body, quote);
        if rates.is_empty() {
            return Err(HistoryError::Empty);
        }

        debug!(days = rates.len(), "Historical range loaded");
        Ok(rates)
    }
}

/// Aplatit la réponse de plage en date → taux de `quote`
fn range_rates(body: RangeResponse, quote: CurrencyCode) -> RangeRates {
    body.rates
        .into_iter()
        .map(|(date, rates)| (date, pick(&rates, quote)))
        .collect()
}
