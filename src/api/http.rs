// ============================================================================
// Helpers HTTP partagés par les clients
// ============================================================================
// - Construction du client reqwest (User-Agent)
// - GET + vérification du statut + parsing JSON, avec contexte d'erreur
//
// CONCEPT RUST : Generics + DeserializeOwned
// - get_json::<T>() désérialise vers n'importe quel type qui implémente Deserialize
// - DeserializeOwned : T ne contient pas de références vers le buffer de réponse
// ============================================================================

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

/// Crée le client HTTP partagé
///
/// Pas de timeout : une requête bloquée retarde seulement le cycle de son widget.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("lazyfx/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Échec de la création du client HTTP")
}

/// GET `url` avec les paramètres `query`, retourne le JSON désérialisé
///
/// Les paramètres ne sont jamais loggés (ils peuvent contenir la clé API).
/// L'URL complète est retirée des erreurs reqwest avant d'y ajouter le
/// contexte : elle contient la query string.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T> {
    debug!(url = %url, "Sending HTTP request");
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("Échec de la requête HTTP vers {}", url))?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    // Vérifie que la réponse est un succès HTTP (200-299)
    if !status.is_success() {
        error!(status = %status, url = %url, "Upstream returned error status");
        anyhow::bail!("{} a retourné une erreur : HTTP {}", url, status);
    }

    response
        .json::<T>()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("Échec du parsing JSON de la réponse de {}", url))
}

/// Convertit l'échec d'une opération en sentinelle `None` après l'avoir loggé
pub fn or_unavailable<T>(result: Result<T>, operation: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation, error = %format!("{:#}", e), "Rate unavailable");
            None
        }
    }
}

/// Joint une base d'URL et un chemin sans doubler les '/'
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
