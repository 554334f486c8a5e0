// ============================================================================
// Structure : CurrencyCode
// ============================================================================
// Code devise ISO 4217 (3 lettres majuscules : USD, EUR, MYR, ...)
//
// CONCEPTS RUST :
// 1. Newtype pattern : un [u8; 3] validé plutôt qu'une String libre
// 2. Copy : 3 octets, aussi léger qu'un entier
// 3. FromStr / TryFrom : parsing avec erreur explicite
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Code devise à 3 lettres, toujours stocké en majuscules
///
/// CONCEPT RUST : #[serde(try_from, into)]
/// - Sérialisé comme une simple chaîne "USD"
/// - La désérialisation passe par TryFrom<String> (donc validée)
/// - Fonctionne aussi pour les clés de map JSON ({"EUR": 0.9})
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");
    pub const GBP: CurrencyCode = CurrencyCode(*b"GBP");
    pub const MYR: CurrencyCode = CurrencyCode(*b"MYR");
    pub const JPY: CurrencyCode = CurrencyCode(*b"JPY");
    pub const AUD: CurrencyCode = CurrencyCode(*b"AUD");
    pub const SGD: CurrencyCode = CurrencyCode(*b"SGD");

    /// Retourne le code sous forme de &str
    ///
    /// Les octets sont validés ASCII à la construction, la conversion ne peut
    /// pas échouer en pratique.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

/// Erreur de parsing d'un code devise
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("code devise invalide : {0:?} (3 lettres attendues)")]
pub struct InvalidCurrencyCode(pub String);

impl FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    /// Parse "usd", "USD", " Usd " → USD
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bytes = trimmed.as_bytes();

        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(InvalidCurrencyCode(s.to_string()));
        }

        let mut code = [0u8; 3];
        for (slot, b) in code.iter_mut().zip(bytes) {
            *slot = b.to_ascii_uppercase();
        }
        Ok(CurrencyCode(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
