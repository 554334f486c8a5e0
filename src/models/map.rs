// ============================================================================
// Marqueurs de la carte des devises
// ============================================================================
// Liste statique pays → devise → coordonnées, consommée par le widget carte
// ============================================================================

use serde::Serialize;

/// Un marqueur : pays, code devise, (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapMarker {
    pub name: &'static str,
    pub currency: &'static str,
    pub coordinates: (f64, f64),
}

impl MapMarker {
    const fn new(name: &'static str, currency: &'static str, lat: f64, lon: f64) -> Self {
        Self {
            name,
            currency,
            coordinates: (lat, lon),
        }
    }

    /// Texte de l'infobulle au survol
    pub fn tooltip(&self) -> String {
        format!("{} (Currency: {})", self.name, self.currency)
    }
}

/// Vue par défaut de la carte (centre, zoom)
pub const DEFAULT_CENTER: (f64, f64) = (20.0, 0.0);
pub const DEFAULT_ZOOM: u8 = 2;

pub const MARKERS: [MapMarker; 31] = [
    MapMarker::new("United States", "USD", 37.0902, -95.7129),
    MapMarker::new("Malaysia", "MYR", 4.2105, 101.9758),
    MapMarker::new("European Union", "EUR", 50.1109, 8.6821),
    MapMarker::new("United Kingdom", "GBP", 55.3781, -3.4360),
    MapMarker::new("Japan", "JPY", 36.2048, 138.2529),
    MapMarker::new("Singapore", "SGD", 1.3521, 103.8198),
    MapMarker::new("Mexico", "MXN", 23.6345, -102.5528),
    MapMarker::new("South Korea", "KRW", 35.9078, 127.7669),
    MapMarker::new("Iceland", "ISK", 64.9631, -19.0208),
    MapMarker::new("India", "INR", 20.5937, 78.9629),
    MapMarker::new("Israel", "ILS", 31.0461, 34.8516),
    MapMarker::new("Indonesia", "IDR", -0.7893, 113.9213),
    MapMarker::new("Hungary", "HUF", 47.1625, 19.5033),
    MapMarker::new("Hong Kong", "HKD", 22.3193, 114.1694),
    MapMarker::new("Denmark", "DKK", 56.2639, 9.5018),
    MapMarker::new("Czech Republic", "CZK", 49.8175, 15.4730),
    MapMarker::new("China", "CNY", 35.8617, 104.1954),
    MapMarker::new("Switzerland", "CHF", 46.8182, 8.2275),
    MapMarker::new("Canada", "CAD", 56.1304, -106.3468),
    MapMarker::new("Brazil", "BRL", -14.2350, -51.9253),
    MapMarker::new("Bulgaria", "BGN", 42.7339, 25.4858),
    MapMarker::new("Australia", "AUD", -25.2744, 133.7751),
    MapMarker::new("South Africa", "ZAR", -30.5595, 22.9375),
    MapMarker::new("Turkey", "TRY", 38.9637, 35.2433),
    MapMarker::new("Thailand", "THB", 15.8700, 100.9925),
    MapMarker::new("Sweden", "SEK", 60.1282, 18.6435),
    MapMarker::new("Romania", "RON", 45.9432, 24.9668),
    MapMarker::new("Poland", "PLN", 51.9194, 19.1451),
    MapMarker::new("Philippines", "PHP", 12.8797, 121.7740),
    MapMarker::new("New Zealand", "NZD", -40.9006, 174.8860),
    MapMarker::new("Norway", "NOK", 60.4720, 8.4689),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrencyCode;

    #[test]
    fn test_marker_currencies_are_valid_codes() {
        for marker in MARKERS.iter() {
            assert!(marker.currency.parse::<CurrencyCode>().is_ok(), "{}", marker.currency);
        }
    }

    #[test]
    fn test_tooltip() {
        assert_eq!(MARKERS[1].tooltip(), "Malaysia (Currency: MYR)");
    }
}
