// ============================================================================
// Contrat du renderer : ChartConfig
// ============================================================================
// Description déclarative d'un graphique (type + labels + datasets + options)
// Les adaptateurs produisent un ChartConfig, le renderer (ui::chart) le dessine
//
// CONCEPTS RUST :
// 1. Enums avec données : ChartData = valeurs OU chandeliers
// 2. Serialize : le contrat reste exportable en JSON (renderer externe)
// 3. Builder léger : méthodes qui consomment et retournent Self
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Type de graphique supporté par le renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Candlestick,
}

impl ChartKind {
    /// Cycle utilisé par la touche [c]
    pub fn next(&self) -> ChartKind {
        match self {
            ChartKind::Line => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Candlestick,
            ChartKind::Candlestick => ChartKind::Line,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Candlestick => "candlestick",
        }
    }

    /// Inverse de label() ; None pour un type inconnu
    pub fn from_label(label: &str) -> Option<ChartKind> {
        match label {
            "line" => Some(ChartKind::Line),
            "bar" => Some(ChartKind::Bar),
            "candlestick" => Some(ChartKind::Candlestick),
            _ => None,
        }
    }
}

/// Une chandelle journalière (open = taux de la veille, close = taux du jour)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Chandelle dérivée de deux taux consécutifs
    pub fn from_rates(date: NaiveDate, open: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Données d'un dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "lowercase")]
pub enum ChartData {
    /// Une valeur par label, None = trou dans la courbe
    Values(Vec<Option<f64>>),
    /// Chandeliers (leur date fait office de label)
    Candles(Vec<Candle>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Values(values) => values.len(),
            ChartData::Candles(candles) => candles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options de style d'un dataset (couleur RGB, remplissage, épaisseur)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStyle {
    pub color: (u8, u8, u8),
    pub fill: bool,
    pub tension: f64,
    pub border_width: u8,
    pub point_radius: u8,
}

impl Default for DatasetStyle {
    /// Violet #667eea, la couleur d'accent du dashboard
    fn default() -> Self {
        Self {
            color: (102, 126, 234),
            fill: false,
            tension: 0.0,
            border_width: 1,
            point_radius: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: ChartData,
    pub style: DatasetStyle,
}

/// Le contrat complet consommé par le renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub y_axis_title: Option<String>,
    pub show_legend: bool,
    pub begin_at_zero: bool,
}

impl ChartConfig {
    pub fn new(kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            kind,
            title: None,
            labels,
            datasets: Vec::new(),
            y_axis_title: None,
            show_legend: false,
            begin_at_zero: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn y_axis_title(mut self, title: impl Into<String>) -> Self {
        self.y_axis_title = Some(title.into());
        self
    }

    pub fn legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    pub fn dataset(mut self, label: impl Into<String>, data: ChartData, style: DatasetStyle) -> Self {
        self.datasets.push(ChartDataset {
            label: label.into(),
            data,
            style,
        });
        self
    }

    /// Bornes (min, max) de toutes les valeurs présentes, tous datasets confondus
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let values = self.datasets.iter().flat_map(|d| match &d.data {
            ChartData::Values(values) => values.iter().flatten().copied().collect::<Vec<_>>(),
            ChartData::Candles(candles) => candles.iter().flat_map(|c| [c.low, c.high]).collect(),
        });

        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
    }
}

// ============================================================================
// Statistiques affichées sous le graphique historique
// ============================================================================

/// Current / Average / High / Low / Change d'une suite de taux
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartStats {
    pub current: f64,
    pub average: f64,
    pub high: f64,
    pub low: f64,
    /// Variation en % entre le premier et le dernier taux
    pub change_percent: f64,
}

impl ChartStats {
    /// Calcule les stats ; None si la suite est vide
    pub fn from_rates(rates: &[f64]) -> Option<Self> {
        let first = *rates.first()?;
        let current = *rates.last()?;

        let high = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = rates.iter().copied().fold(f64::INFINITY, f64::min);
        let average = rates.iter().sum::<f64>() / rates.len() as f64;

        let change_percent = if first == 0.0 {
            0.0
        } else {
            (current - first) / first * 100.0
        };

        Some(Self {
            current,
            average,
            high,
            low,
            change_percent,
        })
    }

    /// "+1.23%" ou "-0.50%"
    pub fn change_label(&self) -> String {
        format!("{:+.2}%", self.change_percent)
    }

    pub fn is_positive(&self) -> bool {
        self.change_percent >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = ChartStats::from_rates(&[4.0, 4.4, 4.2]).unwrap();
        assert_eq!(stats.current, 4.2);
        assert_eq!(stats.high, 4.4);
        assert_eq!(stats.low, 4.0);
        assert!((stats.average - 4.2).abs() < 1e-9);
        assert_eq!(stats.change_label(), "+5.00%");
        assert!(stats.is_positive());

        assert!(ChartStats::from_rates(&[]).is_none());
    }

    #[test]
    fn test_candle_from_rates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let candle = Candle::from_rates(date, 4.5, 4.3);
        assert_eq!(candle.high, 4.5);
        assert_eq!(candle.low, 4.3);
        assert!(!candle.is_bullish());
    }

    #[test]
    fn test_value_bounds_skip_gaps() {
        let config = ChartConfig::new(ChartKind::Line, vec!["a".into(), "b".into(), "c".into()])
            .dataset("x", ChartData::Values(vec![Some(2.0), None, Some(1.0)]), DatasetStyle::default());
        assert_eq!(config.value_bounds(), Some((1.0, 2.0)));

        let empty = ChartConfig::new(ChartKind::Bar, vec![])
            .dataset("x", ChartData::Values(vec![None]), DatasetStyle::default());
        assert_eq!(empty.value_bounds(), None);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChartKind::Candlestick).unwrap(), "\"candlestick\"");
        assert_eq!(ChartKind::Candlestick.next(), ChartKind::Line);
    }
}
