// ============================================================================
// Chart - Rendu d'un ChartConfig
// ============================================================================
// Le renderer : reçoit la description déclarative produite par un widget et
// choisit le widget ratatui adapté
//
//   line        → Chart + Dataset (Braille), les trous (None) sont sautés
//   bar         → BarChart, une barre par label (N/A pour une valeur absente)
//   candlestick → candlestick_text
//
// CONCEPTS RUST :
// 1. Iterator chaining : transformer les valeurs en points (x, y)
// 2. filter_map : sauter les valeurs absentes sans casser l'indexation
// 3. fold : bornes min/max en un seul passage
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

use crate::models::{ChartConfig, ChartData, ChartDataset, ChartKind};
use crate::ui::candlestick_text;

/// Échelle des barres : BarChart ne dessine que des u64
const BAR_SCALE: f64 = 10_000.0;

// ============================================================================
// Point d'entrée
// ============================================================================

/// Dessine un graphique décrit par `config`
pub fn render_chart(frame: &mut Frame, config: &ChartConfig, area: Rect) {
    let title = config.title.clone().unwrap_or_default();

    match config.kind {
        ChartKind::Line => render_line_chart(frame, config, &title, area),
        ChartKind::Bar => render_bar_chart(frame, config, &title, area),
        ChartKind::Candlestick => {
            let candles = config.datasets.iter().find_map(|d| match &d.data {
                ChartData::Candles(candles) => Some(candles.as_slice()),
                ChartData::Values(_) => None,
            });
            candlestick_text::render_candlestick_chart(frame, &title, candles.unwrap_or(&[]), area);
        }
    }
}

fn dataset_color(dataset: &ChartDataset) -> Color {
    let (r, g, b) = dataset.style.color;
    Color::Rgb(r, g, b)
}

fn chart_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", title))
}

/// Points (index, valeur) d'un dataset ; les trous sont sautés
pub fn line_points(data: &ChartData) -> Vec<(f64, f64)> {
    match data {
        ChartData::Values(values) => values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect(),
        ChartData::Candles(candles) => candles
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f64, c.close))
            .collect(),
    }
}

/// Bornes de l'axe Y : marge de 5%, et 0 en bas si begin_at_zero
pub fn y_bounds(config: &ChartConfig) -> Option<[f64; 2]> {
    let (min, max) = config.value_bounds()?;
    let margin = if max > min { (max - min) * 0.05 } else { max.abs() * 0.05 + 1e-4 };

    let y_min = if config.begin_at_zero { 0.0 } else { (min - margin).max(0.0) };
    Some([y_min, max + margin])
}

// ============================================================================
// Courbe
// ============================================================================

fn render_line_chart(frame: &mut Frame, config: &ChartConfig, title: &str, area: Rect) {
    let Some([y_min, y_max]) = y_bounds(config) else {
        render_no_data(frame, area, title);
        return;
    };

    // Les points doivent vivre aussi longtemps que les Dataset qui les empruntent
    let points: Vec<Vec<(f64, f64)>> = config.datasets.iter().map(|d| line_points(&d.data)).collect();

    let datasets: Vec<Dataset> = config
        .datasets
        .iter()
        .zip(&points)
        .map(|(dataset, points)| {
            let mut style = Style::default().fg(dataset_color(dataset));
            if dataset.style.border_width > 1 {
                style = style.add_modifier(Modifier::BOLD);
            }

            let rendered = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(points);

            // Un dataset sans nom n'apparaît pas dans la légende
            if config.show_legend {
                rendered.name(dataset.label.clone())
            } else {
                rendered
            }
        })
        .collect();

    let last_index = config.labels.len().saturating_sub(1);
    let x_labels: Vec<Span> = match (config.labels.first(), config.labels.last()) {
        (Some(first), Some(last)) if last_index > 0 => vec![
            Span::raw(first.clone()),
            Span::raw(config.labels[last_index / 2].clone()),
            Span::raw(last.clone()),
        ],
        (Some(first), _) => vec![Span::raw(first.clone())],
        _ => vec![],
    };

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, last_index.max(1) as f64])
        .labels(x_labels);

    let mut y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.4}", y_min)),
            Span::raw(format!("{:.4}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.4}", y_max)),
        ]);
    if let Some(y_title) = &config.y_axis_title {
        y_axis = y_axis.title(y_title.clone());
    }

    let chart = Chart::new(datasets)
        .block(chart_block(title))
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

// ============================================================================
// Barres
// ============================================================================

/// Barres d'un dataset de valeurs ; une valeur absente donne une barre vide "N/A"
pub fn bars(config: &ChartConfig) -> Vec<Bar<'static>> {
    let Some(dataset) = config.datasets.first() else {
        return Vec::new();
    };
    let ChartData::Values(values) = &dataset.data else {
        return Vec::new();
    };
    let color = dataset_color(dataset);

    config
        .labels
        .iter()
        .zip(values)
        .map(|(label, value)| {
            let bar = Bar::default()
                .label(Line::from(label.clone()))
                .style(Style::default().fg(color));
            match value {
                Some(v) => bar
                    .value((v * BAR_SCALE).round().max(0.0) as u64)
                    .text_value(format!("{:.4}", v)),
                None => bar.value(0).text_value("N/A".to_string()),
            }
        })
        .collect()
}

fn render_bar_chart(frame: &mut Frame, config: &ChartConfig, title: &str, area: Rect) {
    let bars = bars(config);
    if bars.is_empty() {
        render_no_data(frame, area, title);
        return;
    }

    // Largeur des barres : on remplit la zone, au moins 1 colonne
    let inner_width = area.width.saturating_sub(2);
    let count = bars.len() as u16;
    let bar_width = (inner_width / count.max(1)).saturating_sub(1).clamp(1, 9);

    let mut block = chart_block(title);
    if let Some(y_title) = &config.y_axis_title {
        block = block.title(
            Title::from(format!(" {} ", y_title))
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        );
    }

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(Color::White))
        .label_style(Style::default().fg(Color::Gray))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

// ============================================================================
// Helper : Message quand pas de données
// ============================================================================

fn render_no_data(frame: &mut Frame, area: Rect, title: &str) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Pas de données à afficher", Style::default().fg(Color::Gray))),
    ])
    .block(chart_block(title))
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DatasetStyle;

    fn config(kind: ChartKind, values: Vec<Option<f64>>) -> ChartConfig {
        let labels = (0..values.len()).map(|i| format!("d{}", i)).collect();
        ChartConfig::new(kind, labels).dataset("x", ChartData::Values(values), DatasetStyle::default())
    }

    #[test]
    fn test_line_points_skip_gaps_but_keep_positions() {
        let points = line_points(&ChartData::Values(vec![Some(1.0), None, Some(3.0)]));
        assert_eq!(points, vec![(0.0, 1.0), (2.0, 3.0)]);
    }

    #[test]
    fn test_y_bounds() {
        let cfg = config(ChartKind::Line, vec![Some(4.0), Some(5.0)]);
        let [low, high] = y_bounds(&cfg).unwrap();
        assert!((low - 3.95).abs() < 1e-9);
        assert!((high - 5.05).abs() < 1e-9);

        let mut zero = cfg.clone();
        zero.begin_at_zero = true;
        assert_eq!(y_bounds(&zero).unwrap()[0], 0.0);

        assert!(y_bounds(&config(ChartKind::Line, vec![None])).is_none());
    }

    #[test]
    fn test_missing_bar_is_kept() {
        let cfg = config(ChartKind::Bar, vec![Some(0.92), None, Some(4.7)]);
        assert_eq!(bars(&cfg).len(), 3);
    }
}
