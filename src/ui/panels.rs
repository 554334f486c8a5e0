// ============================================================================
// Panels - Rendu des éléments du Board
// ============================================================================
// Chaque élément du board (texte, select, panel) a son rendu ici.
// Les écrans (dashboard, converter, map) ne font que placer ces briques.
//
// CONCEPTS RATATUI :
// 1. Table + Row : tableau d'historique
// 2. Paragraph multi-lignes : résultat, grille de taux
// 3. Styles conditionnels : focus, erreur, variation positive/négative
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::Field;
use crate::board::{Board, ConversionView, Panel, RateCard, TableRow};
use crate::models::ChartStats;
use crate::ui::chart;

/// Largeur d'une carte de la grille des taux
const CARD_WIDTH: usize = 18;

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title))
}

// ============================================================================
// Panels
// ============================================================================

/// Dessine le panel `id` du board dans `area`
///
/// CONCEPT RUST : Match exhaustif sur enum
/// - Ajouter une variante à Panel force à compléter ce rendu
pub fn render_panel(frame: &mut Frame, board: &Board, id: &str, title: &str, area: Rect) {
    match board.panel(id) {
        None => render_message(frame, title, "…", Color::Gray, area),
        Some(Panel::Message(message)) => render_message(frame, title, message, Color::Gray, area),
        Some(Panel::Loading(message)) => {
            render_message(frame, title, &format!("⏳ {}", message), Color::Cyan, area)
        }
        Some(Panel::Error(message)) => {
            render_message(frame, title, &format!("⚠ {}", message), Color::Red, area)
        }
        Some(Panel::Conversion(view)) => render_conversion(frame, title, view, area),
        Some(Panel::Chart { .. }) => match board.chart_in(id) {
            Some((config, Some(stats))) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);
                chart::render_chart(frame, config, chunks[0]);
                render_stats(frame, stats, chunks[1]);
            }
            Some((config, None)) => chart::render_chart(frame, config, area),
            // Panel qui pointe vers une instance détruite
            None => render_message(frame, title, "…", Color::Gray, area),
        },
        Some(Panel::Rates(cards)) => render_rate_cards(frame, title, cards, area),
        Some(Panel::Table(rows)) => render_table(frame, title, rows, area),
    }
}

fn render_message(frame: &mut Frame, title: &str, message: &str, color: Color, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color))),
    ])
    .block(titled_block(title))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_conversion(frame: &mut Frame, title: &str, view: &ConversionView, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            view.headline.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(view.detail.clone()),
        Line::from(Span::styled(view.rate_line.clone(), Style::default().fg(Color::Gray))),
    ])
    .block(titled_block(title))
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Cartes "EUR  0.1968" réparties sur autant de colonnes que possible
pub fn rate_card_lines(cards: &[RateCard], width: u16) -> Vec<Line<'static>> {
    let per_line = (width as usize / CARD_WIDTH).max(1);

    cards
        .chunks(per_line)
        .map(|chunk| {
            let spans: Vec<Span> = chunk
                .iter()
                .flat_map(|card| {
                    [
                        Span::styled(
                            format!("{:<4}", card.code),
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!("{:<width$}", card.value, width = CARD_WIDTH - 4)),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn render_rate_cards(frame: &mut Frame, title: &str, cards: &[RateCard], area: Rect) {
    let lines = rate_card_lines(cards, area.width.saturating_sub(2));
    let paragraph = Paragraph::new(lines).block(titled_block(title));
    frame.render_widget(paragraph, area);
}

fn render_table(frame: &mut Frame, title: &str, rows: &[TableRow], area: Rect) {
    let header = Row::new(vec!["Timestamp", "Base", "Target", "Rate"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(vec![
                row.timestamp.clone(),
                row.base.clone(),
                row.target.clone(),
                row.rate.clone(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(21),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Min(8),
    ];

    let table = Table::new(body, widths).header(header).block(titled_block(title));
    frame.render_widget(table, area);
}

// ============================================================================
// Statistiques du graphique historique
// ============================================================================

/// Ligne Current / Average / High / Low / Change
pub fn stats_line(stats: &ChartStats) -> Line<'static> {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let change_color = if stats.is_positive() { Color::Green } else { Color::Red };

    Line::from(vec![
        Span::styled("Current ", label),
        Span::styled(format!("{:.4}", stats.current), value),
        Span::styled("   Average ", label),
        Span::styled(format!("{:.4}", stats.average), value),
        Span::styled("   High ", label),
        Span::styled(format!("{:.4}", stats.high), value),
        Span::styled("   Low ", label),
        Span::styled(format!("{:.4}", stats.low), value),
        Span::styled("   Change ", label),
        Span::styled(stats.change_label(), value.fg(change_color)),
    ])
}

fn render_stats(frame: &mut Frame, stats: &ChartStats, area: Rect) {
    let paragraph = Paragraph::new(stats_line(stats))
        .block(titled_block("Statistics"))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tuiles et champs
// ============================================================================

/// Tuile KPI : valeur en gros, "Updated: ..." en dessous
pub fn render_kpi(frame: &mut Frame, board: &Board, title: &str, value_id: &str, updated_id: &str, area: Rect) {
    let value = board.text(value_id).unwrap_or("--").to_string();
    let updated = board.text(updated_id).unwrap_or("").to_string();

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(updated, Style::default().fg(Color::Gray))),
    ])
    .block(titled_block(title))
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Un champ du formulaire : "› From  ◀ EUR - Euro ▶"
pub fn field_line(board: &Board, field: Field, focused: bool) -> Line<'static> {
    let marker = if focused { "› " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let value = if field.is_currency() {
        match board.currency(field.element_id()) {
            Some(code) => format!("◀ {} ▶", board.currency_label(code)),
            None => "◀ -- ▶".to_string(),
        }
    } else {
        let amount = board.input(field.element_id());
        let cursor = if focused { "█" } else { "" };
        if amount.is_empty() && !focused {
            "0.00".to_string()
        } else {
            format!("{}{}", amount, cursor)
        }
    };

    Line::from(vec![
        Span::styled(format!("{}{:<13}", marker, field.label()), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ids;
    use crate::models::CurrencyCode;
    use std::collections::BTreeMap;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_rate_cards_wrap_by_width() {
        let cards: Vec<RateCard> = ["AUD", "EUR", "USD"]
            .iter()
            .map(|code| RateCard {
                code: code.to_string(),
                value: "0.1234".to_string(),
            })
            .collect();

        assert_eq!(rate_card_lines(&cards, 40).len(), 2);
        assert_eq!(rate_card_lines(&cards, 10).len(), 3);
    }

    #[test]
    fn test_field_lines() {
        let mut board = Board::with_defaults();
        board.set_currencies(BTreeMap::from([(CurrencyCode::EUR, "Euro".to_string())]));

        let to = line_text(&field_line(&board, Field::ToCurrency, true));
        assert!(to.starts_with("› To"));
        assert!(to.contains("◀ EUR - Euro ▶"));

        board.set_input(ids::FROM_AMOUNT, "12.5");
        let amount = line_text(&field_line(&board, Field::Amount, true));
        assert!(amount.ends_with("12.5█"));
    }

    #[test]
    fn test_stats_line() {
        let stats = ChartStats::from_rates(&[0.21, 0.22]).unwrap();
        let text = line_text(&stats_line(&stats));
        assert!(text.contains("Current 0.2200"));
        assert!(text.contains("Change +4.76%"));
    }
}
