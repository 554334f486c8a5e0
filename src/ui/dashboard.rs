// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI : header avec onglets, écran courant, footer
//
// CONCEPTS RUST :
// 1. Deux sources d'état : &App (navigation) et &Board (données)
// 2. Builder pattern : construction fluide des widgets
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Field, Screen};
use crate::board::{ids, Board};
use crate::ui::{map, panels};
use crate::widgets::history_chart::DEFAULT_PERIOD;
use crate::widgets::rates_grid::RATES_BASE;

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Pattern matching sur app.current_screen
/// - Le compilateur garantit l'exhaustivité (tous les cas gérés)
pub fn render(frame: &mut Frame, app: &App, board: &Board) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Dashboard => render_dashboard(frame, app, board, chunks[1]),
        Screen::Converter => render_converter(frame, app, board, chunks[1]),
        Screen::Map => map::render_map(frame, app, chunks[1]),
    }

    render_footer(frame, app, board, chunks[2]);
}

// ============================================================================
// Layout : Découpage de l'écran
// ============================================================================

/// Crée le layout principal (header, content, footer)
///
/// CONCEPT RUST : Rc<[T]> vs Vec<T>
/// - Layout::split() retourne Rc<[Rect]> (reference counted slice)
/// - On le convertit en Vec avec .to_vec() pour simplifier
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : Titre et onglets
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyFX ")
        .title_alignment(Alignment::Center);

    // Onglets : l'écran courant en vert gras
    let mut spans = Vec::new();
    for screen in [Screen::Dashboard, Screen::Converter, Screen::Map] {
        let style = if screen == app.current_screen {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if !spans.is_empty() {
            spans.push(Span::raw("  │  "));
        }
        spans.push(Span::styled(screen.title(), style));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Écran Dashboard : KPI, tendance, paires, historique
// ============================================================================

fn render_dashboard(frame: &mut Frame, app: &App, board: &Board, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),       // Tuiles KPI
            Constraint::Percentage(55),  // Graphiques
            Constraint::Min(0),          // Historique
        ])
        .split(area);

    // Tuiles KPI
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    let kpis = [
        ("USD → MYR", ids::KPI_USDMYR, ids::KPI_USDMYR_UPD),
        ("EUR → MYR", ids::KPI_EURMYR, ids::KPI_EURMYR_UPD),
        ("GDP Growth", ids::KPI_GDP, ids::KPI_GDP_UPD),
        ("Inflation (CPI)", ids::KPI_CPI, ids::KPI_CPI_UPD),
    ];
    for ((title, value_id, updated_id), tile) in kpis.into_iter().zip(tiles.iter()) {
        panels::render_kpi(frame, board, title, value_id, updated_id, *tile);
    }

    // Graphiques
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    panels::render_panel(frame, board, ids::LINE_CHART, "USD → MYR", charts[0]);
    panels::render_panel(frame, board, ids::BAR_CHART, "Rate vs USD", charts[1]);

    // Historique : selects puis tableau
    let history = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(rows[2]);

    render_fields(frame, app, board, &[Field::TableBase, Field::TableTarget], "Pair", history[0]);
    panels::render_panel(frame, board, ids::EXCHANGE_TABLE, "Exchange history", history[1]);
}

// ============================================================================
// Écran Converter : formulaire, graphique historique, derniers taux
// ============================================================================

fn render_converter(frame: &mut Frame, app: &App, board: &Board, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Formulaire
            Constraint::Length(5), // Résultat
            Constraint::Length(5), // Réglages du graphique
            Constraint::Min(0),    // Graphique + stats
        ])
        .split(columns[0]);

    render_fields(
        frame,
        app,
        board,
        &[Field::Amount, Field::FromCurrency, Field::ToCurrency],
        "Converter",
        left[0],
    );
    panels::render_panel(frame, board, ids::RESULT, "Result", left[1]);
    render_chart_settings(frame, app, board, left[2]);
    panels::render_panel(frame, board, ids::CHART_CONTAINER, "History", left[3]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(columns[1]);

    let rates_title = format!("Latest rates ({})", RATES_BASE);
    panels::render_panel(frame, board, ids::RATES_CONTAINER, &rates_title, right[0]);

    let updated = board.text(ids::LAST_UPDATED).unwrap_or("").to_string();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(updated, Style::default().fg(Color::Gray))))
            .alignment(Alignment::Right),
        right[1],
    );
}

/// Selects du graphique + type et période actifs
fn render_chart_settings(frame: &mut Frame, app: &App, board: &Board, area: Rect) {
    let focused = app.focused_field();
    let mut lines: Vec<Line> = [Field::ChartBase, Field::ChartTarget]
        .iter()
        .map(|field| panels::field_line(board, *field, focused == Some(*field)))
        .collect();

    let kind = board.input(ids::CHART_TYPE);
    let period = board.input(ids::CHART_PERIOD);
    let period = if period.is_empty() {
        DEFAULT_PERIOD.to_string()
    } else {
        period.to_string()
    };

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    lines.push(Line::from(vec![
        Span::raw("  Type "),
        Span::styled(kind.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" [c]", key),
        Span::raw("   Period "),
        Span::styled(format!("{} days", period), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" [p]", key),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Historical chart "),
    );
    frame.render_widget(paragraph, area);
}

/// Un bloc de champs, le champ actif mis en évidence
fn render_fields(frame: &mut Frame, app: &App, board: &Board, fields: &[Field], title: &str, area: Rect) {
    let focused = app.focused_field();
    let mut lines: Vec<Line> = fields
        .iter()
        .map(|field| panels::field_line(board, *field, focused == Some(*field)))
        .collect();

    // Le montant converti suit le formulaire du convertisseur
    if fields.contains(&Field::Amount) {
        let converted = board.input(ids::TO_AMOUNT);
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<13}", "Converted"), Style::default().fg(Color::Gray)),
            Span::styled(
                if converted.is_empty() { "--".to_string() } else { converted.to_string() },
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", title)),
    );
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : Instructions, confirmation de quit, alerte
// ============================================================================

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, board: &Board, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let line = if app.is_awaiting_quit_confirmation() {
        // CONCEPT : Style avec BLINK pour attirer l'attention
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(alert) = board.alert() {
        // L'alerte reste visible jusqu'à la prochaine touche
        Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(alert.to_string(), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        ])
    } else {
        let mut spans = vec![
            Span::styled("[q]", key),
            Span::raw(" Quit  "),
            Span::styled("[Tab]", key),
            Span::raw(" Screen  "),
            Span::styled("[r]", key),
            Span::raw(" Refresh  "),
        ];
        match app.current_screen {
            Screen::Dashboard => spans.extend([
                Span::styled("[↑↓]", key),
                Span::raw(" Field  "),
                Span::styled("[←→]", key),
                Span::raw(" Currency"),
            ]),
            Screen::Converter => spans.extend([
                Span::styled("[↑↓]", key),
                Span::raw(" Field  "),
                Span::styled("[←→]", key),
                Span::raw(" Currency  "),
                Span::styled("[0-9 .]", key),
                Span::raw(" Amount  "),
                Span::styled("[Enter]", key),
                Span::raw(" Convert  "),
                Span::styled("[s]", key),
                Span::raw(" Swap  "),
                Span::styled("[c/p]", key),
                Span::raw(" Chart"),
            ]),
            Screen::Map => spans.extend([
                Span::styled("[↑↓]", key),
                Span::raw(" Marker  "),
                Span::styled("[Esc]", key),
                Span::raw(" Reset view"),
            ]),
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Notes pédagogiques
// ============================================================================
//
// Le rendu ne modifie jamais le Board : il reçoit &Board sous le verrou,
// le temps d'un frame. Les widgets écrivent, l'UI lit.
//
// CONCEPTS RATATUI :
// - Layout imbriqués : lignes puis colonnes
// - Constraint::Ratio(1, 4) : quatre tuiles de même largeur
// - StatefulWidget (ListState) pour la liste des marqueurs (ui::map)
//
// ============================================================================
