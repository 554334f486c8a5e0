// ============================================================================
// Map - Carte des devises
// ============================================================================
// Liste des marqueurs à gauche, carte du monde à droite (Canvas ratatui).
// Le marqueur sélectionné est mis en évidence et affiche son infobulle.
//
// CONCEPTS RATATUI :
// 1. Canvas : surface de dessin en coordonnées réelles (longitude, latitude)
// 2. Map : fond de carte du monde intégré à ratatui
// 3. Layers : les marqueurs sont dessinés au-dessus du fond
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, List, ListItem, ListState,
    },
    Frame,
};

use crate::app::App;
use crate::models::map::DEFAULT_ZOOM;
use crate::models::MARKERS;

const MARKER_COLOR: Color = Color::Rgb(102, 126, 234);
const SELECTED_COLOR: Color = Color::Yellow;

/// Fenêtre visible (x = longitude, y = latitude) pour un centre et un zoom
///
/// Au zoom par défaut on voit le monde entier ; chaque niveau divise
/// l'étendue par deux.
pub fn view_bounds(center: (f64, f64), zoom: u8) -> ([f64; 2], [f64; 2]) {
    let (lat, lon) = center;
    let factor = 2f64.powi(i32::from(zoom.saturating_sub(DEFAULT_ZOOM)));
    let half_width = 180.0 / factor;
    let half_height = 90.0 / factor;

    (
        [lon - half_width, lon + half_width],
        [lat - half_height, lat + half_height],
    )
}

/// Dessine l'écran carte
pub fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    render_marker_list(frame, app, chunks[0]);
    render_world(frame, app, chunks[1]);
}

fn render_marker_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = MARKERS
        .iter()
        .map(|marker| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<4}", marker.currency), Style::default().fg(Color::Yellow)),
                Span::raw(marker.name),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Currencies "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    // CONCEPT RATATUI : StatefulWidget
    // - ListState garde la sélection et le défilement
    let mut state = ListState::default().with_selected(app.selected_marker_index());
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_world(frame: &mut Frame, app: &App, area: Rect) {
    let (center, zoom) = app.map_view();
    let (x_bounds, y_bounds) = view_bounds(center, zoom);
    let selected = app.selected_marker();

    let title = match selected {
        Some(marker) => format!(" {} ", marker.tooltip()),
        None => format!(" World (zoom {}) ", zoom),
    };

    let others: Vec<(f64, f64)> = MARKERS
        .iter()
        .filter(|m| selected != Some(*m))
        .map(|m| (m.coordinates.1, m.coordinates.0))
        .collect();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();

            ctx.draw(&Points {
                coords: &others,
                color: MARKER_COLOR,
            });

            if let Some(marker) = selected {
                let (lat, lon) = marker.coordinates;
                ctx.draw(&Points {
                    coords: &[(lon, lat)],
                    color: SELECTED_COLOR,
                });
                ctx.print(
                    lon,
                    lat,
                    Line::from(Span::styled(
                        format!(" {}", marker.tooltip()),
                        Style::default().fg(SELECTED_COLOR).add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::map::DEFAULT_CENTER;

    #[test]
    fn test_default_view_shows_whole_world() {
        let (x, y) = view_bounds(DEFAULT_CENTER, DEFAULT_ZOOM);
        assert_eq!(x, [-180.0, 180.0]);
        assert_eq!(y, [-70.0, 110.0]);
    }

    #[test]
    fn test_zoom_halves_extent() {
        let (x, y) = view_bounds((0.0, 100.0), DEFAULT_ZOOM + 2);
        assert_eq!(x, [55.0, 145.0]);
        assert_eq!(y, [-22.5, 22.5]);
    }
}
