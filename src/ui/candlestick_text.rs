// ============================================================================
// Candlestick Chart - Rendu texte ligne par ligne
// ============================================================================
// Dessine des chandeliers journaliers avec des caractères Unicode, dans un
// Paragraph ratatui
//
// ALGORITHME :
// - Rendu vertical : ligne par ligne de haut en bas
// - Pour chaque ligne, on détermine quel caractère Unicode afficher
// - Logique des 3 zones : mèche supérieure, corps, mèche inférieure
// - Seuils fractionnaires (0.25, 0.75) pour précision sub-caractère
//
// CARACTÈRES UNICODE :
// ┃ Corps plein          │ Mèche pleine
// ╻ Demi-corps (bas)     ╹ Demi-corps (haut)
// ╽ Transition top       ╿ Transition bottom
// ╷ Demi-mèche sup       ╵ Demi-mèche inf
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Candle;

// ============================================================================
// Constantes
// ============================================================================

const UNICODE_VOID: char = ' ';
const UNICODE_BODY: char = '┃';              // Corps plein
const UNICODE_HALF_BODY_BOTTOM: char = '╻';  // Corps avec espace en bas
const UNICODE_HALF_BODY_TOP: char = '╹';     // Corps avec espace en haut
const UNICODE_WICK: char = '│';              // Mèche pleine
const UNICODE_TOP: char = '╽';               // Transition corps→mèche (haut)
const UNICODE_BOTTOM: char = '╿';            // Transition corps→mèche (bas)
const UNICODE_UPPER_WICK: char = '╷';        // Demi-mèche supérieure
const UNICODE_LOWER_WICK: char = '╵';        // Demi-mèche inférieure

/// Couleurs pour chandeliers haussiers et baissiers
pub const BULLISH_COLOR: Color = Color::Rgb(52, 208, 88);   // Vert
pub const BEARISH_COLOR: Color = Color::Rgb(234, 74, 90);   // Rouge

/// Largeur de l'axe Y : les taux ont 4 décimales
const Y_AXIS_WIDTH: u16 = 12;

/// Lignes réservées à l'axe X (ticks + dates) et aux bordures
const X_AXIS_LINES: u16 = 2;
const BORDER_LINES: u16 = 2;

/// Largeur d'un label de date "DD/MM"
const DATE_LABEL_WIDTH: usize = 5;

// ============================================================================
// Structure principale
// ============================================================================

/// Renderer de chandeliers en mode texte
pub struct CandlestickRenderer<'a> {
    candles: &'a [Candle],
    min_rate: f64,
    max_rate: f64,
    height: u16,
    width: u16,
}

impl<'a> CandlestickRenderer<'a> {
    /// Crée un renderer pour la zone intérieure (sans bordures) `area`
    pub fn new(candles: &'a [Candle], area: Rect) -> Self {
        let (min_rate, max_rate) = Self::compute_bounds(candles);

        Self {
            candles,
            min_rate,
            max_rate,
            height: area.height.saturating_sub(X_AXIS_LINES),
            width: area.width.saturating_sub(Y_AXIS_WIDTH),
        }
    }

    /// Bornes min/max des mèches, avec une marge de 2%
    fn compute_bounds(candles: &[Candle]) -> (f64, f64) {
        let max_rate = candles.iter().fold(f64::NEG_INFINITY, |max, c| max.max(c.high));
        let min_rate = candles.iter().fold(f64::INFINITY, |min, c| min.min(c.low));

        let margin = (max_rate - min_rate) * 0.02;
        ((min_rate - margin).max(0.0), max_rate + margin)
    }

    /// Convertit un taux en coordonnée de hauteur
    fn rate_to_height(&self, rate: f64) -> f64 {
        if self.max_rate == self.min_rate {
            return self.height as f64 / 2.0;
        }

        (rate - self.min_rate) / (self.max_rate - self.min_rate) * self.height as f64
    }

    fn candle_color(candle: &Candle) -> Color {
        if candle.is_bullish() {
            BULLISH_COLOR
        } else {
            BEARISH_COLOR
        }
    }

    /// Caractère d'un chandelier à une hauteur donnée
    fn render_candle(&self, candle: &Candle, y: u16) -> char {
        let height_unit = y as f64;

        let high_y = self.rate_to_height(candle.high);
        let low_y = self.rate_to_height(candle.low);
        let max_y = self.rate_to_height(candle.open.max(candle.close));
        let min_y = self.rate_to_height(candle.close.min(candle.open));

        let mut output = UNICODE_VOID;

        // ZONE 1 : Mèche supérieure (high → max)
        if high_y.ceil() >= height_unit && height_unit >= max_y.floor() {
            if max_y - height_unit > 0.75 {
                output = UNICODE_BODY;
            } else if (max_y - height_unit) > 0.25 {
                if (high_y - height_unit) > 0.75 {
                    output = UNICODE_TOP;
                } else {
                    output = UNICODE_HALF_BODY_BOTTOM;
                }
            } else if (high_y - height_unit) > 0.75 {
                output = UNICODE_WICK;
            } else if (high_y - height_unit) > 0.25 {
                output = UNICODE_UPPER_WICK;
            }
        }
        // ZONE 2 : Corps (min → max)
        else if max_y.floor() >= height_unit && height_unit >= min_y.ceil() {
            output = UNICODE_BODY;
        }
        // ZONE 3 : Mèche inférieure (min → low)
        else if min_y.ceil() >= height_unit && height_unit >= low_y.floor() {
            if (min_y - height_unit) < 0.25 {
                output = UNICODE_BODY;
            } else if (min_y - height_unit) < 0.75 {
                if (low_y - height_unit) < 0.25 {
                    output = UNICODE_BOTTOM;
                } else {
                    output = UNICODE_HALF_BODY_TOP;
                }
            } else if low_y - height_unit < 0.25 {
                output = UNICODE_WICK;
            } else if low_y - height_unit < 0.75 {
                output = UNICODE_LOWER_WICK;
            }
        }

        // Chandelier plat (open == close == high == low) : un trait de corps
        if output == UNICODE_VOID && candle.high == candle.low && high_y.round() as u16 == y {
            output = UNICODE_BODY;
        }

        output
    }

    /// Une ligne de l'axe Y ; taux affiché toutes les 4 lignes
    fn render_y_axis(&self, y: u16) -> String {
        if y % 4 == 0 {
            let rate = self.min_rate + (y as f64 * (self.max_rate - self.min_rate) / self.height as f64);
            format!("{:>9.4} │ ", rate)
        } else {
            format!("{:>9} │ ", "")
        }
    }

    /// Les N derniers chandeliers qui tiennent dans la largeur
    fn visible_candles(&self) -> &'a [Candle] {
        let max_visible = self.width as usize;
        if self.candles.len() <= max_visible {
            self.candles
        } else {
            &self.candles[self.candles.len() - max_visible..]
        }
    }

    /// Espacement entre chandeliers pour remplir toute la largeur
    fn spacing(&self, count: usize) -> f64 {
        if count > 1 {
            self.width as f64 / count as f64
        } else {
            1.0
        }
    }

    /// Génère toutes les lignes du graphique (chandeliers + axe X)
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let visible = self.visible_candles();

        if visible.is_empty() || self.height == 0 {
            return lines;
        }

        let spacing = self.spacing(visible.len());
        let gap = (spacing - 1.0).round() as usize;

        for y in (1..=self.height).rev() {
            let mut spans = vec![Span::styled(self.render_y_axis(y), Style::default().fg(Color::Gray))];

            for (i, candle) in visible.iter().enumerate() {
                let ch = self.render_candle(candle, y);
                spans.push(Span::styled(ch.to_string(), Style::default().fg(Self::candle_color(candle))));

                if i < visible.len() - 1 && gap > 0 {
                    spans.push(Span::raw(" ".repeat(gap)));
                }
            }

            lines.push(Line::from(spans));
        }

        lines.extend(self.render_x_axis(visible, spacing));
        lines
    }

    /// Axe X : ticks puis dates "DD/MM", sans chevauchement
    fn render_x_axis(&self, visible: &[Candle], spacing: f64) -> Vec<Line<'static>> {
        let max_labels = (self.width as usize / (DATE_LABEL_WIDTH + 2)).clamp(2, 10);
        let label_interval = if visible.len() <= max_labels {
            1
        } else {
            visible.len() / max_labels
        };
        let gap = (spacing - 1.0).round() as usize;
        let padding = " ".repeat(Y_AXIS_WIDTH as usize);

        // Ligne 1 : ticks
        let mut tick_spans = vec![Span::raw(padding.clone())];
        for i in 0..visible.len() {
            let tick = if i % label_interval == 0 { "│" } else { " " };
            tick_spans.push(Span::styled(tick, Style::default().fg(Color::Gray)));
            if i < visible.len() - 1 && gap > 0 {
                tick_spans.push(Span::raw(" ".repeat(gap)));
            }
        }

        // Ligne 2 : dates
        let mut label_spans = vec![Span::raw(padding)];
        let mut position = 0.0;
        for (i, candle) in visible.iter().enumerate() {
            if i % label_interval != 0 {
                continue;
            }
            let label = candle.date.format("%d/%m").to_string();
            let label_len = label.len() as f64;
            label_spans.push(Span::styled(label, Style::default().fg(Color::Gray)));

            let next_position = if i + label_interval < visible.len() {
                (i + label_interval) as f64 * spacing
            } else {
                self.width as f64
            };
            let space_to_next = (next_position - position - label_len).max(0.0) as usize;
            if space_to_next > 0 {
                label_spans.push(Span::raw(" ".repeat(space_to_next)));
            }
            position = next_position;
        }

        vec![Line::from(tick_spans), Line::from(label_spans)]
    }
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine des chandeliers dans un bloc titré
pub fn render_candlestick_chart(frame: &mut Frame, title: &str, candles: &[Candle], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", title));

    if candles.is_empty() {
        let paragraph = Paragraph::new("Pas de chandeliers à afficher")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = Rect {
        width: area.width.saturating_sub(BORDER_LINES),
        height: area.height.saturating_sub(BORDER_LINES),
        ..area
    };
    let renderer = CandlestickRenderer::new(candles, inner);
    let paragraph = Paragraph::new(renderer.render_lines()).block(block);

    frame.render_widget(paragraph, area);
}


// ============================================================================
// Notes d'implémentation
// ============================================================================
//
// PRINCIPE :
// - Rendu ligne par ligne de haut en bas (reversed)
// - 3 zones : mèche sup, corps, mèche inf
// - Seuils 0.25 et 0.75 pour sub-caractère précision
//
// Un chandelier dérivé de deux taux consécutifs n'a pas de mèche :
// high et low sont le max et le min de open/close.
// ============================================================================
