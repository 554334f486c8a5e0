// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;           // Gestion des événements clavier
pub mod dashboard;        // Router des écrans, header, footer
pub mod panels;           // Rendu des éléments du board
pub mod chart;            // Rendu d'un ChartConfig (ligne, barres)
pub mod candlestick_text; // Rendu des chandeliers (Unicode text)
pub mod map;              // Carte des devises

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
