// ============================================================================
// LazyFX - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod api;     // Sources de taux (FastForex, Frankfurter)
pub mod app;     // État de navigation de l'interface
pub mod board;   // Surface d'affichage partagée
pub mod config;  // Configuration (env + .env)
pub mod models;  // Structures de données
pub mod refresh; // Widgets et ordonnanceur de rafraîchissement
pub mod series;  // Séries journalières glissantes
pub mod ui;      // Interface utilisateur
pub mod widgets; // Adaptateurs de rendu
