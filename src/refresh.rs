// ============================================================================
// Dashboard Refresh Loop
// ============================================================================
// Chaque widget a sa propre boucle :
// 1. un rendu immédiat au démarrage
// 2. puis un rendu toutes les `period` (si le widget en a une)
//
// Chaque tick lance une tâche de rafraîchissement indépendante : un widget
// bloqué sur une requête ne bloque ni les autres widgets, ni son propre
// tick suivant. La dernière tâche terminée gagne.
//
// CONCEPTS RUST :
// 1. tokio::select! : attendre le tick OU l'annulation
// 2. tokio::sync::watch : un booléen observable, base du CancelToken
// 3. Arc<dyn Widget> : chaque tâche détachée garde le widget en vie
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::widgets::WidgetId;

// ============================================================================
// Trait Widget
// ============================================================================

/// Un élément du dashboard qui sait se rafraîchir
///
/// `refresh` ne retourne jamais d'erreur : un widget dégrade son affichage
/// ("N/A", panneau d'erreur) au lieu d'échouer.
#[async_trait]
pub trait Widget: Send + Sync {
    fn id(&self) -> WidgetId;

    /// Période de rafraîchissement ; None = un rendu puis à la demande
    fn period(&self) -> Option<Duration>;

    async fn refresh(&self);

    /// Libère les ressources (graphique monté) ; aucun rendu ne suit
    fn dispose(&self) {}
}

// ============================================================================
// CancelToken
// ============================================================================

/// Jeton d'annulation clonable
///
/// CONCEPT : watch channel
/// - Le Sender garde la dernière valeur, chaque clone peut s'y abonner
/// - cancelled() se réveille dès que la valeur passe à true
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Attend l'annulation (retourne tout de suite si déjà annulé)
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // Le Sender vit dans self : wait_for ne peut pas échouer ici
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Boucle par widget
// ============================================================================

/// Lance un rafraîchissement détaché
fn spawn_refresh(widget: Arc<dyn Widget>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let id = widget.id();
        debug!(widget = ?id, "Refresh started");
        widget.refresh().await;
        debug!(widget = ?id, "Refresh finished");
    })
}

/// Démarre la boucle de rafraîchissement d'un widget
///
/// CONCEPT : interval_at
/// - Le premier tick arrive après `period` (le rendu immédiat est fait à part)
/// - MissedTickBehavior::Delay : pas de rafale de ticks après un ralentissement
pub fn spawn_refresh_loop(widget: Arc<dyn Widget>, cancel: CancelToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        spawn_refresh(widget.clone());

        let Some(period) = widget.period() else {
            cancel.cancelled().await;
            return;
        };

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    spawn_refresh(widget.clone());
                }
            }
        }

        debug!(widget = ?widget.id(), "Refresh loop stopped");
    })
}

// ============================================================================
// Scheduler : toutes les boucles du dashboard
// ============================================================================

struct Entry {
    widget: Arc<dyn Widget>,
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Propriétaire des boucles de rafraîchissement
///
/// Doit être créé depuis un contexte tokio (tokio::spawn).
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    /// Démarre une boucle par widget
    pub fn start(widgets: Vec<Arc<dyn Widget>>) -> Self {
        let entries = widgets
            .into_iter()
            .map(|widget| {
                let cancel = CancelToken::new();
                let handle = spawn_refresh_loop(widget.clone(), cancel.clone());
                Entry {
                    widget,
                    cancel,
                    handle,
                }
            })
            .collect::<Vec<_>>();

        info!(widgets = entries.len(), "Refresh loops started");
        Self { entries }
    }

    /// Rafraîchissement à la demande d'un widget (événement UI)
    ///
    /// Retourne false si le widget est inconnu ou déjà arrêté.
    pub fn trigger(&self, id: WidgetId) -> bool {
        match self.entries.iter().find(|e| e.widget.id() == id) {
            Some(entry) if !entry.cancel.is_cancelled() => {
                spawn_refresh(entry.widget.clone());
                true
            }
            _ => {
                warn!(widget = ?id, "Trigger ignored: widget not running");
                false
            }
        }
    }

    /// Rafraîchit tous les widgets
    pub fn trigger_all(&self) {
        for entry in &self.entries {
            if !entry.cancel.is_cancelled() {
                spawn_refresh(entry.widget.clone());
            }
        }
    }

    pub fn widget_ids(&self) -> Vec<WidgetId> {
        self.entries.iter().map(|e| e.widget.id()).collect()
    }

    /// Annule toutes les boucles, attend leur arrêt puis dispose les widgets
    ///
    /// Les requêtes déjà en vol ne sont pas interrompues.
    pub async fn shutdown(self) {
        for entry in &self.entries {
            entry.cancel.cancel();
        }

        for entry in self.entries {
            if let Err(e) = entry.handle.await {
                warn!(widget = ?entry.widget.id(), error = %e, "Refresh loop ended abnormally");
            }
            entry.widget.dispose();
        }

        info!("Refresh loops stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Widget qui compte ses rafraîchissements ; peut rester bloqué
    struct Probe {
        id: WidgetId,
        period: Option<Duration>,
        refreshes: AtomicUsize,
        completed: AtomicUsize,
        hang: bool,
        disposed: AtomicBool,
    }

    impl Probe {
        fn new(id: WidgetId, period: Option<Duration>, hang: bool) -> Arc<Self> {
            Arc::new(Self {
                id,
                period,
                refreshes: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                hang,
                disposed: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl Widget for Probe {
        fn id(&self) -> WidgetId {
            self.id
        }

        fn period(&self) -> Option<Duration> {
            self.period
        }

        async fn refresh(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
        }

        fn dispose(&self) {
            self.disposed.store(true, Ordering::SeqCst);
        }
    }

    /// Laisse tourner les tâches prêtes sans avancer l'horloge
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_render_then_periodic() {
        let probe = Probe::new(WidgetId::FxKpi, Some(Duration::from_secs(60)), false);
        let scheduler = Scheduler::start(vec![probe.clone()]);

        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(59)).await;
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 4);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_widget_blocks_nothing() {
        let hung = Probe::new(WidgetId::TrendChart, Some(Duration::from_secs(10)), true);
        let healthy = Probe::new(WidgetId::FxKpi, Some(Duration::from_secs(10)), false);
        let scheduler = Scheduler::start(vec![hung.clone(), healthy.clone()]);

        tokio::time::sleep(Duration::from_secs(35)).await;
        settle().await;

        // Le widget sain continue à son rythme
        assert_eq!(healthy.completed.load(Ordering::SeqCst), 4);
        // Le widget bloqué relance quand même un rafraîchissement à chaque tick
        assert_eq!(hung.refreshes.load(Ordering::SeqCst), 4);
        assert_eq!(hung.completed.load(Ordering::SeqCst), 0);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks_and_disposes() {
        let probe = Probe::new(WidgetId::PairsChart, Some(Duration::from_secs(5)), false);
        let scheduler = Scheduler::start(vec![probe.clone()]);

        tokio::time::sleep(Duration::from_secs(11)).await;
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 3);

        scheduler.shutdown().await;
        assert!(probe.disposed.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_demand_widget_renders_once_then_on_trigger() {
        let probe = Probe::new(WidgetId::Converter, None, false);
        let scheduler = Scheduler::start(vec![probe.clone()]);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 1);

        assert!(scheduler.trigger(WidgetId::Converter));
        assert!(!scheduler.trigger(WidgetId::RatesGrid));
        settle().await;
        assert_eq!(probe.completed.load(Ordering::SeqCst), 2);

        scheduler.shutdown().await;
        assert!(probe.disposed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_token() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        let waiter = tokio::spawn(async move { clone.cancelled().await });
        token.cancel();
        waiter.await.unwrap();

        assert!(token.is_cancelled());
        // Déjà annulé : retour immédiat
        token.cancelled().await;
    }
}
