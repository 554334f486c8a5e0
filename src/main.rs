// ============================================================================
// LazyFX - Tableau de bord des taux de change
// ============================================================================
// Programme TUI : KPI, graphiques, convertisseur, historique, carte
//
// ARCHITECTURE :
// - Thread UI (ce thread) : dessine le Board et traite le clavier
// - Thread worker : runtime tokio qui fait tourner l'ordonnanceur des widgets
// - Les deux partagent le Board (Arc<Mutex<Board>>)
// - L'UI envoie des WorkerCommand au worker via un channel tokio
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : runtime tokio dédié dans un thread
// 4. Channels : l'UI ne bloque jamais sur le réseau
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use lazyfx::api::{FastForexClient, FrankfurterClient, RateSource, ReferenceSource};
use lazyfx::app::{App, Field, Screen};
use lazyfx::board::{ids, lock_board, Board, SharedBoard};
use lazyfx::config::Config;
use lazyfx::models::ChartKind;
use lazyfx::refresh::Scheduler;
use lazyfx::ui::events::{
    get_char_from_event, is_amount_char_event, is_backspace_event, is_chart_type_event,
    is_down_event, is_enter_event, is_escape_event, is_left_event, is_period_event, is_quit_event,
    is_refresh_event, is_right_event, is_swap_event, is_tab_event, is_up_event, Event,
    EventHandler,
};
use lazyfx::ui::render;
use lazyfx::widgets::{converter, dashboard_widgets, history_chart, WidgetId};

// ============================================================================
// WorkerCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker
// - Le worker déclenche les rafraîchissements dans son runtime
// ============================================================================

/// Commandes envoyées au worker
#[derive(Debug, Clone, Copy)]
enum WorkerCommand {
    /// Rafraîchit un widget maintenant (changement d'entrée)
    Trigger(WidgetId),

    /// Rafraîchit tous les widgets (touche [r])
    RefreshAll,

    /// Arrête les boucles et libère les graphiques
    Shutdown,
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `LAZYFX_LOG_DIR` (par défaut :
/// ~/.local/share/lazyfx/logs/lazyfx.log sous Linux)
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyfx/logs/lazyfx.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=lazyfx=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "lazyfx.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyfx, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyfx=debug,info".into()),
        )
        .try_init()
        .context("Un subscriber tracing est déjà installé")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Config d'abord : une erreur s'affiche avant le passage en mode TUI
    let config = Config::from_env().context("Configuration invalide")?;

    // Logging ensuite ; s'il échoue, on continue sans
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "LazyFX starting up");

    let board = Board::with_defaults().shared();

    // CONCEPT RUST : unbounded_channel
    // - send() est synchrone : utilisable depuis le thread UI
    // - recv() est async : attendu dans le runtime du worker
    let (command_tx, command_rx) = mpsc::unbounded_channel::<WorkerCommand>();
    let worker = spawn_worker(&config, board.clone(), command_rx)?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &board, &events, &command_tx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Arrête le worker : annule les boucles, attend les tâches, libère les graphiques
    if command_tx.send(WorkerCommand::Shutdown).is_err() {
        warn!("Worker already stopped");
    }
    if worker.join().is_err() {
        error!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Sources de données
// ============================================================================

/// FastForex si une clé est configurée, Frankfurter sinon
///
/// Le graphique historique, la grille et le catalogue utilisent toujours
/// Frankfurter (sans clé).
fn build_sources(config: &Config) -> Result<(Arc<dyn RateSource>, Arc<dyn ReferenceSource>)> {
    let frankfurter = Arc::new(FrankfurterClient::new(config.frankfurter_base_url.clone())?);

    let rates: Arc<dyn RateSource> = match &config.fastforex_api_key {
        Some(key) => {
            info!(base_url = %config.fastforex_base_url, "Live rates from FastForex");
            Arc::new(FastForexClient::new(config.fastforex_base_url.clone(), key.clone())?)
        }
        None => {
            warn!("FASTFOREX_API_KEY not set, live rates from Frankfurter");
            let fallback: Arc<dyn RateSource> = frankfurter.clone();
            fallback
        }
    };

    let reference: Arc<dyn ReferenceSource> = frankfurter;
    Ok((rates, reference))
}

// ============================================================================
// Worker thread
// ============================================================================
// CONCEPT RUST : Thread + runtime current_thread
// - std::thread::Builder : thread OS nommé (visible dans les logs)
// - Runtime current_thread : toutes les tâches des widgets tournent ici
// - block_on : le thread vit tant que la boucle de commandes tourne
// ============================================================================

fn spawn_worker(
    config: &Config,
    board: SharedBoard,
    mut commands: UnboundedReceiver<WorkerCommand>,
) -> Result<JoinHandle<()>> {
    let (rates, reference) = build_sources(config)?;
    let periods = config.periods.clone();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio")?;

    let handle = std::thread::Builder::new()
        .name("lazyfx-worker".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                let scheduler = Scheduler::start(dashboard_widgets(rates, reference, board, &periods));
                info!(widgets = ?scheduler.widget_ids(), "Scheduler started");

                while let Some(command) = commands.recv().await {
                    debug!(?command, "Worker received command");
                    match command {
                        WorkerCommand::Trigger(id) => {
                            if !scheduler.trigger(id) {
                                warn!(?id, "Trigger for unknown widget");
                            }
                        }
                        WorkerCommand::RefreshAll => scheduler.trigger_all(),
                        WorkerCommand::Shutdown => break,
                    }
                }

                scheduler.shutdown().await;
                info!("Worker stopped");
            });
        })
        .context("Échec du lancement du worker")?;

    Ok(handle)
}

// ============================================================================
// Event loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    board: &SharedBoard,
    events: &EventHandler,
    commands: &UnboundedSender<WorkerCommand>,
) -> Result<()> {
    while app.is_running() {
        // Le verrou n'est tenu que le temps du dessin
        terminal.draw(|frame| {
            let board = lock_board(board);
            render(frame, app, &board);
        })?;

        match events.next() {
            Ok(event) => handle_event(app, board, event, commands),
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

/// Envoie une commande au worker ; un worker arrêté n'est pas fatal pour l'UI
fn send(commands: &UnboundedSender<WorkerCommand>, command: WorkerCommand) {
    if commands.send(command).is_err() {
        error!(?command, "Worker disconnected, command dropped");
    }
}

/// Traite un événement clavier
///
/// CONCEPT : Les entrées vivent dans le Board
/// - L'UI modifie l'input (devise, montant, type, période)
/// - puis déclenche le widget concerné, qui relira le Board
fn handle_event(
    app: &mut App,
    board: &SharedBoard,
    event: Event,
    commands: &UnboundedSender<WorkerCommand>,
) {
    let Event::Key(_) = event else {
        return;
    };

    // CONCEPT : Two-step quit
    if is_quit_event(&event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return;
    }

    // Toute autre touche annule la confirmation et ferme l'alerte
    app.cancel_quit();
    lock_board(board).clear_alert();

    let screen = app.current_screen;
    let field = app.focused_field();

    if is_tab_event(&event) {
        app.next_screen();
        debug!(screen = ?app.current_screen, "User switched screen");
    } else if is_refresh_event(&event) {
        info!("User requested full refresh");
        send(commands, WorkerCommand::RefreshAll);
    } else if screen == Screen::Map {
        if is_up_event(&event) {
            app.select_previous_marker();
        } else if is_down_event(&event) {
            app.select_next_marker();
        } else if is_escape_event(&event) {
            app.reset_map_view();
        }
    } else if is_up_event(&event) {
        app.focus_previous();
    } else if is_down_event(&event) {
        app.focus_next();
    } else if is_left_event(&event) || is_right_event(&event) {
        let Some(field) = field.filter(|f| f.is_currency()) else {
            return;
        };
        let forward = is_right_event(&event);
        let selected = lock_board(board).cycle_currency(field.element_id(), forward);
        debug!(?field, ?selected, "User changed currency");
        send(commands, WorkerCommand::Trigger(field.widget()));
    } else if screen == Screen::Converter {
        handle_converter_key(board, field, &event, commands);
    }
}

/// Touches propres à l'écran convertisseur : montant, conversion, swap,
/// type et période du graphique
fn handle_converter_key(
    board: &SharedBoard,
    field: Option<Field>,
    event: &Event,
    commands: &UnboundedSender<WorkerCommand>,
) {
    let amount_focused = field == Some(Field::Amount);

    if amount_focused && is_amount_char_event(event) {
        if let Some(c) = get_char_from_event(event) {
            let mut board = lock_board(board);
            let amount = format!("{}{}", board.input(ids::FROM_AMOUNT), c);
            board.set_input(ids::FROM_AMOUNT, amount);
        }
        send(commands, WorkerCommand::Trigger(WidgetId::Converter));
    } else if amount_focused && is_backspace_event(event) {
        {
            let mut board = lock_board(board);
            let mut amount = board.input(ids::FROM_AMOUNT).to_string();
            amount.pop();
            board.set_input(ids::FROM_AMOUNT, amount);
        }
        send(commands, WorkerCommand::Trigger(WidgetId::Converter));
    } else if is_enter_event(event) {
        send(commands, WorkerCommand::Trigger(WidgetId::Converter));
    } else if is_swap_event(event) {
        converter::swap_currencies(&mut lock_board(board));
        info!("User swapped converter currencies");
        send(commands, WorkerCommand::Trigger(WidgetId::Converter));
    } else if is_chart_type_event(event) {
        {
            let mut board = lock_board(board);
            let kind = ChartKind::from_label(board.input(ids::CHART_TYPE))
                .unwrap_or_default()
                .next();
            board.set_input(ids::CHART_TYPE, kind.label());
            info!(kind = kind.label(), "User changed chart type");
        }
        send(commands, WorkerCommand::Trigger(WidgetId::HistoryChart));
    } else if is_period_event(event) {
        {
            let mut board = lock_board(board);
            let days = board
                .input(ids::CHART_PERIOD)
                .parse::<u32>()
                .unwrap_or(history_chart::DEFAULT_PERIOD);
            let next = history_chart::next_period(days);
            board.set_input(ids::CHART_PERIOD, next.to_string());
            info!(days = next, "User changed chart period");
        }
        send(commands, WorkerCommand::Trigger(WidgetId::HistoryChart));
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI
///
/// CONCEPT : Raw mode
/// - Désactive le buffering ligne par ligne
/// - Chaque touche est lue immédiatement
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);

    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}

// ============================================================================
// Notes pédagogiques
// ============================================================================
//
// POURQUOI UN RUNTIME current_thread DANS UN THREAD DÉDIÉ ?
// - L'event loop crossterm est bloquante (poll 250ms)
// - Les widgets sont async (reqwest, timers)
// - Un thread + runtime séparés : l'UI reste fluide pendant les requêtes
//
// CYCLE DE VIE :
// 1. Config → logging → Board → worker (Scheduler::start)
// 2. Event loop : draw sous verrou, handle_event, triggers
// 3. Quit : restore terminal → Shutdown → scheduler.shutdown() → join
//
// ============================================================================
