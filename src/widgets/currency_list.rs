// ============================================================================
// Widget : catalogue des devises
// ============================================================================
// Chargé une fois au démarrage ; alimente les options des selects.
// En cas d'échec, les selects gardent la liste de repli du board.
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::WidgetId;
use crate::api::ReferenceSource;
use crate::board::{lock_board, SharedBoard};
use crate::refresh::Widget;

pub struct CurrencyListWidget {
    reference: Arc<dyn ReferenceSource>,
    board: SharedBoard,
}

impl CurrencyListWidget {
    pub fn new(reference: Arc<dyn ReferenceSource>, board: SharedBoard) -> Self {
        Self { reference, board }
    }
}

#[async_trait]
impl Widget for CurrencyListWidget {
    fn id(&self) -> WidgetId {
        WidgetId::CurrencyList
    }

    fn period(&self) -> Option<Duration> {
        None
    }

    async fn refresh(&self) {
        match self.reference.list_currencies().await {
            Some(currencies) if !currencies.is_empty() => {
                info!(count = currencies.len(), "Currency catalogue loaded");
                lock_board(&self.board).set_currencies(currencies);
            }
            _ => warn!("Currency catalogue unavailable, keeping fallback list"),
        }
    }
}
