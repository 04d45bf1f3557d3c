use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;

use crate::config::Config;
use crate::registry::Registry;
use crate::types::{ActionKind, BalanceSnapshot};

/// Last status line per dashboard action slot. Free-form text, overwritten on
/// every step of a sequence — the UI shows only the most recent one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBoard {
    pub staking: String,
    pub funding: String,
    pub withdraw_staking: String,
    pub withdraw_funding: String,
}

impl StatusBoard {
    pub fn slot(&self, action: ActionKind) -> &str {
        match action {
            ActionKind::Stake => &self.staking,
            ActionKind::Fund => &self.funding,
            ActionKind::Unstake => &self.withdraw_staking,
            ActionKind::WithdrawFunds => &self.withdraw_funding,
        }
    }

    fn slot_mut(&mut self, action: ActionKind) -> &mut String {
        match action {
            ActionKind::Stake => &mut self.staking,
            ActionKind::Fund => &mut self.funding,
            ActionKind::Unstake => &mut self.withdraw_staking,
            ActionKind::WithdrawFunds => &mut self.withdraw_funding,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventEntry {
    pub ts: String,
    pub kind: String,
    pub detail: String,
}

const MAX_EVENTS: usize = 200;

pub struct AppState {
    pub config: RwLock<Config>,
    pub registry: Registry,
    pub status: RwLock<StatusBoard>,
    pub balances: RwLock<BalanceSnapshot>,
    pub events: Mutex<VecDeque<EventEntry>>,
}

impl AppState {
    pub fn new(config: Config, registry: Registry) -> Arc<Self> {
        Arc::new(Self {
            config: RwLock::new(config),
            registry,
            status: RwLock::new(StatusBoard::default()),
            balances: RwLock::new(BalanceSnapshot::default()),
            events: Mutex::new(VecDeque::with_capacity(MAX_EVENTS)),
        })
    }

    pub fn set_status(&self, action: ActionKind, text: &str) {
        *self.status.write().unwrap().slot_mut(action) = text.to_string();
    }

    pub fn status(&self, action: ActionKind) -> String {
        self.status.read().unwrap().slot(action).to_string()
    }

    pub fn set_balances(&self, snapshot: BalanceSnapshot) {
        *self.balances.write().unwrap() = snapshot;
    }

    pub fn balances(&self) -> BalanceSnapshot {
        *self.balances.read().unwrap()
    }

    pub fn push_event(&self, kind: &str, detail: &str) {
        let entry = EventEntry {
            ts: chrono::Utc::now().format("%H:%M:%S").to_string(),
            kind: kind.to_string(),
            detail: detail.to_string(),
        };
        let mut events = self.events.lock().unwrap();
        if events.len() >= MAX_EVENTS {
            events.pop_front();
        }
        events.push_back(entry);
    }
}
