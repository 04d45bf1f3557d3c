use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::bot::ChainOps;
use crate::state::AppState;
use crate::types::{to_base_units, ActionKind};

pub const GENERIC_ERROR: &str = "An error occured :(";
const APPROVING: &str = "Approving...";
const APPROVED: &str = "Approved!";

#[derive(Debug, Error)]
pub enum SequenceError {
    /// Input rejected before anything was submitted
    #[error("{0}")]
    Rejected(String),
    /// A chain step failed; earlier steps may already be mined
    #[error(transparent)]
    Chain(#[from] anyhow::Error),
}

/// Run one user action end to end: validate, approve if the action deposits a
/// token, submit the bot call, then refresh the displayed balances. Statuses
/// land on the action's dashboard slot as each step starts and finishes.
///
/// There is no retry and no reconciliation: a failure after a mined approval
/// leaves the allowance granted and the user retries by hand.
pub async fn run(
    state: &AppState,
    chain: &dyn ChainOps,
    action: ActionKind,
    amount: Option<&str>,
) -> Result<(), SequenceError> {
    match action.token() {
        Some(token) => {
            let amount = match amount.and_then(parse_amount) {
                Some(a) => a,
                None => return Err(reject(state, action)),
            };
            let base = match to_base_units(amount, token.decimals()) {
                Ok(b) => b,
                Err(_) => return Err(reject(state, action)),
            };

            state.set_status(action, APPROVING);
            if let Err(e) = chain.approve(token, base).await {
                return Err(fail(state, action, "approval", e));
            }
            state.set_status(action, APPROVED);
            state.push_event("tx", &format!("{token} approval confirmed"));

            settle_pause(state).await;

            state.set_status(action, action.pending_label());
            if let Err(e) = chain.execute(action, Some(base)).await {
                return Err(fail(state, action, action.method(), e));
            }
            state.set_status(action, action.done_label());
            state.push_event("tx", &format!("{amount} {token} {action} confirmed"));
        }
        None => {
            state.set_status(action, action.pending_label());
            if let Err(e) = chain.execute(action, None).await {
                return Err(fail(state, action, action.method(), e));
            }
            state.set_status(action, action.done_label());
            state.push_event("tx", &format!("{action} confirmed"));
        }
    }

    refresh_balances(state, chain).await;
    Ok(())
}

/// Re-read both contract balance fields into display state. A refresh failure
/// after a fully mined sequence keeps the completion status and only logs.
pub async fn refresh_balances(state: &AppState, chain: &dyn ChainOps) {
    match chain.balances().await {
        Ok(snapshot) => {
            tracing::debug!(staking = %snapshot.staking, funding = %snapshot.funding, "balances refreshed");
            state.set_balances(snapshot);
        }
        Err(e) => {
            tracing::warn!(error = %e, "balance refresh failed");
            state.push_event("warn", &format!("balance refresh failed: {e}"));
        }
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(raw.trim()).ok()?;
    (amount > Decimal::ZERO).then_some(amount)
}

fn reject(state: &AppState, action: ActionKind) -> SequenceError {
    state.set_status(action, action.validation_label());
    SequenceError::Rejected(action.validation_label().to_string())
}

fn fail(state: &AppState, action: ActionKind, step: &str, err: anyhow::Error) -> SequenceError {
    tracing::error!(action = %action, step, error = %err, "transaction sequence aborted");
    state.push_event("error", &format!("{action} {step} failed: {err}"));
    state.set_status(action, GENERIC_ERROR);
    SequenceError::Chain(err)
}

// The approval receipt is already awaited before the bot call goes out, which
// is the ordering guarantee the contract needs. Some hosted RPCs still serve
// a stale pending nonce right after a receipt, so an extra pause is available
// behind TX_SETTLE_MS.
async fn settle_pause(state: &AppState) {
    let ms = state.config.read().unwrap().tx_settle_ms;
    if ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registry::Registry;
    use crate::types::{BalanceSnapshot, TokenKind};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use ethers::types::{TxHash, U256};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    fn test_state() -> Arc<AppState> {
        let config = Config {
            private_key: String::new(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            gas_limit: 5_000_000,
            tx_settle_ms: 0,
            contracts_dir: "constants".to_string(),
            log_level: "info".to_string(),
            http_port: 3000,
        };
        let registry = Registry::from_json(
            include_str!("../constants/contractAddresses.json"),
            include_str!("../constants/contractAbis.json"),
        )
        .unwrap();
        AppState::new(config, registry)
    }

    /// Scripted chain that records every call plus the status visible at the
    /// moment the call arrived, so transition order is observable.
    struct MockChain {
        state: Arc<AppState>,
        calls: Mutex<Vec<String>>,
        seen_status: Mutex<Vec<String>>,
        fail_approve: bool,
        fail_execute: bool,
    }

    impl MockChain {
        fn new(state: Arc<AppState>) -> Self {
            Self {
                state,
                calls: Mutex::new(Vec::new()),
                seen_status: Mutex::new(Vec::new()),
                fail_approve: false,
                fail_execute: false,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainOps for MockChain {
        async fn approve(&self, token: TokenKind, amount: U256) -> Result<TxHash> {
            self.calls.lock().unwrap().push(format!("approve {token} {amount}"));
            let action = match token {
                TokenKind::Collateral => ActionKind::Stake,
                TokenKind::Operating => ActionKind::Fund,
            };
            self.seen_status.lock().unwrap().push(self.state.status(action));
            if self.fail_approve {
                return Err(anyhow!("user rejected in signer"));
            }
            Ok(TxHash::zero())
        }

        async fn execute(&self, action: ActionKind, amount: Option<U256>) -> Result<TxHash> {
            let call = match amount {
                Some(a) => format!("{action} {a}"),
                None => action.to_string(),
            };
            self.calls.lock().unwrap().push(call);
            self.seen_status.lock().unwrap().push(self.state.status(action));
            if self.fail_execute {
                return Err(anyhow!("execution reverted"));
            }
            Ok(TxHash::zero())
        }

        async fn balances(&self) -> Result<BalanceSnapshot> {
            self.calls.lock().unwrap().push("balances".to_string());
            Ok(BalanceSnapshot {
                staking: dec!(4.2),
                funding: dec!(10),
            })
        }
    }

    #[tokio::test]
    async fn non_positive_amount_submits_nothing() {
        for raw in ["0", "-1", "", "abc"] {
            let state = test_state();
            let chain = MockChain::new(state.clone());

            let result = run(&state, &chain, ActionKind::Stake, Some(raw)).await;

            assert!(matches!(result, Err(SequenceError::Rejected(_))), "input {raw:?}");
            assert!(chain.calls().is_empty(), "input {raw:?}");
            assert_eq!(state.status(ActionKind::Stake), "Stake an amount > 0");
        }
    }

    #[tokio::test]
    async fn successful_stake_runs_approve_then_call_then_refresh() {
        let state = test_state();
        let chain = MockChain::new(state.clone());

        run(&state, &chain, ActionKind::Stake, Some("1.5")).await.unwrap();

        let wei = "1500000000000000000";
        assert_eq!(
            chain.calls(),
            vec![format!("approve WETH {wei}"), format!("stake {wei}"), "balances".to_string()],
        );
        // status visible when each tx went out, then the final label
        assert_eq!(
            *chain.seen_status.lock().unwrap(),
            vec!["Approving...".to_string(), "Staking...".to_string()],
        );
        assert_eq!(state.status(ActionKind::Stake), "Staked!");
        assert_eq!(state.balances().staking, dec!(4.2));
        assert_eq!(state.balances().funding, dec!(10));
    }

    #[tokio::test]
    async fn successful_fund_uses_the_operating_token() {
        let state = test_state();
        let chain = MockChain::new(state.clone());

        run(&state, &chain, ActionKind::Fund, Some("2")).await.unwrap();

        let wei = "2000000000000000000";
        assert_eq!(
            chain.calls(),
            vec![format!("approve LINK {wei}"), format!("fund {wei}"), "balances".to_string()],
        );
        assert_eq!(
            *chain.seen_status.lock().unwrap(),
            vec!["Approving...".to_string(), "Funding...".to_string()],
        );
        assert_eq!(state.status(ActionKind::Fund), "Fund!");
    }

    #[tokio::test]
    async fn approval_failure_aborts_before_the_bot_call() {
        let state = test_state();
        let mut chain = MockChain::new(state.clone());
        chain.fail_approve = true;

        let result = run(&state, &chain, ActionKind::Stake, Some("1")).await;

        assert!(matches!(result, Err(SequenceError::Chain(_))));
        assert_eq!(chain.calls().len(), 1, "only the approval went out");
        assert_eq!(state.status(ActionKind::Stake), GENERIC_ERROR);
        assert_eq!(state.balances().staking, Decimal::ZERO);
    }

    #[tokio::test]
    async fn bot_call_failure_after_approval_skips_the_refresh() {
        let state = test_state();
        let mut chain = MockChain::new(state.clone());
        chain.fail_execute = true;

        let result = run(&state, &chain, ActionKind::Fund, Some("1")).await;

        assert!(matches!(result, Err(SequenceError::Chain(_))));
        let calls = chain.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("approve LINK"));
        assert!(!calls.contains(&"balances".to_string()));
        assert_eq!(state.status(ActionKind::Fund), GENERIC_ERROR);
        assert_eq!(state.balances().funding, Decimal::ZERO);
    }

    #[tokio::test]
    async fn withdrawals_skip_the_approval_step() {
        for action in [ActionKind::Unstake, ActionKind::WithdrawFunds] {
            let state = test_state();
            let chain = MockChain::new(state.clone());

            run(&state, &chain, action, None).await.unwrap();

            assert_eq!(chain.calls(), vec![action.to_string(), "balances".to_string()]);
            assert_eq!(
                *chain.seen_status.lock().unwrap(),
                vec!["Withdrawing...".to_string()],
            );
            assert_eq!(state.status(action), "Withdrawed!");
        }
    }

    #[tokio::test]
    async fn failed_withdrawal_shows_the_generic_error() {
        let state = test_state();
        let mut chain = MockChain::new(state.clone());
        chain.fail_execute = true;

        let result = run(&state, &chain, ActionKind::Unstake, None).await;

        assert!(matches!(result, Err(SequenceError::Chain(_))));
        assert_eq!(state.status(ActionKind::Unstake), GENERIC_ERROR);
    }

    #[tokio::test]
    async fn refresh_failure_keeps_the_completion_status() {
        struct FlakyBalances {
            inner: MockChain,
        }

        #[async_trait]
        impl ChainOps for FlakyBalances {
            async fn approve(&self, token: TokenKind, amount: U256) -> Result<TxHash> {
                self.inner.approve(token, amount).await
            }
            async fn execute(&self, action: ActionKind, amount: Option<U256>) -> Result<TxHash> {
                self.inner.execute(action, amount).await
            }
            async fn balances(&self) -> Result<BalanceSnapshot> {
                Err(anyhow!("rpc timeout"))
            }
        }

        let state = test_state();
        let chain = FlakyBalances { inner: MockChain::new(state.clone()) };

        run(&state, &chain, ActionKind::Stake, Some("1")).await.unwrap();

        assert_eq!(state.status(ActionKind::Stake), "Staked!");
        assert_eq!(state.balances().staking, Decimal::ZERO);
        let events = state.events.lock().unwrap();
        assert!(events.iter().any(|e| e.kind == "warn"));
    }
}
