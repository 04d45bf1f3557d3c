use std::str::FromStr;

use anyhow::Result;
use ethers::types::U256;
use ethers::utils::{format_units, parse_units};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two ERC-20 tokens the bot contract takes custody of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Collateral the bot trades with (WETH)
    Collateral,
    /// Operating token the bot burns for its automation (LINK)
    Operating,
}

impl TokenKind {
    /// Logical name under which the address registry lists this token
    pub fn registry_name(self) -> &'static str {
        match self {
            TokenKind::Collateral => "WETH",
            TokenKind::Operating => "LINK",
        }
    }

    pub fn abi_name(self) -> &'static str {
        "ERC20"
    }

    // WETH and LINK both use 18 decimals
    pub fn decimals(self) -> u32 {
        18
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.registry_name())
    }
}

/// One user-triggered bot operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Stake,
    Fund,
    Unstake,
    WithdrawFunds,
}

impl ActionKind {
    /// Token that must be approved before the bot call, if any.
    /// Withdrawals move tokens out of the contract and need no allowance.
    pub fn token(self) -> Option<TokenKind> {
        match self {
            ActionKind::Stake => Some(TokenKind::Collateral),
            ActionKind::Fund => Some(TokenKind::Operating),
            ActionKind::Unstake | ActionKind::WithdrawFunds => None,
        }
    }

    /// ABI method name on TradingBotV3
    pub fn method(self) -> &'static str {
        match self {
            ActionKind::Stake => "stake",
            ActionKind::Fund => "fund",
            ActionKind::Unstake => "unstake",
            ActionKind::WithdrawFunds => "withdrawFunds",
        }
    }

    pub fn pending_label(self) -> &'static str {
        match self {
            ActionKind::Stake => "Staking...",
            ActionKind::Fund => "Funding...",
            ActionKind::Unstake | ActionKind::WithdrawFunds => "Withdrawing...",
        }
    }

    pub fn done_label(self) -> &'static str {
        match self {
            ActionKind::Stake => "Staked!",
            ActionKind::Fund => "Fund!",
            ActionKind::Unstake | ActionKind::WithdrawFunds => "Withdrawed!",
        }
    }

    /// Inline message when the entered amount fails the > 0 check
    pub fn validation_label(self) -> &'static str {
        match self {
            ActionKind::Fund => "Fund an amount > 0",
            _ => "Stake an amount > 0",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.method())
    }
}

/// The two balance fields the bot contract tracks per account,
/// in display (decimal) units
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BalanceSnapshot {
    pub staking: Decimal,
    pub funding: Decimal,
}

/// Scale a display amount down to the token's smallest unit
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256> {
    if amount.scale() > decimals {
        anyhow::bail!("amount has more than {decimals} decimal places");
    }
    let parsed = parse_units(amount.to_string(), decimals)?;
    Ok(parsed.into())
}

/// Scale a raw chain value back up to display units
pub fn from_base_units(raw: U256, decimals: u32) -> Result<Decimal> {
    let formatted = format_units(raw, decimals)?;
    Ok(Decimal::from_str(&formatted)?.normalize())
}
