use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::core::k256::ecdsa::SigningKey;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TransactionRequest, TxHash, U256};

use crate::config::Config;
use crate::registry::Registry;
use crate::types::{from_base_units, ActionKind, BalanceSnapshot, TokenKind};

/// Registry name of the bot contract itself
const BOT_CONTRACT: &str = "TradingBotV3";

type SignedClient = SignerMiddleware<Provider<Http>, LocalWallet>;

fn build_client(config: &Config) -> Result<Arc<SignedClient>> {
    let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;
    let key = config.private_key.strip_prefix("0x").unwrap_or(&config.private_key);
    let key_bytes = hex::decode(key)?;
    let signing_key = SigningKey::from_bytes(key_bytes.as_slice().into())?;
    let wallet = LocalWallet::from(signing_key).with_chain_id(config.chain_id);
    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// EOA address derived from the configured private key. This is the account
/// the bot contract keys both balance fields on.
pub fn wallet_address(config: &Config) -> Result<Address> {
    let key = config.private_key.strip_prefix("0x").unwrap_or(&config.private_key);
    let key_bytes = hex::decode(key)?;
    let signing_key = SigningKey::from_bytes(key_bytes.as_slice().into())?;
    let wallet = LocalWallet::from(signing_key);
    Ok(wallet.address())
}

pub fn approve_calldata(abi: &Abi, spender: Address, amount: U256) -> Result<Bytes> {
    let data = abi
        .function("approve")?
        .encode_input(&[Token::Address(spender), Token::Uint(amount)])?;
    Ok(Bytes::from(data))
}

/// Calldata for one bot operation. The ABI enforces arity: amount-bearing
/// methods reject a missing amount and vice versa.
pub fn action_calldata(abi: &Abi, action: ActionKind, amount: Option<U256>) -> Result<Bytes> {
    let args: Vec<Token> = amount.map(|a| vec![Token::Uint(a)]).unwrap_or_default();
    let data = abi.function(action.method())?.encode_input(&args)?;
    Ok(Bytes::from(data))
}

/// The chain operations the transaction sequencer needs. Kept behind a trait
/// so sequences can be exercised without a node.
#[async_trait]
pub trait ChainOps: Send + Sync {
    /// Approve the bot contract to spend `amount` of `token`, wait for the
    /// transaction to be mined.
    async fn approve(&self, token: TokenKind, amount: U256) -> Result<TxHash>;
    /// Submit one bot-contract call, wait for it to be mined.
    async fn execute(&self, action: ActionKind, amount: Option<U256>) -> Result<TxHash>;
    /// Read both balance fields for the wallet account.
    async fn balances(&self) -> Result<BalanceSnapshot>;
}

/// Live implementation over JSON-RPC
pub struct RpcChain {
    config: Config,
    registry: Registry,
}

impl RpcChain {
    pub fn new(config: Config, registry: Registry) -> Self {
        Self { config, registry }
    }
}

#[async_trait]
impl ChainOps for RpcChain {
    async fn approve(&self, token: TokenKind, amount: U256) -> Result<TxHash> {
        let client = build_client(&self.config)?;
        let chain_id = self.config.chain_id;
        let token_addr = self.registry.address(chain_id, token.registry_name())?;
        let bot_addr = self.registry.address(chain_id, BOT_CONTRACT)?;
        let abi = self.registry.abi(chain_id, token.abi_name())?;

        let data = approve_calldata(abi, bot_addr, amount)?;
        let tx = TransactionRequest::new().to(token_addr).data(data);

        tracing::info!(token = %token, amount = %amount, "approving bot contract spend");
        let pending = client.send_transaction(tx, None).await?;
        let receipt = pending
            .await?
            .ok_or_else(|| anyhow::anyhow!("approval tx dropped"))?;
        tracing::info!(tx = %format!("{:#x}", receipt.transaction_hash), "approval confirmed");
        Ok(receipt.transaction_hash)
    }

    async fn execute(&self, action: ActionKind, amount: Option<U256>) -> Result<TxHash> {
        let client = build_client(&self.config)?;
        let chain_id = self.config.chain_id;
        let bot_addr = self.registry.address(chain_id, BOT_CONTRACT)?;
        let abi = self.registry.abi(chain_id, BOT_CONTRACT)?;

        let data = action_calldata(abi, action, amount)?;
        let mut tx = TransactionRequest::new().to(bot_addr).data(data);
        // gas estimation reverts while the allowance tx is still propagating,
        // so deposits ship with a fixed limit like the original deploy tooling
        if amount.is_some() {
            tx = tx.gas(self.config.gas_limit);
        }

        tracing::info!(action = %action, "submitting bot contract call");
        let pending = client.send_transaction(tx, None).await?;
        let receipt = pending
            .await?
            .ok_or_else(|| anyhow::anyhow!("{action} tx dropped"))?;
        tracing::info!(tx = %format!("{:#x}", receipt.transaction_hash), action = %action, "confirmed");
        Ok(receipt.transaction_hash)
    }

    async fn balances(&self) -> Result<BalanceSnapshot> {
        let provider = Provider::<Http>::try_from(self.config.rpc_url.as_str())?;
        let chain_id = self.config.chain_id;
        let bot_addr = self.registry.address(chain_id, BOT_CONTRACT)?;
        let abi = self.registry.abi(chain_id, BOT_CONTRACT)?;
        let owner = wallet_address(&self.config)?;

        let (staking_raw, funding_raw) = tokio::try_join!(
            read_balance(&provider, abi, bot_addr, "stakingBalance", owner),
            read_balance(&provider, abi, bot_addr, "fundingBalance", owner),
        )?;

        Ok(BalanceSnapshot {
            staking: from_base_units(staking_raw, TokenKind::Collateral.decimals())?,
            funding: from_base_units(funding_raw, TokenKind::Operating.decimals())?,
        })
    }
}

async fn read_balance(
    provider: &Provider<Http>,
    abi: &Abi,
    contract: Address,
    field: &str,
    account: Address,
) -> Result<U256> {
    let function = abi.function(field)?;
    let data = function.encode_input(&[Token::Address(account)])?;
    let call = TransactionRequest::new().to(contract).data(Bytes::from(data));
    let result = provider.call(&call.into(), None).await?;

    let decoded = function.decode_output(&result)?;
    match decoded.first() {
        Some(Token::Uint(val)) => Ok(*val),
        _ => Ok(U256::zero()),
    }
}
