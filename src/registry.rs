use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use ethers::abi::Abi;
use ethers::types::Address;
use thiserror::Error;

/// Deployment registry: contract addresses and ABIs keyed by chain id,
/// read from the two JSON files the contract repo publishes on deploy.
#[derive(Debug, Clone)]
pub struct Registry {
    addresses: HashMap<u64, HashMap<String, Address>>,
    abis: HashMap<u64, HashMap<String, Abi>>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no contracts registered for chain {0}")]
    UnsupportedChain(u64),
    #[error("no address for {0} on chain {1}")]
    UnknownAddress(String, u64),
    #[error("no ABI named {0} on chain {1}")]
    UnknownAbi(String, u64),
}

impl Registry {
    pub fn load(dir: &str) -> Result<Self> {
        let addresses = read_file(&Path::new(dir).join("contractAddresses.json"))?;
        let abis = read_file(&Path::new(dir).join("contractAbis.json"))?;
        Self::from_json(&addresses, &abis)
    }

    pub(crate) fn from_json(addresses: &str, abis: &str) -> Result<Self> {
        let addresses: HashMap<String, HashMap<String, Address>> =
            serde_json::from_str(addresses).context("malformed contractAddresses.json")?;
        let abis: HashMap<String, HashMap<String, Abi>> =
            serde_json::from_str(abis).context("malformed contractAbis.json")?;

        Ok(Self {
            addresses: parse_chain_keys(addresses)?,
            abis: parse_chain_keys(abis)?,
        })
    }

    pub fn supports_chain(&self, chain_id: u64) -> bool {
        self.addresses.contains_key(&chain_id)
    }

    pub fn address(&self, chain_id: u64, name: &str) -> Result<Address, RegistryError> {
        let chain = self
            .addresses
            .get(&chain_id)
            .ok_or(RegistryError::UnsupportedChain(chain_id))?;
        chain
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownAddress(name.to_string(), chain_id))
    }

    pub fn abi(&self, chain_id: u64, name: &str) -> Result<&Abi, RegistryError> {
        let chain = self
            .abis
            .get(&chain_id)
            .ok_or(RegistryError::UnsupportedChain(chain_id))?;
        chain
            .get(name)
            .ok_or_else(|| RegistryError::UnknownAbi(name.to_string(), chain_id))
    }
}

// chain ids are JSON object keys, so they arrive as strings
fn parse_chain_keys<T>(raw: HashMap<String, T>) -> Result<HashMap<u64, T>> {
    raw.into_iter()
        .map(|(k, v)| {
            let id: u64 = k.parse().with_context(|| format!("bad chain id key: {k}"))?;
            Ok((id, v))
        })
        .collect()
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESSES: &str = include_str!("../constants/contractAddresses.json");
    const ABIS: &str = include_str!("../constants/contractAbis.json");

    fn registry() -> Registry {
        Registry::from_json(ADDRESSES, ABIS).unwrap()
    }

    #[test]
    fn shipped_registry_files_parse() {
        let reg = registry();
        assert!(reg.supports_chain(5));
        assert!(reg.supports_chain(31337));
    }

    #[test]
    fn resolves_all_logical_names_on_supported_chains() {
        let reg = registry();
        for chain_id in [5u64, 31337] {
            for name in ["WETH", "LINK", "TradingBotV3"] {
                assert!(reg.address(chain_id, name).is_ok(), "{name} on {chain_id}");
            }
        }
    }

    #[test]
    fn erc20_abi_exposes_the_approval_surface() {
        let reg = registry();
        let abi = reg.abi(5, "ERC20").unwrap();
        assert!(abi.function("approve").is_ok());
        assert!(abi.function("balanceOf").is_ok());
    }

    #[test]
    fn bot_abi_exposes_every_console_operation() {
        let reg = registry();
        let abi = reg.abi(5, "TradingBotV3").unwrap();
        for method in ["stake", "fund", "unstake", "withdrawFunds", "stakingBalance", "fundingBalance"] {
            assert!(abi.function(method).is_ok(), "missing {method}");
        }
    }

    #[test]
    fn unsupported_chain_is_a_typed_error() {
        let reg = registry();
        assert!(matches!(
            reg.address(1, "WETH"),
            Err(RegistryError::UnsupportedChain(1))
        ));
        assert!(matches!(
            reg.abi(1, "ERC20"),
            Err(RegistryError::UnsupportedChain(1))
        ));
    }

    #[test]
    fn unknown_names_are_typed_errors() {
        let reg = registry();
        assert!(matches!(
            reg.address(5, "DAI"),
            Err(RegistryError::UnknownAddress(_, 5))
        ));
        assert!(matches!(
            reg.abi(5, "Vault"),
            Err(RegistryError::UnknownAbi(_, 5))
        ));
    }
}
