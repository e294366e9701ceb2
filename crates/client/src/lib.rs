//! Wallet and RPC provider construction.
//!
//! Reads go through a plain HTTP provider. Writes go through a provider that
//! carries an [`EthereumWallet`], so nonce, gas and fees are filled and the
//! transaction is signed before broadcast.

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The endpoint serves a different chain than the one configured
    #[error("Chain id mismatch: expected {expected}, RPC reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Convenience function to create an ethereum rpc provider from url.
pub async fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a provider with wallet signing capability from a private key.
pub fn create_wallet_provider(
    rpc_url: &str,
    private_key: &str,
) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let signer = parse_signer(private_key)?;
    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(provider)
}

/// Address of the account controlled by `private_key`.
///
/// This is the "connected account" of the flows: the approver on the sender
/// side and the spender/recipient on the receiver side.
pub fn wallet_address(private_key: &str) -> Result<Address, ClientError> {
    Ok(parse_signer(private_key)?.address())
}

/// Fail unless the provider is connected to `expected`.
pub async fn ensure_chain_id<P>(provider: &P, expected: u64) -> Result<(), ClientError>
where
    P: Provider,
{
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    if actual != expected {
        return Err(ClientError::ChainMismatch { expected, actual });
    }

    Ok(())
}

fn parse_signer(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known first dev account of anvil/hardhat.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = wallet_address("0x1234");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_wallet_address_from_key() {
        let address = wallet_address(DEV_KEY).unwrap();
        assert_eq!(
            address.to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_wallet_provider_rejects_bad_url() {
        let result = create_wallet_provider("::", DEV_KEY);
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}
