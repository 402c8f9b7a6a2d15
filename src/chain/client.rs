//! Alloy-backed chain reader with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to one or more JSON-RPC endpoints
//! - Answer the three reads the watch subsystem needs (head, inclusion, receipt)
//! - Handle timeouts and network errors gracefully
//! - Verify the connected chain matches configuration

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::chain::reader::{ChainReader, InclusionState, ReceiptState};
use crate::chain::types::{ChainError, ChainId, ChainResult};
use crate::config::schema::RpcConfig;

/// RPC chain reader with failover support.
#[derive(Clone)]
pub struct RpcReader {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: RpcConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcReader {
    /// Create a new reader from configuration.
    ///
    /// Initialization succeeds even when the endpoint is unreachable;
    /// a chain-id mismatch is logged rather than fatal so that a node
    /// that comes up late does not abort the caller.
    pub async fn new(config: RpcConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(
                    Arc::new(ProviderBuilder::new().connect_http(url))
                        as Arc<dyn Provider + Send + Sync>,
                );
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let reader = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match reader.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Chain reader initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Chain reader initialized but chain verification failed"
                );
            }
        }

        Ok(reader)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

#[async_trait]
impl ChainReader for RpcReader {
    async fn current_head(&self) -> ChainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc(
            "All providers failed to get block number".to_string(),
        ))
    }

    async fn inclusion_state(&self, tx_hash: TxHash) -> ChainResult<InclusionState> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_by_hash(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(None)) => return Ok(InclusionState::NotFound),
                Ok(Ok(Some(tx))) => {
                    // A transaction without a block number is still in the mempool.
                    return Ok(if tx.block_number.is_some() {
                        InclusionState::Included
                    } else {
                        InclusionState::Pending
                    });
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc(
            "All providers failed to get transaction".to_string(),
        ))
    }

    async fn receipt(&self, tx_hash: TxHash) -> ChainResult<ReceiptState> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(None)) => return Ok(ReceiptState::Absent),
                Ok(Ok(Some(receipt))) => {
                    return Ok(ReceiptState::Present {
                        success: receipt.status(),
                    })
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc(
            "All providers failed to get receipt".to_string(),
        ))
    }
}

impl std::fmt::Debug for RpcReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcReader")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
