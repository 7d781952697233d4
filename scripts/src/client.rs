//! The chain-facing seam of the deploy scripts

use std::str::FromStr;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use alloy_primitives::{Address, Bytes, TxHash};
use tracing::debug;

use crate::{constants::NUM_DEPLOY_CONFIRMATIONS, errors::ScriptError};

/// The mined result of a transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    /// The transaction hash
    pub tx_hash: TxHash,
    /// Whether the transaction's status flag reports success
    pub success: bool,
    /// The block the transaction was included in
    pub block_number: Option<u64>,
    /// The address of the contract created by the transaction, if any
    pub contract_address: Option<Address>,
}

impl From<TransactionReceipt> for TxOutcome {
    fn from(receipt: TransactionReceipt) -> Self {
        TxOutcome {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            block_number: receipt.block_number,
            contract_address: receipt.contract_address,
        }
    }
}

/// A signing client connected to a single chain.
///
/// Every transaction method blocks until the transaction is mined.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// The id of the connected chain
    fn chain_id(&self) -> u64;

    /// The address transactions are signed by
    fn deployer(&self) -> Address;

    /// Submit a contract creation transaction
    async fn deploy(&self, init_code: Bytes) -> Result<TxOutcome, ScriptError>;

    /// Fetch the code installed at an address
    async fn code_at(&self, address: Address) -> Result<Bytes, ScriptError>;

    /// Submit a transaction calling `to` with `input`
    async fn transact(&self, to: Address, input: Bytes) -> Result<TxOutcome, ScriptError>;

    /// Execute a read-only call against `to`
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ScriptError>;
}

/// A [`ChainClient`] backed by a JSON-RPC provider and a local private key
#[derive(Clone)]
pub struct RpcClient {
    /// The wallet-filled provider
    provider: DynProvider,
    /// The chain id, fetched once at setup
    chain_id: u64,
    /// The address of the deployer's key
    deployer: Address,
}

impl RpcClient {
    /// Send a transaction and wait for its receipt
    async fn send(&self, tx: TransactionRequest) -> Result<TransactionReceipt, String> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| e.to_string())?;
        debug!("Submitted transaction {:#x}", pending.tx_hash());

        pending
            .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| e.to_string())
    }
}

impl ChainClient for RpcClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn deploy(&self, init_code: Bytes) -> Result<TxOutcome, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(init_code);
        let receipt = self.send(tx).await.map_err(ScriptError::ContractDeployment)?;

        Ok(receipt.into())
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ScriptError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn transact(&self, to: Address, input: Bytes) -> Result<TxOutcome, ScriptError> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        let receipt = self.send(tx).await.map_err(ScriptError::ContractInteraction)?;

        Ok(receipt.into())
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ScriptError> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        self.provider
            .call(&tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}

/// Sets up the client with which to deploy, from the deployer's private key and an RPC url
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_builtin(rpc_url)
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    Ok(RpcClient {
        provider,
        chain_id,
        deployer,
    })
}
