use std::collections::BTreeMap;

use async_trait::async_trait;
use ethers::{
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip712::{EIP712Domain, Eip712DomainType, TypedData},
        Signature, U256,
    },
};
use lenster_core::{Address, TypedDataEnvelope, TypedDataSigner, TypedDataSignerError, H256};
use tracing::{debug, instrument};

use crate::LensterEthereumError;

/// Signs typed data with a key held in memory.
#[derive(Debug, Clone)]
pub struct LocalTypedDataSigner {
    wallet: LocalWallet,
}

impl LocalTypedDataSigner {
    /// Wrap a wallet. Its chain id must match the typed data domains it will
    /// be asked to sign.
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    /// Build the wallet from a raw private key.
    pub fn from_key(key: H256, chain_id: u64) -> Result<Self, LensterEthereumError> {
        let wallet = LocalWallet::from_bytes(key.as_bytes())?.with_chain_id(chain_id);
        Ok(Self::new(wallet))
    }

    /// The wallet, for building a signing middleware.
    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

/// Convert the backend's typed data into the form ethers hashes.
pub fn to_eip712(envelope: &TypedDataEnvelope) -> Result<TypedData, LensterEthereumError> {
    let typed_data = &envelope.typed_data;
    let primary_type = typed_data
        .primary_type()
        .map_err(|_| LensterEthereumError::TypedData(missing_primary_type()))?
        .to_owned();

    let types = typed_data
        .types
        .iter()
        .map(|(name, fields)| {
            let fields = fields
                .iter()
                .map(|f| Eip712DomainType {
                    name: f.name.clone(),
                    r#type: f.kind.clone(),
                })
                .collect();
            (name.clone(), fields)
        })
        .collect();

    let message = match serde_json::to_value(&typed_data.value) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect::<BTreeMap<_, _>>(),
        _ => return Err(LensterEthereumError::TypedData(missing_primary_type())),
    };

    Ok(TypedData {
        domain: EIP712Domain {
            name: Some(typed_data.domain.name.clone()),
            version: Some(typed_data.domain.version.clone()),
            chain_id: Some(U256::from(typed_data.domain.chain_id)),
            verifying_contract: Some(typed_data.domain.verifying_contract),
            salt: None,
        },
        types,
        primary_type,
        message,
    })
}

fn missing_primary_type() -> ethers::types::transaction::eip712::Eip712Error {
    ethers::types::transaction::eip712::Eip712Error::Message(
        "typed data has no usable primary type".to_owned(),
    )
}

#[async_trait]
impl TypedDataSigner for LocalTypedDataSigner {
    fn address(&self) -> Address {
        self.wallet.address()
    }

    #[instrument(skip(self, envelope), fields(id = %envelope.id, signer = ?self.wallet.address()))]
    async fn sign_typed_data(
        &self,
        envelope: &TypedDataEnvelope,
    ) -> Result<Signature, TypedDataSignerError> {
        let wallet_chain = self.wallet.chain_id();
        let domain_chain = envelope.typed_data.domain.chain_id;
        if wallet_chain != domain_chain {
            return Err(LensterEthereumError::ChainIdMismatch {
                typed_data: domain_chain,
                wallet: wallet_chain,
            }
            .into());
        }

        let typed_data = to_eip712(envelope)?;
        let signature = self
            .wallet
            .sign_typed_data(&typed_data)
            .await
            .map_err(LensterEthereumError::from)?;
        debug!(v = signature.v, "Signed typed data");
        Ok(signature)
    }
}
