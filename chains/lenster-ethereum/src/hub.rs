use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    contract::ContractCall,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::LocalWallet,
    types::{Bytes, U256},
};
use lenster_core::{Address, PostSubmitter, PostWithSigData, ServiceError, ServiceResult, H256};
use tracing::{info, instrument};
use url::Url;

use crate::{LensterEthereumError, LocalTypedDataSigner};

#[allow(missing_docs)]
mod contract {
    ethers::contract::abigen!(LensHub, "$CARGO_MANIFEST_DIR/abis/LensHub.abi.json");
}

use contract::LensHub;

/// Middleware the hub is reached through when the user pays gas.
pub type WalletMiddleware = SignerMiddleware<Provider<Http>, LocalWallet>;

/// `DataTypes.PostWithSigData` as the generated binding takes it.
type PostWithSigVars = (
    U256,
    String,
    Address,
    Bytes,
    Address,
    Bytes,
    (u8, [u8; 32], [u8; 32], U256),
);

/// The LensHub proxy contract, called with a signature collected off-chain.
#[derive(Debug)]
pub struct LensHubPostSubmitter<M> {
    contract: Arc<LensHub<M>>,
}

impl<M> LensHubPostSubmitter<M>
where
    M: Middleware + 'static,
{
    /// Reach the hub proxy at `hub` through `provider`.
    pub fn new(provider: Arc<M>, hub: Address) -> Self {
        Self {
            contract: Arc::new(LensHub::new(hub, provider)),
        }
    }

    /// Address of the hub proxy
    pub fn hub(&self) -> Address {
        self.contract.address()
    }

    fn post_call(&self, vars: &PostWithSigData) -> ContractCall<M, U256> {
        self.contract.post_with_sig(post_with_sig_vars(vars))
    }
}

impl LensHubPostSubmitter<WalletMiddleware> {
    /// Connect to `rpc_url` with the signer's wallet paying for gas.
    pub fn connect_http(
        rpc_url: &Url,
        signer: &LocalTypedDataSigner,
        hub: Address,
    ) -> Result<Self, LensterEthereumError> {
        let provider = Provider::<Http>::try_from(rpc_url.as_str())
            .map_err(|e| LensterEthereumError::InvalidRpcUrl(e.to_string()))?;
        let middleware = SignerMiddleware::new(provider, signer.wallet().clone());
        Ok(Self::new(Arc::new(middleware), hub))
    }
}

fn post_with_sig_vars(vars: &PostWithSigData) -> PostWithSigVars {
    let sig = &vars.sig;
    (
        vars.profile_id,
        vars.content_uri.clone(),
        vars.collect_module,
        vars.collect_module_init_data.clone(),
        vars.reference_module,
        vars.reference_module_init_data.clone(),
        (sig.v, sig.r.to_fixed_bytes(), sig.s.to_fixed_bytes(), sig.deadline),
    )
}

#[async_trait]
impl<M> PostSubmitter for LensHubPostSubmitter<M>
where
    M: Middleware + 'static,
{
    #[instrument(skip(self, vars), fields(hub = ?self.hub(), profile_id = %vars.profile_id))]
    async fn post_with_sig(&self, vars: &PostWithSigData) -> ServiceResult<H256> {
        let call = self.post_call(vars);

        info!("Dispatching postWithSig");
        let pending = call.send().await.map_err(ServiceError::from_other)?;
        let tx_hash: H256 = *pending;
        info!(?tx_hash, "postWithSig accepted by node");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use ethers::{
        abi::{AbiDecode, AbiEncode},
        contract::EthCall,
        types::NameOrAddress,
    };
    use lenster_core::SignatureParts;

    use super::contract::PostWithSigCall;
    use super::*;

    fn vars() -> PostWithSigData {
        PostWithSigData {
            profile_id: U256::from(0x0f),
            content_uri: "https://arweave.net/Lz9hkl1NtJ2V3tqkTEAD3oBDYu2lAjDdCNvyrXNGyNc".into(),
            collect_module: "0x0be6bd7092ee83d44a6ec1d949626fee48cabab8".parse().unwrap(),
            collect_module_init_data: Bytes::from(vec![0u8; 32]),
            reference_module: Address::zero(),
            reference_module_init_data: Bytes::default(),
            sig: SignatureParts {
                v: 28,
                r: H256::repeat_byte(0x11),
                s: H256::repeat_byte(0x22),
                deadline: U256::from(1_654_087_800u64),
            },
        }
    }

    fn submitter(hub: Address) -> LensHubPostSubmitter<Provider<Http>> {
        let provider = Provider::<Http>::try_from("http://127.0.0.1:8545").unwrap();
        LensHubPostSubmitter::new(Arc::new(provider), hub)
    }

    #[test]
    fn binding_matches_the_deployed_signature() {
        assert_eq!(
            PostWithSigCall::abi_signature(),
            "postWithSig((uint256,string,address,bytes,address,bytes,(uint8,bytes32,bytes32,uint256)))"
        );
        assert_eq!(PostWithSigCall::selector(), [0x3b, 0x50, 0x81, 0x32]);
    }

    #[test]
    fn call_targets_the_hub_with_post_with_sig_data() {
        let hub: Address = "0x60ae865ee4c725cd04353b5aab364553f56cef82".parse().unwrap();
        let call = submitter(hub).post_call(&vars());

        assert_eq!(call.tx.to(), Some(&NameOrAddress::Address(hub)));
        let data = call.calldata().unwrap();
        assert_eq!(&data[..4], &[0x3b, 0x50, 0x81, 0x32]);
        assert_eq!(
            data.to_vec(),
            PostWithSigCall {
                vars: post_with_sig_vars(&vars())
            }
            .encode()
        );
    }

    #[test]
    fn call_data_decodes_back_to_vars() {
        let data = submitter(Address::zero()).post_call(&vars()).calldata().unwrap();
        let decoded = PostWithSigCall::decode(&data).unwrap();

        let (profile_id, content_uri, _, _, reference_module, _, sig) = decoded.vars;
        assert_eq!(profile_id, U256::from(0x0f));
        assert_eq!(content_uri, vars().content_uri);
        assert_eq!(reference_module, Address::zero());
        assert_eq!(sig.0, 28);
        assert_eq!(sig.1, [0x11; 32]);
        assert_eq!(sig.3, U256::from(1_654_087_800u64));
    }

    #[test]
    fn connect_http_builds_wallet_middleware() {
        let signer = LocalTypedDataSigner::from_key(H256::repeat_byte(0x01), 80001).unwrap();
        let url = Url::parse("http://127.0.0.1:8545").unwrap();
        let hub: Address = "0x60ae865ee4c725cd04353b5aab364553f56cef82".parse().unwrap();
        let submitter = LensHubPostSubmitter::connect_http(&url, &signer, hub).unwrap();
        assert_eq!(submitter.hub(), hub);
    }
}
