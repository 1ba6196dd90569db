use crate::config::QuickNodeConfig;
use async_trait::async_trait;
use ethereum_types::{Address, U256};
use metawall_core::{
    error::Result,
    traits::{NftAsset, NftInfoService},
    utils::format_address,
    Error,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<Value>,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<FetchResult>,
    #[serde(default)]
    error: Option<RpcErrorPayload>,
}

#[derive(Deserialize)]
struct RpcErrorPayload {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct FetchResult {
    #[serde(default)]
    assets: Vec<NftAsset>,
}

/// Metadados de NFT via `qn_fetchNFTs`
pub struct QuickNodeNftService {
    client: Client,
    config: QuickNodeConfig,
}

impl QuickNodeNftService {
    pub fn new(config: QuickNodeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::TransportError(format!("Falha ao criar cliente HTTP: {}", e)))?;
        Ok(Self { client, config })
    }

    fn request_for(&self, owner: Address, contract: Address, token_id: U256) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "qn_fetchNFTs",
            params: vec![json!({
                "wallet": format_address(&owner),
                "omitFields": ["provenance", "traits"],
                "page": 1,
                "perPage": self.config.per_page,
                "contracts": [format!("{}:{}", format_address(&contract), token_id)],
            })],
        }
    }
}

#[async_trait]
impl NftInfoService for QuickNodeNftService {
    async fn fetch(
        &self,
        owner: Address,
        contract: Address,
        token_id: U256,
    ) -> Result<Option<NftAsset>> {
        let request = self.request_for(owner, contract, token_id);

        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::TransportError(format!("Erro ao consultar QuickNode: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::TransportError(format!(
                "QuickNode respondeu HTTP {}",
                resp.status()
            )));
        }

        let body: RpcResponse = resp
            .json()
            .await
            .map_err(|e| {
                Error::DecodeError(format!("Erro ao decodificar resposta QuickNode: {}", e))
            })?;

        if let Some(err) = body.error {
            return Err(Error::TransportError(format!(
                "QuickNode retornou erro {}: {}",
                err.code, err.message
            )));
        }

        let asset = body.result.and_then(|r| r.assets.into_iter().next());
        if asset.is_none() {
            debug!(contract = %format_address(&contract), %token_id, "NFT sem metadados");
        }
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_targets_single_token() {
        let service = QuickNodeNftService::new(QuickNodeConfig::default()).unwrap();
        let req = service.request_for(
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(0xbc),
            U256::from(42u64),
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["method"], "qn_fetchNFTs");
        assert_eq!(
            value["params"][0]["contracts"][0],
            "0x00000000000000000000000000000000000000bc:42"
        );
        assert_eq!(value["params"][0]["perPage"], 10);
    }
}
