use crate::config::TenderlyConfig;
use async_trait::async_trait;
use dashmap::DashMap;
use ethereum_types::Address;
use metawall_core::{
    error::Result,
    traits::Simulator,
    utils::{format_address, hex_to_address, hex_to_bytes},
    CallTraceEntry, ContractInfo, Error, SimulationResult, TokenData, Transaction,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct SimulateRequest {
    network_id: String,
    from: String,
    to: Option<String>,
    input: String,
    gas: u64,
    gas_price: u64,
    value: String,
}

#[derive(Deserialize)]
struct SimulateResponse {
    transaction: TransactionPayload,
    #[serde(default)]
    contracts: Vec<ContractPayload>,
}

#[derive(Deserialize)]
struct TransactionPayload {
    status: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    call_trace: Option<Vec<CallPayload>>,
}

#[derive(Deserialize)]
struct CallPayload {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    input: Option<String>,
}

#[derive(Deserialize)]
struct ContractPayload {
    address: String,
    #[serde(default)]
    contract_name: Option<String>,
    #[serde(default)]
    standards: Option<Vec<String>>,
    #[serde(default)]
    token_data: Option<TokenPayload>,
}

#[derive(Deserialize)]
struct TokenPayload {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    decimals: Option<u8>,
}

/// Simulador que usa a API de simulação do Tenderly
pub struct TenderlySimulator {
    client: Client,
    config: TenderlyConfig,
    cache: DashMap<String, SimulationResult>,
}

impl TenderlySimulator {
    /// Cria um novo simulador
    pub fn new(config: TenderlyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::TransportError(format!("Falha ao criar cliente HTTP: {}", e)))?;
        Ok(Self {
            client,
            config,
            cache: DashMap::new(),
        })
    }

    fn request_for(&self, tx: &Transaction) -> SimulateRequest {
        SimulateRequest {
            network_id: tx.chain_id.to_string(),
            from: format_address(&tx.from),
            to: tx.to.as_ref().map(format_address),
            input: format!("0x{}", hex::encode(&tx.data)),
            gas: self.config.gas,
            gas_price: self.config.gas_price,
            value: tx.value.to_string(),
        }
    }
}

#[async_trait]
impl Simulator for TenderlySimulator {
    async fn simulate(&self, tx: &Transaction) -> Result<SimulationResult> {
        let request = self.request_for(tx);
        let cache_key = serde_json::to_string(&request)
            .map_err(|e| Error::Other(format!("Falha ao serializar simulação: {}", e)))?;

        // Verifica o cache
        if self.config.use_cache {
            if let Some(cached) = self.cache.get(&cache_key) {
                debug!("simulação servida do cache");
                return Ok(cached.value().clone());
            }
        }

        let resp = self
            .client
            .post(self.config.simulate_url())
            .header("X-Access-Key", &self.config.access_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::TransportError(format!("Erro ao consultar Tenderly: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::TransportError(format!("Tenderly respondeu HTTP {}", resp.status())));
        }

        let payload: SimulateResponse = resp
            .json()
            .await
            .map_err(|e| {
                Error::DecodeError(format!("Erro ao decodificar resposta Tenderly: {}", e))
            })?;

        let result = into_simulation(payload);

        // Atualiza o cache
        if self.config.use_cache {
            self.cache.insert(cache_key, result.clone());
        }

        Ok(result)
    }
}

fn into_simulation(payload: SimulateResponse) -> SimulationResult {
    // Entradas com endereço inválido viram o endereço zero para manter as posições do trace
    let call_trace = payload
        .transaction
        .call_trace
        .unwrap_or_default()
        .into_iter()
        .map(|call| CallTraceEntry {
            from: call.from.as_deref().and_then(hex_to_address).unwrap_or_else(Address::zero),
            to: call.to.as_deref().and_then(hex_to_address).unwrap_or_else(Address::zero),
            input: call.input.as_deref().and_then(hex_to_bytes).unwrap_or_default(),
        })
        .collect();

    let contracts = payload
        .contracts
        .into_iter()
        .filter_map(|c| match hex_to_address(&c.address) {
            Some(address) => Some(ContractInfo {
                address,
                name: c.contract_name,
                standards: c.standards,
                token_data: c.token_data.map(|t| TokenData {
                    symbol: t.symbol,
                    decimals: t.decimals,
                }),
            }),
            None => {
                warn!(address = %c.address, "contrato com endereço inválido ignorado");
                None
            }
        })
        .collect();

    SimulationResult {
        status: payload.transaction.status,
        error_message: payload.transaction.error_message,
        call_trace,
        contracts,
    }
}
