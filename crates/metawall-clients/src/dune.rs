use crate::config::DuneConfig;
use async_trait::async_trait;
use ethereum_types::Address;
use metawall_core::{
    error::Result,
    traits::{NameQueryState, NameService},
    Error,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const STATE_COMPLETED: &str = "QUERY_STATE_COMPLETED";
const TERMINAL_FAILURES: [&str; 3] = [
    "QUERY_STATE_FAILED",
    "QUERY_STATE_CANCELLED",
    "QUERY_STATE_EXPIRED",
];

#[derive(Deserialize)]
struct ExecuteResponse {
    execution_id: String,
}

#[derive(Deserialize)]
struct ResultsResponse {
    state: String,
    #[serde(default)]
    result: Option<ResultRows>,
}

#[derive(Deserialize)]
struct ResultRows {
    #[serde(default)]
    rows: Vec<NameRow>,
}

#[derive(Deserialize)]
struct NameRow {
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl NameRow {
    /// Nome no formato `namespace-name`
    fn display(&self) -> Option<String> {
        let namespace = self.namespace.as_deref().filter(|s| !s.is_empty());
        let name = self.name.as_deref().filter(|s| !s.is_empty());
        match (namespace, name) {
            (Some(ns), Some(n)) => Some(format!("{}-{}", ns, n)),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }
}

/// Serviço de nomes de contrato baseado em consultas Dune
pub struct DuneNameService {
    client: Client,
    config: DuneConfig,
}

impl DuneNameService {
    /// Cria um novo serviço
    pub fn new(config: DuneConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::TransportError(format!("Falha ao criar cliente HTTP: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl NameService for DuneNameService {
    async fn execute(&self, address: Address) -> Result<String> {
        // A consulta espera o endereço sem o prefixo 0x
        let body = json!({
            "query_parameters": { "contract_address": format!("{:x}", address) }
        });

        let resp = self
            .client
            .post(self.url(&format!("query/{}/execute", self.config.query_id)))
            .header("x-dune-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::TransportError(format!("Erro ao executar consulta Dune: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::TransportError(format!("Dune respondeu HTTP {}", resp.status())));
        }

        let exec: ExecuteResponse = resp
            .json()
            .await
            .map_err(|e| Error::DecodeError(format!("Erro ao decodificar execução Dune: {}", e)))?;

        debug!(execution_id = %exec.execution_id, "consulta Dune iniciada");
        Ok(exec.execution_id)
    }

    async fn poll(&self, execution_id: &str) -> Result<NameQueryState> {
        let resp = self
            .client
            .get(self.url(&format!("execution/{}/results", execution_id)))
            .header("x-dune-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                Error::TransportError(format!("Erro ao consultar resultado Dune: {}", e))
            })?;

        if !resp.status().is_success() {
            return Err(Error::TransportError(format!("Dune respondeu HTTP {}", resp.status())));
        }

        let results: ResultsResponse = resp
            .json()
            .await
            .map_err(|e| Error::DecodeError(format!("Erro ao decodificar resultado Dune: {}", e)))?;

        if results.state == STATE_COMPLETED {
            let name = results
                .result
                .and_then(|r| r.rows.into_iter().next())
                .and_then(|row| row.display());
            return Ok(NameQueryState::Completed(name));
        }

        if TERMINAL_FAILURES.contains(&results.state.as_str()) {
            return Err(Error::Other(format!(
                "consulta Dune {} terminou em {}",
                execution_id, results.state
            )));
        }

        Ok(NameQueryState::Pending)
    }
}
