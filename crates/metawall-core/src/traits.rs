/*!
 * Metawall Traits
 *
 * Contratos dos colaboradores externos consumidos pelo pipeline de insights
 */

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{SimulationResult, Transaction};
use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Trait para simuladores de execução
#[async_trait]
pub trait Simulator: Send + Sync {
    /// Simula a transação e retorna o trace completo com metadados de contratos
    async fn simulate(&self, tx: &Transaction) -> Result<SimulationResult>;
}

/// Estado de uma consulta assíncrona de nome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameQueryState {
    /// Consulta ainda em execução
    Pending,
    /// Consulta concluída, com ou sem nome encontrado
    Completed(Option<String>),
}

/// Trait para serviços de nome de contrato com protocolo execute/poll
#[async_trait]
pub trait NameService: Send + Sync {
    /// Inicia uma consulta e retorna o identificador de execução
    async fn execute(&self, address: Address) -> Result<String>;

    /// Consulta o estado de uma execução iniciada
    async fn poll(&self, execution_id: &str) -> Result<NameQueryState>;
}

/// Dados de um ativo NFT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub current_owner: String,
}

/// Trait para serviços de metadados de coleções NFT
#[async_trait]
pub trait NftInfoService: Send + Sync {
    /// Busca um ativo; `None` quando o serviço não conhece o token
    async fn fetch(
        &self,
        owner: Address,
        contract: Address,
        token_id: U256,
    ) -> Result<Option<NftAsset>>;
}
