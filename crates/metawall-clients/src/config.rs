use metawall_core::{error::Result, Error};
use std::time::Duration;

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::InputError(format!("variável de ambiente {} ausente", name)))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Configuração do simulador Tenderly
#[derive(Debug, Clone)]
pub struct TenderlyConfig {
    pub base_url: String,
    pub user: String,
    pub project: String,
    pub access_key: String,
    /// Limite de gás enviado em cada simulação
    pub gas: u64,
    pub gas_price: u64,
    pub timeout: Duration,
    /// Memoriza simulações idênticas
    pub use_cache: bool,
}

impl Default for TenderlyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tenderly.co/api/v1".to_string(),
            user: String::new(),
            project: String::new(),
            access_key: String::new(),
            gas: 2_000_000,
            gas_price: 1000,
            timeout: Duration::from_secs(30),
            use_cache: true,
        }
    }
}

impl TenderlyConfig {
    /// Lê `TENDERLY_USER`, `TENDERLY_PROJECT` e `TENDERLY_ACCESS_KEY`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            user: required_env("TENDERLY_USER")?,
            project: required_env("TENDERLY_PROJECT")?,
            access_key: required_env("TENDERLY_ACCESS_KEY")?,
            ..Default::default()
        })
    }

    /// URL do endpoint de simulação
    pub fn simulate_url(&self) -> String {
        format!(
            "{}/account/{}/project/{}/simulate",
            self.base_url.trim_end_matches('/'),
            self.user,
            self.project
        )
    }
}

/// Configuração do serviço de nomes Dune
#[derive(Debug, Clone)]
pub struct DuneConfig {
    pub base_url: String,
    pub api_key: String,
    /// Consulta salva que recebe `contract_address` como parâmetro
    pub query_id: u64,
    pub timeout: Duration,
}

impl Default for DuneConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dune.com/api/v1".to_string(),
            api_key: String::new(),
            query_id: 1528731,
            timeout: Duration::from_secs(10),
        }
    }
}

impl DuneConfig {
    /// Lê `DUNE_ACCESS_KEY` e, opcionalmente, `DUNE_QUERY_ID`
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            api_key: required_env("DUNE_ACCESS_KEY")?,
            ..Default::default()
        };
        if let Some(raw) = optional_env("DUNE_QUERY_ID") {
            config.query_id = raw
                .trim()
                .parse()
                .map_err(|_| Error::InputError(format!("DUNE_QUERY_ID inválido: {}", raw)))?;
        }
        Ok(config)
    }
}

/// Configuração do endpoint QuickNode para metadados de NFT
#[derive(Debug, Clone)]
pub struct QuickNodeConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub per_page: u32,
}

impl Default for QuickNodeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            timeout: Duration::from_secs(10),
            per_page: 10,
        }
    }
}

impl QuickNodeConfig {
    /// Lê `QUICKNODE_URL`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: required_env("QUICKNODE_URL")?,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_url_joins_account_and_project() {
        let config = TenderlyConfig {
            base_url: "http://localhost:1234/".into(),
            user: "alice".into(),
            project: "firewall".into(),
            ..Default::default()
        };
        assert_eq!(
            config.simulate_url(),
            "http://localhost:1234/account/alice/project/firewall/simulate"
        );
    }

    #[test]
    fn missing_env_is_input_error() {
        let err = required_env("METAWALL_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(err, Error::InputError(_)));
    }
}
