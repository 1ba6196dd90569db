use crate::cache::{CachedName, NameCache};
use crate::ResolverConfig;
use ethereum_types::Address;
use metawall_core::{
    error::Result,
    traits::{NameQueryState, NameService},
    utils::short_address,
    ContractMap, Error,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Rótulo exibido quando o endereço é o próprio remetente
pub const SELF_LABEL: &str = "You";

/// Resolve endereços para nomes legíveis
///
/// Camadas, na ordem: remetente da transação, metadados locais do contrato,
/// cache compartilhado, serviço externo de nomes e, por fim, o endereço
/// abreviado. As duas primeiras camadas nunca consultam o serviço externo.
pub struct AddressResolver {
    names: Arc<dyn NameService>,
    cache: Arc<NameCache>,
    config: ResolverConfig,
}

impl AddressResolver {
    pub fn new(names: Arc<dyn NameService>, cache: Arc<NameCache>, config: ResolverConfig) -> Self {
        Self { names, cache, config }
    }

    /// Cache compartilhado usado pelo resolver
    pub fn cache(&self) -> &Arc<NameCache> {
        &self.cache
    }

    /// Nome de exibição de `address` no contexto de uma transação de `sender`
    pub async fn resolve(
        &self,
        address: Address,
        sender: Address,
        contracts: &ContractMap,
    ) -> String {
        if address == sender {
            return SELF_LABEL.to_string();
        }

        if let Some(name) = contracts.get(&address).and_then(|c| c.human_name()) {
            return name.to_string();
        }

        match self.cache.get(&address) {
            Some(CachedName::Named(name)) => return name,
            Some(CachedName::Unnamed) if !self.config.retry_unresolved => {
                return short_address(&address);
            }
            _ => {}
        }

        match self.lookup(address).await {
            Ok(Some(name)) => {
                self.cache.insert(address, CachedName::Named(name.clone()));
                name
            }
            Ok(None) => {
                debug!(address = ?address, "endereço sem nome no serviço externo");
                self.cache.insert(address, CachedName::Unnamed);
                short_address(&address)
            }
            Err(e) => {
                warn!(address = ?address, error = %e, "falha ao resolver nome");
                short_address(&address)
            }
        }
    }

    /// Consulta o serviço externo com número limitado de polls
    ///
    /// Retorna `ResolutionTimeout` ao esgotar as tentativas sem conclusão.
    pub async fn lookup(&self, address: Address) -> Result<Option<String>> {
        let execution_id = self.names.execute(address).await?;

        for attempt in 1..=self.config.max_poll_attempts {
            match self.names.poll(&execution_id).await? {
                NameQueryState::Completed(name) => {
                    return Ok(name.filter(|n| !n.trim().is_empty()));
                }
                NameQueryState::Pending => {
                    debug!(%execution_id, attempt, "consulta de nome pendente");
                    if attempt < self.config.max_poll_attempts {
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                }
            }
        }

        Err(Error::ResolutionTimeout(format!(
            "execução {} sem conclusão após {} tentativas",
            execution_id, self.config.max_poll_attempts
        )))
    }
}
