use ethereum_types::{Address, U256};
use metawall_core::{error::Result, traits::NftInfoService, utils::format_address, Error};
use std::sync::Arc;

/// Transferência de NFT a ser enriquecida
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftTransfer {
    pub from: Address,
    pub to: Address,
    pub contract: Address,
    pub token_id: U256,
}

/// Complementa transferências de NFT com dados da coleção
pub struct NftEnricher {
    service: Arc<dyn NftInfoService>,
}

impl NftEnricher {
    pub fn new(service: Arc<dyn NftInfoService>) -> Self {
        Self { service }
    }

    /// Monta o fragmento de descrição com nome do ativo, coleção e dono atual
    ///
    /// `receiver` é o nome de exibição já resolvido do destinatário.
    pub async fn enrich(&self, transfer: &NftTransfer, receiver: &str) -> Result<String> {
        let asset = self
            .service
            .fetch(transfer.from, transfer.contract, transfer.token_id)
            .await
            .map_err(|e| Error::EnrichmentError(e.to_string()))?
            .ok_or_else(|| {
                Error::EnrichmentError(format!(
                    "token {} do contrato {} não encontrado",
                    transfer.token_id,
                    format_address(&transfer.contract)
                ))
            })?;

        Ok(format!(
            "Name: {}, Collection: {}, Sender: {}, Receiver: {}",
            asset.name, asset.collection_name, asset.current_owner, receiver
        ))
    }
}
