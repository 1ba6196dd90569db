use crate::cache::NameCache;
use crate::classifier::classify;
use crate::decoder::{decode_call, TokenAction};
use crate::enricher::{NftEnricher, NftTransfer};
use crate::resolver::AddressResolver;
use crate::InsightConfig;
use ethereum_types::{Address, U256};
use metawall_core::{
    error::Result,
    traits::{NameService, NftInfoService, Simulator},
    utils::{format_amount_with, native_symbol, short_address, DEFAULT_DECIMALS},
    CallTraceEntry, ContractInfo, ContractMap, InsightDraft, InsightKind, InsightSet, Severity,
    SimulationResult, TokenStandard, Transaction,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Descrição usada quando o simulador não informa o motivo da falha
const UNKNOWN_FAILURE: &str = "unknown error";

/// Destinatário exibido em transações de criação de contrato
const CONTRACT_CREATION: &str = "new contract";

/// Orquestra a derivação de insights de uma transação
///
/// Simula a transação, indexa os contratos, emite a transferência nativa e
/// percorre o trace do último índice até o índice 1 (o índice 0 não é
/// analisado). Cada entrada é processada isoladamente: falhas de
/// decodificação, resolução ou enriquecimento nunca interrompem a análise.
pub struct InsightBuilder {
    simulator: Arc<dyn Simulator>,
    resolver: AddressResolver,
    enricher: NftEnricher,
    config: InsightConfig,
}

impl InsightBuilder {
    /// Cria um novo builder
    ///
    /// `cache` pertence à raiz de composição e pode ser compartilhado entre
    /// vários builders.
    pub fn new(
        simulator: Arc<dyn Simulator>,
        names: Arc<dyn NameService>,
        nfts: Arc<dyn NftInfoService>,
        cache: Arc<NameCache>,
        config: InsightConfig,
    ) -> Self {
        let resolver = AddressResolver::new(names, cache, config.resolver.clone());
        let enricher = NftEnricher::new(nfts);
        Self {
            simulator,
            resolver,
            enricher,
            config,
        }
    }

    /// Simula a transação e deriva seus insights
    ///
    /// Só falha quando o próprio simulador falha; reverts da transação viram
    /// um insight de falha.
    pub async fn derive_insights(&self, tx: &Transaction) -> Result<InsightSet> {
        let simulation = self.simulator.simulate(tx).await?;
        Ok(self.build(tx, &simulation).await)
    }

    /// Deriva insights a partir de uma simulação já obtida
    pub async fn build(&self, tx: &Transaction, simulation: &SimulationResult) -> InsightSet {
        if !simulation.status {
            let reason = simulation
                .error_message
                .clone()
                .unwrap_or_else(|| UNKNOWN_FAILURE.to_string());
            info!(%reason, "simulação reverteu");
            return InsightSet::failed(reason);
        }

        let contracts = simulation.contract_map();
        let mut insights = InsightSet::new();

        if tx.has_native_value() {
            insights.push(self.native_transfer(tx, &contracts).await);
        }

        for (index, entry) in simulation.call_trace.iter().enumerate().skip(1).rev() {
            match self.analyze_entry(tx, entry, &contracts).await {
                Ok(Some(draft)) => {
                    insights.push(draft);
                }
                Ok(None) => {}
                Err(e) => warn!(index, error = %e, "entrada do trace ignorada"),
            }
        }

        insights
    }

    async fn native_transfer(&self, tx: &Transaction, contracts: &ContractMap) -> InsightDraft {
        let recipient = match tx.to {
            Some(to) => self.resolver.resolve(to, tx.from, contracts).await,
            None => CONTRACT_CREATION.to_string(),
        };
        InsightDraft {
            kind: InsightKind::NativeTransfer,
            description: format!(
                "Transfer {} {} to {}",
                self.amount(tx.value, None),
                native_symbol(tx.chain_id),
                recipient
            ),
            severity: Severity::Ok,
        }
    }

    /// Analisa uma entrada do trace
    ///
    /// `Ok(None)` significa que a entrada não produz insight.
    async fn analyze_entry(
        &self,
        tx: &Transaction,
        entry: &CallTraceEntry,
        contracts: &ContractMap,
    ) -> Result<Option<InsightDraft>> {
        let contract = match contracts.get(&entry.to) {
            Some(c) => c,
            None => {
                debug!(contract = ?entry.to, "contrato desconhecido");
                return Ok(None);
            }
        };

        if !contract.has_standards() {
            return Ok(None);
        }

        let standard = classify(contract);
        if standard == TokenStandard::Unknown {
            return Ok(None);
        }

        let call = decode_call(standard, &entry.input)?;
        let symbol = contract
            .display_symbol()
            .map(String::from)
            .unwrap_or_else(|| short_address(&contract.address));

        let draft = match call.action()? {
            TokenAction::Erc20Transfer { to, amount } => {
                self.token_transfer(tx, contract, &symbol, to, amount, contracts).await
            }
            TokenAction::Erc20TransferFrom { from, to, amount } => {
                debug!(from = ?from, "origem de transferFrom não exibida");
                self.token_transfer(tx, contract, &symbol, to, amount, contracts).await
            }
            TokenAction::Erc20Approve { spender, amount } => {
                let spender = self.resolver.resolve(spender, tx.from, contracts).await;
                InsightDraft {
                    kind: InsightKind::Approve,
                    description: format!(
                        "Approve {} to spend {} {}",
                        spender,
                        self.amount(amount, contract.decimals()),
                        symbol
                    ),
                    severity: Severity::Ok,
                }
            }
            TokenAction::NftTransfer { from, to, token_id } => {
                let transfer = NftTransfer {
                    from,
                    to,
                    contract: contract.address,
                    token_id,
                };
                self.nft_transfer(tx, &symbol, &transfer, contracts).await
            }
            TokenAction::NftApproveAll { operator, approved } => {
                let operator = self.resolver.resolve(operator, tx.from, contracts).await;
                let description = if approved {
                    format!("Allow {} to transfer all your {} NFTs", operator, symbol)
                } else {
                    format!("Revoke {} permission to transfer all your {} NFTs", operator, symbol)
                };
                InsightDraft {
                    kind: InsightKind::NftApproveAll,
                    description,
                    severity: Severity::Warning,
                }
            }
            TokenAction::NftApprove { to, token_id } => {
                let to = self.resolver.resolve(to, tx.from, contracts).await;
                InsightDraft {
                    kind: InsightKind::NftApprove,
                    description: format!("Allow {} to transfer {} #{}", to, symbol, token_id),
                    severity: Severity::Warning,
                }
            }
            TokenAction::MultiToken(function) => {
                // TODO: insights de ERC-1155 (transferências simples e em lote)
                debug!(%function, "chamada ERC-1155 sem insight");
                return Ok(None);
            }
            TokenAction::Other(function) => {
                debug!(%function, "chamada sem efeito relevante");
                return Ok(None);
            }
        };

        Ok(Some(draft))
    }

    async fn token_transfer(
        &self,
        tx: &Transaction,
        contract: &ContractInfo,
        symbol: &str,
        to: Address,
        amount: U256,
        contracts: &ContractMap,
    ) -> InsightDraft {
        let to = self.resolver.resolve(to, tx.from, contracts).await;
        InsightDraft {
            kind: InsightKind::Transfer,
            description: format!(
                "Transfer {} {} to {}",
                self.amount(amount, contract.decimals()),
                symbol,
                to
            ),
            severity: Severity::Ok,
        }
    }

    async fn nft_transfer(
        &self,
        tx: &Transaction,
        symbol: &str,
        transfer: &NftTransfer,
        contracts: &ContractMap,
    ) -> InsightDraft {
        let from = self.resolver.resolve(transfer.from, tx.from, contracts).await;
        let to = self.resolver.resolve(transfer.to, tx.from, contracts).await;
        let plain = format!(
            "Transfer {} #{} from {} to {}",
            symbol, transfer.token_id, from, to
        );

        let description = match self.enricher.enrich(transfer, &to).await {
            Ok(fragment) => format!("{}. {}", plain, fragment),
            Err(e) => {
                warn!(error = %e, "enriquecimento de NFT indisponível");
                plain
            }
        };

        InsightDraft {
            kind: InsightKind::NftTransfer,
            description,
            severity: Severity::Ok,
        }
    }

    fn amount(&self, amount: U256, decimals: Option<u8>) -> String {
        format_amount_with(
            amount,
            decimals.unwrap_or(DEFAULT_DECIMALS),
            self.config.fraction_digits,
        )
    }
}
