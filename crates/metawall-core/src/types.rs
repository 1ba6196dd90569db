/*!
 * Metawall Types
 *
 * Tipos comuns usados em toda a workspace Metawall
 */

use crate::error::{Error, Result};
use crate::utils;
use ethereum_types::{Address, U256};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Mapa de contratos indexado por endereço
pub type ContractMap = HashMap<Address, ContractInfo>;

/// Transação ainda não assinada, entrada imutável de uma análise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl Transaction {
    /// Indica se a transação move o ativo nativo da rede
    pub fn has_native_value(&self) -> bool {
        !self.value.is_zero()
    }
}

/// Identificador de rede como enviado pela carteira
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChainIdField {
    Number(u64),
    Text(String),
}

/// Requisição de transação no formato JSON do hook da carteira
///
/// Campos de gás (`gas`, `maxFeePerGas`, ...) são ignorados.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub chain_id: Option<ChainIdField>,
}

impl TryFrom<TransactionRequest> for Transaction {
    type Error = Error;

    fn try_from(req: TransactionRequest) -> Result<Self> {
        let from = utils::hex_to_address(&req.from)
            .ok_or_else(|| {
                Error::InputError(format!("endereço de origem inválido: {}", req.from))
            })?;

        let to = match req.to.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                utils::hex_to_address(raw).ok_or_else(|| {
                    Error::InputError(format!("endereço de destino inválido: {}", raw))
                })?,
            ),
        };

        let value = match req.value.as_deref() {
            None | Some("") => U256::zero(),
            Some(raw) => utils::parse_quantity(raw)
                .ok_or_else(|| Error::InputError(format!("valor inválido: {}", raw)))?,
        };

        let data = match req.data.as_deref() {
            None => Vec::new(),
            Some(raw) => utils::hex_to_bytes(raw)
                .ok_or_else(|| Error::InputError(format!("calldata inválido: {}", raw)))?,
        };

        let chain_id = match req.chain_id {
            Some(ChainIdField::Number(id)) => id,
            Some(ChainIdField::Text(raw)) => utils::parse_chain_id(&raw)
                .ok_or_else(|| Error::InputError(format!("chain id inválido: {}", raw)))?,
            None => return Err(Error::InputError("chain id ausente".to_string())),
        };

        Ok(Transaction { from, to, value, data, chain_id })
    }
}

/// Metadados de token associados a um contrato
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// Informações de um contrato tocado pela simulação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub address: Address,
    pub name: Option<String>,
    pub standards: Option<Vec<String>>,
    pub token_data: Option<TokenData>,
}

impl ContractInfo {
    /// Nome legível do contrato, se não vazio
    pub fn human_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Símbolo do token, com fallback para o nome do contrato
    pub fn display_symbol(&self) -> Option<&str> {
        self.token_data
            .as_ref()
            .and_then(|t| t.symbol.as_deref())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.human_name())
    }

    /// Casas decimais declaradas pelo token
    pub fn decimals(&self) -> Option<u8> {
        self.token_data.as_ref().and_then(|t| t.decimals)
    }

    /// Indica se o contrato declara algum padrão
    pub fn has_standards(&self) -> bool {
        self.standards.as_ref().map_or(false, |s| !s.is_empty())
    }
}

/// Entrada do trace de chamadas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTraceEntry {
    pub from: Address,
    pub to: Address,
    pub input: Vec<u8>,
}

/// Resultado da simulação de uma transação
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub status: bool,
    pub error_message: Option<String>,
    pub call_trace: Vec<CallTraceEntry>,
    pub contracts: Vec<ContractInfo>,
}

impl SimulationResult {
    /// Indexa os contratos por endereço
    pub fn contract_map(&self) -> ContractMap {
        self.contracts
            .iter()
            .map(|c| (c.address, c.clone()))
            .collect()
    }
}

/// Padrão de token suportado na decodificação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenStandard {
    Erc20,
    Erc721,
    Erc1155,
    Unknown,
}

impl TokenStandard {
    /// Converte uma tag declarada pelo simulador
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "erc20" => TokenStandard::Erc20,
            "erc721" => TokenStandard::Erc721,
            "erc1155" => TokenStandard::Erc1155,
            _ => TokenStandard::Unknown,
        }
    }
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStandard::Erc20 => write!(f, "erc20"),
            TokenStandard::Erc721 => write!(f, "erc721"),
            TokenStandard::Erc1155 => write!(f, "erc1155"),
            TokenStandard::Unknown => write!(f, "unknown"),
        }
    }
}

/// Severidade de um insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "FAILED")]
    Failed,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Failed => write!(f, "FAILED"),
        }
    }
}

/// Tipo de efeito descrito por um insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightKind {
    NativeTransfer,
    Transfer,
    Approve,
    NftTransfer,
    NftApproveAll,
    NftApprove,
}

impl InsightKind {
    /// Rótulo exibido no título
    pub fn label(&self) -> &'static str {
        match self {
            InsightKind::NativeTransfer => "Native transfer",
            InsightKind::Transfer => "Transfer",
            InsightKind::Approve => "Approve",
            InsightKind::NftTransfer => "NFT transfer",
            InsightKind::NftApproveAll => "NFT approving to all",
            InsightKind::NftApprove => "NFT approve",
        }
    }
}

/// Insight ainda sem numeração
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDraft {
    pub kind: InsightKind,
    pub description: String,
    pub severity: Severity,
}

/// Insight numerado, pronto para exibição
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

#[derive(Serialize)]
struct InsightBody<'a> {
    description: &'a str,
    severity: Severity,
}

/// Título do insight emitido quando a simulação reverte
pub const FAILED_TITLE: &str = "Transaction failed";

/// Coleção ordenada de insights
///
/// A ordem de inserção é preservada e cada título recebe um prefixo
/// numérico crescente, o que garante títulos únicos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightSet {
    entries: Vec<Insight>,
}

impl InsightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resultado de uma simulação revertida: um único insight de falha
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            entries: vec![Insight {
                title: FAILED_TITLE.to_string(),
                description: reason.into(),
                severity: Severity::Failed,
            }],
        }
    }

    /// Adiciona um insight numerando-o pela posição
    pub fn push(&mut self, draft: InsightDraft) -> &Insight {
        let index = self.entries.len() + 1;
        self.entries.push(Insight {
            title: format!("{}. {}", index, draft.kind.label()),
            description: draft.description,
            severity: draft.severity,
        });
        &self.entries[index - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Insight> {
        self.entries.iter()
    }

    /// Busca um insight pelo título
    pub fn get(&self, title: &str) -> Option<&Insight> {
        self.entries.iter().find(|i| i.title == title)
    }
}

impl Serialize for InsightSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for insight in &self.entries {
            map.serialize_entry(
                &insight.title,
                &InsightBody {
                    description: &insight.description,
                    severity: insight.severity,
                },
            )?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: InsightKind) -> InsightDraft {
        InsightDraft { kind, description: "x".into(), severity: Severity::Ok }
    }

    #[test]
    fn insight_set_numbers_in_insertion_order() {
        let mut set = InsightSet::new();
        set.push(draft(InsightKind::NativeTransfer));
        set.push(draft(InsightKind::Transfer));
        set.push(draft(InsightKind::Transfer));
        let titles: Vec<_> = set.iter().map(|i| i.title.clone()).collect();
        assert_eq!(titles, vec!["1. Native transfer", "2. Transfer", "3. Transfer"]);
    }

    #[test]
    fn insight_set_serializes_as_ordered_object() {
        let mut set = InsightSet::new();
        for _ in 0..11 {
            set.push(draft(InsightKind::Approve));
        }
        let json = serde_json::to_string(&set).unwrap();
        let first = json.find("\"1. Approve\"").unwrap();
        let tenth = json.find("\"10. Approve\"").unwrap();
        let second = json.find("\"2. Approve\"").unwrap();
        assert!(first < second && second < tenth);
        assert!(json.contains("\"severity\":\"OK\""));
    }

    #[test]
    fn failed_set_has_single_entry() {
        let set = InsightSet::failed("execution reverted");
        assert_eq!(set.len(), 1);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["Transaction failed"]["description"], "execution reverted");
        assert_eq!(json["Transaction failed"]["severity"], "FAILED");
    }

    #[test]
    fn transaction_request_parses_wallet_payload() {
        let req: TransactionRequest = serde_json::from_str(
            r#"{"from":"0xc1531732b4f63b77a5ea38f4e5dbf5553f02c9be",
                "to":"0xb4fbf271143f4fbf7b91a5ded31805e42b2208d6",
                "value":"0x5af3107a4000","data":"0xd0e30db0","gas":"0x6d3e",
                "maxFeePerGas":"0x68e8a8b8","chainId":"eip155:1"}"#,
        )
        .unwrap();
        let tx = Transaction::try_from(req).unwrap();
        assert_eq!(tx.chain_id, 1);
        assert_eq!(tx.value, U256::from(0x5af3107a4000u64));
        assert_eq!(tx.data, vec![0xd0, 0xe3, 0x0d, 0xb0]);
        assert!(tx.to.is_some());
        assert!(tx.has_native_value());
    }

    #[test]
    fn transaction_request_rejects_bad_sender() {
        let req: TransactionRequest =
            serde_json::from_str(r#"{"from":"0xzz","chainId":1}"#).unwrap();
        assert!(matches!(Transaction::try_from(req), Err(Error::InputError(_))));
    }

    #[test]
    fn transaction_request_requires_chain_id() {
        let req: TransactionRequest = serde_json::from_str(
            r#"{"from":"0xc1531732b4f63b77a5ea38f4e5dbf5553f02c9be"}"#,
        )
        .unwrap();
        assert!(matches!(Transaction::try_from(req), Err(Error::InputError(_))));
    }

    #[test]
    fn display_symbol_falls_back_to_name() {
        let mut info = ContractInfo {
            address: Address::repeat_byte(1),
            name: Some("Tether".into()),
            standards: None,
            token_data: Some(TokenData { symbol: Some("".into()), decimals: None }),
        };
        assert_eq!(info.display_symbol(), Some("Tether"));
        info.token_data = Some(TokenData { symbol: Some("USDT".into()), decimals: Some(6) });
        assert_eq!(info.display_symbol(), Some("USDT"));
        assert_eq!(info.decimals(), Some(6));
    }

    #[test]
    fn standard_tags_are_case_insensitive() {
        assert_eq!(TokenStandard::from_tag("ERC721"), TokenStandard::Erc721);
        assert_eq!(TokenStandard::from_tag("erc777"), TokenStandard::Unknown);
    }
}
