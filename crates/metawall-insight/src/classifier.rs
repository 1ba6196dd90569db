use metawall_core::{ContractInfo, TokenStandard};

/// Ordem de prioridade quando um contrato declara vários padrões
const PRIORITY: [TokenStandard; 3] = [
    TokenStandard::Erc20,
    TokenStandard::Erc721,
    TokenStandard::Erc1155,
];

/// Seleciona a interface de token usada para decodificar chamadas ao contrato
///
/// Retorna [`TokenStandard::Unknown`] quando `standards` está ausente, vazio
/// ou sem nenhuma tag suportada.
pub fn classify(contract: &ContractInfo) -> TokenStandard {
    let declared: Vec<TokenStandard> = match &contract.standards {
        Some(tags) => tags.iter().map(|t| TokenStandard::from_tag(t)).collect(),
        None => return TokenStandard::Unknown,
    };

    PRIORITY
        .into_iter()
        .find(|standard| declared.contains(standard))
        .unwrap_or(TokenStandard::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethereum_types::Address;

    fn contract(standards: Option<Vec<&str>>) -> ContractInfo {
        ContractInfo {
            address: Address::repeat_byte(0x11),
            name: None,
            standards: standards.map(|s| s.into_iter().map(String::from).collect()),
            token_data: None,
        }
    }

    #[test]
    fn test_priority_prefers_erc20() {
        assert_eq!(classify(&contract(Some(vec!["erc721", "erc20"]))), TokenStandard::Erc20);
        assert_eq!(classify(&contract(Some(vec!["erc1155", "erc721"]))), TokenStandard::Erc721);
        assert_eq!(classify(&contract(Some(vec!["erc1155"]))), TokenStandard::Erc1155);
    }

    #[test]
    fn test_missing_or_unsupported_standards() {
        assert_eq!(classify(&contract(None)), TokenStandard::Unknown);
        assert_eq!(classify(&contract(Some(vec![]))), TokenStandard::Unknown);
        assert_eq!(classify(&contract(Some(vec!["erc777", "proxy"]))), TokenStandard::Unknown);
    }
}
