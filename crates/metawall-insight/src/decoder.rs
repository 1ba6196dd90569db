use ethereum_types::{Address, U256};
use ethers::abi::{AbiParser, Function, Token};
use metawall_core::{error::Result, Error, TokenStandard};
use once_cell::sync::Lazy;

const ERC20_SIGNATURES: &[&str] = &[
    "transfer(address to, uint256 amount)",
    "transferFrom(address from, address to, uint256 amount)",
    "approve(address spender, uint256 amount)",
    "balanceOf(address owner)",
    "allowance(address owner, address spender)",
    "totalSupply()",
    "name()",
    "symbol()",
    "decimals()",
];

const ERC721_SIGNATURES: &[&str] = &[
    "transferFrom(address from, address to, uint256 tokenId)",
    "safeTransferFrom(address from, address to, uint256 tokenId)",
    "safeTransferFrom(address from, address to, uint256 tokenId, bytes data)",
    "approve(address to, uint256 tokenId)",
    "setApprovalForAll(address operator, bool approved)",
    "getApproved(uint256 tokenId)",
    "isApprovedForAll(address owner, address operator)",
    "balanceOf(address owner)",
    "ownerOf(uint256 tokenId)",
];

const ERC1155_SIGNATURES: &[&str] = &[
    "safeTransferFrom(address from, address to, uint256 id, uint256 amount, bytes data)",
    "safeBatchTransferFrom(address from, address to, uint256[] ids, uint256[] amounts, bytes data)",
    "setApprovalForAll(address operator, bool approved)",
    "isApprovedForAll(address account, address operator)",
    "balanceOf(address account, uint256 id)",
    "balanceOfBatch(address[] accounts, uint256[] ids)",
];

static ERC20_ABI: Lazy<Vec<Function>> = Lazy::new(|| parse_abi(ERC20_SIGNATURES));
static ERC721_ABI: Lazy<Vec<Function>> = Lazy::new(|| parse_abi(ERC721_SIGNATURES));
static ERC1155_ABI: Lazy<Vec<Function>> = Lazy::new(|| parse_abi(ERC1155_SIGNATURES));

fn parse_abi(signatures: &[&str]) -> Vec<Function> {
    let mut parser = AbiParser::default();
    signatures
        .iter()
        .filter_map(|sig| parser.parse_function(sig).ok())
        .collect()
}

fn abi_for(standard: TokenStandard) -> Option<&'static [Function]> {
    match standard {
        TokenStandard::Erc20 => Some(ERC20_ABI.as_slice()),
        TokenStandard::Erc721 => Some(ERC721_ABI.as_slice()),
        TokenStandard::Erc1155 => Some(ERC1155_ABI.as_slice()),
        TokenStandard::Unknown => None,
    }
}

/// Chamada decodificada contra a ABI de um padrão
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCall {
    pub standard: TokenStandard,
    pub function: String,
    pub args: Vec<Token>,
}

/// Efeito semântico de uma chamada de token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    Erc20Transfer { to: Address, amount: U256 },
    Erc20TransferFrom { from: Address, to: Address, amount: U256 },
    Erc20Approve { spender: Address, amount: U256 },
    NftTransfer { from: Address, to: Address, token_id: U256 },
    NftApproveAll { operator: Address, approved: bool },
    NftApprove { to: Address, token_id: U256 },
    /// Chamada ERC-1155, reservada
    MultiToken(String),
    /// Função reconhecida sem efeito relevante (consultas de leitura)
    Other(String),
}

/// Decodifica o calldata de uma chamada segundo a interface selecionada
///
/// O seletor (4 primeiros bytes) é buscado na ABI estática do padrão e o
/// restante é decodificado conforme a assinatura encontrada.
pub fn decode_call(standard: TokenStandard, input: &[u8]) -> Result<DecodedCall> {
    let abi = abi_for(standard)
        .ok_or_else(|| Error::DecodeError("nenhuma interface selecionada".to_string()))?;

    if input.len() < 4 {
        return Err(Error::DecodeError(format!(
            "calldata com {} bytes não contém seletor",
            input.len()
        )));
    }
    let selector = &input[..4];

    let function = abi
        .iter()
        .find(|f| f.short_signature() == selector)
        .ok_or_else(|| {
            Error::DecodeError(format!(
                "seletor 0x{} desconhecido para {}",
                hex::encode(selector),
                standard
            ))
        })?;

    let args = function
        .decode_input(&input[4..])
        .map_err(|e| {
            Error::DecodeError(format!("argumentos inválidos para {}: {}", function.name, e))
        })?;

    Ok(DecodedCall {
        standard,
        function: function.name.clone(),
        args,
    })
}

impl DecodedCall {
    /// Interpreta a chamada como um efeito de token
    pub fn action(&self) -> Result<TokenAction> {
        let action = match (self.standard, self.function.as_str()) {
            (TokenStandard::Erc20, "transfer") => TokenAction::Erc20Transfer {
                to: self.address_arg(0)?,
                amount: self.uint_arg(1)?,
            },
            (TokenStandard::Erc20, "transferFrom") => TokenAction::Erc20TransferFrom {
                from: self.address_arg(0)?,
                to: self.address_arg(1)?,
                amount: self.uint_arg(2)?,
            },
            (TokenStandard::Erc20, "approve") => TokenAction::Erc20Approve {
                spender: self.address_arg(0)?,
                amount: self.uint_arg(1)?,
            },
            (TokenStandard::Erc721, "transferFrom" | "safeTransferFrom") => {
                TokenAction::NftTransfer {
                    from: self.address_arg(0)?,
                    to: self.address_arg(1)?,
                    token_id: self.uint_arg(2)?,
                }
            }
            (TokenStandard::Erc721, "setApprovalForAll") => TokenAction::NftApproveAll {
                operator: self.address_arg(0)?,
                approved: self.bool_arg(1)?,
            },
            (TokenStandard::Erc721, "approve") => TokenAction::NftApprove {
                to: self.address_arg(0)?,
                token_id: self.uint_arg(1)?,
            },
            (TokenStandard::Erc1155, name) => TokenAction::MultiToken(name.to_string()),
            (_, name) => TokenAction::Other(name.to_string()),
        };
        Ok(action)
    }

    fn arg(&self, index: usize) -> Result<&Token> {
        self.args.get(index).ok_or_else(|| {
            Error::DecodeError(format!("{}: argumento {} ausente", self.function, index))
        })
    }

    fn address_arg(&self, index: usize) -> Result<Address> {
        match self.arg(index)? {
            Token::Address(a) => Ok(*a),
            other => Err(self.type_mismatch(index, "address", other)),
        }
    }

    fn uint_arg(&self, index: usize) -> Result<U256> {
        match self.arg(index)? {
            Token::Uint(v) => Ok(*v),
            other => Err(self.type_mismatch(index, "uint256", other)),
        }
    }

    fn bool_arg(&self, index: usize) -> Result<bool> {
        match self.arg(index)? {
            Token::Bool(b) => Ok(*b),
            other => Err(self.type_mismatch(index, "bool", other)),
        }
    }

    fn type_mismatch(&self, index: usize, expected: &str, got: &Token) -> Error {
        Error::DecodeError(format!(
            "{}: argumento {} deveria ser {}, veio {:?}",
            self.function, index, expected, got
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::encode;

    fn calldata(selector: [u8; 4], tokens: &[Token]) -> Vec<u8> {
        let mut data = selector.to_vec();
        data.extend(encode(tokens));
        data
    }

    #[test]
    fn decode_erc20_transfer() {
        let to = Address::repeat_byte(0x22);
        // transfer(address,uint256)
        let data = calldata(
            [0xa9, 0x05, 0x9c, 0xbb],
            &[Token::Address(to), Token::Uint(U256::from(5_000_000u64))],
        );
        let call = decode_call(TokenStandard::Erc20, &data).unwrap();
        assert_eq!(call.function, "transfer");
        assert_eq!(
            call.action().unwrap(),
            TokenAction::Erc20Transfer { to, amount: U256::from(5_000_000u64) }
        );
    }

    #[test]
    fn approve_selector_depends_on_interface() {
        let spender = Address::repeat_byte(0x33);
        // approve(address,uint256) tem o mesmo seletor em ERC-20 e ERC-721
        let data = calldata(
            [0x09, 0x5e, 0xa7, 0xb3],
            &[Token::Address(spender), Token::Uint(U256::from(7u64))],
        );
        let erc20 = decode_call(TokenStandard::Erc20, &data).unwrap().action().unwrap();
        let erc721 = decode_call(TokenStandard::Erc721, &data).unwrap().action().unwrap();
        assert_eq!(erc20, TokenAction::Erc20Approve { spender, amount: U256::from(7u64) });
        assert_eq!(erc721, TokenAction::NftApprove { to: spender, token_id: U256::from(7u64) });
    }

    #[test]
    fn decode_erc721_safe_transfer_with_data() {
        let from = Address::repeat_byte(0x01);
        let to = Address::repeat_byte(0x02);
        // safeTransferFrom(address,address,uint256,bytes)
        let data = calldata(
            [0xb8, 0x8d, 0x4f, 0xde],
            &[
                Token::Address(from),
                Token::Address(to),
                Token::Uint(U256::from(42u64)),
                Token::Bytes(vec![0xde, 0xad]),
            ],
        );
        let call = decode_call(TokenStandard::Erc721, &data).unwrap();
        assert_eq!(call.function, "safeTransferFrom");
        assert_eq!(
            call.action().unwrap(),
            TokenAction::NftTransfer { from, to, token_id: U256::from(42u64) }
        );
    }

    #[test]
    fn unknown_selector_is_decode_error() {
        let data = calldata([0xde, 0xad, 0xbe, 0xef], &[Token::Uint(U256::one())]);
        let err = decode_call(TokenStandard::Erc20, &data).unwrap_err();
        match err {
            Error::DecodeError(msg) => assert!(msg.contains("0xdeadbeef"), "{}", msg),
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[test]
    fn truncated_arguments_are_decode_error() {
        let mut data = calldata(
            [0xa9, 0x05, 0x9c, 0xbb],
            &[Token::Address(Address::repeat_byte(0x22)), Token::Uint(U256::one())],
        );
        data.truncate(40);
        assert!(matches!(decode_call(TokenStandard::Erc20, &data), Err(Error::DecodeError(_))));
        assert!(matches!(decode_call(TokenStandard::Erc20, &[0xa9]), Err(Error::DecodeError(_))));
    }

    #[test]
    fn no_interface_is_decode_error() {
        assert!(matches!(
            decode_call(TokenStandard::Unknown, &[0xa9, 0x05, 0x9c, 0xbb]),
            Err(Error::DecodeError(_))
        ));
    }

    #[test]
    fn erc1155_calls_are_reserved() {
        // setApprovalForAll(address,bool)
        let data = calldata(
            [0xa2, 0x2c, 0xb4, 0x65],
            &[Token::Address(Address::zero()), Token::Bool(true)],
        );
        let call = decode_call(TokenStandard::Erc1155, &data).unwrap();
        assert_eq!(call.action().unwrap(), TokenAction::MultiToken("setApprovalForAll".into()));
    }

    #[test]
    fn all_signatures_parse() {
        assert_eq!(ERC20_ABI.len(), ERC20_SIGNATURES.len());
        assert_eq!(ERC721_ABI.len(), ERC721_SIGNATURES.len());
        assert_eq!(ERC1155_ABI.len(), ERC1155_SIGNATURES.len());
    }
}
