/*!
 * Metawall Utils
 *
 * Utilitários comuns usados em toda a workspace Metawall
 */

use ethereum_types::{Address, U256};
use std::str::FromStr;

/// Casas decimais assumidas quando o token não declara as suas
pub const DEFAULT_DECIMALS: u8 = 18;

/// Dígitos fracionários mantidos na exibição de quantias
pub const FRACTION_DIGITS: usize = 6;

/// Dígitos hexadecimais mantidos em cada ponta do endereço abreviado
const SHORT_ADDRESS_CHARS: usize = 4;

fn strip_0x(hex: &str) -> &str {
    let hex = hex.trim();
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Converte uma string hexadecimal para Address
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = strip_0x(hex);
    if hex_str.len() != 40 {
        return None;
    }
    Address::from_str(hex_str).ok()
}

/// Converte uma string hexadecimal para bytes
pub fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(hex)).ok()
}

/// Converte uma quantidade em hexadecimal (`0x...`) ou decimal para U256
pub fn parse_quantity(raw: &str) -> Option<U256> {
    let raw = raw.trim();
    if raw.starts_with("0x") || raw.starts_with("0X") {
        let digits = strip_0x(raw);
        if digits.is_empty() {
            return Some(U256::zero());
        }
        U256::from_str_radix(digits, 16).ok()
    } else {
        U256::from_dec_str(raw).ok()
    }
}

/// Converte um chain id nos formatos `1`, `0x1` ou `eip155:1`
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("eip155:").unwrap_or(raw);
    if raw.starts_with("0x") || raw.starts_with("0X") {
        u64::from_str_radix(strip_0x(raw), 16).ok()
    } else {
        raw.parse().ok()
    }
}

/// Formata um Address em sua forma canônica (minúsculas, prefixo 0x)
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Abrevia um endereço para exibição, ex.: `0xd921...0bbc`
pub fn short_address(address: &Address) -> String {
    let full = format!("{:x}", address);
    format!(
        "0x{}...{}",
        &full[..SHORT_ADDRESS_CHARS],
        &full[full.len() - SHORT_ADDRESS_CHARS..]
    )
}

/// Formata uma quantia inteira de token como decimal legível
///
/// Divide `amount` por `10^decimals` sem aritmética de ponto flutuante,
/// truncando (sem arredondar) a parte fracionária em [`FRACTION_DIGITS`]
/// dígitos. Zeros à direita são removidos e resultados inteiros saem sem
/// ponto. Sem `decimals`, assume [`DEFAULT_DECIMALS`].
pub fn format_amount(amount: U256, decimals: Option<u8>) -> String {
    format_amount_with(amount, decimals.unwrap_or(DEFAULT_DECIMALS), FRACTION_DIGITS)
}

/// Variante de [`format_amount`] com precisão fracionária explícita
pub fn format_amount_with(amount: U256, decimals: u8, fraction_digits: usize) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let (integer, fraction) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{}{}", "0".repeat(decimals - digits.len()), digits))
    };

    let keep = fraction_digits.min(fraction.len());
    let fraction = fraction[..keep].trim_end_matches('0');
    if fraction.is_empty() {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Símbolo do ativo nativo de uma rede conhecida
pub fn native_symbol(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "ETH",
        5 => "GOERLI_ETH",
        10 => "OPT_ETH",
        56 => "BNB",
        100 => "xDAI",
        137 => "MATIC",
        42161 => "ARB_ETH",
        43114 => "AVAX",
        // Redes desconhecidas usam ETH
        _ => "ETH",
    }
}
