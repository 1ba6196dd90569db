/*!
 * Metawall Insight
 *
 * Pipeline que transforma o trace de uma transação simulada em uma lista
 * ordenada de insights legíveis (transferências, aprovações, movimentação
 * de NFTs) com marcador de severidade, para exibição antes da assinatura.
 */

mod builder;
mod cache;
mod classifier;
mod decoder;
mod enricher;
mod resolver;

use metawall_core::utils::FRACTION_DIGITS;
use std::time::Duration;

// Re-exportações públicas
pub use builder::*;
pub use cache::*;
pub use classifier::*;
pub use decoder::*;
pub use enricher::*;
pub use resolver::*;

/// Configuração do resolver de nomes
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Número máximo de polls por consulta ao serviço de nomes
    pub max_poll_attempts: u32,
    /// Intervalo fixo entre polls
    pub poll_interval: Duration,
    /// Consulta novamente endereços já confirmados como sem nome
    pub retry_unresolved: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_poll_attempts: 10,
            poll_interval: Duration::from_secs(1),
            retry_unresolved: false,
        }
    }
}

/// Configuração para derivação de insights
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Configuração do resolver de nomes
    pub resolver: ResolverConfig,
    /// Dígitos fracionários exibidos nas quantias
    pub fraction_digits: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            fraction_digits: FRACTION_DIGITS,
        }
    }
}
