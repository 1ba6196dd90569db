/*!
 * Metawall Clients
 *
 * Adaptadores HTTP para os colaboradores do pipeline de insights:
 * simulação (Tenderly), nomes de contrato (Dune) e metadados de NFT (QuickNode)
 */

pub mod config;
mod dune;
mod quicknode;
mod tenderly;

// Re-exportações públicas
pub use config::{DuneConfig, QuickNodeConfig, TenderlyConfig};
pub use dune::DuneNameService;
pub use quicknode::QuickNodeNftService;
pub use tenderly::TenderlySimulator;
