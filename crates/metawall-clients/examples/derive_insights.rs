//! Deriva os insights de uma transação usando Tenderly, Dune e QuickNode.
//!
//! Requer `TENDERLY_USER`, `TENDERLY_PROJECT`, `TENDERLY_ACCESS_KEY`,
//! `DUNE_ACCESS_KEY` e `QUICKNODE_URL` no ambiente:
//!
//! ```bash
//! cargo run -p metawall-clients --example derive_insights -- [ARQUIVO_JSON]
//! ```
//!
//! Sem argumento, analisa uma transferência de ETH de exemplo.

use std::env;
use std::fs;
use std::sync::Arc;

use metawall_clients::{
    DuneConfig, DuneNameService, QuickNodeConfig, QuickNodeNftService, TenderlyConfig,
    TenderlySimulator,
};
use metawall_core::{Transaction, TransactionRequest};
use metawall_insight::{InsightBuilder, InsightConfig, NameCache};

const SAMPLE_REQUEST: &str = r#"{
    "from": "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
    "to": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
    "value": "0x16345785d8a0000",
    "data": "0x",
    "chainId": "0x1"
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let json = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE_REQUEST.to_string(),
    };
    let request: TransactionRequest = serde_json::from_str(&json)?;
    let tx = Transaction::try_from(request)?;

    let simulator = Arc::new(TenderlySimulator::new(TenderlyConfig::from_env()?)?);
    let names = Arc::new(DuneNameService::new(DuneConfig::from_env()?)?);
    let nfts = Arc::new(QuickNodeNftService::new(QuickNodeConfig::from_env()?)?);
    let cache = Arc::new(NameCache::new());

    let config = InsightConfig::default();
    let builder = InsightBuilder::new(simulator, names, nfts, cache.clone(), config);
    let insights = builder.derive_insights(&tx).await?;

    println!("{}", serde_json::to_string_pretty(&insights)?);

    let stats = cache.stats();
    println!(
        "Cache de nomes: {} entradas, {} acertos, {} falhas",
        cache.len(),
        stats.hits,
        stats.misses
    );

    Ok(())
}
