use async_trait::async_trait;
use ethereum_types::Address;
use futures::future::join_all;
use metawall_core::error::Result;
use metawall_core::traits::{NameQueryState, NameService};
use metawall_core::ContractMap;
use metawall_insight::{AddressResolver, CachedName, NameCache, ResolverConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct EchoNames {
    executes: AtomicUsize,
}

#[async_trait]
impl NameService for EchoNames {
    async fn execute(&self, address: Address) -> Result<String> {
        self.executes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{:x}", address))
    }

    async fn poll(&self, execution_id: &str) -> Result<NameQueryState> {
        tokio::task::yield_now().await;
        Ok(NameQueryState::Completed(Some(format!("name-{}", &execution_id[..4]))))
    }
}

fn config() -> ResolverConfig {
    ResolverConfig {
        max_poll_attempts: 3,
        poll_interval: Duration::from_millis(1),
        retry_unresolved: false,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_runs_share_one_cache() {
    let names = Arc::new(EchoNames::default());
    let cache = Arc::new(NameCache::new());

    // vários resolvers, como análises concorrentes, compartilhando o mesmo cache
    let resolvers: Vec<_> = (0..4)
        .map(|_| Arc::new(AddressResolver::new(names.clone(), cache.clone(), config())))
        .collect();

    let mut handles = Vec::new();
    for resolver in &resolvers {
        for i in 1u64..=16 {
            let resolver = Arc::clone(resolver);
            handles.push(tokio::spawn(async move {
                let addr = Address::from_low_u64_be(i);
                resolver.resolve(addr, Address::zero(), &ContractMap::new()).await
            }));
        }
    }
    let names_seen: Vec<String> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(names_seen.len(), 64);
    assert!(names_seen.iter().all(|n| n == "name-0000"));
    assert_eq!(cache.len(), 16);
    // corridas podem repetir consultas, mas nunca mais de uma por resolver e endereço
    let executes = names.executes.load(Ordering::SeqCst);
    assert!((16..=64).contains(&executes));

    // depois de populado, nenhuma nova consulta externa
    let before = names.executes.load(Ordering::SeqCst);
    let again = resolvers[0]
        .resolve(Address::from_low_u64_be(3), Address::zero(), &ContractMap::new())
        .await;
    assert_eq!(again, "name-0000");
    assert_eq!(names.executes.load(Ordering::SeqCst), before);
    assert!(matches!(cache.get(&Address::from_low_u64_be(3)), Some(CachedName::Named(_))));
}
