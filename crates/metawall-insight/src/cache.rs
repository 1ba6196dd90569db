use dashmap::DashMap;
use ethereum_types::Address;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resultado memorizado de uma resolução de nome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedName {
    /// Nome encontrado no serviço externo
    Named(String),
    /// Serviço confirmou que o endereço não tem nome
    Unnamed,
}

/// Estatísticas de cache
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub inserts: usize,
}

/// Cache de nomes compartilhado entre análises
///
/// Vive enquanto o processo viver e é criado pela raiz de composição, que o
/// entrega aos resolvers via `Arc`. Escritas concorrentes para o mesmo
/// endereço seguem last-writer-wins.
#[derive(Debug, Default)]
pub struct NameCache {
    entries: DashMap<Address, CachedName>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    inserts: AtomicUsize,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtém um valor do cache
    pub fn get(&self, address: &Address) -> Option<CachedName> {
        match self.entries.get(address) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insere um valor no cache
    pub fn insert(&self, address: Address, name: CachedName) {
        self.entries.insert(address, name);
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Obtém estatísticas do cache
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn get_and_insert_track_stats() {
        let cache = NameCache::new();
        let addr = Address::repeat_byte(0x01);
        assert!(cache.get(&addr).is_none());
        cache.insert(addr, CachedName::Unnamed);
        assert_eq!(cache.get(&addr), Some(CachedName::Unnamed));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, inserts: 1 });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_writers_keep_cache_consistent() {
        let cache = Arc::new(NameCache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0u64..100 {
                        let name = CachedName::Named(format!("n{}", t));
                        cache.insert(Address::from_low_u64_be(i), name);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.stats().inserts, 800);
    }
}
