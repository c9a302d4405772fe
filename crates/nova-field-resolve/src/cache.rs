//! Memoization of resolution outcomes shared across threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use nova_types::{RawType, Type};
use parking_lot::Mutex;

use crate::{FieldResolver, Resolution, Result, TRACE_TARGET};

type CacheKey = (Type, RawType);
type CacheCell = Arc<OnceLock<Result<Resolution>>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Caches `(declared type, context)` outcomes.
///
/// Each key is computed at most once even when many threads ask for it concurrently: the map lock
/// is only held to find or insert the key's cell, and the computation itself runs inside the
/// cell's `OnceLock`. A cache must only ever be used with resolvers over the same environment.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<CacheKey, CacheCell>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &self,
        resolver: &FieldResolver<'_>,
        ty: &Type,
        context: RawType,
    ) -> Result<Resolution> {
        let cell = {
            let mut entries = self.entries.lock();
            entries
                .entry((ty.clone(), context))
                .or_default()
                .clone()
        };

        let mut computed = false;
        let outcome = cell.get_or_init(|| {
            computed = true;
            resolver.resolve(ty, context)
        });

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(target: TRACE_TARGET, ?context, "resolution cache hit");
        }
        outcome.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
