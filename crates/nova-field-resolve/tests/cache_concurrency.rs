use std::sync::Barrier;

use nova_field_resolve::{CacheStats, FieldResolver, Resolution, ResolutionCache};
use nova_test_utils::generic_hierarchy;
use nova_types::{RawType, Type};

use pretty_assertions::assert_eq;

#[test]
fn concurrent_lookups_compute_each_key_once() {
    let h = generic_hierarchy();
    let cache = ResolutionCache::new();
    let b = Type::type_var(h.base, 1);
    let e = Type::type_var(h.mid, 2);
    let leaf = RawType::class(h.leaf);

    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                let resolver = FieldResolver::new(&h.store);
                barrier.wait();
                assert_eq!(
                    cache.resolve(&resolver, &b, leaf).unwrap(),
                    Resolution::Resolved(RawType::array(h.list, 4))
                );
                assert_eq!(
                    cache.resolve(&resolver, &e, leaf).unwrap(),
                    Resolution::Resolved(RawType::class(h.list))
                );
            });
        }
    });

    assert_eq!(cache.len(), 2);
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 2 * THREADS as u64 - 2,
            misses: 2,
        }
    );
}

#[test]
fn failures_are_cached_too() {
    let h = generic_hierarchy();
    let resolver = FieldResolver::new(&h.store);
    let cache = ResolutionCache::new();
    let wildcard = Type::Wildcard(nova_types::WildcardBound::Unbounded);
    let leaf = RawType::class(h.leaf);

    let first = cache.resolve(&resolver, &wildcard, leaf).unwrap_err();
    let second = cache.resolve(&resolver, &wildcard, leaf).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn contexts_are_part_of_the_key() {
    let h = generic_hierarchy();
    let resolver = FieldResolver::new(&h.store);
    let cache = ResolutionCache::new();
    let c = Type::type_var(h.mid, 0);

    assert_eq!(
        cache.resolve(&resolver, &c, RawType::class(h.leaf)).unwrap(),
        Resolution::Resolved(RawType::class(h.integer))
    );
    assert_eq!(
        cache.resolve(&resolver, &c, RawType::class(h.mid)).unwrap(),
        Resolution::Unresolved
    );
    assert_eq!(cache.len(), 2);
}
