use nova_field_resolve::{FieldResolver, LoggingConfig, Resolution};
use nova_test_utils::{generic_hierarchy, init_tracing, plain_hierarchy};
use nova_types::{ClassId, RawType};

use pretty_assertions::assert_eq;

fn assert_field_type(
    resolver: &FieldResolver<'_>,
    declaring: ClassId,
    field: &str,
    context: ClassId,
    expected: RawType,
) {
    let resolved = resolver
        .resolve_field(declaring, field, RawType::class(context))
        .unwrap_or_else(|err| panic!("resolving `{field}` failed: {err}"));
    assert_eq!(
        resolver.describe(resolved),
        resolver.describe(Resolution::Resolved(expected)),
        "field `{field}`"
    );
}

#[test]
fn fields_without_type_variables() {
    init_tracing(LoggingConfig::default().env_filter());
    let h = plain_hierarchy();
    let resolver = FieldResolver::new(&h.store);
    let (sup, sub) = (h.normal_super, h.normal_sub);

    let cases = [
        (sup, "stat", RawType::class(h.integer)),
        (sup, "stat_a", RawType::array(h.integer, 1)),
        (sub, "i", RawType::class(h.integer)),
        (sub, "i_a", RawType::array(h.integer, 1)),
        (sub, "i_a_a", RawType::array(h.integer, 2)),
        (sub, "li", RawType::class(h.list)),
        (sub, "li_a", RawType::array(h.list, 1)),
        (sub, "li_a_a", RawType::array(h.list, 2)),
    ];
    for (declaring, field, expected) in cases {
        assert_field_type(&resolver, declaring, field, sub, expected);
    }
}

#[test]
fn fields_bound_through_several_superclasses() {
    init_tracing(LoggingConfig::default().env_filter());
    let h = generic_hierarchy();
    let resolver = FieldResolver::new(&h.store);

    let cases = [
        (h.base, "a", RawType::class(h.list)),
        (h.base, "b", RawType::array(h.list, 4)),
        (h.mid, "c", RawType::class(h.integer)),
        (h.mid, "c_a", RawType::array(h.integer, 1)),
        (h.mid, "c_a_a", RawType::array(h.integer, 2)),
        (h.mid, "ld", RawType::class(h.list)),
        (h.mid, "ld_a", RawType::array(h.list, 1)),
        (h.mid, "ld_a_a", RawType::array(h.list, 2)),
        (h.mid, "e", RawType::class(h.list)),
        (h.mid, "f", RawType::array(h.list, 1)),
    ];
    for (declaring, field, expected) in cases {
        assert_field_type(&resolver, declaring, field, h.leaf, expected);
    }
}

#[test]
fn variables_of_a_raw_context_are_unresolved() {
    let h = generic_hierarchy();
    let resolver = FieldResolver::new(&h.store);
    let mid = RawType::class(h.mid);

    for field in ["c", "c_a", "c_a_a", "e", "f"] {
        assert_eq!(
            resolver.resolve_field(h.mid, field, mid).unwrap(),
            Resolution::Unresolved,
            "field `{field}`"
        );
    }

    // `A` is bound to `List<E>`, whose erasure doesn't depend on `E`.
    assert_eq!(
        resolver.resolve_field(h.base, "a", mid).unwrap(),
        Resolution::Resolved(RawType::class(h.list))
    );
    // `B` is bound to `F[][][]` and `F` is free in raw `Mid`.
    assert_eq!(
        resolver.resolve_field(h.base, "b", mid).unwrap(),
        Resolution::Unresolved
    );
    // Parameterized field types erase regardless.
    assert_eq!(
        resolver.resolve_field(h.mid, "ld_a", mid).unwrap(),
        Resolution::Resolved(RawType::array(h.list, 1))
    );
}

#[test]
fn declaring_class_as_context_leaves_variables_free() {
    let h = generic_hierarchy();
    let resolver = FieldResolver::new(&h.store);

    for field in ["a", "b"] {
        assert_eq!(
            resolver
                .resolve_field(h.base, field, RawType::class(h.base))
                .unwrap(),
            Resolution::Unresolved,
            "field `{field}`"
        );
    }
}
