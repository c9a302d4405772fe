//! Class hierarchies shared by resolution tests.
//!
//! The generic hierarchy is:
//!
//! ```java
//! class Base<A, B> { A a; B b; }
//! class Mid<C, D, E, F> extends Base<List<E>, F[][][]> {
//!     C c; C[] c_a; C[][] c_a_a;
//!     List<D> ld; List<D>[] ld_a; List<D>[][] ld_a_a;
//!     E e; F f;
//! }
//! class Leaf extends Mid<Integer, Double, List<Integer>, List<Integer>[]> {}
//! ```

use nova_types::{
    ClassDef, ClassId, ClassKind, FieldDef, RawType, Type, TypeEnv, TypeParamDef, TypeStore,
};

pub struct GenericHierarchy {
    pub store: TypeStore,
    pub base: ClassId,
    pub mid: ClassId,
    pub leaf: ClassId,
    pub integer: ClassId,
    pub double: ClassId,
    pub list: ClassId,
}

pub struct PlainHierarchy {
    pub store: TypeStore,
    pub normal_super: ClassId,
    pub normal_sub: ClassId,
    pub integer: ClassId,
    pub list: ClassId,
}

fn class(name: &str, params: &[&str], super_class: Type, fields: Vec<FieldDef>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        type_params: params.iter().map(|p| TypeParamDef::new(*p)).collect(),
        super_class: Some(super_class),
        fields,
    }
}

fn jdk(store: &TypeStore, name: &str) -> ClassId {
    store
        .class_id(name)
        .unwrap_or_else(|| panic!("{name} must exist in minimal JDK"))
}

pub fn generic_hierarchy() -> GenericHierarchy {
    let mut store = TypeStore::with_minimal_jdk();
    let object = Type::class(store.well_known().object);
    let integer = jdk(&store, "java.lang.Integer");
    let double = jdk(&store, "java.lang.Double");
    let list = jdk(&store, "java.util.List");

    let base = store.intern_class_id("com.example.Base");
    let mid = store.intern_class_id("com.example.Mid");

    let a = Type::type_var(base, 0);
    let b = Type::type_var(base, 1);
    store.define_class(
        base,
        class(
            "com.example.Base",
            &["A", "B"],
            object,
            vec![FieldDef::new("a", a), FieldDef::new("b", b)],
        ),
    )
    .expect("Base was interned by this store");

    let c = Type::type_var(mid, 0);
    let d = Type::type_var(mid, 1);
    let e = Type::type_var(mid, 2);
    let f = Type::type_var(mid, 3);
    let list_of = |arg: Type| -> Type {
        Type::generic(&store, list, vec![arg]).expect("List takes one type argument")
    };
    let list_d = list_of(d);
    let base_super = Type::generic(
        &store,
        base,
        vec![list_of(e.clone()), Type::array_n(f.clone(), 3)],
    )
    .expect("Base takes two type arguments");
    store.define_class(
        mid,
        class(
            "com.example.Mid",
            &["C", "D", "E", "F"],
            base_super,
            vec![
                FieldDef::new("c", c.clone()),
                FieldDef::new("c_a", Type::array(c.clone())),
                FieldDef::new("c_a_a", Type::array_n(c, 2)),
                FieldDef::new("ld", list_d.clone()),
                FieldDef::new("ld_a", Type::array(list_d.clone())),
                FieldDef::new("ld_a_a", Type::array_n(list_d, 2)),
                FieldDef::new("e", e),
                FieldDef::new("f", f),
            ],
        ),
    )
    .expect("Mid was interned by this store");

    let list_integer = Type::generic(&store, list, vec![Type::class(integer)])
        .expect("List takes one type argument");
    let mid_super = Type::generic(
        &store,
        mid,
        vec![
            Type::class(integer),
            Type::class(double),
            list_integer.clone(),
            Type::array(list_integer),
        ],
    )
    .expect("Mid takes four type arguments");
    let leaf = store.add_class(class("com.example.Leaf", &[], mid_super, vec![]));

    GenericHierarchy {
        store,
        base,
        mid,
        leaf,
        integer,
        double,
        list,
    }
}

/// A hierarchy without type variables: every field's declared type is its runtime type.
pub fn plain_hierarchy() -> PlainHierarchy {
    let mut store = TypeStore::with_minimal_jdk();
    let object = Type::class(store.well_known().object);
    let integer = jdk(&store, "java.lang.Integer");
    let list = jdk(&store, "java.util.List");

    let stat = FieldDef::new("stat", Type::class(integer));
    let stat_a = FieldDef::new("stat_a", Type::Raw(RawType::array(integer, 1)));
    let normal_super = store.add_class(class(
        "com.example.NormalSuper",
        &[],
        object,
        vec![stat, stat_a],
    ));

    let list_integer = Type::generic(&store, list, vec![Type::class(integer)])
        .expect("List takes one type argument");
    let normal_sub = store.add_class(class(
        "com.example.NormalSub",
        &[],
        Type::class(normal_super),
        vec![
            FieldDef::new("i", Type::class(integer)),
            FieldDef::new("i_a", Type::Raw(RawType::array(integer, 1))),
            FieldDef::new("i_a_a", Type::Raw(RawType::array(integer, 2))),
            FieldDef::new("li", list_integer.clone()),
            FieldDef::new("li_a", Type::array(list_integer.clone())),
            FieldDef::new("li_a_a", Type::array_n(list_integer, 2)),
        ],
    ));

    PlainHierarchy {
        store,
        normal_super,
        normal_sub,
        integer,
        list,
    }
}
