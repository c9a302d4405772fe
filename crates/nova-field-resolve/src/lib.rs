//! Resolution of a field's runtime type in the context of a subclass.
//!
//! A field declared as `T` on `class Base<T>` has no fixed runtime type: it depends on how the
//! subclass being inspected instantiates `Base`. [`FieldResolver`] walks the superclass chain of
//! the context class, collects type variable bindings from each parameterized superclass, and
//! returns the erased type the field has there:
//!
//! ```
//! use nova_field_resolve::{FieldResolver, Resolution};
//! use nova_types::{ClassDef, ClassKind, FieldDef, RawType, Type, TypeEnv, TypeParamDef, TypeStore};
//!
//! let mut store = TypeStore::with_minimal_jdk();
//! let object = Type::class(store.well_known().object);
//! let string = store.class_id("java.lang.String").unwrap();
//!
//! // class Box<T> { T value; }
//! let boxed = store.intern_class_id("Box");
//! store.define_class(boxed, ClassDef {
//!     name: "Box".into(),
//!     kind: ClassKind::Class,
//!     type_params: vec![TypeParamDef::new("T")],
//!     super_class: Some(object),
//!     fields: vec![FieldDef::new("value", Type::type_var(boxed, 0))],
//! })
//! .unwrap();
//! // class StringBox extends Box<String> {}
//! let super_class = Type::generic(&store, boxed, vec![Type::class(string)]).unwrap();
//! let string_box = store.add_class(ClassDef {
//!     name: "StringBox".into(),
//!     kind: ClassKind::Class,
//!     type_params: vec![],
//!     super_class: Some(super_class),
//!     fields: vec![],
//! });
//!
//! let resolver = FieldResolver::new(&store);
//! assert_eq!(
//!     resolver.resolve_field(boxed, "value", RawType::class(string_box)).unwrap(),
//!     Resolution::Resolved(RawType::class(string)),
//! );
//! assert_eq!(
//!     resolver.resolve_field(boxed, "value", RawType::class(boxed)).unwrap(),
//!     Resolution::Unresolved,
//! );
//! ```

mod cache;
mod config;
mod engine;
mod error;

pub use cache::{CacheStats, ResolutionCache};
pub use config::{LoggingConfig, ResolverConfig};
pub use engine::{FieldResolver, Resolution};
pub use error::{ConfigError, ResolveError, Result};

/// `tracing` target used by this crate.
pub const TRACE_TARGET: &str = "nova.field_resolve";
