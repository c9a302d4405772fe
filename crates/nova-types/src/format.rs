//! Java-like rendering of types for diagnostics and logs.

use std::fmt::Write;

use crate::{ClassId, RawType, Type, TypeEnv, WildcardBound};

fn class_name(env: &dyn TypeEnv, id: ClassId) -> String {
    match env.class(id) {
        Some(def) => def.name.clone(),
        None => format!("<unknown {}>", id.to_raw()),
    }
}

/// Render an erased type, e.g. `java.util.List[]`.
pub fn format_raw_type(env: &dyn TypeEnv, raw: RawType) -> String {
    let mut out = class_name(env, raw.class);
    for _ in 0..raw.dims {
        out.push_str("[]");
    }
    out
}

/// Render a declared type, e.g. `com.example.Base<java.util.List<E>, F[][][]>`.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Raw(raw) => out.push_str(&format_raw_type(env, *raw)),
        Type::Array(component) => {
            write_type(env, component, out);
            out.push_str("[]");
        }
        Type::Generic(generic) => {
            out.push_str(&class_name(env, generic.raw));
            out.push('<');
            for (idx, arg) in generic.args.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_type(env, arg, out);
            }
            out.push('>');
        }
        Type::TypeVar(tv) => match env.type_param(*tv) {
            Some(tp) => out.push_str(&tp.name),
            None => {
                let _ = write!(out, "{}#{}", class_name(env, tv.owner), tv.index);
            }
        },
        Type::Wildcard(WildcardBound::Unbounded) => out.push('?'),
        Type::Wildcard(WildcardBound::Extends(bound)) => {
            out.push_str("? extends ");
            write_type(env, bound, out);
        }
        Type::Wildcard(WildcardBound::Super(bound)) => {
            out.push_str("? super ");
            write_type(env, bound, out);
        }
    }
}
