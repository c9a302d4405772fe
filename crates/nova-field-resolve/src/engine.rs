use std::collections::{HashMap, HashSet};

use nova_types::{
    format_raw_type, format_type, ClassDef, ClassId, RawType, Type, TypeEnv, TypeVarId,
};

use crate::{ResolveError, ResolverConfig, Result, TRACE_TARGET};

/// Outcome of a successful resolution call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    Resolved(RawType),
    /// No binding for a type variable is reachable from the context.
    Unresolved,
}

impl Resolution {
    /// Array type over the resolved component; unresolved components stay unresolved.
    ///
    /// Fails once the array would nest deeper than [`RawType::MAX_DIMS`].
    pub fn array_of(self) -> Result<Self> {
        match self {
            Resolution::Resolved(raw) => raw.array_of().map(Resolution::Resolved).ok_or_else(|| {
                ResolveError::invalid(format!(
                    "array type nests deeper than {} dimensions",
                    RawType::MAX_DIMS
                ))
            }),
            Resolution::Unresolved => Ok(Resolution::Unresolved),
        }
    }
}

impl From<RawType> for Resolution {
    fn from(raw: RawType) -> Self {
        Resolution::Resolved(raw)
    }
}

/// Type variable bindings collected while climbing one superclass chain.
///
/// Lives for exactly one top-level [`FieldResolver::resolve`] call.
#[derive(Debug, Default)]
struct Substitution {
    bindings: HashMap<TypeVarId, Resolution>,
    /// Variables whose lookup is in progress.
    pending: HashSet<TypeVarId>,
}

impl Substitution {
    fn get(&self, tv: TypeVarId) -> Option<Resolution> {
        self.bindings.get(&tv).copied()
    }

    fn bind(&mut self, tv: TypeVarId, resolution: Resolution) {
        tracing::trace!(target: TRACE_TARGET, ?tv, ?resolution, "bind type variable");
        self.bindings.insert(tv, resolution);
    }

    /// Mark `tv` as free unless something already bound it.
    fn bind_free(&mut self, tv: TypeVarId) {
        self.bindings.entry(tv).or_insert(Resolution::Unresolved);
    }
}

/// Classes visited during one upward walk.
struct Walk {
    detect_cycles: bool,
    visited: HashSet<ClassId>,
}

impl Walk {
    fn new(detect_cycles: bool) -> Self {
        Self {
            detect_cycles,
            visited: HashSet::new(),
        }
    }
}

/// Resolves the erased runtime type of declared field types against a subclass context.
///
/// The resolver holds no mutable state; one instance may serve any number of calls, and
/// independent instances over the same environment may run on different threads.
#[derive(Clone, Copy)]
pub struct FieldResolver<'env> {
    env: &'env dyn TypeEnv,
    detect_cycles: bool,
}

impl std::fmt::Debug for FieldResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldResolver")
            .field("detect_cycles", &self.detect_cycles)
            .finish_non_exhaustive()
    }
}

impl<'env> FieldResolver<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self::with_config(env, &ResolverConfig::default())
    }

    pub fn with_config(env: &'env dyn TypeEnv, config: &ResolverConfig) -> Self {
        Self {
            env,
            detect_cycles: config.detect_cycles,
        }
    }

    /// Resolve the runtime type of `ty` as seen from `context`.
    ///
    /// `ty` is a field's declared type; the class declaring that field is expected to be on the
    /// superclass chain of `context` (see [`FieldResolver::resolve_field`] for a checked entry
    /// point).
    pub fn resolve(&self, ty: &Type, context: RawType) -> Result<Resolution> {
        let mut subst = Substitution::default();
        let start = Type::Raw(context);
        let result = self.resolve_type(ty, &start, &mut subst);

        match &result {
            Ok(resolution) => tracing::debug!(
                target: TRACE_TARGET,
                ty = %format_type(self.env, ty),
                context = %format_raw_type(self.env, context),
                resolution = %self.describe(*resolution),
                "resolved field type"
            ),
            Err(err) => tracing::debug!(
                target: TRACE_TARGET,
                ty = %format_type(self.env, ty),
                context = %format_raw_type(self.env, context),
                error = %err,
                "failed to resolve field type"
            ),
        }
        result
    }

    /// Resolve field `name` declared on `declaring`, viewed from `context`.
    pub fn resolve_field(
        &self,
        declaring: ClassId,
        name: &str,
        context: RawType,
    ) -> Result<Resolution> {
        let def = self.class_def(declaring)?;
        let field = def.field(name).ok_or_else(|| ResolveError::UnknownField {
            class: def.name.clone(),
            field: name.to_string(),
        })?;
        self.check_in_hierarchy(declaring, context)?;
        self.resolve(&field.ty, context)
    }

    /// Human readable form of a resolution, for logs and test output.
    pub fn describe(&self, resolution: Resolution) -> String {
        match resolution {
            Resolution::Resolved(raw) => format_raw_type(self.env, raw),
            Resolution::Unresolved => "<unresolved>".to_string(),
        }
    }

    fn class_def(&self, id: ClassId) -> Result<&'env ClassDef> {
        self.env.class(id).ok_or(ResolveError::UnknownClass(id))
    }

    fn super_class_id(&self, def: &ClassDef) -> Result<Option<ClassId>> {
        match &def.super_class {
            None => Ok(None),
            Some(Type::Raw(raw)) if !raw.is_array() => Ok(Some(raw.class)),
            Some(Type::Generic(generic)) => Ok(Some(generic.raw)),
            Some(other) => Err(ResolveError::invalid(format!(
                "superclass of {} must be a class type, found {}",
                def.name,
                format_type(self.env, other)
            ))),
        }
    }

    fn check_in_hierarchy(&self, declaring: ClassId, context: RawType) -> Result<()> {
        // Arrays only inherit from `Object`.
        let mut current = Some(if context.is_array() {
            self.env.well_known().object
        } else {
            context.class
        });
        let mut seen = HashSet::new();

        while let Some(id) = current {
            if id == declaring {
                return Ok(());
            }
            let def = self.class_def(id)?;
            if !seen.insert(id) {
                return Err(ResolveError::CyclicHierarchy {
                    class: def.name.clone(),
                });
            }
            current = self.super_class_id(def)?;
        }

        Err(ResolveError::NotInHierarchy {
            declaring: self.class_def(declaring)?.name.clone(),
            context: format_raw_type(self.env, context),
        })
    }

    fn resolve_type(
        &self,
        ty: &Type,
        position: &Type,
        subst: &mut Substitution,
    ) -> Result<Resolution> {
        match ty {
            Type::Raw(raw) => Ok(Resolution::Resolved(*raw)),
            Type::Array(component) => {
                self.resolve_type(component, position, subst)?.array_of()
            }
            Type::Generic(generic) => {
                generic.check_arity(self.env)?;
                Ok(Resolution::Resolved(generic.raw_type()))
            }
            Type::TypeVar(tv) => {
                let owner = self.class_def(tv.owner)?;
                if owner.is_interface() {
                    return Err(ResolveError::invalid(format!(
                        "type variable {} is declared by interface {}",
                        format_type(self.env, ty),
                        owner.name
                    )));
                }
                if tv.index as usize >= owner.type_params.len() {
                    return Err(ResolveError::invalid(format!(
                        "{} declares no type parameter #{}",
                        owner.name, tv.index
                    )));
                }
                self.resolve_type_var(*tv, position, subst)
            }
            Type::Wildcard(_) => Err(ResolveError::invalid(format!(
                "wildcard `{}` cannot be the type of a field",
                format_type(self.env, ty)
            ))),
        }
    }

    fn resolve_type_var(
        &self,
        tv: TypeVarId,
        start: &Type,
        subst: &mut Substitution,
    ) -> Result<Resolution> {
        // Only a supertype argument naming a variable that is not in scope can bring us back here.
        if !subst.pending.insert(tv) {
            return Err(ResolveError::invalid(format!(
                "type variable {} is not in scope at {}",
                format_type(self.env, &Type::TypeVar(tv)),
                format_type(self.env, start)
            )));
        }
        let result = self.walk_type_var(tv, start, subst);
        subst.pending.remove(&tv);
        result
    }

    /// Walk up from `start` until a binding for `tv` is found or the chain proves it free.
    fn walk_type_var(
        &self,
        tv: TypeVarId,
        start: &Type,
        subst: &mut Substitution,
    ) -> Result<Resolution> {
        let mut walk = Walk::new(self.detect_cycles);
        let mut current = start;

        loop {
            let next = match current {
                Type::Raw(raw) if raw.is_array() => {
                    // Array classes have no type parameters of their own; look the variable up
                    // through the `Class` wrapper and re-wrap whatever comes back.
                    tracing::trace!(
                        target: TRACE_TARGET,
                        context = %format_raw_type(self.env, *raw),
                        "array context, searching through class wrapper"
                    );
                    let wrapper = Type::class(self.env.well_known().class);
                    return self.walk_type_var(tv, &wrapper, subst)?.array_of();
                }
                Type::Raw(raw) => {
                    let def = self.enter(raw.class, &mut walk)?;
                    if tv.owner == raw.class {
                        tracing::trace!(
                            target: TRACE_TARGET,
                            class = %def.name,
                            "type variable is free at its declaring class"
                        );
                        return Ok(Resolution::Unresolved);
                    }
                    // A raw class leaves its own parameters unbound for everything above it.
                    for index in 0..def.type_params.len() {
                        subst.bind_free(TypeVarId::new(raw.class, index as u32));
                    }
                    def.super_class.as_ref()
                }
                Type::Generic(generic) => {
                    if let Some(bound) = subst.get(tv) {
                        return Ok(bound);
                    }
                    generic.check_arity(self.env)?;
                    let def = self.enter(generic.raw, &mut walk)?;
                    for (index, arg) in generic.args.iter().enumerate() {
                        let param = TypeVarId::new(generic.raw, index as u32);
                        let resolved = self.resolve_type(arg, current, subst)?;
                        if param == tv {
                            return Ok(resolved);
                        }
                        subst.bind(param, resolved);
                    }
                    def.super_class.as_ref()
                }
                other => {
                    return Err(ResolveError::invalid(format!(
                        "{} cannot appear as a superclass",
                        format_type(self.env, other)
                    )))
                }
            };

            match next {
                Some(super_class) => current = super_class,
                None => return Ok(Resolution::Unresolved),
            }
        }
    }

    fn enter(&self, id: ClassId, walk: &mut Walk) -> Result<&'env ClassDef> {
        let def = self.class_def(id)?;
        if walk.detect_cycles && !walk.visited.insert(id) {
            return Err(ResolveError::CyclicHierarchy {
                class: def.name.clone(),
            });
        }
        Ok(def)
    }
}
