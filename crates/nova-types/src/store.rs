use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    ClassDef, ClassId, ClassKind, FieldDef, Result, Type, TypeEnv, TypeError, TypeParamDef,
    WellKnownTypes,
};

const OBJECT: &str = "java.lang.Object";
const CLASS: &str = "java.lang.Class";

/// In-memory class metadata.
///
/// Ids are allocated densely in insertion order. A name can be interned before its definition is
/// known (`intern_class_id`) so that mutually-referencing classes can be built in any order.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    names: Vec<String>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

#[derive(Serialize, Deserialize)]
struct StoreSnapshot {
    classes: Vec<SnapshotClass>,
}

/// One slot of a snapshot; `definition` is absent for interned-but-undefined classes.
#[derive(Serialize, Deserialize)]
struct SnapshotClass {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    definition: Option<ClassDef>,
}

impl Default for TypeStore {
    /// A store containing only `java.lang.Object` and `java.lang.Class<T>`.
    fn default() -> Self {
        let placeholder = WellKnownTypes {
            object: ClassId::new(0),
            class: ClassId::new(1),
        };
        let mut store = Self {
            classes: Vec::new(),
            names: Vec::new(),
            by_name: HashMap::new(),
            well_known: placeholder,
        };

        let object = store.add_class(ClassDef {
            name: OBJECT.to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            fields: vec![],
        });
        let class = store.add_class(ClassDef {
            name: CLASS.to_string(),
            kind: ClassKind::Class,
            type_params: vec![TypeParamDef::new("T")],
            super_class: Some(Type::class(object)),
            fields: vec![],
        });
        store.well_known = WellKnownTypes { object, class };
        store
    }
}

impl TypeStore {
    /// A store with the handful of JDK classes used by tests and fixtures.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::default();
        let object = Some(Type::class(store.well_known.object));

        let number = store.add_class(class_def("java.lang.Number", object.clone()));
        for name in ["java.lang.Integer", "java.lang.Double", "java.lang.Long"] {
            store.add_class(class_def(name, Some(Type::class(number))));
        }
        store.add_class(class_def("java.lang.String", object.clone()));
        store.add_class(interface_def("java.lang.Cloneable", vec![]));
        store.add_class(interface_def("java.io.Serializable", vec![]));
        store.add_class(interface_def("java.util.List", vec![TypeParamDef::new("E")]));
        store.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![TypeParamDef::new("E")],
            super_class: object,
            fields: vec![],
        });
        store
    }

    /// Return the id for `name`, allocating an undefined placeholder if needed.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let raw: u32 = self
            .classes
            .len()
            .try_into()
            .expect("too many classes in TypeStore");
        let id = ClassId::new(raw);
        self.classes.push(None);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Attach a definition to an interned id, replacing any previous definition.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) -> Result<()> {
        if id.index() >= self.classes.len() {
            return Err(TypeError::UnknownClass(id));
        }
        self.set_class(id, def);
        Ok(())
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.set_class(id, def);
        id
    }

    fn set_class(&mut self, id: ClassId, def: ClassDef) {
        let idx = id.index();
        if self.names[idx] != def.name && self.by_name.get(&self.names[idx]) == Some(&id) {
            self.by_name.remove(&self.names[idx]);
        }
        self.names[idx] = def.name.clone();
        self.by_name.insert(def.name.clone(), id);
        self.classes[idx] = Some(def);
    }

    /// Insert or replace a class by name, keeping its id stable.
    pub fn upsert_class(&mut self, def: ClassDef) -> ClassId {
        self.add_class(def)
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Binary name of `id`, available even before the class is defined.
    pub fn class_name(&self, id: ClassId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn add_field(&mut self, id: ClassId, field: FieldDef) -> Result<()> {
        let def = self
            .classes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TypeError::UnknownClass(id))?;
        def.fields.push(field);
        Ok(())
    }

    /// Load a store from a JSON snapshot produced by [`TypeStore::to_json`].
    ///
    /// Class ids are assigned in snapshot order, so `Type` values inside the snapshot keep
    /// pointing at the same classes. Undefined placeholders stay undefined.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        let mut classes = Vec::with_capacity(snapshot.classes.len());
        let mut names = Vec::with_capacity(snapshot.classes.len());
        let mut by_name = HashMap::with_capacity(snapshot.classes.len());
        for (idx, slot) in snapshot.classes.into_iter().enumerate() {
            let raw: u32 = idx.try_into().expect("too many classes in snapshot");
            by_name.insert(slot.name.clone(), ClassId::new(raw));
            names.push(slot.name);
            classes.push(slot.definition);
        }

        let object = *by_name
            .get(OBJECT)
            .ok_or(TypeError::MissingWellKnown { name: OBJECT })?;
        let class = *by_name
            .get(CLASS)
            .ok_or(TypeError::MissingWellKnown { name: CLASS })?;

        Ok(Self {
            classes,
            names,
            by_name,
            well_known: WellKnownTypes { object, class },
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let classes = self
            .classes
            .iter()
            .zip(&self.names)
            .map(|(definition, name)| SnapshotClass {
                name: name.clone(),
                definition: definition.clone(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&StoreSnapshot { classes })?)
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())?.as_ref()
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

fn class_def(name: &str, super_class: Option<Type>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class,
        fields: vec![],
    }
}

fn interface_def(name: &str, type_params: Vec<TypeParamDef>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Interface,
        type_params,
        super_class: None,
        fields: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_bootstraps_well_known_classes() {
        let store = TypeStore::default();
        let wk = *store.well_known();
        assert_eq!(store.class_id(OBJECT), Some(wk.object));
        assert_eq!(store.class_id(CLASS), Some(wk.class));

        let class = store.class(wk.class).unwrap();
        assert_eq!(class.type_params.len(), 1);
        assert_eq!(class.super_class, Some(Type::class(wk.object)));
        assert_eq!(store.class(wk.object).unwrap().super_class, None);
    }

    #[test]
    fn interned_placeholder_is_undefined_until_defined() {
        let mut store = TypeStore::default();
        let id = store.intern_class_id("com.example.Later");
        assert!(store.class(id).is_none());
        assert_eq!(store.class_name(id), Some("com.example.Later"));

        store
            .define_class(id, class_def("com.example.Later", None))
            .unwrap();
        assert_eq!(store.class(id).unwrap().name, "com.example.Later");
    }

    #[test]
    fn define_class_rejects_foreign_ids() {
        let mut store = TypeStore::default();
        let foreign = ClassId::new(4_096);
        assert_eq!(
            store.define_class(foreign, class_def("com.example.Foreign", None)),
            Err(TypeError::UnknownClass(foreign))
        );
        assert_eq!(store.class_id("com.example.Foreign"), None);
    }

    #[test]
    fn snapshot_keeps_placeholders_undefined() {
        let mut store = TypeStore::default();
        let missing = store.intern_class_id("com.example.Missing");
        let sub = store.add_class(class_def("com.example.Sub", Some(Type::class(missing))));

        let restored = TypeStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored.class_id("com.example.Missing"), Some(missing));
        assert!(restored.class(missing).is_none());
        assert_eq!(restored.class_name(missing), Some("com.example.Missing"));
        assert_eq!(restored.class(sub), store.class(sub));
    }
}
