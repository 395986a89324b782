//! Recursive translation of a type-descriptor graph into a deduplicated
//! output model.
//!
//! The translator classifies every descriptor it visits, unwraps
//! pseudo-types (optional values, async wrappers, arrays, enumerable
//! collections), and registers each reachable class, interface, and enum
//! exactly once under its `(namespace, name)` key. Registration happens
//! before member recursion, so cyclic graphs terminate.
//!
//! Cycles in the source graph are expressed by shallow references: a member
//! whose type is a named class/interface/enum may carry only the key (no
//! body). A reference is compatible with any registered body under the same
//! key; a body arriving after a reference replaces it in place. Two bodies
//! under one key must be structurally identical or translation aborts with
//! a naming collision.

use indexmap::IndexMap;

use crate::config::GenConfig;
use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::GenError;

/// Key identifying a unique output declaration slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub namespace: String,
    pub name: String,
}

impl TypeKey {
    pub fn of(t: &TypeDescriptor) -> Self {
        Self {
            namespace: t.namespace.clone(),
            name: t.name.clone(),
        }
    }

    pub fn dotted(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// A registered output declaration.
///
/// Holds the descriptor stripped of usage-site data (generic arguments,
/// methods): two instantiations of one generic declaration register
/// identical content.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A class or interface, emitted as a structural interface.
    Interface(TypeDescriptor),
    Enum(TypeDescriptor),
}

impl Declaration {
    fn of(t: &TypeDescriptor) -> Self {
        let mut content = t.clone();
        content.generic_args = Vec::new();
        content.methods = Vec::new();
        match t.kind {
            TypeKind::Enum => Declaration::Enum(content),
            _ => Declaration::Interface(content),
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        match self {
            Declaration::Interface(t) | Declaration::Enum(t) => t,
        }
    }

    /// A shallow reference carries the key but no body.
    fn is_reference(&self) -> bool {
        let t = self.descriptor();
        t.members.is_empty() && t.enum_members.is_empty()
    }

    /// Short structural summary used in collision reports.
    fn summary(&self) -> String {
        match self {
            Declaration::Interface(t) => {
                let members: Vec<&str> = t
                    .members
                    .iter()
                    .filter(|m| !m.ignored)
                    .map(|m| m.name.as_str())
                    .collect();
                let kind = match t.kind {
                    TypeKind::Interface => "interface",
                    _ => "class",
                };
                format!("{} with members [{}]", kind, members.join(", "))
            }
            Declaration::Enum(t) => {
                let members: Vec<&str> =
                    t.enum_members.iter().map(|m| m.name.as_str()).collect();
                format!("enum with members [{}]", members.join(", "))
            }
        }
    }
}

/// The deduplicated, closed set of declarations to emit.
///
/// Built incrementally by the [`Translator`]; read-only once handed to the
/// emitter. Iteration order is registration order.
#[derive(Debug, Clone, Default)]
pub struct OutputModel {
    entries: IndexMap<TypeKey, Declaration>,
}

impl OutputModel {
    pub fn declarations(&self) -> impl Iterator<Item = (&TypeKey, &Declaration)> {
        self.entries.iter()
    }

    /// Registered classes and interfaces, in registration order.
    pub fn interfaces(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values().filter_map(|d| match d {
            Declaration::Interface(t) => Some(t),
            Declaration::Enum(_) => None,
        })
    }

    /// Registered enums, in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values().filter_map(|d| match d {
            Declaration::Enum(t) => Some(t),
            Declaration::Interface(_) => None,
        })
    }

    pub fn get(&self, key: &TypeKey) -> Option<&Declaration> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A non-fatal condition noticed during translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A bare async wrapper with no result type was dropped from the graph.
    DroppedBareAsync,
}

/// Walks root type descriptors and registers every reachable concrete
/// declaration exactly once.
///
/// Processing is idempotent: visiting an already-registered descriptor is a
/// no-op, and a structurally different body under an occupied key is a
/// [`GenError::NamingCollision`].
pub struct Translator<'a> {
    config: &'a GenConfig,
    model: OutputModel,
    warnings: Vec<Warning>,
}

impl<'a> Translator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self {
            config,
            model: OutputModel::default(),
            warnings: Vec::new(),
        }
    }

    pub fn model(&self) -> &OutputModel {
        &self.model
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn finish(self) -> (OutputModel, Vec<Warning>) {
        (self.model, self.warnings)
    }

    /// Translate a set of root descriptors into the output model.
    pub fn process(&mut self, roots: &[TypeDescriptor]) -> Result<(), GenError> {
        for t in roots {
            self.process_one(t)?;
        }
        Ok(())
    }

    /// Translate a single descriptor and everything reachable from it.
    pub fn process_one(&mut self, t: &TypeDescriptor) -> Result<(), GenError> {
        // Unwrap async and optional wrappers down to the value type.
        let mut current = t;
        loop {
            match current.kind {
                TypeKind::Void => return Ok(()),
                TypeKind::AsyncWrapper => match current.generic_args.first() {
                    Some(result) => current = result,
                    None => {
                        // The concrete result type is unknowable; nothing is
                        // emitted for it.
                        self.warn(
                            WarningKind::DroppedBareAsync,
                            format!(
                                "async wrapper `{}` has no result type and was dropped",
                                display_name(current)
                            ),
                        );
                        return Ok(());
                    }
                },
                TypeKind::Optional => match current.generic_args.first() {
                    Some(value) => current = value,
                    None => return Ok(()),
                },
                _ => break,
            }
        }
        let t = current;

        if self.is_builtin(t) {
            return Ok(());
        }

        match t.kind {
            // Dictionaries are rendered inline at point of use; their value
            // types are not traversed.
            TypeKind::Dictionary => Ok(()),
            TypeKind::Array => match t.generic_args.first() {
                Some(element) => self.process_one(element),
                None => Ok(()),
            },
            TypeKind::Collection => {
                for arg in &t.generic_args {
                    self.process_one(arg)?;
                }
                Ok(())
            }
            TypeKind::Class | TypeKind::Interface | TypeKind::Enum => self.register(t),
            // Remaining kinds were handled by the unwrap loop or the
            // built-in check above.
            _ => Ok(()),
        }
    }

    fn register(&mut self, t: &TypeDescriptor) -> Result<(), GenError> {
        let key = TypeKey::of(t);
        let incoming = Declaration::of(t);
        if let Some(existing) = self.model.entries.get(&key) {
            if incoming.is_reference() || *existing == incoming {
                // Already registered, or registration in flight further up
                // the call tree: recursion stops here.
                return Ok(());
            }
            if !existing.is_reference() {
                return Err(GenError::NamingCollision {
                    key: key.dotted(),
                    existing: existing.summary(),
                    incoming: incoming.summary(),
                });
            }
            // A shallow reference was registered first; the body replaces it
            // in place, keeping its registration order.
            self.model.entries.insert(key, incoming);
        } else {
            // Register before walking members so cyclic references terminate.
            self.model.entries.insert(key, incoming);
        }

        for arg in &t.generic_args {
            self.process_one(arg)?;
        }
        if matches!(t.kind, TypeKind::Class | TypeKind::Interface) {
            for member in t.members.iter().filter(|m| !m.ignored) {
                self.process_one(&member.ty)?;
            }
        }
        Ok(())
    }

    fn is_builtin(&self, t: &TypeDescriptor) -> bool {
        if t.synthesized {
            return true;
        }
        // A scalar-overridden type renders as its override everywhere and
        // never gets a declaration of its own.
        if !t.name.is_empty() && self.config.scalar_overrides.contains_key(&t.full_name()) {
            return true;
        }
        match t.kind {
            TypeKind::String | TypeKind::Primitive | TypeKind::Void | TypeKind::GenericParam => {
                true
            }
            _ => self.config.is_reserved_namespace(&t.namespace),
        }
    }

    fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        self.warnings.push(Warning {
            kind,
            message: message.into(),
        });
    }
}

fn display_name(t: &TypeDescriptor) -> String {
    let name = t.full_name();
    if name.is_empty() {
        "<unnamed>".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumMember, Member};

    fn process(roots: &[TypeDescriptor]) -> Result<(OutputModel, Vec<Warning>), GenError> {
        let config = GenConfig::default();
        let mut translator = Translator::new(&config);
        translator.process(roots)?;
        Ok(translator.finish())
    }

    fn key(namespace: &str, name: &str) -> TypeKey {
        TypeKey {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    fn user() -> TypeDescriptor {
        TypeDescriptor::class(
            "Acme",
            "User",
            vec![
                Member::new("Id", TypeDescriptor::primitive("int")),
                Member::new("Name", TypeDescriptor::string()),
            ],
        )
    }

    #[test]
    fn registers_class_and_member_references() {
        let order = TypeDescriptor::class("Acme", "Order", vec![Member::new("Buyer", user())]);
        let (model, _) = process(&[order]).unwrap();
        assert_eq!(model.len(), 2);
        assert!(model.contains(&key("Acme", "Order")));
        assert!(model.contains(&key("Acme", "User")));
    }

    #[test]
    fn processing_twice_is_idempotent() {
        let config = GenConfig::default();
        let mut translator = Translator::new(&config);
        translator.process(&[user()]).unwrap();
        let first = translator.model().len();
        translator.process(&[user()]).unwrap();
        assert_eq!(translator.model().len(), first);
    }

    #[test]
    fn self_referential_class_terminates() {
        let node = TypeDescriptor::class(
            "Acme",
            "Node",
            vec![
                Member::new("Value", TypeDescriptor::primitive("int")),
                Member::new("Next", TypeDescriptor::class("Acme", "Node", vec![])),
            ],
        );
        let (model, _) = process(&[node]).unwrap();
        assert_eq!(model.len(), 1);
        let decl = model.get(&key("Acme", "Node")).unwrap();
        assert_eq!(decl.descriptor().members.len(), 2);
    }

    #[test]
    fn mutually_referential_classes_register_once_each() {
        let a = TypeDescriptor::class(
            "Acme",
            "A",
            vec![Member::new("B", TypeDescriptor::class("Acme", "B", vec![]))],
        );
        let b = TypeDescriptor::class(
            "Acme",
            "B",
            vec![Member::new("A", TypeDescriptor::class("Acme", "A", vec![]))],
        );
        let (model, _) = process(&[a, b]).unwrap();
        assert_eq!(model.len(), 2);
        // Both entries hold bodies, not the shallow references.
        assert_eq!(
            model.get(&key("Acme", "A")).unwrap().descriptor().members.len(),
            1
        );
        assert_eq!(
            model.get(&key("Acme", "B")).unwrap().descriptor().members.len(),
            1
        );
    }

    #[test]
    fn body_arriving_after_reference_replaces_it_in_place() {
        let holder = TypeDescriptor::class(
            "Acme",
            "Holder",
            vec![Member::new("User", TypeDescriptor::class("Acme", "User", vec![]))],
        );
        let (model, _) = process(&[holder, user()]).unwrap();
        assert_eq!(model.len(), 2);
        let decl = model.get(&key("Acme", "User")).unwrap();
        assert_eq!(decl.descriptor().members.len(), 2);
        // Registration order is the reference's, not the body's.
        let order: Vec<String> = model.declarations().map(|(k, _)| k.name.clone()).collect();
        assert_eq!(order, vec!["Holder", "User"]);
    }

    #[test]
    fn async_wrapper_of_t_equals_t() {
        let direct = process(&[user()]).unwrap().0;
        let wrapped = process(&[TypeDescriptor::async_wrapper(Some(user()))])
            .unwrap()
            .0;
        assert_eq!(direct.len(), wrapped.len());
        assert!(wrapped.contains(&key("Acme", "User")));
    }

    #[test]
    fn optional_of_t_equals_t() {
        let direct = process(&[user()]).unwrap().0;
        let wrapped = process(&[TypeDescriptor::optional(user())]).unwrap().0;
        assert_eq!(direct.len(), wrapped.len());
    }

    #[test]
    fn nested_wrappers_unwrap_all_the_way() {
        let t = TypeDescriptor::async_wrapper(Some(TypeDescriptor::optional(user())));
        let (model, _) = process(&[t]).unwrap();
        assert!(model.contains(&key("Acme", "User")));
    }

    #[test]
    fn bare_async_wrapper_is_dropped_with_warning() {
        let mut bare = TypeDescriptor::async_wrapper(None);
        bare.name = "Task".to_string();
        let (model, warnings) = process(&[bare]).unwrap();
        assert!(model.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DroppedBareAsync);
        assert!(warnings[0].message.contains("Task"));
    }

    #[test]
    fn builtins_and_reserved_namespaces_are_skipped() {
        let guid = TypeDescriptor::class("System", "Guid", vec![]);
        let synthesized = TypeDescriptor::class("Acme", "Closure0", vec![]).synthesized();
        let (model, _) = process(&[
            TypeDescriptor::string(),
            TypeDescriptor::primitive("int"),
            TypeDescriptor::void(),
            guid,
            synthesized,
        ])
        .unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn scalar_overridden_types_are_not_registered() {
        let mut config = GenConfig::default();
        config
            .scalar_overrides
            .insert("Acme.Money".to_string(), "number".to_string());
        let money = TypeDescriptor::class(
            "Acme",
            "Money",
            vec![Member::new("Cents", TypeDescriptor::primitive("long"))],
        );
        let mut translator = Translator::new(&config);
        translator.process(&[money]).unwrap();
        assert!(translator.model().is_empty());
    }

    #[test]
    fn collection_and_array_register_element_only() {
        let list = TypeDescriptor::collection(user());
        let arr = TypeDescriptor::array(user());
        let (model, _) = process(&[list, arr]).unwrap();
        assert_eq!(model.len(), 1);
        assert!(model.contains(&key("Acme", "User")));
    }

    #[test]
    fn dictionary_value_type_is_not_traversed() {
        let dict = TypeDescriptor::dictionary(TypeDescriptor::string(), user());
        let (model, _) = process(&[dict]).unwrap();
        assert!(model.is_empty());
        // Same opacity when a dictionary appears as a member type.
        let holder = TypeDescriptor::class(
            "Acme",
            "Holder",
            vec![Member::new(
                "Lookup",
                TypeDescriptor::dictionary(TypeDescriptor::string(), user()),
            )],
        );
        let (model, _) = process(&[holder]).unwrap();
        assert_eq!(model.len(), 1);
        assert!(!model.contains(&key("Acme", "User")));
    }

    #[test]
    fn ignored_members_are_not_traversed() {
        let holder = TypeDescriptor::class(
            "Acme",
            "Holder",
            vec![Member::new("Skipped", user()).ignored()],
        );
        let (model, _) = process(&[holder]).unwrap();
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn identical_same_key_types_do_not_collide() {
        let (model, _) = process(&[user(), user()]).unwrap();
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn structurally_different_same_key_types_collide() {
        let other = TypeDescriptor::class(
            "Acme",
            "User",
            vec![Member::new("Email", TypeDescriptor::string())],
        );
        let err = process(&[user(), other]).unwrap_err();
        match err {
            GenError::NamingCollision {
                key,
                existing,
                incoming,
            } => {
                assert_eq!(key, "Acme.User");
                assert!(existing.contains("Id"));
                assert!(incoming.contains("Email"));
            }
            other => panic!("expected naming collision, got {other:?}"),
        }
    }

    #[test]
    fn class_vs_enum_same_key_collides() {
        let class = TypeDescriptor::class(
            "Acme",
            "Status",
            vec![Member::new("Raw", TypeDescriptor::primitive("int"))],
        );
        let en =
            TypeDescriptor::enumeration("Acme", "Status", vec![EnumMember::new("Active", 0)]);
        let err = process(&[class, en]).unwrap_err();
        assert!(matches!(err, GenError::NamingCollision { .. }));
    }

    #[test]
    fn generic_instantiations_share_one_open_declaration() {
        let page_of = |item: TypeDescriptor| {
            TypeDescriptor::class(
                "Acme",
                "Page",
                vec![
                    Member::new(
                        "Items",
                        TypeDescriptor::array(TypeDescriptor::generic_param("T")),
                    ),
                    Member::new("Total", TypeDescriptor::primitive("int")),
                ],
            )
            .with_generic_params(vec!["T"])
            .with_generic_args(vec![item])
        };
        let order = TypeDescriptor::class(
            "Acme",
            "Order",
            vec![Member::new("Number", TypeDescriptor::string())],
        );
        let (model, _) = process(&[page_of(user()), page_of(order)]).unwrap();
        // Page registers once; User and Order register via the argument walk.
        assert_eq!(model.len(), 3);
        assert!(model.contains(&key("Acme", "Page")));
        assert!(model.contains(&key("Acme", "User")));
        assert!(model.contains(&key("Acme", "Order")));
    }
}
