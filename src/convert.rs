//! TypeScript type-name conversion.
//!
//! Maps a [`TypeDescriptor`] reference at point of use to the TypeScript
//! type text that names it: primitives to `number`/`boolean`/`string`,
//! arrays and enumerable collections to `T[]`, dictionaries to an inline
//! index-signature shape, named types to their (optionally re-namespaced)
//! dotted path with generic arguments rendered recursively.

use crate::config::GenConfig;
use crate::descriptor::{TypeDescriptor, TypeKind};

/// Renders descriptor type references as TypeScript type names.
pub struct TypeNameConverter<'a> {
    config: &'a GenConfig,
}

impl<'a> TypeNameConverter<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    /// The TypeScript name for a type reference.
    ///
    /// Scalar overrides are applied before any other rule; optional and
    /// async wrappers are unwrapped to their value type.
    pub fn ts_name(&self, t: &TypeDescriptor) -> String {
        if !t.name.is_empty() {
            if let Some(rendered) = self.config.scalar_overrides.get(&t.full_name()) {
                return rendered.clone();
            }
        }

        match t.kind {
            TypeKind::String => "string".to_string(),
            TypeKind::Void => "void".to_string(),
            TypeKind::Primitive => primitive_name(&t.name).to_string(),
            TypeKind::GenericParam => t.name.clone(),
            TypeKind::Array | TypeKind::Collection => match t.generic_args.first() {
                Some(element) => format!("{}[]", self.ts_name(element)),
                None => "any[]".to_string(),
            },
            TypeKind::Dictionary => {
                let value = t
                    .generic_args
                    .get(1)
                    .map(|v| self.ts_name(v))
                    .unwrap_or_else(|| "any".to_string());
                format!("{{ [key: string]: {} }}", value)
            }
            TypeKind::Optional => match t.generic_args.first() {
                Some(value) => self.ts_name(value),
                None => "any".to_string(),
            },
            // A bare wrapper has no extractable result type.
            TypeKind::AsyncWrapper => match t.generic_args.first() {
                Some(result) => self.ts_name(result),
                None => "void".to_string(),
            },
            TypeKind::Enum | TypeKind::Class | TypeKind::Interface => self.qualified(t),
        }
    }

    /// The dotted declaration path of a named type, with the global
    /// namespace substituted when configured.
    pub fn declaration_path(&self, t: &TypeDescriptor) -> String {
        let namespace = self
            .config
            .global_namespace
            .as_deref()
            .unwrap_or(&t.namespace);
        if namespace.is_empty() {
            t.name.clone()
        } else {
            format!("{}.{}", namespace, t.name)
        }
    }

    fn qualified(&self, t: &TypeDescriptor) -> String {
        let path = self.declaration_path(t);
        if t.generic_args.is_empty() {
            path
        } else {
            let args: Vec<String> = t.generic_args.iter().map(|a| self.ts_name(a)).collect();
            format!("{}<{}>", path, args.join(", "))
        }
    }
}

/// TypeScript name for a host primitive.
fn primitive_name(host: &str) -> &'static str {
    match host.to_ascii_lowercase().as_str() {
        "bool" | "boolean" => "boolean",
        "byte" | "sbyte" | "short" | "ushort" | "int" | "uint" | "long" | "ulong" | "int16"
        | "int32" | "int64" | "uint16" | "uint32" | "uint64" | "float" | "single" | "double"
        | "decimal" | "number" => "number",
        "char" | "string" => "string",
        _ => "any",
    }
}

/// Lower-case the leading character: `GetById` -> `getById`.
pub fn to_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Member;

    fn converter_with(config: &GenConfig) -> TypeNameConverter<'_> {
        TypeNameConverter::new(config)
    }

    #[test]
    fn primitives_map_to_ts_names() {
        let config = GenConfig::default();
        let conv = converter_with(&config);
        assert_eq!(conv.ts_name(&TypeDescriptor::primitive("int")), "number");
        assert_eq!(conv.ts_name(&TypeDescriptor::primitive("bool")), "boolean");
        assert_eq!(conv.ts_name(&TypeDescriptor::primitive("char")), "string");
        assert_eq!(conv.ts_name(&TypeDescriptor::string()), "string");
        assert_eq!(conv.ts_name(&TypeDescriptor::void()), "void");
    }

    #[test]
    fn arrays_and_collections_render_as_element_arrays() {
        let config = GenConfig::default();
        let conv = converter_with(&config);
        let arr = TypeDescriptor::array(TypeDescriptor::primitive("int"));
        assert_eq!(conv.ts_name(&arr), "number[]");
        let list = TypeDescriptor::collection(TypeDescriptor::string());
        assert_eq!(conv.ts_name(&list), "string[]");
    }

    #[test]
    fn dictionary_renders_index_signature() {
        let config = GenConfig::default();
        let conv = converter_with(&config);
        let dict =
            TypeDescriptor::dictionary(TypeDescriptor::string(), TypeDescriptor::primitive("int"));
        assert_eq!(conv.ts_name(&dict), "{ [key: string]: number }");
    }

    #[test]
    fn wrappers_unwrap_to_value_type() {
        let config = GenConfig::default();
        let conv = converter_with(&config);
        let opt = TypeDescriptor::optional(TypeDescriptor::primitive("int"));
        assert_eq!(conv.ts_name(&opt), "number");
        let task = TypeDescriptor::async_wrapper(Some(TypeDescriptor::string()));
        assert_eq!(conv.ts_name(&task), "string");
        let bare = TypeDescriptor::async_wrapper(None);
        assert_eq!(conv.ts_name(&bare), "void");
    }

    #[test]
    fn named_types_qualify_with_namespace_and_generics() {
        let config = GenConfig::default();
        let conv = converter_with(&config);
        let user = TypeDescriptor::class("Acme.Models", "User", vec![]);
        assert_eq!(conv.ts_name(&user), "Acme.Models.User");
        let wrapper = TypeDescriptor::class("Acme", "Page", vec![])
            .with_generic_args(vec![user]);
        assert_eq!(conv.ts_name(&wrapper), "Acme.Page<Acme.Models.User>");
    }

    #[test]
    fn global_namespace_replaces_declared_namespace() {
        let config = GenConfig {
            global_namespace: Some("Api".to_string()),
            ..Default::default()
        };
        let conv = converter_with(&config);
        let user = TypeDescriptor::class("Acme.Models", "User", vec![]);
        assert_eq!(conv.ts_name(&user), "Api.User");
    }

    #[test]
    fn scalar_override_wins_over_classification() {
        let mut config = GenConfig::default();
        config
            .scalar_overrides
            .insert("System.Guid".to_string(), "string".to_string());
        let conv = converter_with(&config);
        let guid = TypeDescriptor::class(
            "System",
            "Guid",
            vec![Member::new("Empty", TypeDescriptor::string())],
        );
        assert_eq!(conv.ts_name(&guid), "string");
    }

    #[test]
    fn camel_case_lowers_leading_character() {
        assert_eq!(to_camel_case("GetById"), "getById");
        assert_eq!(to_camel_case("send"), "send");
        assert_eq!(to_camel_case(""), "");
    }
}
