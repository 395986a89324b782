//! Descriptor model for reflected host types, methods, services, and hubs.
//!
//! Descriptors are produced once by a discovery front-end (or deserialized
//! from a manifest, see [`Manifest`]) and are immutable afterwards; the
//! translator only classifies and dispatches on them.

use serde::Deserialize;

/// Classification of a source type.
///
/// The kind determines which of the other [`TypeDescriptor`] fields are
/// meaningful: `members` only for classes and interfaces, `enum_members`
/// only for enums, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// A host primitive (numeric, boolean, char).
    Primitive,
    /// The host string type.
    String,
    Enum,
    Class,
    Interface,
    /// An array; the element type is the first generic argument.
    Array,
    /// An enumerable generic collection other than a dictionary.
    Collection,
    /// A keyed map; generic arguments are `[key, value]`.
    Dictionary,
    /// A nullable/optional wrapper; the value type is the first generic argument.
    Optional,
    /// An asynchronous-result wrapper; the result type, when known, is the
    /// first generic argument.
    AsyncWrapper,
    Void,
    /// A type parameter of a generic declaration, referenced by name.
    GenericParam,
}

/// A classified, queryable representation of a source-side type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    /// Type arguments: generic instantiations, and the payloads of
    /// pseudo-types (array element, optional value, async result,
    /// dictionary key/value).
    #[serde(default)]
    pub generic_args: Vec<TypeDescriptor>,
    /// Declared public fields, for classes and interfaces.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Named numeric values, for enums.
    #[serde(default)]
    pub enum_members: Vec<EnumMember>,
    /// Callable methods, for types used as hub client contracts.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Type-parameter names of the open declaration, for generic classes
    /// and interfaces.
    #[serde(default)]
    pub generic_params: Vec<String>,
    /// Compiler-generated types are never emitted.
    #[serde(default)]
    pub synthesized: bool,
}

impl TypeDescriptor {
    fn bare(kind: TypeKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
            generic_args: Vec::new(),
            members: Vec::new(),
            enum_members: Vec::new(),
            methods: Vec::new(),
            generic_params: Vec::new(),
            synthesized: false,
        }
    }

    /// A host primitive, identified by its host-side name (`"int"`, `"bool"`, ...).
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::bare(TypeKind::Primitive, "", name)
    }

    pub fn string() -> Self {
        Self::bare(TypeKind::String, "", "string")
    }

    pub fn void() -> Self {
        Self::bare(TypeKind::Void, "", "void")
    }

    pub fn class(
        namespace: impl Into<String>,
        name: impl Into<String>,
        members: Vec<Member>,
    ) -> Self {
        Self {
            members,
            ..Self::bare(TypeKind::Class, namespace, name)
        }
    }

    pub fn interface(
        namespace: impl Into<String>,
        name: impl Into<String>,
        members: Vec<Member>,
    ) -> Self {
        Self {
            members,
            ..Self::bare(TypeKind::Interface, namespace, name)
        }
    }

    pub fn enumeration(
        namespace: impl Into<String>,
        name: impl Into<String>,
        members: Vec<EnumMember>,
    ) -> Self {
        Self {
            enum_members: members,
            ..Self::bare(TypeKind::Enum, namespace, name)
        }
    }

    pub fn array(element: TypeDescriptor) -> Self {
        Self {
            generic_args: vec![element],
            ..Self::bare(TypeKind::Array, "", "")
        }
    }

    pub fn collection(element: TypeDescriptor) -> Self {
        Self {
            generic_args: vec![element],
            ..Self::bare(TypeKind::Collection, "", "")
        }
    }

    pub fn dictionary(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self {
            generic_args: vec![key, value],
            ..Self::bare(TypeKind::Dictionary, "", "")
        }
    }

    pub fn optional(value: TypeDescriptor) -> Self {
        Self {
            generic_args: vec![value],
            ..Self::bare(TypeKind::Optional, "", "")
        }
    }

    /// An async wrapper with a known result type, or a bare wrapper when
    /// `result` is `None`.
    pub fn async_wrapper(result: Option<TypeDescriptor>) -> Self {
        Self {
            generic_args: result.into_iter().collect(),
            ..Self::bare(TypeKind::AsyncWrapper, "", "")
        }
    }

    pub fn generic_param(name: impl Into<String>) -> Self {
        Self::bare(TypeKind::GenericParam, "", name)
    }

    /// Apply generic arguments to a named type.
    pub fn with_generic_args(mut self, args: Vec<TypeDescriptor>) -> Self {
        self.generic_args = args;
        self
    }

    /// Declare the type-parameter names of a generic class or interface.
    pub fn with_generic_params(mut self, params: Vec<&str>) -> Self {
        self.generic_params = params.into_iter().map(String::from).collect();
        self
    }

    pub fn with_methods(mut self, methods: Vec<MethodDescriptor>) -> Self {
        self.methods = methods;
        self
    }

    pub fn synthesized(mut self) -> Self {
        self.synthesized = true;
        self
    }

    /// The dotted `Namespace.Name` identity used for scalar-override lookup
    /// and diagnostics.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// A named field of a class or interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Ignored members are neither emitted nor traversed.
    #[serde(default)]
    pub ignored: bool,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            ignored: false,
        }
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }
}

/// A named numeric value of an enum.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Where a service parameter is bound when the dispatcher performs the call.
///
/// Parameters whose names appear as `{name}` placeholders in the resolved
/// route bind to the route regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamBinding {
    #[default]
    Query,
    Route,
    Body,
}

/// A named, typed method parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub binding: ParamBinding,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            binding: ParamBinding::Query,
        }
    }

    pub fn with_binding(mut self, binding: ParamBinding) -> Self {
        self.binding = binding;
        self
    }
}

/// A callable method: name, ordered parameters, and return type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    pub return_type: TypeDescriptor,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Parameter>,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
        }
    }
}

/// HTTP verb attached to a service method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        }
    }
}

/// A service method: the callable signature plus its dispatch metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMethod {
    #[serde(flatten)]
    pub method: MethodDescriptor,
    #[serde(default)]
    pub verb: HttpVerb,
    /// Overrides the service route template for this method.
    #[serde(default)]
    pub route: Option<String>,
}

impl ServiceMethod {
    pub fn new(method: MethodDescriptor, verb: HttpVerb) -> Self {
        Self {
            method,
            verb,
            route: None,
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }
}

fn default_route_template() -> String {
    "api/{controller}/{action}".to_string()
}

/// A logical API service: a name, a URL route template, and its methods.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default = "default_route_template")]
    pub route_template: String,
    #[serde(default)]
    pub methods: Vec<ServiceMethod>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route_template: default_route_template(),
            methods: Vec::new(),
        }
    }

    pub fn with_route_template(mut self, template: impl Into<String>) -> Self {
        self.route_template = template.into();
        self
    }

    pub fn with_method(mut self, method: ServiceMethod) -> Self {
        self.methods.push(method);
        self
    }
}

/// A real-time messaging hub: server-callable methods plus an optional
/// client contract whose methods the server may invoke on connected clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubDescriptor {
    pub name: String,
    /// The generic client-contract type, when the hub declares one. Its
    /// `methods` list drives the client-callback interface.
    #[serde(default)]
    pub client_contract: Option<TypeDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl HubDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_contract: None,
            methods: Vec::new(),
        }
    }

    pub fn with_client_contract(mut self, contract: TypeDescriptor) -> Self {
        self.client_contract = Some(contract);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }
}

/// The descriptor manifest a discovery front-end hands to the generator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
    #[serde(default)]
    pub hubs: Vec<HubDescriptor>,
}
