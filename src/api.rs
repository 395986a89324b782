//! Method signature generation and API service surface emission.
//!
//! Each service becomes one client-callable interface (typed stub
//! signatures, promise-wrapped return types) plus an endpoint metadata
//! table a thin runtime dispatcher uses to perform the actual network
//! call. This module produces signatures and metadata only; no I/O is
//! generated here.

use crate::config::GenConfig;
use crate::convert::{to_camel_case, TypeNameConverter};
use crate::descriptor::{
    MethodDescriptor, ParamBinding, ServiceDescriptor, ServiceMethod, TypeDescriptor, TypeKind,
};
use crate::error::GenError;
use crate::script::ScriptBuilder;
use crate::translate::Translator;

/// Produce `name(params): Wrapped<T>;` for a method, feeding every
/// referenced type into the translator so its declaration is guaranteed to
/// exist in the output.
///
/// Parameter and return types run through the same optional/async unwrap
/// rules as translation. A void (or unknowable) result stays `void`; any
/// other result is wrapped in `promise_type`.
pub(crate) fn method_signature(
    method: &MethodDescriptor,
    promise_type: &str,
    conv: &TypeNameConverter<'_>,
    translator: &mut Translator<'_>,
) -> Result<String, GenError> {
    let mut params = Vec::new();
    for p in &method.params {
        translator.process_one(&p.ty)?;
        params.push(format!("{}: {}", p.name, conv.ts_name(&p.ty)));
    }
    translator.process_one(&method.return_type)?;
    let ret = return_type(&method.return_type, promise_type, conv);
    Ok(format!(
        "{}({}): {};",
        to_camel_case(&method.name),
        params.join(", "),
        ret
    ))
}

fn return_type(t: &TypeDescriptor, promise_type: &str, conv: &TypeNameConverter<'_>) -> String {
    let value = unwrap_value(t);
    match value.kind {
        TypeKind::Void => "void".to_string(),
        // A bare wrapper's result type is unknowable.
        TypeKind::AsyncWrapper => "void".to_string(),
        _ => format!("{}<{}>", promise_type, conv.ts_name(value)),
    }
}

/// Strip optional and async wrappers down to the underlying value type.
fn unwrap_value(t: &TypeDescriptor) -> &TypeDescriptor {
    let mut current = t;
    loop {
        match current.kind {
            TypeKind::Optional | TypeKind::AsyncWrapper => match current.generic_args.first() {
                Some(inner) => current = inner,
                None => return current,
            },
            _ => return current,
        }
    }
}

/// Generates typed client stubs and endpoint metadata for API services.
pub struct ApiGenerator<'a> {
    config: &'a GenConfig,
    conv: TypeNameConverter<'a>,
}

impl<'a> ApiGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self {
            config,
            conv: TypeNameConverter::new(config),
        }
    }

    /// Emit one client interface plus an endpoint table per service.
    pub fn write_services(
        &self,
        services: &[ServiceDescriptor],
        translator: &mut Translator<'_>,
        sb: &mut ScriptBuilder,
    ) -> Result<(), GenError> {
        for service in services {
            self.write_service(service, translator, sb)?;
        }
        Ok(())
    }

    fn write_service(
        &self,
        service: &ServiceDescriptor,
        translator: &mut Translator<'_>,
        sb: &mut ScriptBuilder,
    ) -> Result<(), GenError> {
        sb.line(&format!("interface {}Service {{", service.name));
        sb.indent();
        for m in &service.methods {
            let sig =
                method_signature(&m.method, &self.config.promise_type, &self.conv, translator)?;
            sb.line(&sig);
        }
        sb.unindent();
        sb.line("}");
        sb.blank();

        sb.line(&format!("const {}ServiceEndpoints = {{", service.name));
        sb.indent();
        for m in &service.methods {
            sb.line(&self.endpoint_entry(service, m));
        }
        sb.unindent();
        sb.line("};");
        sb.blank();
        Ok(())
    }

    /// Dispatch metadata for one method: verb, resolved URL, and how each
    /// parameter is bound.
    fn endpoint_entry(&self, service: &ServiceDescriptor, m: &ServiceMethod) -> String {
        let url = self.resolve_url(service, m);
        let mut route = Vec::new();
        let mut query = Vec::new();
        let mut body = None;
        for p in &m.method.params {
            if url.contains(&format!("{{{}}}", p.name)) {
                route.push(p.name.clone());
                continue;
            }
            match p.binding {
                ParamBinding::Route => route.push(p.name.clone()),
                ParamBinding::Body => body = Some(p.name.clone()),
                ParamBinding::Query => query.push(p.name.clone()),
            }
        }
        format!(
            "{}: {{ method: \"{}\", url: \"{}\", route: [{}], query: [{}], body: {} }},",
            to_camel_case(&m.method.name),
            m.verb.as_str(),
            url,
            quote_list(&route),
            quote_list(&query),
            body.map(|b| format!("\"{}\"", b))
                .unwrap_or_else(|| "null".to_string()),
        )
    }

    fn resolve_url(&self, service: &ServiceDescriptor, m: &ServiceMethod) -> String {
        let template = m.route.as_deref().unwrap_or(&service.route_template);
        let url = template
            .replace("{controller}", &service.name.to_lowercase())
            .replace("{action}", &m.method.name.to_lowercase());
        let url = self.config.rewrite_url(&url);
        if url.starts_with('/') {
            url
        } else {
            format!("/{}", url)
        }
    }
}

fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("\"{}\"", n))
        .collect::<Vec<_>>()
        .join(", ")
}
