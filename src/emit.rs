//! Rendering the output model into TypeScript declaration text.
//!
//! Two artifacts are produced here: structural interface declarations for
//! classes/interfaces, and enum declarations in one of two modes. Const
//! enums have no runtime representation; runtime enums are additionally
//! materialized onto a global root by an initialization script so consumers
//! can look enum values up by name at runtime.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::config::GenConfig;
use crate::convert::TypeNameConverter;
use crate::descriptor::TypeDescriptor;
use crate::script::ScriptBuilder;
use crate::translate::OutputModel;

/// Render structural interface declarations, grouped by namespace in
/// registration order.
pub fn write_declarations(model: &OutputModel, config: &GenConfig) -> String {
    let conv = TypeNameConverter::new(config);
    let mut sb = ScriptBuilder::new();
    for (ns, types) in group_by_namespace(model.interfaces(), config) {
        if ns.is_empty() {
            for (i, t) in types.iter().enumerate() {
                if i > 0 {
                    sb.blank();
                }
                write_interface(&mut sb, t, &conv);
            }
            sb.blank();
        } else {
            sb.line(&format!("declare namespace {} {{", ns));
            sb.indent();
            for (i, t) in types.iter().enumerate() {
                if i > 0 {
                    sb.blank();
                }
                write_interface(&mut sb, t, &conv);
            }
            sb.unindent();
            sb.line("}");
            sb.blank();
        }
    }
    sb.into_string()
}

/// Render enum declarations, plus the runtime initialization script when
/// const enums are disabled.
pub fn write_enums(model: &OutputModel, config: &GenConfig) -> String {
    let conv = TypeNameConverter::new(config);
    let enums: Vec<&TypeDescriptor> = model.enums().collect();
    if enums.is_empty() {
        return String::new();
    }

    let mut sb = ScriptBuilder::new();
    for (ns, types) in group_by_namespace(enums.iter().copied(), config) {
        if ns.is_empty() {
            for t in &types {
                write_enum(&mut sb, t, config.const_enums, false);
                sb.blank();
            }
        } else {
            let head = if config.const_enums {
                format!("declare namespace {} {{", ns)
            } else {
                format!("namespace {} {{", ns)
            };
            sb.line(&head);
            sb.indent();
            for (i, t) in types.iter().enumerate() {
                if i > 0 {
                    sb.blank();
                }
                write_enum(&mut sb, t, config.const_enums, true);
            }
            sb.unindent();
            sb.line("}");
            sb.blank();
        }
    }

    if !config.const_enums {
        write_runtime_script(&mut sb, &enums, &conv);
    }
    sb.into_string()
}

fn group_by_namespace<'m>(
    types: impl Iterator<Item = &'m TypeDescriptor>,
    config: &GenConfig,
) -> IndexMap<String, Vec<&'m TypeDescriptor>> {
    let mut groups: IndexMap<String, Vec<&TypeDescriptor>> = IndexMap::new();
    for t in types {
        let ns = config
            .global_namespace
            .clone()
            .unwrap_or_else(|| t.namespace.clone());
        groups.entry(ns).or_default().push(t);
    }
    groups
}

fn write_interface(sb: &mut ScriptBuilder, t: &TypeDescriptor, conv: &TypeNameConverter<'_>) {
    let mut head = format!("interface {}", t.name);
    if !t.generic_params.is_empty() {
        head.push_str(&format!("<{}>", t.generic_params.join(", ")));
    }
    head.push_str(" {");
    sb.line(&head);
    sb.indent();
    for member in t.members.iter().filter(|m| !m.ignored) {
        sb.line(&format!("{}: {};", member.name, conv.ts_name(&member.ty)));
    }
    sb.unindent();
    sb.line("}");
}

fn write_enum(sb: &mut ScriptBuilder, t: &TypeDescriptor, const_mode: bool, in_namespace: bool) {
    let keyword = match (const_mode, in_namespace) {
        (true, true) => "const enum",
        (true, false) => "declare const enum",
        (false, true) => "export enum",
        (false, false) => "enum",
    };
    sb.line(&format!("{} {} {{", keyword, t.name));
    sb.indent();
    let last = t.enum_members.len().saturating_sub(1);
    for (i, m) in t.enum_members.iter().enumerate() {
        let sep = if i == last { "" } else { "," };
        sb.line(&format!("{} = {}{}", m.name, m.value, sep));
    }
    sb.unindent();
    sb.line("}");
}

/// Assign every runtime enum onto the global root at its full dotted path,
/// creating each namespace container on the way.
fn write_runtime_script(
    sb: &mut ScriptBuilder,
    enums: &[&TypeDescriptor],
    conv: &TypeNameConverter<'_>,
) {
    let mut prefixes = BTreeSet::new();
    for t in enums {
        let path = conv.declaration_path(t);
        let parts: Vec<&str> = path.split('.').collect();
        for i in 1..parts.len() {
            prefixes.insert(parts[..i].join("."));
        }
    }

    sb.line("const wnd: any = window;");
    for prefix in &prefixes {
        sb.line(&format!("wnd.{} = wnd.{} || {{}};", prefix, prefix));
    }
    sb.blank();
    for t in enums {
        let path = conv.declaration_path(t);
        sb.line(&format!("wnd.{} = {};", path, path));
    }
}
