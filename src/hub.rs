//! Hub surface generation: client, server, and proxy interfaces.
//!
//! For every hub three paired declarations are emitted: a client-callback
//! interface (methods the server may invoke, discovered from the hub's
//! client contract), a server-method interface, and a proxy interface
//! binding the two under fixed `server`/`client` field names. A shared
//! promise interface and an aggregate lookup interface frame the set.

use crate::api::method_signature;
use crate::config::GenConfig;
use crate::convert::{to_camel_case, TypeNameConverter};
use crate::descriptor::{HubDescriptor, TypeKind};
use crate::error::GenError;
use crate::script::ScriptBuilder;
use crate::translate::Translator;

/// Hub stubs use the done/error callback promise shape rather than the
/// configured promise type.
const HUB_PROMISE_TYPE: &str = "ISignalRPromise";

/// Generates typed hub proxy surfaces.
pub struct HubGenerator<'a> {
    conv: TypeNameConverter<'a>,
}

impl<'a> HubGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self {
            conv: TypeNameConverter::new(config),
        }
    }

    /// Reject malformed hub descriptors. Runs before any translation.
    pub fn validate(&self, hubs: &[HubDescriptor]) -> Result<(), GenError> {
        for hub in hubs {
            if hub.name.is_empty() {
                return Err(GenError::UnresolvableHub {
                    hub: "<unnamed>".to_string(),
                    reason: "hub descriptor has no name".to_string(),
                });
            }
            if let Some(contract) = &hub.client_contract {
                if !matches!(contract.kind, TypeKind::Class | TypeKind::Interface) {
                    return Err(GenError::UnresolvableHub {
                        hub: hub.name.clone(),
                        reason: format!(
                            "client contract `{}` is not a class or interface",
                            contract.full_name()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Emit the shared promise interface, the per-hub surfaces, and the
    /// aggregate lookup interface.
    pub fn write_hubs(
        &self,
        hubs: &[HubDescriptor],
        translator: &mut Translator<'_>,
        sb: &mut ScriptBuilder,
    ) -> Result<(), GenError> {
        if hubs.is_empty() {
            return Ok(());
        }
        self.validate(hubs)?;

        sb.line("interface ISignalRPromise<T> {");
        sb.indent();
        sb.line("done(cb: (result: T) => any): ISignalRPromise<T>;");
        sb.line("error(cb: (error: any) => any): ISignalRPromise<T>;");
        sb.unindent();
        sb.line("}");
        sb.blank();

        for hub in hubs {
            self.write_hub(hub, translator, sb)?;
        }

        sb.line("interface SignalR {");
        sb.indent();
        for hub in hubs {
            sb.line(&format!(
                "{}: I{}Proxy;",
                to_camel_case(&hub.name),
                hub.name
            ));
        }
        sb.unindent();
        sb.line("}");
        sb.blank();
        Ok(())
    }

    fn write_hub(
        &self,
        hub: &HubDescriptor,
        translator: &mut Translator<'_>,
        sb: &mut ScriptBuilder,
    ) -> Result<(), GenError> {
        // Methods the server may invoke on connected clients.
        sb.line(&format!("interface I{}Client {{", hub.name));
        sb.indent();
        match &hub.client_contract {
            None => {
                sb.line("/* Client interface not generated as hub provides no client contract */");
            }
            Some(contract) => {
                for method in &contract.methods {
                    let sig = method_signature(method, HUB_PROMISE_TYPE, &self.conv, translator)?;
                    sb.line(&sig);
                }
            }
        }
        sb.unindent();
        sb.line("}");
        sb.blank();

        // Server-side methods callable from the client.
        sb.line(&format!("interface I{} {{", hub.name));
        sb.indent();
        for method in &hub.methods {
            let sig = method_signature(method, HUB_PROMISE_TYPE, &self.conv, translator)?;
            sb.line(&sig);
        }
        sb.unindent();
        sb.line("}");
        sb.blank();

        sb.line(&format!("interface I{}Proxy {{", hub.name));
        sb.indent();
        sb.line(&format!("server: I{};", hub.name));
        sb.line(&format!("client: I{}Client;", hub.name));
        sb.unindent();
        sb.line("}");
        sb.blank();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Member, MethodDescriptor, Parameter, TypeDescriptor};
    use crate::translate::TypeKey;

    fn message() -> TypeDescriptor {
        TypeDescriptor::class(
            "Chat",
            "Message",
            vec![Member::new("Text", TypeDescriptor::string())],
        )
    }

    fn chat_hub() -> HubDescriptor {
        HubDescriptor::new("ChatHub")
            .with_client_contract(
                TypeDescriptor::interface("Chat", "IChatClient", vec![]).with_methods(vec![
                    MethodDescriptor::new(
                        "ReceiveMessage",
                        vec![Parameter::new("message", message())],
                        TypeDescriptor::void(),
                    ),
                ]),
            )
            .with_method(MethodDescriptor::new(
                "Send",
                vec![Parameter::new("message", message())],
                TypeDescriptor::async_wrapper(Some(TypeDescriptor::primitive("int"))),
            ))
    }

    fn generate(hubs: &[HubDescriptor]) -> (String, usize) {
        let config = GenConfig::default();
        let mut translator = Translator::new(&config);
        let mut sb = ScriptBuilder::new();
        HubGenerator::new(&config)
            .write_hubs(hubs, &mut translator, &mut sb)
            .unwrap();
        let registered = translator.model().len();
        (sb.into_string(), registered)
    }

    #[test]
    fn emits_shared_promise_interface_once() {
        let (out, _) = generate(&[chat_hub()]);
        assert_eq!(out.matches("interface ISignalRPromise<T> {").count(), 1);
        assert!(out.contains("done(cb: (result: T) => any): ISignalRPromise<T>;"));
        assert!(out.contains("error(cb: (error: any) => any): ISignalRPromise<T>;"));
    }

    #[test]
    fn emits_client_server_and_proxy_interfaces() {
        let (out, _) = generate(&[chat_hub()]);
        assert!(out.contains("interface IChatHubClient {"));
        assert!(out.contains("receiveMessage(message: Chat.Message): void;"));
        assert!(out.contains("interface IChatHub {"));
        assert!(out.contains("send(message: Chat.Message): ISignalRPromise<number>;"));
        assert!(out.contains("interface IChatHubProxy {"));
        assert!(out.contains("server: IChatHub;"));
        assert!(out.contains("client: IChatHubClient;"));
    }

    #[test]
    fn aggregate_lookup_maps_camel_cased_names() {
        let (out, _) = generate(&[chat_hub(), HubDescriptor::new("StatusHub")]);
        assert!(out.contains("interface SignalR {"));
        assert!(out.contains("chatHub: IChatHubProxy;"));
        assert!(out.contains("statusHub: IStatusHubProxy;"));
    }

    #[test]
    fn contract_less_hub_gets_placeholder_comment() {
        let (out, _) = generate(&[HubDescriptor::new("StatusHub")]);
        assert!(out.contains("interface IStatusHubClient {"));
        assert!(out
            .contains("/* Client interface not generated as hub provides no client contract */"));
    }

    #[test]
    fn referenced_types_reach_the_translator() {
        let config = GenConfig::default();
        let mut translator = Translator::new(&config);
        let mut sb = ScriptBuilder::new();
        HubGenerator::new(&config)
            .write_hubs(&[chat_hub()], &mut translator, &mut sb)
            .unwrap();
        assert!(translator.model().contains(&TypeKey {
            namespace: "Chat".into(),
            name: "Message".into()
        }));
    }

    #[test]
    fn malformed_client_contract_is_rejected() {
        let config = GenConfig::default();
        let mut translator = Translator::new(&config);
        let mut sb = ScriptBuilder::new();
        let bad = HubDescriptor::new("BadHub")
            .with_client_contract(TypeDescriptor::primitive("int"));
        let err = HubGenerator::new(&config)
            .write_hubs(&[bad], &mut translator, &mut sb)
            .unwrap_err();
        match err {
            GenError::UnresolvableHub { hub, .. } => assert_eq!(hub, "BadHub"),
            other => panic!("expected unresolvable hub, got {other:?}"),
        }
        // Rejected at the boundary: nothing was translated.
        assert!(translator.model().is_empty());
    }

    #[test]
    fn empty_hub_list_emits_nothing() {
        let (out, _) = generate(&[]);
        assert!(out.is_empty());
    }
}
