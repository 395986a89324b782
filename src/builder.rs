//! Fluent entry point assembling the full generation pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ApiGenerator;
use crate::config::GenConfig;
use crate::descriptor::{HubDescriptor, ServiceDescriptor, TypeDescriptor};
use crate::emit;
use crate::error::GenError;
use crate::hub::HubGenerator;
use crate::script::ScriptBuilder;
use crate::translate::{Translator, Warning};

/// Comment prepended to every written artifact.
pub const GENERATED_NOTICE: &str =
    "// This is a generated file. Any changes made here will be overwritten.";

/// The three rendered artifacts plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct GenOutput {
    /// Structural type declarations.
    pub definitions: String,
    /// Enum declarations (and the runtime initialization script, when const
    /// enums are disabled).
    pub enums: String,
    /// Service and hub stubs.
    pub services: String,
    pub warnings: Vec<Warning>,
}

/// Fluent builder over the whole pipeline: collect descriptors, configure
/// emission, then [`build`](TypeGen::build) the three artifacts.
///
/// ```
/// use tsgen::{TypeGen, TypeDescriptor, Member};
///
/// let output = TypeGen::new()
///     .add_type(TypeDescriptor::class(
///         "Acme",
///         "User",
///         vec![Member::new("Name", TypeDescriptor::string())],
///     ))
///     .with_global_namespace("Api")
///     .build()
///     .unwrap();
/// assert!(output.definitions.contains("interface User"));
/// ```
#[derive(Debug, Default)]
pub struct TypeGen {
    types: Vec<TypeDescriptor>,
    services: Vec<ServiceDescriptor>,
    hubs: Vec<HubDescriptor>,
    config: GenConfig,
}

impl TypeGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root type to translate.
    pub fn add_type(mut self, t: TypeDescriptor) -> Self {
        self.types.push(t);
        self
    }

    pub fn add_service(mut self, service: ServiceDescriptor) -> Self {
        self.services.push(service);
        self
    }

    pub fn add_hub(mut self, hub: HubDescriptor) -> Self {
        self.hubs.push(hub);
        self
    }

    /// Select const-enum emission (the default) or runtime enums.
    pub fn with_const_enums(mut self, value: bool) -> Self {
        self.config.const_enums = value;
        self
    }

    /// Wrap all declarations in a single namespace.
    pub fn with_global_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.global_namespace = Some(namespace.into());
        self
    }

    /// Identifier used for the promise wrapper in service stubs.
    pub fn with_promise_type(mut self, promise: impl Into<String>) -> Self {
        self.config.promise_type = promise.into();
        self
    }

    /// Render `full_name` (e.g. `System.Guid`) as the literal `rendered`.
    pub fn with_scalar_override(
        mut self,
        full_name: impl Into<String>,
        rendered: impl Into<String>,
    ) -> Self {
        self.config
            .scalar_overrides
            .insert(full_name.into(), rendered.into());
        self
    }

    /// Treat `prefix` as a reserved host namespace whose types are never
    /// emitted.
    pub fn with_reserved_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.config.reserved_namespaces.push(prefix.into());
        self
    }

    /// Rewrite each resolved service URL before it is embedded in endpoint
    /// metadata.
    pub fn with_url_rewriter(mut self, rewrite: impl Fn(&str) -> String + 'static) -> Self {
        self.config.url_rewriter = Some(Box::new(rewrite));
        self
    }

    /// Run the pipeline and render the three artifacts in memory.
    ///
    /// Hub descriptors are validated first, then services and hubs feed
    /// their referenced types into the translator, then the root types are
    /// translated, and finally the deduplicated model is emitted.
    pub fn build(&self) -> Result<GenOutput, GenError> {
        let hub_gen = HubGenerator::new(&self.config);
        hub_gen.validate(&self.hubs)?;

        let mut translator = Translator::new(&self.config);
        let mut services_sb = ScriptBuilder::new();

        let api = ApiGenerator::new(&self.config);
        api.write_services(&self.services, &mut translator, &mut services_sb)?;
        hub_gen.write_hubs(&self.hubs, &mut translator, &mut services_sb)?;

        translator.process(&self.types)?;
        let (model, warnings) = translator.finish();

        let definitions = emit::write_declarations(&model, &self.config);
        let enums = emit::write_enums(&model, &self.config);
        Ok(GenOutput {
            definitions,
            enums,
            services: services_sb.into_string(),
            warnings,
        })
    }

    /// Build and write the three artifacts into `dir` with default names.
    pub fn build_to_dir(&self, dir: impl AsRef<Path>) -> Result<GenOutput, GenError> {
        let dir = dir.as_ref();
        self.build_files(
            dir.join("definitions.d.ts"),
            dir.join("services.ts"),
            dir.join("enums.ts"),
        )
    }

    /// Build and write the three artifacts to explicit paths.
    ///
    /// Everything is rendered in memory before the first write, so a failed
    /// generation never produces a partially-written file.
    pub fn build_files(
        &self,
        definitions: PathBuf,
        services: PathBuf,
        enums: PathBuf,
    ) -> Result<GenOutput, GenError> {
        let output = self.build()?;
        write_artifact(&definitions, &output.definitions)?;
        write_artifact(&services, &output.services)?;
        write_artifact(&enums, &output.enums)?;
        Ok(output)
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<(), GenError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(path, format!("{}\n\n{}", GENERATED_NOTICE, content))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        HttpVerb, Member, MethodDescriptor, Parameter, ServiceMethod,
    };

    #[test]
    fn build_produces_all_three_artifacts() {
        let user = TypeDescriptor::class(
            "Acme",
            "User",
            vec![Member::new("Name", TypeDescriptor::string())],
        );
        let output = TypeGen::new()
            .add_type(user.clone())
            .add_service(ServiceDescriptor::new("Users").with_method(ServiceMethod::new(
                MethodDescriptor::new(
                    "GetById",
                    vec![Parameter::new("id", TypeDescriptor::primitive("int"))],
                    user,
                ),
                HttpVerb::Get,
            )))
            .build()
            .unwrap();
        assert!(output.definitions.contains("interface User {"));
        assert!(output.services.contains("interface UsersService {"));
        assert!(output.enums.is_empty());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn build_is_deterministic() {
        let gen = TypeGen::new().add_type(TypeDescriptor::class(
            "Acme",
            "User",
            vec![Member::new("Name", TypeDescriptor::string())],
        ));
        let a = gen.build().unwrap();
        let b = gen.build().unwrap();
        assert_eq!(a.definitions, b.definitions);
        assert_eq!(a.services, b.services);
        assert_eq!(a.enums, b.enums);
    }

    #[test]
    fn collision_aborts_before_any_artifact() {
        let a = TypeDescriptor::class(
            "Acme",
            "User",
            vec![Member::new("Id", TypeDescriptor::primitive("int"))],
        );
        let b = TypeDescriptor::class(
            "Acme",
            "User",
            vec![Member::new("Email", TypeDescriptor::string())],
        );
        let err = TypeGen::new().add_type(a).add_type(b).build().unwrap_err();
        assert!(matches!(err, GenError::NamingCollision { .. }));
    }
}
