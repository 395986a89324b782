//! Generate TypeScript type declarations and typed API/hub client stubs
//! from reflected host type metadata.
//!
//! The pipeline walks a graph of type descriptors produced by a discovery
//! front-end, deduplicates every reachable class, interface, and enum into
//! a closed output model, and renders three text artifacts: structural
//! declarations, enum declarations, and service/hub stubs. Generation is
//! single-threaded, deterministic, and side-effect free until the optional
//! terminal file write.
//!
//! The usual entry point is the fluent [`TypeGen`] builder:
//!
//! ```
//! use tsgen::{Member, TypeDescriptor, TypeGen};
//!
//! let output = TypeGen::new()
//!     .add_type(TypeDescriptor::class(
//!         "Acme",
//!         "User",
//!         vec![Member::new("Name", TypeDescriptor::string())],
//!     ))
//!     .build()
//!     .unwrap();
//! assert!(output.definitions.contains("interface User"));
//! ```

pub mod api;
pub mod builder;
pub mod config;
pub mod convert;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod hub;
pub mod script;
pub mod translate;

pub use builder::{GenOutput, TypeGen, GENERATED_NOTICE};
pub use config::{GenConfig, TsgenConfig};
pub use descriptor::{
    EnumMember, HttpVerb, HubDescriptor, Manifest, Member, MethodDescriptor, ParamBinding,
    Parameter, ServiceDescriptor, ServiceMethod, TypeDescriptor, TypeKind,
};
pub use error::GenError;
pub use script::ScriptBuilder;
pub use translate::{Declaration, OutputModel, Translator, TypeKey, Warning, WarningKind};
