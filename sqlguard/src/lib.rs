//! # sqlguard
//!
//! Access control plugin for a distributed SQL engine. Re-exports the
//! `sqlguard-engine` mediator and puts it behind a fail-closed isolation
//! boundary: the host only ever sees an answer or an `AccessDenied`.
//!
//! Depend on `sqlguard-engine` directly to use the mediator without the
//! boundary.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sqlguard::{
//!     AccessControlConfig, AccessRequest, CatalogSchemaTableName, Collaborators,
//!     EvaluatorError, FilterDescriptor, Identity, ImplementationRegistry, MaskDescriptor,
//!     NoopBootstrap, PolicyEvaluator, SecurityContext,
//! };
//!
//! struct ReadOnly;
//!
//! impl PolicyEvaluator for ReadOnly {
//!     fn init(&self, _service_type: &str, _app_id: &str) -> Result<(), EvaluatorError> {
//!         Ok(())
//!     }
//!
//!     fn is_allowed(&self, request: &AccessRequest) -> Result<bool, EvaluatorError> {
//!         Ok(request.access_type.as_str() == "select")
//!     }
//!
//!     fn evaluate_row_filter_policies(
//!         &self,
//!         _request: &AccessRequest,
//!     ) -> Result<Option<FilterDescriptor>, EvaluatorError> {
//!         Ok(None)
//!     }
//!
//!     fn evaluate_data_mask_policies(
//!         &self,
//!         _request: &AccessRequest,
//!     ) -> Result<Option<MaskDescriptor>, EvaluatorError> {
//!         Ok(None)
//!     }
//! }
//!
//! let registry = ImplementationRegistry::with_mediator(Collaborators {
//!     evaluator: Arc::new(ReadOnly),
//!     groups: None,
//!     bootstrap: Arc::new(NoopBootstrap),
//! });
//!
//! let config = AccessControlConfig::parse(r#"
//!     principal = "presto/coordinator@EXAMPLE.COM"
//!     keytab = "/etc/security/keytabs/presto.keytab"
//! "#).expect("Failed to parse config");
//!
//! let control = sqlguard::install(&config, &registry).expect("Failed to install");
//!
//! let context = SecurityContext::new(Identity::new("alice"));
//! let clicks = CatalogSchemaTableName::new("hive", "web", "clicks");
//! let denied = control.check_can_drop_table(&context, &clicks).unwrap_err();
//! assert_eq!(denied.to_string(), "Access Denied: Cannot drop table clicks");
//! ```

pub mod boundary;
pub mod config;
pub mod context;
pub mod error;
pub mod install;
pub mod registry;

// Re-export everything from the engine crate
pub use sqlguard_engine::*;

pub use boundary::IsolatedAccessControl;
pub use config::AccessControlConfig;
pub use context::ConfinedScope;
pub use error::{ConfigError, InstallError};
pub use install::{install, installed};
pub use registry::{Factory, ImplementationRegistry, DEFAULT_IMPLEMENTATION};
