//! # sqlguard engine
//!
//! Policy-mediated access control for a distributed SQL engine.
//!
//! This crate provides:
//! - A hierarchical `Resource` model for catalogs, schemas, tables, columns,
//!   users and session properties
//! - `PolicyEvaluator` trait for the external policy engine
//! - `AccessMediator`, which maps every engine operation to a resource and
//!   action and enforces the evaluator's verdict
//! - `MaskingEngine`, which turns row-filter and data-mask decisions into
//!   view expressions

pub mod config;
pub mod error;
pub mod identity;
pub mod masking;
pub mod mediator;
pub mod resource;
pub mod types;

pub use config::{NoopBootstrap, PluginConfig, SecurityBootstrap};
pub use error::{AccessDenied, BootstrapError, EngineError, EvaluatorError, GroupLookupError};
pub use identity::{GroupResolver, IdentityResolver};
pub use masking::MaskingEngine;
pub use mediator::{AccessMediator, Collaborators, SystemAccessControl};
pub use resource::{Resource, ResourceKey};
pub use types::{
    AccessRequest, AccessType, CatalogSchemaName, CatalogSchemaTableName, ColumnMetadata,
    FilterDescriptor, GrantPrincipal, Identity, MaskDescriptor, MaskKind, PolicyEvaluator,
    PrincipalKind, Privilege, SchemaTableName, SecurityContext, SqlType, ViewExpression,
};
