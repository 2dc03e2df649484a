//! Core types for access mediation.
//!
//! Provides the engine-native names the host passes in, the request and
//! decision shapes exchanged with the policy evaluator, and the
//! `PolicyEvaluator` trait the mediator calls into.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EvaluatorError;
use crate::resource::Resource;

/// A schema inside a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogSchemaName {
    pub catalog: String,
    pub schema: String,
}

impl CatalogSchemaName {
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
        }
    }
}

impl fmt::Display for CatalogSchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.catalog, self.schema)
    }
}

/// A table (or view) name relative to its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaTableName {
    pub schema: String,
    pub table: String,
}

impl SchemaTableName {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for SchemaTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A fully qualified table (or view) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogSchemaTableName {
    pub catalog: String,
    pub schema_table: SchemaTableName,
}

impl CatalogSchemaTableName {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema_table: SchemaTableName::new(schema, table),
        }
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn schema(&self) -> &str {
        &self.schema_table.schema
    }

    pub fn table(&self) -> &str {
        &self.schema_table.table
    }
}

impl fmt::Display for CatalogSchemaTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.catalog, self.schema_table)
    }
}

/// SQL type of a column as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlType {
    base_name: String,
    #[serde(default)]
    parameters: Vec<String>,
}

impl SqlType {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters<I, S>(base_name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_name: base_name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// Type name without parameters (`varchar` for `varchar(10)`).
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameters.is_empty() {
            write!(f, "{}", self.base_name)
        } else {
            write!(f, "{}({})", self.base_name, self.parameters.join(","))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub column_type: SqlType,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, column_type: SqlType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Table privilege named in GRANT / REVOKE statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Privilege {
    Select,
    Delete,
    Insert,
    Update,
    Ownership,
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Privilege::Select => "SELECT",
            Privilege::Delete => "DELETE",
            Privilege::Insert => "INSERT",
            Privilege::Update => "UPDATE",
            Privilege::Ownership => "OWNERSHIP",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrincipalKind {
    User,
    Role,
}

/// Grantee or revokee of a table privilege.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantPrincipal {
    pub kind: PrincipalKind,
    pub name: String,
}

impl GrantPrincipal {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: PrincipalKind::User,
            name: name.into(),
        }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self {
            kind: PrincipalKind::Role,
            name: name.into(),
        }
    }
}

/// Authenticated caller: a user name and the groups it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user: String,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Identity {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            groups: BTreeSet::new(),
        }
    }

    pub fn with_groups<I, S>(user: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user: user.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

/// Security context the engine hands to every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub identity: Identity,
    #[serde(default)]
    pub query_id: Option<String>,
}

impl SecurityContext {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            query_id: None,
        }
    }

    pub fn with_query_id(mut self, query_id: impl Into<String>) -> Self {
        self.query_id = Some(query_id.into());
        self
    }

    pub fn user(&self) -> &str {
        &self.identity.user
    }
}

/// Action checked against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Create,
    Drop,
    Select,
    Insert,
    Delete,
    Use,
    Alter,
    All,
    Grant,
    Revoke,
    Show,
    Impersonate,
}

impl AccessType {
    /// Lowercase name sent to the evaluator.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Create => "create",
            AccessType::Drop => "drop",
            AccessType::Select => "select",
            AccessType::Insert => "insert",
            AccessType::Delete => "delete",
            AccessType::Use => "use",
            AccessType::Alter => "alter",
            AccessType::All => "all",
            AccessType::Grant => "grant",
            AccessType::Revoke => "revoke",
            AccessType::Show => "show",
            AccessType::Impersonate => "impersonate",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question put to the policy evaluator.
///
/// Built fresh for every check and dropped once the answer is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub resource: Resource,
    pub access_type: AccessType,
    pub user: String,
    pub groups: BTreeSet<String>,
    pub access_time: DateTime<Utc>,
}

impl AccessRequest {
    pub fn new(resource: Resource, access_type: AccessType, identity: Identity) -> Self {
        Self {
            resource,
            access_type,
            user: identity.user,
            groups: identity.groups,
            access_time: Utc::now(),
        }
    }
}

impl fmt::Display for AccessRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{resource={} access={} user={} groups={:?}}}",
            self.resource, self.access_type, self.user, self.groups
        )
    }
}

/// Row-filter decision returned by the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub enabled: bool,
    #[serde(default)]
    pub predicate: Option<String>,
}

impl FilterDescriptor {
    pub fn enabled(predicate: impl Into<String>) -> Self {
        Self {
            enabled: true,
            predicate: Some(predicate.into()),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Kind of column mask chosen by the evaluator.
///
/// Names are matched case-insensitively; anything other than `MASK_NULL` and
/// `CUSTOM` is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaskKind {
    Null,
    Custom,
    Other(String),
}

impl MaskKind {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("MASK_NULL") {
            MaskKind::Null
        } else if name.eq_ignore_ascii_case("CUSTOM") {
            MaskKind::Custom
        } else {
            MaskKind::Other(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MaskKind::Null => "MASK_NULL",
            MaskKind::Custom => "CUSTOM",
            MaskKind::Other(name) => name,
        }
    }
}

impl From<String> for MaskKind {
    fn from(name: String) -> Self {
        MaskKind::from_name(&name)
    }
}

impl From<MaskKind> for String {
    fn from(kind: MaskKind) -> Self {
        kind.name().to_string()
    }
}

/// Column-mask decision returned by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskDescriptor {
    pub enabled: bool,
    pub kind: MaskKind,
    /// Template that may reference `{col}` and `{type}`.
    #[serde(default)]
    pub transformer: Option<String>,
    /// Literal replacement value for `CUSTOM` masks.
    #[serde(default)]
    pub masked_value: Option<String>,
}

impl MaskDescriptor {
    pub fn new(kind: MaskKind) -> Self {
        Self {
            enabled: true,
            kind,
            transformer: None,
            masked_value: None,
        }
    }

    pub fn with_transformer(mut self, transformer: impl Into<String>) -> Self {
        self.transformer = Some(transformer.into());
        self
    }

    pub fn with_masked_value(mut self, value: impl Into<String>) -> Self {
        self.masked_value = Some(value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Row filter or column mask bound to the requesting user.
///
/// Always produced by the masking operations; `expression` is `None` when no
/// filter or mask applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewExpression {
    pub identity: String,
    pub catalog: String,
    pub schema: String,
    pub expression: Option<String>,
}

/// External policy evaluator.
///
/// The mediator only shapes requests and reads answers; matching, precedence,
/// auditing and policy refresh all live behind this trait. Implementations
/// are shared across threads and must not require mutation after `init`.
pub trait PolicyEvaluator: Send + Sync {
    /// Called once at startup, before any other method.
    fn init(&self, service_type: &str, app_id: &str) -> Result<(), EvaluatorError>;

    fn is_allowed(&self, request: &AccessRequest) -> Result<bool, EvaluatorError>;

    /// `None` means no row-filter policy matched.
    fn evaluate_row_filter_policies(
        &self,
        request: &AccessRequest,
    ) -> Result<Option<FilterDescriptor>, EvaluatorError>;

    /// `None` means no data-mask policy matched.
    fn evaluate_data_mask_policies(
        &self,
        request: &AccessRequest,
    ) -> Result<Option<MaskDescriptor>, EvaluatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_display() {
        let table = CatalogSchemaTableName::new("hive", "web", "clicks");
        assert_eq!(table.to_string(), "hive.web.clicks");
        assert_eq!(table.schema_table.to_string(), "web.clicks");
        assert_eq!(CatalogSchemaName::new("hive", "web").to_string(), "hive.web");
    }

    #[test]
    fn test_mask_kind_names_are_case_insensitive() {
        assert_eq!(MaskKind::from_name("mask_null"), MaskKind::Null);
        assert_eq!(MaskKind::from_name("Custom"), MaskKind::Custom);
        assert_eq!(
            MaskKind::from_name("MASK_HASH"),
            MaskKind::Other("MASK_HASH".to_string())
        );
    }

    #[test]
    fn test_sql_type_base_name() {
        let ty = SqlType::with_parameters("varchar", ["10"]);
        assert_eq!(ty.base_name(), "varchar");
        assert_eq!(ty.to_string(), "varchar(10)");
    }

    #[test]
    fn test_access_request_takes_identity() {
        let identity = Identity::with_groups("alice", ["analysts"]);
        let request = AccessRequest::new(Resource::catalog("hive"), AccessType::Use, identity);
        assert_eq!(request.user, "alice");
        assert!(request.groups.contains("analysts"));
        assert_eq!(request.access_type.as_str(), "use");
    }
}
