//! Error types for access mediation.

use std::collections::BTreeSet;

use thiserror::Error;

/// The only failure a host engine ever sees.
///
/// One variant per operation family; each carries the display names needed
/// for its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Access Denied: Principal {} cannot become user {user}", format_principal(.principal))]
    SetUser {
        principal: Option<String>,
        user: String,
    },

    #[error("Access Denied: Cannot set system session property {property}")]
    SetSystemSessionProperty { property: String },

    #[error("Access Denied: User {user} cannot impersonate user {target}")]
    ImpersonateUser { user: String, target: String },

    #[error("Access Denied: Cannot execute query")]
    ExecuteQuery,

    #[error("Access Denied: User {user} cannot view query owned by {owner}")]
    ViewQuery { user: String, owner: String },

    #[error("Access Denied: User {user} cannot kill query owned by {owner}")]
    KillQuery { user: String, owner: String },

    #[error("Access Denied: Cannot set catalog session property {catalog}.{property}")]
    SetCatalogSessionProperty { catalog: String, property: String },

    #[error("Access Denied: Cannot show roles from catalog {catalog}")]
    ShowRoles { catalog: String },

    #[error("Access Denied: Cannot access catalog {catalog}")]
    CatalogAccess { catalog: String },

    #[error("Access Denied: Cannot show schemas of catalog {catalog}")]
    ShowSchemas { catalog: String },

    #[error("Access Denied: Cannot show tables of schema {schema}")]
    ShowTables { schema: String },

    #[error("Access Denied: Cannot create schema {schema}")]
    CreateSchema { schema: String },

    #[error("Access Denied: Cannot drop schema {schema}")]
    DropSchema { schema: String },

    #[error("Access Denied: Cannot rename schema from {schema} to {new_schema}")]
    RenameSchema { schema: String, new_schema: String },

    #[error("Access Denied: Cannot show create table for {table}")]
    ShowCreateTable { table: String },

    #[error("Access Denied: Cannot show columns of table {table}")]
    ShowColumns { table: String },

    #[error("Access Denied: Cannot create table {table}")]
    CreateTable { table: String },

    #[error("Access Denied: Cannot drop table {table}")]
    DropTable { table: String },

    #[error("Access Denied: Cannot rename table from {table} to {new_table}")]
    RenameTable { table: String, new_table: String },

    #[error("Access Denied: Cannot insert into table {table}")]
    InsertTable { table: String },

    #[error("Access Denied: Cannot delete from table {table}")]
    DeleteTable { table: String },

    #[error("Access Denied: Cannot add a column to table {table}")]
    AddColumn { table: String },

    #[error("Access Denied: Cannot drop a column from table {table}")]
    DropColumn { table: String },

    #[error("Access Denied: Cannot rename a column in table {table}")]
    RenameColumn { table: String },

    #[error("Access Denied: Cannot comment table {table}")]
    CommentTable { table: String },

    #[error("Access Denied: Cannot create view {view}")]
    CreateView { view: String },

    #[error("Access Denied: Cannot drop view {view}")]
    DropView { view: String },

    #[error("Access Denied: Cannot rename view from {view} to {new_view}")]
    RenameView { view: String, new_view: String },

    #[error("Access Denied: View owner '{user}' cannot create view that selects from {view}")]
    CreateViewWithSelect { view: String, user: String },

    #[error("Access Denied: Cannot grant privilege {privilege} on table {table}")]
    GrantTablePrivilege { privilege: String, table: String },

    #[error("Access Denied: Cannot revoke privilege {privilege} on table {table}")]
    RevokeTablePrivilege { privilege: String, table: String },

    #[error("Access Denied: Cannot select from columns {} in table or view {table}", format_columns(.columns))]
    SelectColumns {
        table: String,
        columns: BTreeSet<String>,
    },

    #[error("Access Denied: Cannot evaluate row filter for table {table}")]
    RowFilter { table: String },

    #[error("Access Denied: Cannot evaluate column mask for {table}.{column}")]
    ColumnMask { table: String, column: String },
}

impl AccessDenied {
    /// Short operation label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetUser { .. } => "set_user",
            Self::SetSystemSessionProperty { .. } => "set_system_session_property",
            Self::ImpersonateUser { .. } => "impersonate_user",
            Self::ExecuteQuery => "execute_query",
            Self::ViewQuery { .. } => "view_query",
            Self::KillQuery { .. } => "kill_query",
            Self::SetCatalogSessionProperty { .. } => "set_catalog_session_property",
            Self::ShowRoles { .. } => "show_roles",
            Self::CatalogAccess { .. } => "access_catalog",
            Self::ShowSchemas { .. } => "show_schemas",
            Self::ShowTables { .. } => "show_tables",
            Self::CreateSchema { .. } => "create_schema",
            Self::DropSchema { .. } => "drop_schema",
            Self::RenameSchema { .. } => "rename_schema",
            Self::ShowCreateTable { .. } => "show_create_table",
            Self::ShowColumns { .. } => "show_columns",
            Self::CreateTable { .. } => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::RenameTable { .. } => "rename_table",
            Self::InsertTable { .. } => "insert_table",
            Self::DeleteTable { .. } => "delete_table",
            Self::AddColumn { .. } => "add_column",
            Self::DropColumn { .. } => "drop_column",
            Self::RenameColumn { .. } => "rename_column",
            Self::CommentTable { .. } => "comment_table",
            Self::CreateView { .. } => "create_view",
            Self::DropView { .. } => "drop_view",
            Self::RenameView { .. } => "rename_view",
            Self::CreateViewWithSelect { .. } => "create_view_with_select",
            Self::GrantTablePrivilege { .. } => "grant_table_privilege",
            Self::RevokeTablePrivilege { .. } => "revoke_table_privilege",
            Self::SelectColumns { .. } => "select_columns",
            Self::RowFilter { .. } => "row_filter",
            Self::ColumnMask { .. } => "column_mask",
        }
    }
}

fn format_principal(principal: &Option<String>) -> &str {
    principal.as_deref().unwrap_or("<none>")
}

fn format_columns(columns: &BTreeSet<String>) -> String {
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    format!("[{}]", names.join(", "))
}

/// Failure reported by the policy evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error("policy evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("policy evaluator initialization failed: {0}")]
    Init(String),

    #[error("policy evaluation failed: {0}")]
    Evaluation(String),
}

/// Failure reported by the identity-group service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("group lookup failed for user '{user}': {reason}")]
pub struct GroupLookupError {
    pub user: String,
    pub reason: String,
}

/// Errors that abort plugin startup.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to load site configuration '{path}': {reason}")]
    SiteConfig { path: String, reason: String },

    #[error("kerberos login failed for principal '{principal}': {reason}")]
    KerberosLogin { principal: String, reason: String },

    #[error("group lookup is enabled but no group resolver was supplied")]
    MissingGroupResolver,

    #[error(transparent)]
    EvaluatorInit(#[from] EvaluatorError),
}

/// Errors returned by the mediator and masking engine.
///
/// Anything other than `Denied` is an internal failure; the isolation
/// boundary turns those into the operation's denial.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),

    #[error(transparent)]
    GroupLookup(#[from] GroupLookupError),
}

impl EngineError {
    pub fn is_denied(&self) -> bool {
        matches!(self, EngineError::Denied(_))
    }
}
