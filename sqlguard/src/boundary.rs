//! Fail-closed isolation boundary in front of an access control
//! implementation.
//!
//! Every call runs the implementation inside its confined context. What comes
//! back out is either the implementation's own answer or an `AccessDenied`:
//! internal errors and panics are turned into the denial of the operation
//! that was being checked, and filtering calls hand back their input.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use sqlguard_engine::{
    AccessDenied, CatalogSchemaName, CatalogSchemaTableName, ColumnMetadata, EngineError,
    GrantPrincipal, Privilege, SchemaTableName, SecurityContext, SqlType, SystemAccessControl,
    ViewExpression,
};
use tracing::{error, info, warn};

use crate::config::AccessControlConfig;
use crate::context::ConfinedScope;
use crate::error::InstallError;
use crate::registry::ImplementationRegistry;

/// The host-facing access control instance.
pub struct IsolatedAccessControl {
    scope: Arc<str>,
    inner: Box<dyn SystemAccessControl>,
}

impl IsolatedAccessControl {
    /// Construct the configured implementation inside its confined context.
    ///
    /// Any failure here is fatal for plugin startup.
    pub fn new(
        config: &AccessControlConfig,
        registry: &ImplementationRegistry,
    ) -> Result<Self, InstallError> {
        let scope: Arc<str> = Arc::from(config.implementation.as_str());
        let inner = {
            let _scope = ConfinedScope::enter(&scope);
            registry.create(&config.implementation, &config.to_flat_map())?
        };
        info!(implementation = %scope, "access control installed");
        Ok(Self { scope, inner })
    }

    /// Name of the implementation behind the boundary.
    pub fn implementation(&self) -> &str {
        &self.scope
    }

    /// Run `call` in the confined context and translate everything but a
    /// denial into `fallback()`.
    fn isolate<T>(
        &self,
        operation: &'static str,
        call: impl FnOnce(&dyn SystemAccessControl) -> Result<T, EngineError>,
        fallback: impl FnOnce() -> Result<T, AccessDenied>,
    ) -> Result<T, AccessDenied> {
        let outcome = {
            let _scope = ConfinedScope::enter(&self.scope);
            panic::catch_unwind(AssertUnwindSafe(|| call(self.inner.as_ref())))
        };

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(EngineError::Denied(denied))) => Err(denied),
            Ok(Err(err)) => {
                warn!(operation, error = %err, "access control failed; failing closed");
                fallback()
            }
            Err(payload) => {
                error!(
                    operation,
                    panic = %panic_message(payload.as_ref()),
                    "access control panicked; failing closed"
                );
                fallback()
            }
        }
    }

    // =========================================================================
    // System
    // =========================================================================

    pub fn check_can_set_user(
        &self,
        principal: Option<&str>,
        user: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "set_user",
            |inner| inner.check_can_set_user(principal, user),
            || {
                Err(AccessDenied::SetUser {
                    principal: principal.map(str::to_string),
                    user: user.to_string(),
                })
            },
        )
    }

    pub fn check_can_impersonate_user(
        &self,
        context: &SecurityContext,
        user: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "impersonate_user",
            |inner| inner.check_can_impersonate_user(context, user),
            || {
                Err(AccessDenied::ImpersonateUser {
                    user: context.user().to_string(),
                    target: user.to_string(),
                })
            },
        )
    }

    pub fn check_can_set_system_session_property(
        &self,
        context: &SecurityContext,
        property: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "set_system_session_property",
            |inner| inner.check_can_set_system_session_property(context, property),
            || {
                Err(AccessDenied::SetSystemSessionProperty {
                    property: property.to_string(),
                })
            },
        )
    }

    // =========================================================================
    // Query
    // =========================================================================

    pub fn check_can_execute_query(&self, context: &SecurityContext) -> Result<(), AccessDenied> {
        self.isolate(
            "execute_query",
            |inner| inner.check_can_execute_query(context),
            || Err(AccessDenied::ExecuteQuery),
        )
    }

    pub fn check_can_view_query_owned_by(
        &self,
        context: &SecurityContext,
        owner: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "view_query",
            |inner| inner.check_can_view_query_owned_by(context, owner),
            || {
                Err(AccessDenied::ViewQuery {
                    user: context.user().to_string(),
                    owner: owner.to_string(),
                })
            },
        )
    }

    pub fn filter_view_query_owned_by(
        &self,
        context: &SecurityContext,
        owners: BTreeSet<String>,
    ) -> Result<Option<BTreeSet<String>>, AccessDenied> {
        let unchanged = owners.clone();
        self.isolate(
            "filter_view_query_owned_by",
            |inner| inner.filter_view_query_owned_by(context, owners),
            || Ok(Some(unchanged)),
        )
    }

    pub fn check_can_kill_query_owned_by(
        &self,
        context: &SecurityContext,
        owner: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "kill_query",
            |inner| inner.check_can_kill_query_owned_by(context, owner),
            || {
                Err(AccessDenied::KillQuery {
                    user: context.user().to_string(),
                    owner: owner.to_string(),
                })
            },
        )
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn check_can_set_catalog_session_property(
        &self,
        context: &SecurityContext,
        catalog: &str,
        property: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "set_catalog_session_property",
            |inner| inner.check_can_set_catalog_session_property(context, catalog, property),
            || {
                Err(AccessDenied::SetCatalogSessionProperty {
                    catalog: catalog.to_string(),
                    property: property.to_string(),
                })
            },
        )
    }

    pub fn check_can_show_roles(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "show_roles",
            |inner| inner.check_can_show_roles(context, catalog),
            || {
                Err(AccessDenied::ShowRoles {
                    catalog: catalog.to_string(),
                })
            },
        )
    }

    pub fn check_can_access_catalog(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "access_catalog",
            |inner| inner.check_can_access_catalog(context, catalog),
            || {
                Err(AccessDenied::CatalogAccess {
                    catalog: catalog.to_string(),
                })
            },
        )
    }

    pub fn filter_catalogs(
        &self,
        context: &SecurityContext,
        catalogs: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, AccessDenied> {
        let unchanged = catalogs.clone();
        self.isolate(
            "filter_catalogs",
            |inner| inner.filter_catalogs(context, catalogs),
            || Ok(unchanged),
        )
    }

    pub fn check_can_show_schemas(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "show_schemas",
            |inner| inner.check_can_show_schemas(context, catalog),
            || {
                Err(AccessDenied::ShowSchemas {
                    catalog: catalog.to_string(),
                })
            },
        )
    }

    // =========================================================================
    // Schema
    // =========================================================================

    pub fn check_can_create_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "create_schema",
            |inner| inner.check_can_create_schema(context, schema),
            || {
                Err(AccessDenied::CreateSchema {
                    schema: schema.schema.clone(),
                })
            },
        )
    }

    pub fn check_can_drop_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "drop_schema",
            |inner| inner.check_can_drop_schema(context, schema),
            || {
                Err(AccessDenied::DropSchema {
                    schema: schema.schema.clone(),
                })
            },
        )
    }

    pub fn check_can_rename_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
        new_schema: &str,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "rename_schema",
            |inner| inner.check_can_rename_schema(context, schema, new_schema),
            || {
                Err(AccessDenied::RenameSchema {
                    schema: schema.schema.clone(),
                    new_schema: new_schema.to_string(),
                })
            },
        )
    }

    pub fn filter_schemas(
        &self,
        context: &SecurityContext,
        catalog: &str,
        schemas: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, AccessDenied> {
        let unchanged = schemas.clone();
        self.isolate(
            "filter_schemas",
            |inner| inner.filter_schemas(context, catalog, schemas),
            || Ok(unchanged),
        )
    }

    pub fn check_can_show_tables(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "show_tables",
            |inner| inner.check_can_show_tables(context, schema),
            || {
                Err(AccessDenied::ShowTables {
                    schema: schema.to_string(),
                })
            },
        )
    }

    // =========================================================================
    // Table
    // =========================================================================

    pub fn check_can_show_create_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "show_create_table",
            |inner| inner.check_can_show_create_table(context, table),
            || {
                Err(AccessDenied::ShowCreateTable {
                    table: table.to_string(),
                })
            },
        )
    }

    pub fn check_can_create_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "create_table",
            |inner| inner.check_can_create_table(context, table),
            || {
                Err(AccessDenied::CreateTable {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_drop_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "drop_table",
            |inner| inner.check_can_drop_table(context, table),
            || {
                Err(AccessDenied::DropTable {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_rename_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        new_table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "rename_table",
            |inner| inner.check_can_rename_table(context, table, new_table),
            || {
                Err(AccessDenied::RenameTable {
                    table: table.table().to_string(),
                    new_table: new_table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_set_table_comment(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "comment_table",
            |inner| inner.check_can_set_table_comment(context, table),
            || {
                Err(AccessDenied::CommentTable {
                    table: table.to_string(),
                })
            },
        )
    }

    pub fn filter_tables(
        &self,
        context: &SecurityContext,
        catalog: &str,
        tables: BTreeSet<SchemaTableName>,
    ) -> Result<BTreeSet<SchemaTableName>, AccessDenied> {
        let unchanged = tables.clone();
        self.isolate(
            "filter_tables",
            |inner| inner.filter_tables(context, catalog, tables),
            || Ok(unchanged),
        )
    }

    pub fn check_can_insert_into_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "insert_table",
            |inner| inner.check_can_insert_into_table(context, table),
            || {
                Err(AccessDenied::InsertTable {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_delete_from_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "delete_table",
            |inner| inner.check_can_delete_from_table(context, table),
            || {
                Err(AccessDenied::DeleteTable {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_grant_table_privilege(
        &self,
        context: &SecurityContext,
        privilege: Privilege,
        table: &CatalogSchemaTableName,
        grantee: &GrantPrincipal,
        with_grant_option: bool,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "grant_table_privilege",
            |inner| {
                inner.check_can_grant_table_privilege(
                    context,
                    privilege,
                    table,
                    grantee,
                    with_grant_option,
                )
            },
            || {
                Err(AccessDenied::GrantTablePrivilege {
                    privilege: privilege.to_string(),
                    table: table.to_string(),
                })
            },
        )
    }

    pub fn check_can_revoke_table_privilege(
        &self,
        context: &SecurityContext,
        privilege: Privilege,
        table: &CatalogSchemaTableName,
        revokee: &GrantPrincipal,
        grant_option_for: bool,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "revoke_table_privilege",
            |inner| {
                inner.check_can_revoke_table_privilege(
                    context,
                    privilege,
                    table,
                    revokee,
                    grant_option_for,
                )
            },
            || {
                Err(AccessDenied::RevokeTablePrivilege {
                    privilege: privilege.to_string(),
                    table: table.to_string(),
                })
            },
        )
    }

    // =========================================================================
    // Column
    // =========================================================================

    pub fn check_can_show_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "show_columns",
            |inner| inner.check_can_show_columns(context, table),
            || {
                Err(AccessDenied::ShowColumns {
                    table: table.to_string(),
                })
            },
        )
    }

    pub fn filter_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: Vec<ColumnMetadata>,
    ) -> Result<Vec<ColumnMetadata>, AccessDenied> {
        let unchanged = columns.clone();
        self.isolate(
            "filter_columns",
            |inner| inner.filter_columns(context, table, columns),
            || Ok(unchanged),
        )
    }

    pub fn check_can_add_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "add_column",
            |inner| inner.check_can_add_column(context, table),
            || {
                Err(AccessDenied::AddColumn {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_drop_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "drop_column",
            |inner| inner.check_can_drop_column(context, table),
            || {
                Err(AccessDenied::DropColumn {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_rename_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "rename_column",
            |inner| inner.check_can_rename_column(context, table),
            || {
                Err(AccessDenied::RenameColumn {
                    table: table.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_select_from_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: &BTreeSet<String>,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "select_columns",
            |inner| inner.check_can_select_from_columns(context, table, columns),
            || {
                Err(AccessDenied::SelectColumns {
                    table: table.table().to_string(),
                    columns: columns.clone(),
                })
            },
        )
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn check_can_create_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "create_view",
            |inner| inner.check_can_create_view(context, view),
            || {
                Err(AccessDenied::CreateView {
                    view: view.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_drop_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "drop_view",
            |inner| inner.check_can_drop_view(context, view),
            || {
                Err(AccessDenied::DropView {
                    view: view.table().to_string(),
                })
            },
        )
    }

    pub fn check_can_rename_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
        new_view: &CatalogSchemaTableName,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "rename_view",
            |inner| inner.check_can_rename_view(context, view, new_view),
            || {
                Err(AccessDenied::RenameView {
                    view: view.to_string(),
                    new_view: new_view.to_string(),
                })
            },
        )
    }

    pub fn check_can_create_view_with_select_from_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: &BTreeSet<String>,
    ) -> Result<(), AccessDenied> {
        self.isolate(
            "create_view_with_select",
            |inner| inner.check_can_create_view_with_select_from_columns(context, table, columns),
            || {
                Err(AccessDenied::CreateViewWithSelect {
                    view: table.table().to_string(),
                    user: context.user().to_string(),
                })
            },
        )
    }

    // =========================================================================
    // Row filtering and column masking
    // =========================================================================

    pub fn get_row_filter(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<ViewExpression, AccessDenied> {
        self.isolate(
            "row_filter",
            |inner| inner.get_row_filter(context, table),
            || {
                Err(AccessDenied::RowFilter {
                    table: table.to_string(),
                })
            },
        )
    }

    pub fn get_column_mask(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        column: &str,
        column_type: &SqlType,
    ) -> Result<ViewExpression, AccessDenied> {
        self.isolate(
            "column_mask",
            |inner| inner.get_column_mask(context, table, column, column_type),
            || {
                Err(AccessDenied::ColumnMask {
                    table: table.to_string(),
                    column: column.to_string(),
                })
            },
        )
    }
}

impl std::fmt::Debug for IsolatedAccessControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolatedAccessControl")
            .field("implementation", &self.scope)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
