//! The access mediator: maps engine operations onto evaluator requests.
//!
//! Every check builds a resource at the finest scope that does not require
//! ownership metadata (which the host never supplies), asks the evaluator,
//! and turns a negative answer into the operation's `AccessDenied`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{PluginConfig, SecurityBootstrap, APP_ID, SERVICE_TYPE};
use crate::error::{AccessDenied, BootstrapError, EngineError};
use crate::identity::{GroupResolver, IdentityResolver};
use crate::masking::MaskingEngine;
use crate::resource::Resource;
use crate::types::{
    AccessType, CatalogSchemaName, CatalogSchemaTableName, ColumnMetadata, GrantPrincipal,
    PolicyEvaluator, Privilege, SchemaTableName, SecurityContext, SqlType, ViewExpression,
};

/// Engine-facing access control contract.
///
/// One method per controllable engine action. Checks return `Ok(())` to
/// allow; a denial comes back as `EngineError::Denied`, and any other error
/// is an internal failure the caller must treat as a denial.
pub trait SystemAccessControl: Send + Sync {
    // =========================================================================
    // System
    // =========================================================================

    fn check_can_set_user(&self, principal: Option<&str>, user: &str) -> Result<(), EngineError>;

    fn check_can_impersonate_user(
        &self,
        context: &SecurityContext,
        user: &str,
    ) -> Result<(), EngineError>;

    fn check_can_set_system_session_property(
        &self,
        context: &SecurityContext,
        property: &str,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // Query
    // =========================================================================

    fn check_can_execute_query(&self, context: &SecurityContext) -> Result<(), EngineError>;

    fn check_can_view_query_owned_by(
        &self,
        context: &SecurityContext,
        owner: &str,
    ) -> Result<(), EngineError>;

    fn filter_view_query_owned_by(
        &self,
        context: &SecurityContext,
        owners: BTreeSet<String>,
    ) -> Result<Option<BTreeSet<String>>, EngineError>;

    fn check_can_kill_query_owned_by(
        &self,
        context: &SecurityContext,
        owner: &str,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // Catalog
    // =========================================================================

    fn check_can_set_catalog_session_property(
        &self,
        context: &SecurityContext,
        catalog: &str,
        property: &str,
    ) -> Result<(), EngineError>;

    fn check_can_show_roles(&self, context: &SecurityContext, catalog: &str)
        -> Result<(), EngineError>;

    fn check_can_access_catalog(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), EngineError>;

    fn filter_catalogs(
        &self,
        context: &SecurityContext,
        catalogs: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, EngineError>;

    fn check_can_show_schemas(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // Schema
    // =========================================================================

    fn check_can_create_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), EngineError>;

    fn check_can_drop_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), EngineError>;

    fn check_can_rename_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
        new_schema: &str,
    ) -> Result<(), EngineError>;

    fn filter_schemas(
        &self,
        context: &SecurityContext,
        catalog: &str,
        schemas: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, EngineError>;

    fn check_can_show_tables(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // Table
    // =========================================================================

    fn check_can_show_create_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_create_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_drop_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_rename_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        new_table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_set_table_comment(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn filter_tables(
        &self,
        context: &SecurityContext,
        catalog: &str,
        tables: BTreeSet<SchemaTableName>,
    ) -> Result<BTreeSet<SchemaTableName>, EngineError>;

    fn check_can_insert_into_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_delete_from_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_grant_table_privilege(
        &self,
        context: &SecurityContext,
        privilege: Privilege,
        table: &CatalogSchemaTableName,
        grantee: &GrantPrincipal,
        with_grant_option: bool,
    ) -> Result<(), EngineError>;

    fn check_can_revoke_table_privilege(
        &self,
        context: &SecurityContext,
        privilege: Privilege,
        table: &CatalogSchemaTableName,
        revokee: &GrantPrincipal,
        grant_option_for: bool,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // Column
    // =========================================================================

    fn check_can_show_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn filter_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: Vec<ColumnMetadata>,
    ) -> Result<Vec<ColumnMetadata>, EngineError>;

    fn check_can_add_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_drop_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_rename_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_select_from_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: &BTreeSet<String>,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // View
    // =========================================================================

    fn check_can_create_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_drop_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_rename_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
        new_view: &CatalogSchemaTableName,
    ) -> Result<(), EngineError>;

    fn check_can_create_view_with_select_from_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: &BTreeSet<String>,
    ) -> Result<(), EngineError>;

    // =========================================================================
    // Row filtering and column masking
    // =========================================================================

    fn get_row_filter(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<ViewExpression, EngineError>;

    fn get_column_mask(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        column: &str,
        column_type: &SqlType,
    ) -> Result<ViewExpression, EngineError>;
}

/// External collaborators the mediator is built from.
pub struct Collaborators<E: PolicyEvaluator> {
    pub evaluator: Arc<E>,
    pub groups: Option<Arc<dyn GroupResolver>>,
    pub bootstrap: Arc<dyn SecurityBootstrap>,
}

impl<E: PolicyEvaluator> Clone for Collaborators<E> {
    fn clone(&self) -> Self {
        Self {
            evaluator: Arc::clone(&self.evaluator),
            groups: self.groups.clone(),
            bootstrap: Arc::clone(&self.bootstrap),
        }
    }
}

/// `SystemAccessControl` backed by a `PolicyEvaluator`.
///
/// Holds no per-call state; every check builds its own request.
pub struct AccessMediator<E: PolicyEvaluator> {
    evaluator: Arc<E>,
    identities: IdentityResolver,
}

impl<E: PolicyEvaluator> AccessMediator<E> {
    /// Create a mediator around an already initialized evaluator.
    pub fn new(evaluator: Arc<E>, identities: IdentityResolver) -> Self {
        Self {
            evaluator,
            identities,
        }
    }

    /// Run the startup sequence and build the mediator.
    ///
    /// 1. Load the site configuration (a missing explicit path only warns)
    /// 2. Log in from the keytab when configured
    /// 3. Pick the identity resolution mode
    /// 4. Initialize the evaluator
    ///
    /// Any failure aborts startup.
    pub fn from_config(
        config: &HashMap<String, String>,
        collaborators: Collaborators<E>,
    ) -> Result<Self, BootstrapError> {
        let config = PluginConfig::from_map(config);
        let Collaborators {
            evaluator,
            groups,
            bootstrap,
        } = collaborators;

        let (site_config, explicit) = config.site_config_path();
        let found = bootstrap.load_site_config(site_config)?;
        if !found && explicit {
            warn!(path = %site_config, "site configuration not found");
        } else if !found {
            debug!(path = %site_config, "no default site configuration present");
        }

        if let Some((principal, keytab)) = config.keytab_login() {
            info!(principal = %principal, keytab = %keytab, "performing kerberos login");
            bootstrap.login_from_keytab(principal, keytab)?;
        }

        let identities = if config.use_group_lookup {
            let resolver = groups.ok_or(BootstrapError::MissingGroupResolver)?;
            IdentityResolver::GroupLookup(resolver)
        } else {
            IdentityResolver::Direct
        };

        evaluator.init(SERVICE_TYPE, APP_ID)?;
        info!(
            service_type = SERVICE_TYPE,
            group_lookup = config.use_group_lookup,
            "access mediator initialized"
        );

        Ok(Self::new(evaluator, identities))
    }

    /// Get a reference to the evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn masking(&self) -> MaskingEngine<'_, E> {
        MaskingEngine::new(self.evaluator.as_ref(), &self.identities)
    }

    /// Ask the evaluator whether the caller may perform `access_type` on
    /// `resource`.
    pub fn has_permission(
        &self,
        resource: Resource,
        context: &SecurityContext,
        access_type: AccessType,
    ) -> Result<bool, EngineError> {
        let request = self.identities.request(resource, context, access_type)?;
        let allowed = self.evaluator.is_allowed(&request)?;
        debug!(request = %request, allowed, "access evaluated");
        Ok(allowed)
    }

    /// Evaluate and turn a negative answer into `deny()`.
    fn check(
        &self,
        resource: Resource,
        context: &SecurityContext,
        access_type: AccessType,
        deny: impl FnOnce() -> AccessDenied,
    ) -> Result<(), EngineError> {
        if self.has_permission(resource, context, access_type)? {
            return Ok(());
        }

        let denied = deny();
        info!(
            operation = denied.kind(),
            user = %context.user(),
            access = %access_type,
            "{denied}"
        );
        Err(denied.into())
    }
}

impl<E: PolicyEvaluator> SystemAccessControl for AccessMediator<E> {
    fn check_can_set_user(&self, _principal: Option<&str>, _user: &str) -> Result<(), EngineError> {
        // Deprecated by the engine; always allowed.
        Ok(())
    }

    fn check_can_impersonate_user(
        &self,
        context: &SecurityContext,
        user: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::user(user),
            context,
            AccessType::Impersonate,
            || AccessDenied::ImpersonateUser {
                user: context.user().to_string(),
                target: user.to_string(),
            },
        )
    }

    fn check_can_set_system_session_property(
        &self,
        context: &SecurityContext,
        property: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::system_property(property),
            context,
            AccessType::Alter,
            || AccessDenied::SetSystemSessionProperty {
                property: property.to_string(),
            },
        )
    }

    fn check_can_execute_query(&self, _context: &SecurityContext) -> Result<(), EngineError> {
        Ok(())
    }

    fn check_can_view_query_owned_by(
        &self,
        context: &SecurityContext,
        owner: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::user(owner),
            context,
            AccessType::Impersonate,
            || AccessDenied::ViewQuery {
                user: context.user().to_string(),
                owner: owner.to_string(),
            },
        )
    }

    fn filter_view_query_owned_by(
        &self,
        _context: &SecurityContext,
        _owners: BTreeSet<String>,
    ) -> Result<Option<BTreeSet<String>>, EngineError> {
        // Unlike the other filters this reports no result at all. Kept as is
        // until the host's expectation for this hook is confirmed.
        Ok(None)
    }

    fn check_can_kill_query_owned_by(
        &self,
        context: &SecurityContext,
        owner: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::user(owner),
            context,
            AccessType::Impersonate,
            || AccessDenied::KillQuery {
                user: context.user().to_string(),
                owner: owner.to_string(),
            },
        )
    }

    fn check_can_set_catalog_session_property(
        &self,
        context: &SecurityContext,
        catalog: &str,
        property: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::session_property(catalog, property),
            context,
            AccessType::Alter,
            || AccessDenied::SetCatalogSessionProperty {
                catalog: catalog.to_string(),
                property: property.to_string(),
            },
        )
    }

    fn check_can_show_roles(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::catalog(catalog),
            context,
            AccessType::Show,
            || AccessDenied::ShowRoles {
                catalog: catalog.to_string(),
            },
        )
    }

    fn check_can_access_catalog(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::catalog(catalog),
            context,
            AccessType::Use,
            || AccessDenied::CatalogAccess {
                catalog: catalog.to_string(),
            },
        )
    }

    fn filter_catalogs(
        &self,
        _context: &SecurityContext,
        catalogs: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, EngineError> {
        Ok(catalogs)
    }

    fn check_can_show_schemas(
        &self,
        context: &SecurityContext,
        catalog: &str,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::catalog(catalog),
            context,
            AccessType::Show,
            || AccessDenied::ShowSchemas {
                catalog: catalog.to_string(),
            },
        )
    }

    /// Evaluated on the catalog: CREATE on a catalog implies the right to
    /// create schemas in it.
    fn check_can_create_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::catalog(schema.catalog.as_str()),
            context,
            AccessType::Create,
            || AccessDenied::CreateSchema {
                schema: schema.schema.clone(),
            },
        )
    }

    fn check_can_drop_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(schema), context, AccessType::Drop, || {
            AccessDenied::DropSchema {
                schema: schema.schema.clone(),
            }
        })
    }

    fn check_can_rename_schema(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
        new_schema: &str,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(schema), context, AccessType::Alter, || {
            AccessDenied::RenameSchema {
                schema: schema.schema.clone(),
                new_schema: new_schema.to_string(),
            }
        })
    }

    fn filter_schemas(
        &self,
        _context: &SecurityContext,
        catalog: &str,
        schemas: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, EngineError> {
        debug!(catalog = %catalog, "filter_schemas");
        Ok(schemas)
    }

    fn check_can_show_tables(
        &self,
        context: &SecurityContext,
        schema: &CatalogSchemaName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(schema), context, AccessType::Show, || {
            AccessDenied::ShowTables {
                schema: schema.to_string(),
            }
        })
    }

    fn check_can_show_create_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Show, || {
            AccessDenied::ShowCreateTable {
                table: table.to_string(),
            }
        })
    }

    /// Evaluated on the schema the table is created in.
    fn check_can_create_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::schema(table.catalog(), table.schema()),
            context,
            AccessType::Create,
            || AccessDenied::CreateTable {
                table: table.table().to_string(),
            },
        )
    }

    fn check_can_drop_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Drop, || {
            AccessDenied::DropTable {
                table: table.table().to_string(),
            }
        })
    }

    fn check_can_rename_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        new_table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Alter, || {
            AccessDenied::RenameTable {
                table: table.table().to_string(),
                new_table: new_table.table().to_string(),
            }
        })
    }

    fn check_can_set_table_comment(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Alter, || {
            AccessDenied::CommentTable {
                table: table.to_string(),
            }
        })
    }

    fn filter_tables(
        &self,
        _context: &SecurityContext,
        catalog: &str,
        tables: BTreeSet<SchemaTableName>,
    ) -> Result<BTreeSet<SchemaTableName>, EngineError> {
        debug!(catalog = %catalog, "filter_tables");
        Ok(tables)
    }

    fn check_can_insert_into_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Insert, || {
            AccessDenied::InsertTable {
                table: table.table().to_string(),
            }
        })
    }

    fn check_can_delete_from_table(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Delete, || {
            AccessDenied::DeleteTable {
                table: table.table().to_string(),
            }
        })
    }

    fn check_can_grant_table_privilege(
        &self,
        context: &SecurityContext,
        privilege: Privilege,
        table: &CatalogSchemaTableName,
        _grantee: &GrantPrincipal,
        _with_grant_option: bool,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Grant, || {
            AccessDenied::GrantTablePrivilege {
                privilege: privilege.to_string(),
                table: table.to_string(),
            }
        })
    }

    fn check_can_revoke_table_privilege(
        &self,
        context: &SecurityContext,
        privilege: Privilege,
        table: &CatalogSchemaTableName,
        _revokee: &GrantPrincipal,
        _grant_option_for: bool,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Revoke, || {
            AccessDenied::RevokeTablePrivilege {
                privilege: privilege.to_string(),
                table: table.to_string(),
            }
        })
    }

    fn check_can_show_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Show, || {
            AccessDenied::ShowColumns {
                table: table.to_string(),
            }
        })
    }

    fn filter_columns(
        &self,
        _context: &SecurityContext,
        _table: &CatalogSchemaTableName,
        columns: Vec<ColumnMetadata>,
    ) -> Result<Vec<ColumnMetadata>, EngineError> {
        Ok(columns)
    }

    fn check_can_add_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Alter, || {
            AccessDenied::AddColumn {
                table: table.table().to_string(),
            }
        })
    }

    fn check_can_drop_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Drop, || {
            AccessDenied::DropColumn {
                table: table.table().to_string(),
            }
        })
    }

    fn check_can_rename_column(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(table), context, AccessType::Alter, || {
            AccessDenied::RenameColumn {
                table: table.table().to_string(),
            }
        })
    }

    /// Checked column by column; the first denied column aborts the call and
    /// the denial names the whole requested set.
    fn check_can_select_from_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        columns: &BTreeSet<String>,
    ) -> Result<(), EngineError> {
        for resource in Resource::columns(table, columns) {
            self.check(resource, context, AccessType::Select, || {
                AccessDenied::SelectColumns {
                    table: table.table().to_string(),
                    columns: columns.clone(),
                }
            })?;
        }
        Ok(())
    }

    /// Evaluated on the schema the view is created in.
    fn check_can_create_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(
            Resource::schema(view.catalog(), view.schema()),
            context,
            AccessType::Create,
            || AccessDenied::CreateView {
                view: view.table().to_string(),
            },
        )
    }

    fn check_can_drop_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(view), context, AccessType::Drop, || {
            AccessDenied::DropView {
                view: view.table().to_string(),
            }
        })
    }

    fn check_can_rename_view(
        &self,
        context: &SecurityContext,
        view: &CatalogSchemaTableName,
        new_view: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.check(Resource::from(view), context, AccessType::Alter, || {
            AccessDenied::RenameView {
                view: view.to_string(),
                new_view: new_view.to_string(),
            }
        })
    }

    /// Same scope and action as `check_can_create_view`, reported as its own
    /// denial. Evaluator failures are reported as that denial too.
    fn check_can_create_view_with_select_from_columns(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        _columns: &BTreeSet<String>,
    ) -> Result<(), EngineError> {
        let verdict = self.has_permission(
            Resource::schema(table.catalog(), table.schema()),
            context,
            AccessType::Create,
        );
        if matches!(verdict, Ok(true)) {
            return Ok(());
        }

        let denied = AccessDenied::CreateViewWithSelect {
            view: table.table().to_string(),
            user: context.user().to_string(),
        };
        match verdict {
            Err(err) => info!(operation = denied.kind(), cause = %err, "{denied}"),
            _ => info!(
                operation = denied.kind(),
                user = %context.user(),
                access = %AccessType::Create,
                "{denied}"
            ),
        }
        Err(denied.into())
    }

    fn get_row_filter(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<ViewExpression, EngineError> {
        self.masking().row_filter(context, table)
    }

    fn get_column_mask(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        column: &str,
        column_type: &SqlType,
    ) -> Result<ViewExpression, EngineError> {
        self.masking()
            .column_mask(context, table, column, column_type)
    }
}
