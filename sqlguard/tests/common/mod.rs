//! Shared fixtures for boundary tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use sqlguard::context;
use sqlguard::{
    AccessControlConfig, AccessDenied, CatalogSchemaName, CatalogSchemaTableName, ColumnMetadata,
    EngineError, EvaluatorError, GrantPrincipal, Identity, ImplementationRegistry,
    IsolatedAccessControl, Privilege, SchemaTableName, SecurityContext, SqlType,
    SystemAccessControl, ViewExpression,
};

pub const SCRIPTED: &str = "scripted";

/// How the scripted control answers every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Allow,
    Deny,
    Fail,
    Panic,
}

/// The denial returned in `Behavior::Deny`, whatever the operation.
pub fn scripted_denial() -> AccessDenied {
    AccessDenied::CatalogAccess {
        catalog: "scripted".to_string(),
    }
}

/// Confined context names observed by the scripted control, one per call.
pub type Seen = Arc<Mutex<Vec<Option<String>>>>;

/// Implementation that records the active confined context and then answers
/// according to its behavior.
pub struct ScriptedControl {
    behavior: Behavior,
    seen: Seen,
}

impl ScriptedControl {
    pub fn new(behavior: Behavior, seen: &Seen) -> Self {
        Self {
            behavior,
            seen: Arc::clone(seen),
        }
    }

    fn respond<T>(&self, value: T) -> Result<T, EngineError> {
        let active = context::current().map(|name| name.to_string());
        self.seen.lock().unwrap().push(active);
        match self.behavior {
            Behavior::Allow => Ok(value),
            Behavior::Deny => Err(scripted_denial().into()),
            Behavior::Fail => Err(EvaluatorError::Unavailable("policy store offline".into()).into()),
            Behavior::Panic => panic!("scripted control panicked"),
        }
    }

    fn view(context: &SecurityContext, table: &CatalogSchemaTableName) -> ViewExpression {
        ViewExpression {
            identity: context.user().to_string(),
            catalog: table.catalog().to_string(),
            schema: table.schema().to_string(),
            expression: Some("true".to_string()),
        }
    }
}

impl SystemAccessControl for ScriptedControl {
    fn check_can_set_user(&self, _principal: Option<&str>, _user: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_impersonate_user(&self, _: &SecurityContext, _: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_set_system_session_property(
        &self,
        _: &SecurityContext,
        _: &str,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_execute_query(&self, _: &SecurityContext) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_view_query_owned_by(&self, _: &SecurityContext, _: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn filter_view_query_owned_by(
        &self,
        _: &SecurityContext,
        owners: BTreeSet<String>,
    ) -> Result<Option<BTreeSet<String>>, EngineError> {
        self.respond(Some(owners))
    }

    fn check_can_kill_query_owned_by(&self, _: &SecurityContext, _: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_set_catalog_session_property(
        &self,
        _: &SecurityContext,
        _: &str,
        _: &str,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_show_roles(&self, _: &SecurityContext, _: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_access_catalog(&self, _: &SecurityContext, _: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn filter_catalogs(
        &self,
        _: &SecurityContext,
        catalogs: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, EngineError> {
        self.respond(catalogs)
    }

    fn check_can_show_schemas(&self, _: &SecurityContext, _: &str) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_create_schema(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_drop_schema(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_rename_schema(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaName,
        _: &str,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn filter_schemas(
        &self,
        _: &SecurityContext,
        _: &str,
        schemas: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, EngineError> {
        self.respond(schemas)
    }

    fn check_can_show_tables(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_show_create_table(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_create_table(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_drop_table(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_rename_table(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_set_table_comment(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn filter_tables(
        &self,
        _: &SecurityContext,
        _: &str,
        tables: BTreeSet<SchemaTableName>,
    ) -> Result<BTreeSet<SchemaTableName>, EngineError> {
        self.respond(tables)
    }

    fn check_can_insert_into_table(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_delete_from_table(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_grant_table_privilege(
        &self,
        _: &SecurityContext,
        _: Privilege,
        _: &CatalogSchemaTableName,
        _: &GrantPrincipal,
        _: bool,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_revoke_table_privilege(
        &self,
        _: &SecurityContext,
        _: Privilege,
        _: &CatalogSchemaTableName,
        _: &GrantPrincipal,
        _: bool,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_show_columns(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn filter_columns(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
        columns: Vec<ColumnMetadata>,
    ) -> Result<Vec<ColumnMetadata>, EngineError> {
        self.respond(columns)
    }

    fn check_can_add_column(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_drop_column(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_rename_column(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_select_from_columns(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
        _: &BTreeSet<String>,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_create_view(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_drop_view(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_rename_view(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
        _: &CatalogSchemaTableName,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn check_can_create_view_with_select_from_columns(
        &self,
        _: &SecurityContext,
        _: &CatalogSchemaTableName,
        _: &BTreeSet<String>,
    ) -> Result<(), EngineError> {
        self.respond(())
    }

    fn get_row_filter(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<ViewExpression, EngineError> {
        self.respond(Self::view(context, table))
    }

    fn get_column_mask(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        _: &str,
        _: &SqlType,
    ) -> Result<ViewExpression, EngineError> {
        self.respond(Self::view(context, table))
    }
}

/// Registry with a single scripted control registered as `SCRIPTED`.
pub fn scripted_registry(behavior: Behavior, seen: &Seen) -> ImplementationRegistry {
    let seen = Arc::clone(seen);
    let mut registry = ImplementationRegistry::new();
    registry.register(SCRIPTED, move |_config| {
        Ok(Box::new(ScriptedControl::new(behavior, &seen)) as Box<dyn SystemAccessControl>)
    });
    registry
}

pub fn scripted_config() -> AccessControlConfig {
    AccessControlConfig {
        implementation: SCRIPTED.to_string(),
        ..AccessControlConfig::default()
    }
}

/// Boundary around a scripted control, plus the contexts the scripted control observes.
pub fn isolated_scripted(behavior: Behavior) -> (IsolatedAccessControl, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let registry = scripted_registry(behavior, &seen);
    let control = IsolatedAccessControl::new(&scripted_config(), &registry).unwrap();
    (control, seen)
}

pub fn alice() -> SecurityContext {
    SecurityContext::new(Identity::with_groups("alice", ["analysts"])).with_query_id("q-1")
}

pub fn clicks() -> CatalogSchemaTableName {
    CatalogSchemaTableName::new("hive", "web", "clicks")
}

pub fn web() -> CatalogSchemaName {
    CatalogSchemaName::new("hive", "web")
}
