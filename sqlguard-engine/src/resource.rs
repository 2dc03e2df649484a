//! Hierarchical resource identifiers.
//!
//! A `Resource` is what the evaluator matches policies against. It can only
//! be built through the constructors below, so a schema never appears
//! without its catalog, a table never without its schema, and a column never
//! without its table. Entity scopes (catalog..column) are never mixed with
//! user or property scopes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CatalogSchemaName, CatalogSchemaTableName};

/// Scope key of a resource value, ordered from outermost to innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKey {
    Catalog,
    Schema,
    Table,
    Column,
    #[serde(rename = "prestouser")]
    User,
    SystemProperty,
    SessionProperty,
}

impl ResourceKey {
    /// Key name as the evaluator's service definition knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::Catalog => "catalog",
            ResourceKey::Schema => "schema",
            ResourceKey::Table => "table",
            ResourceKey::Column => "column",
            ResourceKey::User => "prestouser",
            ResourceKey::SystemProperty => "systemproperty",
            ResourceKey::SessionProperty => "sessionproperty",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    values: BTreeMap<ResourceKey, String>,
}

impl Resource {
    fn from_pairs<const N: usize>(pairs: [(ResourceKey, String); N]) -> Self {
        Self {
            values: BTreeMap::from(pairs),
        }
    }

    pub fn catalog(catalog: impl Into<String>) -> Self {
        Self::from_pairs([(ResourceKey::Catalog, catalog.into())])
    }

    pub fn schema(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self::from_pairs([
            (ResourceKey::Catalog, catalog.into()),
            (ResourceKey::Schema, schema.into()),
        ])
    }

    pub fn table(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self::from_pairs([
            (ResourceKey::Catalog, catalog.into()),
            (ResourceKey::Schema, schema.into()),
            (ResourceKey::Table, table.into()),
        ])
    }

    /// Column-scope resource; without a column name this is table scope.
    pub fn column(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        column: Option<String>,
    ) -> Self {
        let mut resource = Self::table(catalog, schema, table);
        if let Some(column) = column {
            resource.values.insert(ResourceKey::Column, column);
        }
        resource
    }

    pub fn user(user: impl Into<String>) -> Self {
        Self::from_pairs([(ResourceKey::User, user.into())])
    }

    pub fn system_property(property: impl Into<String>) -> Self {
        Self::from_pairs([(ResourceKey::SystemProperty, property.into())])
    }

    pub fn session_property(catalog: impl Into<String>, property: impl Into<String>) -> Self {
        Self::from_pairs([
            (ResourceKey::Catalog, catalog.into()),
            (ResourceKey::SessionProperty, property.into()),
        ])
    }

    /// Expand a column set into one resource per column.
    ///
    /// An empty set yields a single table-scope resource, which the evaluator
    /// treats as "any column of this table".
    pub fn columns(table: &CatalogSchemaTableName, columns: &BTreeSet<String>) -> Vec<Self> {
        if columns.is_empty() {
            return vec![Self::from(table)];
        }

        columns
            .iter()
            .map(|column| {
                Self::column(
                    table.catalog(),
                    table.schema(),
                    table.table(),
                    Some(column.clone()),
                )
            })
            .collect()
    }

    pub fn value(&self, key: ResourceKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ResourceKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Keys present, outermost first.
    pub fn keys(&self) -> impl Iterator<Item = ResourceKey> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&CatalogSchemaName> for Resource {
    fn from(name: &CatalogSchemaName) -> Self {
        Self::schema(name.catalog.as_str(), name.schema.as_str())
    }
}

impl From<&CatalogSchemaTableName> for Resource {
    fn from(name: &CatalogSchemaTableName) -> Self {
        Self::table(name.catalog(), name.schema(), name.table())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.values {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}
