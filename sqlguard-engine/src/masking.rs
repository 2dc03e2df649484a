//! Row-filter and column-mask retrieval.
//!
//! Both operations ask the evaluator for a decision on a SELECT request and
//! turn it into a `ViewExpression` the host engine splices into the query.

use tracing::debug;

use crate::error::EngineError;
use crate::identity::IdentityResolver;
use crate::resource::Resource;
use crate::types::{
    AccessType, CatalogSchemaTableName, MaskDescriptor, MaskKind, PolicyEvaluator,
    SecurityContext, SqlType, ViewExpression,
};

const NULL_EXPRESSION: &str = "NULL";
const COLUMN_PLACEHOLDER: &str = "{col}";
const TYPE_PLACEHOLDER: &str = "{type}";

pub struct MaskingEngine<'a, E: PolicyEvaluator + ?Sized> {
    evaluator: &'a E,
    identities: &'a IdentityResolver,
}

impl<'a, E: PolicyEvaluator + ?Sized> MaskingEngine<'a, E> {
    pub fn new(evaluator: &'a E, identities: &'a IdentityResolver) -> Self {
        Self {
            evaluator,
            identities,
        }
    }

    /// Row filter for `table`.
    ///
    /// A disabled, missing or empty predicate produces an expression-less
    /// `ViewExpression`.
    pub fn row_filter(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
    ) -> Result<ViewExpression, EngineError> {
        let request = self
            .identities
            .request(Resource::from(table), context, AccessType::Select)?;

        debug!(request = %request, "evaluating row filter policies");
        let decision = self.evaluator.evaluate_row_filter_policies(&request)?;
        debug!(request = %request, decision = ?decision, "row filter policies evaluated");

        let expression = decision
            .filter(|d| d.enabled)
            .and_then(|d| d.predicate)
            .filter(|predicate| !predicate.is_empty());

        Ok(view_expression(context, table, expression))
    }

    /// Column mask for `column` of `table`.
    pub fn column_mask(
        &self,
        context: &SecurityContext,
        table: &CatalogSchemaTableName,
        column: &str,
        column_type: &SqlType,
    ) -> Result<ViewExpression, EngineError> {
        let resource = Resource::column(
            table.catalog(),
            table.schema(),
            table.table(),
            Some(column.to_string()),
        );
        let request = self
            .identities
            .request(resource, context, AccessType::Select)?;

        debug!(request = %request, "evaluating data mask policies");
        let decision = self.evaluator.evaluate_data_mask_policies(&request)?;
        debug!(request = %request, decision = ?decision, "data mask policies evaluated");

        let expression = decision
            .filter(|d| d.enabled)
            .and_then(|d| synthesize_transformer(&d, column, column_type));

        debug!(
            user = %context.user(),
            catalog = %table.catalog(),
            schema = %table.schema(),
            transformer = ?expression,
            "column mask"
        );

        Ok(view_expression(context, table, expression))
    }
}

/// Transformer text for a mask decision.
///
/// `MASK_NULL`, and `CUSTOM` without a literal value, become `NULL`; every
/// other mask substitutes `{col}` and `{type}` into the decision's template.
/// Returns `None` when there is no template to apply.
pub fn synthesize_transformer(
    mask: &MaskDescriptor,
    column: &str,
    column_type: &SqlType,
) -> Option<String> {
    let template = match &mask.kind {
        MaskKind::Null => NULL_EXPRESSION,
        MaskKind::Custom if mask.masked_value.is_none() => NULL_EXPRESSION,
        _ => mask.transformer.as_deref()?,
    };

    if template.is_empty() {
        return None;
    }

    Some(
        template
            .replace(COLUMN_PLACEHOLDER, column)
            .replace(TYPE_PLACEHOLDER, column_type.base_name()),
    )
}

fn view_expression(
    context: &SecurityContext,
    table: &CatalogSchemaTableName,
    expression: Option<String>,
) -> ViewExpression {
    ViewExpression {
        identity: context.user().to_string(),
        catalog: table.catalog().to_string(),
        schema: table.schema().to_string(),
        expression,
    }
}
