//! Scripted policy evaluator shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sqlguard_engine::{
    AccessMediator, AccessRequest, CatalogSchemaTableName, EvaluatorError, FilterDescriptor,
    Identity, IdentityResolver, MaskDescriptor, PolicyEvaluator, SecurityContext,
};

type Verdict = Box<dyn Fn(&AccessRequest) -> Result<bool, EvaluatorError> + Send + Sync>;

/// Evaluator whose answers are fixed up front and which records every
/// request it receives.
pub struct ScriptedEvaluator {
    verdict: Verdict,
    row_filter: Option<FilterDescriptor>,
    mask: Option<MaskDescriptor>,
    init_error: Option<EvaluatorError>,
    requests: Mutex<Vec<AccessRequest>>,
    inits: Mutex<Vec<(String, String)>>,
}

impl ScriptedEvaluator {
    pub fn with_verdict(
        verdict: impl Fn(&AccessRequest) -> Result<bool, EvaluatorError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            verdict: Box::new(verdict),
            row_filter: None,
            mask: None,
            init_error: None,
            requests: Mutex::new(Vec::new()),
            inits: Mutex::new(Vec::new()),
        }
    }

    pub fn allow_all() -> Self {
        Self::with_verdict(|_| Ok(true))
    }

    pub fn deny_all() -> Self {
        Self::with_verdict(|_| Ok(false))
    }

    pub fn unavailable() -> Self {
        Self::with_verdict(|_| Err(EvaluatorError::Unavailable("policy store offline".into())))
    }

    pub fn with_row_filter(mut self, filter: FilterDescriptor) -> Self {
        self.row_filter = Some(filter);
        self
    }

    pub fn with_mask(mut self, mask: MaskDescriptor) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_init_error(mut self, error: EvaluatorError) -> Self {
        self.init_error = Some(error);
        self
    }

    pub fn requests(&self) -> Vec<AccessRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn inits(&self) -> Vec<(String, String)> {
        self.inits.lock().unwrap().clone()
    }

    fn record(&self, request: &AccessRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

impl PolicyEvaluator for ScriptedEvaluator {
    fn init(&self, service_type: &str, app_id: &str) -> Result<(), EvaluatorError> {
        self.inits
            .lock()
            .unwrap()
            .push((service_type.to_string(), app_id.to_string()));
        match &self.init_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn is_allowed(&self, request: &AccessRequest) -> Result<bool, EvaluatorError> {
        self.record(request);
        (self.verdict)(request)
    }

    fn evaluate_row_filter_policies(
        &self,
        request: &AccessRequest,
    ) -> Result<Option<FilterDescriptor>, EvaluatorError> {
        self.record(request);
        (self.verdict)(request)?;
        Ok(self.row_filter.clone())
    }

    fn evaluate_data_mask_policies(
        &self,
        request: &AccessRequest,
    ) -> Result<Option<MaskDescriptor>, EvaluatorError> {
        self.record(request);
        (self.verdict)(request)?;
        Ok(self.mask.clone())
    }
}

pub fn build_mediator(
    evaluator: ScriptedEvaluator,
) -> (AccessMediator<ScriptedEvaluator>, Arc<ScriptedEvaluator>) {
    let evaluator = Arc::new(evaluator);
    let mediator = AccessMediator::new(evaluator.clone(), IdentityResolver::Direct);
    (mediator, evaluator)
}

pub fn alice() -> SecurityContext {
    SecurityContext::new(Identity::with_groups("alice", ["analysts"])).with_query_id("q-1")
}

pub fn clicks() -> CatalogSchemaTableName {
    CatalogSchemaTableName::new("hive", "web", "clicks")
}
