//! # Request Dispatcher
//!
//! Resolves the model, checks its permission record, and maps the verb
//! onto store operations.

use std::sync::Arc;

use crate::permission::{HttpVerb, PermissionRegistry};
use crate::store::{Domain, ModelStore, Record, StoreError};

use super::errors::{RestError, RestResult};
use super::filter::{build_domain, check_conditions, mismatch};
use super::request::{parse_record_id, BodyPayload, GatewayRequest};

/// Fields returned for a deleted record
const DELETE_SNAPSHOT_FIELDS: [&str; 2] = ["id", "display_name"];

/// Store refusals are reported to the client as unusable request data.
fn rejected(err: StoreError) -> RestError {
    RestError::InvalidJson(err.to_string())
}

/// Outcome of a guarded write or unlink
fn guarded(err: StoreError) -> RestError {
    match err {
        StoreError::RecordNotFound { .. } => RestError::NotFound,
        StoreError::GuardFailed {
            field,
            expected,
            found,
            ..
        } => mismatch(&field, &expected, &found),
        other => rejected(other),
    }
}

pub struct GatewayHandler<S: ModelStore> {
    store: Arc<S>,
    permissions: Arc<PermissionRegistry>,
}

impl<S: ModelStore> GatewayHandler<S> {
    pub fn new(store: Arc<S>, permissions: Arc<PermissionRegistry>) -> Self {
        Self { store, permissions }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run a request to completion
    pub fn dispatch(&self, request: &GatewayRequest) -> RestResult<Vec<Record>> {
        let model = self.resolve_model(request.model.as_deref())?;
        let record_id = parse_record_id(request.record_id.as_deref())?;

        self.permissions.check(model, request.verb)?;

        match request.verb {
            HttpVerb::Get => self.handle_get(model, record_id, &request.body),
            HttpVerb::Post => self.handle_post(model, &request.body),
            HttpVerb::Put => self.handle_put(model, record_id, &request.body),
            HttpVerb::Delete => self.handle_delete(model, record_id, &request.body),
        }
    }

    fn resolve_model<'a>(&self, model: Option<&'a str>) -> RestResult<&'a str> {
        match model.map(str::trim) {
            Some(name) if !name.is_empty() && self.store.has_model(name) => Ok(name),
            other => Err(RestError::UnknownModel(other.unwrap_or_default().to_string())),
        }
    }

    fn handle_get(
        &self,
        model: &str,
        record_id: Option<i64>,
        body: &BodyPayload,
    ) -> RestResult<Vec<Record>> {
        let body = body.lenient();
        let domain = build_domain(record_id, &body.conditions());

        let records = self
            .store
            .search_read(model, &domain, body.fields())
            .map_err(rejected)?;

        if records.is_empty() {
            return Err(RestError::InvalidJson(RestError::NotFound.to_string()));
        }
        Ok(records)
    }

    fn handle_post(&self, model: &str, body: &BodyPayload) -> RestResult<Vec<Record>> {
        let body = body.strict()?;
        let values = body.require_values()?;
        self.check_fields(model, body.fields())?;

        let id = self.store.create(model, values).map_err(rejected)?;

        self.store
            .search_read(model, &Domain::by_id(id), body.fields())
            .map_err(rejected)
    }

    fn handle_put(
        &self,
        model: &str,
        record_id: Option<i64>,
        body: &BodyPayload,
    ) -> RestResult<Vec<Record>> {
        let id = record_id.ok_or(RestError::MissingIdentifier)?;
        let conditions = body.lenient().conditions();
        let target = self.load_target(model, id)?;
        check_conditions(&target, &conditions)?;

        let body = body.strict()?;
        let values = body.require_values()?;
        self.check_fields(model, body.fields())?;

        // The record may have changed since it was loaded.
        let guard = build_domain(None, &conditions);
        self.store
            .write_if(model, id, &guard, values)
            .map_err(guarded)?;

        self.store
            .search_read(model, &Domain::by_id(id), body.fields())
            .map_err(rejected)
    }

    fn handle_delete(
        &self,
        model: &str,
        record_id: Option<i64>,
        body: &BodyPayload,
    ) -> RestResult<Vec<Record>> {
        let id = record_id.ok_or(RestError::MissingIdentifier)?;
        let guard = build_domain(None, &body.lenient().conditions());

        let snapshot_fields: Vec<String> =
            DELETE_SNAPSHOT_FIELDS.iter().map(|f| f.to_string()).collect();
        let snapshot = self
            .store
            .unlink_if(model, id, &guard, &snapshot_fields)
            .map_err(guarded)?;
        Ok(vec![snapshot])
    }

    fn load_target(&self, model: &str, id: i64) -> RestResult<Record> {
        self.store
            .browse(model, id)
            .map_err(|e| RestError::Internal(e.to_string()))?
            .ok_or(RestError::NotFound)
    }

    /// Reject unknown names in `fields` before anything is written.
    ///
    /// Ids start at 1, so the search matches nothing and only the field
    /// names are checked.
    fn check_fields(&self, model: &str, fields: Option<&[String]>) -> RestResult<()> {
        if fields.is_some() {
            self.store
                .search_read(model, &Domain::by_id(0), fields)
                .map_err(rejected)?;
        }
        Ok(())
    }
}
