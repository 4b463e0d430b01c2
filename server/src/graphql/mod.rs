mod employee;

use std::sync::Arc;

use anyhow::anyhow;
use async_graphql::{
    Context, EmptySubscription, Error, ErrorExtensions, ID, Object, Schema, SchemaBuilder,
    SimpleObject,
};
use platform_api::{ApiError, internal_error};
use platform_db::DbPool;
use products_hr::{EmployeeService, HrError, SeaOrmEmployeeStore, StoreError};
use serde::Serialize;
use tracing::instrument;

pub use employee::{
    CompensationInput, CompensationNode, EmployeeInput, EmployeeNode, ReportingStructurePayload,
};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema_builder() -> SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
}

pub fn build_schema(pool: DbPool) -> SchemaType {
    schema_builder().data(pool).finish()
}

/// A service over a fresh store, so each request stages its own changes.
pub(crate) fn service(ctx: &Context<'_>) -> async_graphql::Result<EmployeeService> {
    let pool = ctx
        .data::<DbPool>()
        .map_err(|_| internal_error(anyhow!("missing database connection")))?;
    let store = SeaOrmEmployeeStore::new(pool.clone());
    Ok(EmployeeService::new(Arc::new(store)))
}

pub(crate) fn hr_error(err: HrError) -> Error {
    let api = match err {
        HrError::Store(StoreError::Conflict { key }) => {
            ApiError::Conflict(format!("record '{key}' already exists"))
        }
        HrError::Store(StoreError::Missing { .. }) => ApiError::NotFound,
        err @ HrError::CyclicReports { .. } => ApiError::InvalidInput(err.to_string()),
        other => ApiError::internal(other.into()),
    };
    api.extend()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> async_graphql::Result<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> async_graphql::Result<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let found = service(ctx)?.get_by_id(&id).await.map_err(hr_error)?;
        Ok(found.map(EmployeeNode::from))
    }

    #[instrument(name = "graphql.reporting_structure", skip(self, ctx))]
    async fn reporting_structure(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<ReportingStructurePayload>> {
        let found = service(ctx)?
            .get_reporting_structure_by_id(&id)
            .await
            .map_err(hr_error)?;
        Ok(found.map(Into::into))
    }

    #[instrument(name = "graphql.compensation", skip(self, ctx))]
    async fn compensation(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<CompensationNode>> {
        let found = service(ctx)?
            .get_compensation_by_id(&id)
            .await
            .map_err(hr_error)?;
        Ok(found.map(Into::into))
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.create_employee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let created = service(ctx)?
            .create(input.into())
            .await
            .map_err(hr_error)?;
        Ok(created.into())
    }

    /// `null` when no employee has this id.
    #[instrument(name = "graphql.replace_employee", skip(self, ctx, input))]
    async fn replace_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeInput,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let service = service(ctx)?;
        let Some(original) = service.get_by_id(&id).await.map_err(hr_error)? else {
            return Ok(None);
        };
        let replaced = service
            .replace(Some(original), Some(input.into()))
            .await
            .map_err(hr_error)?;
        Ok(replaced.map(EmployeeNode::from))
    }

    /// `null` when the employee is unknown or `input.employee` is not its
    /// display name.
    #[instrument(name = "graphql.create_compensation", skip(self, ctx, input))]
    async fn create_compensation(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
        input: CompensationInput,
    ) -> async_graphql::Result<Option<CompensationNode>> {
        let created = service(ctx)?
            .create_compensation(&employee_id, input.into())
            .await
            .map_err(hr_error)?;
        Ok(created.map(Into::into))
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}
