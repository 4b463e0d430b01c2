use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::HrResult;
use crate::hierarchy::HierarchyResolver;
use crate::model::{Compensation, Employee, ReportingStructure};
use crate::store::EmployeeStore;

/// Business operations over an [`EmployeeStore`].
///
/// Every write awaits its commit before returning. Not-found comes back as
/// `Ok(None)`; store failures are passed through untouched.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// `None` for an empty id, without touching the store.
    #[instrument(name = "hr.service.get_by_id", skip(self), fields(employee_id = %id))]
    pub async fn get_by_id(&self, id: &str) -> HrResult<Option<Employee>> {
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self.store.get(id).await?)
    }

    #[instrument(
        name = "hr.service.create",
        skip(self, employee),
        fields(display_name = %employee.display_name())
    )]
    pub async fn create(&self, employee: Employee) -> HrResult<Employee> {
        let employee = self.store.add(employee);
        self.store.commit().await?;
        info!(employee_id = %employee.employee_id, "employee created");
        Ok(employee)
    }

    /// Replace `original` with `replacement`, keeping the original id.
    ///
    /// The removal is committed before the replacement is staged, so a
    /// failure in the second commit leaves the original deleted and the
    /// replacement absent. Nothing is rolled back. The replacement keeps its
    /// own `direct_reports`; nothing is copied from `original`.
    /// `replacement == None` deletes `original`.
    #[instrument(
        name = "hr.service.replace",
        skip_all,
        fields(employee_id = original.as_ref().map(|e| e.employee_id.as_str()))
    )]
    pub async fn replace(
        &self,
        original: Option<Employee>,
        replacement: Option<Employee>,
    ) -> HrResult<Option<Employee>> {
        let Some(original) = original else {
            debug!("no original employee, nothing to replace");
            return Ok(replacement);
        };

        let original = self.store.remove(original);
        let replacement = match replacement {
            Some(mut replacement) => {
                // The store rejects a second record under the same id until
                // the removal is durable.
                self.store.commit().await?;
                replacement.employee_id = original.employee_id.clone();
                Some(self.store.attach(replacement))
            }
            None => None,
        };
        self.store.commit().await?;

        info!(
            employee_id = %original.employee_id,
            replaced = replacement.is_some(),
            "employee replaced"
        );
        Ok(replacement)
    }

    #[instrument(name = "hr.service.reporting_structure", skip(self), fields(employee_id = %id))]
    pub async fn get_reporting_structure_by_id(
        &self,
        id: &str,
    ) -> HrResult<Option<ReportingStructure>> {
        let Some(employee) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let number_of_reports = HierarchyResolver::new(self.store.as_ref())
            .count_all_reports(id)
            .await?;
        Ok(Some(ReportingStructure {
            employee: employee.display_name(),
            number_of_reports,
        }))
    }

    #[instrument(name = "hr.service.get_compensation", skip(self), fields(employee_id = %id))]
    pub async fn get_compensation_by_id(&self, id: &str) -> HrResult<Option<Compensation>> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(None);
        }
        Ok(self.store.find_compensation_by_employee_id(id).await?)
    }

    /// Store `compensation` for employee `id`.
    ///
    /// `None` when the employee does not exist or when
    /// `compensation.employee` is not exactly its display name.
    #[instrument(
        name = "hr.service.create_compensation",
        skip(self, compensation),
        fields(employee_id = %id, salary = compensation.salary)
    )]
    pub async fn create_compensation(
        &self,
        id: &str,
        compensation: Compensation,
    ) -> HrResult<Option<Compensation>> {
        let Some(employee) = self.get_by_id(id).await? else {
            debug!("employee not found");
            return Ok(None);
        };
        if !compensation.belongs_to(&employee) {
            warn!(
                expected = %employee.display_name(),
                actual = %compensation.employee,
                "compensation name does not match employee"
            );
            return Ok(None);
        }

        let compensation = self.store.add_compensation(compensation);
        self.store.commit().await?;
        info!("compensation created");
        Ok(Some(compensation))
    }
}
