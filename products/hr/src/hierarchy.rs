//! Transitive report counting.
//!
//! The walk re-fetches every employee from the store by id, so the result
//! always reflects committed state. Nothing is memoized: an employee reachable
//! through two managers is counted twice, which only matters for non-tree
//! shapes. Cycles are detected against the current descent path and reported
//! as [`HrError::CyclicReports`].

use std::future::Future;
use std::pin::Pin;

use tracing::trace;

use crate::error::{HrError, HrResult};
use crate::store::EmployeeStore;

type CountFuture<'a> = Pin<Box<dyn Future<Output = HrResult<u32>> + Send + 'a>>;

pub struct HierarchyResolver<'a> {
    store: &'a dyn EmployeeStore,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(store: &'a dyn EmployeeStore) -> Self {
        Self { store }
    }

    /// Number of employees below `id`, direct and transitive.
    ///
    /// `id` must resolve; callers check existence first.
    pub async fn count_all_reports(&self, id: &str) -> HrResult<u32> {
        let mut path = Vec::new();
        count_below(self.store, id.to_owned(), &mut path).await
    }
}

fn count_below<'a>(
    store: &'a dyn EmployeeStore,
    id: String,
    path: &'a mut Vec<String>,
) -> CountFuture<'a> {
    Box::pin(async move {
        if path.contains(&id) {
            return Err(HrError::CyclicReports { employee_id: id });
        }
        let employee = store
            .get(&id)
            .await?
            .ok_or_else(|| HrError::MissingEmployee {
                employee_id: id.clone(),
            })?;
        if employee.direct_reports.is_empty() {
            return Ok(0);
        }

        path.push(id);
        let direct = u32::try_from(employee.direct_reports.len()).map_err(|_| {
            HrError::ReportCountOverflow {
                employee_id: employee.employee_id.clone(),
            }
        })?;
        let mut total = direct;
        for report in &employee.direct_reports {
            let below = count_below(store, report.employee_id.clone(), path).await?;
            total = add_reports(total, below, &employee.employee_id)?;
        }
        path.pop();
        trace!(employee_id = %employee.employee_id, direct, total, "counted reports");
        Ok(total)
    })
}

/// Shared reports are counted once per path, so totals can outgrow `u32`.
fn add_reports(total: u32, more: u32, employee_id: &str) -> HrResult<u32> {
    total
        .checked_add(more)
        .ok_or_else(|| HrError::ReportCountOverflow {
            employee_id: employee_id.to_owned(),
        })
}
