use async_graphql::{ComplexObject, Context, ID, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use products_hr::{Compensation, Employee, ReportingStructure};

use crate::graphql::{hr_error, service};

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee", complex)]
pub struct EmployeeNode {
    pub employee_id: ID,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub direct_report_ids: Vec<ID>,
}

#[ComplexObject]
impl EmployeeNode {
    async fn display_name(&self) -> String {
        products_hr::display_name(&self.first_name, &self.last_name)
    }

    /// Direct reports resolved one level down.
    async fn direct_reports(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EmployeeNode>> {
        let service = service(ctx)?;
        let mut reports = Vec::with_capacity(self.direct_report_ids.len());
        for id in &self.direct_report_ids {
            if let Some(report) = service.get_by_id(id.as_str()).await.map_err(hr_error)? {
                reports.push(EmployeeNode::from(report));
            }
        }
        Ok(reports)
    }
}

impl From<Employee> for EmployeeNode {
    fn from(employee: Employee) -> Self {
        Self {
            employee_id: ID(employee.employee_id),
            first_name: employee.first_name,
            last_name: employee.last_name,
            position: employee.position,
            department: employee.department,
            direct_report_ids: employee
                .direct_reports
                .into_iter()
                .map(|r| ID(r.employee_id))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    #[graphql(default)]
    pub direct_reports: Vec<ID>,
}

impl From<EmployeeInput> for Employee {
    fn from(input: EmployeeInput) -> Self {
        let mut employee = Employee::new(input.first_name, input.last_name)
            .with_reports(input.direct_reports.into_iter().map(|id| id.0));
        employee.position = input.position;
        employee.department = input.department;
        employee
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ReportingStructure")]
pub struct ReportingStructurePayload {
    pub employee: String,
    pub number_of_reports: u32,
}

impl From<ReportingStructure> for ReportingStructurePayload {
    fn from(value: ReportingStructure) -> Self {
        Self {
            employee: value.employee,
            number_of_reports: value.number_of_reports,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Compensation")]
pub struct CompensationNode {
    pub employee: String,
    pub salary: i32,
    pub effective_date: DateTime<Utc>,
}

impl From<Compensation> for CompensationNode {
    fn from(value: Compensation) -> Self {
        Self {
            employee: value.employee,
            salary: value.salary,
            effective_date: value.effective_date,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct CompensationInput {
    /// Must equal the employee's "First Last" name exactly.
    pub employee: String,
    pub salary: i32,
    pub effective_date: DateTime<Utc>,
}

impl From<CompensationInput> for Compensation {
    fn from(input: CompensationInput) -> Self {
        Compensation::new(input.employee, input.salary, input.effective_date)
    }
}
