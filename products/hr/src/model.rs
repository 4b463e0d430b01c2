use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Join key between an employee and its compensation.
///
/// First and last name separated by exactly one space. No trimming or case
/// folding: matching is exact.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Assigned by the store; whatever the caller puts here on create is
    /// overwritten.
    #[serde(default)]
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub direct_reports: Vec<EmployeeRef>,
}

impl Employee {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_reports<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.direct_reports = ids.into_iter().map(EmployeeRef::new).collect();
        self
    }

    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

/// Weak reference to another employee by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub employee_id: String,
}

impl EmployeeRef {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    /// Display name of the employee this record belongs to.
    pub employee: String,
    pub salary: i32,
    pub effective_date: DateTime<Utc>,
}

impl Compensation {
    pub fn new(employee: impl Into<String>, salary: i32, effective_date: DateTime<Utc>) -> Self {
        Self {
            employee: employee.into(),
            salary,
            effective_date,
        }
    }

    pub fn belongs_to(&self, employee: &Employee) -> bool {
        self.employee == employee.display_name()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: String,
    pub number_of_reports: u32,
}
