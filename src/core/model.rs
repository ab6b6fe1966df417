/// Record types returned by the query library.
///
/// Plain rows (`Department`, `Role`, `Employee`) mirror the tables one to
/// one. Listing rows (`RoleListing`, `EmployeeListing`) carry the joined,
/// human-readable parent columns so nothing above the query layer has to
/// join.
use crate::results_grid::Tabular;

/// Placeholder shown for SQL NULL in rendered tables.
pub const NULL_DISPLAY: &str = "NULL";

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: i64,
    pub title: String,
    pub salary: f64,
    pub department_id: i64,
}

/// Input for `Queries::insert_role`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    pub title: String,
    pub salary: f64,
    pub department_id: i64,
}

/// A role joined to its department's name.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleListing {
    pub id: i64,
    pub title: String,
    pub salary: f64,
    pub department_id: i64,
    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Option<i64>,
    pub manager_id: Option<i64>,
}

/// Input for `Queries::insert_employee`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: Option<i64>,
    pub manager_id: Option<i64>,
}

/// An employee joined to role, department and manager.
///
/// Every joined column is optional: an employee may have no role (and so no
/// department or salary) and no manager.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeListing {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Option<i64>,
    pub title: Option<String>,
    pub salary: Option<f64>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub manager_id: Option<i64>,
    pub manager_name: Option<String>,
}

impl EmployeeListing {
    /// "First Last", the label used in selection lists and headings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Formats a salary or budget amount for display.
///
/// Whole amounts print without a fractional part (`50000`, not `50000.0`).
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

fn or_null(value: Option<String>) -> String {
    value.unwrap_or_else(|| NULL_DISPLAY.to_string())
}

impl Tabular for Department {
    fn cell(&self, field: &str) -> String {
        match field {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            _ => String::new(),
        }
    }
}

impl Tabular for RoleListing {
    fn cell(&self, field: &str) -> String {
        match field {
            "id" => self.id.to_string(),
            "title" => self.title.clone(),
            "salary" => format_amount(self.salary),
            "department_id" => self.department_id.to_string(),
            "department_name" => self.department_name.clone(),
            _ => String::new(),
        }
    }
}

impl Tabular for EmployeeListing {
    fn cell(&self, field: &str) -> String {
        match field {
            "id" => self.id.to_string(),
            "first_name" => self.first_name.clone(),
            "last_name" => self.last_name.clone(),
            "role_id" => or_null(self.role_id.map(|id| id.to_string())),
            "title" => or_null(self.title.clone()),
            "salary" => or_null(self.salary.map(format_amount)),
            "department_id" => or_null(self.department_id.map(|id| id.to_string())),
            "department_name" => or_null(self.department_name.clone()),
            "manager_id" => or_null(self.manager_id.map(|id| id.to_string())),
            "manager_name" => or_null(self.manager_name.clone()),
            _ => String::new(),
        }
    }
}
