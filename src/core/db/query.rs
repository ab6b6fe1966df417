/// Query Library Module
///
/// Every read and write the action flows issue. Values are always bound as
/// parameters; the only SQL assembled at runtime is the choice between
/// fixed `WHERE` clauses for the enriched employee listing.

use crate::core::model::{
    Department, Employee, EmployeeListing, NewEmployee, NewRole, Role, RoleListing,
};
use crate::core::{EmptrackError, Result};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use tracing::debug;

const ROLE_LISTING_SQL: &str = "
    SELECT role.id, role.title, role.salary, role.department_id, department.name
    FROM role
    JOIN department ON role.department_id = department.id
    ORDER BY role.id ASC";

const EMPLOYEE_LISTING_SELECT: &str = "
    SELECT employee.id, employee.first_name, employee.last_name,
           employee.role_id, role.title, role.salary,
           role.department_id, department.name,
           employee.manager_id, manager.first_name || ' ' || manager.last_name
    FROM employee
    LEFT JOIN role ON employee.role_id = role.id
    LEFT JOIN department ON role.department_id = department.id
    LEFT JOIN employee manager ON employee.manager_id = manager.id";

/// Query service that operates on a borrowed database connection
pub struct Queries<'a> {
    connection: &'a Connection,
}

impl<'a> Queries<'a> {
    /// Creates a new Queries for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        Queries { connection }
    }

    // ---- departments ----

    /// All departments ordered by id.
    pub fn all_departments(&self) -> Result<Vec<Department>> {
        debug!("Fetching all departments");
        let mut stmt = self
            .connection
            .prepare("SELECT id, name FROM department ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Department {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Inserts a department and returns it with its generated id.
    pub fn insert_department(&self, name: &str) -> Result<Department> {
        self.connection
            .execute("INSERT INTO department (name) VALUES (?1)", params![name])?;
        let id = self.connection.last_insert_rowid();
        debug!("Inserted department {} ({})", id, name);
        Ok(Department {
            id,
            name: name.to_string(),
        })
    }

    /// Deletes a department. Its roles go with it through the store's
    /// cascade.
    ///
    /// # Errors
    ///
    /// `EmptrackError::NotFound` when no department has this id.
    pub fn delete_department(&self, id: i64) -> Result<usize> {
        let affected = self
            .connection
            .execute("DELETE FROM department WHERE id = ?1", params![id])?;
        expect_affected(affected, "Department")
    }

    /// Sum of role salaries over the employees whose role belongs to the
    /// department. Zero when nobody works there.
    pub fn department_budget(&self, department_id: i64) -> Result<f64> {
        let budget = self.connection.query_row(
            "SELECT COALESCE(SUM(role.salary), 0)
             FROM employee
             JOIN role ON employee.role_id = role.id
             WHERE role.department_id = ?1",
            params![department_id],
            |row| row.get(0),
        )?;
        Ok(budget)
    }

    // ---- roles ----

    /// All roles joined to their department name, ordered by id.
    pub fn all_roles(&self) -> Result<Vec<RoleListing>> {
        debug!("Fetching all roles");
        let mut stmt = self.connection.prepare(ROLE_LISTING_SQL)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RoleListing {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    salary: row.get(2)?,
                    department_id: row.get(3)?,
                    department_name: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Inserts a role and returns it with its generated id.
    pub fn insert_role(&self, role: &NewRole) -> Result<Role> {
        self.connection.execute(
            "INSERT INTO role (title, salary, department_id) VALUES (?1, ?2, ?3)",
            params![role.title, role.salary, role.department_id],
        )?;
        let id = self.connection.last_insert_rowid();
        debug!("Inserted role {} ({})", id, role.title);
        Ok(Role {
            id,
            title: role.title.clone(),
            salary: role.salary,
            department_id: role.department_id,
        })
    }

    /// Deletes a role. Employees holding it keep a null role.
    pub fn delete_role(&self, id: i64) -> Result<usize> {
        let affected = self
            .connection
            .execute("DELETE FROM role WHERE id = ?1", params![id])?;
        expect_affected(affected, "Role")
    }

    // ---- employees ----

    /// All employees with role title, salary, department and manager name.
    pub fn all_employees(&self) -> Result<Vec<EmployeeListing>> {
        debug!("Fetching all employees");
        self.employee_listing("ORDER BY employee.id ASC", [])
    }

    /// One enriched employee, if it exists.
    pub fn employee(&self, id: i64) -> Result<Option<EmployeeListing>> {
        let sql = format!("{} WHERE employee.id = ?1", EMPLOYEE_LISTING_SELECT);
        let row = self
            .connection
            .query_row(&sql, params![id], map_employee_listing)
            .optional()?;
        Ok(row)
    }

    /// Employees whose role belongs to the department.
    pub fn employees_by_department(&self, department_id: i64) -> Result<Vec<EmployeeListing>> {
        debug!("Fetching employees of department {}", department_id);
        self.employee_listing(
            "WHERE role.department_id = ?1 ORDER BY employee.id ASC",
            params![department_id],
        )
    }

    /// Employees that manage at least one other employee.
    pub fn managers(&self) -> Result<Vec<EmployeeListing>> {
        debug!("Fetching managers");
        self.employee_listing(
            "WHERE employee.id IN (
                SELECT DISTINCT manager_id FROM employee WHERE manager_id IS NOT NULL
             )
             ORDER BY employee.id ASC",
            [],
        )
    }

    /// Direct reports of the manager.
    pub fn employees_by_manager(&self, manager_id: i64) -> Result<Vec<EmployeeListing>> {
        debug!("Fetching reports of manager {}", manager_id);
        self.employee_listing(
            "WHERE employee.manager_id = ?1 ORDER BY employee.id ASC",
            params![manager_id],
        )
    }

    /// Inserts an employee and returns it with its generated id.
    pub fn insert_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        self.connection.execute(
            "INSERT INTO employee (first_name, last_name, role_id, manager_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                employee.first_name,
                employee.last_name,
                employee.role_id,
                employee.manager_id
            ],
        )?;
        let id = self.connection.last_insert_rowid();
        debug!(
            "Inserted employee {} ({} {})",
            id, employee.first_name, employee.last_name
        );
        Ok(Employee {
            id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            role_id: employee.role_id,
            manager_id: employee.manager_id,
        })
    }

    /// Deletes an employee. Their reports keep a null manager.
    pub fn delete_employee(&self, id: i64) -> Result<usize> {
        let affected = self
            .connection
            .execute("DELETE FROM employee WHERE id = ?1", params![id])?;
        expect_affected(affected, "Employee")
    }

    pub fn update_employee_role(&self, employee_id: i64, role_id: i64) -> Result<usize> {
        let affected = self.connection.execute(
            "UPDATE employee SET role_id = ?1 WHERE id = ?2",
            params![role_id, employee_id],
        )?;
        expect_affected(affected, "Employee")
    }

    /// Sets or clears (`None`) the employee's manager.
    pub fn update_employee_manager(
        &self,
        employee_id: i64,
        manager_id: Option<i64>,
    ) -> Result<usize> {
        let affected = self.connection.execute(
            "UPDATE employee SET manager_id = ?1 WHERE id = ?2",
            params![manager_id, employee_id],
        )?;
        expect_affected(affected, "Employee")
    }

    fn employee_listing<P: Params>(&self, clause: &str, params: P) -> Result<Vec<EmployeeListing>> {
        let sql = format!("{} {}", EMPLOYEE_LISTING_SELECT, clause);
        let mut stmt = self.connection.prepare(&sql)?;
        let rows = stmt
            .query_map(params, map_employee_listing)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn map_employee_listing(row: &Row<'_>) -> rusqlite::Result<EmployeeListing> {
    Ok(EmployeeListing {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        role_id: row.get(3)?,
        title: row.get(4)?,
        salary: row.get(5)?,
        department_id: row.get(6)?,
        department_name: row.get(7)?,
        manager_id: row.get(8)?,
        manager_name: row.get(9)?,
    })
}

fn expect_affected(affected: usize, entity: &str) -> Result<usize> {
    if affected == 0 {
        return Err(EmptrackError::NotFound(entity.to_string()));
    }
    debug!("{} write affected {} rows", entity, affected);
    Ok(affected)
}
