/// Action Flows Module
///
/// One function per menu action. Each flow fetches the reference data it
/// needs, prompts for the rest, resolves the selections back to ids, issues
/// the write and prints the outcome. Errors are returned to the dispatcher,
/// which reports them and carries on.
use crate::core::db::Queries;
use crate::core::model::{format_amount, Department, EmployeeListing, NewEmployee, NewRole, RoleListing};
use crate::core::{EmptrackError, Result};
use crate::prompt::{Choice, Console};
use crate::results_grid::ResultsGrid;

const DEPARTMENT_FIELDS: &[&str] = &["id", "name"];
const ROLE_FIELDS: &[&str] = &["id", "title", "department_name", "salary"];
const EMPLOYEE_FIELDS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "title",
    "department_name",
    "salary",
    "manager_name",
];
const DEPARTMENT_EMPLOYEE_FIELDS: &[&str] =
    &["id", "first_name", "last_name", "title", "salary", "manager_name"];
const REPORT_FIELDS: &[&str] = &["id", "first_name", "last_name", "title", "department_name", "salary"];
const BUDGET_FIELDS: &[&str] = &["first_name", "last_name", "title", "salary"];

const NONE_LABEL: &str = "None";

pub fn view_all_departments(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let departments = q.all_departments()?;
    console.show(&ResultsGrid::from_records(DEPARTMENT_FIELDS, &departments))
}

pub fn add_department(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let name = console.text("What is the name of the new department?")?;
    let department = q.insert_department(&name)?;
    console.say(&format!("\n{} department added successfully!\n", department.name))
}

pub fn remove_department(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let departments = q.all_departments()?;
    let id = console.select("Choose the department to remove:", &department_choices(&departments))?;
    let department = find_department(&departments, id)?;
    q.delete_department(department.id)?;
    console.say(&format!("\n{} department removed successfully!\n", department.name))
}

pub fn view_all_roles(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let roles = q.all_roles()?;
    console.show(&ResultsGrid::from_records(ROLE_FIELDS, &roles))
}

pub fn add_role(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let departments = q.all_departments()?;
    if departments.is_empty() {
        return Err(EmptrackError::NotFound("Department".to_string()));
    }

    let title = console.text("What is the new role?")?;
    let salary = console.number("What is the salary of the new role?")?;
    let department_id = console.select(
        "Choose a department for the new role.",
        &department_choices(&departments),
    )?;
    let department = find_department(&departments, department_id)?;

    let role = q.insert_role(&NewRole {
        title,
        salary,
        department_id: department.id,
    })?;
    console.say(&format!("\n{} role added successfully!\n", role.title))
}

pub fn remove_role(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let roles = q.all_roles()?;
    let choices: Vec<Choice<i64>> = roles.iter().map(|r| Choice::new(r.title.clone(), r.id)).collect();
    let id = console.select("Choose the role to remove:", &choices)?;
    let role = find_role(&roles, id)?;
    q.delete_role(role.id)?;
    console.say(&format!("\n{} role removed successfully!\n", role.title))
}

pub fn view_all_employees(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let employees = q.all_employees()?;
    console.show(&ResultsGrid::from_records(EMPLOYEE_FIELDS, &employees))
}

pub fn view_employees_by_department(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let departments = q.all_departments()?;
    let id = console.select("Choose a department:", &department_choices(&departments))?;
    let department = find_department(&departments, id)?;

    let employees = q.employees_by_department(department.id)?;
    console.say(&format!("\nEmployees in {}:", department.name))?;
    console.show(&ResultsGrid::from_records(DEPARTMENT_EMPLOYEE_FIELDS, &employees))
}

pub fn view_employees_by_manager(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let managers = q.managers()?;
    let id = console.select(
        "Choose the manager to view employees:",
        &employee_choices(&managers),
    )?;
    let manager = find_employee(&managers, id)?;

    let employees = q.employees_by_manager(manager.id)?;
    if employees.is_empty() {
        return console.say("\nNo employees found for the selected manager.");
    }
    console.say(&format!("\nEmployees reporting to {}:", manager.full_name()))?;
    console.show(&ResultsGrid::from_records(REPORT_FIELDS, &employees))
}

pub fn update_employee_role(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let employees = q.all_employees()?;
    let employee_id = console.select(
        "Choose the employee to update the role:",
        &employee_choices(&employees),
    )?;

    let roles = q.all_roles()?;
    let choices: Vec<Choice<i64>> = roles.iter().map(|r| Choice::new(r.title.clone(), r.id)).collect();
    let role_id = console.select("Choose the new role for the selected employee:", &choices)?;

    q.update_employee_role(employee_id, role_id)?;
    console.say("\nEmployee role updated successfully!\n")
}

pub fn update_employee_manager(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let employees = q.all_employees()?;
    let employee_id = console.select(
        "Choose the employee to update the manager:",
        &employee_choices(&employees),
    )?;
    let employee = find_employee(&employees, employee_id)?;

    let candidates: Vec<EmployeeListing> = manager_candidates(&employees, employee)
        .into_iter()
        .cloned()
        .collect();
    let manager_id = console.select(
        "Choose the new manager for the selected employee:",
        &manager_choices(&candidates),
    )?;

    q.update_employee_manager(employee.id, manager_id)?;
    console.say("\nEmployee manager updated successfully!\n")
}

pub fn add_employee(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let roles = q.all_roles()?;

    let first_name = console.text("What is the first name of the new employee?")?;
    let last_name = console.text("What is the last name of the new employee?")?;

    let mut role_choices: Vec<Choice<Option<i64>>> = roles
        .iter()
        .map(|r| Choice::new(r.title.clone(), Some(r.id)))
        .collect();
    role_choices.push(Choice::new(NONE_LABEL, None));
    let role_id = console.select("Choose the role for the new employee:", &role_choices)?;

    // Managers come from the role's department; without a role anyone qualifies.
    let colleagues = match role_id {
        Some(id) => q.employees_by_department(find_role(&roles, id)?.department_id)?,
        None => q.all_employees()?,
    };
    let manager_id = console.select(
        "Choose the manager for the new employee:",
        &manager_choices(&colleagues),
    )?;

    let employee = q.insert_employee(&NewEmployee {
        first_name,
        last_name,
        role_id,
        manager_id,
    })?;
    console.say(&format!(
        "\n{} {} added successfully!\n",
        employee.first_name, employee.last_name
    ))
}

pub fn remove_employee(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let employees = q.all_employees()?;
    let id = console.select("Choose the employee to remove:", &employee_choices(&employees))?;
    let employee = find_employee(&employees, id)?;
    q.delete_employee(employee.id)?;
    console.say(&format!("\n{} removed successfully!\n", employee.full_name()))
}

pub fn view_utilized_budget_by_department(q: &Queries<'_>, console: &mut Console) -> Result<()> {
    let departments = q.all_departments()?;
    let id = console.select(
        "Choose a department to view the budget:",
        &department_choices(&departments),
    )?;
    let department = find_department(&departments, id)?;

    let budget = q.department_budget(department.id)?;
    let employees = q.employees_by_department(department.id)?;

    console.say(&format!(
        "\nEmployees and salaries in the {} department:",
        department.name
    ))?;
    console.show(&ResultsGrid::from_records(BUDGET_FIELDS, &employees))?;

    console.say(&format!("Total Budget for the {} department:", department.name))?;
    let mut total = ResultsGrid::with_fields(&["total_budget"]);
    total.add_row(vec![format_amount(budget)]);
    console.show(&total)
}

/// Employees who may become `employee`'s manager: everyone else in the same
/// department, or everyone else when `employee` has no department.
pub fn manager_candidates<'e>(
    employees: &'e [EmployeeListing],
    employee: &EmployeeListing,
) -> Vec<&'e EmployeeListing> {
    employees
        .iter()
        .filter(|e| e.id != employee.id)
        .filter(|e| employee.department_id.is_none() || e.department_id == employee.department_id)
        .collect()
}

fn department_choices(departments: &[Department]) -> Vec<Choice<i64>> {
    departments
        .iter()
        .map(|d| Choice::new(d.name.clone(), d.id))
        .collect()
}

fn employee_choices(employees: &[EmployeeListing]) -> Vec<Choice<i64>> {
    employees
        .iter()
        .map(|e| Choice::new(e.full_name(), e.id))
        .collect()
}

/// Candidate managers followed by "None", which maps to no manager.
fn manager_choices(candidates: &[EmployeeListing]) -> Vec<Choice<Option<i64>>> {
    candidates
        .iter()
        .map(|e| Choice::new(e.full_name(), Some(e.id)))
        .chain(std::iter::once(Choice::new(NONE_LABEL, None)))
        .collect()
}

fn find_department(departments: &[Department], id: i64) -> Result<&Department> {
    departments
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| EmptrackError::NotFound("Department".to_string()))
}

fn find_role(roles: &[RoleListing], id: i64) -> Result<&RoleListing> {
    roles
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| EmptrackError::NotFound("Role".to_string()))
}

fn find_employee(employees: &[EmployeeListing], id: i64) -> Result<&EmployeeListing> {
    employees
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| EmptrackError::NotFound("Employee".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results_grid::Tabular;
    use crate::test_utils::{scripted_console, DatabaseFixture};

    #[test]
    fn test_listing_fields_all_resolve() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();

        let department = &q.all_departments().unwrap()[0];
        for field in DEPARTMENT_FIELDS {
            assert!(!department.cell(field).is_empty(), "department field {}", field);
        }

        let role = &q.all_roles().unwrap()[0];
        for field in ROLE_FIELDS {
            assert!(!role.cell(field).is_empty(), "role field {}", field);
        }

        // Bob has every join populated.
        let bob = q.employee(ids.bob).unwrap().unwrap();
        for fields in [EMPLOYEE_FIELDS, DEPARTMENT_EMPLOYEE_FIELDS, REPORT_FIELDS, BUDGET_FIELDS] {
            for field in fields {
                let cell = bob.cell(field);
                assert!(!cell.is_empty() && cell != "NULL", "employee field {}", field);
            }
        }
    }

    #[test]
    fn test_add_department_flow() {
        let fixture = DatabaseFixture::new().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["", "Engineering"]);

        add_department(&q, &mut console).unwrap();

        assert!(capture.stdout().contains("Engineering department added successfully!"));
        let departments = q.all_departments().unwrap();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0].name, "Engineering");
    }

    #[test]
    fn test_add_role_resolves_department_by_label() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["Paralegal", "abc", "65000", "legal"]);

        add_role(&q, &mut console).unwrap();

        assert!(capture.stdout().contains("Paralegal role added successfully!"));
        let role = q
            .all_roles()
            .unwrap()
            .into_iter()
            .find(|r| r.title == "Paralegal")
            .unwrap();
        assert_eq!(role.department_id, ids.legal);
        assert_eq!(role.salary, 65000.0);
    }

    #[test]
    fn test_add_role_without_departments_fails_before_prompting() {
        let fixture = DatabaseFixture::new().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["Anything"]);

        match add_role(&q, &mut console) {
            Err(EmptrackError::NotFound(entity)) => assert_eq!(entity, "Department"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert_eq!(capture.remaining(), 1);
    }

    #[test]
    fn test_manager_candidates_share_department() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let employees = q.all_employees().unwrap();

        let bob = employees.iter().find(|e| e.id == ids.bob).unwrap();
        let candidates: Vec<i64> = manager_candidates(&employees, bob).iter().map(|e| e.id).collect();
        assert_eq!(candidates, vec![ids.ann]);
    }

    #[test]
    fn test_manager_candidates_without_department() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let drifter = q
            .insert_employee(&NewEmployee {
                first_name: "Dan".to_string(),
                last_name: "Drift".to_string(),
                role_id: None,
                manager_id: None,
            })
            .unwrap();
        let employees = q.all_employees().unwrap();

        let dan = employees.iter().find(|e| e.id == drifter.id).unwrap();
        let candidates: Vec<i64> = manager_candidates(&employees, dan).iter().map(|e| e.id).collect();
        assert_eq!(candidates, vec![ids.ann, ids.bob, ids.cat]);
    }

    #[test]
    fn test_update_manager_to_none() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        // Bob is the second employee; his only candidate is Ann, then None.
        let (mut console, capture) = scripted_console(&["2", "None"]);

        update_employee_manager(&q, &mut console).unwrap();

        assert!(capture.stdout().contains("Employee manager updated successfully!"));
        let bob = q.employee(ids.bob).unwrap().unwrap();
        assert_eq!(bob.manager_id, None);
        assert!(q.employees_by_manager(ids.ann).unwrap().is_empty());
    }

    #[test]
    fn test_add_employee_offers_department_managers() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["Eve", "Evans", "Junior", "Ann Archer"]);

        add_employee(&q, &mut console).unwrap();

        let out = capture.stdout();
        assert!(out.contains("Eve Evans added successfully!"));
        assert!(!out.contains("Cat Cole"), "Legal staff must not be offered");

        let eve = q
            .all_employees()
            .unwrap()
            .into_iter()
            .find(|e| e.first_name == "Eve")
            .unwrap();
        assert_eq!(eve.role_id, Some(ids.junior));
        assert_eq!(eve.manager_id, Some(ids.ann));
    }

    #[test]
    fn test_add_employee_without_role() {
        let (fixture, _ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, _capture) = scripted_console(&["Fay", "Field", "None", "None"]);

        add_employee(&q, &mut console).unwrap();

        let fay = q
            .all_employees()
            .unwrap()
            .into_iter()
            .find(|e| e.first_name == "Fay")
            .unwrap();
        assert_eq!(fay.role_id, None);
        assert_eq!(fay.manager_id, None);
    }

    #[test]
    fn test_view_by_manager_lists_reports() {
        let (fixture, _ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["1"]);

        view_employees_by_manager(&q, &mut console).unwrap();

        let out = capture.stdout();
        assert!(out.contains("Employees reporting to Ann Archer:"));
        assert!(out.contains("Bob"));
        assert!(out.contains("(1 rows)"));
    }

    #[test]
    fn test_budget_flow_prints_total() {
        let (fixture, _ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["Engineering", "Empty"]);

        view_utilized_budget_by_department(&q, &mut console).unwrap();
        view_utilized_budget_by_department(&q, &mut console).unwrap();

        let out = capture.stdout();
        assert!(out.contains("Total Budget for the Engineering department:"));
        assert!(out.contains("120000"));
        assert!(out.contains("Total Budget for the Empty department:"));
        let empty_section = out.split("Total Budget for the Empty department:").nth(1).unwrap();
        let total_table = format!("Total Budget\n{}\n0\n(1 rows)", "-".repeat("Total Budget".len()));
        assert!(empty_section.contains(&total_table));
    }

    #[test]
    fn test_remove_employee_flow() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();
        let (mut console, capture) = scripted_console(&["Ann Archer"]);

        remove_employee(&q, &mut console).unwrap();

        assert!(capture.stdout().contains("Ann Archer removed successfully!"));
        assert!(q.employee(ids.ann).unwrap().is_none());
        let bob = q.employee(ids.bob).unwrap().unwrap();
        assert_eq!(bob.manager_id, None, "reports keep a null manager");
    }
}
