/// Menu Dispatcher Module
///
/// The fixed, ordered action menu and the loop that runs it.
use crate::actions;
use crate::core::db::{Gateway, Queries};
use crate::core::{EmptrackError, Result};
use crate::prompt::{Choice, Console};
use tracing::{debug, info, warn};

/// Every entry of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewAllDepartments,
    AddDepartment,
    RemoveDepartment,
    ViewAllRoles,
    AddRole,
    RemoveRole,
    ViewAllEmployees,
    ViewEmployeesByDepartment,
    ViewEmployeesByManager,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    AddEmployee,
    RemoveEmployee,
    ViewUtilizedBudgetByDepartment,
    Quit,
}

/// Signature shared by all action flows.
pub type Handler = fn(&Queries<'_>, &mut Console) -> Result<()>;

/// A menu line: what it shows, how failures are worded, and what it runs.
/// `Quit` has no handler; the dispatcher ends the session instead.
pub struct MenuEntry {
    pub action: Action,
    pub label: &'static str,
    /// Completes "Error ..." when the flow fails
    pub failure: &'static str,
    pub handler: Option<Handler>,
}

/// The menu, indexed by `Action` discriminant.
pub static MENU: [MenuEntry; 15] = [
    MenuEntry {
        action: Action::ViewAllDepartments,
        label: "View All Departments",
        failure: "fetching departments",
        handler: Some(actions::view_all_departments),
    },
    MenuEntry {
        action: Action::AddDepartment,
        label: "Add Department",
        failure: "adding department",
        handler: Some(actions::add_department),
    },
    MenuEntry {
        action: Action::RemoveDepartment,
        label: "Remove Department",
        failure: "removing department",
        handler: Some(actions::remove_department),
    },
    MenuEntry {
        action: Action::ViewAllRoles,
        label: "View All Roles",
        failure: "fetching roles",
        handler: Some(actions::view_all_roles),
    },
    MenuEntry {
        action: Action::AddRole,
        label: "Add Role",
        failure: "adding role",
        handler: Some(actions::add_role),
    },
    MenuEntry {
        action: Action::RemoveRole,
        label: "Remove Role",
        failure: "removing role",
        handler: Some(actions::remove_role),
    },
    MenuEntry {
        action: Action::ViewAllEmployees,
        label: "View All Employees",
        failure: "fetching employees",
        handler: Some(actions::view_all_employees),
    },
    MenuEntry {
        action: Action::ViewEmployeesByDepartment,
        label: "View Employees By Department",
        failure: "fetching employees by department",
        handler: Some(actions::view_employees_by_department),
    },
    MenuEntry {
        action: Action::ViewEmployeesByManager,
        label: "View Employees By Manager",
        failure: "viewing employees by manager",
        handler: Some(actions::view_employees_by_manager),
    },
    MenuEntry {
        action: Action::UpdateEmployeeRole,
        label: "Update Employee Role",
        failure: "updating employee role",
        handler: Some(actions::update_employee_role),
    },
    MenuEntry {
        action: Action::UpdateEmployeeManager,
        label: "Update Employee Manager",
        failure: "updating employee manager",
        handler: Some(actions::update_employee_manager),
    },
    MenuEntry {
        action: Action::AddEmployee,
        label: "Add Employee",
        failure: "adding employee",
        handler: Some(actions::add_employee),
    },
    MenuEntry {
        action: Action::RemoveEmployee,
        label: "Remove Employee",
        failure: "removing employee",
        handler: Some(actions::remove_employee),
    },
    MenuEntry {
        action: Action::ViewUtilizedBudgetByDepartment,
        label: "View Utilized Budget By Department",
        failure: "fetching budget and employees",
        handler: Some(actions::view_utilized_budget_by_department),
    },
    MenuEntry {
        action: Action::Quit,
        label: "Quit",
        failure: "quitting",
        handler: None,
    },
];

impl Action {
    pub fn entry(self) -> &'static MenuEntry {
        &MENU[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }
}

const MAIN_QUESTION: &str = "What would you like to do?";

/// Runs the menu until Quit.
///
/// Action failures are reported on the error stream and the menu comes
/// back. Only a failure of the menu prompt itself ends the loop with an
/// error; end of input there counts as Quit.
pub fn run(gateway: &mut Gateway, console: &mut Console) -> Result<()> {
    let choices: Vec<Choice<Action>> = MENU
        .iter()
        .map(|entry| Choice::new(entry.label, entry.action))
        .collect();

    loop {
        let action = match console.select(MAIN_QUESTION, &choices) {
            Ok(action) => action,
            Err(EmptrackError::InputClosed) => {
                info!("Input closed at the main menu, quitting");
                Action::Quit
            }
            Err(e) => return Err(e),
        };

        let entry = action.entry();
        debug!("Dispatching {:?}", action);
        match entry.handler {
            Some(handler) => {
                let outcome = gateway
                    .connection()
                    .and_then(|conn| handler(&Queries::new(conn), console));
                if let Err(e) = outcome {
                    warn!("{} failed: {}", entry.label, e);
                    console.report_error(&format!("Error {}: {}", entry.failure, e))?;
                }
            }
            None => {
                console.say("Goodbye!")?;
                gateway.close()?;
                info!("Session ended by {}", entry.label);
                return Ok(());
            }
        }
    }
}
