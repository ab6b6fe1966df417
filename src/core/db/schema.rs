/// Schema Module
///
/// Table definitions for the organization dataset. They are applied with
/// `IF NOT EXISTS` every time a database is opened, so opening an existing
/// file is a no-op.
use crate::core::Result;
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// Foreign-key actions decide what removing a parent does:
/// - a department takes its roles with it
/// - employees whose role disappears keep a null role
/// - reports of a removed manager keep a null manager
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS department (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS role (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    salary REAL NOT NULL,
    department_id INTEGER NOT NULL,
    FOREIGN KEY (department_id) REFERENCES department (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    role_id INTEGER,
    manager_id INTEGER,
    FOREIGN KEY (role_id) REFERENCES role (id) ON DELETE SET NULL,
    FOREIGN KEY (manager_id) REFERENCES employee (id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_role_department_id ON role (department_id);
CREATE INDEX IF NOT EXISTS idx_employee_role_id ON employee (role_id);
CREATE INDEX IF NOT EXISTS idx_employee_manager_id ON employee (manager_id);
"#;

/// Creates the department, role and employee tables if they are missing.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    debug!("Schema applied");
    Ok(())
}

const SAMPLE_DEPARTMENTS: &[&str] = &["Engineering", "Finance", "Legal", "Sales"];

// (title, salary, department name)
const SAMPLE_ROLES: &[(&str, f64, &str)] = &[
    ("Lead Engineer", 150000.0, "Engineering"),
    ("Software Engineer", 120000.0, "Engineering"),
    ("Account Manager", 160000.0, "Finance"),
    ("Accountant", 125000.0, "Finance"),
    ("Legal Team Lead", 250000.0, "Legal"),
    ("Lawyer", 190000.0, "Legal"),
    ("Sales Lead", 100000.0, "Sales"),
    ("Salesperson", 80000.0, "Sales"),
];

// (first name, last name, role title, manager's first name)
const SAMPLE_EMPLOYEES: &[(&str, &str, &str, Option<&str>)] = &[
    ("Ashley", "Rodriguez", "Lead Engineer", None),
    ("Kevin", "Tupik", "Software Engineer", Some("Ashley")),
    ("Kunal", "Singh", "Account Manager", None),
    ("Malia", "Brown", "Accountant", Some("Kunal")),
    ("Sarah", "Lourd", "Legal Team Lead", None),
    ("Tom", "Allen", "Lawyer", Some("Sarah")),
    ("John", "Doe", "Sales Lead", None),
    ("Mike", "Chan", "Salesperson", Some("John")),
];

/// Inserts a small demo organization when the database has no departments.
///
/// Returns `true` when rows were inserted.
pub fn seed_sample_data(conn: &Connection) -> Result<bool> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM department", [], |row| row.get(0))?;
    if existing > 0 {
        debug!("Skipping sample data, {} departments present", existing);
        return Ok(false);
    }

    for name in SAMPLE_DEPARTMENTS {
        conn.execute("INSERT INTO department (name) VALUES (?1)", params![name])?;
    }

    for (title, salary, department) in SAMPLE_ROLES {
        conn.execute(
            "INSERT INTO role (title, salary, department_id)
             SELECT ?1, ?2, id FROM department WHERE name = ?3",
            params![title, salary, department],
        )?;
    }

    for (first_name, last_name, title, manager) in SAMPLE_EMPLOYEES {
        conn.execute(
            "INSERT INTO employee (first_name, last_name, role_id, manager_id)
             VALUES (
                ?1, ?2,
                (SELECT id FROM role WHERE title = ?3),
                (SELECT id FROM employee WHERE first_name = ?4)
             )",
            params![first_name, last_name, title, manager],
        )?;
    }

    info!(
        "Seeded sample data: {} departments, {} roles, {} employees",
        SAMPLE_DEPARTMENTS.len(),
        SAMPLE_ROLES.len(),
        SAMPLE_EMPLOYEES.len()
    );
    Ok(true)
}
