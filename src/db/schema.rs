//! Database schema definition.
//!
//! The schema is applied idempotently with `CREATE TABLE IF NOT EXISTS`
//! statements, so migration can run on every startup.

/// The complete DDL for the application schema.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    document_id TEXT,
    email TEXT,
    igss_number TEXT,
    position TEXT,
    birth_date TEXT,
    hire_date TEXT NOT NULL,
    termination_date TEXT,
    base_salary TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
);
-- Filtered unique indexes so multiple NULLs are allowed.
CREATE UNIQUE INDEX IF NOT EXISTS ux_employees_code
    ON employees(code) WHERE code IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS ux_employees_document
    ON employees(document_id) WHERE document_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS ux_employees_email
    ON employees(email) WHERE email IS NOT NULL;
CREATE INDEX IF NOT EXISTS ix_employees_igss ON employees(igss_number);

CREATE TABLE IF NOT EXISTS pay_periods (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('monthly','biweekly','weekly')),
    status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open','closed')),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS catalog_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL CHECK (kind IN ('benefit','deduction')),
    method TEXT NOT NULL CHECK (method IN ('percentage','fixed')),
    value TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    description TEXT
);

CREATE TABLE IF NOT EXISTS employee_assignments (
    employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    entry_id INTEGER NOT NULL REFERENCES catalog_entries(id) ON DELETE CASCADE,
    active INTEGER NOT NULL DEFAULT 1,
    method_override TEXT,
    value_override TEXT,
    PRIMARY KEY (employee_id, entry_id)
);
CREATE INDEX IF NOT EXISTS ix_assignments_entry ON employee_assignments(entry_id);

CREATE TABLE IF NOT EXISTS attendance_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    happened_at TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('clock_in','clock_out')),
    note TEXT
);
CREATE INDEX IF NOT EXISTS ix_attendance_happened_at ON attendance_events(happened_at DESC);
CREATE INDEX IF NOT EXISTS ix_attendance_employee ON attendance_events(employee_id);

CREATE TABLE IF NOT EXISTS loans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    principal TEXT NOT NULL,
    installment TEXT NOT NULL,
    balance TEXT NOT NULL,
    granted_on TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS ix_loans_employee ON loans(employee_id);

CREATE TABLE IF NOT EXISTS payroll_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    period_id INTEGER NOT NULL REFERENCES pay_periods(id) ON DELETE CASCADE,
    base_salary TEXT NOT NULL,
    payable_days INTEGER NOT NULL DEFAULT 0,
    period_days INTEGER NOT NULL DEFAULT 0,
    prorated_base TEXT NOT NULL,
    benefits_total TEXT NOT NULL,
    deductions_total TEXT NOT NULL,
    net_pay TEXT NOT NULL,
    UNIQUE (employee_id, period_id)
);

CREATE TABLE IF NOT EXISTS payroll_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES payroll_records(id) ON DELETE CASCADE,
    entry_id INTEGER REFERENCES catalog_entries(id) ON DELETE SET NULL,
    loan_id INTEGER REFERENCES loans(id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('benefit','deduction')),
    source TEXT NOT NULL CHECK (source IN ('catalog','employee_override','statutory','loan')),
    rate TEXT,
    amount TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_items_record ON payroll_items(record_id);

CREATE TABLE IF NOT EXISTS roles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS permissions (
    code TEXT PRIMARY KEY,
    description TEXT
);

CREATE TABLE IF NOT EXISTS role_permissions (
    role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    permission_code TEXT NOT NULL REFERENCES permissions(code) ON DELETE CASCADE,
    PRIMARY KEY (role_id, permission_code)
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role_id INTEGER NOT NULL REFERENCES roles(id),
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    action TEXT NOT NULL,
    entity TEXT NOT NULL,
    entity_id INTEGER,
    details TEXT,
    correlation_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_audit_created_at ON audit_log(created_at DESC);
"#;
