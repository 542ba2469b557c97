use super::{DB, StoreError, StoreResult};
use crate::models::employee::{DepartmentAvgSalary, Employee, EmployeeFilter, NewEmployee};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Shape of a row in the `employees` table.
///
/// SurrealDB owns the `id` field (a record id), so the public id lives in
/// `employee_id` and every read omits the record id.
#[derive(Debug, Serialize, Deserialize)]
struct EmployeeDocument {
    employee_id: String,
    name: String,
    position: String,
    department: Option<String>,
    salary: Option<f64>,
    joining_date: Option<NaiveDate>,
    #[serde(default)]
    skills: Vec<String>,
    created_at: i64,
}

impl From<EmployeeDocument> for Employee {
    fn from(doc: EmployeeDocument) -> Self {
        Self {
            id: doc.employee_id,
            name: doc.name,
            position: doc.position,
            department: doc.department,
            salary: doc.salary,
            joining_date: doc.joining_date,
            skills: doc.skills,
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SalaryRow {
    department: Option<String>,
    salary: Option<f64>,
}

/// The `employees` table, keyed by a generated UUID.
#[derive(Clone)]
pub struct EmployeeStore {
    db: DB,
}

impl EmployeeStore {
    pub fn new(db: DB) -> Self {
        Self { db }
    }

    /// Lists employees in creation order, optionally by department and page.
    pub async fn list(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let mut sql = String::from("SELECT * OMIT id FROM employees");
        if filter.department.is_some() {
            sql.push_str(" WHERE department = $department");
        }
        sql.push_str(" ORDER BY created_at ASC");
        if let Some(page) = filter.page {
            // Both numbers are validated integers, so formatting them in is safe.
            sql.push_str(&format!(" LIMIT {} START {}", page.limit, page.offset()));
        }

        let docs: Vec<EmployeeDocument> = self
            .db
            .query(sql)
            .bind(("department", filter.department.clone()))
            .await?
            .take(0)?;

        Ok(docs.into_iter().map(Employee::from).collect())
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Employee>> {
        let docs: Vec<EmployeeDocument> = self
            .db
            .query("SELECT * OMIT id FROM employees WHERE employee_id = $id LIMIT 1")
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(docs.into_iter().next().map(Employee::from))
    }

    /// Stores a new employee and returns its generated id.
    pub async fn insert(&self, employee: NewEmployee) -> StoreResult<String> {
        let employee_id = Uuid::new_v4().to_string();
        let doc = EmployeeDocument {
            employee_id: employee_id.clone(),
            name: employee.name,
            position: employee.position,
            department: employee.department,
            salary: employee.salary,
            joining_date: employee.joining_date,
            skills: employee.skills,
            created_at: Utc::now().timestamp_micros(),
        };

        self.db
            .query("CREATE employees CONTENT $doc RETURN NONE")
            .bind(("doc", doc))
            .await?
            .check()?;

        tracing::debug!(employee_id = %employee_id, "employee stored");
        Ok(employee_id)
    }

    /// Deletes by id, failing with `NotFound` if there's nothing to delete.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if self.get(id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Employee '{id}' not found")));
        }

        self.db
            .query("DELETE employees WHERE employee_id = $id")
            .bind(("id", id.to_string()))
            .await?
            .check()?;

        tracing::debug!(employee_id = %id, "employee deleted");
        Ok(())
    }

    /// Names of employees listing `skill`, alphabetically.
    pub async fn search_by_skill(&self, skill: &str) -> StoreResult<Vec<String>> {
        let rows: Vec<NameRow> = self
            .db
            .query("SELECT name FROM employees WHERE skills CONTAINS $skill ORDER BY name ASC")
            .bind(("skill", skill.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|row| row.name).collect())
    }

    /// Mean salary per department, rounded to cents and sorted by department.
    ///
    /// Employees missing a department or a salary don't count.
    pub async fn average_salary_by_department(&self) -> StoreResult<Vec<DepartmentAvgSalary>> {
        let rows: Vec<SalaryRow> = self
            .db
            .query("SELECT department, salary FROM employees")
            .await?
            .take(0)?;

        Ok(average_by_department(rows))
    }
}

fn average_by_department(rows: Vec<SalaryRow>) -> Vec<DepartmentAvgSalary> {
    let mut totals: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for row in rows {
        if let (Some(department), Some(salary)) = (row.department, row.salary) {
            let entry = totals.entry(department).or_insert((0.0, 0));
            entry.0 += salary;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(department, (sum, count))| DepartmentAvgSalary {
            department,
            avg_salary: (sum / f64::from(count) * 100.0).round() / 100.0,
        })
        .collect()
}
