use crate::utils::validation::{
    MAX_NAME_LEN, validate_optional_text, validate_required_text, validate_salary,
    validate_skills,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page size used when the client asks for a page without a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub joining_date: Option<NaiveDate>,
    pub skills: Vec<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), String> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&self.position, "position", MAX_NAME_LEN)?;
        validate_optional_text(self.department.as_deref(), "department", MAX_NAME_LEN)?;
        validate_salary(self.salary)?;
        validate_skills(&self.skills)
    }
}

/// Query string of `GET /employees`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub department: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    /// `None` returns every matching employee.
    pub page: Option<Page>,
}

impl ListQuery {
    /// Pagination only kicks in when `page` or `limit` is given. A blank
    /// `department` means no department filter.
    pub fn into_filter(self) -> Result<EmployeeFilter, String> {
        let department = self.department.filter(|d| !d.trim().is_empty());
        validate_optional_text(department.as_deref(), "department", MAX_NAME_LEN)?;

        let page = match (self.page, self.limit) {
            (None, None) => None,
            (page, limit) => {
                let page = page.unwrap_or(1);
                let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
                if page == 0 {
                    return Err("page must be at least 1".to_string());
                }
                if limit == 0 || limit > MAX_PAGE_SIZE {
                    return Err(format!("limit must be between 1 and {MAX_PAGE_SIZE}"));
                }
                Some(Page { page, limit })
            }
        };

        Ok(EmployeeFilter { department, page })
    }
}

#[derive(Debug, Deserialize)]
pub struct SkillQuery {
    pub skill: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentAvgSalary {
    pub department: String,
    pub avg_salary: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedEmployee {
    pub id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bob() -> NewEmployee {
        serde_json::from_str(r#"{"name":"Bob","position":"Eng"}"#).unwrap()
    }

    #[test]
    fn minimal_body_is_valid() {
        let emp = bob();
        assert!(emp.validate().is_ok());
        assert!(emp.skills.is_empty());
        assert_eq!(emp.salary, None);
    }

    #[test]
    fn full_body_parses_dates() {
        let emp: NewEmployee = serde_json::from_str(
            r#"{"name":"John Doe","position":"Engineer","department":"Engineering",
                "salary":75000,"joining_date":"2023-01-15","skills":["Python","MongoDB"]}"#,
        )
        .unwrap();
        assert!(emp.validate().is_ok());
        assert_eq!(emp.joining_date, NaiveDate::from_ymd_opt(2023, 1, 15));
        assert_eq!(emp.salary, Some(75000.0));
    }

    #[test]
    fn blank_name_or_negative_salary_is_rejected() {
        let mut emp = bob();
        emp.name = " ".into();
        assert!(emp.validate().is_err());

        let mut emp = bob();
        emp.salary = Some(-10.0);
        assert!(emp.validate().is_err());
    }

    #[test]
    fn no_paging_without_page_or_limit() {
        let filter = ListQuery::default().into_filter().unwrap();
        assert_eq!(filter, EmployeeFilter::default());
    }

    #[test]
    fn blank_department_is_no_filter() {
        let query = ListQuery {
            department: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(query.into_filter().unwrap(), EmployeeFilter::default());
    }

    #[test]
    fn paging_defaults_and_bounds() {
        let filter = ListQuery { page: Some(3), ..Default::default() }
            .into_filter()
            .unwrap();
        let page = filter.page.unwrap();
        assert_eq!(page, Page { page: 3, limit: DEFAULT_PAGE_SIZE });
        assert_eq!(page.offset(), 20);

        assert!(ListQuery { page: Some(0), ..Default::default() }.into_filter().is_err());
        assert!(ListQuery { limit: Some(0), ..Default::default() }.into_filter().is_err());
        assert!(ListQuery { limit: Some(101), ..Default::default() }.into_filter().is_err());
    }
}
