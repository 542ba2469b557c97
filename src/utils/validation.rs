use regex::Regex;
use std::sync::OnceLock;

/// Names, positions, departments.
pub const MAX_NAME_LEN: usize = 200;

/// Individual skill tags.
pub const MAX_SKILL_LEN: usize = 100;

pub const MAX_SKILLS: usize = 50;

/// Passwords before hashing. Argon2 doesn't care, but nobody needs more.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Validates a username.
///
/// Rules:
/// 1. Length between 3 and 32 characters
/// 2. ASCII letters, digits, `_`, `-` and `.` only
/// 3. Must start with a letter or digit
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }
    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("username pattern is valid")
    });

    if !re.is_match(username) {
        return Err(
            "Username may only contain letters, digits, '_', '-' and '.', and must start with a letter or digit"
                .to_string(),
        );
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password must not be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters long"
        ));
    }
    Ok(())
}

/// A required string must be non-blank and within `max_len`.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.chars().count() > max_len {
        return Err(format!("{field} must be at most {max_len} characters long"));
    }
    Ok(())
}

/// Same as [`validate_required_text`], but only when the value is present.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), String> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

pub fn validate_salary(salary: Option<f64>) -> Result<(), String> {
    match salary {
        Some(s) if !s.is_finite() => Err("salary must be a finite number".to_string()),
        Some(s) if s < 0.0 => Err("salary must not be negative".to_string()),
        _ => Ok(()),
    }
}

pub fn validate_skills(skills: &[String]) -> Result<(), String> {
    if skills.len() > MAX_SKILLS {
        return Err(format!("at most {MAX_SKILLS} skills are allowed"));
    }
    skills
        .iter()
        .try_for_each(|skill| validate_required_text(skill, "skill", MAX_SKILL_LEN))
}
