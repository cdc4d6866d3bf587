use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{require_id, require_text, Identified, Validate};
use crate::error::ObraError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

impl Identified for Company {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDraft {
    pub name: String,
}

impl Validate for CompanyDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_text(&self.name, "Company name")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub company_id: Option<i64>,
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub company_id: Option<i64>,
    pub role: Role,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ObraError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ObraError::validation("Email and password are required"));
        }
        if !self.email.contains('@') {
            return Err(ObraError::validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        if self.role != Role::SuperAdmin {
            require_id(self.company_id, "Company")?;
        }
        Ok(())
    }
}

/// Company-wide holiday. Stored and listed only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonWorkingDay {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl Identified for NonWorkingDay {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NonWorkingDayDraft {
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "email": "root@obra.mx", "role": "super_admin"}"#)
                .unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
        assert_eq!(user.company_id, None);
    }

    #[test]
    fn test_new_user_needs_company_unless_super_admin() {
        let mut user = NewUser {
            email: "ana@obra.mx".into(),
            password: "secreto".into(),
            company_id: None,
            role: Role::User,
        };
        assert!(user.validate().is_err());
        user.role = Role::SuperAdmin;
        assert!(user.validate().is_ok());
        user.email = "sin-arroba".into();
        assert!(user.validate().is_err());
    }
}
