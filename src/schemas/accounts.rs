use serde::Deserialize;
use validator::Validate;

/// New master-admin or tutor-admin account. Both tiers live in the same
/// collection, distinguished by the two flags.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: String,
    #[serde(default)]
    #[serde(alias = "isMasterAdmin")]
    pub is_master_admin: bool,
    #[serde(default)]
    #[serde(alias = "isTutorAdmin")]
    pub is_tutor_admin: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TutorCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: String,
}

/// New student account; students always belong to an intake.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: String,
    #[serde(alias = "intakeId")]
    #[validate(length(min = 1, message = "an intake must be selected"))]
    pub intake_id: String,
}

/// Partial update for any account tier; omitted fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AccountUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: Option<String>,
    #[serde(default)]
    #[serde(alias = "intakeId")]
    pub intake_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IntakeCreate {
    #[validate(length(min = 1, message = "intake name must not be empty"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn student_create_requires_valid_fields() {
        let valid = StudentCreate {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            intake_id: "intake-1".into(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = StudentCreate { email: "not-an-email".into(), ..valid.clone() };
        assert!(bad_email.validate().is_err());

        let short_password = StudentCreate { password: "123".into(), ..valid.clone() };
        assert!(short_password.validate().is_err());

        let no_intake = StudentCreate { intake_id: String::new(), ..valid };
        assert!(no_intake.validate().is_err());
    }

    #[test]
    fn account_update_validates_only_present_fields() {
        let empty = AccountUpdate::default();
        assert!(empty.validate().is_ok());

        let rename = AccountUpdate { name: Some("Grace".into()), ..Default::default() };
        assert!(rename.validate().is_ok());

        let bad = AccountUpdate { email: Some("nope".into()), ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
