use serde::{Deserialize, Serialize};

use super::error::{UserError, UserResult};

/// Request body for POST /users. Fields are optional here so that a missing
/// one turns into a 400 with our own message.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated create input, password still in plaintext.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> UserResult<NewUserInput> {
        match (present(self.name), present(self.email), present(self.password)) {
            (Some(name), Some(email), Some(password)) => Ok(NewUserInput {
                name,
                email,
                password,
            }),
            _ => Err(UserError::Validation(
                "name, email and password are required".into(),
            )),
        }
    }
}

/// Request body for PUT /users/:id. Absent or blank fields stay unchanged.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: present(self.name),
            email: present(self.email),
            password: present(self.password),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: Option<&str>, email: Option<&str>, password: Option<&str>) -> CreateUserRequest {
        CreateUserRequest {
            name: name.map(Into::into),
            email: email.map(Into::into),
            password: password.map(Into::into),
        }
    }

    #[test]
    fn create_requires_all_fields() {
        assert!(create(Some("A"), Some("a@x.com"), Some("p1")).validate().is_ok());
        for req in [
            create(None, Some("a@x.com"), Some("p1")),
            create(Some("A"), None, Some("p1")),
            create(Some("A"), Some("a@x.com"), None),
            create(Some(""), Some("a@x.com"), Some("p1")),
            create(Some("A"), Some("a@x.com"), Some("   ")),
        ] {
            assert!(matches!(req.validate(), Err(UserError::Validation(_))));
        }
    }

    #[test]
    fn update_drops_blank_fields() {
        let req = UpdateUserRequest {
            name: Some("B".into()),
            email: Some("".into()),
            password: Some("  ".into()),
        }
        .normalized();
        assert_eq!(req.name.as_deref(), Some("B"));
        assert!(req.email.is_none());
        assert!(req.password.is_none());
        assert!(!req.is_empty());
        assert!(UpdateUserRequest::default().normalized().is_empty());
    }

    #[test]
    fn update_deserializes_partial_body() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name":"Only"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Only"));
        assert!(req.email.is_none() && req.password.is_none());
    }
}
