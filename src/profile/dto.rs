use serde::Deserialize;

use crate::error::ApiError;

/// Body for the caller's own profile update.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.chars().count() < 2 {
            return Err(ApiError::Validation(
                "Name must be at least 2 characters".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_one_character_name() {
        let update = ProfileUpdate {
            name: "A".into(),
            bio: None,
            avatar: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn accepts_plain_update() {
        let update = ProfileUpdate {
            name: "Ada".into(),
            bio: Some("writes".into()),
            avatar: None,
        };
        assert!(update.validate().is_ok());
    }
}
