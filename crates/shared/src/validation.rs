use validator::ValidateEmail;

use crate::constants::*;

pub fn validate_group_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Group name is required".into());
    }
    if trimmed.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(format!(
            "Group name must be at most {} characters",
            MAX_GROUP_NAME_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Message content is required".into());
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!(
            "Message must be at most {} characters",
            MAX_MESSAGE_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_caption(caption: &str) -> Result<(), String> {
    if caption.chars().count() > MAX_CAPTION_LENGTH {
        return Err(format!(
            "Caption must be at most {} characters",
            MAX_CAPTION_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_LENGTH
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "Username can only contain letters, numbers, hyphens, and underscores".into(),
        );
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err("Email is too long".into());
    }
    if !email.validate_email() {
        return Err("Email is invalid".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("a").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("alice@test.com").is_ok());
        assert!(validate_email("alice.test.com").is_err());
        assert!(validate_email("@test.com").is_err());
        assert!(validate_email(&format!("{}@test.com", "a".repeat(MAX_EMAIL_LENGTH))).is_err());
        assert!(validate_email("a b@test.com").is_err());
    }

    #[test]
    fn blank_content_and_group_names_are_rejected() {
        assert!(validate_message_content("   ").is_err());
        assert!(validate_message_content("hi").is_ok());
        assert!(validate_group_name("").is_err());
        assert!(validate_group_name("team").is_ok());
    }
}
