// Limits
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_CAPTION_LENGTH: usize = 1000;
pub const MAX_GROUP_NAME_LENGTH: usize = 100;
pub const MAX_USERNAME_LENGTH: usize = 32;
pub const MIN_USERNAME_LENGTH: usize = 2;
pub const MAX_EMAIL_LENGTH: usize = 254;

// Sessions
pub const SESSION_COOKIE_NAME: &str = "pigeon.session_token";
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// Placeholder for an addressing field a message does not carry.
pub const ABSENT_ID: &str = "";

/// Display name used when a message sender no longer resolves.
pub const UNKNOWN_SENDER: &str = "Unknown";
