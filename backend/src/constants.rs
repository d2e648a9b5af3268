// Server
pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const API_VERSION: &str = "1.0.0";

// Sessions
pub const SESSION_TOKEN_BYTES: usize = 32;
pub const SESSION_TTL_DAYS: i64 = 30;

// Validation bounds
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_SKILL_TITLE_LEN: usize = 100;
pub const MAX_SKILL_DESCRIPTION_LEN: usize = 500;
pub const MAX_REVIEW_COMMENT_LEN: usize = 500;
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
