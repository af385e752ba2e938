/// Key of the custom claim granting administrative access
pub const ADMIN_CLAIM_KEY: &str = "admin";
/// Rendered in place of a missing display name
pub const DISPLAY_NAME_PLACEHOLDER: &str = "N/A";

// Provider error codes
pub const CODE_USER_NOT_FOUND: &str = "auth/user-not-found";
pub const CODE_WRONG_PASSWORD: &str = "auth/wrong-password";
pub const CODE_INVALID_EMAIL: &str = "auth/invalid-email";
pub const CODE_INVALID_CREDENTIAL: &str = "auth/invalid-credential";
pub const CODE_EMAIL_ALREADY_EXISTS: &str = "auth/email-already-exists";
pub const CODE_NO_CURRENT_USER: &str = "auth/no-current-user";
pub const CODE_INTERNAL_ERROR: &str = "auth/internal-error";
