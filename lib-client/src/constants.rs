/// Entry point the access guard redirects to when access is denied
pub const LOGIN_PATH: &str = "/login";

// User-facing messages for failed sign-in attempts
pub const MSG_NOT_AUTHORIZED: &str = "You do not have administrator rights. Please contact an administrator.";
pub const MSG_USER_NOT_FOUND: &str = "No user exists with this email.";
pub const MSG_WRONG_PASSWORD: &str = "Wrong password.";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address.";
pub const MSG_INVALID_CREDENTIAL: &str = "Wrong email or password.";
pub const MSG_SIGN_IN_FAILED: &str = "An error occurred while signing in.";
