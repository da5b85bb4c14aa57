// =============================================================================
// AUTHORIZATION MESSAGES
// =============================================================================

/// Uniform message for every token/role authorization failure.
pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized to access this route";

/// Deliberately vague login failure message, shared between "no such user"
/// and "wrong password" so the response does not reveal which one failed.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
