use thiserror::Error;

/// Internal issues indicating unexpected data or possible bugs.
///
/// All variants result in a 500 Internal Server Error with a generic message returned
/// to the client.
#[derive(Error, Debug)]
pub enum InternalError {
    /// A status column holds a value outside its known set.
    #[error("Unknown {entity} status '{value}'")]
    UnknownStatus {
        /// Table the value was read from
        entity: &'static str,
        /// The stored value
        value: String,
    },

    /// Argon2 failed to hash a password.
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
}
