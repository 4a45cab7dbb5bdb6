use thiserror::Error;

/// Rejections raised by `Task::new` before any store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task name cannot be empty")]
    EmptyName,
    #[error("deadline must be later than the start time")]
    DeadlineNotAfterStart,
}

/// First unmet password rule, checked in order: length, uppercase,
/// lowercase, digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeakPassword {
    #[error("password must be at least 8 characters")]
    TooShort,
    #[error("password must contain an uppercase letter")]
    MissingUppercase,
    #[error("password must contain a lowercase letter")]
    MissingLowercase,
    #[error("password must contain a digit")]
    MissingDigit,
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error(transparent)]
    WeakPassword(#[from] WeakPassword),
    #[error("email already registered")]
    EmailTaken,
    #[error("username already exists")]
    UsernameTaken,
    #[error("could not hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// `UnknownEmail` and `WrongPassword` stay distinct in the type so callers
/// can log the real cause; both display the same text, so the login prompt
/// cannot be used to probe which emails are registered.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    UnknownEmail,
    #[error("invalid email or password")]
    WrongPassword,
    #[error("could not verify password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("task cannot be moved to history while its status is still due")]
    NotTerminal,
    #[error("task is not present in the store")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
