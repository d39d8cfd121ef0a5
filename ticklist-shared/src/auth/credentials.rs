/// Sign-up and sign-in flows
///
/// Both flows validate input into user-facing [`FieldError`]s before touching
/// the store. Sign-in collapses "unknown email" and "wrong password" into one
/// [`SignInError::InvalidCredentials`] so callers cannot leak which one it was.

use std::borrow::Cow;
use tracing::info;
use validator::{Validate, ValidationError};

use super::{password, policy};
use crate::models::user::{CreateUserOutcome, NewUser, User};
use crate::store::{StoreError, UserStore};
use crate::validation::{from_validation_errors, FieldError};

/// Submitted sign-up form
#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

/// Result of a valid sign-up
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// A new account was created
    Created(User),

    /// The email already has an account; nothing was written
    AlreadyRegistered,
}

#[derive(Debug, thiserror::Error)]
pub enum SignUpError {
    #[error("Sign-up form is invalid ({} errors)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Password(#[from] password::PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("Sign-in form is invalid ({} errors)", .0.len())]
    Invalid(Vec<FieldError>),

    /// Unknown email or wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] password::PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Validate)]
struct SignUpInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters long."))]
    name: String,

    #[validate(
        email(message = "Invalid email address."),
        length(max = 255, message = "Email must be at most 255 characters.")
    )]
    email: String,

    #[validate(
        length(min = 1, message = "Password is required."),
        custom(function = "password_policy")
    )]
    password: String,

    #[validate(must_match(other = "password", message = "Both passwords do not match."))]
    confirm: String,
}

#[derive(Debug, Validate)]
struct SignInInput {
    #[validate(email(message = "Invalid email address."))]
    email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    password: String,
}

/// Canonical form of an email address: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Password rules as one `validator` error; the length rule reports empty input
fn password_policy(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Ok(());
    }

    policy::validate(password).map_err(|violations| {
        let mut error = ValidationError::new("password_policy");
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        error.message = Some(Cow::Owned(message));
        error
    })
}

/// Registers a new account
///
/// Validation and the password policy run before hashing. A duplicate email
/// is an ordinary outcome, not an error.
pub async fn sign_up<S>(store: &S, form: SignUp) -> Result<SignUpOutcome, SignUpError>
where
    S: UserStore + ?Sized,
{
    let input = SignUpInput {
        name: form.name.trim().to_string(),
        email: normalize_email(&form.email),
        password: form.password,
        confirm: form.confirm,
    };
    input
        .validate()
        .map_err(|errors| SignUpError::Invalid(from_validation_errors(&errors)))?;

    // Cheap pre-check; the insert below is what actually enforces uniqueness.
    if store.find_user_by_email(&input.email).await?.is_some() {
        info!("Sign-up rejected: email already registered");
        return Ok(SignUpOutcome::AlreadyRegistered);
    }

    let password_hash = password::hash_password(&input.password)?;

    let outcome = store
        .create_user(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await?;

    Ok(match outcome {
        CreateUserOutcome::Created(user) => {
            info!(user_id = user.id, "User registered");
            SignUpOutcome::Created(user)
        }
        CreateUserOutcome::AlreadyExists => {
            info!("Sign-up rejected: email already registered");
            SignUpOutcome::AlreadyRegistered
        }
    })
}

/// Checks an email/password pair
///
/// Returns the user on success. Unknown emails still pay for one password
/// verification so timing does not reveal registration.
pub async fn sign_in<S>(store: &S, email: &str, password: &str) -> Result<User, SignInError>
where
    S: UserStore + ?Sized,
{
    let input = SignInInput {
        email: normalize_email(email),
        password: password.to_string(),
    };
    input
        .validate()
        .map_err(|errors| SignInError::Invalid(from_validation_errors(&errors)))?;

    let Some(user) = store.find_user_by_email(&input.email).await? else {
        password::verify_against_dummy(password);
        info!("Sign-in failed");
        return Err(SignInError::InvalidCredentials);
    };

    if !password::verify_password(password, &user.password_hash)? {
        info!("Sign-in failed");
        return Err(SignInError::InvalidCredentials);
    }

    info!(user_id = user.id, "User signed in");
    Ok(user)
}
