/// Authentication primitives for Ticklist
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and verification
/// - [`policy`]: Password strength rules applied at sign-up
/// - [`token`]: Random session tokens and their cookie signatures
/// - [`session`]: Session manager (establish, resolve, destroy)
/// - [`credentials`]: Sign-up and sign-in flows over the credential store
///
/// # Security Features
///
/// - Passwords are stored only as salted Argon2id hashes
/// - Session cookies are HMAC-signed; the database keeps only a token hash
/// - Sign-in failures never reveal whether the email is registered

pub mod credentials;
pub mod password;
pub mod policy;
pub mod session;
pub mod token;

use crate::models::user::UserId;

/// An authenticated identity
///
/// Anything that can act as the owner of ownership-scoped data. The ID comes
/// from the server-side session, never from client input.
pub trait Principal {
    fn principal_id(&self) -> UserId;
}
