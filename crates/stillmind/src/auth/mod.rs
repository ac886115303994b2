//! Session boundary: JWT issuance/verification plus the account directory
//! trait. Credential storage itself is delegated to the directory
//! implementation; the core only decides what a valid session looks like.

pub mod accounts;
pub mod extract;
pub mod router;
pub mod service;
pub mod token;

pub use accounts::{AccountDirectory, DirectoryError, ProfileChanges, UserAccount};
pub use extract::AuthenticatedUser;
pub use router::auth_router;
pub use service::{AuthFlowError, AuthService};
pub use token::{AuthError, Claims, TokenAuthenticator};
