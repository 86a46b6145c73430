mod authorize;
mod service;
mod token;

pub use authorize::{AuthorizationGrant, AuthorizeCommand, AuthorizeRejection};
pub use service::{OAuthCommandService, OAuthPolicy};
pub use token::{GRANT_AUTHORIZATION_CODE, GRANT_REFRESH_TOKEN, TokenCommand};
