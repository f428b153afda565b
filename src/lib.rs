//! Okta SAML broker.
//!
//! Authenticates against the Okta API, lists the AWS applications and roles a
//! user is assigned, fetches the SAML assertion for one application and
//! resolves the role ARN pair to assume. Exchanging the pair for AWS
//! credentials is left to the caller.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod idp;
pub mod roles;
pub mod saml;

pub use error::{ApiError, Error, NotFoundKind, Result};
pub use idp::{AuthorizationTarget, OktaClient, Session};
pub use roles::{RoleArnPair, RoleEntry};
pub use saml::{FederationDocument, SamlResponse, extract_assertion, resolve_role_arn};
