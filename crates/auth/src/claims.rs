use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskhub_core::{OrganizationId, UserId};

use crate::principal::Principal;
use crate::roles::Role;

/// Claims produced by the external credential service.
///
/// Signature and expiry have already been verified by the time this exists;
/// the role is still an untrusted string until decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedClaims {
    /// Subject / principal identifier.
    pub sub: UserId,
    pub email: String,
    pub role: String,
    pub organization_id: OrganizationId,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("unrecognized role '{0}' in credential")]
    UnknownRole(String),

    #[error("credential has no email")]
    MissingEmail,
}

impl TryFrom<VerifiedClaims> for Principal {
    type Error = ClaimsError;

    fn try_from(claims: VerifiedClaims) -> Result<Self, Self::Error> {
        let role: Role = claims.role.parse().map_err(|_| {
            tracing::warn!(sub = %claims.sub, role = %claims.role, "rejecting credential with unknown role");
            ClaimsError::UnknownRole(claims.role.clone())
        })?;

        let email = claims.email.trim();
        if email.is_empty() {
            return Err(ClaimsError::MissingEmail);
        }

        Ok(Principal::new(claims.sub, email.to_lowercase(), role, claims.organization_id))
    }
}
