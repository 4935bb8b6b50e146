//! Main token service implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::token::{AccessClaims, RefreshClaims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Signing and verification of access and refresh tokens
///
/// Access tokens are self-contained: signature, issuer and time window decide
/// validity. Refresh tokens are only checked for signature, algorithm and
/// issuer here; their lifetime is enforced against the stored record.
pub struct TokenService {
    config: TokenServiceConfig,
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_validation: Validation,
    refresh_validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or an error if a secret is missing, both secrets
    /// are identical, or the algorithm is not HMAC
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.access_secret.is_empty() {
            return Err(TokenError::MissingSecret { kind: "access" }.into());
        }
        if config.refresh_secret.is_empty() {
            return Err(TokenError::MissingSecret { kind: "refresh" }.into());
        }
        if config.access_secret == config.refresh_secret {
            return Err(DomainError::Validation {
                message: "Refresh token secret must differ from access token secret".to_string(),
            });
        }
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::InvalidAlgorithm.into());
        }

        let mut access_validation = Validation::new(config.algorithm);
        access_validation.set_issuer(&[config.issuer.as_str()]);
        access_validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        access_validation.validate_exp = true;
        access_validation.validate_nbf = true;
        access_validation.leeway = 0;

        let mut refresh_validation = Validation::new(config.algorithm);
        refresh_validation.set_issuer(&[config.issuer.as_str()]);
        refresh_validation.set_required_spec_claims(&["iss"]);
        refresh_validation.validate_exp = false;
        refresh_validation.validate_nbf = false;

        Ok(Self {
            access_encoding_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_validation,
            refresh_validation,
            config,
        })
    }

    /// Access token lifetime in seconds, as reported to clients
    pub fn access_expires_in(&self) -> i64 {
        self.config.access_token_expiry_minutes * 60
    }

    /// Issues a signed access token for a user
    pub fn issue_access(&self, user: &User) -> Result<String, DomainError> {
        self.issue_access_at(user, Utc::now())
    }

    pub(crate) fn issue_access_at(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let claims = AccessClaims::new(
            user,
            &self.config.issuer,
            Duration::minutes(self.config.access_token_expiry_minutes),
            now,
        );
        self.encode_jwt(&claims, &self.access_encoding_key)
    }

    /// Issues a signed refresh token and returns it with its expiry
    pub fn issue_refresh(&self) -> Result<(String, DateTime<Utc>), DomainError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(self.config.refresh_token_expiry_days);
        let claims = RefreshClaims::new(&self.config.issuer, expires_at, now);
        let token = self.encode_jwt(&claims, &self.refresh_encoding_key)?;
        Ok((token, expires_at))
    }

    /// Issues an access/refresh pair for a user
    ///
    /// The returned `RefreshToken` is not persisted; saving it is the
    /// caller's job.
    pub fn issue_token_pair(&self, user: &User) -> Result<(TokenPair, RefreshToken), DomainError> {
        let access_token = self.issue_access(user)?;
        let (refresh_token, expires_at) = self.issue_refresh()?;

        let record = RefreshToken::new(refresh_token.clone(), user.id, expires_at);
        Ok((
            TokenPair {
                access_token,
                refresh_token,
            },
            record,
        ))
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(AccessClaims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is malformed, badly signed, signed with an
    ///   unexpected algorithm, expired, or not yet valid
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let token_data =
            decode::<AccessClaims>(token, &self.access_decoding_key, &self.access_validation)
                .map_err(|e| map_jwt_error(&e))?;

        if token_data.claims.user_id().is_err() {
            return Err(TokenError::InvalidClaims.into());
        }
        Ok(token_data.claims)
    }

    /// Verifies a refresh token's signature, algorithm and issuer
    pub fn verify_refresh(&self, token: &str) -> Result<(), DomainError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding_key, &self.refresh_validation)
            .map(|_| ())
            .map_err(|e| map_jwt_error(&e))
    }

    /// Encodes claims into a JWT
    fn encode_jwt<T: serde::Serialize>(
        &self,
        claims: &T,
        key: &EncodingKey,
    ) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, key).map_err(|e| {
            debug!("JWT encoding failed: {}", e);
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }
}

fn map_jwt_error(error: &jsonwebtoken::errors::Error) -> DomainError {
    let token_error = match error.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::TokenExpired,
        JwtErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
        JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
        JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
            TokenError::InvalidAlgorithm
        }
        JwtErrorKind::InvalidIssuer
        | JwtErrorKind::MissingRequiredClaim(_)
        | JwtErrorKind::Json(_) => TokenError::InvalidClaims,
        _ => TokenError::InvalidTokenFormat,
    };
    DomainError::Token(token_error)
}
