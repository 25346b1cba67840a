use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{CurrentUser, JwtClaims};
use shared_models::entities::ApplicationUser;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn claims_for(user: &ApplicationUser, config: &AppConfig, now: DateTime<Utc>) -> JwtClaims {
    let expires_at = now + Duration::hours(config.jwt_expiry_hours);

    JwtClaims {
        sub: user.id.to_string(),
        name: user.email.clone(),
        email: user.email.clone(),
        jti: Uuid::new_v4().to_string(),
        roles: user.roles.clone(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    }
}

pub fn sign_claims(claims: &JwtClaims, jwt_secret: &str) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))
}

/// Issues a signed token for `user` expiring after the configured number of hours.
pub fn issue_token(user: &ApplicationUser, config: &AppConfig) -> Result<IssuedToken, String> {
    let now = Utc::now();
    let claims = claims_for(user, config, now);
    let token = sign_claims(&claims, &config.jwt_secret)?;

    let expires_at = DateTime::from_timestamp(claims.exp, 0)
        .unwrap_or_else(|| now + Duration::hours(config.jwt_expiry_hours));

    debug!("Issued token for user: {}", user.id);
    Ok(IssuedToken { token, expires_at })
}

pub fn validate_token(token: &str, config: &AppConfig) -> Result<CurrentUser, String> {
    if config.jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);
    validation.set_audience(&[config.jwt_audience.as_str()]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            _ => "Invalid token".to_string(),
        }
    })?;

    let user = CurrentUser::from(data.claims);
    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}
