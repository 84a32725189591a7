use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Claims of an access token issued by the hosted backend.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Database role, usually `authenticated`
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    /// Issued at (timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Whether `app_metadata.role` grants `role`.
    ///
    /// `user_metadata` is writable by the account holder, so it never
    /// grants anything.
    pub fn has_role(&self, role: &str) -> bool {
        self.app_metadata
            .get("role")
            .and_then(Value::as_str)
            .is_some_and(|granted| granted == role)
    }
}

/// Validates an HS256 access token and decodes its claims.
///
/// The audience is not checked; the backend issues tokens for
/// `authenticated` only.
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {e}"),
        },
    })
}

#[cfg(test)]
pub(crate) fn sign_for_test(claims: &Claims, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("test token")
}

#[cfg(test)]
pub(crate) fn test_claims(sub: Uuid, role: Option<&str>, ttl_seconds: i64) -> Claims {
    let now = jiff::Timestamp::now().as_second();
    let mut app_metadata = Map::new();
    if let Some(role) = role {
        app_metadata.insert("role".to_string(), Value::from(role));
    }
    Claims {
        sub,
        email: Some("someone@example.com".to_string()),
        role: Some("authenticated".to_string()),
        app_metadata,
        user_metadata: Map::new(),
        iat: now,
        exp: now + ttl_seconds,
    }
}
