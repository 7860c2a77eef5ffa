//! Bearer token guard.
//!
//! Tokens are issued elsewhere; this side only verifies them and exposes the
//! resulting `Principal` to handlers through request extensions.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token carries no subject")]
    MissingSubject,
}

pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<Value>,
    id: Option<Value>,
    email: Option<String>,
    role: Option<String>,
}

/// HS256 verifier; `exp` is mandatory.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }
}

fn subject(v: Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| AuthError::Invalid(e.to_string()))?;
        let c = data.claims;
        let id = c.sub.and_then(subject).or_else(|| c.id.and_then(subject)).ok_or(AuthError::MissingSubject)?;
        Ok(Principal { id, email: c.email, role: c.role })
    }
}

/// Route layer: require `Authorization: Bearer <jwt>`.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = match header.and_then(|h| h.strip_prefix("Bearer ")).map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => {
            warn!(%path, "missing or malformed Authorization header");
            return Err(JsonApiError::unauthorized("Unauthorized"));
        }
    };
    match state.verifier.verify(&token) {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(%path, error = %e, "token validation failed");
            Err(JsonApiError::unauthorized("Unauthorized"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(claims: Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn future_exp() -> u64 {
        jsonwebtoken::get_current_timestamp() + 3600
    }

    #[test]
    fn accepts_sub_or_numeric_id() {
        let v = JwtVerifier::new("k");
        let p = v.verify(&token(json!({"sub": "u-1", "email": "a@b.c", "exp": future_exp()}), "k")).unwrap();
        assert_eq!(p.id, "u-1");
        assert_eq!(p.email.as_deref(), Some("a@b.c"));
        let p = v.verify(&token(json!({"id": 42, "role": "admin", "exp": future_exp()}), "k")).unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.role.as_deref(), Some("admin"));
    }

    #[test]
    fn rejects_bad_signature_expiry_and_missing_subject() {
        let v = JwtVerifier::new("k");
        assert!(v.verify(&token(json!({"sub": "x", "exp": future_exp()}), "other")).is_err());
        assert!(v.verify(&token(json!({"sub": "x", "exp": 1_000}), "k")).is_err());
        assert!(v.verify(&token(json!({"sub": "x"}), "k")).is_err());
        assert!(matches!(v.verify(&token(json!({"exp": future_exp()}), "k")), Err(AuthError::MissingSubject)));
    }
}
