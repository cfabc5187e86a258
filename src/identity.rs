//! 外部身份校验
//!
//! 外部身份提供方签发的 ID token 是一个 JWT。这里只做离线校验：签名、
//! 过期时间、audience（应为本系统的 client id）以及可选的 issuer。

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::str::FromStr;

use crate::config::IdentityConfig;
use crate::errors::{PortalError, Result};

/// 校验通过后的外部身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    // 部分提供方以字符串 "true" 返回
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
}

impl IdTokenClaims {
    fn into_identity(self) -> ExternalIdentity {
        let email_verified = match self.email_verified {
            Some(serde_json::Value::Bool(v)) => v,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        };
        ExternalIdentity {
            subject: self.sub,
            email: self.email.filter(|e| !e.trim().is_empty()),
            email_verified,
            name: self.name.filter(|n| !n.trim().is_empty()),
        }
    }
}

pub struct JwtIdentityVerifier {
    keys: std::result::Result<(DecodingKey, Validation), String>,
}

impl JwtIdentityVerifier {
    /// 根据配置构造；配置不完整时仍可构造，但每次校验都会返回提供方错误
    pub fn from_config(config: &IdentityConfig) -> Self {
        Self {
            keys: Self::build_keys(config),
        }
    }

    fn build_keys(
        config: &IdentityConfig,
    ) -> std::result::Result<(DecodingKey, Validation), String> {
        if config.client_id.trim().is_empty() {
            return Err("External identity client id is not configured".to_string());
        }
        if config.verification_key.trim().is_empty() {
            return Err("External identity verification key is not configured".to_string());
        }

        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| format!("Unsupported identity algorithm: {}", config.algorithm))?;
        let key_bytes = config.verification_key.as_bytes();
        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                DecodingKey::from_secret(key_bytes)
            }
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(key_bytes)
                .map_err(|e| format!("Invalid RSA verification key: {e}"))?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key_bytes)
                .map_err(|e| format!("Invalid EC verification key: {e}"))?,
            Algorithm::EdDSA => DecodingKey::from_ed_pem(key_bytes)
                .map_err(|e| format!("Invalid EdDSA verification key: {e}"))?,
        };

        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[config.client_id.as_str()]);
        if !config.issuers.is_empty() {
            validation.set_issuer(&config.issuers);
        }

        Ok((key, validation))
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity> {
        let (key, validation) = self
            .keys
            .as_ref()
            .map_err(|msg| PortalError::identity_provider(msg.clone()))?;

        let data = decode::<IdTokenClaims>(credential, key, validation).map_err(|e| {
            PortalError::authentication(format!("Invalid identity credential: {e}"))
        })?;

        Ok(data.claims.into_identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "identity-test-secret";

    fn hs256_config() -> IdentityConfig {
        IdentityConfig {
            client_id: "portal-client".to_string(),
            issuers: vec!["https://id.example.com".to_string()],
            verification_key: SECRET.to_string(),
            algorithm: "HS256".to_string(),
            require_verified_email: true,
        }
    }

    fn sign(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("sign")
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 600
    }

    #[actix_web::test]
    async fn test_valid_credential() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config());
        let token = sign(json!({
            "sub": "ext-123",
            "email": "ada@example.com",
            "email_verified": "true",
            "name": "Ada Lovelace",
            "aud": "portal-client",
            "iss": "https://id.example.com",
            "exp": exp(),
        }));

        let identity = verifier.verify(&token).await.expect("should verify");
        assert_eq!(identity.subject, "ext-123");
        assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
        assert!(identity.email_verified);
        assert_eq!(identity.name.as_deref(), Some("Ada Lovelace"));
    }

    #[actix_web::test]
    async fn test_wrong_audience_is_authentication_error() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config());
        let token = sign(json!({
            "sub": "ext-123",
            "aud": "someone-else",
            "iss": "https://id.example.com",
            "exp": exp(),
        }));

        let err = verifier.verify(&token).await.expect_err("audience mismatch");
        assert!(matches!(err, PortalError::Authentication(_)));
    }

    #[actix_web::test]
    async fn test_unverified_email_flag() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config());
        let token = sign(json!({
            "sub": "ext-9",
            "email": "x@example.com",
            "aud": "portal-client",
            "iss": "https://id.example.com",
            "exp": exp(),
        }));

        let identity = verifier.verify(&token).await.expect("should verify");
        assert!(!identity.email_verified);
    }

    #[actix_web::test]
    async fn test_unconfigured_verifier_is_provider_error() {
        let mut config = hs256_config();
        config.client_id = String::new();
        let verifier = JwtIdentityVerifier::from_config(&config);

        let err = verifier.verify("anything").await.expect_err("unconfigured");
        assert!(matches!(err, PortalError::IdentityProvider(_)));
        assert_eq!(err.status_code(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
