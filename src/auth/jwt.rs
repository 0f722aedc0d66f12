use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Verifies a backend-issued token and returns its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

/// Like [`verify_token`] but rejects refresh tokens.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = verify_token(token, secret)?;
    if claims.token_type != TokenType::Access {
        return Err("Refresh token cannot be used for API calls".to_string());
    }
    Ok(claims)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::model::role::Role;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn token_for(user_id: u64, role: Role, token_type: TokenType, secret: &str) -> String {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as usize;
        let claims = Claims {
            user_id,
            sub: format!("user{user_id}"),
            role,
            exp: now + 900,
            jti: uuid::Uuid::new_v4().to_string(),
            token_type,
            employee_id: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_access_token() {
        let token = token_for(3, Role::Manager, TokenType::Access, "s3cret");
        let claims = verify_access_token(&token, "s3cret").unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.role, Role::Manager);
    }

    #[test]
    fn rejects_refresh_token_and_wrong_secret() {
        let refresh = token_for(3, Role::User, TokenType::Refresh, "s3cret");
        assert!(verify_access_token(&refresh, "s3cret").is_err());

        let access = token_for(3, Role::User, TokenType::Access, "s3cret");
        assert!(verify_access_token(&access, "other").is_err());
    }
}
