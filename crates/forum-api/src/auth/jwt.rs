use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Name of the private cookie carrying the session token
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

/// Verify and decode an HS256 session token
pub fn verify_jwt_token(
    token: &str,
    jwt_secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
