use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use crate::{CrossTokenClaims, JwtError};

/// Value of the `iss` claim on every cross-token.
pub const CROSS_TOKEN_ISSUER: &str = "sincla-hub";

/// Lifetime of a cross-token in seconds.
pub const CROSS_TOKEN_TTL_SECS: i64 = 300;

/// Signs cross-token claims with HS256.
///
/// The caller is responsible for filling `iat`, `exp` and `iss`.
pub fn sign_cross_token(claims: &CrossTokenClaims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).map_err(JwtError::from)
}

/// Verifies a cross-token and returns its claims.
///
/// # Arguments
/// * `token` - The JWT token string
/// * `secret` - Shared signing secret
/// * `leeway_seconds` - Tolerance for clock skew on `exp` (the hub itself uses 0)
///
/// # Returns
/// The verified `CrossTokenClaims` or a `JwtError`. Structural problems map to
/// `JwtError::InvalidFormat`; signature, expiry and issuer failures map to their
/// own variants.
pub fn verify_cross_token(
    token: &str,
    secret: &str,
    leeway_seconds: u64,
) -> Result<CrossTokenClaims, JwtError> {
    if token.trim().is_empty() {
        return Err(JwtError::InvalidFormat("empty token".into()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway_seconds;
    validation.set_issuer(&[CROSS_TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let token_data = decode::<CrossTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(classify)?;

    Ok(token_data.claims)
}

fn classify(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::InvalidIssuer => JwtError::InvalidClaims("unexpected issuer".into()),
        ErrorKind::MissingRequiredClaim(claim) => {
            JwtError::InvalidClaims(format!("missing claim {claim}"))
        }
        ErrorKind::InvalidToken
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => JwtError::InvalidFormat(err.to_string()),
        _ => JwtError::Library(err),
    }
}
