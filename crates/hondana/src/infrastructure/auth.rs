use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub exp: usize,
}

pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims> {
    Ok(jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims)
}

pub fn encode_jwt(secret: &str, claims: &Claims) -> Result<String> {
    Ok(jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use super::*;

    fn exp_in(duration: Duration) -> usize {
        (SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            + duration)
            .as_secs() as usize
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let claims = Claims {
            sub: 7,
            email: "asuka@example.com".to_string(),
            exp: exp_in(Duration::from_secs(3600)),
        };

        let token = encode_jwt("pdn8QwMUTDSVfKQf", &claims).unwrap();
        let decoded = decode_jwt("pdn8QwMUTDSVfKQf", &token).unwrap();

        assert_eq!(decoded.sub, 7);
        assert_eq!(decoded.email, "asuka@example.com");
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let claims = Claims {
            sub: 7,
            email: "asuka@example.com".to_string(),
            exp: exp_in(Duration::from_secs(3600)),
        };

        let token = encode_jwt("pdn8QwMUTDSVfKQf", &claims).unwrap();

        assert!(decode_jwt("another-secret", &token).is_err());
    }
}
