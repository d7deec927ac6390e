use actix_web::{FromRequest, web};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
#[cfg(test)]
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize, de::Deserializer};
use validator::Validate;

use crate::api::error;

/// Claims carried by the auth provider's access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: u64,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<uuid::Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    #[cfg(test)]
    pub fn new(sub: &uuid::Uuid, email: Option<&str>, exp: u64) -> Self {
        let now = chrono::Utc::now().timestamp() as u64;
        Claims {
            sub: *sub,
            email: email.map(str::to_string),
            iat: now,
            exp: now + exp,
            session_id: None,
            aud: None,
        }
    }

    #[cfg(test)]
    pub fn with_session(mut self, session_id: uuid::Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    #[cfg(test)]
    pub fn encode(&self, secret: &[u8]) -> Result<String, error::SystemError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, self, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }

    pub fn decode(
        token: &str,
        secret: &[u8],
        audience: Option<&str>,
    ) -> Result<Self, error::SystemError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }

    /// Seconds until the token expires, never less than one.
    pub fn remaining_ttl(&self) -> u64 {
        let now = chrono::Utc::now().timestamp() as u64;
        self.exp.saturating_sub(now).max(1)
    }
}

pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}

pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Query::<T>::from_request(req, payload);

        Box::pin(async move {
            let query = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            query.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedQuery(query.into_inner()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn claims_round_trip_through_jwt() {
        let user = uuid::Uuid::now_v7();
        let session = uuid::Uuid::now_v7();
        let token =
            Claims::new(&user, Some("a@b.io"), 600).with_session(session).encode(SECRET).unwrap();

        let claims = Claims::decode(&token, SECRET, None).unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.session_id, Some(session));
        assert_eq!(claims.email.as_deref(), Some("a@b.io"));
        assert!(claims.remaining_ttl() <= 600);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = Claims::new(&uuid::Uuid::now_v7(), None, 600).encode(SECRET).unwrap();
        assert!(Claims::decode(&token, b"other", None).is_err());
    }

    #[test]
    fn decode_enforces_audience_when_configured() {
        let mut claims = Claims::new(&uuid::Uuid::now_v7(), None, 600);
        claims.aud = Some("authenticated".into());
        let token = claims.encode(SECRET).unwrap();

        assert!(Claims::decode(&token, SECRET, Some("authenticated")).is_ok());
        assert!(Claims::decode(&token, SECRET, Some("service_role")).is_err());
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        note: Option<Option<String>>,
    }

    #[test]
    fn double_option_distinguishes_null_from_missing() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"note":null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"note":"x"}"#).unwrap();
        assert_eq!(missing.note, None);
        assert_eq!(null.note, Some(None));
        assert_eq!(set.note, Some(Some("x".into())));
    }
}
