//! Authentication endpoint contract.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use myesi_core::result::AppResult;
use myesi_entity::user::{Credentials, Identity};

/// Remote authentication endpoint consumed by [`SessionManager`].
///
/// Implementations map a rejected login to `InvalidCredentials` (HTTP 401) or
/// `AccountDisabled` (HTTP 403) carrying the client-facing message, and
/// transport problems to `Network`/`Timeout`.
///
/// [`SessionManager`]: super::SessionManager
#[async_trait]
pub trait AuthGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange credentials for an access token.
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse>;

    /// Notify the endpoint that the session ended.
    async fn logout(&self, access_token: Option<&str>) -> AppResult<()>;

    /// Fetch the profile of the account owning `access_token`.
    async fn profile(&self, access_token: &str) -> AppResult<Identity>;
}

/// Identity fields as returned next to the token. Any of them may be absent,
/// in which case the token claims fill the gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    /// Account id; numeric ids are accepted and kept as strings.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<&Identity> for UserPayload {
    fn from(identity: &Identity) -> Self {
        Self {
            id: Some(identity.id.clone()),
            email: Some(identity.email.clone()),
            name: Some(identity.name.clone()),
            role: Some(identity.role.clone()),
        }
    }
}

fn deserialize_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    }))
}

/// Successful login exchange.
///
/// Two response shapes are accepted: the flat `{access_token, user}` of the
/// demo backend and the enveloped `{data: {accessToken, refreshToken, user}}`
/// of the REST backend. Serializes as the flat shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLoginResponse")]
pub struct LoginResponse {
    /// Access token to persist.
    pub access_token: String,
    /// Refresh token, when the backend issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Identity as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserPayload>,
}

impl LoginResponse {
    /// A flat response carrying a token and its identity.
    pub fn new(access_token: impl Into<String>, user: Option<UserPayload>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            user,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLoginResponse {
    Enveloped {
        data: EnvelopeData,
    },
    Flat {
        #[serde(alias = "accessToken")]
        access_token: String,
        #[serde(default, alias = "refreshToken")]
        refresh_token: Option<String>,
        #[serde(default)]
        user: Option<UserPayload>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeData {
    #[serde(alias = "access_token")]
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<UserPayload>,
}

impl From<RawLoginResponse> for LoginResponse {
    fn from(raw: RawLoginResponse) -> Self {
        match raw {
            RawLoginResponse::Enveloped { data } => Self {
                access_token: data.access_token,
                refresh_token: data.refresh_token,
                user: data.user,
            },
            RawLoginResponse::Flat {
                access_token,
                refresh_token,
                user,
            } => Self {
                access_token,
                refresh_token,
                user,
            },
        }
    }
}
