use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    account::Account,
    constants::{
        CLAIM_POINTS_PATH, CONFIRM_REFERRAL_PATH, EPOCH_EARNINGS_PATH, LOGIN_PATH,
        PROFILE_CREATION_PATH, REFERRAL_STATS_PATH, REGISTER_PATH, USER_DETAILS_PATH,
        WIDGET_CONNECT_PATH,
    },
    error::{ApiError, ApiResult},
    http::{send_http_request, ClientPool, RequestParams},
};

/// Common response wrapper used by every endpoint of the service.
#[derive(Deserialize, Debug, Clone)]
pub struct Envelope<T> {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> ApiResult<T> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Epochs and tiers arrive either as numbers or as strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Ident {
    Number(i64),
    Text(String),
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub verified: bool,
    pub current_tier: Option<Ident>,
    #[serde(default)]
    pub points_balance: f64,
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tier = self
            .current_tier
            .as_ref()
            .map_or_else(|| "-".to_string(), Ident::to_string);

        write!(
            f,
            "Email: {} | Tier: {} | Points: {:.2} | Verified: {}",
            self.email, tier, self.points_balance, self.verified
        )
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferralStats {
    #[serde(default)]
    pub total_unclaimed_points: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EarningsSnapshot {
    #[serde(default)]
    pub earnings: f64,
    pub epoch: Ident,
}

impl fmt::Display for EarningsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Points: {:.2} | Epoch: {}", self.earnings, self.epoch)
    }
}

/// `{code, message}` reply of the heartbeat and claim endpoints.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StatusReply {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

pub type ConnectionPingResult = StatusReply;
pub type ClaimResult = StatusReply;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoginData {
    pub token: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ReferralCode<'a> {
    referral_code: &'a str,
}

#[derive(Serialize)]
struct WidgetConnect {
    connected: bool,
}

#[derive(Serialize)]
struct Empty {}

/// The operations the account scheduler drives on the rewards service.
#[async_trait]
pub trait RewardsApi: Send + Sync {
    async fn fetch_user_info(&self, account: &Account) -> ApiResult<UserProfile>;

    async fn fetch_referral_stats(&self, account: &Account) -> ApiResult<ReferralStats>;

    async fn fetch_earnings(&self, account: &Account) -> ApiResult<EarningsSnapshot>;

    async fn send_connect_heartbeat(&self, account: &Account) -> ApiResult<ConnectionPingResult>;

    async fn claim_referral_points(&self, account: &Account) -> ApiResult<ClaimResult>;
}

/// HTTP implementation of [`RewardsApi`] against the live service.
pub struct DepinedClient {
    base_url: String,
    pool: Arc<ClientPool>,
}

impl DepinedClient {
    pub fn new(base_url: impl Into<String>, pool: Arc<ClientPool>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            pool,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        proxy: Option<&str>,
        request_params: &RequestParams<'_, impl Serialize>,
    ) -> ApiResult<T> {
        let client = self.pool.get(proxy);
        let text = send_http_request(&client, request_params).await?;

        Ok(serde_json::from_str(&text)?)
    }

    async fn get_data<T: DeserializeOwned>(&self, account: &Account, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        let envelope: Envelope<T> = self
            .call(
                account.proxy.as_deref(),
                &RequestParams::get(&url, &account.token),
            )
            .await?;

        envelope.into_data()
    }

    async fn post_status(
        &self,
        account: &Account,
        path: &str,
        body: impl Serialize,
    ) -> ApiResult<StatusReply> {
        let url = self.url(path);

        self.call(
            account.proxy.as_deref(),
            &RequestParams::post(&url, body, Some(&account.token)),
        )
        .await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        let url = self.url(REGISTER_PATH);
        let response: Envelope<serde_json::Value> = self
            .call(
                None,
                &RequestParams::post(&url, Credentials { email, password }, None),
            )
            .await
            .inspect_err(|e| tracing::error!("Error registering user {email}: {e}"))?;

        tracing::info!(
            "User {email} registered: {}",
            response.message.as_deref().unwrap_or_default()
        );
        Ok(response)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginData> {
        let url = self.url(LOGIN_PATH);
        let response: Envelope<LoginData> = self
            .call(
                None,
                &RequestParams::post(&url, Credentials { email, password }, None),
            )
            .await
            .inspect_err(|e| tracing::error!("Error logging in user {email}: {e}"))?;

        tracing::info!(
            "User {email} logged in: {}",
            response.message.as_deref().unwrap_or_default()
        );
        response.into_data()
    }

    pub async fn create_profile(
        &self,
        token: &str,
        payload: &impl Serialize,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        let url = self.url(PROFILE_CREATION_PATH);

        self.call(None, &RequestParams::post(&url, payload, Some(token)))
            .await
            .inspect(|_| tracing::info!("Profile created successfully"))
            .inspect_err(|e| tracing::error!("Error creating profile: {e}"))
    }

    pub async fn confirm_referral(
        &self,
        token: &str,
        referral_code: &str,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        let url = self.url(CONFIRM_REFERRAL_PATH);
        let response: Envelope<serde_json::Value> = self
            .call(
                None,
                &RequestParams::post(&url, ReferralCode { referral_code }, Some(token)),
            )
            .await
            .inspect_err(|e| tracing::error!("Error confirming referral {referral_code}: {e}"))?;

        tracing::info!(
            "Referral {referral_code} confirmed: {}",
            response.message.as_deref().unwrap_or_default()
        );
        Ok(response)
    }
}

#[async_trait]
impl RewardsApi for DepinedClient {
    async fn fetch_user_info(&self, account: &Account) -> ApiResult<UserProfile> {
        self.get_data(account, USER_DETAILS_PATH)
            .await
            .inspect_err(|e| tracing::debug!("User info request for {account} failed: {e}"))
    }

    async fn fetch_referral_stats(&self, account: &Account) -> ApiResult<ReferralStats> {
        self.get_data(account, REFERRAL_STATS_PATH)
            .await
            .inspect_err(|e| tracing::debug!("Referral stats request for {account} failed: {e}"))
    }

    async fn fetch_earnings(&self, account: &Account) -> ApiResult<EarningsSnapshot> {
        self.get_data(account, EPOCH_EARNINGS_PATH)
            .await
            .inspect_err(|e| tracing::debug!("Earnings request for {account} failed: {e}"))
    }

    async fn send_connect_heartbeat(&self, account: &Account) -> ApiResult<ConnectionPingResult> {
        self.post_status(account, WIDGET_CONNECT_PATH, WidgetConnect { connected: true })
            .await
            .inspect_err(|e| tracing::debug!("Heartbeat for {account} failed: {e}"))
    }

    async fn claim_referral_points(&self, account: &Account) -> ApiResult<ClaimResult> {
        self.post_status(account, CLAIM_POINTS_PATH, Empty {})
            .await
            .inspect_err(|e| tracing::debug!("Claim request for {account} failed: {e}"))
    }
}
