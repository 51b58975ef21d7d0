#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use depined_pinger::{
    account::Account,
    api::{
        ClaimResult, ConnectionPingResult, EarningsSnapshot, Ident, ReferralStats, RewardsApi,
        UserProfile,
    },
    error::{ApiError, ApiResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    UserInfo,
    ReferralStats,
    Earnings,
    Heartbeat,
    Claim,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserInfoMode {
    Ok,
    Missing,
    Timeout,
}

/// Scripted `RewardsApi` that records every call it receives.
pub struct StubApi {
    pub user_info: UserInfoMode,
    pub unclaimed: Mutex<f64>,
    pub claim_code: i64,
    pub calls: Mutex<Vec<(usize, Call)>>,
    pub proxies_seen: Mutex<Vec<(usize, Option<String>)>>,
}

impl Default for StubApi {
    fn default() -> Self {
        Self {
            user_info: UserInfoMode::Ok,
            unclaimed: Mutex::new(0.0),
            claim_code: 200,
            calls: Mutex::new(vec![]),
            proxies_seen: Mutex::new(vec![]),
        }
    }
}

impl StubApi {
    pub fn with_unclaimed(points: f64) -> Self {
        Self {
            unclaimed: Mutex::new(points),
            ..Self::default()
        }
    }

    fn record(&self, account: &Account, call: Call) {
        self.calls.lock().unwrap().push((account.index, call));
        self.proxies_seen
            .lock()
            .unwrap()
            .push((account.index, account.proxy.clone()));
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| *c == call)
            .count()
    }

    pub fn calls_for(&self, index: usize) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, c)| *c)
            .collect()
    }
}

#[async_trait]
impl RewardsApi for StubApi {
    async fn fetch_user_info(&self, account: &Account) -> ApiResult<UserProfile> {
        self.record(account, Call::UserInfo);

        match self.user_info {
            UserInfoMode::Ok => Ok(UserProfile {
                email: format!("user{}@example.com", account.index),
                verified: true,
                current_tier: Some(Ident::Text("Bronze".to_string())),
                points_balance: 10.0,
            }),
            UserInfoMode::Missing => Err(ApiError::MissingData),
            UserInfoMode::Timeout => Err(ApiError::Timeout),
        }
    }

    async fn fetch_referral_stats(&self, account: &Account) -> ApiResult<ReferralStats> {
        self.record(account, Call::ReferralStats);

        Ok(ReferralStats {
            total_unclaimed_points: *self.unclaimed.lock().unwrap(),
        })
    }

    async fn fetch_earnings(&self, account: &Account) -> ApiResult<EarningsSnapshot> {
        self.record(account, Call::Earnings);

        Ok(EarningsSnapshot {
            earnings: 1.0,
            epoch: Ident::Number(7),
        })
    }

    async fn send_connect_heartbeat(&self, account: &Account) -> ApiResult<ConnectionPingResult> {
        self.record(account, Call::Heartbeat);

        Ok(ConnectionPingResult {
            code: 200,
            message: "connected".to_string(),
        })
    }

    async fn claim_referral_points(&self, account: &Account) -> ApiResult<ClaimResult> {
        self.record(account, Call::Claim);

        if self.claim_code == 200 {
            *self.unclaimed.lock().unwrap() = 0.0;
        }

        Ok(ClaimResult {
            code: self.claim_code,
            message: "done".to_string(),
        })
    }
}

pub fn account(index: usize, proxy: Option<&str>) -> Account {
    Account {
        token: format!("token-{index}"),
        index,
        proxy: proxy.map(str::to_string),
    }
}
