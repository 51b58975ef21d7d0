use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    account::Account,
    api::{ClaimResult, RewardsApi},
    config::Config,
    constants::SUCCESS_CODE,
    error::ApiError,
    success,
    tasks::{spawn_recurring, AccountTasks, TaskRegistry},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub ping_interval: Duration,
    pub rewards_interval: Duration,
}

impl From<&Config> for Schedule {
    fn from(config: &Config) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            rewards_interval: config.rewards_interval(),
        }
    }
}

/// Result of one referral rewards check.
#[derive(Debug)]
pub enum ClaimOutcome {
    NothingToClaim,
    Claimed(f64),
    /// The service answered the claim with a non-success code. Retried on the next rewards tick.
    Rejected(ClaimResult),
    Failed(ApiError),
}

fn log_api_error(account: &Account, action: &str, err: &ApiError) {
    if err.is_transient() {
        tracing::warn!("Error {action} for account {}: {err}", account.label());
    } else {
        tracing::error!("Error {action} for account {}: {err}", account.label());
    }
}

pub async fn check_and_claim_rewards(api: &dyn RewardsApi, account: &Account) -> ClaimOutcome {
    let unclaimed = match api.fetch_referral_stats(account).await {
        Ok(stats) => stats.total_unclaimed_points,
        Err(ApiError::MissingData) => 0.0,
        Err(e) => {
            log_api_error(account, "checking user rewards", &e);
            return ClaimOutcome::Failed(e);
        }
    };

    if unclaimed.is_nan() || unclaimed <= 0.0 {
        return ClaimOutcome::NothingToClaim;
    }

    tracing::info!(
        "Account {} has {unclaimed} unclaimed points, trying to claim it...",
        account.label()
    );

    match api.claim_referral_points(account).await {
        Ok(reply) if reply.code == SUCCESS_CODE => {
            success!(
                "Account {} claimed successfully! Claimed {unclaimed} points",
                account.label()
            );
            ClaimOutcome::Claimed(unclaimed)
        }
        Ok(reply) => {
            tracing::warn!(
                "Account {} claim rejected, code: {} {}",
                account.label(),
                reply.code,
                reply.message
            );
            ClaimOutcome::Rejected(reply)
        }
        Err(e) => {
            log_api_error(account, "claiming points", &e);
            ClaimOutcome::Failed(e)
        }
    }
}

/// One tick of the heartbeat task: connect ping first, then the earnings snapshot.
pub async fn ping_and_check_earnings(api: &dyn RewardsApi, account: &Account) {
    match api.send_connect_heartbeat(account).await {
        Ok(reply) if reply.code == SUCCESS_CODE => {
            success!(
                "Ping successfully for account {}: {}",
                account.label(),
                reply.message
            );
        }
        Ok(reply) => tracing::warn!(
            "Ping failed to connect for account {}, code: {} {}",
            account.label(),
            reply.code,
            reply.message
        ),
        Err(e) => tracing::error!("Ping for account {} failed: {e}", account.label()),
    }

    match api.fetch_earnings(account).await {
        Ok(earnings) => success!("Earnings result for account {}: {earnings}", account.label()),
        Err(ApiError::MissingData) => tracing::warn!(
            "Earnings result for account {}: No earnings data received.",
            account.label()
        ),
        Err(e) => log_api_error(account, "fetching earnings", &e),
    }
}

/// Profile summary followed by a rewards check. Never fails: every error is logged.
pub async fn onboard(api: &dyn RewardsApi, account: &Account) -> ClaimOutcome {
    match api.fetch_user_info(account).await {
        Ok(profile) => tracing::info!("Account {} info: {profile}", account.label()),
        Err(ApiError::MissingData) => {
            tracing::debug!("Account {} returned no profile data", account.label())
        }
        Err(e) => log_api_error(account, "fetching user info", &e),
    }

    check_and_claim_rewards(api, account).await
}

/// Starts the heartbeat and rewards tasks for an onboarded account.
pub fn start_recurring(
    api: Arc<dyn RewardsApi>,
    account: Arc<Account>,
    schedule: Schedule,
    parent: &CancellationToken,
) -> AccountTasks {
    let cancel = parent.child_token();

    let ping = {
        let (api, account) = (api.clone(), account.clone());
        spawn_recurring(
            format!("ping[{}]", account.label()),
            schedule.ping_interval,
            cancel.clone(),
            move || {
                let (api, account) = (api.clone(), account.clone());
                async move { ping_and_check_earnings(api.as_ref(), &account).await }
            },
        )
    };

    let rewards = spawn_recurring(
        format!("rewards[{}]", account.label()),
        schedule.rewards_interval,
        cancel.clone(),
        move || {
            let (api, account) = (api.clone(), account.clone());
            async move {
                check_and_claim_rewards(api.as_ref(), &account).await;
            }
        },
    );

    AccountTasks::new(cancel, vec![ping, rewards])
}

/// Onboards `account`, then hands its recurring tasks to `registry`.
pub async fn run_account(
    api: Arc<dyn RewardsApi>,
    account: Account,
    schedule: Schedule,
    registry: Arc<TaskRegistry>,
    shutdown: CancellationToken,
) -> ClaimOutcome {
    let outcome = onboard(api.as_ref(), &account).await;

    if shutdown.is_cancelled() {
        return outcome;
    }

    let index = account.index;
    let label = account.label();
    let tasks = start_recurring(api, Arc::new(account), schedule, &shutdown);

    if registry.register(index, tasks) {
        tracing::warn!("Account {label} was already running, previous tasks were cancelled");
    }

    outcome
}
