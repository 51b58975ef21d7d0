use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    account::build_accounts,
    api::RewardsApi,
    config::Config,
    scheduler::{run_account, Schedule},
    tasks::TaskRegistry,
    utils::{delay, load_lines},
};

#[derive(Debug, PartialEq, Eq)]
pub enum PassOutcome {
    NoTokens,
    Started { accounts: usize },
}

/// Loads the account files, onboards every account and keeps their
/// recurring tasks alive until shutdown.
pub struct Supervisor {
    config: Config,
    api: Arc<dyn RewardsApi>,
    registry: Arc<TaskRegistry>,
    shutdown: CancellationToken,
}

impl Supervisor {
    pub fn new(config: Config, api: Arc<dyn RewardsApi>) -> Self {
        Self {
            config,
            api,
            registry: Arc::new(TaskRegistry::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn registry(&self) -> Arc<TaskRegistry> {
        self.registry.clone()
    }

    /// One full pass: load files, onboard all accounts concurrently and wait
    /// for onboarding to settle. Recurring tasks keep running afterwards.
    pub async fn run_pass(&self) -> eyre::Result<PassOutcome> {
        let tokens = load_lines(&self.config.tokens_file).await;
        if tokens.is_empty() {
            tracing::error!("No tokens found in {}", self.config.tokens_file);
            return Ok(PassOutcome::NoTokens);
        }

        let proxies = load_lines(&self.config.proxies_file).await;
        if proxies.is_empty() {
            tracing::warn!("Running without proxy...");
        }

        let accounts = build_accounts(tokens, &proxies);
        let total = accounts.len();
        tracing::info!("Starting program for all accounts: {total}");

        let schedule = Schedule::from(&self.config);
        let mut handles = JoinSet::new();

        for account in accounts {
            handles.spawn(run_account(
                self.api.clone(),
                account,
                schedule,
                self.registry.clone(),
                self.shutdown.clone(),
            ));
        }

        let mut failed = 0;
        while let Some(res) = handles.join_next().await {
            if let Err(e) = res {
                tracing::error!("Onboarding task failed: {e}");
                failed += 1;
            }
        }

        if failed > 0 {
            eyre::bail!("{failed} of {total} accounts failed to onboard");
        }

        Ok(PassOutcome::Started { accounts: total })
    }

    /// Runs passes until one succeeds, then waits for shutdown and stops every task.
    pub async fn run(&self) -> eyre::Result<()> {
        loop {
            let outcome = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                outcome = self.run_pass() => outcome,
            };

            match outcome {
                Ok(PassOutcome::Started { accounts }) => {
                    tracing::info!("All {accounts} accounts onboarded, running scheduled tasks");
                    self.shutdown.cancelled().await;
                    break;
                }
                Ok(PassOutcome::NoTokens) => {}
                Err(e) => tracing::error!("Error in main loop: {e}"),
            }

            tracing::info!(
                "Restarting in {} seconds...",
                self.config.restart_delay().as_secs()
            );
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = delay(self.config.restart_delay()) => {}
            }
        }

        let stopped = self.registry.shutdown();
        tracing::info!("Stopped scheduled tasks for {stopped} accounts");

        Ok(())
    }
}

async fn wait_for_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|_| "SIGINT")
    }
}

/// Cancels `shutdown` on SIGINT or SIGTERM.
pub fn spawn_signal_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                tracing::warn!(
                    "Process received termination signal ({signal}). Cleaning up and exiting..."
                );
                shutdown.cancel();
            }
            Err(err) => tracing::error!("Unable to listen for shutdown signal: {err}"),
        }
    });
}
