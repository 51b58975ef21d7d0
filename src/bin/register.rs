//! Creates service accounts from `accounts.txt` (`email:password` per line)
//! and appends their login tokens to the tokens file.

use std::{sync::Arc, time::Duration};

use depined_pinger::{
    api::DepinedClient,
    config::Config,
    constants::{ACCOUNTS_FILE_PATH, BANNER},
    http::ClientPool,
    logger::init_default_logger,
    success,
    utils::{append_line, delay, load_lines},
};

const BETWEEN_ACCOUNTS_DELAY: Duration = Duration::from_secs(2);

fn parse_credentials(line: &str) -> Option<(&str, &str)> {
    let (email, password) = line.split_once(':')?;
    let (email, password) = (email.trim(), password.trim());

    (!email.is_empty() && !password.is_empty()).then_some((email, password))
}

async fn register_account(
    client: &DepinedClient,
    config: &Config,
    email: &str,
    password: &str,
) -> eyre::Result<()> {
    // Existing accounts fail to register but can still log in.
    let _ = client.register(email, password).await;

    let token = client.login(email, password).await?.token;

    if let Some(code) = &config.referral_code {
        client.confirm_referral(&token, code).await?;
    }

    append_line(&config.tokens_file, &token).await?;
    success!("Token for {email} saved to {}", config.tokens_file);

    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let config = Config::read_default().await?;

    tracing::info!("{BANNER}");
    delay(config.startup_delay()).await;

    let accounts = load_lines(ACCOUNTS_FILE_PATH).await;
    if accounts.is_empty() {
        tracing::error!("No accounts found in {ACCOUNTS_FILE_PATH}");
        return Ok(());
    }

    let pool = Arc::new(ClientPool::new(config.request_timeout()));
    let client = DepinedClient::new(config.base_url.clone(), pool);

    for (index, line) in accounts.iter().enumerate() {
        let Some((email, password)) = parse_credentials(line) else {
            tracing::warn!("Skipping malformed line {} in {ACCOUNTS_FILE_PATH}", index + 1);
            continue;
        };

        if let Err(e) = register_account(&client, &config, email, password).await {
            tracing::error!("Failed to set up account {email}: {e}");
        }

        delay(BETWEEN_ACCOUNTS_DELAY).await;
    }

    Ok(())
}
