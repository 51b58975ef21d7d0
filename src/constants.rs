pub const BASE_URL: &str = "https://api.depined.org";
pub const APP_ORIGIN: &str = "https://app.depined.org";

// ENDPOINTS
pub const REGISTER_PATH: &str = "/api/user/register";
pub const LOGIN_PATH: &str = "/api/user/login";
pub const PROFILE_CREATION_PATH: &str = "/api/user/profile-creation";
pub const CONFIRM_REFERRAL_PATH: &str = "/api/access-code/referal";
pub const USER_DETAILS_PATH: &str = "/api/user/details";
pub const REFERRAL_STATS_PATH: &str = "/api/referrals/stats";
pub const EPOCH_EARNINGS_PATH: &str = "/api/stats/epoch-earnings";
pub const WIDGET_CONNECT_PATH: &str = "/api/user/widget-connect";
pub const CLAIM_POINTS_PATH: &str = "/api/referrals/claim_points";

// FILES
pub const TOKENS_FILE_PATH: &str = "tokens.txt";
pub const PROXIES_FILE_PATH: &str = "proxy.txt";
pub const ACCOUNTS_FILE_PATH: &str = "accounts.txt";

// SCHEDULE (seconds)
pub const PING_INTERVAL_SECS: u64 = 30;
pub const REWARDS_INTERVAL_SECS: u64 = 60 * 60 * 24;
pub const RESTART_DELAY_SECS: u64 = 60;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const STARTUP_DELAY_SECS: u64 = 3;

/// Response code the service reports for an accepted heartbeat or claim.
pub const SUCCESS_CODE: i64 = 200;

pub const BANNER: &str = r#"
  ____             _                _   ____  _
 |  _ \  ___ _ __ (_)_ __   ___  __| | |  _ \(_)_ __   __ _  ___ _ __
 | | | |/ _ \ '_ \| | '_ \ / _ \/ _` | | |_) | | '_ \ / _` |/ _ \ '__|
 | |_| |  __/ |_) | | | | |  __/ (_| | |  __/| | | | | (_| |  __/ |
 |____/ \___| .__/|_|_| |_|\___|\__,_| |_|   |_|_| |_|\__, |\___|_|
            |_|                                       |___/
"#;
