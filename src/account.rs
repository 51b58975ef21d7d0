use std::fmt;

/// One bearer token with its position in `tokens.txt` and its assigned proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub token: String,
    pub index: usize,
    pub proxy: Option<String>,
}

impl Account {
    /// 1-based number used in log lines.
    pub fn label(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account {}", self.label())
    }
}

pub fn proxy_for(proxies: &[String], index: usize) -> Option<String> {
    match proxies.len() {
        0 => None,
        len => Some(proxies[index % len].clone()),
    }
}

pub fn build_accounts(tokens: Vec<String>, proxies: &[String]) -> Vec<Account> {
    tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| Account {
            token,
            index,
            proxy: proxy_for(proxies, index),
        })
        .collect()
}
