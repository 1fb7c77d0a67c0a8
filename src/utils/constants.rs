use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::env as std_env;

lazy_static! {
    pub static ref DATABASE_URL: Option<Secret<String>> = get_db_url();
    pub static ref APP_ADDRESS: String =
        load_or_default(env::APP_ADDRESS_ENV_VAR, prod::APP_ADDRESS);
    pub static ref ALLOWED_ORIGINS: Vec<String> = load_or_default(
        env::ALLOWED_ORIGINS_ENV_VAR,
        DEFAULT_ALLOWED_ORIGINS
    )
    .split(',')
    .map(|origin| origin.trim().to_owned())
    .filter(|origin| !origin.is_empty())
    .collect();
}

fn load_env() {
    dotenv().ok();
}

/// `None` selects the in-memory ledger.
fn get_db_url() -> Option<Secret<String>> {
    load_env();
    std_env::var(env::DATABASE_URL_ENV_VAR)
        .ok()
        .filter(|url| !url.is_empty())
        .map(Secret::new)
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) if !value.is_empty() => value,
        _ => String::from(default_value),
    }
}

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const APP_ADDRESS_ENV_VAR: &str = "APP_ADDRESS";
    pub const ALLOWED_ORIGINS_ENV_VAR: &str = "ALLOWED_ORIGINS";
}

pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,http://127.0.0.1:3000";

/// Credits pledged by one click on the board page.
pub const PRESENTER_PLEDGE_AMOUNT: i64 = 10;

/// Members inserted at boot when absent: (id, name, credits).
pub const STARTER_MEMBERS: [(i64, &str, i64); 3] =
    [(1, "Alice", 100), (2, "Bob", 100), (3, "Charlie", 100)];

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const MAX_DB_CONNECTIONS: u32 = 5;
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}
