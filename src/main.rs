mod sync;

use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let token = match std::env::var("SLACK_BOT_TOKEN") {
        Ok(token) if !token.trim().is_empty() => token,
        _ => {
            error!("missing SLACK_BOT_TOKEN in environment (or .env)");
            return ExitCode::FAILURE;
        }
    };

    match sync::run_sync(&token) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("sync failed: {err}");
            ExitCode::FAILURE
        }
    }
}
