mod lang;
mod stat;
mod tui;

use anyhow::{Result, anyhow};
use stat::Period;
use stat::sync::Api;
use tracing_subscriber::EnvFilter;
use tui::app::{DEFAULT_END, DEFAULT_START};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

fn parse_period_arg(arg: Option<String>, default: Period) -> Result<Period> {
    match arg {
        None => Ok(default),
        Some(s) => Period::parse(&s).ok_or_else(|| anyhow!("invalid period '{s}', expected YYYY/MM")),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // the terminal belongs to the TUI; logs go to stderr only when asked for
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let base_url =
        std::env::var("INFLATION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    let mut args = std::env::args().skip(1);
    let start = parse_period_arg(args.next(), DEFAULT_START)?;
    let end = parse_period_arg(args.next(), DEFAULT_END)?;
    tracing::info!(%base_url, %start, %end, "starting calculator");

    tui::run_tui(tui::App::new(Api::new(&base_url), start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_args_fall_back_to_defaults() {
        assert_eq!(parse_period_arg(None, DEFAULT_START).unwrap(), DEFAULT_START);
        assert_eq!(
            parse_period_arg(Some("2023/04".into()), DEFAULT_END).unwrap(),
            Period::new(2023, 4)
        );
        assert!(parse_period_arg(Some("04/2023".into()), DEFAULT_END).is_err());
    }
}
