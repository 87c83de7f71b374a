use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use dydx_book_client::config_loader::AppConfig;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn test_defaults_when_no_file_exists() -> Result<()> {
    let config = AppConfig::load_or_default(&[Path::new("/nonexistent/config.toml")])?;

    assert_eq!(config.feed.ws_url, "wss://indexer.dydx.trade/v4/ws");
    assert_eq!(config.feed.market, "ETH-USD");
    assert!(config.book.uncross);

    Ok(())
}

#[test]
fn test_partial_file_fills_remaining_defaults() -> Result<()> {
    let path = temp_config(
        "dydx_book_client_partial.toml",
        "[feed]\nmarket = \"BTC-USD\"\n",
    );

    let config = AppConfig::from_file(&path);
    fs::remove_file(&path).ok();
    let config = config?;

    assert_eq!(config.feed.market, "BTC-USD");
    assert_eq!(config.feed.ws_url, "wss://indexer.dydx.trade/v4/ws");
    assert!(config.book.uncross);

    Ok(())
}

#[test]
fn test_full_file_overrides_every_default() -> Result<()> {
    let path = temp_config(
        "dydx_book_client_full.toml",
        concat!(
            "[feed]\n",
            "ws_url = \"wss://indexer.v4testnet.dydx.exchange/v4/ws\"\n",
            "market = \"SOL-USD\"\n",
            "[book]\n",
            "uncross = false\n",
        ),
    );

    let config = AppConfig::from_file(&path);
    fs::remove_file(&path).ok();
    let config = config?;

    assert_eq!(config.feed.ws_url, "wss://indexer.v4testnet.dydx.exchange/v4/ws");
    assert_eq!(config.feed.market, "SOL-USD");
    assert!(!config.book.uncross);

    Ok(())
}

#[test]
fn test_unparseable_file_is_an_error_not_defaults() {
    let path = temp_config(
        "dydx_book_client_broken.toml",
        "[book]\nuncross = flase\n",
    );

    // An existing file that fails to parse must never be silently replaced
    // by defaults: the user would run with settings they never chose.
    let result = AppConfig::load_or_default(&[path.as_path()]);
    fs::remove_file(&path).ok();

    assert!(result.is_err());
}

#[test]
fn test_probe_falls_through_to_existing_path() -> Result<()> {
    let path = temp_config(
        "dydx_book_client_alternate.toml",
        "[feed]\nmarket = \"AVAX-USD\"\n",
    );

    let config =
        AppConfig::load_or_default(&[Path::new("/nonexistent/config.toml"), path.as_path()]);
    fs::remove_file(&path).ok();

    assert_eq!(config?.feed.market, "AVAX-USD");

    Ok(())
}

#[test]
fn test_env_var_overrides_ws_url() {
    let config = AppConfig::default();

    std::env::set_var("DYDX_WSS_URL", "wss://indexer.v4staging.dydx.exchange/v4/ws");
    assert_eq!(
        config.ws_url(),
        "wss://indexer.v4staging.dydx.exchange/v4/ws"
    );

    std::env::remove_var("DYDX_WSS_URL");
    assert_eq!(config.ws_url(), config.feed.ws_url);
}
