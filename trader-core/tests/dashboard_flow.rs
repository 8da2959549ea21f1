//! End-to-end flows through the dashboard: setup gating, wallets, funding,
//! the trading session and log export.

use std::time::Duration;
use trader_core::config::TraderConfig;
use trader_core::models::{DashboardEvent, LogKind, TradingSettings};
use trader_core::session::SessionState;
use trader_core::{Dashboard, TraderError};

const SECRET: &str = "4NMwxzmYj2uvHuq8xoqhY8RXg63KSVJM1DXkpbmkUY7YQWuoyQgFnnzn6yo3CMnqZasnNPNuAT2TLwQsCaKkUddp";
const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

#[tokio::test]
async fn test_setup_completes_only_with_all_flags() {
    let (mut dash, _rx) = Dashboard::new(TraderConfig::default());
    let mut ready = dash.subscribe_setup();

    dash.connect_rpc("https://api.mainnet-beta.solana.com").unwrap();
    dash.load_funding(SECRET).unwrap();
    dash.set_token_mint(MINT);
    dash.validate_mint().unwrap();
    dash.save_settings(TradingSettings::default()).unwrap();
    assert!(!dash.is_setup_complete());
    assert!(matches!(dash.start_trading(), Err(TraderError::SetupIncomplete)));

    let count = dash
        .import_wallets(r#"{"wallets":[{"secret_b58":"a","pubkey":"b"}]}"#)
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(dash.wallets().count(), 1);
    assert!(ready.has_changed().unwrap());
    assert!(*ready.borrow_and_update());
    assert!(dash.is_setup_complete());
}

#[tokio::test]
async fn test_settings_scenario_saves() {
    let (mut dash, _rx) = Dashboard::new(TraderConfig::default());
    dash.set_token_mint(MINT);
    dash.validate_mint().unwrap();
    let settings = TradingSettings {
        slippage_bps: 100,
        min_trade: 1.0,
        max_trade: 10.0,
        ..TradingSettings::default()
    };
    dash.save_settings(settings).unwrap();
    assert!(dash.settings().is_saved());
    assert!(dash.setup().flags().settings_saved);

    let inverted = TradingSettings {
        min_trade: 10.0,
        max_trade: 1.0,
        ..TradingSettings::default()
    };
    assert!(matches!(
        dash.save_settings(inverted),
        Err(TraderError::InvalidTradeRange)
    ));
}

#[tokio::test]
async fn test_wallet_import_export_round_trip() {
    let (mut dash, _rx) = Dashboard::new(TraderConfig::default());
    let text = r#"{"wallets":[{"secret_b58":"s1","pubkey":"p1"},{"secret_b58":"s2","pubkey":"p2"}]}"#;
    dash.import_wallets(text).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dash.export_wallets(dir.path()).unwrap();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let original: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(exported["wallets"], original["wallets"]);

    // A bad import leaves the previous registry in place.
    assert!(matches!(
        dash.import_wallets(r#"{"wallets": 3}"#),
        Err(TraderError::InvalidWalletFormat)
    ));
    assert_eq!(dash.wallets().count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_full_session_and_csv_export() {
    let mut config = TraderConfig::default();
    config.logs.capacity = 5;
    let (mut dash, mut rx) = Dashboard::new(config);

    dash.connect_rpc("http://127.0.0.1:8899").unwrap();
    dash.load_funding(SECRET).unwrap();
    dash.create_wallets(10).unwrap();
    dash.set_token_mint(MINT);
    dash.validate_mint().unwrap();
    dash.save_settings(TradingSettings::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    assert_eq!(dash.export_logs(dir.path()).unwrap(), None);

    dash.auto_fund(100.0).unwrap();
    assert!(matches!(dash.auto_fund(100.0), Err(TraderError::FundingInProgress)));

    assert_eq!(dash.toggle_trading().unwrap(), SessionState::Running);
    let mut funded = false;
    let mut logged = 0;
    while !funded || logged < 8 {
        let event = rx.recv().await.unwrap();
        match event {
            DashboardEvent::FundingComplete { .. } => funded = true,
            DashboardEvent::Log { .. } => logged += 1,
            _ => {}
        }
        dash.apply(event);
    }
    assert!(!dash.funder().is_running());
    assert_eq!(dash.funder().progress(), 100);

    assert!(dash.stop_trading());
    assert_eq!(dash.session_state(), SessionState::Idle);
    assert_eq!(dash.logs().len(), 5);
    assert_eq!(dash.logs().entries().last().unwrap().id, logged);

    // Ticks still queued from the stopped run are discarded.
    tokio::time::sleep(Duration::from_secs(60)).await;
    while let Ok(event) = rx.try_recv() {
        dash.apply(event);
    }
    assert_eq!(dash.logs().entries().last().unwrap().id, logged);

    let stats = dash.logs().stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.success + stats.errors, 5);
    let volume: f64 = dash.logs().entries().filter_map(|e| e.amount).sum();
    assert!((stats.volume - volume).abs() < 1e-9);
    for entry in dash.logs().entries() {
        assert_eq!(entry.amount.is_some(), entry.kind == LogKind::Success);
    }

    let path = dash.export_logs(dir.path()).unwrap().unwrap();
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["Timestamp", "Type", "Wallet", "Message", "Amount"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 5);
    for (row, entry) in rows.iter().zip(dash.logs().entries()) {
        assert_eq!(&row[2], format!("Wallet #{}", entry.wallet_id));
        assert_eq!(&row[3], entry.message);
    }
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_queued_logs_and_restart_starts_clean() {
    let (mut dash, mut rx) = Dashboard::new(TraderConfig::default());
    dash.connect_rpc("http://127.0.0.1:8899").unwrap();
    dash.load_funding(SECRET).unwrap();
    dash.create_wallets(10).unwrap();
    dash.set_token_mint(MINT);
    dash.validate_mint().unwrap();
    dash.save_settings(TradingSettings::default()).unwrap();

    // The first run queues ticks that are never folded in before the stop.
    dash.start_trading().unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(dash.stop_trading());
    assert!(!dash.is_trading());

    dash.start_trading().unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;

    let mut first_run = None;
    let mut stale = 0;
    let mut fresh = 0;
    while let Ok(event) = rx.try_recv() {
        if let DashboardEvent::Log { run, .. } = &event {
            if *first_run.get_or_insert(*run) == *run {
                stale += 1;
            } else {
                fresh += 1;
            }
        }
        dash.apply(event);
    }
    assert!(stale >= 4, "stale = {stale}");
    assert!(fresh >= 4, "fresh = {fresh}");
    assert_eq!(dash.logs().len(), fresh);
}
