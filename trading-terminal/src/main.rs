use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{fs::File, io, sync::Mutex, time::Duration};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trader_core::Dashboard;
use trader_core::config::TraderConfig;
use trader_core::models::DashboardEvent;
use trading_terminal::app::App;
use trading_terminal::ui::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let args = trading_terminal::config::load_config();

    // The terminal owns stdout, so tracing goes to a file.
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let config = TraderConfig::from_env()?;
    let (dashboard, mut rx) = Dashboard::new(config);
    let mut app = App::new(
        dashboard,
        &args.rpc_url,
        args.funding_secret.as_deref(),
        args.export_dir.clone(),
    );
    info!(export_dir = %args.export_dir.display(), "starting trader terminal");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<DashboardEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.editing.is_some() {
                    match key.code {
                        KeyCode::Enter => app.commit_edit(),
                        KeyCode::Esc => app.cancel_edit(),
                        KeyCode::Backspace => app.pop_char(),
                        KeyCode::Char(c) => app.push_char(c),
                        _ => {}
                    }
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => {
                        app.quit();
                        info!("quitting");
                        return Ok(());
                    }
                    KeyCode::Up => app.select_prev(),
                    KeyCode::Down => app.select_next(),
                    KeyCode::Enter => app.begin_edit(),
                    KeyCode::Char('c') => app.connect_rpc(),
                    KeyCode::Char('f') => app.load_funding(),
                    KeyCode::Char('w') => app.create_wallets(),
                    KeyCode::Char('x') => app.export_wallets(),
                    KeyCode::Char('i') => app.import_wallets(),
                    KeyCode::Char('v') => app.validate_mint(),
                    KeyCode::Char('s') => app.save_settings(),
                    KeyCode::Char('a') => app.auto_fund(),
                    KeyCode::Char('b') => app.check_balances(),
                    KeyCode::Char('l') => app.sell_all(),
                    KeyCode::Char('p') => app.sweep_all(),
                    KeyCode::Char(' ') => app.toggle_trading(),
                    KeyCode::Char('o') => app.export_logs(),
                    KeyCode::Char('k') => app.clear_logs(),
                    KeyCode::Char('t') => app.toggle_theme(),
                    _ => {}
                }
            }
        }
    }
}
