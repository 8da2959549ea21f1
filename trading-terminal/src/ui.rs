use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Row, Table, Wrap},
};
use trader_core::NoticeLevel;
use trader_core::models::LogKind;

use crate::app::{App, Field, Theme};

const KEY_HELP: &str = "↑/↓ field  Enter edit  c connect  f funding  w create  x export  i import  \
v validate  s save  a fund  b balances  l sell  p sweep  Space trade  o export logs  k clear logs  t theme  q quit";

pub fn ui(f: &mut Frame, app: &App) {
    let (bg_color, fg_color, border_color) = match app.theme {
        Theme::Light => (Color::White, Color::Black, Color::Black),
        Theme::Dark => (Color::Rgb(20, 20, 25), Color::White, Color::DarkGray),
    };

    let base_style = Style::default().bg(bg_color).fg(fg_color);

    let size = f.area();
    f.render_widget(Block::default().style(base_style), size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(9),
        ])
        .split(size);

    render_header(f, app, rows[0], border_color, fg_color);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    render_setup_form(f, app, body[0], border_color, fg_color);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(body[1]);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(right[0]);

    render_funding(f, app, panels[0], border_color, fg_color);
    render_balances(f, app, panels[1], border_color, fg_color);
    render_logs(f, app, right[1], border_color, fg_color);
    render_footer(f, app, rows[2], border_color, fg_color);
}

fn panel(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn check(done: bool) -> Span<'static> {
    if done {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect, border: Color, text: Color) {
    let dash = &app.dashboard;
    let flags = dash.setup().flags();

    let (status, status_color) = if dash.is_setup_complete() {
        ("Ready to Trade", Color::Green)
    } else {
        ("Setup Required", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(
            "Solana Multi-Wallet Trader  ",
            Style::default().fg(text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{status}]  "), Style::default().fg(status_color)),
        check(flags.rpc_connected),
        Span::raw("RPC  "),
        check(flags.funding_loaded),
        Span::raw("Funding  "),
        check(flags.wallet_count > 0),
        Span::raw(format!("Wallets ({})  ", flags.wallet_count)),
        check(flags.settings_saved),
        Span::raw("Settings  "),
    ];
    if dash.is_trading() {
        spans.push(Span::styled(
            " Trading Active ",
            Style::default().bg(Color::Green).fg(Color::Black),
        ));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(border)),
        ),
        area,
    );
}

fn render_setup_form(f: &mut Frame, app: &App, area: Rect, border: Color, text: Color) {
    let dash = &app.dashboard;
    let mut lines = Vec::with_capacity(Field::ALL.len() * 2);

    for (index, field) in Field::ALL.iter().enumerate() {
        let selected = index == app.selected;
        let editing = selected && app.editing.is_some();

        let shown = match (&app.editing, field.is_secret()) {
            (Some(buffer), _) if selected => format!("{buffer}_"),
            (_, true) => "*".repeat(app.value(*field).chars().count().min(24)),
            _ => app.value(*field).to_string(),
        };

        let status = match field {
            Field::RpcUrl if dash.connection().is_connected() => " ✓",
            Field::FundingSecret if dash.connection().is_funding_loaded() => " ✓",
            Field::TokenMint if dash.settings().is_mint_validated() => " ✓",
            _ => "",
        };

        let label_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text)
        };
        let value_style = if editing {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::Cyan)
        };

        lines.push(TextLine::from(vec![
            Span::styled(if selected { "> " } else { "  " }, label_style),
            Span::styled(field.label(), label_style),
            Span::styled(status, Style::default().fg(Color::Green)),
        ]));
        lines.push(TextLine::from(vec![
            Span::raw("    "),
            Span::styled(shown, value_style),
        ]));
    }

    if dash.settings().is_saved() {
        lines.push(TextLine::from(Span::styled(
            "  Settings saved",
            Style::default().fg(Color::Green),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(panel("Setup", border)), area);
}

fn render_funding(f: &mut Frame, app: &App, area: Rect, border: Color, text: Color) {
    let dash = &app.dashboard;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let per_wallet = app
        .budget_preview()
        .map_or(0.0, |budget| dash.per_wallet_allocation(budget));

    let lines = vec![
        TextLine::from(vec![
            Span::raw("Wallets"),
            Span::styled(
                format!(" {}", dash.wallets().count()),
                Style::default().fg(text).add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(vec![
            Span::raw("Minimum budget"),
            Span::styled(
                format!(" €{:.2}", dash.min_budget()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        TextLine::from(vec![
            Span::raw("Per wallet"),
            Span::styled(
                format!(" €{per_wallet:.2}"),
                Style::default().fg(text).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(panel("Wallets & Funding", border)),
        chunks[0],
    );

    let label = if dash.funder().is_running() {
        format!("Funding {}%", dash.funder().progress())
    } else {
        format!("{}%", dash.funder().progress())
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(dash.funder().progress()))
        .label(label);
    f.render_widget(gauge, chunks[1]);
}

fn render_balances(f: &mut Frame, app: &App, area: Rect, border: Color, _text: Color) {
    let book = app.dashboard.balances();

    let mut title = String::from("Utilities");
    for (busy, what) in [
        (book.is_checking(), "checking"),
        (book.is_selling(), "selling"),
        (book.is_sweeping(), "sweeping"),
    ] {
        if busy {
            title.push_str(&format!(" [{what}...]"));
        }
    }

    let mut rows: Vec<Row> = book
        .balances()
        .iter()
        .map(|b| {
            Row::new(vec![
                format!("#{}", b.id),
                format!("{:.4}", b.sol_balance),
                format!("{:.2}", b.token_balance),
                format!("€{:.2}", b.value_eur),
            ])
        })
        .collect();

    if !rows.is_empty() {
        let totals = book.totals();
        rows.push(
            Row::new(vec![
                "Total".to_string(),
                format!("{:.4}", totals.sol),
                format!("{:.2}", totals.tokens),
                format!("€{:.2}", totals.value_eur),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        );
    }

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(16),
            Constraint::Percentage(28),
            Constraint::Percentage(28),
            Constraint::Percentage(28),
        ],
    )
    .header(
        Row::new(vec!["Wallet", "SOL", "Tokens", "Value"]).style(Style::default().fg(Color::Yellow)),
    )
    .block(panel(&title, border));

    f.render_widget(table, area);
}

fn render_logs(f: &mut Frame, app: &App, area: Rect, border: Color, text: Color) {
    let logs = app.dashboard.logs();
    let stats = logs.stats();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let summary = TextLine::from(vec![
        Span::raw(" Total "),
        Span::styled(format!("{}", stats.total), Style::default().fg(text).add_modifier(Modifier::BOLD)),
        Span::raw("  Success "),
        Span::styled(format!("{}", stats.success), Style::default().fg(Color::Green)),
        Span::raw("  Errors "),
        Span::styled(format!("{}", stats.errors), Style::default().fg(Color::Red)),
        Span::raw("  Volume "),
        Span::styled(format!("€{:.2}", stats.volume), Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(summary), chunks[0]);

    // Newest first.
    let rows: Vec<Row> = logs
        .entries()
        .rev()
        .map(|entry| {
            let color = match entry.kind {
                LogKind::Success => Color::Green,
                LogKind::Error => Color::Red,
                LogKind::Warning => Color::Yellow,
                LogKind::Info => Color::Blue,
            };
            Row::new(vec![
                entry.timestamp.clone(),
                entry.kind.to_string(),
                format!("#{}", entry.wallet_id),
                entry.message.clone(),
                entry.amount.map(|a| format!("€{a:.2}")).unwrap_or_default(),
            ])
            .style(Style::default().fg(color))
        })
        .collect();

    let title = if app.dashboard.is_trading() {
        "Live Logs (running)"
    } else {
        "Live Logs"
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["Time", "Type", "Wallet", "Message", "Amount"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(panel(title, border));

    f.render_widget(table, chunks[1]);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect, border: Color, text: Color) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let notices: Vec<TextLine> = app
        .dashboard
        .notices()
        .rev()
        .map(|notice| {
            let color = match notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            TextLine::from(vec![
                Span::styled(
                    format!("{}: ", notice.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(notice.body.clone(), Style::default().fg(text)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(notices)
            .wrap(Wrap { trim: true })
            .block(panel("Notifications", border)),
        chunks[0],
    );

    let help = vec![
        TextLine::from(Span::styled(KEY_HELP, Style::default().fg(text))),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "A 2% platform fee applies to all trades.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(help)
            .wrap(Wrap { trim: true })
            .block(panel("Keys", border)),
        chunks[1],
    );
}
