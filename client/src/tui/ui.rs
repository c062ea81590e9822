use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row,
        Table,
    },
};

use super::app::{App, InputMode, Screen};
use crate::lang::{Text, tr};
use crate::stat::report::format_rate;

pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if app.should_quit {
            break;
        }

        if app.needs_refresh {
            rt.block_on(app.refresh());
        }

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(&mut app, key);
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_key_normal(app, key),
        InputMode::EditingMonthly | InputMode::EditingYearly => handle_key_amount_input(app, key),
    }
}

fn handle_key_normal(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    if app.current_screen == Screen::Help {
        match key.code {
            Char('q') => app.should_quit = true,
            Char('?') | Esc => app.current_screen = Screen::Calculator,
            _ => {}
        }
        return;
    }

    match key.code {
        Char('q') => app.should_quit = true,
        Char('?') => app.current_screen = Screen::Help,

        Up => app.move_selection(-1),
        Down => app.move_selection(1),
        Char(' ') => app.toggle_expand(),

        Enter | Char('m') => app.begin_edit(InputMode::EditingMonthly),
        Char('y') => app.begin_edit(InputMode::EditingYearly),

        // Shift the comparison range
        Char('[') => app.shift_start(-1),
        Char(']') => app.shift_start(1),
        Char('{') => app.shift_end(-1),
        Char('}') => app.shift_end(1),

        Char('r') => app.needs_refresh = true,
        Char('l') => app.toggle_language(),
        Char('x') => app.spending.clear(),
        Char('c') => app.clear_messages(),

        Char('p') => {
            let result = std::env::current_dir()
                .map_err(anyhow::Error::from)
                .and_then(|dir| app.export_report(&dir));
            if let Err(e) = result {
                app.error_message = Some(format!("Export failed: {e}"));
            }
        }
        _ => {}
    }
}

fn handle_key_amount_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.push_input(c),
        _ => {}
    }
}

fn ui(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // main
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    // Header
    let lang = app.lang;
    let header_text = format!(
        "{}   |   {} {} {} {} {}   |   {}",
        tr(lang, Text::Title),
        tr(lang, Text::TimePeriod),
        tr(lang, Text::From),
        app.start,
        tr(lang, Text::To),
        app.end,
        lang.label(),
    );
    let header = Paragraph::new(header_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.current_screen {
        Screen::Calculator => draw_calculator(f, chunks[1], app),
        Screen::Help => draw_help(f, chunks[1], app),
    }

    // Footer
    let footer_text = if let Some(ref msg) = app.error_message {
        format!("{}: {} | Press 'c' to clear", tr(lang, Text::Error).to_uppercase(), msg)
    } else if let Some(ref msg) = app.success_message {
        format!("{msg} | Press 'c' to clear")
    } else {
        match app.input_mode {
            InputMode::Normal => {
                "↑/↓: move  |  Space: expand  |  m/Enter: monthly  |  y: yearly  |  [ ]: start  |  { }: end  |  r: refresh  |  l: language  |  p: report  |  ?: help  |  q: quit".to_string()
            }
            InputMode::EditingMonthly => format!(
                "{} {}_   (Enter to submit, Esc to cancel)",
                tr(lang, Text::Monthly),
                app.input_buffer
            ),
            InputMode::EditingYearly => format!(
                "{} {}_   (Enter to submit, Esc to cancel)",
                tr(lang, Text::Annual),
                app.input_buffer
            ),
        }
    };
    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

fn draw_calculator(f: &mut Frame<'_>, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_expenditures(f, columns[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Percentage(50),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    draw_results(f, right[0], app);
    draw_index_trend(f, right[1], app);
    draw_weights(f, right[2], app);
}

fn draw_expenditures(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lang = app.lang;
    let tree = app.tree();
    let visible = app.visible_rows();

    let mut rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let name = tree
                .find(r.code)
                .map(|c| c.name(lang).to_string())
                .unwrap_or_default();
            let label = if r.is_group {
                let marker = if app.expanded.contains(&r.code) { "▾" } else { "▸" };
                format!("{marker} {name}")
            } else {
                format!("    {name}")
            };
            let reference = if r.is_group {
                app.basket
                    .reference_spend(r.code)
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string())
            } else {
                String::new()
            };
            let change = app
                .basket
                .change_for(r.code)
                .map(format_rate)
                .unwrap_or_else(|| "-".to_string());
            let amount = app.spending.get(r.code);

            let mut row = Row::new(vec![
                label,
                reference,
                change,
                format!("{:.2}", amount.monthly),
                format!("{:.2}", amount.yearly),
            ]);
            if idx == app.selected_row {
                row = row.style(Style::default().add_modifier(Modifier::REVERSED));
            } else if r.is_group {
                row = row.style(Style::default().add_modifier(Modifier::BOLD));
            }
            row
        })
        .collect();

    rows.push(
        Row::new(vec![
            tr(lang, Text::Total).to_string(),
            String::new(),
            String::new(),
            format!("{:.2}", app.spending.total_monthly(tree)),
            format!("{:.2}", app.spending.total_yearly(tree)),
        ])
        .style(Style::default().fg(Color::Yellow)),
    );

    let widths = [
        Constraint::Min(24),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                tr(lang, Text::GroupOrSubgroup),
                tr(lang, Text::AverageMonthly),
                tr(lang, Text::PriceChange),
                tr(lang, Text::Monthly),
                tr(lang, Text::Annual),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(tr(lang, Text::GroupName))
                .borders(Borders::ALL),
        );

    f.render_widget(table, area);
}

fn draw_results(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lang = app.lang;
    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", tr(lang, Text::OfficialRate))),
            Span::styled(
                format_rate(app.basket.official_rate()),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::raw(format!("{} ", tr(lang, Text::PersonalRate))),
            Span::styled(
                format_rate(app.basket.personal_rate(&app.spending)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(format!(
            "{}: {:.2} / {:.2} ₾",
            tr(lang, Text::Total),
            app.spending.total_monthly(app.tree()),
            app.spending.total_yearly(app.tree()),
        )),
    ];
    if let Some((from, to)) = app.basket.covered_range() {
        lines.push(Line::from(format!("{} {from} - {to}", tr(lang, Text::InflationPeriod))));
    }

    let block = Block::default()
        .title(Span::raw(tr(lang, Text::Result)))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_index_trend(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lang = app.lang;
    let block = Block::default()
        .title(Span::raw(tr(lang, Text::IndexTrend)))
        .borders(Borders::ALL);

    let series = app.basket.total_index_series();
    if series.is_empty() {
        f.render_widget(Paragraph::new("-").block(block), area);
        return;
    }

    let (lo, hi) = series
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let pad = ((hi - lo) * 0.1).max(0.5);
    let x_max = (series.len() - 1).max(1) as f64;

    let (first, last) = app
        .basket
        .covered_range()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .name("GroupTotal")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&series),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .bounds([lo - pad, hi + pad])
                .labels(vec![format!("{:.1}", lo - pad), format!("{:.1}", hi + pad)]),
        );

    f.render_widget(chart, area);
}

fn draw_weights(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lang = app.lang;
    let weights = app.basket.weight_comparison(&app.spending);

    let official = Style::default().fg(Color::Cyan);
    let personal = Style::default().fg(Color::Yellow);

    // percentages are scaled by ten so one decimal survives the integer bars
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(Line::from(vec![
                    Span::styled(tr(lang, Text::OfficialWeight), official),
                    Span::raw(" / "),
                    Span::styled(tr(lang, Text::PersonalWeight), personal),
                ]))
                .borders(Borders::ALL),
        )
        .bar_width(4)
        .bar_gap(0)
        .group_gap(2)
        .max(1000);

    for w in &weights {
        let bars = [
            Bar::default()
                .value((w.official * 10.0).round() as u64)
                .text_value(format!("{:.0}", w.official))
                .style(official),
            Bar::default()
                .value((w.personal * 10.0).round() as u64)
                .text_value(format!("{:.0}", w.personal))
                .style(personal),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(w.code.to_string()))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

fn draw_help(f: &mut Frame<'_>, area: Rect, app: &App) {
    let text = format!(
        "\
{}

Enter what your household spends per month (or per year) on each group.
Group amounts are split across subgroups using the official weights;
editing a subgroup recomputes its group as the sum of its subgroups.

Key bindings:
  ↑ / ↓         : move selection
  Space         : expand / collapse a group
  m / Enter     : edit monthly amount
  y             : edit yearly amount
  [ / ]         : move start period back / forward
  {{ / }}         : move end period back / forward
  r             : refetch data
  l             : switch language ({})
  p             : save a text report in the current directory
  x             : clear all amounts
  c             : clear messages
  ? / Esc       : close this help
  q             : quit

API: {}
",
        tr(app.lang, Text::Title),
        app.lang.toggle().label(),
        app.api.base_url(),
    );

    let block = Block::default()
        .title(Span::raw("Help"))
        .borders(Borders::ALL);
    let p = Paragraph::new(text).block(block);
    f.render_widget(p, area);
}
