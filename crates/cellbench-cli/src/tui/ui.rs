//! TUI rendering: summary strip over four tabbed views.
//!
//! ┌──────────────────────────────────────────────┐
//! │  Cellbench  Bench-001  group 1  #42  ● LIVE │
//! ├──────────────────────────────────────────────┤
//! │  Cells 8  Good 8  Warn 0  Crit 0  97.1%  …   │
//! ├──────────────────────────────────────────────┤
//! │  1 Real-time │ 2 Health │ 3 Temp │ 4 Trends  │
//! ├──────────────────────────────────────────────┤
//! │                                              │
//! │  (active view)                               │
//! │                                              │
//! ├──────────────────────────────────────────────┤
//! │  i init  s start/stop  a auto  q quit        │
//! └──────────────────────────────────────────────┘

use super::app::{App, Tab};
use ratatui::{prelude::*, symbols, widgets::*};

use cellbench_core::clock::format_clock;
use cellbench_core::summary::{health_histogram, temperature_grid, voltage_band};
use cellbench_core::{CellReading, CellStatus, Chemistry, TREND_WINDOW, TrendMetric, trend_series};

const HISTOGRAM_BINS: usize = 10;

/// Series colors for per-cell trend lines.
const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
    Color::White,
    Color::LightYellow,
];

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // summary
            Constraint::Length(1), // tabs
            Constraint::Min(10),   // view
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_summary(f, rows[1], app);
    draw_tabs(f, rows[2], app);
    draw_view(f, rows[3], app);
    draw_keys(f, rows[4], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let config = session.config();

    let state = if session.is_monitoring() {
        Span::styled("● MONITORING", Style::default().bold().fg(Color::Green))
    } else {
        Span::styled("○ STOPPED", Style::default().fg(Color::DarkGray))
    };
    let auto = if app.ticker_active() {
        format!("auto {}s ⟳", app.refresh().as_secs())
    } else if session.auto_refresh() {
        format!("auto {}s", app.refresh().as_secs())
    } else {
        "auto off".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 🔋 Cellbench ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(
                config.bench_name.clone(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::raw(format!("  group {}  ", config.group)),
            state,
            Span::styled(
                format!(
                    "  #{}  {auto}  {} ",
                    session.tick_count(),
                    session.source_label()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    let detail = match session.history().latest() {
        Some(snap) => format!(
            "{} cells configured   last tick {}   {} snapshots",
            config.cell_count(),
            format_clock(snap.timestamp_ms),
            session.history().len()
        ),
        None => format!("{} cells configured   no history yet", config.cell_count()),
    };
    let p = Paragraph::new(detail)
        .style(Style::default().fg(Color::Gray))
        .block(block);
    f.render_widget(p, area);
}

fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Bank ");

    let line = match app.session().summary() {
        Some(s) => Line::from(vec![
            Span::styled(
                format!(" Cells {}   ", s.total_cells),
                Style::default().bold(),
            ),
            Span::styled(
                format!("● Good {}   ", s.good),
                Style::default().fg(status_color(CellStatus::Good)),
            ),
            Span::styled(
                format!("● Warning {}   ", s.warning),
                Style::default().fg(status_color(CellStatus::Warning)),
            ),
            Span::styled(
                format!("● Critical {}   ", s.critical),
                Style::default().fg(status_color(CellStatus::Critical)),
            ),
            Span::raw(format!("Avg health {:.1}%   ", s.mean_health)),
            Span::raw(format!("Total power {:.2} W", s.total_power)),
        ]),
        None => Line::from(Span::styled(
            " No cells initialized. Press i to initialize the bench.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .map(|t| format!("{} {}", t.index() + 1, t.title()))
        .collect();
    f.render_widget(
        Tabs::new(titles)
            .select(app.tab().index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .divider(" │ "),
        area,
    );
}

fn draw_view(f: &mut Frame, area: Rect, app: &App) {
    if !app.session().is_initialized() {
        draw_chemistries(f, area);
        return;
    }
    match app.tab() {
        Tab::RealTime => draw_realtime(f, area, app),
        Tab::Health => draw_health(f, area, app),
        Tab::Temperature => draw_temperature(f, area, app),
        Tab::Trends => draw_trends(f, area, app),
    }
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let keys = " i init  s start/stop  a auto  t tick  Tab/1-4 view  +/- interval  e export  q quit";
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Percentage(40)])
        .split(area);

    f.render_widget(
        Paragraph::new(keys).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        cols[0],
    );
    let message = app.message().unwrap_or("");
    f.render_widget(
        Paragraph::new(format!("{message} "))
            .alignment(Alignment::Right)
            .style(Style::default().bg(Color::DarkGray).fg(Color::Yellow)),
        cols[1],
    );
}

// ---------------------------------------------------------------------------
// Placeholder: chemistry reference table
// ---------------------------------------------------------------------------

fn draw_chemistries(f: &mut Frame, area: Rect) {
    let rows: Vec<Row> = Chemistry::ALL
        .iter()
        .map(|&chem| {
            let p = chem.profile();
            Row::new(vec![
                Cell::from(Span::styled("■■", Style::default().fg(chem_color(chem)))),
                Cell::from(p.name),
                Cell::from(format!("{:.1} V", p.nominal_voltage)),
                Cell::from(format!("{:.1} V", p.min_voltage)),
                Cell::from(format!("{:.1} V", p.max_voltage)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["", "Type", "Nominal", "Min", "Max"])
            .style(Style::default().bold().fg(Color::Cyan)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Cell types available "),
    );
    f.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Real-time
// ---------------------------------------------------------------------------

fn draw_realtime(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    draw_readings_table(f, cols[0], app);
    draw_voltage_bars(f, cols[1], app.session().readings());
}

fn draw_readings_table(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .session()
        .readings()
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.cell_id.clone()),
                Cell::from(format!("{:.3}", r.voltage)),
                Cell::from(format!("{:+.2}", r.current)),
                Cell::from(format!("{:.1}", r.temperature)),
                Cell::from(format!("{:.2}", r.power)),
                Cell::from(format!("{:.2}", r.capacity)),
                Cell::from(format!("{:.1}%", r.health)),
                Cell::from(Span::styled(
                    r.status.label(),
                    Style::default().bold().fg(status_color(r.status)),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(15), // cell id
            Constraint::Length(7),  // V
            Constraint::Length(7),  // A
            Constraint::Length(6),  // °C
            Constraint::Length(7),  // W
            Constraint::Length(6),  // Ah
            Constraint::Length(7),  // health
            Constraint::Length(9),  // status
        ],
    )
    .header(
        Row::new(vec!["Cell", "V", "A", "°C", "W", "Ah", "Health", "Status"])
            .style(Style::default().bold().fg(Color::Cyan)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL).title(" Readings "));

    let mut state = app.table_state();
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_voltage_bars(f: &mut Frame, area: Rect, readings: &[CellReading]) {
    let title = match voltage_band(readings) {
        Some((lo, hi)) => format!(" Voltage  band {lo:.2}-{hi:.2} V "),
        None => " Voltage ".to_string(),
    };
    let max_mv = voltage_band(readings)
        .map(|(_, hi)| millivolts(hi))
        .unwrap_or(1);

    let bars: Vec<Bar> = readings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let color = if r.is_out_of_band() {
                Color::Red
            } else {
                chem_color(r.chemistry)
            };
            Bar::default()
                .value(millivolts(r.voltage))
                .text_value(format!("{:.2}", r.voltage))
                .label(Line::from(cell_label(i)))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(Color::Gray))
        .max(max_mv);
    f.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

fn draw_health(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_health_gauges(f, cols[0], app.session().readings());
    draw_health_histogram(f, cols[1], app.session().readings());
}

fn draw_health_gauges(f: &mut Frame, area: Rect, readings: &[CellReading]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Cell health  (target ≥ 90%) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(readings.iter().map(|_| Constraint::Length(1)))
        .split(inner);

    for (r, slot) in readings.iter().zip(slots.iter()) {
        let marker = if r.health >= 90.0 { "✓" } else { " " };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(health_color(r.health)).bg(Color::Black))
            .ratio((r.health / 100.0).clamp(0.0, 1.0))
            .label(format!("{} {:.1}% {marker}", r.cell_id, r.health));
        f.render_widget(gauge, *slot);
    }
}

fn draw_health_histogram(f: &mut Frame, area: Rect, readings: &[CellReading]) {
    let bins = health_histogram(readings, HISTOGRAM_BINS);
    let max = bins
        .iter()
        .map(|b| b.counts.total() as u64)
        .max()
        .unwrap_or(1)
        .max(1);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let worst = CellStatus::ALL
                .into_iter()
                .rev()
                .find(|&s| b.counts.get(s) > 0);
            let color = worst.map(status_color).unwrap_or(Color::DarkGray);
            Bar::default()
                .value(b.counts.total() as u64)
                .label(Line::from(format!("{:.0}", b.lo)))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Health distribution (%) "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .max(max);
    f.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

fn draw_temperature(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_heatmap(f, rows[0], app.session().readings());
    draw_power_scatter(f, rows[1], app.session().readings());
}

fn draw_heatmap(f: &mut Frame, area: Rect, readings: &[CellReading]) {
    let grid = temperature_grid(readings);
    let (lo, hi) = grid.range().unwrap_or((0.0, 1.0));

    let mut header = vec![Cell::from("")];
    header.extend((0..grid.columns.len()).map(|i| Cell::from(cell_label(i))));

    let rows: Vec<Row> = grid
        .rows
        .iter()
        .zip(grid.values.iter())
        .map(|(chem, values)| {
            let mut cells = vec![Cell::from(Span::styled(
                chem.name(),
                Style::default().fg(chem_color(*chem)),
            ))];
            cells.extend(values.iter().map(|v| match v {
                Some(t) => Cell::from(format!("{t:.1}"))
                    .style(Style::default().fg(Color::Black).bg(heat_color(*t, lo, hi))),
                None => Cell::from(""),
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(7)];
    widths.extend(grid.columns.iter().map(|_| Constraint::Length(5)));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().bold().fg(Color::Cyan)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Temperature °C  {lo:.1}-{hi:.1} ")),
        );
    f.render_widget(table, area);
}

fn draw_power_scatter(f: &mut Frame, area: Rect, readings: &[CellReading]) {
    let points: Vec<(Chemistry, Vec<(f64, f64)>)> = Chemistry::ALL
        .into_iter()
        .map(|chem| {
            let pts = readings
                .iter()
                .filter(|r| r.chemistry == chem)
                .map(|r| (r.temperature, r.power))
                .collect::<Vec<_>>();
            (chem, pts)
        })
        .filter(|(_, pts)| !pts.is_empty())
        .collect();

    let datasets: Vec<Dataset> = points
        .iter()
        .map(|(chem, pts)| {
            Dataset::default()
                .name(chem.name())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(chem_color(*chem)))
                .data(pts)
        })
        .collect();

    let (t_lo, t_hi) = bounds(readings.iter().map(|r| r.temperature)).unwrap_or((20.0, 40.0));
    let p_hi = readings.iter().map(|r| r.power).fold(0.0_f64, f64::max);
    let x = [(t_lo - 1.0).floor(), (t_hi + 1.0).ceil()];
    let y = [0.0, (p_hi * 1.1).max(1.0)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Temperature vs power "),
        )
        .x_axis(
            Axis::default()
                .title("°C")
                .bounds(x)
                .labels(vec![
                    Line::from(format!("{:.0}", x[0])),
                    Line::from(format!("{:.0}", x[1])),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("W")
                .bounds(y)
                .labels(vec![Line::from("0"), Line::from(format!("{:.1}", y[1]))]),
        );
    f.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

fn draw_trends(f: &mut Frame, area: Rect, app: &App) {
    let history = app.session().history();
    if history.len() < 2 {
        let block = Block::default().borders(Borders::ALL).title(" Trends ");
        let p = Paragraph::new("Collecting trend data: start monitoring (s) and wait for two ticks")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let mut cells = Vec::with_capacity(4);
    for row in rows.iter() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        cells.extend(cols.iter().copied());
    }

    for (metric, cell) in TrendMetric::ALL.into_iter().zip(cells) {
        draw_trend_chart(f, cell, app, metric);
    }
}

fn draw_trend_chart(f: &mut Frame, area: Rect, app: &App, metric: TrendMetric) {
    let series = trend_series(app.session().history(), metric, TREND_WINDOW);
    let t0 = series
        .iter()
        .filter_map(|s| s.points.first().map(|p| p.0))
        .min()
        .unwrap_or(0);
    let t1 = series
        .iter()
        .filter_map(|s| s.points.last().map(|p| p.0))
        .max()
        .unwrap_or(t0);

    let data: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .map(|&(ts, v)| (elapsed_secs(t0, ts), v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(data.iter())
        .enumerate()
        .map(|(i, (s, pts))| {
            Dataset::default()
                .name(format!("{}_{}", s.cell_id, metric.suffix()))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(pts)
        })
        .collect();

    let (lo, hi) = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))
        .unwrap_or((0.0, 1.0));
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    let y = [lo - pad, hi + pad];
    let x_max = elapsed_secs(t0, t1).max(1.0);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ({}) ", metric.label(), metric.unit())),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Line::from(format_clock(t0)), Line::from(format_clock(t1))]),
        )
        .y_axis(Axis::default().bounds(y).labels(vec![
            Line::from(format!("{:.1}", y[0])),
            Line::from(format!("{:.1}", y[1])),
        ]));
    f.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn status_color(status: CellStatus) -> Color {
    match status {
        CellStatus::Good => Color::Green,
        CellStatus::Warning => Color::Yellow,
        CellStatus::Critical => Color::Red,
    }
}

fn chem_color(chem: Chemistry) -> Color {
    let (r, g, b) = chem.profile().rgb();
    Color::Rgb(r, g, b)
}

/// Gauge steps: red below 60, yellow below 80.
fn health_color(health: f64) -> Color {
    if health < 60.0 {
        Color::Red
    } else if health < 80.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Blue (coolest) to red (hottest) across the grid's range.
fn heat_color(t: f64, lo: f64, hi: f64) -> Color {
    let x = if hi > lo { ((t - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.5 };
    let lerp = |a: f64, b: f64| (a + (b - a) * x).round() as u8;
    Color::Rgb(lerp(52.0, 231.0), lerp(152.0, 76.0), lerp(219.0, 60.0))
}

fn millivolts(v: f64) -> u64 {
    (v * 1000.0).round().max(0.0) as u64
}

/// Seconds from `start_ms` to `ts_ms`, zero if the clock stepped backwards.
fn elapsed_secs(start_ms: u64, ts_ms: u64) -> f64 {
    ts_ms.saturating_sub(start_ms) as f64 / 1000.0
}

fn cell_label(slot: usize) -> String {
    format!("C{}", slot + 1)
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
