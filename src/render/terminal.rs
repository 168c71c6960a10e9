//! On-screen chart display in the terminal

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    widgets::{
        Axis, Block, Borders, Chart as ChartWidget, Dataset, GraphType, LegendPosition, Paragraph,
    },
    Frame, Terminal,
};
use std::io::{self, IsTerminal};
use tracing::warn;

use super::{format_value, ticks, Chart};

/// Line colours, cycled per series
const COLORS: &[Color] = &[
    Color::Blue,
    Color::Yellow,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::Cyan,
    Color::LightBlue,
    Color::LightYellow,
];

/// Show the chart until the user presses `q` or `Esc`.
///
/// Does nothing but log a warning when stdout is not a terminal.
pub fn show(chart: &Chart) -> Result<()> {
    if !io::stdout().is_terminal() {
        warn!("stdout is not a terminal; skipping on-screen display");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, chart);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, chart: &Chart) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, f.area(), chart))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
        }
    }
}

/// Draw the chart and a key-help footer into `area`.
pub(crate) fn draw(f: &mut Frame, area: Rect, chart: &Chart) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", chart.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let footer = Paragraph::new(" q:Quit").style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[1]);

    let Some(bounds) = chart.bounds().map(|b| b.padded()) else {
        let empty = Paragraph::new("No data").block(block);
        f.render_widget(empty, chunks[0]);
        return;
    };

    let lines: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.x.position(), p.y)).collect())
        .collect();
    let peaks = chart.series.iter().filter_map(|s| s.peaks.as_ref());
    let ups: Vec<(f64, f64)> = peaks
        .clone()
        .flat_map(|p| p.ups.iter().map(|pt| (pt.x.position(), pt.y)))
        .collect();
    let downs: Vec<(f64, f64)> = peaks
        .flat_map(|p| p.downs.iter().map(|pt| (pt.x.position(), pt.y)))
        .collect();

    let mut datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(&lines)
        .enumerate()
        .map(|(i, (s, data))| {
            Dataset::default()
                .name(s.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(COLORS[i % COLORS.len()]))
                .data(data)
        })
        .collect();
    if chart.has_peaks() {
        datasets.push(
            Dataset::default()
                .name("Up")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Green))
                .data(&ups),
        );
        datasets.push(
            Dataset::default()
                .name("Down")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&downs),
        );
    }

    let x_labels: Vec<String> = ticks(bounds.x_min, bounds.x_max, 3)
        .into_iter()
        .map(|v| chart.x_label(v))
        .collect();
    let y_labels: Vec<String> = ticks(bounds.y_min, bounds.y_max, 3)
        .into_iter()
        .map(format_value)
        .collect();

    let widget = ChartWidget::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .title(chart.x_caption())
                .style(Style::default().fg(Color::Gray))
                .bounds([bounds.x_min, bounds.x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Commits")
                .style(Style::default().fg(Color::Gray))
                .bounds([bounds.y_min, bounds.y_max])
                .labels(y_labels),
        );

    f.render_widget(widget, chunks[0]);
}
