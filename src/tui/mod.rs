//! TUI module - progress dashboard with ratatui

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{stdout, Stdout};

use crate::analytics::{PrRecord, WeekBucket, week_start_monday};
use crate::db::Database;
use crate::models::DATE_FORMAT;
use crate::progress::{PrQuery, VolumeQuery, pr_report, volume_report};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Weeks of volume shown on the dashboard
const DASHBOARD_WEEKS: i64 = 12;

/// App state for TUI
pub struct App {
    db: Database,
    user_id: String,
    require_completed: bool,
    prs: Vec<PrRecord>,
    weeks: Vec<WeekBucket>,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database, user_id: &str) -> Result<Self> {
        let mut app = Self {
            db,
            user_id: user_id.to_string(),
            require_completed: false,
            prs: Vec::new(),
            weeks: Vec::new(),
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    /// Recompute both views from scratch
    fn refresh(&mut self) -> Result<()> {
        let (from, to) = dashboard_range(Local::now().date_naive());
        let prs = pr_report(
            &self.db,
            &self.user_id,
            &PrQuery {
                require_completed: self.require_completed,
            },
        )?;
        let volume = volume_report(
            &self.db,
            &self.user_id,
            &VolumeQuery {
                from: Some(from),
                to: Some(to),
                require_completed: self.require_completed,
            },
        )?;
        self.prs = prs.prs;
        self.weeks = volume.weeks;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let mode = if self.require_completed { "completed sets" } else { "all sets" };
        let header = Paragraph::new(format!("liftlog - {} ({})", self.user_id, mode))
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        frame.render_widget(self.pr_table(), body[0]);
        frame.render_widget(self.volume_table(), body[1]);

        let footer = Paragraph::new("q: quit | r: refresh | c: toggle completed-only")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn pr_table(&self) -> Table<'_> {
        let rows: Vec<Row> = self.prs.iter().map(|pr| {
            let best_set = match pr.best_e1rm_set.date {
                Some(date) => format!(
                    "{}x{} on {}",
                    pr.best_e1rm_set.weight,
                    pr.best_e1rm_set.reps,
                    date.format(DATE_FORMAT)
                ),
                None => "-".to_string(),
            };
            Row::new(vec![
                Cell::from(pr.exercise_name.clone()),
                Cell::from(format!("{}x{}", pr.best_weight, pr.best_weight_reps)),
                Cell::from(format!("{:.1}", pr.best_e1rm)),
                Cell::from(best_set),
            ])
        }).collect();

        Table::new(
            rows,
            [
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
        )
        .header(Row::new(vec!["Exercise", "Best", "e1RM", "From set"])
            .style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Personal records"))
    }

    fn volume_table(&self) -> Table<'_> {
        let rows: Vec<Row> = self.weeks.iter().map(|w| {
            Row::new(vec![
                Cell::from(w.week_start.format(DATE_FORMAT).to_string()),
                Cell::from(w.total_sets.to_string()),
                Cell::from(w.total_reps.to_string()),
                Cell::from(format!("{:.0}", w.total_volume)),
            ])
        }).collect();

        Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Min(8),
            ],
        )
        .header(Row::new(vec!["Week", "Sets", "Reps", "Volume"])
            .style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Weekly volume"))
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('r') => self.refresh()?,
                        KeyCode::Char('c') => {
                            self.require_completed = !self.require_completed;
                            self.refresh()?;
                        }
                        _ => {}
                    }
                }
        Ok(())
    }
}

/// Range covering the current week and the ones before it
fn dashboard_range(today: NaiveDate) -> (String, String) {
    let from = week_start_monday(today) - Duration::weeks(DASHBOARD_WEEKS - 1);
    (
        from.format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
