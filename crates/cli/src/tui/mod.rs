//! Interactive differences-table viewer.
//!
//! Wraps a [`DiffTable`] in a full-screen terminal UI: live search, status
//! filter, per-column sort, pagination and one-key CSV export. All table
//! semantics live in `reconview-report`; this module only maps keys to
//! mutations and draws the current projections.

use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use reconview_report::export::{export_filename, write_csv_file};
use reconview_report::money::format_brl;
use reconview_report::paginate::PageItem;
use reconview_report::sort::{SortDirection, SortKey};
use reconview_report::{DiffTable, RecordStatus};

use crate::util;

struct Column {
    label: &'static str,
    key: SortKey,
    /// Display width; the client column is sized from the terminal instead.
    width: usize,
    numeric: bool,
}

const COLUMNS: [Column; 6] = [
    Column { label: "Code", key: SortKey::Code, width: 10, numeric: false },
    Column { label: "Client", key: SortKey::ClientName, width: 0, numeric: false },
    Column { label: "Financial", key: SortKey::FinancialValue, width: 13, numeric: true },
    Column { label: "Accounting", key: SortKey::AccountingValue, width: 13, numeric: true },
    Column { label: "Difference", key: SortKey::Difference, width: 12, numeric: true },
    Column { label: "Abs. diff", key: SortKey::AbsoluteDifference, width: 12, numeric: true },
];

const STATUS_WIDTH: usize = 9;

/// Sum of the fixed columns, separators and the left margin; what is left
/// of the terminal width goes to the client column.
const FIXED_WIDTH: usize = 76;

struct DiffTui {
    table: DiffTable,
    file_name: String,
    /// Text in the search box; mirrors the table's search except while editing.
    search_input: String,
    /// Search to restore on Esc. `Some` while the search box is focused.
    search_restore: Option<String>,
    status_message: Option<String>,
    should_quit: bool,
    show_help: bool,
}

impl DiffTui {
    fn new(table: DiffTable, file_name: String) -> Self {
        let search_input = table.state().search.as_str().to_string();
        Self {
            table,
            file_name,
            search_input,
            search_restore: None,
            status_message: None,
            should_quit: false,
            show_help: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any key dismisses help
            self.show_help = false;
            return;
        }

        self.status_message = None;

        if self.search_restore.is_some() {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => {
                self.search_restore = Some(self.search_input.clone());
            }
            KeyCode::Char('c') => {
                self.search_input.clear();
                self.table.set_search("");
            }
            KeyCode::Char('f') | KeyCode::Tab => self.table.cycle_status_filter(),
            // 1-6: sort by column; same column again flips direction
            KeyCode::Char(c @ '1'..='6') => {
                let idx = (c as usize) - ('1' as usize);
                self.table.sort_by(SortKey::COLUMNS[idx]);
            }
            KeyCode::Left | KeyCode::Char('h') => self.table.prev_page(),
            KeyCode::Right | KeyCode::Char('l') => self.table.next_page(),
            KeyCode::Home | KeyCode::Char('g') => self.table.first_page(),
            KeyCode::End | KeyCode::Char('G') => self.table.last_page(),
            KeyCode::Char('z') => self.table.cycle_page_size(),
            KeyCode::Char('e') => self.export_csv(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            // Esc puts back whatever was searched before `/`
            KeyCode::Esc => {
                if let Some(original) = self.search_restore.take() {
                    self.search_input = original;
                    self.table.set_search(&self.search_input);
                }
            }
            KeyCode::Enter => {
                self.search_restore = None;
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.table.set_search(&self.search_input);
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.table.set_search(&self.search_input);
            }
            _ => {}
        }
    }

    fn export_csv(&mut self) {
        let path = PathBuf::from(export_filename(Local::now().date_naive()));
        let rows = self.table.sorted();
        match write_csv_file(&rows, &path) {
            Ok(()) => {
                self.status_message =
                    Some(format!("exported {} rows to {}", rows.len(), path.display()));
            }
            Err(e) => {
                self.status_message = Some(format!("export failed: {}", e));
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_filter(frame, chunks[1]);
        self.draw_table(frame, chunks[2]);
        self.draw_pager(frame, chunks[3]);
        self.draw_status(frame, chunks[4]);

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let tally = self.table.tally();
        let title = format!(
            " rcv: {} | {} records, {} divergent ",
            self.file_name,
            self.table.records().len(),
            tally.divergent,
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_filter(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" search: ", Style::default().fg(Color::DarkGray))];

        if self.search_restore.is_some() {
            spans.push(Span::styled(
                format!("{}_", self.search_input),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if self.search_input.is_empty() {
            spans.push(Span::styled("-", Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(Span::styled(
                self.search_input.clone(),
                Style::default().fg(Color::White),
            ));
        }

        let filter = self.table.state().status_filter;
        spans.push(Span::styled(
            "   filter: ",
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            filter.label(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

        let tally = self.table.tally();
        spans.push(Span::styled("   ", Style::default()));
        spans.push(Span::styled(
            format!("{} OK", tally.ok),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{} DIVERGENT", tally.divergent),
            Style::default().fg(Color::Red),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn client_width(area: Rect) -> usize {
        (area.width as usize).saturating_sub(FIXED_WIDTH).clamp(12, 32)
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let client_w = Self::client_width(area);
        let sort = self.table.state().sort;

        // Header line
        let mut header_spans = vec![Span::raw(" ")];
        for col in &COLUMNS {
            let mut label = col.label.to_string();
            if sort.key == col.key {
                label.push(match sort.direction {
                    SortDirection::Ascending => '▲',
                    SortDirection::Descending => '▼',
                });
            }
            let w = if col.key == SortKey::ClientName { client_w } else { col.width };
            let display = if col.numeric {
                util::pad_left(&label, w)
            } else {
                util::pad_right(&label, w)
            };
            header_spans.push(Span::styled(
                display,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            header_spans.push(Span::raw(" "));
        }
        header_spans.push(Span::styled(
            util::pad_right("Status", STATUS_WIDTH),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

        let rows = self.table.page_rows();
        let mut lines: Vec<Line> = Vec::with_capacity(rows.len() + 1);
        lines.push(Line::from(header_spans));

        if rows.is_empty() {
            lines.push(Line::from(Span::styled(
                " (no matching records)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let data_height = (area.height as usize).saturating_sub(1);
        for record in rows.iter().take(data_height).copied() {
            let status = RecordStatus::classify(record);
            let row_fg = match status {
                RecordStatus::Ok => Color::White,
                RecordStatus::Divergent => Color::LightRed,
            };

            let cells: [String; 6] = [
                record.code.as_deref().unwrap_or("-").to_string(),
                record.client_name.as_deref().unwrap_or("-").to_string(),
                format_brl(record.financial_value),
                format_brl(record.accounting_value),
                format_brl(record.difference),
                format_brl(record.absolute_difference),
            ];

            let mut spans = vec![Span::raw(" ")];
            for (i, value) in cells.iter().enumerate() {
                let w = if i == 1 { client_w } else { COLUMNS[i].width };
                let display = if COLUMNS[i].numeric {
                    util::pad_left(value, w)
                } else {
                    util::pad_right(value, w)
                };
                spans.push(Span::styled(display, Style::default().fg(row_fg)));
                spans.push(Span::raw(" "));
            }

            let badge_style = match status {
                RecordStatus::Ok => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                RecordStatus::Divergent => Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            };
            spans.push(Span::styled(
                util::pad_right(&status.to_string(), STATUS_WIDTH),
                badge_style,
            ));

            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_pager(&self, frame: &mut Frame, area: Rect) {
        let current = self.table.current_page();
        let filtered_len = self.table.filtered().len();

        let range_txt = match self.table.shown_range() {
            Some((start, end)) => {
                format!(" rows {}-{} of {}", start, end, filtered_len)
            }
            None => " no rows".to_string(),
        };

        let mut spans = vec![
            Span::styled(range_txt, Style::default().fg(Color::Gray)),
            Span::styled("  page ", Style::default().fg(Color::DarkGray)),
        ];

        for item in self.table.page_items() {
            match item {
                PageItem::Page(p) if p == current => spans.push(Span::styled(
                    format!("[{}]", p),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                PageItem::Page(p) => spans.push(Span::styled(
                    format!(" {} ", p),
                    Style::default().fg(Color::Gray),
                )),
                PageItem::Ellipsis => spans.push(Span::styled(
                    " … ",
                    Style::default().fg(Color::DarkGray),
                )),
            }
        }

        spans.push(Span::styled(
            format!("  ({}/page)", self.table.state().page_size.get()),
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let text = if let Some(msg) = &self.status_message {
            format!(" {}", msg)
        } else if self.search_restore.is_some() {
            " type to filter · Enter: keep · Esc: cancel".to_string()
        } else {
            " /: search  f: filter  1-6: sort  h/l: page  z: size  e: export  ?: help  q: quit"
                .to_string()
        };

        let para = Paragraph::new(Line::from(vec![Span::styled(
            util::pad_right(&text, area.width as usize),
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Table",
            "  -----",
            "  /                 Edit search (live)",
            "  Enter / Esc       Keep / cancel the search",
            "  c                 Clear search",
            "  f / Tab           Cycle status filter",
            "  1..6              Sort by column; again flips",
            "",
            "  Pages",
            "  -----",
            "  Left / h          Previous page",
            "  Right / l         Next page",
            "  Home / g          First page",
            "  End  / G          Last page",
            "  z                 Cycle page size",
            "",
            "  General",
            "  -------",
            "  e                 Export filtered rows to CSV",
            "  q / Esc           Quit",
            "  ?                 Toggle this help",
            "",
        ];

        let help_width: u16 = 48;
        let help_height: u16 = help_lines.len() as u16;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        let para = Paragraph::new(lines).block(block);
        frame.render_widget(para, popup);
    }
}

/// Run the interactive viewer over an already-loaded table.
pub fn run(table: DiffTable, file_name: &str) -> Result<(), String> {
    let app = DiffTui::new(table, file_name.to_string());
    run_app(app)
}

fn run_app(mut app: DiffTui) -> Result<(), String> {
    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("event read error: {}", e))?
            {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Print the full filtered projection as a plain text table (no TUI, no
/// raw mode). Used when stdout is not a terminal and for `--plain`.
pub fn print_plain(table: &DiffTable) -> Result<(), String> {
    const WIDTHS: [usize; 6] = [12, 28, 16, 16, 16, 16];

    let out = io::stdout();
    let mut w = out.lock();

    // Header
    write!(w, " ").map_err(|e| e.to_string())?;
    for (i, col) in COLUMNS.iter().enumerate() {
        let display = if col.numeric {
            util::pad_left(col.label, WIDTHS[i])
        } else {
            util::pad_right(col.label, WIDTHS[i])
        };
        write!(w, "{} ", display).map_err(|e| e.to_string())?;
    }
    writeln!(w, "{}", util::pad_right("Status", STATUS_WIDTH)).map_err(|e| e.to_string())?;

    // Separator
    write!(w, "-").map_err(|e| e.to_string())?;
    for width in WIDTHS {
        write!(w, "{}-", "-".repeat(width)).map_err(|e| e.to_string())?;
    }
    writeln!(w, "{}", "-".repeat(STATUS_WIDTH)).map_err(|e| e.to_string())?;

    // Rows
    let rows = table.sorted();
    for record in &rows {
        let status = RecordStatus::classify(record);
        let cells: [String; 6] = [
            record.code.as_deref().unwrap_or("-").to_string(),
            record.client_name.as_deref().unwrap_or("-").to_string(),
            format_brl(record.financial_value),
            format_brl(record.accounting_value),
            format_brl(record.difference),
            format_brl(record.absolute_difference),
        ];

        write!(w, " ").map_err(|e| e.to_string())?;
        for (i, value) in cells.iter().enumerate() {
            let display = if COLUMNS[i].numeric {
                util::pad_left(value, WIDTHS[i])
            } else {
                util::pad_right(value, WIDTHS[i])
            };
            write!(w, "{} ", display).map_err(|e| e.to_string())?;
        }
        writeln!(w, "{}", status).map_err(|e| e.to_string())?;
    }

    let tally = table.tally();
    writeln!(w).map_err(|e| e.to_string())?;
    writeln!(
        w,
        "{} rows shown · {} OK / {} DIVERGENT in the report",
        rows.len(),
        tally.ok,
        tally.divergent,
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
