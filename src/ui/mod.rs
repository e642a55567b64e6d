mod thermometer;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Control, Popup, Section, CONFIRM_RESET_PROMPT};
use crate::campaign::{format_amount, PRESET_AMOUNTS};
use crate::theme::Theme;
use thermometer::Thermometer;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the palette; only the first call has any effect
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

const TUBE_WIDTH: u16 = 14;
const SIDE_WIDTH: u16 = 22;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Tagline
            Constraint::Min(6),    // Thermometer
            Constraint::Length(1), // Totals
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Preset buttons
            Constraint::Length(3), // Custom amount
            Constraint::Length(3), // Set target / reset
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_header(f, app, chunks[0], chunks[1]);
    draw_thermometer(f, app, chunks[2]);
    draw_totals(f, app, chunks[3]);
    draw_status_line(f, app, chunks[4]);
    draw_presets(f, app, chunks[5]);
    draw_custom_input(f, app, chunks[6]);
    draw_controls(f, app, chunks[7]);
    draw_footer(f, app, chunks[8]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::SetTarget => draw_target_prompt(f, app),
        Popup::ConfirmReset => draw_confirm_reset(f),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_header(f: &mut Frame, app: &App, title_area: Rect, tagline_area: Rect) {
    let title = Paragraph::new(Span::styled(
        app.title.as_str(),
        Style::default().fg(header()).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, title_area);

    let tagline = Paragraph::new(Span::styled(app.tagline.as_str(), Style::default().fg(text_dim())))
        .alignment(Alignment::Center);
    f.render_widget(tagline, tagline_area);
}

fn draw_thermometer(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(SIDE_WIDTH),
            Constraint::Length(TUBE_WIDTH),
            Constraint::Length(SIDE_WIDTH),
            Constraint::Min(0),
        ])
        .split(area);

    let campaign = &app.campaign;
    let t = theme();

    // Target label sits level with the marker on the tube's top inner row
    let target_label = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Target: ${} ", format_amount(campaign.target())),
            Style::default().fg(t.target_line).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Right);
    f.render_widget(target_label, columns[1]);

    let border = if campaign.is_complete() { t.target_line } else { accent() };
    let tube = Thermometer::new(campaign.fill_ratio())
        .label(format!("${}", format_amount(campaign.raised())))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .fill_colors(t.mercury, t.mercury_top)
        .glass(t.glass)
        .target_line(t.target_line)
        .label_color(t.text);
    f.render_widget(tube, columns[2]);

    let percent_color = if campaign.is_complete() { success() } else { text_dim() };
    let mut percent_lines = vec![Line::from(""); columns[3].height.saturating_sub(2) as usize];
    percent_lines.push(Line::from(Span::styled(
        format!(" {}% of goal", campaign.percent()),
        Style::default().fg(percent_color),
    )));
    f.render_widget(Paragraph::new(percent_lines), columns[3]);
}

fn draw_totals(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!("${}", format_amount(app.campaign.raised())),
            Style::default().fg(theme().mercury).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" / ${} Raised", format_amount(app.campaign.target())),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let color = if app.campaign.is_complete() { success() } else { warning() };
    let status = Paragraph::new(Span::styled(app.status_message.as_str(), Style::default().fg(color)))
        .alignment(Alignment::Center);
    f.render_widget(status, area);
}

/// A bordered one-line button, highlighted when selected
fn button<'a>(label: String, selected: bool, color: Color) -> Paragraph<'a> {
    let (border, style) = if selected {
        (accent(), Style::default().fg(color).bg(bg_selected()).add_modifier(Modifier::BOLD))
    } else {
        (inactive(), Style::default().fg(color))
    };

    Paragraph::new(Span::styled(label, style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
}

fn draw_presets(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Presets;
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (i, amount) in PRESET_AMOUNTS.iter().enumerate() {
        let label = format!("{} Add ${}", i + 1, amount);
        let selected = is_active && i == app.selected_preset;
        f.render_widget(button(label, selected, text()), cells[i]);
    }
}

fn draw_custom_input(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Custom;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let block = Block::default()
        .title(Span::styled(" (c)ustom amount ", title_style))
        .title_bottom(Line::from(Span::styled(" Enter = Add Custom Amount ", Style::default().fg(text_dim()))).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let content = if app.pending_input.is_empty() && !is_active {
        Line::from(Span::styled("Custom amount", Style::default().fg(text_dim())))
    } else {
        let cursor = if is_active { "_" } else { "" };
        Line::from(vec![
            Span::styled("$ ", Style::default().fg(text_dim())),
            Span::styled(format!("{}{}", app.pending_input, cursor), Style::default().fg(text())),
        ])
    };

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_controls(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Controls;
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(area);

    let target_selected = is_active && app.selected_control == Control::SetTarget;
    let reset_selected = is_active && app.selected_control == Control::Reset;
    f.render_widget(button("(t) Set New Target".to_string(), target_selected, accent()), cells[0]);
    f.render_widget(button("(r) Reset Thermometer".to_string(), reset_selected, danger()), cells[1]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.section {
        Section::Presets => vec![
            ("1-4", "Add"),
            ("←→", "Nav"),
            ("Enter", "Add"),
            ("Tab", "Next"),
            ("h", "Help"),
            ("q", "Quit"),
        ],
        Section::Custom => vec![
            ("0-9.", "Type"),
            ("Enter", "Add"),
            ("Esc", "Back"),
            ("Tab", "Next"),
        ],
        Section::Controls => vec![
            ("←→", "Nav"),
            ("Enter", "Select"),
            ("t", "Target"),
            ("r", "Reset"),
            ("Tab", "Next"),
            ("q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_target_prompt(f: &mut Frame, app: &App) {
    let popup_area = centered_fixed(44, 7, f.area());
    f.render_widget(Clear, popup_area);

    let prompt = Paragraph::new(vec![
        Line::from(Span::styled("Enter new target amount:", Style::default().fg(text()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("$ ", Style::default().fg(text_dim())),
            Span::styled(format!("{}_", app.target_input), Style::default().fg(text())),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" OK   "),
            Span::styled("Esc", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Set New Target ", Style::default().fg(accent())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    )
    .alignment(Alignment::Center);

    f.render_widget(prompt, popup_area);
}

fn draw_confirm_reset(f: &mut Frame) {
    let popup_area = centered_fixed(48, 9, f.area());
    f.render_widget(Clear, popup_area);

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(CONFIRM_RESET_PROMPT, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes, Reset   "),
            Span::styled("n", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm Reset ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(confirm, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 80 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), Style::default().fg(accent())),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        section("═══ Donations ═══"),
        key("1 2 3 4", "Add $1000 / $2500 / $5000 / $10000"),
        key("c", "Type a custom amount, Enter to add"),
        Line::from(""),
        section("═══ Campaign ═══"),
        key("t", "Set a new target"),
        key("r", "Reset raised amount and target (asks first)"),
        Line::from(""),
        section("═══ Navigation ═══"),
        key("Tab", "Switch sections (Presets → Custom → Controls)"),
        key("←/→", "Move between buttons"),
        key("Enter", "Press the selected button"),
        key("q", "Quit (Ctrl-C from anywhere)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" thermo Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed-size popup, shrunk to fit small terminals
fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 32)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app() -> App {
        App::new("Auction Fundraiser", "Help us reach our goal!")
    }

    #[test]
    fn test_draws_main_view() {
        let mut app = app();
        app.add_amount("2500");
        let screen = render(&app);

        assert!(screen.contains("Auction Fundraiser"));
        assert!(screen.contains("Help us reach our goal!"));
        assert!(screen.contains("$2500.00 / $100000.00 Raised"));
        assert!(screen.contains("Added $2500.00. Total: $2500.00"));
        assert!(screen.contains("Target: $100000.00"));
        assert!(screen.contains("2% of goal"));
        assert!(screen.contains("Add $10000"));
        assert!(screen.contains("Set New Target"));
        assert!(!screen.contains("Confirm Reset"));
    }

    #[test]
    fn test_draws_past_target() {
        let mut app = app();
        app.set_target("100");
        app.add_amount("450");
        let screen = render(&app);

        assert!(screen.contains("$450.00 / $100.00 Raised"));
        assert!(screen.contains("100% of goal"));
        assert!(screen.contains("Congratulations!"));
    }

    #[test]
    fn test_confirm_dialog_only_when_requested() {
        let mut app = app();
        assert!(!render(&app).contains("Confirm Reset"));

        app.request_reset();
        let screen = render(&app);
        assert!(screen.contains("Confirm Reset"));
        assert!(screen.contains("Yes, Reset"));

        app.cancel_reset();
        assert!(!render(&app).contains("Confirm Reset"));
    }

    #[test]
    fn test_draws_custom_input_and_target_prompt() {
        let mut app = app();
        app.section = Section::Custom;
        app.pending_input = "42.5".to_string();
        assert!(render(&app).contains("$ 42.5_"));

        app.popup = Popup::SetTarget;
        app.target_input = "750".to_string();
        let screen = render(&app);
        assert!(screen.contains("Enter new target amount:"));
        assert!(screen.contains("$ 750_"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = app();
        app.request_reset();
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
    }

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered_fixed(48, 9, area);
        assert_eq!(popup, Rect::new(0, 0, 30, 5));

        let popup = centered_fixed(10, 3, Rect::new(0, 0, 30, 9));
        assert_eq!(popup, Rect::new(10, 3, 10, 3));
    }
}
