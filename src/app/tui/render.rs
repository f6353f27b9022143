use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use super::super::browse::{Marker, PageView, Pointer, RowView};

const ACCENT: Color = Color::Rgb(0, 191, 255);
const VIEWED: Color = Color::Rgb(187, 187, 187);
const SELECTED_BG: Color = Color::Rgb(48, 48, 48);

const OPTION_LINES: [&str; 15] = [
    "(N/→) Next page",
    "(P/←) Previous page",
    "(P:<integer>) Jump to page",
    "(J) Jump to next unviewed",
    "(U/↑) Move cursor up",
    "(D/↓) Move cursor down",
    "(L) Toggle link",
    "(B) Toggle bookmark colours",
    "(B:[<integer>][:<category>[:new]]) Add/remove bookmark",
    "(T:[<integer>]) View thumbnail",
    "(V:[<integer>]) Toggle viewed status",
    "(I:<integer>) Items per page",
    "(R) Re-render the interface",
    "(Q/Ctrl-C) Quit",
    "(<integer> / Enter) Play item",
];

pub(super) fn draw_page(frame: &mut Frame, view: &PageView<'_>, input: &str) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let options_height = if view.options.show_options {
        OPTION_LINES.len() as u16 + 3
    } else {
        3
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(options_height),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    frame.render_widget(options_panel(view), chunks[0]);

    let mut lines = Vec::with_capacity(view.rows.len() * 2);
    for row in &view.rows {
        lines.push(row_line(row, view.number_width));
        if view.options.show_links {
            lines.push(Line::from(Span::styled(
                format!("{:indent$}{}", "", row.url, indent = view.number_width + 4),
                Style::default().fg(ACCENT).add_modifier(Modifier::ITALIC),
            )));
        }
    }
    if view.rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing to show.",
            Style::default().fg(VIEWED),
        )));
    }
    let list = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel_block(page_indicator(view)));
    frame.render_widget(list, chunks[1]);

    let status = Paragraph::new(view.status.to_string())
        .style(status_style(view.status))
        .block(panel_block(Line::from("Status")));
    frame.render_widget(status, chunks[2]);

    let prompt_label = match view.highlighted {
        Some(number) => format!("Select ({number}): "),
        None => "Select: ".to_string(),
    };
    let prompt = Paragraph::new(Line::from(vec![
        Span::styled(
            prompt_label,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(input.to_string(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::Rgb(125, 135, 150))),
    ]))
    .block(panel_block(Line::from("Input")));
    frame.render_widget(prompt, chunks[3]);

    if let Some(notice) = view.notice {
        let popup_area = popup_rect_for_text(frame.area(), notice);
        render_popup_shadow(frame, popup_area);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(notice.to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(modal_block("Notice"));
        frame.render_widget(popup, popup_area);
    }
}

fn options_panel(view: &PageView<'_>) -> Paragraph<'static> {
    let toggle_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    if !view.options.show_options {
        return Paragraph::new(Line::from(Span::styled("(O) Show all options", toggle_style)))
            .block(panel_block(Line::from("Options")));
    }
    let mut lines = vec![Line::from(Span::styled("(O) Hide all options", toggle_style))];
    lines.extend(OPTION_LINES.iter().map(|text| {
        let highlighted = (text.starts_with("(L)") && view.options.show_links)
            || (text.starts_with("(B) ") && view.options.show_bookmarks);
        let style = if highlighted {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Rgb(230, 235, 242))
        };
        Line::from(Span::styled(*text, style))
    }));
    Paragraph::new(lines).block(panel_block(Line::from("Options")))
}

fn page_indicator(view: &PageView<'_>) -> Line<'static> {
    let bold = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("Page: ", bold),
        Span::raw(format!("{}/", view.page)),
        Span::styled(view.page_count.to_string(), bold),
        Span::raw(format!(" ({}/", view.shown)),
        Span::styled(view.total.to_string(), bold),
        Span::raw(")"),
    ])
}

fn row_line<'a>(row: &RowView<'a>, number_width: usize) -> Line<'a> {
    let selected = row.pointer != Pointer::None;
    let mut base = Style::default().fg(Color::Rgb(230, 235, 242));
    if selected {
        base = base.bg(SELECTED_BG);
    }
    if row.viewed {
        base = base.fg(VIEWED);
    }
    base = match row.marker {
        Some(Marker::Bookmark) => base.fg(Color::Yellow),
        Some(Marker::Completed) => base.fg(Color::Green),
        None => base,
    };

    let pointer = match row.pointer {
        Pointer::Auto => Span::styled(" ❯ ", Style::default().fg(Color::Yellow)),
        Pointer::Cursor => Span::styled(" ❯ ", Style::default().fg(ACCENT)),
        Pointer::None => Span::raw("   "),
    };
    let digits = row.number.to_string();
    let padding = "0".repeat(number_width.saturating_sub(digits.len()));

    Line::from(vec![
        pointer,
        Span::styled(padding, base.fg(VIEWED)),
        Span::styled(format!("{digits} "), base.add_modifier(Modifier::BOLD)),
        Span::styled(row.title, base),
    ])
}

fn panel_block(title: Line<'static>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24)));
    frame.render_widget(shadow_block, shadow);
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let line_count = text.lines().count() as u16;

    let available_width = area.width.saturating_sub(2).max(1);
    let min_width = 40.min(available_width);
    let max_width = 72.min(available_width);
    let width = max_line_width.saturating_add(8).clamp(min_width, max_width);

    let available_height = area.height.saturating_sub(2).max(1);
    let min_height = 7.min(available_height);
    let max_height = 16.min(available_height);
    let height = line_count.saturating_add(4).clamp(min_height, max_height);

    centered_fixed_rect(width, height, area)
}
