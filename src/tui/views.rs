use crate::storage::FileSystem;
use crate::tui::app::{DialogKind, Focus, TuiApp};
use crate::tui::theme::*;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn draw<F: FileSystem>(f: &mut Frame, app: &TuiApp<F>) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("QR Code Generator", title_style()),
        Span::styled(
            format!("  saving to {}", app.output_folder().display()),
            hint_style(),
        ),
    ]));
    f.render_widget(title, chunks[0]);

    draw_input(f, chunks[1], app);
    draw_buttons(f, chunks[2], app.focus());
    draw_preview(f, chunks[3], app);

    let foot = Paragraph::new(Line::from(vec![
        Span::raw(" Tab focus  "),
        Span::raw(" Enter newline/press  "),
        Span::raw(" Ctrl+G generate  "),
        Span::raw(" Ctrl+L clear  "),
        Span::raw(" Esc quit "),
    ]))
    .style(hint_style());
    f.render_widget(foot, chunks[4]);

    if let Some(dialog) = app.dialog() {
        let popup = centered(area, 60, 9);
        let style = match dialog.kind {
            DialogKind::Info => info_style(),
            DialogKind::Error => error_style(),
        };
        let body = Paragraph::new(dialog.message.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(format!(" {} ", dialog.title), style))
                    .title_bottom(Line::from(" press any key ").alignment(Alignment::Right)),
            );
        f.render_widget(Clear, popup);
        f.render_widget(body, popup);
    }
}

fn draw_input<F: FileSystem>(f: &mut Frame, area: Rect, app: &TuiApp<F>) {
    let focused = app.focus() == Focus::Input;
    let mut text = app.input().to_string();
    if focused {
        text.push('▏');
    }

    // keep the tail visible once the text outgrows the box
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.len().saturating_sub(visible.max(1));
    let shown = lines[start..].join("\n");

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Text ")
        .border_style(if focused { title_style() } else { hint_style() });
    f.render_widget(Paragraph::new(shown).block(block), area);
}

fn draw_buttons(f: &mut Frame, area: Rect, focus: Focus) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (label, target, rect) in [
        ("Generate QR Code", Focus::GenerateButton, halves[0]),
        ("Clear Input", Focus::ClearButton, halves[1]),
    ] {
        let style = if focus == target {
            focused_style()
        } else {
            button_style()
        };
        let button = Paragraph::new(Span::styled(format!(" {label} "), style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, rect);
    }
}

fn draw_preview<F: FileSystem>(f: &mut Frame, area: Rect, app: &TuiApp<F>) {
    let block = Block::default().borders(Borders::ALL).title(" QR Code ");
    let body = match app.preview() {
        Some(preview) => {
            let mut text = Text::from(preview.art.as_str());
            text.push_line(Line::from(Span::styled(
                preview.path.display().to_string(),
                hint_style(),
            )));
            Paragraph::new(text).alignment(Alignment::Center)
        }
        None => Paragraph::new("Generated codes appear here.")
            .style(hint_style())
            .alignment(Alignment::Center),
    };
    f.render_widget(body.block(block), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
