use crate::dashboard::{Dashboard, DashboardView, InputMode};
use crate::store::Store;
use crate::ui::{card, pagination};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const SEARCH_PLACEHOLDER: &str = "Search products...";

pub fn render<S: Store>(app: &Dashboard<S>, frame: &mut Frame) {
    let area = frame.area();
    let view = app.view();
    let banners = banner_lines(&view);

    // Layout: header(3) + banners(0-2) + search(3) + cards(min) + pager(3) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banners.len() as u16),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let mut header_spans = vec![
        Span::styled(
            " Product Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{} of {} products]", view.filtered.len(), view.total),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if let Some(at) = app.state().fetched_at {
        header_spans.push(Span::styled(
            format!("   updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    // ── Loading / error banners ──
    if !banners.is_empty() {
        frame.render_widget(Paragraph::new(banners), chunks[1]);
    }

    // ── Search bar ──
    let searching = app.input_mode == InputMode::Searching;
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search_label = if searching {
        " 🔍 Search (Enter/Esc to finish): "
    } else {
        " 🔍 Search (/): "
    };
    let term_span = if app.search_term.is_empty() && !searching {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.search_term.as_str(), Style::default().fg(Color::White))
    };
    let search_bar = Paragraph::new(Line::from(vec![
        Span::styled(search_label, search_style),
        term_span,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style)
            .title(" Search "),
    );
    frame.render_widget(search_bar, chunks[2]);

    if searching {
        let cursor_x = chunks[2].x + 1 + search_label.width() as u16 + app.search_term.width() as u16;
        let cursor_y = chunks[2].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    // ── Cards ──
    let page_info = if view.filtered.is_empty() {
        " 0 of 0 ".to_string()
    } else {
        let first = (view.current_page - 1) * crate::dashboard::PAGE_SIZE + 1;
        format!(
            " {}-{} of {} ",
            first,
            first + view.page_items().len() - 1,
            view.filtered.len()
        )
    };
    let cards_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Products ")
        .title_bottom(Line::from(page_info).alignment(Alignment::Right));

    if view.show_no_results() {
        let empty = Paragraph::new("No products found.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(cards_block);
        frame.render_widget(empty, chunks[3]);
    } else {
        let width = chunks[3].width.saturating_sub(2);
        let cards = Paragraph::new(card::render_cards(view.page_items(), width))
            .scroll((app.card_scroll, 0))
            .block(cards_block);
        frame.render_widget(cards, chunks[3]);
    }

    // ── Pagination ──
    let controls = pagination::controls(&view);
    let pager_title = if view.page_count == 0 {
        " No pages ".to_string()
    } else {
        format!(" Page {} of {} ", view.current_page, view.page_count)
    };
    let pager = Paragraph::new(pagination::controls_line(&controls))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(pager_title),
        );
    frame.render_widget(pager, chunks[4]);

    // ── Status bar ──
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut status_spans = vec![
        Span::styled(" ←→", key),
        Span::raw(" Page  "),
        Span::styled("1-9", key),
        Span::raw(" Go to  "),
        Span::styled(":", key),
        Span::raw(" Jump  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("↑↓", key),
        Span::raw(" Scroll  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(app.status_msg.as_str(), Style::default().fg(Color::DarkGray)),
    ];
    if let InputMode::PageJump { buffer } = &app.input_mode {
        status_spans.push(Span::styled(
            format!(" > {}", buffer),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status_spans)), chunks[5]);
}

fn banner_lines<'a>(view: &DashboardView<'a>) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    if view.loading {
        lines.push(Line::from(Span::styled(
            " Loading products...",
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(error) = view.error {
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(error, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        ]));
    }
    lines
}
