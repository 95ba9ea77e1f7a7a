use crate::dashboard::DashboardView;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Previous,
    Page(usize),
    Next,
}

/// One pagination button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControl {
    pub kind: ControlKind,
    pub enabled: bool,
    pub current: bool,
}

impl PageControl {
    pub fn label(&self) -> String {
        match self.kind {
            ControlKind::Previous => "‹ Prev".to_string(),
            ControlKind::Page(n) => n.to_string(),
            ControlKind::Next => "Next ›".to_string(),
        }
    }

    fn style(&self) -> Style {
        if self.current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if self.enabled {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }
}

/// Previous, one control per page, next.
pub fn controls(view: &DashboardView<'_>) -> Vec<PageControl> {
    let mut out = Vec::with_capacity(view.page_count + 2);
    out.push(PageControl {
        kind: ControlKind::Previous,
        enabled: view.can_prev(),
        current: false,
    });
    for n in 1..=view.page_count {
        out.push(PageControl {
            kind: ControlKind::Page(n),
            enabled: true,
            current: n == view.current_page,
        });
    }
    out.push(PageControl {
        kind: ControlKind::Next,
        enabled: view.can_next(),
        current: false,
    });
    out
}

pub fn controls_line(controls: &[PageControl]) -> Line<'static> {
    let mut spans = Vec::with_capacity(controls.len() * 2);
    for (i, control) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!(" {} ", control.label()), control.style()));
    }
    Line::from(spans)
}

/// Plain rendering with the current page bracketed, e.g. `‹ Prev [1] 2 3 Next ›`.
pub fn summary(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|c| if c.current { format!("[{}]", c.label()) } else { c.label() })
        .collect::<Vec<_>>()
        .join(" ")
}
