use crate::product::Product;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Description lines shown per card before truncating.
pub const DESCRIPTION_LINES: usize = 2;

const INDENT: &str = "   ";

/// Render one product as a block of lines. Pure: same product and width, same lines.
pub fn card_lines(product: &Product, width: u16) -> Vec<Line<'_>> {
    let inner = (width as usize).saturating_sub(INDENT.len()).max(1);
    let column = (inner / 2).max(1);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" ▣ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                product.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(INDENT),
            Span::styled("Image: ", label),
            Span::styled(
                product.thumbnail.as_str(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ];

    for text in clamp_lines(&product.description, inner, DESCRIPTION_LINES) {
        lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(text, Style::default().fg(Color::Gray)),
        ]));
    }

    // Two columns: rating / sku / brand on the left, price / discount / stock on the right.
    let rows = [
        (
            format!("★ {:.1} ({} reviews)", product.rating, product.reviews.len()),
            Style::default().fg(Color::Yellow),
            format!("${:.2}", product.price),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        (
            format!("SKU: {}", product.sku),
            Style::default().fg(Color::White),
            format!("-{}% off", product.discount_percentage),
            Style::default().fg(Color::Green),
        ),
        (
            format!("Brand: {}", product.brand),
            Style::default().fg(Color::White),
            format!("{} - {} in stock", product.availability_status, product.stock),
            Style::default().fg(Color::White),
        ),
    ];
    for (left, left_style, right, right_style) in rows {
        lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(pad_to(&left, column), left_style),
            Span::styled(right, right_style),
        ]));
    }

    let mut tag_spans = vec![Span::raw(INDENT)];
    for (i, tag) in product.tags.iter().enumerate() {
        if i > 0 {
            tag_spans.push(Span::raw(" "));
        }
        tag_spans.push(Span::styled(
            format!("[{}]", tag),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ));
    }
    lines.push(Line::from(tag_spans));

    lines.push(Line::from(vec![
        Span::raw(INDENT),
        Span::styled(
            pad_to(&format!("Shipping: {}", product.shipping_information), column),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Returns: {}", product.return_policy),
            Style::default().fg(Color::White),
        ),
    ]));

    lines
}

/// Cards for a page, separated by rules.
pub fn render_cards<'a>(products: &[&'a Product], width: u16) -> Vec<Line<'a>> {
    let rule = "─".repeat(width as usize);
    let mut lines = Vec::new();
    for (i, &product) in products.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(Span::styled(
                rule.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.extend(card_lines(product, width));
    }
    lines
}

/// Flatten styled lines into plain strings.
pub fn plain_text(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

/// Word-wrap `text` to `width` columns, keeping at most `max_lines` lines.
/// The last kept line ends in "…" when text was dropped.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    if max_lines == 0 {
        return lines;
    }

    let mut current = String::new();
    let mut truncated = false;

    'words: for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                truncated = true;
                break;
            }
        }

        // Words wider than a whole line are split hard.
        let mut rest = word;
        loop {
            let (head, tail) = split_at_width(rest, width);
            if tail.is_empty() {
                current = head.to_string();
                break;
            }
            lines.push(head.to_string());
            if lines.len() == max_lines {
                truncated = true;
                break 'words;
            }
            rest = tail;
        }
    }

    if !current.is_empty() {
        if lines.len() < max_lines {
            lines.push(current);
        } else {
            truncated = true;
        }
    }

    if truncated {
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && last.width() + 1 > width {
                last.pop();
            }
            last.push('…');
        }
    }
    lines
}

/// Split so the head fits in `width` columns. The head always holds at least one char.
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width && idx > 0 {
            return s.split_at(idx);
        }
        used += w;
    }
    (s, "")
}

/// Right-pad to `width` display columns, leaving at least one space of gap.
fn pad_to(s: &str, width: usize) -> String {
    let w = s.width();
    let pad = width.saturating_sub(w).max(1);
    format!("{}{}", s, " ".repeat(pad))
}
