use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

/// Where a message originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Bot,
}

/// A single chat message. Immutable once created; the widget only ever
/// appends, never reorders or removes.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    content: String,
    origin: Origin,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content.into(), Origin::User)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content.into(), Origin::Bot)
    }

    fn new(content: String, origin: Origin) -> Self {
        Self {
            content,
            origin,
            timestamp: Local::now(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_from_user(&self) -> bool {
        self.origin == Origin::User
    }

    pub fn render(&self, area: Rect) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let style = self.base_style();

        self.render_header(&mut lines, style);
        self.render_content(&mut lines, area, style);
        self.render_footer(&mut lines, style);

        lines
    }

    fn base_style(&self) -> Style {
        match self.origin {
            Origin::User => Style::default().fg(Color::Rgb(255, 223, 128)),
            Origin::Bot => Style::default().fg(Color::Rgb(144, 238, 144)),
        }
    }

    // User bubbles are nudged right, bot bubbles hug the left margin.
    fn indent(&self) -> &'static str {
        if self.is_from_user() {
            "  "
        } else {
            ""
        }
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let timestamp = self.timestamp.format("%H:%M").to_string();
        let label = match self.origin {
            Origin::User => "você",
            Origin::Bot => "atendente",
        };

        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("┌─".to_string(), style),
            Span::styled(timestamp, style.add_modifier(Modifier::DIM)),
            Span::styled(" ".to_string(), style),
            Span::styled(label.to_string(), style.add_modifier(Modifier::DIM)),
        ]));
    }

    fn render_content(&self, lines: &mut Vec<Line<'static>>, area: Rect, style: Style) {
        let wrap_width = (area.width as usize).saturating_sub(4).max(1);

        for wrapped_line in wrap(&self.content, wrap_width) {
            lines.push(Line::from(vec![
                Span::styled(self.indent().to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped_line.to_string(), style),
            ]));
        }
    }

    fn render_footer(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("╰─".to_string(), style),
        ]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn renders_content_between_header_and_footer() {
        let msg = ChatMessage::bot("uma resposta curta");
        let lines = msg.render(Rect::new(0, 0, 40, 10));

        assert_eq!(lines.len(), 3);
        assert!(rendered_text(&lines).contains("uma resposta curta"));
        assert!(rendered_text(&lines).contains("atendente"));
    }

    #[test]
    fn long_content_wraps_to_the_available_width() {
        let msg = ChatMessage::user("uma mensagem bem mais longa que precisa quebrar em linhas");
        let lines = msg.render(Rect::new(0, 0, 20, 10));

        // header + several wrapped lines + footer
        assert!(lines.len() > 3);
    }

    #[test]
    fn user_messages_are_indented() {
        let msg = ChatMessage::user("oi");
        let lines = msg.render(Rect::new(0, 0, 40, 10));
        assert_eq!(lines[0].spans[0].content.as_ref(), "  ");

        let msg = ChatMessage::bot("oi");
        let lines = msg.render(Rect::new(0, 0, 40, 10));
        assert_eq!(lines[0].spans[0].content.as_ref(), "");
    }
}
