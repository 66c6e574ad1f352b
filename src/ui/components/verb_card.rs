use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget, Wrap};

use crate::store::schema::{Verb, VerbStatus};
use crate::ui::theme::Theme;

pub struct VerbCard<'a> {
    pub verb: &'a Verb,
    pub status: VerbStatus,
    pub selected: bool,
    pub expanded: bool,
    pub theme: &'a Theme,
}

impl<'a> VerbCard<'a> {
    pub fn new(verb: &'a Verb, status: VerbStatus, theme: &'a Theme) -> Self {
        Self {
            verb,
            status,
            selected: false,
            expanded: false,
            theme,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

fn status_badge(status: VerbStatus) -> &'static str {
    match status {
        VerbStatus::Learned => "✓ learned",
        VerbStatus::NotLearned => "✗ practice",
        VerbStatus::Pending => "",
    }
}

impl Widget for VerbCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let status_color = colors.status(self.status);

        let border_style = if self.selected {
            Style::default()
                .fg(colors.border_focused())
                .add_modifier(Modifier::BOLD)
        } else if self.status == VerbStatus::Pending {
            Style::default().fg(colors.border())
        } else {
            Style::default().fg(status_color)
        };

        let mut block = Block::bordered()
            .border_style(border_style)
            .border_type(if self.selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .title(Line::from(Span::styled(
                format!(" {} ", self.verb.word),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
        let badge = status_badge(self.status);
        if !badge.is_empty() {
            block = block.title(
                Line::from(Span::styled(
                    format!(" {badge} "),
                    Style::default().fg(status_color),
                ))
                .right_aligned(),
            );
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(
            self.verb.example.as_str(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::ITALIC),
        ))];

        if self.expanded {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                self.verb.word_translation.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                self.verb.example_translation.as_str(),
                Style::default().fg(colors.fg()),
            )));
            if let Some(tips) = self.verb.tips() {
                lines.push(Line::from(vec![
                    Span::styled("Tip: ", Style::default().fg(colors.text_muted()).add_modifier(Modifier::BOLD)),
                    Span::styled(tips, Style::default().fg(colors.text_muted())),
                ]));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "[space] Show translation",
                Style::default().fg(colors.text_muted()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
