use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::store::schema::LanguagePair;
use crate::ui::theme::Theme;

const SLOT_HEIGHT: u16 = 3;

/// First pair to draw so that `selected` is inside a window of `visible`
/// slots over `len` pairs.
fn scroll_offset(selected: usize, visible: usize, len: usize) -> usize {
    let selected = selected.min(len.saturating_sub(1));
    (selected + 1).saturating_sub(visible)
}

/// Popup listing the available language pairs.
pub struct PairMenu<'a> {
    pub pairs: &'a [LanguagePair],
    pub selected: usize,
    pub active_code: &'a str,
    pub theme: &'a Theme,
}

impl<'a> PairMenu<'a> {
    pub fn new(
        pairs: &'a [LanguagePair],
        selected: usize,
        active_code: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            pairs,
            selected,
            active_code,
            theme,
        }
    }
}

impl Widget for PairMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" Language Pair ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.pairs.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No language pairs available",
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let visible = (layout[0].height / SLOT_HEIGHT).max(1) as usize;
        let offset = scroll_offset(self.selected, visible, self.pairs.len());
        let shown = &self.pairs[offset..(offset + visible).min(self.pairs.len())];

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                shown
                    .iter()
                    .map(|_| Constraint::Length(SLOT_HEIGHT))
                    .collect::<Vec<_>>(),
            )
            .split(layout[0]);

        for (slot, pair) in shown.iter().enumerate() {
            let i = offset + slot;
            let is_selected = i == self.selected;
            let is_active = pair.code == self.active_code;
            let indicator = if is_selected { ">" } else { " " };
            let active_mark = if is_active { "  (current)" } else { "" };

            let label_text = format!(" {indicator} {}{active_mark}", pair.label());
            let desc_text = format!(
                "     Learn {} from {}",
                pair.goal_language, pair.main_language
            );

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    desc_text,
                    Style::default().fg(colors.text_muted()),
                )),
            ];
            Paragraph::new(lines).render(menu_layout[slot], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            " [enter] Select  [esc] Cancel",
            Style::default().fg(colors.text_muted()),
        )))
        .render(layout[1], buf);
    }
}
