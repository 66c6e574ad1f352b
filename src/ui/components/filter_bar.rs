use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::engine::filter::StatusFilter;
use crate::store::schema::VerbStats;
use crate::ui::theme::Theme;

pub struct FilterBar<'a> {
    pub active: StatusFilter,
    pub stats: VerbStats,
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(active: StatusFilter, stats: VerbStats, total: usize, theme: &'a Theme) -> Self {
        Self {
            active,
            stats,
            total,
            theme,
        }
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut spans = vec![Span::styled(" Filter: ", Style::default().fg(colors.text_muted()))];
        for (i, filter) in StatusFilter::ALL.iter().enumerate() {
            let text = format!(
                " {} {} ({}) ",
                i + 1,
                filter.label(),
                filter.count(&self.stats, self.total)
            );
            let style = if *filter == self.active {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
