use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::store::schema::VerbStats;
use crate::ui::theme::Theme;

/// Learned / needs practice / not reviewed, as one stacked bar plus counts.
pub struct ProgressBar<'a> {
    pub stats: VerbStats,
    pub compact: bool,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(stats: VerbStats, theme: &'a Theme) -> Self {
        Self {
            stats,
            compact: false,
            theme,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

/// Widths of the learned and not-learned segments for a bar `width` cells wide.
fn segment_widths(stats: &VerbStats, width: u16) -> (u16, u16) {
    let learned = (stats.learned_ratio() * width as f64).round() as u16;
    let not_learned = (stats.not_learned_ratio() * width as f64).round() as u16;
    let learned = learned.min(width);
    (learned, not_learned.min(width - learned))
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Your Progress ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (learned_w, not_learned_w) = segment_widths(&self.stats, inner.width);
        for x in inner.x..inner.x + inner.width {
            let offset = x - inner.x;
            let bg = if offset < learned_w {
                colors.learned()
            } else if offset < learned_w + not_learned_w {
                colors.not_learned()
            } else {
                colors.bar_empty()
            };
            buf[(x, inner.y)].set_style(Style::default().bg(bg));
        }

        let count = |n: usize, label: &str, color: Color| {
            vec![
                Span::styled(
                    format!("{n}"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {label}"), Style::default().fg(color)),
            ]
        };

        let mut spans = Vec::new();
        spans.extend(count(self.stats.learned, "Learned", colors.learned()));
        spans.push(Span::raw("   "));
        spans.extend(count(self.stats.not_learned, "Need Practice", colors.not_learned()));
        spans.push(Span::raw("   "));
        spans.extend(count(self.stats.pending, "Not Reviewed", colors.text_muted()));

        if inner.height >= 3 {
            let pct = self.stats.learned_ratio() * 100.0;
            spans.push(Span::styled(
                format!("   ({pct:.0}% learned)"),
                Style::default().fg(colors.text_muted()),
            ));
        }

        // Compact layouts write the counts over the bar itself.
        let row_y = if inner.height >= 2 && !self.compact {
            inner.y + 1
        } else {
            inner.y
        };
        Paragraph::new(Line::from(spans)).render(Rect::new(inner.x, row_y, inner.width, 1), buf);
    }
}
