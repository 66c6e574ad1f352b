use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥120 cols: three card columns
    Medium, // 80-119 cols: two card columns
    Narrow, // <80 cols: single column, compact stats
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 120 {
            LayoutTier::Wide
        } else if area.width >= 80 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn card_columns(&self) -> usize {
        match self {
            LayoutTier::Wide => 3,
            LayoutTier::Medium => 2,
            LayoutTier::Narrow => 1,
        }
    }

    pub fn compact_stats(&self) -> bool {
        *self == LayoutTier::Narrow
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub stats: Rect,
    pub filters: Rect,
    pub main: Rect,
    pub pagination: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    /// `footer_lines` is the number of packed hint lines; the footer is
    /// always at least one row tall.
    pub fn new(area: Rect, footer_lines: usize) -> Self {
        let tier = LayoutTier::from_area(area);
        let footer_height = footer_lines.clamp(1, u16::MAX as usize) as u16;
        let stats_height = if tier.compact_stats() { 3 } else { 5 };

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(stats_height),
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(footer_height),
            ])
            .split(area);

        Self {
            header: vertical[0],
            stats: vertical[1],
            filters: vertical[2],
            main: vertical[3],
            pagination: vertical[4],
            footer: vertical[5],
            tier,
        }
    }
}

/// Split `area` into a grid with `columns` columns and enough rows for
/// `count` cells, filled row by row.
pub fn card_grid(area: Rect, count: usize, columns: usize) -> Vec<Rect> {
    if count == 0 || columns == 0 {
        return Vec::new();
    }
    let rows = count.div_ceil(columns);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows).map(|_| Constraint::Ratio(1, rows as u32)).collect::<Vec<_>>())
        .split(area);

    let mut cells = Vec::with_capacity(count);
    for row in row_areas.iter() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                (0..columns)
                    .map(|_| Constraint::Ratio(1, columns as u32))
                    .collect::<Vec<_>>(),
            )
            .split(*row);
        cells.extend(col_areas.iter().copied());
    }
    cells.truncate(count);
    cells
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 10;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_width() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 150, 40)).card_columns(), 3);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 100, 40)).card_columns(), 2);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 60, 40)).card_columns(), 1);
    }

    #[test]
    fn grid_yields_one_cell_per_card() {
        let area = Rect::new(0, 0, 120, 30);
        let cells = card_grid(area, 5, 3);
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0].y, cells[2].y);
        assert!(cells[3].y > cells[0].y);
        assert!(card_grid(area, 0, 3).is_empty());
    }

    #[test]
    fn hints_wrap_to_width() {
        let lines = pack_hint_lines(&["[q] Quit", "[p] Pair", "[tab] Filter"], 20);
        assert_eq!(lines, vec![" [q] Quit  [p] Pair", " [tab] Filter"]);
    }

    #[test]
    fn footer_grows_with_wrapped_hints() {
        let area = Rect::new(0, 0, 60, 40);
        let hints = [
            "[j/k] Card",
            "[h/l] Page",
            "[space] Translation",
            "[y] Learned",
            "[p] Pair",
            "[q] Quit",
        ];
        let lines = pack_hint_lines(&hints, area.width as usize);
        assert!(lines.len() > 1);

        let layout = AppLayout::new(area, lines.len());
        assert_eq!(layout.footer.height as usize, lines.len());
        assert_eq!(layout.footer.y + layout.footer.height, area.height);
        assert_eq!(AppLayout::new(area, 0).footer.height, 1);
    }

    #[test]
    fn popup_never_exceeds_area() {
        let area = Rect::new(0, 0, 30, 8);
        let popup = centered_rect(50, 50, area);
        assert!(popup.width <= area.width && popup.height <= area.height);
    }
}
