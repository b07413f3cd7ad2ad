use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen split used while a level is being played.
pub struct GameLayout {
    pub header: Rect,
    pub prompt: Rect,
    pub board: Rect,
    pub controls: Rect,
    pub footer: Rect,
}

impl GameLayout {
    pub fn new(area: Rect) -> Self {
        // Short terminals give the board everything the controls can spare.
        let controls = if area.height >= 24 { 5 } else { 3 };
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(6),
                Constraint::Length(controls),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: vertical[0],
            prompt: vertical[1],
            board: vertical[2],
            controls: vertical[3],
            footer: vertical[4],
        }
    }

    /// Two side-by-side boards for the comparison level.
    pub fn split_board(&self) -> (Rect, Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(self.board);
        (halves[0], halves[1])
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 7;

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
    fn test_centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered_rect(50, 50, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }

    #[test]
    fn test_centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup, Rect::new(20, 10, 60, 20));
    }

    #[test]
    fn test_game_layout_covers_area() {
        let area = Rect::new(0, 0, 80, 30);
        let layout = GameLayout::new(area);
        assert_eq!(layout.header.y, 0);
        assert_eq!(layout.footer.y + layout.footer.height, 30);
        let (left, right) = layout.split_board();
        assert_eq!(left.width + right.width, 80);
    }
}
