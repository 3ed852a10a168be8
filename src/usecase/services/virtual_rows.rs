#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualWindow {
    pub start: usize,
    pub end: usize,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl VirtualWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// A non-positive `row_height` disables virtualization and renders every row.
pub fn visible_window(
    scroll_top: f64,
    viewport_height: f64,
    row_height: f64,
    overscan: usize,
    len: usize,
) -> VirtualWindow {
    if row_height <= 0.0 || len == 0 {
        return VirtualWindow {
            start: 0,
            end: len,
            padding_top: 0.0,
            padding_bottom: 0.0,
        };
    }

    let scroll_top = scroll_top.max(0.0);
    let first_visible = (scroll_top / row_height).floor() as usize;
    let last_visible = ((scroll_top + viewport_height.max(0.0)) / row_height).ceil() as usize;

    let start = first_visible.saturating_sub(overscan).min(len);
    let end = last_visible.saturating_add(overscan).min(len).max(start);

    VirtualWindow {
        start,
        end,
        padding_top: start as f64 * row_height,
        padding_bottom: (len - end) as f64 * row_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_of_list_renders_viewport_plus_overscan() {
        let window = visible_window(0.0, 100.0, 10.0, 4, 1000);

        assert_eq!((window.start, window.end), (0, 14));
        assert_eq!(window.padding_top, 0.0);
        assert_eq!(window.padding_bottom, 9860.0);
    }

    #[test]
    fn middle_of_list_overscans_both_sides() {
        let window = visible_window(500.0, 100.0, 10.0, 4, 1000);

        assert_eq!((window.start, window.end), (46, 64));
        assert_eq!(window.len(), 18);
        assert_eq!(window.padding_top, 460.0);
    }

    #[test]
    fn window_clamps_past_the_end() {
        let window = visible_window(10_000.0, 100.0, 10.0, 4, 30);

        assert_eq!((window.start, window.end), (30, 30));
        assert_eq!(window.len(), 0);
        assert_eq!(window.padding_bottom, 0.0);
    }

    #[test]
    fn zero_row_height_renders_everything() {
        let window = visible_window(300.0, 100.0, 0.0, 4, 12);

        assert_eq!((window.start, window.end), (0, 12));
    }
}
