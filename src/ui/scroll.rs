/// Viewport state for a list taller than the widget: a row offset plus an
/// optional height cap. With no cap every row is shown and the offset stays 0.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub offset: usize,
    pub max_visible: Option<usize>,
}

impl ScrollState {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            offset: 0,
            max_visible,
        }
    }

    pub fn ensure_visible(&mut self, active: usize, total: usize) {
        let Some(max) = self.max_visible else {
            return;
        };
        if total <= max {
            self.offset = 0;
            return;
        }
        if active < self.offset {
            self.offset = active;
            return;
        }
        let last = self.offset.saturating_add(max).saturating_sub(1);
        if active > last {
            self.offset = active + 1 - max;
        }
    }

    pub fn clamp_offset(&mut self, total: usize) {
        let Some(max) = self.max_visible else {
            self.offset = 0;
            return;
        };
        self.offset = self.offset.min(total.saturating_sub(max));
    }

    pub fn clamp_active(active: &mut usize, total: usize) {
        if total == 0 {
            *active = 0;
        } else if *active >= total {
            *active = total - 1;
        }
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        match self.max_visible {
            Some(limit) => {
                let start = self.offset.min(total);
                let end = (start + limit).min(total);
                (start, end)
            }
            None => (0, total),
        }
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        let max = self.max_visible?;
        if total <= max {
            return None;
        }
        let (start, end) = self.visible_range(total);
        Some(format!("{}-{} of {}", start + 1, end, total))
    }
}

#[cfg(test)]
mod tests {
    use super::ScrollState;

    #[test]
    fn unbounded_scroll_shows_everything() {
        let mut scroll = ScrollState::new(None);
        scroll.ensure_visible(40, 50);
        assert_eq!(scroll.visible_range(50), (0, 50));
        assert_eq!(scroll.footer(50), None);
    }

    #[test]
    fn ensure_visible_follows_active_row() {
        let mut scroll = ScrollState::new(Some(5));
        scroll.ensure_visible(9, 20);
        assert_eq!(scroll.visible_range(20), (5, 10));

        scroll.ensure_visible(2, 20);
        assert_eq!(scroll.visible_range(20), (2, 7));
    }

    #[test]
    fn clamp_offset_after_shrink() {
        let mut scroll = ScrollState::new(Some(5));
        scroll.offset = 15;
        scroll.clamp_offset(8);
        assert_eq!(scroll.offset, 3);
    }
}
