/// Rows revealed per "load more".
pub const PAGE_SIZE: usize = 20;

/// How much of the filtered listing is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    visible: usize,
}

impl Default for Reveal {
    fn default() -> Self {
        Reveal { visible: PAGE_SIZE }
    }
}

impl Reveal {
    pub fn load_more(&mut self) {
        self.visible += PAGE_SIZE;
    }

    pub fn reset(&mut self) {
        self.visible = PAGE_SIZE;
    }

    pub fn visible_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..items.len().min(self.visible)]
    }

    pub fn has_more(&self, total: usize) -> bool {
        total > self.visible
    }
}
