//! FocusRing — manages keyboard focus cycling between components.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    /// Ring for the current drawer state: the grid alone, or grid + drawer.
    pub fn for_drawer(drawer_open: bool) -> Vec<ComponentId> {
        if drawer_open {
            vec![ComponentId::WidgetGrid, ComponentId::Drawer]
        } else {
            vec![ComponentId::WidgetGrid]
        }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = self.current.checked_sub(1).unwrap_or(self.items.len() - 1);
        self.current()
    }

    /// Focus `id` if it is in the ring.
    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring contents, keeping focus on the same component when
    /// it survives, otherwise falling back to the first item.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        self.current = old
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Self::for_drawer(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_with_drawer() {
        let mut ring = FocusRing::new(FocusRing::for_drawer(true));
        assert_eq!(ring.current(), Some(ComponentId::WidgetGrid));
        assert_eq!(ring.next(), Some(ComponentId::Drawer));
        assert_eq!(ring.next(), Some(ComponentId::WidgetGrid));
        assert_eq!(ring.prev(), Some(ComponentId::Drawer));
    }

    #[test]
    fn test_closing_drawer_returns_to_grid() {
        let mut ring = FocusRing::new(FocusRing::for_drawer(true));
        ring.set(ComponentId::Drawer);
        ring.set_items(FocusRing::for_drawer(false));
        assert!(ring.is_focused(ComponentId::WidgetGrid));
        ring.set(ComponentId::Drawer);
        assert!(ring.is_focused(ComponentId::WidgetGrid));
    }
}
