use std::collections::BTreeMap;

use crate::registry::{ElementHandle, RenderSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub handle: ElementHandle,
    pub html: String,
    pub visible: bool,
    /// Whether the item was ever visible while attached to the list.
    pub ever_shown_attached: bool,
}

/// In-memory ordered list, standing in for a `<ul>` of `<li>` elements.
#[derive(Debug, Default)]
pub struct ListSurface {
    next_handle: u64,
    detached: BTreeMap<ElementHandle, ListItem>,
    items: Vec<ListItem>,
    commands: u64,
}

impl ListSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached items in container order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn rendered_html(&self) -> Vec<String> {
        self.items.iter().map(|i| i.html.clone()).collect()
    }

    pub fn visible_html(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.visible)
            .map(|i| i.html.clone())
            .collect()
    }

    /// Total number of surface operations received.
    pub fn commands(&self) -> u64 {
        self.commands
    }

    fn item_mut(&mut self, element: ElementHandle) -> Option<&mut ListItem> {
        if let Some(item) = self.detached.get_mut(&element) {
            return Some(item);
        }
        self.items.iter_mut().find(|i| i.handle == element)
    }
}

impl RenderSurface for ListSurface {
    fn create(&mut self, html: &str) -> ElementHandle {
        self.commands += 1;
        self.next_handle += 1;
        let handle = ElementHandle(self.next_handle);
        self.detached.insert(
            handle,
            ListItem {
                handle,
                html: html.to_string(),
                visible: true,
                ever_shown_attached: false,
            },
        );
        handle
    }

    fn append(&mut self, element: ElementHandle) {
        self.commands += 1;
        let mut item = match self.detached.remove(&element) {
            Some(item) => item,
            None => {
                let Some(pos) = self.items.iter().position(|i| i.handle == element) else {
                    return;
                };
                self.items.remove(pos)
            }
        };
        item.ever_shown_attached |= item.visible;
        self.items.push(item);
    }

    fn remove(&mut self, element: ElementHandle) {
        self.commands += 1;
        self.detached.remove(&element);
        self.items.retain(|i| i.handle != element);
    }

    fn show(&mut self, element: ElementHandle) {
        self.commands += 1;
        let attached = !self.detached.contains_key(&element);
        if let Some(item) = self.item_mut(element) {
            item.visible = true;
            item.ever_shown_attached |= attached;
        }
    }

    fn hide(&mut self, element: ElementHandle) {
        self.commands += 1;
        if let Some(item) = self.item_mut(element) {
            item.visible = false;
        }
    }
}
