//! In-memory `Surface` for behavior tests.

use crate::observer::Span;
use crate::surface::{Node, Surface};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

/// Order of layout reads and presentation writes, coarse enough to spot a
/// read that would force a synchronous layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

#[derive(Default)]
pub struct RecordingSurface {
    scroll_y: f64,
    viewport_height: f64,
    classes: HashMap<Node, BTreeSet<String>>,
    class_writes: HashMap<(Node, String), usize>,
    styles: HashMap<(Node, String), String>,
    texts: HashMap<Node, String>,
    spans: HashMap<Node, Span>,
    ids: HashMap<String, Span>,
    scrolls: Vec<f64>,
    scrolled_into_view: Vec<Node>,
    stylesheets: Vec<String>,
    preloaded: Vec<String>,
    access_log: RefCell<Vec<Access>>,
}

impl RecordingSurface {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    pub fn place(&mut self, node: Node, id: Option<&str>, span: Span) {
        self.spans.insert(node, span);
        if let Some(id) = id {
            self.ids.insert(id.to_string(), span);
        }
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    pub fn set_text_of(&mut self, node: Node, text: &str) {
        self.texts.insert(node, text.to_string());
    }

    pub fn has_class(&self, node: Node, class: &str) -> bool {
        self.classes
            .get(&node)
            .is_some_and(|classes| classes.contains(class))
    }

    /// Add/remove/toggle calls made for `class` on `node`.
    pub fn class_writes(&self, node: Node, class: &str) -> usize {
        self.class_writes
            .get(&(node, class.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn style(&self, node: Node, property: &str) -> Option<&str> {
        self.styles
            .get(&(node, property.to_string()))
            .map(String::as_str)
    }

    pub fn text_of(&self, node: Node) -> Option<&str> {
        self.texts.get(&node).map(String::as_str)
    }

    pub fn scrolls(&self) -> &[f64] {
        &self.scrolls
    }

    pub fn scrolled_into_view(&self) -> &[Node] {
        &self.scrolled_into_view
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    pub fn preloaded(&self) -> &[String] {
        &self.preloaded
    }

    pub fn access_log(&self) -> Vec<Access> {
        self.access_log.borrow().clone()
    }

    fn record(&self, access: Access) {
        self.access_log.borrow_mut().push(access);
    }

    fn record_class_write(&mut self, node: Node, class: &str) {
        self.record(Access::Write);
        *self
            .class_writes
            .entry((node, class.to_string()))
            .or_insert(0) += 1;
    }
}

impl Surface for RecordingSurface {
    fn add_class(&mut self, node: Node, class: &str) {
        self.record_class_write(node, class);
        self.classes
            .entry(node)
            .or_default()
            .insert(class.to_string());
    }

    fn remove_class(&mut self, node: Node, class: &str) {
        self.record_class_write(node, class);
        if let Some(classes) = self.classes.get_mut(&node) {
            classes.remove(class);
        }
    }

    fn toggle_class(&mut self, node: Node, class: &str) {
        self.record_class_write(node, class);
        let classes = self.classes.entry(node).or_default();
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn set_style(&mut self, node: Node, property: &str, value: &str) {
        self.record(Access::Write);
        self.styles
            .insert((node, property.to_string()), value.to_string());
    }

    fn set_text(&mut self, node: Node, text: &str) {
        self.record(Access::Write);
        self.texts.insert(node, text.to_string());
    }

    fn text(&self, node: Node) -> Option<String> {
        self.texts.get(&node).cloned()
    }

    fn scroll_y(&self) -> f64 {
        self.record(Access::Read);
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.record(Access::Read);
        self.viewport_height
    }

    fn span(&self, node: Node) -> Option<Span> {
        self.record(Access::Read);
        self.spans.get(&node).copied()
    }

    fn span_of_id(&self, id: &str) -> Option<Span> {
        self.ids.get(id).copied()
    }

    fn smooth_scroll_to(&mut self, top: f64) {
        self.scrolls.push(top);
    }

    fn smooth_scroll_into_view(&mut self, node: Node) {
        self.scrolled_into_view.push(node);
    }

    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }

    fn preload_image(&mut self, src: &str) {
        self.preloaded.push(src.to_string());
    }
}
