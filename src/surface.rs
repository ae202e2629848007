use crate::observer::Span;

/// Elements the page behaviors read from or write to. Indexed variants follow
/// document order within their group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Body,
    Navbar,
    NavMenu,
    NavToggle,
    NavLink(usize),
    Section(usize),
    Card(usize),
    Floating(usize),
    ContactItem(usize),
    Hero(usize),
    HeroTitle,
}

/// Presentation state the controller mutates. Writes to nodes that are not on
/// the page are silently dropped.
pub trait Surface {
    fn add_class(&mut self, node: Node, class: &str);
    fn remove_class(&mut self, node: Node, class: &str);
    fn toggle_class(&mut self, node: Node, class: &str);
    fn set_style(&mut self, node: Node, property: &str, value: &str);
    fn set_text(&mut self, node: Node, text: &str);
    fn text(&self, node: Node) -> Option<String>;

    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    /// Document-space extent of `node`.
    fn span(&self, node: Node) -> Option<Span>;
    /// Extent of the element with the given `id` anywhere in the document.
    fn span_of_id(&self, id: &str) -> Option<Span>;

    fn smooth_scroll_to(&mut self, top: f64);
    fn smooth_scroll_into_view(&mut self, node: Node);
    fn inject_stylesheet(&mut self, css: &str);
    fn preload_image(&mut self, src: &str);
}
