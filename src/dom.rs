use crate::config::parse_parallax_speed;
use crate::controller::PageLayout;
use crate::observer::Span;
use crate::surface::{Node, Surface};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlElement, HtmlImageElement, ScrollBehavior, ScrollIntoViewOptions,
    ScrollToOptions, Window,
};

const NAV_TOGGLE_ID: &str = "nav-toggle";
const NAV_MENU_ID: &str = "nav-menu";
const NAVBAR_SELECTOR: &str = ".navbar";
const NAV_LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = ".content-section";
const CARD_SELECTOR: &str = ".content-card";
const FLOATING_SELECTOR: &str = ".floating-element";
const CONTACT_ITEM_SELECTOR: &str = ".contact-item";
const HERO_SELECTOR: &str = ".hero-title, .hero-subtitle, .hero-scroll-indicator";
const HERO_TITLE_TEXT_SELECTOR: &str = ".hero-title .gradient-text";

/// Elements that receive event listeners, cloned out before the surface is
/// handed to the controller.
pub struct ListenTargets {
    pub nav_toggle: Option<HtmlElement>,
    pub nav_links: Vec<HtmlElement>,
    pub contact_items: Vec<HtmlElement>,
}

/// `Surface` over the live document. Element sets are resolved once at startup.
pub struct DomSurface {
    window: Window,
    document: Document,
    body: Option<HtmlElement>,
    navbar: Option<HtmlElement>,
    nav_menu: Option<HtmlElement>,
    nav_toggle: Option<HtmlElement>,
    nav_links: Vec<HtmlElement>,
    sections: Vec<HtmlElement>,
    cards: Vec<HtmlElement>,
    floating: Vec<HtmlElement>,
    contact_items: Vec<HtmlElement>,
    hero: Vec<HtmlElement>,
    hero_title: Option<HtmlElement>,
}

fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn query_one(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

impl DomSurface {
    pub fn discover(window: Window, document: Document) -> Self {
        Self {
            body: document.body(),
            navbar: query_one(&document, NAVBAR_SELECTOR),
            nav_menu: by_id(&document, NAV_MENU_ID),
            nav_toggle: by_id(&document, NAV_TOGGLE_ID),
            nav_links: query_all(&document, NAV_LINK_SELECTOR),
            sections: query_all(&document, SECTION_SELECTOR),
            cards: query_all(&document, CARD_SELECTOR),
            floating: query_all(&document, FLOATING_SELECTOR),
            contact_items: query_all(&document, CONTACT_ITEM_SELECTOR),
            hero: query_all(&document, HERO_SELECTOR),
            hero_title: query_one(&document, HERO_TITLE_TEXT_SELECTOR),
            window,
            document,
        }
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout {
            nav_links: self
                .nav_links
                .iter()
                .map(|link| link.get_attribute("href").unwrap_or_default())
                .collect(),
            sections: self
                .sections
                .iter()
                .map(|section| Some(section.id()).filter(|id| !id.is_empty()))
                .collect(),
            floating_speeds: self
                .floating
                .iter()
                .map(|element| parse_parallax_speed(element.get_attribute("data-speed").as_deref()))
                .collect(),
            cards: self.cards.len(),
            contact_items: self.contact_items.len(),
            hero_elements: self.hero.len(),
            has_hero_title: self.hero_title.is_some(),
        }
    }

    pub fn listen_targets(&self) -> ListenTargets {
        ListenTargets {
            nav_toggle: self.nav_toggle.clone(),
            nav_links: self.nav_links.clone(),
            contact_items: self.contact_items.clone(),
        }
    }

    fn element(&self, node: Node) -> Option<&HtmlElement> {
        match node {
            Node::Body => self.body.as_ref(),
            Node::Navbar => self.navbar.as_ref(),
            Node::NavMenu => self.nav_menu.as_ref(),
            Node::NavToggle => self.nav_toggle.as_ref(),
            Node::NavLink(index) => self.nav_links.get(index),
            Node::Section(index) => self.sections.get(index),
            Node::Card(index) => self.cards.get(index),
            Node::Floating(index) => self.floating.get(index),
            Node::ContactItem(index) => self.contact_items.get(index),
            Node::Hero(index) => self.hero.get(index),
            Node::HeroTitle => self.hero_title.as_ref(),
        }
    }

    fn document_span(&self, element: &web_sys::Element) -> Span {
        let rect = element.get_bounding_client_rect();
        Span::new(rect.top() + self.scroll_y(), rect.height())
    }
}

impl Surface for DomSurface {
    fn add_class(&mut self, node: Node, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: Node, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().remove_1(class);
        }
    }

    fn toggle_class(&mut self, node: Node, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().toggle(class);
        }
    }

    fn set_style(&mut self, node: Node, property: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.style().set_property(property, value);
        }
    }

    fn set_text(&mut self, node: Node, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn text(&self, node: Node) -> Option<String> {
        self.element(node)?.text_content()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(720.0)
    }

    fn span(&self, node: Node) -> Option<Span> {
        self.element(node).map(|element| self.document_span(element))
    }

    fn span_of_id(&self, id: &str) -> Option<Span> {
        self.document
            .get_element_by_id(id)
            .map(|element| self.document_span(&element))
    }

    fn smooth_scroll_to(&mut self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn smooth_scroll_into_view(&mut self, node: Node) {
        if let Some(element) = self.element(node) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn inject_stylesheet(&mut self, css: &str) {
        let Some(head) = self.document.head() else {
            return;
        };
        let Ok(style) = self.document.create_element("style") else {
            return;
        };

        style.set_text_content(Some(css));
        let _ = head.append_child(&style);
    }

    fn preload_image(&mut self, src: &str) {
        if let Ok(image) = HtmlImageElement::new() {
            image.set_src(src);
        }
    }
}
