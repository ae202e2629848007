use crate::config::PageConfig;
use crate::logging::{log_event, WELCOME_BANNER};
use crate::observer::{Span, Viewport};
use crate::surface::{Node, Surface};
use crate::tracker::{indicator_href, RevealSet, ViewportTracker};
use serde_json::json;
use std::rc::Rc;

const ACTIVE_CLASS: &str = "active";
const VISIBLE_CLASS: &str = "visible";
const LOADED_CLASS: &str = "loaded";

const NAVBAR_SOLID_BACKGROUND: &str = "rgba(47, 49, 54, 0.98)";
const NAVBAR_SOLID_SHADOW: &str = "0 2px 20px rgba(0, 0, 0, 0.3)";
const NAVBAR_RESTING_BACKGROUND: &str = "rgba(47, 49, 54, 0.95)";
const NAVBAR_RESTING_SHADOW: &str = "none";

const CARD_HIDDEN_TRANSFORM: &str = "translateY(20px)";
const CARD_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";
const SETTLED_TRANSFORM: &str = "translateY(0)";
const CONTACT_HOVER_TRANSFORM: &str = "translateY(-10px) scale(1.02)";
const CONTACT_REST_TRANSFORM: &str = "translateY(0) scale(1)";

pub const ACTIVE_LINK_STYLESHEET: &str = r#"
    .nav-link.active {
        color: var(--discord-blurple) !important;
    }

    .nav-link.active::after {
        width: 100% !important;
    }

    body.loaded .hero-title,
    body.loaded .hero-subtitle,
    body.loaded .hero-scroll-indicator {
        opacity: 0;
        transform: translateY(30px);
        transition: opacity 0.6s ease, transform 0.6s ease;
    }
"#;

/// What was found on the page at startup. Membership never changes afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    /// `href` of each nav link, empty when the attribute is missing.
    pub nav_links: Vec<String>,
    /// `id` of each content section.
    pub sections: Vec<Option<String>>,
    /// `data-speed` of each floating element, already defaulted.
    pub floating_speeds: Vec<f64>,
    pub cards: usize,
    pub contact_items: usize,
    pub hero_elements: usize,
    pub has_hero_title: bool,
}

impl PageLayout {
    /// First nav link pointing at `#id`.
    pub fn link_for_section(&self, id: &str) -> Option<usize> {
        let href = indicator_href(id);
        self.nav_links.iter().position(|link| *link == href)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowDown,
    ArrowUp,
    Other,
}

impl Key {
    /// Maps `KeyboardEvent.key`.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Self::Escape,
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hover {
    Enter,
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEvent {
    Startup,
    NavToggleClick,
    NavLinkClick(usize),
    /// Every `scroll` event.
    Scroll,
    /// The rate-limited copy of the scroll reaction.
    ThrottledScroll,
    Resize,
    Load,
    KeyDown(Key),
    ContactHover(usize, Hover),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeferredTask {
    RevealHero(usize),
    TypeCharacter { text: Rc<str>, index: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deferred {
    pub delay_ms: u32,
    pub task: DeferredTask,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    pub prevent_default: bool,
    pub deferred: Vec<Deferred>,
}

impl Response {
    fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            deferred: Vec::new(),
        }
    }
}

/// Layout reads for one pass, taken before any write of the same event.
struct Geometry {
    viewport: Viewport,
    sections: Vec<Option<Span>>,
    cards: Vec<Option<Span>>,
}

/// Owns the page context and reacts to page events by mutating the surface.
pub struct PageController<S> {
    layout: PageLayout,
    config: PageConfig,
    surface: S,
    sections: ViewportTracker,
    cards: RevealSet,
}

impl<S: Surface> PageController<S> {
    pub fn new(layout: PageLayout, config: PageConfig, surface: S) -> Self {
        let sections = ViewportTracker::new(layout.sections.clone(), config.reveal, config.active);
        let cards = RevealSet::new(layout.cards, config.reveal);

        Self {
            layout,
            config,
            surface,
            sections,
            cards,
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[cfg(test)]
    pub fn current_section(&self) -> Option<usize> {
        self.sections.current()
    }

    pub fn handle(&mut self, event: PageEvent) -> Response {
        match event {
            PageEvent::Startup => {
                self.startup();
                Response::default()
            }
            PageEvent::NavToggleClick => {
                self.surface.toggle_class(Node::NavMenu, ACTIVE_CLASS);
                self.surface.toggle_class(Node::NavToggle, ACTIVE_CLASS);
                Response::default()
            }
            PageEvent::NavLinkClick(index) => {
                self.close_menu();
                self.scroll_to_link_target(index);
                Response::prevent_default()
            }
            PageEvent::Scroll => {
                let geometry = self.measure();
                let scrolled = geometry.viewport.scroll_y;
                self.apply_parallax(scrolled);
                self.apply_navbar_style(scrolled);
                self.apply_geometry(geometry);
                Response::default()
            }
            PageEvent::ThrottledScroll => {
                let scrolled = self.surface.scroll_y();
                self.apply_navbar_style(scrolled);
                self.apply_parallax(scrolled);
                Response::default()
            }
            PageEvent::Resize => {
                self.geometry_pass();
                Response::default()
            }
            PageEvent::Load => self.load(),
            PageEvent::KeyDown(key) => self.key_down(key),
            PageEvent::ContactHover(index, _) if index >= self.layout.contact_items => {
                Response::default()
            }
            PageEvent::ContactHover(index, hover) => {
                let transform = match hover {
                    Hover::Enter => CONTACT_HOVER_TRANSFORM,
                    Hover::Leave => CONTACT_REST_TRANSFORM,
                };
                self.surface
                    .set_style(Node::ContactItem(index), "transform", transform);
                Response::default()
            }
        }
    }

    /// Runs a task that was handed out in an earlier `Response`; returns follow-ups.
    pub fn run_deferred(&mut self, task: DeferredTask) -> Vec<Deferred> {
        match task {
            DeferredTask::RevealHero(index) => {
                self.surface.set_style(Node::Hero(index), "opacity", "1");
                self.surface
                    .set_style(Node::Hero(index), "transform", SETTLED_TRANSFORM);
                Vec::new()
            }
            DeferredTask::TypeCharacter { text, index } => {
                self.type_character(text, index).into_iter().collect()
            }
        }
    }

    fn startup(&mut self) {
        for index in 0..self.layout.cards {
            let card = Node::Card(index);
            self.surface.set_style(card, "opacity", "0");
            self.surface.set_style(card, "transform", CARD_HIDDEN_TRANSFORM);
            self.surface.set_style(card, "transition", CARD_TRANSITION);
        }

        for src in &self.config.preload {
            self.surface.preload_image(src);
        }

        self.surface.inject_stylesheet(ACTIVE_LINK_STYLESHEET);
        log::info!("{WELCOME_BANNER}");

        // Observers report the initial state once they are attached.
        self.geometry_pass();
    }

    fn close_menu(&mut self) {
        self.surface.remove_class(Node::NavMenu, ACTIVE_CLASS);
        self.surface.remove_class(Node::NavToggle, ACTIVE_CLASS);
    }

    fn scroll_to_link_target(&mut self, index: usize) {
        let Some(href) = self.layout.nav_links.get(index) else {
            return;
        };

        let target = href
            .strip_prefix('#')
            .filter(|id| !id.is_empty())
            .and_then(|id| self.surface.span_of_id(id));

        match target {
            Some(span) => {
                let top = span.top - f64::from(self.config.header_offset_px);
                self.surface.smooth_scroll_to(top);
            }
            None => log_event(
                log::Level::Debug,
                "nav_target_missing",
                json!({ "link": index, "href": href }),
            ),
        }
    }

    fn apply_navbar_style(&mut self, scrolled: f64) {
        let solid = scrolled > f64::from(self.config.navbar_solid_after_px);
        let (background, shadow) = if solid {
            (NAVBAR_SOLID_BACKGROUND, NAVBAR_SOLID_SHADOW)
        } else {
            (NAVBAR_RESTING_BACKGROUND, NAVBAR_RESTING_SHADOW)
        };

        self.surface.set_style(Node::Navbar, "background", background);
        self.surface.set_style(Node::Navbar, "box-shadow", shadow);
    }

    fn apply_parallax(&mut self, scrolled: f64) {
        for (index, speed) in self.layout.floating_speeds.iter().enumerate() {
            let transform = parallax_transform(scrolled, *speed);
            self.surface
                .set_style(Node::Floating(index), "transform", &transform);
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.surface.scroll_y(), self.surface.viewport_height())
    }

    fn measure(&self) -> Geometry {
        Geometry {
            viewport: self.viewport(),
            sections: (0..self.layout.sections.len())
                .map(|index| self.surface.span(Node::Section(index)))
                .collect(),
            cards: (0..self.layout.cards)
                .map(|index| self.surface.span(Node::Card(index)))
                .collect(),
        }
    }

    fn geometry_pass(&mut self) {
        let geometry = self.measure();
        self.apply_geometry(geometry);
    }

    fn apply_geometry(&mut self, geometry: Geometry) {
        let previous = self.sections.current();

        self.sections
            .refresh_geometry(|index| geometry.sections.get(index).copied().flatten());
        let pass = self.sections.evaluate(geometry.viewport);

        for index in &pass.revealed {
            self.surface.add_class(Node::Section(*index), VISIBLE_CLASS);
            log_event(
                log::Level::Debug,
                "section_revealed",
                json!({ "section": index }),
            );
        }

        if pass.selection_ran() {
            self.mark_active_link();
            if pass.current != previous {
                log_event(
                    log::Level::Debug,
                    "active_section_changed",
                    json!({ "section": pass.current, "id": self.sections.current_id() }),
                );
            }
        }

        for index in self.cards.evaluate(&geometry.cards, geometry.viewport) {
            self.surface.set_style(Node::Card(index), "opacity", "1");
            self.surface
                .set_style(Node::Card(index), "transform", SETTLED_TRANSFORM);
        }
    }

    // Clears every link each time, even when the selection did not move.
    fn mark_active_link(&mut self) {
        for index in 0..self.layout.nav_links.len() {
            self.surface.remove_class(Node::NavLink(index), ACTIVE_CLASS);
        }

        let link = self
            .sections
            .current_id()
            .and_then(|id| self.layout.link_for_section(id));
        if let Some(link) = link {
            self.surface.add_class(Node::NavLink(link), ACTIVE_CLASS);
        }
    }

    fn key_down(&mut self, key: Key) -> Response {
        match key {
            Key::Escape => {
                self.close_menu();
                Response::default()
            }
            Key::ArrowDown | Key::ArrowUp => {
                let Some(current) = self.section_at_viewport_center() else {
                    return Response::prevent_default();
                };

                let target = match key {
                    Key::ArrowDown if current + 1 < self.layout.sections.len() => {
                        Some(current + 1)
                    }
                    Key::ArrowUp if current > 0 => Some(current - 1),
                    _ => None,
                };
                if let Some(target) = target {
                    self.surface.smooth_scroll_into_view(Node::Section(target));
                }

                Response::prevent_default()
            }
            Key::Other => Response::default(),
        }
    }

    /// Section containing the middle of the viewport, falling back to the first.
    fn section_at_viewport_center(&self) -> Option<usize> {
        if self.layout.sections.is_empty() {
            return None;
        }

        let center = self.viewport().center();
        let containing = (0..self.layout.sections.len()).find(|index| {
            self.surface
                .span(Node::Section(*index))
                .is_some_and(|span: Span| span.contains(center))
        });

        Some(containing.unwrap_or(0))
    }

    fn load(&mut self) -> Response {
        let mut deferred = Vec::new();

        if self.config.typewriter && self.layout.has_hero_title {
            if let Some(text) = self.surface.text(Node::HeroTitle) {
                self.surface.set_text(Node::HeroTitle, "");
                deferred.extend(self.type_character(Rc::from(text), 0));
            }
        }

        self.surface.add_class(Node::Body, LOADED_CLASS);
        for index in 0..self.layout.hero_elements {
            let delay_ms = u32::try_from(index)
                .unwrap_or(u32::MAX)
                .saturating_mul(self.config.hero_stagger_ms);
            deferred.push(Deferred {
                delay_ms,
                task: DeferredTask::RevealHero(index),
            });
        }

        Response {
            prevent_default: false,
            deferred,
        }
    }

    /// Shows the first `index + 1` characters and schedules the next one.
    fn type_character(&mut self, text: Rc<str>, index: usize) -> Option<Deferred> {
        let (start, ch) = text.char_indices().nth(index)?;
        let end = start + ch.len_utf8();

        self.surface.set_text(Node::HeroTitle, &text[..end]);

        (end < text.len()).then(|| Deferred {
            delay_ms: self.config.typewriter_speed_ms,
            task: DeferredTask::TypeCharacter {
                text: Rc::clone(&text),
                index: index + 1,
            },
        })
    }
}

pub fn parallax_transform(scrolled: f64, speed: f64) -> String {
    let offset = -(scrolled * speed);
    format!("translateY({}px)", css_number(offset))
}

fn css_number(value: f64) -> String {
    // `-0` would otherwise print with its sign.
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}
