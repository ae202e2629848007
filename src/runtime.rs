use crate::controller::{Deferred, PageController, PageEvent};
use crate::scheduler::Scheduler;
use crate::surface::Surface;
use crate::throttle::throttle;
use std::{cell::RefCell, rc::Rc};

/// Runs `event` through the controller and schedules whatever it deferred.
/// Returns whether the browser's default action should be cancelled.
pub fn dispatch<S: Surface + 'static>(
    controller: &Rc<RefCell<PageController<S>>>,
    scheduler: &Rc<dyn Scheduler>,
    event: PageEvent,
) -> bool {
    let response = controller.borrow_mut().handle(event);

    for deferred in response.deferred {
        schedule_deferred(controller, scheduler, deferred);
    }

    response.prevent_default
}

/// Both scroll reactions in registration order: the per-event one, then the
/// copy that runs at most once per `window_ms`.
pub fn scroll_handler<S: Surface + 'static>(
    controller: Rc<RefCell<PageController<S>>>,
    scheduler: Rc<dyn Scheduler>,
    window_ms: u32,
) -> impl FnMut() {
    let mut throttled = {
        let controller = Rc::clone(&controller);
        let scheduler_for_copy = Rc::clone(&scheduler);
        throttle(
            move |()| {
                dispatch(&controller, &scheduler_for_copy, PageEvent::ThrottledScroll);
            },
            window_ms,
            Rc::clone(&scheduler),
        )
    };

    move || {
        dispatch(&controller, &scheduler, PageEvent::Scroll);
        throttled(());
    }
}

fn schedule_deferred<S: Surface + 'static>(
    controller: &Rc<RefCell<PageController<S>>>,
    scheduler: &Rc<dyn Scheduler>,
    deferred: Deferred,
) {
    let controller = Rc::clone(controller);
    let follow_up_scheduler = Rc::clone(scheduler);

    scheduler.schedule(
        deferred.delay_ms,
        Box::new(move || {
            let follow_ups = controller.borrow_mut().run_deferred(deferred.task);
            for next in follow_ups {
                schedule_deferred(&controller, &follow_up_scheduler, next);
            }
        }),
    );
}

#[cfg(target_arch = "wasm32")]
pub use browser::install;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{dispatch, scroll_handler};
    use crate::config::PageConfig;
    use crate::controller::{Hover, Key, PageController, PageEvent};
    use crate::dom::DomSurface;
    use crate::logging::log_event;
    use crate::scheduler::{BrowserScheduler, Scheduler};
    use serde_json::json;
    use std::{cell::RefCell, rc::Rc};
    use wasm_bindgen::{closure::Closure, JsCast};
    use web_sys::{window, Event, EventTarget, KeyboardEvent};

    /// Listeners stay registered for the lifetime of the page.
    fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Wires every page behavior to its browser events. Safe to call once the
    /// markup is mounted.
    pub fn install(config: PageConfig) {
        let Some(window) = window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let surface = DomSurface::discover(window.clone(), document.clone());
        let targets = surface.listen_targets();
        let layout = surface.layout();
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new());
        let scroll_window_ms = config.scroll_throttle_ms;

        log_event(
            log::Level::Info,
            "behaviors_installed",
            json!({
                "sections": layout.sections.len(),
                "navLinks": layout.nav_links.len(),
                "cards": layout.cards,
                "floating": layout.floating_speeds.len(),
                "contactItems": layout.contact_items,
                "heroElements": layout.hero_elements,
            }),
        );

        let controller = Rc::new(RefCell::new(PageController::new(layout, config, surface)));
        dispatch(&controller, &scheduler, PageEvent::Startup);

        if let Some(toggle) = &targets.nav_toggle {
            let controller = Rc::clone(&controller);
            let scheduler = Rc::clone(&scheduler);
            listen(toggle, "click", move |_| {
                dispatch(&controller, &scheduler, PageEvent::NavToggleClick);
            });
        }

        for (index, link) in targets.nav_links.iter().enumerate() {
            let controller = Rc::clone(&controller);
            let scheduler = Rc::clone(&scheduler);
            listen(link, "click", move |event| {
                if dispatch(&controller, &scheduler, PageEvent::NavLinkClick(index)) {
                    event.prevent_default();
                }
            });
        }

        {
            let mut on_scroll = scroll_handler(
                Rc::clone(&controller),
                Rc::clone(&scheduler),
                scroll_window_ms,
            );
            listen(&window, "scroll", move |_| on_scroll());
        }

        {
            let controller = Rc::clone(&controller);
            let scheduler = Rc::clone(&scheduler);
            listen(&window, "resize", move |_| {
                dispatch(&controller, &scheduler, PageEvent::Resize);
            });
        }

        {
            let controller = Rc::clone(&controller);
            let scheduler = Rc::clone(&scheduler);
            listen(&document, "keydown", move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|event| event.key()) else {
                    return;
                };
                if dispatch(&controller, &scheduler, PageEvent::KeyDown(Key::from_dom(&key))) {
                    event.prevent_default();
                }
            });
        }

        for (index, item) in targets.contact_items.iter().enumerate() {
            for (kind, hover) in [("mouseenter", Hover::Enter), ("mouseleave", Hover::Leave)] {
                let controller = Rc::clone(&controller);
                let scheduler = Rc::clone(&scheduler);
                listen(item, kind, move |_| {
                    dispatch(&controller, &scheduler, PageEvent::ContactHover(index, hover));
                });
            }
        }

        // The wasm module usually starts after `load` already fired.
        if document.ready_state() == "complete" {
            dispatch(&controller, &scheduler, PageEvent::Load);
        } else {
            let controller = Rc::clone(&controller);
            let scheduler = Rc::clone(&scheduler);
            listen(&window, "load", move |_| {
                dispatch(&controller, &scheduler, PageEvent::Load);
            });
        }
    }
}
