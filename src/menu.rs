//! Headless popup menu for notebook front ends.
//!
//! The widget renders an activator region and, while open, a list of menu
//! items. Exactly one trigger is active per instance: primary click, or the
//! context menu when `context` is set. The context path closes the menu first
//! and defers the activation to the next tick, so the close is observed
//! before the menu reopens with fresh content.

use alloc::rc::Rc;
use core::cell::RefCell;

use bon::bon;
use strum::{Display, IntoStaticStr};

use crate::dom_tree::{Element, HtmlDomNode};
use crate::tick::TickQueue;
use crate::types::{CssProperty, CssStyle};

/// Stacking order of the open menu content.
const MENU_Z_INDEX: &str = "1000";

/// Widget properties, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuProps {
    /// Contents of the trigger region
    pub activator: Vec<HtmlDomNode>,
    /// Menu items, one per child
    pub children: Vec<HtmlDomNode>,
    /// Open on the context menu (right click) instead of a primary click
    pub context: bool,
    /// Position the content absolutely at the pointer
    pub use_absolute: bool,
    /// Style applied to the list container
    pub style: CssStyle,
}

#[bon]
impl MenuProps {
    /// Creates menu properties. Missing lists are empty and both flags
    /// default to `false`.
    #[must_use]
    #[builder]
    pub fn new(
        activator: Option<Vec<HtmlDomNode>>,
        children: Option<Vec<HtmlDomNode>>,
        context: Option<bool>,
        use_absolute: Option<bool>,
        style: Option<CssStyle>,
    ) -> Self {
        Self {
            activator: activator.unwrap_or_default(),
            children: children.unwrap_or_default(),
            context: context.unwrap_or(false),
            use_absolute: use_absolute.unwrap_or(false),
            style: style.unwrap_or_default(),
        }
    }
}

/// Which pointer action opens the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Trigger {
    /// Primary click
    Click,
    /// Context menu (right click)
    ContextMenu,
}

/// Pointer position of a click, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// State changes and callbacks, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEvent {
    /// The activation callback fired
    Activated {
        /// Pointer position
        x: f64,
        /// Pointer position
        y: f64,
    },
    /// The menu opened
    Opened,
    /// The menu closed
    Closed,
}

/// Open/closed state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuState {
    /// Whether the menu content is shown
    pub show_menu: bool,
    /// Pointer position of the last activation
    pub position: Option<(f64, f64)>,
}

#[derive(Debug, Default)]
struct MenuCell {
    state: MenuState,
    events: Vec<MenuEvent>,
}

impl MenuCell {
    fn activate(&mut self, event: PointerEvent) {
        self.events.push(MenuEvent::Activated {
            x: event.x,
            y: event.y,
        });
        self.state.position = Some((event.x, event.y));
        if !self.state.show_menu {
            self.state.show_menu = true;
            self.events.push(MenuEvent::Opened);
        }
    }

    fn close(&mut self) {
        if self.state.show_menu {
            self.state.show_menu = false;
            self.events.push(MenuEvent::Closed);
        }
    }
}

/// Popup menu instance.
#[derive(Debug)]
pub struct PopupMenu {
    props: MenuProps,
    ticks: Rc<TickQueue>,
    cell: Rc<RefCell<MenuCell>>,
}

impl PopupMenu {
    /// Creates a closed menu scheduling deferred work on `ticks`.
    #[must_use]
    pub fn new(props: MenuProps, ticks: Rc<TickQueue>) -> Self {
        Self {
            props,
            ticks,
            cell: Rc::default(),
        }
    }

    /// The properties the menu was built with.
    #[must_use]
    pub const fn props(&self) -> &MenuProps {
        &self.props
    }

    /// The active trigger.
    #[must_use]
    pub const fn trigger(&self) -> Trigger {
        if self.props.context {
            Trigger::ContextMenu
        } else {
            Trigger::Click
        }
    }

    /// Primary click on the activator. Ignored in context mode; returns
    /// whether the click was handled.
    pub fn on_activator_click(&self, event: PointerEvent) -> bool {
        if self.trigger() != Trigger::Click {
            return false;
        }
        self.cell.borrow_mut().activate(event);
        true
    }

    /// Context menu on the activator. Ignored in click mode; returns whether
    /// the event was handled (and the browser menu should be suppressed).
    pub fn on_activator_context_menu(&self, event: PointerEvent) -> bool {
        if self.trigger() != Trigger::ContextMenu {
            return false;
        }
        self.cell.borrow_mut().close();
        let cell = Rc::clone(&self.cell);
        self.ticks.defer(move || cell.borrow_mut().activate(event));
        true
    }

    /// A menu item was selected.
    pub fn on_select(&self) {
        self.cell.borrow_mut().close();
    }

    /// A click landed outside the menu.
    pub fn on_outside_click(&self) {
        self.cell.borrow_mut().close();
    }

    /// Whether the menu content is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.cell.borrow().state.show_menu
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MenuState {
        self.cell.borrow().state
    }

    /// Every event so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<MenuEvent> {
        self.cell.borrow().events.clone()
    }

    /// Renders the widget.
    #[must_use]
    pub fn render(&self) -> HtmlDomNode {
        let trigger: &'static str = self.trigger().into();
        let activator = Element::new("div")
            .class("menu-activator")
            .attr("data-trigger", trigger)
            .children(self.props.activator.iter().cloned());
        let mut root = Element::new("div").class("popup-menu").child(activator);

        let state = self.state();
        if state.show_menu {
            let mut content = Element::new("div")
                .class("menu-content")
                .css(CssProperty::ZIndex, MENU_Z_INDEX);
            match (self.props.use_absolute, state.position) {
                (true, Some((x, y))) => {
                    content = content
                        .css(CssProperty::Position, "absolute")
                        .css(CssProperty::Left, format!("{x}px"))
                        .css(CssProperty::Top, format!("{y}px"));
                }
                (true, None) => content = content.css(CssProperty::Position, "absolute"),
                (false, _) => content = content.css(CssProperty::Position, "relative"),
            }
            let items = self.props.children.iter().map(|child| {
                HtmlDomNode::from(
                    Element::new("li")
                        .class("menu-item")
                        .attr("role", "menuitem")
                        .child(child.clone()),
                )
            });
            let mut list = Element::new("ul")
                .class("menu-list")
                .attr("role", "menu")
                .children(items);
            list.style.extend(&self.props.style);
            root = root.child(content.child(list));
        }
        root.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(context: bool) -> (PopupMenu, Rc<TickQueue>) {
        let ticks = Rc::new(TickQueue::new());
        let props = MenuProps::builder()
            .activator(vec![HtmlDomNode::text("cell")])
            .children(vec![HtmlDomNode::text("Copy"), HtmlDomNode::text("Delete")])
            .context(context)
            .build();
        (PopupMenu::new(props, Rc::clone(&ticks)), ticks)
    }

    #[test]
    fn click_mode_ignores_the_context_menu() {
        let (menu, ticks) = menu(false);
        assert!(!menu.on_activator_context_menu(PointerEvent { x: 1.0, y: 1.0 }));
        assert_eq!(ticks.pending(), 0);
        assert!(menu.on_activator_click(PointerEvent { x: 1.0, y: 1.0 }));
        assert!(menu.is_open());
    }

    #[test]
    fn context_mode_defers_activation() {
        let (menu, ticks) = menu(true);
        assert!(!menu.on_activator_click(PointerEvent { x: 0.0, y: 0.0 }));
        assert!(menu.on_activator_context_menu(PointerEvent { x: 4.0, y: 8.0 }));
        assert!(!menu.is_open());
        ticks.run_tick();
        assert!(menu.is_open());
        assert_eq!(menu.state().position, Some((4.0, 8.0)));
    }

    #[test]
    fn selecting_closes_the_menu() {
        let (menu, _) = menu(false);
        menu.on_activator_click(PointerEvent { x: 0.0, y: 0.0 });
        menu.on_select();
        assert!(!menu.is_open());
        assert_eq!(
            menu.events(),
            [
                MenuEvent::Activated { x: 0.0, y: 0.0 },
                MenuEvent::Opened,
                MenuEvent::Closed
            ]
        );
    }
}
