mod setup;

use std::convert::Infallible;
use std::rc::Rc;

use mathdoc::dom_tree::HtmlDomNode;
use mathdoc::menu::{MenuEvent, PointerEvent, Trigger};
use mathdoc::tree::VirtualNode as _;
use mathdoc::types::{CssProperty, CssStyle};
use mathdoc::{MenuProps, PopupMenu, TickQueue};
use setup::*;

fn menu(context: bool, use_absolute: bool) -> (PopupMenu, Rc<TickQueue>) {
    let ticks = Rc::new(TickQueue::new());
    let props = MenuProps::builder()
        .activator(vec![HtmlDomNode::text("Show math as")])
        .children(vec![HtmlDomNode::text("TeX commands"), HtmlDomNode::text("MathML")])
        .context(context)
        .use_absolute(use_absolute)
        .style(CssStyle::default().with(CssProperty::Color, "gray"))
        .build();
    (PopupMenu::new(props, Rc::clone(&ticks)), ticks)
}

const AT: PointerEvent = PointerEvent { x: 12.0, y: 30.0 };

#[test]
fn a_context_menu() {
    it("should open on right click after the next tick", || {
        let (menu, ticks) = menu(true, true);
        assert_eq!(menu.trigger(), Trigger::ContextMenu);
        assert!(menu.on_activator_context_menu(AT));
        assert!(!menu.is_open());
        assert_eq!(ticks.pending(), 1);
        assert_eq!(ticks.run_tick(), 1);
        assert!(menu.is_open());
        Ok::<_, Infallible>(())
    });

    it("should observe the close strictly before the deferred activation", || {
        let (menu, ticks) = menu(true, true);
        menu.on_activator_context_menu(AT);
        ticks.run_tick();
        menu.on_activator_context_menu(PointerEvent { x: 40.0, y: 2.0 });
        assert_eq!(menu.events().last(), Some(&MenuEvent::Closed));
        ticks.run_tick();
        assert_eq!(
            menu.events(),
            [
                MenuEvent::Activated { x: 12.0, y: 30.0 },
                MenuEvent::Opened,
                MenuEvent::Closed,
                MenuEvent::Activated { x: 40.0, y: 2.0 },
                MenuEvent::Opened,
            ]
        );
        assert_eq!(menu.state().position, Some((40.0, 2.0)));
        Ok::<_, Infallible>(())
    });

    it("should ignore primary clicks", || {
        let (menu, ticks) = menu(true, false);
        assert!(!menu.on_activator_click(AT));
        assert_eq!(ticks.pending(), 0);
        assert!(menu.events().is_empty());
        Ok::<_, Infallible>(())
    });
}

#[test]
fn a_click_menu() {
    it("should open immediately on click and close on selection", || {
        let (menu, ticks) = menu(false, false);
        assert_eq!(menu.trigger(), Trigger::Click);
        assert!(menu.on_activator_click(AT));
        assert!(menu.is_open());
        assert_eq!(ticks.pending(), 0);
        menu.on_select();
        assert!(!menu.is_open());
        Ok::<_, Infallible>(())
    });

    it("should close on an outside click", || {
        let (menu, _) = menu(false, false);
        menu.on_activator_click(AT);
        menu.on_outside_click();
        menu.on_outside_click();
        assert_eq!(
            menu.events(),
            [
                MenuEvent::Activated { x: 12.0, y: 30.0 },
                MenuEvent::Opened,
                MenuEvent::Closed
            ]
        );
        Ok::<_, Infallible>(())
    });
}

#[test]
fn menu_rendering() {
    it("should render only the activator while closed", || {
        let (menu, _) = menu(false, false);
        assert_eq!(
            menu.render().to_markup(),
            r#"<div class="popup-menu"><div class="menu-activator" data-trigger="click">Show math as</div></div>"#
        );
        Ok::<_, Infallible>(())
    });

    it("should position absolute content at the pointer", || {
        let (menu, ticks) = menu(true, true);
        menu.on_activator_context_menu(AT);
        ticks.run_tick();
        let markup = menu.render().to_markup();
        assert!(markup.contains("position:absolute;"));
        assert!(markup.contains("left:12px;"));
        assert!(markup.contains("top:30px;"));
        assert!(markup.contains(r#"data-trigger="contextmenu""#));
        assert!(markup.contains(r#"<ul class="menu-list" style="color:gray;" role="menu">"#));
        assert!(markup.contains(r#"<li class="menu-item" role="menuitem">MathML</li>"#));
        Ok::<_, Infallible>(())
    });

    it("should use relative positioning otherwise", || {
        let (menu, _) = menu(false, false);
        menu.on_activator_click(AT);
        let markup = menu.render().to_markup();
        assert!(markup.contains("position:relative;"));
        assert!(!markup.contains("left:"));
        Ok::<_, Infallible>(())
    });
}
