use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use beanjump_core::input::Key;

use crate::app::App;

/// Attach keyboard listeners to the document and focus listeners to the
/// window. Listeners live as long as the page.
pub fn attach_input_listeners(window: &Window, app: &Rc<RefCell<App>>) {
    let Some(document) = window.document() else {
        return;
    };

    // Keyboard: keydown
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
            move |evt: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_code(&evt.code()) {
                    // Keep space and arrows from scrolling the page.
                    evt.prevent_default();
                    app.borrow_mut().input.on_key_down(key);
                }
            },
        );
        let _ =
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Keyboard: keyup
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
            move |evt: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_code(&evt.code()) {
                    app.borrow_mut().input.on_key_up(key);
                }
            },
        );
        let _ =
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Focus: blur
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            app.borrow_mut().suspend();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Focus: focus
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            app.borrow_mut().resume();
        });
        let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
