use crate::constants::MAX_FRAME_DT_SEC;
use crate::viewport::clamp_frame_dt;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct LoopState {
    alive: Cell<bool>,
    handle: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl LoopState {
    fn schedule(&self) {
        if !self.alive.get() {
            return;
        }
        let Some(window) = web::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(closure) = tick.as_ref() else {
            return;
        };
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// A running requestAnimationFrame loop. Stops when cancelled or dropped.
pub struct FrameLoop {
    state: Rc<LoopState>,
}

impl FrameLoop {
    pub fn is_running(&self) -> bool {
        self.state.alive.get()
    }

    /// Cancel the pending frame and release the callback. Must not be called
    /// from inside the frame callback itself.
    pub fn cancel(&self) {
        if !self.state.alive.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.state.handle.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // Dropping the closure breaks the Rc cycle through `state`.
        self.state.tick.borrow_mut().take();
        log::debug!("[frame] loop cancelled");
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drive `on_frame` once per display frame with the clamped time since the
/// previous frame.
pub fn start_loop(mut on_frame: impl FnMut(Duration) + 'static) -> FrameLoop {
    let state = Rc::new(LoopState {
        alive: Cell::new(true),
        handle: Cell::new(None),
        tick: RefCell::new(None),
    });
    let state_tick = state.clone();
    let mut last_instant = Instant::now();
    *state.tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        state_tick.handle.set(None);
        if !state_tick.alive.get() {
            return;
        }
        let now = Instant::now();
        let dt_sec = clamp_frame_dt((now - last_instant).as_secs_f32(), MAX_FRAME_DT_SEC);
        last_instant = now;
        on_frame(Duration::from_secs_f32(dt_sec));
        state_tick.schedule();
    }) as Box<dyn FnMut()>));
    state.schedule();
    FrameLoop { state }
}
