#![cfg(target_arch = "wasm32")]
use embrace_core::{HostContainer, RenderBackend, SceneError, SceneSession, Viewport};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod frame;
mod render;
mod viewport;

use dom::{DomContainer, WindowListener};
use frame::FrameLoop;
use render::GpuState;

/// Everything one mount keeps alive on the page.
struct Host {
    container: DomContainer,
    session: RefCell<SceneSession<GpuState>>,
    frame_loop: RefCell<Option<FrameLoop>>,
    resize_listener: RefCell<Option<WindowListener>>,
    destroyed: Cell<bool>,
}

impl Host {
    fn teardown(&self) {
        if self.destroyed.replace(true) {
            log::debug!("[host] destroy ignored; already destroyed");
            return;
        }
        if let Some(frame_loop) = self.frame_loop.borrow_mut().take() {
            frame_loop.cancel();
        }
        if let Some(mut listener) = self.resize_listener.borrow_mut().take() {
            listener.remove();
        }
        let released = self.session.borrow_mut().unmount();
        log::info!("[host] destroyed; released {} resources", released);
    }
}

/// Handle returned to the page by `create`. Inert when the mount was skipped.
#[wasm_bindgen]
pub struct SessionHandle {
    host: Option<Rc<Host>>,
}

#[wasm_bindgen]
impl SessionHandle {
    /// Tear the scene down. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(host) = self.host.take() {
            host.teardown();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.host
            .as_ref()
            .is_some_and(|h| h.session.borrow().is_mounted())
    }

    #[wasm_bindgen(getter, js_name = liveResources)]
    pub fn live_resources(&self) -> usize {
        self.host
            .as_ref()
            .map_or(0, |h| h.session.borrow().live_resources())
    }
}

impl SessionHandle {
    fn inert() -> Self {
        Self { host: None }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("embrace-web starting");
    Ok(())
}

/// Mount the scene into `container`. A missing or zero-sized container is
/// logged and yields an inert handle; GPU setup finishes asynchronously.
#[wasm_bindgen]
pub fn create(container: Option<web::HtmlElement>, class_name: Option<String>) -> SessionHandle {
    let Some(element) = container else {
        log::warn!("[host] mount skipped: {}", SceneError::MissingContainer);
        return SessionHandle::inert();
    };
    let container = DomContainer::new(element);
    let size = container.pixel_size();
    let Some(viewport) = Viewport::from_size(size) else {
        let (width, height) = size.unwrap_or((0, 0));
        log::warn!(
            "[host] mount skipped: {}",
            SceneError::EmptyViewport { width, height }
        );
        return SessionHandle::inert();
    };
    let canvas = match dom::create_canvas(&container, class_name.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("[host] canvas creation failed: {:?}", e);
            return SessionHandle::inert();
        }
    };

    let host = Rc::new(Host {
        container,
        session: RefCell::new(SceneSession::new()),
        frame_loop: RefCell::new(None),
        resize_listener: RefCell::new(None),
        destroyed: Cell::new(false),
    });
    let pending = Rc::downgrade(&host);
    spawn_local(async move {
        let gpu = GpuState::new(canvas.clone(), viewport).await;
        let Some(host) = pending.upgrade().filter(|h| !h.destroyed.get()) else {
            log::info!("[host] destroyed before GPU init finished");
            canvas.remove();
            return;
        };
        let gpu = match gpu {
            Ok(g) => g,
            Err(e) => {
                log::error!("[host] WebGPU init error: {:?}", e);
                canvas.remove();
                return;
            }
        };
        attach(&host, gpu, &canvas);
    });
    SessionHandle { host: Some(host) }
}

/// Free-function form of `SessionHandle::destroy` for hosts that prefer it.
#[wasm_bindgen(js_name = destroySession)]
pub fn destroy(handle: &mut SessionHandle) {
    handle.destroy();
}

fn attach(host: &Rc<Host>, gpu: GpuState, canvas: &web::HtmlCanvasElement) {
    let mounted = host
        .session
        .borrow_mut()
        .mount(Some(&host.container), move |current| {
            // The container may have changed size while the adapter was requested.
            let mut gpu = gpu;
            gpu.resize(current);
            Ok(gpu)
        });
    if mounted.is_err() {
        canvas.remove();
        return;
    }

    let weak: Weak<Host> = Rc::downgrade(host);
    *host.resize_listener.borrow_mut() = Some(WindowListener::add("resize", move || {
        if let Some(h) = weak.upgrade() {
            h.session.borrow_mut().resize(&h.container);
        }
    }));

    let weak: Weak<Host> = Rc::downgrade(host);
    *host.frame_loop.borrow_mut() = Some(frame::start_loop(move |dt| {
        if let Some(h) = weak.upgrade() {
            h.session.borrow_mut().tick(dt);
        }
    }));
}
