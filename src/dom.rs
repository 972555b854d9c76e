use crate::constants::{CANVAS_CLASS, MAX_PIXEL_RATIO};
use crate::viewport;
use embrace_core::HostContainer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Host element the scene is mounted into.
#[derive(Clone)]
pub struct DomContainer {
    element: web::HtmlElement,
}

impl DomContainer {
    pub fn new(element: web::HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.element
    }
}

impl HostContainer for DomContainer {
    fn pixel_size(&self) -> Option<(u32, u32)> {
        viewport::container_size(
            self.element.is_connected(),
            self.element.client_width(),
            self.element.client_height(),
        )
    }
}

#[inline]
pub fn pixel_ratio() -> f64 {
    web::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Create the output canvas and append it to the container. The canvas fills
/// the container via CSS; its backing store follows the device pixel ratio.
pub fn create_canvas(
    container: &DomContainer,
    class_name: Option<&str>,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = web::window()
        .and_then(|w| w.document())
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let classes = canvas.class_list();
    _ = classes.add_1(CANVAS_CLASS);
    if let Some(extra) = class_name.filter(|c| !c.is_empty()) {
        _ = classes.add_1(extra);
    }
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    container
        .element()
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, width: u32, height: u32) {
    let (w_px, h_px) =
        viewport::backing_size(width as f64, height as f64, pixel_ratio(), MAX_PIXEL_RATIO);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
}

/// A window event listener that stays registered until `remove` (or drop).
pub struct WindowListener {
    event: &'static str,
    closure: Closure<dyn FnMut()>,
    attached: bool,
}

impl WindowListener {
    pub fn add(event: &'static str, handler: impl FnMut() + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        let attached = web::window()
            .map(|w| {
                w.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                    .is_ok()
            })
            .unwrap_or(false);
        if !attached {
            log::warn!("[dom] could not attach '{}' listener", event);
        }
        Self {
            event,
            closure,
            attached,
        }
    }

    pub fn remove(&mut self) {
        if !self.attached {
            return;
        }
        if let Some(w) = web::window() {
            let callback: &js_sys::Function = self.closure.as_ref().unchecked_ref();
            _ = w.remove_event_listener_with_callback(self.event, callback);
        }
        self.attached = false;
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        self.remove();
    }
}
