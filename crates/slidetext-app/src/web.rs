//! WebAssembly entry point: binds the editor to the page DOM and a Swiper carousel.

use crate::AppConfig;
use js_sys::{Array, Function, Object, Reflect};
use kurbo::{Point, Size};
use slidetext_core::{
    AdoptedBox, BoxId, ControlPanel, EditorError, OverlayEditor, PointerId, PointerSample,
    SlideChangeListener, SlideHost, SlideId, TextEditResult, TextKey,
};
use slidetext_render::{BoxView, RenderResult, Renderer, RendererError, present};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, KeyboardEvent, PointerEvent};

#[wasm_bindgen]
extern "C" {
    /// The Swiper carousel loaded by the host page.
    #[derive(Debug, Clone)]
    type Swiper;

    #[wasm_bindgen(constructor, catch)]
    fn new(selector: &str, options: &JsValue) -> Result<Swiper, JsValue>;

    #[wasm_bindgen(method, getter = activeIndex)]
    fn active_index(this: &Swiper) -> u32;

    #[wasm_bindgen(method, getter)]
    fn slides(this: &Swiper) -> JsValue;

    #[wasm_bindgen(method, setter = allowTouchMove)]
    fn set_allow_touch_move(this: &Swiper, allow: bool);

    #[wasm_bindgen(method)]
    fn on(this: &Swiper, event: &str, handler: &Function);
}

fn swiper_options(config: &AppConfig) -> Result<JsValue, JsValue> {
    let navigation = Object::new();
    Reflect::set(
        &navigation,
        &JsValue::from_str("nextEl"),
        &JsValue::from_str(&config.next_button_selector),
    )?;
    Reflect::set(
        &navigation,
        &JsValue::from_str("prevEl"),
        &JsValue::from_str(&config.prev_button_selector),
    )?;
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("navigation"), &navigation)?;
    Ok(options.into())
}

fn slide_elements(swiper: &Swiper) -> Vec<HtmlElement> {
    Array::from(&swiper.slides())
        .iter()
        .filter_map(|slide| slide.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn slide_element(swiper: &Swiper, index: usize) -> Option<HtmlElement> {
    Array::from(&swiper.slides())
        .get(u32::try_from(index).ok()?)
        .dyn_into::<HtmlElement>()
        .ok()
}

fn dom_error(err: JsValue) -> RendererError {
    RendererError::Dom(format!("{:?}", err))
}

/// Swiper carousel as a slide host.
struct SwiperHost {
    swiper: Swiper,
    listeners: Rc<RefCell<Vec<SlideChangeListener>>>,
    _on_slide_change: Closure<dyn FnMut()>,
}

impl SwiperHost {
    fn new(swiper: Swiper) -> Self {
        let listeners: Rc<RefCell<Vec<SlideChangeListener>>> = Rc::new(RefCell::new(Vec::new()));
        let listeners_clone = listeners.clone();
        let on_slide_change = Closure::wrap(Box::new(move || {
            for listener in listeners_clone.borrow_mut().iter_mut() {
                listener();
            }
        }) as Box<dyn FnMut()>);
        swiper.on("slideChange", on_slide_change.as_ref().unchecked_ref());
        Self {
            swiper,
            listeners,
            _on_slide_change: on_slide_change,
        }
    }
}

impl SlideHost for SwiperHost {
    fn active_slide(&self) -> Option<SlideId> {
        let index = self.swiper.active_index() as usize;
        slide_element(&self.swiper, index).map(|_| SlideId(index))
    }

    fn set_gesture_navigation_enabled(&mut self, enabled: bool) {
        self.swiper.set_allow_touch_move(enabled);
    }

    fn subscribe_slide_change(&mut self, listener: SlideChangeListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

fn read_value(element: &Element) -> Option<String> {
    Reflect::get(element, &JsValue::from_str("value"))
        .ok()?
        .as_string()
}

fn write_value(element: &Element, value: &str) {
    if let Err(err) = Reflect::set(element, &JsValue::from_str("value"), &JsValue::from_str(value)) {
        log::debug!("Could not write control value: {:?}", err);
    }
}

/// The control-panel inputs. Any of them may be absent from the page.
struct ControlInputs {
    text: Option<Element>,
    font_size: Option<Element>,
    color: Option<Element>,
    font_family: Option<Element>,
}

impl ControlInputs {
    fn find(document: &Document, config: &AppConfig) -> Self {
        let by_id = |id: &str| document.get_element_by_id(id);
        Self {
            text: by_id(&config.text_input_id),
            font_size: by_id(&config.font_size_input_id),
            color: by_id(&config.font_color_input_id),
            font_family: by_id(&config.font_family_input_id),
        }
    }

    /// Copy the input values into the panel. Missing inputs keep the panel's value.
    fn read(&self, panel: &mut ControlPanel) {
        let fields = [
            (&self.text, &mut panel.text),
            (&self.font_size, &mut panel.font_size),
            (&self.color, &mut panel.color),
            (&self.font_family, &mut panel.font_family),
        ];
        for (input, field) in fields {
            if let Some(value) = input.as_ref().and_then(read_value) {
                *field = value;
            }
        }
    }

    fn write(&self, panel: &ControlPanel) {
        let fields = [
            (&self.text, panel.text.as_str()),
            (&self.font_size, panel.font_size.as_str()),
            (&self.color, panel.color.as_str()),
            (&self.font_family, panel.font_family.as_str()),
        ];
        for (input, value) in fields {
            if let Some(input) = input {
                write_value(input, value);
            }
        }
    }
}

/// Focus changes that fire DOM events synchronously, applied once the
/// editor is no longer borrowed.
enum FocusRequest {
    Focus(HtmlElement),
    Blur(HtmlElement),
}

impl FocusRequest {
    fn apply(self, document: &Document) {
        match self {
            FocusRequest::Focus(element) => {
                if let Err(err) = element.focus() {
                    log::debug!("Focus failed: {:?}", err);
                    return;
                }
                place_caret_at_end(document, &element);
            }
            FocusRequest::Blur(element) => {
                if let Err(err) = element.blur() {
                    log::debug!("Blur failed: {:?}", err);
                }
            }
        }
    }
}

fn place_caret_at_end(document: &Document, element: &HtmlElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(Some(selection)) = window.get_selection() else {
        return;
    };
    let Ok(range) = document.create_range() else {
        return;
    };
    if range.select_node_contents(element).is_err() {
        return;
    }
    range.collapse_with_to_start(false);
    let _ = selection.remove_all_ranges();
    let _ = selection.add_range(&range);
}

/// Renderer projecting boxes onto `div` elements inside the slides.
struct DomRenderer {
    document: Document,
    swiper: Swiper,
    box_class: String,
    active_class: String,
    elements: HashMap<BoxId, HtmlElement>,
    editing: HashSet<BoxId>,
    inputs: ControlInputs,
    focus_requests: Vec<FocusRequest>,
}

impl DomRenderer {
    fn new(document: Document, swiper: Swiper, config: &AppConfig) -> Self {
        let inputs = ControlInputs::find(&document, config);
        Self {
            document,
            swiper,
            box_class: config.box_class.clone(),
            active_class: config.active_class.clone(),
            elements: HashMap::new(),
            editing: HashSet::new(),
            inputs,
            focus_requests: Vec::new(),
        }
    }

    /// Track an element that already exists in the page.
    fn insert(&mut self, id: BoxId, element: HtmlElement) {
        self.elements.insert(id, element);
    }

    fn element(&self, id: BoxId) -> Option<HtmlElement> {
        self.elements.get(&id).cloned()
    }

    fn element_ref(&self, id: BoxId) -> RenderResult<&HtmlElement> {
        self.elements.get(&id).ok_or(RendererError::MissingElement(id))
    }

    fn take_focus_requests(&mut self) -> Vec<FocusRequest> {
        std::mem::take(&mut self.focus_requests)
    }
}

impl Renderer for DomRenderer {
    fn mount(&mut self, view: &BoxView) -> RenderResult<()> {
        let slide =
            slide_element(&self.swiper, view.slide.0).ok_or(RendererError::MissingSlide(view.slide.0))?;
        let element = self
            .document
            .create_element("div")
            .map_err(dom_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| RendererError::Dom("created element is not an HtmlElement".to_string()))?;
        element.set_class_name(&self.box_class);
        slide.append_child(&element).map_err(dom_error)?;
        self.elements.insert(view.id, element);
        self.project(view)
    }

    fn project(&mut self, view: &BoxView) -> RenderResult<()> {
        let element = self.element_ref(view.id)?;
        // The browser owns the text while the element is editable
        if !self.editing.contains(&view.id) {
            element.set_text_content(Some(&view.text));
        }
        let style = element.style();
        for (property, value) in view.declarations() {
            style.set_property(property, &value).map_err(dom_error)?;
        }
        element
            .class_list()
            .toggle_with_force(&self.active_class, view.active)
            .map_err(dom_error)?;
        Ok(())
    }

    fn measure(&self, id: BoxId) -> Option<Size> {
        let element = self.elements.get(&id)?;
        let size = Size::new(
            f64::from(element.offset_width()),
            f64::from(element.offset_height()),
        );
        (size.width > 0.0 || size.height > 0.0).then_some(size)
    }

    fn set_editing(&mut self, id: BoxId, editing: bool) -> RenderResult<()> {
        let element = self.element_ref(id)?.clone();
        if editing {
            element.set_content_editable("true");
            self.editing.insert(id);
            self.focus_requests.push(FocusRequest::Focus(element));
        } else {
            element.set_content_editable("false");
            self.editing.remove(&id);
        }
        Ok(())
    }

    fn blur(&mut self, id: BoxId) -> RenderResult<()> {
        let element = self.element_ref(id)?.clone();
        self.focus_requests.push(FocusRequest::Blur(element));
        Ok(())
    }

    fn capture_pointer(&mut self, id: BoxId, pointer_id: PointerId) -> RenderResult<()> {
        self.element_ref(id)?
            .set_pointer_capture(pointer_id)
            .map_err(dom_error)
    }

    fn release_pointer(&mut self, id: BoxId, pointer_id: PointerId) -> RenderResult<()> {
        self.element_ref(id)?
            .release_pointer_capture(pointer_id)
            .map_err(dom_error)
    }

    fn sync_controls(&mut self, controls: &ControlPanel) -> RenderResult<()> {
        self.inputs.write(controls);
        Ok(())
    }
}

/// Everything the page's event handlers share.
struct Shell {
    config: AppConfig,
    document: Document,
    editor: RefCell<OverlayEditor>,
    host: RefCell<SwiperHost>,
    renderer: RefCell<DomRenderer>,
}

impl Shell {
    /// Run one editor operation, then render its effects.
    fn update<R>(self: &Rc<Self>, f: impl FnOnce(&mut OverlayEditor, &mut SwiperHost) -> R) -> R {
        let result = {
            let mut editor = self.editor.borrow_mut();
            let mut host = self.host.borrow_mut();
            f(&mut editor, &mut host)
        };
        self.render();
        result
    }

    fn render(self: &Rc<Self>) {
        let (mounted, focus_requests) = {
            let mut editor = self.editor.borrow_mut();
            let mut renderer = self.renderer.borrow_mut();
            let presented = present(&mut editor, &mut *renderer);
            (presented.mounted, renderer.take_focus_requests())
        };
        for id in mounted {
            let element = self.renderer.borrow().element(id);
            if let Some(element) = element {
                self.wire_box(id, &element);
            }
        }
        for request in focus_requests {
            request.apply(&self.document);
        }
    }

    /// Pull the current input values into the editor's control panel.
    fn read_controls(&self) {
        let renderer = self.renderer.borrow();
        renderer.inputs.read(self.editor.borrow_mut().controls_mut());
    }

    fn wire_box(self: &Rc<Self>, id: BoxId, element: &HtmlElement) {
        let shell = Rc::downgrade(self);

        on(element, "pointerdown", handler(&shell, move |shell, event: PointerEvent| {
            let sample = pointer_sample(&event);
            let parent = event
                .current_target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.parent_element());
            log_rejected(shell.update(|editor, host| {
                if let (Some(parent), Some(slide)) =
                    (parent, editor.document().get(id).map(|b| b.slide()))
                {
                    let size = Size::new(
                        f64::from(parent.client_width()),
                        f64::from(parent.client_height()),
                    );
                    editor.set_slide_size(slide, size);
                }
                editor.pointer_down(id, &sample, host)
            }));
        }));
        on(element, "pointermove", handler(&shell, move |shell, event: PointerEvent| {
            let sample = pointer_sample(&event);
            log_rejected(shell.update(|editor, _| editor.pointer_move(id, &sample)));
        }));
        on(element, "pointerup", handler(&shell, move |shell, event: PointerEvent| {
            let sample = pointer_sample(&event);
            shell.update(|editor, host| editor.pointer_up(id, &sample, host));
        }));
        on(element, "pointercancel", handler(&shell, move |shell, event: PointerEvent| {
            let sample = pointer_sample(&event);
            shell.update(|editor, host| editor.pointer_cancel(id, &sample, host));
        }));
        on(element, "lostpointercapture", handler(&shell, move |shell, event: PointerEvent| {
            shell.update(|editor, _| editor.pointer_capture_lost(id, event.pointer_id()));
        }));

        on(element, "click", handler(&shell, move |shell, event: web_sys::Event| {
            event.stop_propagation();
            log_rejected(shell.update(|editor, _| editor.box_clicked(id)));
        }));
        on(element, "dblclick", handler(&shell, move |shell, event: web_sys::Event| {
            event.stop_propagation();
            log_rejected(shell.update(|editor, _| editor.double_click(id)));
        }));

        // Characters are typed by the browser; only edit-ending keys go through the editor
        on(element, "keydown", handler(&shell, move |shell, event: KeyboardEvent| {
            let Some(key) = TextKey::from_key_name(&event.key()).filter(TextKey::ends_edit) else {
                return;
            };
            let result = shell.update(|editor, _| editor.key_down(id, &key));
            if result == TextEditResult::ExitEdit && key == TextKey::Enter {
                event.prevent_default();
            }
        }));
        let edited = element.clone();
        on(element, "input", handler(&shell, move |shell, _event: web_sys::Event| {
            let text = edited.inner_text();
            shell.update(|editor, _| editor.sync_edit_text(id, &text));
        }));
        let blurred = element.clone();
        on(element, "blur", handler(&shell, move |shell, _event: web_sys::Event| {
            let text = blurred.inner_text();
            shell.update(|editor, _| {
                editor.sync_edit_text(id, &text);
                editor.focus_lost(id);
            });
        }));
    }

    fn wire_page(self: &Rc<Self>) {
        let shell = Rc::downgrade(self);
        let box_selector = self.config.box_selector();
        let control_selector = self.config.control_selector();
        on(&self.document, "click", handler(&shell, move |shell, event: web_sys::Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let inside = |selector: &str| matches!(target.closest(selector), Ok(Some(_)));
            if inside(&box_selector) || inside(&control_selector) {
                return;
            }
            shell.update(|editor, _| editor.background_click());
        }));

        let button = |id: &str| self.document.get_element_by_id(id);
        if let Some(add) = button(&self.config.add_text_button_id) {
            on(&add, "click", handler(&shell, |shell, _event: web_sys::Event| {
                shell.read_controls();
                shell.update(|editor, host| editor.add_text(&*host));
            }));
        }
        if let Some(apply) = button(&self.config.apply_button_id) {
            on(&apply, "click", handler(&shell, |shell, event: web_sys::Event| {
                event.prevent_default();
                shell.read_controls();
                match shell.update(|editor, _| editor.apply()) {
                    Err(EditorError::NothingSelected) => alert(&EditorError::NothingSelected.to_string()),
                    other => log_rejected(other),
                }
            }));
        }
        if let Some(deselect) = button(&self.config.deselect_button_id) {
            on(&deselect, "click", handler(&shell, |shell, event: web_sys::Event| {
                event.prevent_default();
                shell.update(|editor, _| editor.deselect());
            }));
        }

        let listener_shell = shell.clone();
        self.host
            .borrow_mut()
            .subscribe_slide_change(Box::new(move || {
                if let Some(shell) = listener_shell.upgrade() {
                    shell.update(|editor, _| editor.slide_changed());
                }
            }));
    }

    /// Take over box elements already present in the slides.
    fn adopt_existing(self: &Rc<Self>) {
        let box_selector = self.config.box_selector();
        let slides = slide_elements(&self.host.borrow().swiper);
        let window = web_sys::window();
        let mut adopted = Vec::new();

        for (index, slide) in slides.iter().enumerate() {
            let slide_id = SlideId(index);
            self.editor.borrow_mut().set_slide_size(
                slide_id,
                Size::new(
                    f64::from(slide.client_width()),
                    f64::from(slide.client_height()),
                ),
            );
            let Ok(nodes) = slide.query_selector_all(&box_selector) else {
                continue;
            };
            let slide_rect = slide.get_bounding_client_rect();
            for node_index in 0..nodes.length() {
                let Some(element) = nodes
                    .item(node_index)
                    .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let rect = element.get_bounding_client_rect();
                let inline = element.style();
                let computed = window
                    .as_ref()
                    .and_then(|w| w.get_computed_style(&element).ok().flatten());
                let computed_value = |property: &str| {
                    computed
                        .as_ref()
                        .and_then(|style| style.get_property_value(property).ok())
                        .unwrap_or_default()
                };
                let inline_px = |property: &str| {
                    inline
                        .get_property_value(property)
                        .ok()
                        .and_then(|value| parse_px(&value))
                };
                let record = AdoptedBox {
                    content: element.inner_text(),
                    left: inline_px("left"),
                    top: inline_px("top"),
                    measured_offset: Point::new(
                        rect.left() - slide_rect.left(),
                        rect.top() - slide_rect.top(),
                    ),
                    font_size: computed_value("font-size"),
                    color: computed_value("color"),
                    font_family: computed_value("font-family"),
                };
                let id = self.editor.borrow_mut().adopt(slide_id, &record);
                self.renderer.borrow_mut().insert(id, element.clone());
                adopted.push((id, element));
            }
        }

        for (id, element) in &adopted {
            self.wire_box(*id, element);
        }
        log::info!("Adopted {} existing boxes", adopted.len());
        self.render();
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

fn pointer_sample(event: &PointerEvent) -> PointerSample {
    PointerSample {
        pointer_id: event.pointer_id(),
        is_primary: event.is_primary(),
        position: Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
    }
}

fn log_rejected<T>(result: Result<T, EditorError>) {
    if let Err(err) = result {
        log::warn!("{}", err);
    }
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Build a DOM callback that runs `f` with the live shell and the event
/// cast to `E`.
fn handler<E: JsCast + 'static>(
    shell: &Weak<Shell>,
    f: impl Fn(&Rc<Shell>, E) + 'static,
) -> Closure<dyn FnMut(web_sys::Event)> {
    let shell = shell.clone();
    Closure::wrap(Box::new(move |event: web_sys::Event| {
        let Some(shell) = shell.upgrade() else {
            return;
        };
        if let Ok(event) = event.dyn_into::<E>() {
            f(&shell, event);
        }
    }) as Box<dyn FnMut(web_sys::Event)>)
}

fn on(target: &EventTarget, kind: &str, callback: Closure<dyn FnMut(web_sys::Event)>) {
    if let Err(err) = target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
        log::warn!("Could not listen for {}: {:?}", kind, err);
    }
    callback.forget(); // Listeners live as long as the page
}

fn load_config(document: &Document) -> AppConfig {
    let default = AppConfig::default();
    let Some(json) = document
        .get_element_by_id(&default.config_script_id)
        .and_then(|script| script.text_content())
    else {
        return default;
    };
    AppConfig::from_json(&json).unwrap_or_else(|err| {
        log::warn!("Ignoring invalid page configuration: {}", err);
        default
    })
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }

    log::info!("Starting SlideText (WASM)");

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let config = load_config(&document);

    let swiper = Swiper::new(&config.carousel_selector, &swiper_options(&config)?)?;
    let renderer = DomRenderer::new(document.clone(), swiper.clone(), &config);
    let shell = Rc::new(Shell {
        editor: RefCell::new(OverlayEditor::new()),
        host: RefCell::new(SwiperHost::new(swiper)),
        renderer: RefCell::new(renderer),
        document,
        config,
    });

    shell.read_controls();
    shell.wire_page();
    shell.adopt_existing();
    Ok(())
}
