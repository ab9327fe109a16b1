use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use super::calibrate::{CalibrationObserver, CalibrationSession};
use super::camera::Camera;
use super::constants::*;
use super::dom;
use super::input::{KeyState, PointerState, TouchState};
use super::overlay;
use super::render::{GpuState, SplatUniforms};
use super::scene::SceneRegistry;
use super::scheduler::{next_resolution, should_refine, DebounceTimer, FrameRequest};
use super::sort::{SortAlgorithm, SortCoordinator, SortRequest};
use super::splats::SplatCloud;
use super::worker::SortWorker;

/// Runtime-tunable viewer settings.
pub struct Settings {
    pub scene: String,
    pub render_resolution: f32,
    pub max_splats: u32,
    pub scaling_modifier: f32,
    pub sorting_algorithm: SortAlgorithm,
    pub speed: f32,
    pub sort_time: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene: String::new(),
            render_resolution: BASE_RENDER_RESOLUTION,
            max_splats: DEFAULT_MAX_SPLATS,
            scaling_modifier: 1.0,
            sorting_algorithm: SortAlgorithm::default(),
            speed: DEFAULT_FLY_SPEED,
            sort_time: 0.0,
        }
    }
}

/// Explicit parameters for one scheduled frame. Refinement frames pin the
/// resolution they were scheduled with; interactive frames omit it and draw
/// at the base resolution.
#[derive(Clone, Copy, Debug)]
pub struct FrameSpec {
    pub resolution: f32,
}

/// Everything a frame needs, threaded explicitly through the callbacks
/// instead of living in globals.
pub struct FrameContext {
    pub canvas: &'static web::HtmlCanvasElement,
    pub gpu: RefCell<Option<GpuState<'static>>>,
    pub worker: SortWorker,
    pub registry: SceneRegistry,

    pub camera: RefCell<Camera>,
    pub sort: RefCell<SortCoordinator>,
    pub keys: RefCell<KeyState>,
    pub pointer: RefCell<PointerState>,
    pub touch: RefCell<TouchState>,
    pub session: RefCell<CalibrationSession>,
    pub observer: Box<dyn CalibrationObserver>,
    pub splats: RefCell<SplatCloud>,
    pub settings: RefCell<Settings>,

    frame_request: RefCell<FrameRequest>,
    refine_timer: RefCell<DebounceTimer>,
}

impl FrameContext {
    pub fn new(
        canvas: &'static web::HtmlCanvasElement,
        worker: SortWorker,
        registry: SceneRegistry,
        observer: Box<dyn CalibrationObserver>,
    ) -> Self {
        Self {
            canvas,
            gpu: RefCell::new(None),
            worker,
            registry,
            camera: RefCell::new(Camera::new(&Default::default())),
            sort: RefCell::new(SortCoordinator::new()),
            keys: RefCell::new(KeyState::default()),
            pointer: RefCell::new(PointerState::default()),
            touch: RefCell::new(TouchState::default()),
            session: RefCell::new(CalibrationSession::new()),
            observer,
            splats: RefCell::new(SplatCloud::default()),
            settings: RefCell::new(Settings::default()),
            frame_request: RefCell::new(FrameRequest::new()),
            refine_timer: RefCell::new(DebounceTimer::new()),
        }
    }
}

/// Schedule a frame on the next animation tick. A newer request supersedes
/// any still-pending one, so bursts of input coalesce into one draw.
pub fn request_render(ctx: &Rc<FrameContext>, spec: Option<FrameSpec>) {
    let ctx2 = ctx.clone();
    ctx.frame_request.borrow_mut().request(move || {
        render_frame(&ctx2, spec);
    });
}

fn render_frame(ctx: &Rc<FrameContext>, spec: Option<FrameSpec>) {
    let frame_start = instant::Instant::now();
    let resolution = match spec {
        Some(s) => s.resolution,
        None => ctx.settings.borrow().render_resolution,
    };

    // Size the backing store to the requested fraction of the CSS size
    let (css_w, css_h) = dom::canvas_css_size(ctx.canvas);
    let width = ((css_w * resolution as f64).round() as u32).max(1);
    let height = ((css_h * resolution as f64).round() as u32).max(1);
    dom::set_backing_size(ctx.canvas, width, height);

    {
        let mut camera = ctx.camera.borrow_mut();
        let mut sort = ctx.sort.borrow_mut();
        camera.update(width as f32, height as f32, &mut sort);

        let cloud_ready = !ctx.splats.borrow().is_empty();
        if sort.should_dispatch(cloud_ready) {
            let splats = ctx.splats.borrow();
            let settings = ctx.settings.borrow();
            let request = SortRequest {
                view_matrix: camera.vpm.to_cols_array(),
                max_gaussians: settings.max_splats.min(splats.count as u32),
                sorting_algorithm: settings.sorting_algorithm,
            };
            if let Err(e) = ctx.worker.request_sort(&request) {
                log::error!("[sort] dispatch failed: {e}");
                sort.complete();
            }
        }
    }

    if let Some(gpu) = ctx.gpu.borrow_mut().as_mut() {
        gpu.resize_if_needed(width, height);
        let uniforms = build_uniforms(ctx, width as f32, height as f32);
        let draw_count = {
            let splats = ctx.splats.borrow();
            let settings = ctx.settings.borrow();
            splats.count.min(settings.max_splats as usize)
        };
        if let Err(e) = gpu.render(&uniforms, draw_count) {
            log::error!("[render] surface error: {e:?}");
        }
    }

    log::debug!(
        "[render] {width}x{height} @ {resolution} in {:.1}ms",
        frame_start.elapsed().as_secs_f64() * 1000.0
    );

    // Progressive refinement: after the interaction settles, climb the
    // resolution ramp one debounced step at a time
    let next = next_resolution(resolution);
    let sort = ctx.sort.borrow();
    if should_refine(next, sort.needs_update(), sort.in_flight()) {
        drop(sort);
        let ctx2 = ctx.clone();
        ctx.refine_timer.borrow_mut().schedule(REFINE_DEBOUNCE_MS, move || {
            request_render(&ctx2, Some(FrameSpec { resolution: next }));
        });
    }
}

fn build_uniforms(ctx: &Rc<FrameContext>, width: f32, height: f32) -> SplatUniforms {
    let camera = ctx.camera.borrow();
    let splats = ctx.splats.borrow();
    let settings = ctx.settings.borrow();

    let half_fov = FOV_Y / 2.0;
    let focal_y = height / (2.0 * half_fov.tan());
    let tan_fov_y = half_fov.tan();
    let tan_fov_x = tan_fov_y * width / height;

    SplatUniforms {
        view: camera.vm.to_cols_array_2d(),
        view_proj: camera.vpm.to_cols_array_2d(),
        box_min: splats.scene_min.to_array(),
        viewport_w: width,
        box_max: splats.scene_max.to_array(),
        viewport_h: height,
        focal: [focal_y, focal_y],
        tan_fov: [tan_fov_x, tan_fov_y],
        scale_modifier: settings.scaling_modifier,
        _pad: [0.0; 3],
    }
}

/// Fixed-rate key integration for free-fly movement; runs independently of
/// the render loop so held keys produce steady motion.
pub fn start_key_tick(ctx: &Rc<FrameContext>) {
    let ctx2 = ctx.clone();
    let closure = Closure::wrap(Box::new(move || {
        let moved = {
            let keys = *ctx2.keys.borrow();
            let settings = ctx2.settings.borrow();
            ctx2.camera.borrow_mut().integrate_keys(&keys, settings.speed)
        };
        if moved {
            request_render(&ctx2, None);
        }
    }) as Box<dyn FnMut()>);
    if let Some(w) = web::window() {
        _ = w.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            KEY_TICK_MS,
        );
    }
    closure.forget();
}

/// Consume a completed calibration session: realign the camera's up vector
/// to the fitted plane normal and discard the session.
pub fn finish_calibration(ctx: &Rc<FrameContext>) {
    let normal = ctx.session.borrow().fitted_normal();
    let Some(normal) = normal else {
        log::warn!("[calibrate] finish requested before three points were picked");
        return;
    };
    ctx.camera.borrow_mut().set_up(normal);
    ctx.observer.up_changed(normal);
    ctx.session.borrow_mut().reset();
    ctx.observer.plane_points_changed(&[]);
    request_render(ctx, None);
}

/// Switch to a named scene: reset the camera and sort state, lock movement
/// until the worker reports the load finished, and hand the download to the
/// worker.
pub fn load_scene(ctx: &Rc<FrameContext>, name: &str) -> Result<()> {
    let entry = ctx.registry.get(name)?.clone();
    log::info!("[scene] loading '{name}' from {}", entry.url);

    if let Some(document) = dom::window_document() {
        overlay::show(&document);
        overlay::set_text(&document, "Loading scene...");
    }

    {
        let mut camera = ctx.camera.borrow_mut();
        *camera = Camera::new(&entry.camera_config());
        camera.movement_locked = true;
    }
    *ctx.sort.borrow_mut() = SortCoordinator::new();
    ctx.keys.borrow_mut().clear();
    ctx.session.borrow_mut().reset();
    *ctx.splats.borrow_mut() = SplatCloud::default();
    ctx.settings.borrow_mut().scene = name.to_string();

    ctx.worker.request_load(&entry.url)
}
