#![cfg(target_arch = "wasm32")]

//! Interactive Gaussian-splat viewer: scene-anchored dual-mode camera,
//! worker-offloaded depth sorting, progressive-resolution rendering, and
//! click-to-calibrate ground-plane alignment.

mod calibrate;
mod camera;
mod constants;
mod coords;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod scene;
mod scheduler;
mod sort;
mod splats;
mod worker;

use std::rc::Rc;

use anyhow::{anyhow, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use calibrate::LoggingObserver;
use constants::SORT_WORKER_URL;
use frame::{request_render, FrameContext};
use render::GpuState;
use scene::SceneRegistry;
use worker::{SortWorker, WorkerReply};

const DEFAULT_SCENE: &str = "kit_lobby";
const INITIAL_SPLAT_CAPACITY: usize = 1 << 16;

#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);

    spawn_local(async {
        if let Err(e) = init().await {
            log::error!("[init] {e}");
            if let Some(document) = dom::window_document() {
                overlay::set_error(&document, &format!("Startup failed: {e}"));
            }
        }
    });
}

async fn init() -> Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow!("no document"))?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or_else(|| anyhow!("no #canvas element"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow!("#canvas is not a canvas"))?;
    // The surface borrows the canvas for the life of the page
    let canvas: &'static web::HtmlCanvasElement = Box::leak(Box::new(canvas));

    let worker = SortWorker::spawn(SORT_WORKER_URL)?;
    let registry = SceneRegistry::builtin()?;
    let ctx = Rc::new(FrameContext::new(
        canvas,
        worker,
        registry,
        Box::new(LoggingObserver),
    ));
    *ctx.gpu.borrow_mut() = Some(GpuState::new(canvas, INITIAL_SPLAT_CAPACITY).await?);

    let ctx2 = ctx.clone();
    ctx.worker.on_reply(move |reply| match reply {
        WorkerReply::Loaded {
            count,
            scene_min,
            scene_max,
        } => {
            {
                let mut splats = ctx2.splats.borrow_mut();
                splats.count = count;
                splats.scene_min = scene_min;
                splats.scene_max = scene_max;
            }
            ctx2.camera.borrow_mut().movement_locked = false;
            if let Some(document) = dom::window_document() {
                overlay::hide(&document);
            }
            log::info!("[scene] loaded {count} splats");
            request_render(&ctx2, None);
        }
        WorkerReply::Sorted(buffers) => {
            ctx2.settings.borrow_mut().sort_time = buffers.sort_time;
            if let Some(gpu) = ctx2.gpu.borrow_mut().as_mut() {
                gpu.upload_sorted(&buffers);
            }
            {
                // Mirror what the calibration raycast needs on this thread
                let mut splats = ctx2.splats.borrow_mut();
                splats.positions = buffers.positions;
                splats.opacities = buffers.opacities;
            }
            ctx2.sort.borrow_mut().complete();
            log::debug!("[sort] completed in {:.1}ms", buffers.sort_time);
            request_render(&ctx2, None);
        }
    });

    events::wire(&ctx, &document);
    frame::start_key_tick(&ctx);
    frame::load_scene(&ctx, DEFAULT_SCENE)?;
    request_render(&ctx, None);
    Ok(())
}
