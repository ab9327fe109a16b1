use anyhow::{anyhow, Result};
use glam::Vec3;
use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use super::sort::SortRequest;

/// Sorted attribute buffers returned by the worker, in draw order.
pub struct SortedBuffers {
    pub colors: Vec<f32>,
    pub positions: Vec<f32>,
    pub opacities: Vec<f32>,
    pub cov3da: Vec<f32>,
    pub cov3db: Vec<f32>,
    pub sort_time: f64,
}

pub enum WorkerReply {
    /// Scene finished downloading and parsing inside the worker.
    Loaded {
        count: usize,
        scene_min: Vec3,
        scene_max: Vec3,
    },
    Sorted(SortedBuffers),
}

/// Bridge to the external sort worker script. The worker owns the splat
/// data (it receives the scene URL, downloads and parses the .ply itself)
/// and answers sort requests with re-ordered attribute buffers; the
/// boundary is message passing only.
pub struct SortWorker {
    inner: web::Worker,
}

impl SortWorker {
    pub fn spawn(script_url: &str) -> Result<Self> {
        let inner =
            web::Worker::new(script_url).map_err(|e| anyhow!("worker spawn failed: {e:?}"))?;
        Ok(Self { inner })
    }

    pub fn request_load(&self, url: &str) -> Result<()> {
        let msg = Object::new();
        Reflect::set(&msg, &JsValue::from_str("load"), &JsValue::from_str(url))
            .map_err(|e| anyhow!("{e:?}"))?;
        self.inner
            .post_message(&msg)
            .map_err(|e| anyhow!("worker post failed: {e:?}"))
    }

    pub fn request_sort(&self, request: &SortRequest) -> Result<()> {
        let msg = JsValue::from_serde(request).map_err(|e| anyhow!("sort request encode: {e}"))?;
        self.inner
            .post_message(&msg)
            .map_err(|e| anyhow!("worker post failed: {e:?}"))
    }

    pub fn on_reply(&self, mut f: impl FnMut(WorkerReply) + 'static) {
        let closure = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
            match parse_reply(&ev.data()) {
                Some(reply) => f(reply),
                None => log::warn!("[worker] unrecognized message"),
            }
        }) as Box<dyn FnMut(_)>);
        self.inner
            .set_onmessage(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
}

fn get(value: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn f32_buffer(value: &JsValue) -> Vec<f32> {
    Float32Array::new(value).to_vec()
}

fn vec3_field(value: &JsValue, key: &str) -> Option<Vec3> {
    let buf = f32_buffer(&get(value, key)?);
    (buf.len() >= 3).then(|| Vec3::new(buf[0], buf[1], buf[2]))
}

fn parse_reply(msg: &JsValue) -> Option<WorkerReply> {
    if let Some(data) = get(msg, "data") {
        let sort_time = get(msg, "sortTime").and_then(|v| v.as_f64()).unwrap_or(0.0);
        return Some(WorkerReply::Sorted(SortedBuffers {
            colors: f32_buffer(&get(&data, "colors")?),
            positions: f32_buffer(&get(&data, "positions")?),
            opacities: f32_buffer(&get(&data, "opacities")?),
            cov3da: f32_buffer(&get(&data, "cov3Da")?),
            cov3db: f32_buffer(&get(&data, "cov3Db")?),
            sort_time,
        }));
    }
    if let Some(loaded) = get(msg, "loaded") {
        let count = get(&loaded, "count").and_then(|v| v.as_f64())? as usize;
        return Some(WorkerReply::Loaded {
            count,
            scene_min: vec3_field(&loaded, "sceneMin")?,
            scene_max: vec3_field(&loaded, "sceneMax")?,
        });
    }
    None
}
