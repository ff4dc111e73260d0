use js_sys::{Function, JSON};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_scroll_core::{
    parse_section_json, Choreographer, Config, LayoutProbe, Outputs, ScrollFrame, SectionConfig,
    SectionGeometry, SectionId, SnapCoordinator,
};

/// Choreographer plus snap coordinator for one page. Create once per route and
/// call `unregister_all` + `snap_teardown` on navigation.
#[wasm_bindgen]
pub struct VizijScroll {
    core: Choreographer,
    snap: SnapCoordinator,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Calls `probe(target)` and expects `{ top, height }` in document pixels, or
/// null/undefined while the element isn't laid out.
struct JsProbe {
    f: Function,
}

impl LayoutProbe for JsProbe {
    fn measure(&mut self, target: &str) -> Option<SectionGeometry> {
        let arg = JsValue::from_str(target);
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(val) if !jsvalue_is_undefined_or_null(&val) => swb::from_value(val).ok(),
            _ => None,
        }
    }
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route core logs to the browser console. `level` is one of
/// "off", "error", "warn", "info", "debug", "trace" (default "warn").
#[wasm_bindgen(js_name = init_logging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    let filter: LevelFilter = match level.as_deref() {
        None => LevelFilter::Warn,
        Some(s) => s
            .parse()
            .map_err(|_| JsError::new(&format!("init_logging: unknown level '{s}'")))?,
    };
    // A second call only adjusts the level.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}

fn stringify(op: &str, value: &JsValue) -> Result<String, JsError> {
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{op} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{op}: stringify produced non-string")))
}

#[wasm_bindgen]
impl VizijScroll {
    /// Create a page instance. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new VizijScroll({ snap_buffer: 0.02, settle_delay_ms: 500 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijScroll, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        cfg.validate()
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;

        Ok(VizijScroll {
            core: Choreographer::new(cfg.clone()),
            snap: SnapCoordinator::new(cfg),
        })
    }

    /// Register a section from a `SectionConfig` object. `probe(target)` measures
    /// the section element. Returns a SectionId (u32).
    #[wasm_bindgen(js_name = register_section)]
    pub fn register_section(&mut self, config: JsValue, probe: Function) -> Result<u32, JsError> {
        let cfg: SectionConfig = swb::from_value(config)
            .map_err(|e| JsError::new(&format!("register_section parse error: {e}")))?;
        self.register(cfg, probe, "register_section")
    }

    /// Register a section from the stored JSON shape (`pin`, `start: "top 80%"`,
    /// `end: "+=130%"`, unit strings). Accepts an object or a JSON string.
    #[wasm_bindgen(js_name = register_stored_section)]
    pub fn register_stored_section(
        &mut self,
        data: JsValue,
        probe: Function,
    ) -> Result<u32, JsError> {
        if jsvalue_is_undefined_or_null(&data) {
            return Err(JsError::new(
                "register_stored_section: data is null/undefined",
            ));
        }
        let s = match data.as_string() {
            Some(s) => s,
            None => stringify("register_stored_section", &data)?,
        };
        let cfg = parse_section_json(&s)
            .map_err(|e| JsError::new(&format!("register_stored_section parse error: {e}")))?;
        self.register(cfg, probe, "register_stored_section")
    }

    /// Release a section. False when it was already released.
    #[wasm_bindgen]
    pub fn unregister(&mut self, id: u32) -> bool {
        self.core.unregister(SectionId(id))
    }

    /// Release every section (route teardown). Returns how many were removed.
    #[wasm_bindgen(js_name = unregister_all)]
    pub fn unregister_all(&mut self) -> u32 {
        self.core.unregister_all() as u32
    }

    /// Re-measure sections and, when snapping is active, recompute its ranges.
    /// Call on resize. Uses the frame from the last `update`.
    #[wasm_bindgen]
    pub fn refresh(&mut self, probe: Function) {
        let mut js_probe = JsProbe { f: probe };
        self.core.refresh(&mut js_probe);
        self.snap.refresh(&self.core);
    }

    /// Step by dt (seconds) with `{ scroll_offset, viewport_height, max_scroll }`.
    /// Also counts down the snap settle delay. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32, frame: JsValue) -> Result<JsValue, JsError> {
        let frame: ScrollFrame =
            swb::from_value(frame).map_err(|e| JsError::new(&format!("frame error: {e}")))?;
        self.core.update(dt, frame);
        self.snap.advance(dt * 1000.0, &self.core);
        let out: &Outputs = self.core.outputs();
        // Property maps go out as plain objects, not ES Maps.
        out.serialize(&swb::Serializer::json_compatible())
            .map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Displayed progress of a section, or undefined when unknown.
    #[wasm_bindgen]
    pub fn progress(&self, id: u32) -> Option<f32> {
        self.core.progress(SectionId(id))
    }

    /// Arm snapping after `delay_ms` (default from config). Re-arming tears
    /// down any active rule first.
    #[wasm_bindgen(js_name = snap_initialize)]
    pub fn snap_initialize(&mut self, delay_ms: Option<u32>) {
        match delay_ms {
            Some(ms) => self.snap.initialize(ms),
            None => self.snap.initialize_default(),
        }
    }

    #[wasm_bindgen(js_name = snap_active)]
    pub fn snap_active(&self) -> bool {
        self.snap.rule().is_some()
    }

    /// Current pinned ranges as `[{ start, end, center }]`.
    #[wasm_bindgen(js_name = snap_ranges)]
    pub fn snap_ranges(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.snap.ranges()).map_err(|e| JsError::new(&format!("snap_ranges error: {e}")))
    }

    /// Snap target for a normalized scroll position.
    #[wasm_bindgen(js_name = snap_resolve)]
    pub fn snap_resolve(&self, v: f32) -> f32 {
        self.snap.resolve(v)
    }

    /// Start a snap from `v`. Returns the tween (`{ from, to, duration, ease }`)
    /// or null when `v` is already where it should be.
    #[wasm_bindgen(js_name = snap_begin)]
    pub fn snap_begin(&mut self, v: f32) -> Result<JsValue, JsError> {
        match self.snap.begin_snap(v) {
            Some(tween) => swb::to_value(&tween)
                .map_err(|e| JsError::new(&format!("snap_begin error: {e}"))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Advance the in-flight snap; the next normalized position, or undefined
    /// when nothing is in flight.
    #[wasm_bindgen(js_name = snap_step)]
    pub fn snap_step(&mut self, dt: f32) -> Option<f32> {
        self.snap.step(dt)
    }

    #[wasm_bindgen(js_name = snap_cancel)]
    pub fn snap_cancel(&mut self) {
        self.snap.cancel_snap();
    }

    #[wasm_bindgen(js_name = snap_teardown)]
    pub fn snap_teardown(&mut self) {
        self.snap.teardown();
    }
}

impl VizijScroll {
    fn register(&mut self, cfg: SectionConfig, probe: Function, op: &str) -> Result<u32, JsError> {
        let mut js_probe = JsProbe { f: probe };
        let id = self
            .core
            .register(cfg, &mut js_probe)
            .map_err(|e| JsError::new(&format!("{op} error: {e}")))?;
        Ok(id.0)
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
