//! Headless chart engine: accepts every spec, optionally dumping it to disk.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use csvqr_view::{ChartSink, ChartSpec, Completion, RegionHandle, RenderError};

/// Shared switch for when the engine counts as loaded.
#[derive(Clone, Debug, Default)]
pub struct EngineSwitch(Rc<Cell<bool>>);

impl EngineSwitch {
    pub fn new(loaded: bool) -> Self {
        Self(Rc::new(Cell::new(loaded)))
    }

    pub fn load(&self) {
        self.0.set(true);
    }

    pub fn is_loaded(&self) -> bool {
        self.0.get()
    }
}

pub struct HeadlessEngine {
    switch: EngineSwitch,
    out_dir: Option<PathBuf>,
}

impl HeadlessEngine {
    pub fn new(switch: EngineSwitch, out_dir: Option<PathBuf>) -> Self {
        Self { switch, out_dir }
    }

    fn dump(dir: &Path, target: &RegionHandle, spec: &ChartSpec) -> Result<PathBuf, String> {
        fs::create_dir_all(dir).map_err(|e| e.to_string())?;
        let path = dir.join(format!("{}.vl.json", target.id()));
        let body = serde_json::to_string_pretty(spec.body()).map_err(|e| e.to_string())?;
        fs::write(&path, body).map_err(|e| format!("{}: {}", path.display(), e))?;
        Ok(path)
    }
}

impl ChartSink for HeadlessEngine {
    fn is_available(&self) -> bool {
        self.switch.is_loaded()
    }

    fn render(&mut self, target: &RegionHandle, spec: &ChartSpec, done: Completion) {
        let Some(dir) = &self.out_dir else {
            done.succeed();
            return;
        };
        match Self::dump(dir, target, spec) {
            Ok(path) => {
                log::debug!(target: "charts", "#{} -> {}", target.id(), path.display());
                done.succeed();
            }
            Err(msg) => done.fail(RenderError::Rejected(msg)),
        }
    }
}
