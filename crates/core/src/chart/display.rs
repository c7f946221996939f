use super::Chart;
use crate::config::DisplayConfig;
use crate::error::Result;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

static GLOBAL: OnceCell<DisplayContext> = OnceCell::new();

/// Surface that rendered charts are written to.
#[derive(Debug)]
pub struct DisplayContext {
    output_dir: PathBuf,
    sequence: AtomicUsize,
}

/// A chart after it has been displayed.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub svg: String,
    pub figure: Value,
    pub path: PathBuf,
}

impl DisplayContext {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            sequence: AtomicUsize::new(0),
        })
    }

    /// Process-wide context. Only the first call's config is used; later
    /// calls return the context that already exists.
    pub fn init(config: &DisplayConfig) -> Result<&'static DisplayContext> {
        GLOBAL.get_or_try_init(|| {
            info!("Charts will be written to {}", config.output_dir.display());
            DisplayContext::new(&config.output_dir)
        })
    }

    pub fn global() -> Option<&'static DisplayContext> {
        GLOBAL.get()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn display(&self, chart: &Chart) -> Result<RenderedChart> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let path = self.output_dir.join(format!(
            "{}-{}-{:04}.svg",
            chart.kind().as_str(),
            std::process::id(),
            seq
        ));

        let svg = chart.to_svg();
        std::fs::write(&path, &svg)?;
        debug!("Wrote {} chart to {}", chart.kind().as_str(), path.display());

        Ok(RenderedChart {
            svg,
            figure: chart.figure(),
            path,
        })
    }
}
