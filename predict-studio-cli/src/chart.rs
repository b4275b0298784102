//! Feature-importance chart drawn with terminal bars.

use colored::Colorize;
use predict_studio_core::{BarChartSpec, ChartHandle, ChartSurface};
use std::io::Write;
use tracing::{debug, warn};

pub const BAR_WIDTH: usize = 40;

/// Chart surface for the terminal.
///
/// Each created chart is drawn at once; a destroyed chart stays in the
/// scrollback but is no longer live.
pub struct TerminalChart {
    out: Option<Box<dyn Write + Send>>,
    live: Vec<ChartHandle>,
}

impl TerminalChart {
    pub fn stdout() -> Self {
        Self::to_writer(Box::new(std::io::stdout()))
    }

    pub fn to_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Some(out),
            live: Vec::new(),
        }
    }

    /// Tracks charts without drawing them, for machine-readable output
    pub fn hidden() -> Self {
        Self {
            out: None,
            live: Vec::new(),
        }
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl ChartSurface for TerminalChart {
    fn create(&mut self, spec: &BarChartSpec) -> ChartHandle {
        if let Some(out) = &mut self.out {
            let text = format!("\n{}\n{}", spec.title.bold().underline(), render_bars(spec, BAR_WIDTH));
            if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
                warn!(error = %e, "drawing chart failed");
            }
        }
        let handle = ChartHandle::new();
        debug!(?handle, bars = spec.labels.len(), "chart created");
        self.live.push(handle);
        handle
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.live.retain(|h| *h != handle);
        debug!(?handle, live = self.live(), "chart destroyed");
    }
}

/// One line per bar, scaled against the chart's value axis.
fn render_bars(spec: &BarChartSpec, width: usize) -> String {
    let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let span = spec.value_axis.max - spec.value_axis.min;

    let mut out = String::new();
    for (label, value) in spec.labels.iter().zip(&spec.values) {
        let filled = if span > 0.0 {
            (((value - spec.value_axis.min) / span) * width as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {:>lw$} │{} {:.4}\n",
            label,
            "█".repeat(filled.min(width)),
            value,
            lw = label_width
        ));
    }
    out
}
