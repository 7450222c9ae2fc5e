//! Unit-circle diagram rendering.
//!
//! Draws the unit circle with every standard angle labelled in degrees (green),
//! radians (purple) and exact `(cos, sin)` coordinates, plus an optional red
//! radius to a highlighted angle. Output is PNG bytes ready for upload.
//!
//! Labels need a TrueType/OpenType font loaded at startup. Without one the
//! [`DiagramService`] stays up but reports [`DiagramError::Unavailable`].

use crate::config::AxisSettings;
use crate::trig::{StandardAngle, STANDARD_ANGLES};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Family name the label font is registered under.
const LABEL_FONT: &str = "axis-label";

/// Half-width of the drawn region in unit-circle coordinates.
const EXTENT: f64 = 1.45;

const DEGREE_LABEL_RADIUS: f64 = 1.12;
const RADIAN_LABEL_RADIUS: f64 = 1.30;
const COORD_LABEL_RADIUS: f64 = 0.72;

const DEGREE_COLOR: RGBColor = RGBColor(0, 128, 0);
const RADIAN_COLOR: RGBColor = RGBColor(128, 0, 128);
const POINT_COLOR: RGBColor = RGBColor(255, 165, 0);
const AXIS_COLOR: RGBColor = RGBColor(90, 90, 90);
const HIGHLIGHT_COLOR: RGBColor = RGBColor(220, 20, 20);

/// Errors that can occur while producing a diagram
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    /// No font could be loaded for labels
    #[error("no usable label font: {0}")]
    FontUnavailable(String),
    /// Rendering was disabled at startup
    #[error("diagram rendering unavailable: {0}")]
    Unavailable(String),
    /// The drawing backend failed
    #[error("drawing error: {0}")]
    Backend(String),
    /// PNG encoding failed
    #[error("PNG encoding error: {0}")]
    Encode(String),
    /// Rendering took longer than allowed
    #[error("rendering timed out after {0:?}")]
    Timeout(Duration),
    /// The request was cancelled
    #[error("rendering cancelled")]
    Cancelled,
    /// The blocking worker panicked or was aborted
    #[error("render worker failed: {0}")]
    Worker(String),
}

impl DiagramError {
    /// Short explanation suitable for chat users.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::FontUnavailable(_) | Self::Unavailable(_) => {
                "The unit circle generator is not available on this server (no label font installed)."
            }
            Self::Timeout(_) => "Generating the unit circle took too long. Please try again later.",
            Self::Cancelled => "Unit circle generation was cancelled.",
            Self::Backend(_) | Self::Encode(_) | Self::Worker(_) => {
                "Failed to generate unit circle image."
            }
        }
    }
}

/// Friendly radian label for a whole-degree angle, e.g. `π/6`, `2π/3`, `π`.
///
/// ```
/// use axis_core::diagram::radian_label;
///
/// assert_eq!(radian_label(0), "0");
/// assert_eq!(radian_label(120), "2π/3");
/// assert_eq!(radian_label(180), "π");
/// ```
#[must_use]
pub fn radian_label(degrees: u16) -> String {
    if degrees == 0 {
        return "0".to_string();
    }
    let divisor = gcd(degrees, 180);
    let numerator = degrees / divisor;
    let denominator = 180 / divisor;
    match (numerator, denominator) {
        (1, 1) => "π".to_string(),
        (n, 1) => format!("{n}π"),
        (1, d) => format!("π/{d}"),
        (n, d) => format!("{n}π/{d}"),
    }
}

const fn gcd(mut a: u16, mut b: u16) -> u16 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Exact `(cos, sin)` coordinates of a standard angle.
#[must_use]
pub fn coordinate_label(entry: &StandardAngle) -> String {
    format!("({}, {})", entry.cos, entry.sin)
}

fn register_label_font(path: &Path) -> Result<(), DiagramError> {
    let not_a_font =
        || DiagramError::FontUnavailable(format!("{}: not a usable font", path.display()));
    let bytes = std::fs::read(path)
        .map_err(|e| DiagramError::FontUnavailable(format!("{}: {e}", path.display())))?;
    ab_glyph::FontRef::try_from_slice(&bytes).map_err(|_| not_a_font())?;
    // plotters keeps registered fonts for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(LABEL_FONT, FontStyle::Normal, bytes).map_err(|_| not_a_font())
}

/// Draws unit-circle PNGs.
#[derive(Debug, Clone)]
pub struct UnitCircleRenderer {
    size: u32,
}

impl UnitCircleRenderer {
    /// Create a renderer using the font at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::FontUnavailable`] if the file cannot be read or
    /// is not a font.
    pub fn with_font(path: &Path, size: u32) -> Result<Self, DiagramError> {
        register_label_font(path)?;
        info!("Diagram label font loaded from {}", path.display());
        Ok(Self { size })
    }

    /// Create a renderer from settings, trying each candidate font in order.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::FontUnavailable`] listing every failed candidate.
    pub fn from_settings(settings: &AxisSettings) -> Result<Self, DiagramError> {
        Self::from_candidates(&settings.font_candidates(), settings.diagram_size())
    }

    fn from_candidates(candidates: &[PathBuf], size: u32) -> Result<Self, DiagramError> {
        let mut failures = Vec::new();
        for path in candidates {
            match Self::with_font(path, size) {
                Ok(renderer) => return Ok(renderer),
                Err(e) => {
                    debug!("Skipping font candidate: {e}");
                    failures.push(path.display().to_string());
                }
            }
        }
        Err(DiagramError::FontUnavailable(format!(
            "tried {}",
            failures.join(", ")
        )))
    }

    /// Edge length in pixels.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Render the diagram, optionally highlighting `highlight` radians.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Backend`] or [`DiagramError::Encode`] when
    /// drawing or PNG encoding fails.
    pub fn render_png(&self, highlight: Option<f64>) -> Result<Vec<u8>, DiagramError> {
        let size = self.size;
        let mut buffer = vec![0u8; size as usize * size as usize * 3];
        self.draw(&mut buffer, highlight)?;

        let image = image::RgbImage::from_raw(size, size, buffer)
            .ok_or_else(|| DiagramError::Encode("pixel buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| DiagramError::Encode(e.to_string()))?;
        Ok(png)
    }

    fn draw(&self, buffer: &mut [u8], highlight: Option<f64>) -> Result<(), DiagramError> {
        let root = BitMapBackend::with_buffer(buffer, (self.size, self.size)).into_drawing_area();
        let canvas = Canvas::new(self.size);
        let backend = |e: DrawingAreaErrorKind<_>| DiagramError::Backend(e.to_string());

        root.fill(&WHITE).map_err(backend)?;

        let axis_style = AXIS_COLOR.stroke_width(1);
        root.draw(&PathElement::new(
            vec![canvas.point(-1.25, 0.0), canvas.point(1.25, 0.0)],
            axis_style,
        ))
        .map_err(backend)?;
        root.draw(&PathElement::new(
            vec![canvas.point(0.0, -1.25), canvas.point(0.0, 1.25)],
            axis_style,
        ))
        .map_err(backend)?;
        root.draw(&Circle::new(
            canvas.point(0.0, 0.0),
            canvas.length(1.0),
            BLACK.stroke_width(2),
        ))
        .map_err(backend)?;

        let degree_font = canvas.font(0.019, DEGREE_COLOR);
        let radian_font = canvas.font(0.019, RADIAN_COLOR);
        let coord_font = canvas.font(0.014, BLACK);

        for entry in &STANDARD_ANGLES {
            let radians = f64::from(entry.degrees).to_radians();
            let (x, y) = (radians.cos(), radians.sin());

            root.draw(&Circle::new(
                canvas.point(x, y),
                canvas.pixels(0.006),
                POINT_COLOR.filled(),
            ))
            .map_err(backend)?;
            root.draw(&Text::new(
                format!("{}°", entry.degrees),
                canvas.point(x * DEGREE_LABEL_RADIUS, y * DEGREE_LABEL_RADIUS),
                degree_font.clone(),
            ))
            .map_err(backend)?;
            root.draw(&Text::new(
                radian_label(entry.degrees),
                canvas.point(x * RADIAN_LABEL_RADIUS, y * RADIAN_LABEL_RADIUS),
                radian_font.clone(),
            ))
            .map_err(backend)?;
            root.draw(&Text::new(
                coordinate_label(entry),
                canvas.point(x * COORD_LABEL_RADIUS, y * COORD_LABEL_RADIUS),
                coord_font.clone(),
            ))
            .map_err(backend)?;
        }

        if let Some(radians) = highlight.filter(|r| r.is_finite()) {
            let (x, y) = (radians.cos(), radians.sin());
            root.draw(&PathElement::new(
                vec![canvas.point(0.0, 0.0), canvas.point(x, y)],
                HIGHLIGHT_COLOR.stroke_width(3),
            ))
            .map_err(backend)?;
            root.draw(&Circle::new(
                canvas.point(x, y),
                canvas.pixels(0.009),
                HIGHLIGHT_COLOR.filled(),
            ))
            .map_err(backend)?;
            root.draw(&Text::new(
                "target".to_string(),
                canvas.point(x * 1.05, y * 1.05 - 0.06),
                canvas.font(0.019, HIGHLIGHT_COLOR),
            ))
            .map_err(backend)?;
        }

        root.present().map_err(backend)
    }
}

/// Maps unit-circle coordinates onto a square pixel canvas.
struct Canvas {
    size: f64,
    scale: f64,
}

// pixel math stays well inside i32 for the clamped diagram sizes
#[allow(clippy::cast_possible_truncation)]
impl Canvas {
    fn new(size: u32) -> Self {
        let size = f64::from(size);
        Self {
            size,
            scale: size / (2.0 * EXTENT),
        }
    }

    fn point(&self, x: f64, y: f64) -> (i32, i32) {
        let half = self.size / 2.0;
        (
            (half + x * self.scale).round() as i32,
            (half - y * self.scale).round() as i32,
        )
    }

    fn length(&self, units: f64) -> i32 {
        (units * self.scale).round() as i32
    }

    fn pixels(&self, fraction: f64) -> i32 {
        (fraction * self.size).round().max(2.0) as i32
    }

    fn font(&self, fraction: f64, color: RGBColor) -> TextStyle<'static> {
        FontDesc::new(
            FontFamily::Name(LABEL_FONT),
            (fraction * self.size).max(8.0),
            FontStyle::Normal,
        )
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Center))
    }
}

/// Rendering front-end used by transports: off-thread, bounded and cancellable.
#[derive(Debug, Clone)]
pub struct DiagramService {
    renderer: Result<Arc<UnitCircleRenderer>, String>,
    timeout: Duration,
}

impl DiagramService {
    /// Service backed by a working renderer.
    #[must_use]
    pub fn ready(renderer: UnitCircleRenderer, timeout: Duration) -> Self {
        Self {
            renderer: Ok(Arc::new(renderer)),
            timeout,
        }
    }

    /// Service that answers every request with [`DiagramError::Unavailable`].
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            renderer: Err(reason.into()),
            timeout: Duration::ZERO,
        }
    }

    /// Build from settings; a missing font degrades to an unavailable service.
    #[must_use]
    pub fn from_settings(settings: &AxisSettings) -> Self {
        match UnitCircleRenderer::from_settings(settings) {
            Ok(renderer) => {
                info!("Unit circle renderer ready ({}px).", renderer.size());
                Self::ready(renderer, settings.diagram_timeout())
            }
            Err(e) => {
                warn!("Unit circle rendering disabled: {e}");
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Whether a renderer is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.renderer.is_ok()
    }

    /// Render on a blocking worker.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Unavailable`] without a renderer,
    /// [`DiagramError::Cancelled`] once `cancel` fires, [`DiagramError::Timeout`]
    /// when the configured limit passes, or any rendering error.
    pub async fn render(
        &self,
        highlight: Option<f64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, DiagramError> {
        let renderer = self
            .renderer
            .as_ref()
            .map_err(|reason| DiagramError::Unavailable(reason.clone()))?
            .clone();

        run_bounded(move || renderer.render_png(highlight), self.timeout, cancel).await
    }
}

/// Run `job` on a blocking worker, bounded by `timeout` and `cancel`.
async fn run_bounded<F>(
    job: F,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, DiagramError>
where
    F: FnOnce() -> Result<Vec<u8>, DiagramError> + Send + 'static,
{
    // a timed-out worker finishes in the background and its output is dropped
    let task = tokio::task::spawn_blocking(job);

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DiagramError::Cancelled),
        outcome = tokio::time::timeout(timeout, task) => match outcome {
            Err(_) => Err(DiagramError::Timeout(timeout)),
            Ok(Err(join)) => Err(DiagramError::Worker(join.to_string())),
            Ok(Ok(result)) => result,
        },
    }
}
