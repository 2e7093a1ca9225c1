use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use volume_gif::{ConvertOptions, Interpolation, RenderConfig, SliceAxis, SortBy, ValueRange};

/// Render a NIfTI or DICOM volume, with an optional segmentation mask, as a looping GIF.
#[derive(Parser, Debug)]
#[command(name = "volume-gif", version)]
struct Cli {
    /// NIfTI image, or a directory of DICOM files.
    image: PathBuf,

    /// NIfTI segmentation mask (or DICOM directory) aligned with the image.
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Output GIF path.
    #[arg(short, long, default_value = "output.gif")]
    output: PathBuf,

    /// Frame duration in milliseconds.
    #[arg(long, default_value_t = 80)]
    duration: u32,

    /// Do not highlight class boundaries.
    #[arg(long = "no-edges", alias = "no_edges")]
    no_edges: bool,

    /// Figure size; the canvas is `figsize * dpi` pixels square.
    #[arg(long, default_value_t = 4)]
    figsize: u32,

    /// Pixels per figure-size unit.
    #[arg(long, default_value_t = volume_gif::config::DEFAULT_DPI)]
    dpi: u32,

    /// Color map for intensities (gray, bone, hot, jet, viridis, ...; `_r` reverses).
    #[arg(long, default_value = "bone")]
    cmap: String,

    /// Opacity of the label overlay, in (0, 1].
    #[arg(long, default_value_t = 0.3)]
    alpha: f32,

    /// Axis code the raw voxel axes are reoriented with.
    #[arg(long, default_value = "LPI")]
    orientation: String,

    /// Number of counter-clockwise quarter turns applied to every slice.
    #[arg(long = "n-rot90", alias = "n_rot90", default_value_t = 1, allow_negative_numbers = true)]
    n_rot90: i32,

    /// Plane the animation steps through.
    #[arg(long, value_enum, default_value_t = AxisChoice::Axial)]
    axis: AxisChoice,

    /// Lower bound of the intensity window (requires --vmax).
    #[arg(long, requires = "vmax", allow_negative_numbers = true)]
    vmin: Option<f32>,

    /// Upper bound of the intensity window (requires --vmin).
    #[arg(long, requires = "vmin", allow_negative_numbers = true)]
    vmax: Option<f32>,

    /// Resampling used to scale slices onto the canvas.
    #[arg(long, value_enum, default_value_t = InterpolationChoice::Nearest)]
    interpolation: InterpolationChoice,

    /// Slice ordering for DICOM directories.
    #[arg(long = "sort-by", value_enum, default_value_t = SortChoice::Position)]
    sort_by: SortChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AxisChoice {
    Axial,
    Coronal,
    Sagittal,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InterpolationChoice {
    Nearest,
    Bilinear,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortChoice {
    Position,
    Table,
    Instance,
    None,
}

impl Cli {
    fn into_options(self) -> anyhow::Result<ConvertOptions> {
        let value_range = match (self.vmin, self.vmax) {
            (Some(min), Some(max)) => Some(ValueRange::new(min, max)?),
            _ => None,
        };

        Ok(ConvertOptions {
            image: self.image,
            mask: self.mask,
            output: self.output,
            duration: self.duration,
            orientation: self.orientation,
            n_rot90: self.n_rot90,
            sort_by: match self.sort_by {
                SortChoice::Position => SortBy::ImagePositionPatient,
                SortChoice::Table => SortBy::TablePosition,
                SortChoice::Instance => SortBy::InstanceNumber,
                SortChoice::None => SortBy::None,
            },
            render: RenderConfig {
                cmap: self.cmap,
                alpha: self.alpha,
                highlight_edges: !self.no_edges,
                figsize: self.figsize,
                dpi: self.dpi,
                interpolation: match self.interpolation {
                    InterpolationChoice::Nearest => Interpolation::Nearest,
                    InterpolationChoice::Bilinear => Interpolation::Bilinear,
                },
                axis: match self.axis {
                    AxisChoice::Axial => SliceAxis::Axial,
                    AxisChoice::Coronal => SliceAxis::Coronal,
                    AxisChoice::Sagittal => SliceAxis::Sagittal,
                },
                value_range,
            },
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = Cli::parse().into_options()?;
    let report = volume_gif::convert(&options)
        .with_context(|| format!("convert '{}'", options.image.display()))?;

    eprintln!(
        "wrote {} ({} frames, {}x{})",
        options.output.display(),
        report.frames,
        report.canvas_size,
        report.canvas_size
    );
    Ok(())
}
