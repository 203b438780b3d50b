use std::{fmt, io, path::Path, path::PathBuf};

use image::RgbaImage;
use tracing::debug;

pub mod command;
pub mod config;

pub use command::{emit, FloatList, PlacementCommand, Transform};
pub use config::RunConfig;

#[derive(Debug, thiserror::Error)]
pub enum PlacerError {
    #[error("unable to read config file {}: {source}", .path.display())]
    ReadConfigFailed { path: PathBuf, source: io::Error },

    #[error("invalid config file {}: {source}", .path.display())]
    ParseConfigFailed {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unable to open image {}: {source}", .path.display())]
    OpenImageFailed {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("color grid has {cells} cells but is {width}x{height}")]
    GridSizeMismatch {
        width: u32,
        height: u32,
        cells: usize,
    },

    #[error("unable to write output file {}: {source}", .path.display())]
    WriteOutputFailed { path: PathBuf, source: io::Error },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Renders as `#RRGGBB`, uppercase.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// `None` marks a fully transparent pixel.
pub type ColorCell = Option<Rgb>;

/// Row-major grid of color cells with the dimensions of the source image.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGrid {
    width: u32,
    height: u32,
    cells: Vec<ColorCell>,
}

impl ColorGrid {
    pub fn from_cells(
        width: u32,
        height: u32,
        cells: Vec<ColorCell>,
    ) -> Result<Self, PlacerError> {
        if cells.len() as u64 != u64::from(width) * u64::from(height) {
            return Err(PlacerError::GridSizeMismatch {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<ColorCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ColorCell]> {
        // chunks panics on zero, and a zero-width grid has no cells anyway
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Opaque cells in row-major order, with their grid position.
    pub fn opaque_cells(&self) -> impl Iterator<Item = (u32, u32, Rgb)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            // x < width and y < height, so both fit back into u32
            cell.map(|color| ((index % width) as u32, (index / width) as u32, color))
        })
    }

    pub fn opaque_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

pub fn load_image(image_path: &Path) -> Result<RgbaImage, PlacerError> {
    debug!("reading image file {}", image_path.display());
    let image_object = match image::open(image_path) {
        Ok(image_object) => image_object.into_rgba8(),
        Err(error) => {
            return Err(PlacerError::OpenImageFailed {
                path: image_path.to_path_buf(),
                source: error,
            })
        }
    };
    debug!(
        "decoded {}x{} image",
        image_object.width(),
        image_object.height()
    );
    Ok(image_object)
}

pub fn rasterize(image_object: &RgbaImage) -> ColorGrid {
    let (width, height) = image_object.dimensions();
    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for (_, _, color) in image_object.enumerate_pixels() {
        let [r, g, b, a] = color.0;
        cells.push(if a == 0 { None } else { Some(Rgb::new(r, g, b)) });
    }
    let grid = ColorGrid {
        width,
        height,
        cells,
    };
    debug!(
        "rasterized {} opaque cells out of {}",
        grid.opaque_count(),
        grid.cells.len()
    );
    grid
}
