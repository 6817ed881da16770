//! Mandelbrot Rasterizer - escape-time fractal written as a binary PPM (P6)
//!
//! # Output Format
//!
//! ```text
//! P6\n{width} {height}\n255\n<width * height * 3 raw RGB bytes>
//! ```
//!
//! Rows are top-to-bottom, pixels left-to-right. Nothing follows the pixel data.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::clock::TimeSource;
use crate::error::{BenchError, try_alloc};

/// Escape radius squared
const ESCAPE_NORM_SQR: f64 = 4.0;

/// RGB pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };

    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Textual P6 header for a `width x height` image.
pub fn ppm_header(width: usize, height: usize) -> String {
    format!("P6\n{} {}\n255\n", width, height)
}

/// Total serialized size of a `width x height` image, header included.
/// `None` if it does not fit in `usize`.
pub fn image_len(width: usize, height: usize) -> Option<usize> {
    width
        .checked_mul(height)?
        .checked_mul(3)?
        .checked_add(ppm_header(width, height).len())
}

/// Map pixel `(x, y)` to its point `(cx, cy)` on the complex plane.
#[inline]
pub fn pixel_to_complex(x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
    let (w, h) = (width as f64, height as f64);
    let cx = (x as f64 - 0.5 * w) * (3.5 / w) - 0.5;
    let cy = (y as f64 - 0.5 * h) * (2.0 / h);
    (cx, cy)
}

/// Iterations of `z = z^2 + c` from `z = 0` before `|z|^2 > 4`, capped at
/// `max_iterations`.
#[inline]
pub fn escape_iterations(cx: f64, cy: f64, max_iterations: u32) -> u32 {
    let (mut zx, mut zy) = (0.0f64, 0.0f64);
    let mut iter = 0;
    while zx * zx + zy * zy <= ESCAPE_NORM_SQR && iter < max_iterations {
        let nx = zx * zx - zy * zy + cx;
        let ny = 2.0 * zx * zy + cy;
        zx = nx;
        zy = ny;
        iter += 1;
    }
    iter
}

/// Colour for an iteration count. Points that never escaped are black.
#[inline]
pub fn pixel_color(iter: u32, max_iterations: u32) -> Pixel {
    if iter == max_iterations {
        return Pixel::BLACK;
    }
    // floor(255 * iter / max); iter < max so c <= 254
    let c = (255.0 * f64::from(iter) / f64::from(max_iterations)) as u32;
    Pixel {
        r: (c % 256) as u8,
        g: ((c * 3) % 256) as u8,
        b: ((c * 7) % 256) as u8,
    }
}

/// Sized raster plus its row buffer. Built before any output is touched.
struct Raster {
    width: usize,
    height: usize,
    max_iterations: u32,
    total_len: usize,
    row: Vec<u8>,
}

impl Raster {
    fn new(width: usize, height: usize, max_iterations: u32) -> Result<Self, BenchError> {
        let too_large = || BenchError::Allocation {
            what: "image",
            elements: usize::MAX,
        };
        let row_len = width.checked_mul(3).ok_or_else(too_large)?;
        let total_len = image_len(width, height).ok_or_else(too_large)?;
        let row = try_alloc("image row", row_len, 0u8)?;
        Ok(Self {
            width,
            height,
            max_iterations,
            total_len,
            row,
        })
    }

    fn write_to<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        let (width, height, max_iterations) = (self.width, self.height, self.max_iterations);
        out.write_all(ppm_header(width, height).as_bytes())?;

        for y in 0..height {
            for (x, px) in self.row.chunks_exact_mut(3).enumerate() {
                let (cx, cy) = pixel_to_complex(x, y, width, height);
                let iter = escape_iterations(cx, cy, max_iterations);
                px.copy_from_slice(&pixel_color(iter, max_iterations).to_bytes());
            }
            out.write_all(&self.row)?;
        }
        out.flush()?;
        Ok(self.total_len)
    }
}

/// Stream a complete PPM image into `out`. Returns the number of bytes written.
///
/// Dimensions whose buffers cannot be sized or allocated fail with
/// [`io::ErrorKind::OutOfMemory`] before anything is written.
pub fn render_to_writer<W: Write>(
    out: &mut W,
    width: usize,
    height: usize,
    max_iterations: u32,
) -> io::Result<usize> {
    let mut raster = Raster::new(width, height, max_iterations)
        .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
    raster.write_to(out)
}

/// Remove a partially written image. A file that is already gone is fine.
fn discard_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial image");
        }
    }
}

/// Result of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub path: PathBuf,
    pub bytes_written: usize,
    pub elapsed_secs: f64,
}

/// Render to the file at `path`, timing the whole open-compute-write cycle.
///
/// Buffers are sized before the file is created, so an allocation failure
/// leaves no file behind. A write failure removes the partial file. The file
/// handle is closed on every path.
pub fn render<C: TimeSource>(
    path: &Path,
    width: usize,
    height: usize,
    max_iterations: u32,
    clock: &C,
) -> Result<RenderReport, BenchError> {
    let t0 = clock.now();
    let mut raster = Raster::new(width, height, max_iterations)?;
    let file = File::create(path).map_err(|source| BenchError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let written = raster.write_to(&mut out);
    drop(out);
    let bytes_written = written.map_err(|source| {
        discard_partial(path);
        BenchError::ImageWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let elapsed_secs = clock.elapsed_since(t0);

    tracing::debug!(path = %path.display(), bytes_written, elapsed_secs, "mandelbrot rendered");

    Ok(RenderReport {
        path: path.to_path_buf(),
        bytes_written,
        elapsed_secs,
    })
}
