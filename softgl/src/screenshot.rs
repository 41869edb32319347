use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes numbered PPM dumps of the framebuffer: `<dir>/<prefix><id>.ppm`.
#[derive(Debug)]
pub struct Screenshotter {
    prefix: String,
    dir: PathBuf,
    next_id: u32,
}

impl Screenshotter {
    pub fn new(prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            dir: dir.into(),
            next_id: 0,
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn next_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}.ppm", self.prefix, self.next_id))
    }

    /// The id only advances when the file was written.
    pub fn capture(&mut self, fb: &Framebuffer) -> Result<PathBuf> {
        if fb.width() == 0 || fb.height() == 0 {
            return Err(Error::EmptyFramebuffer {
                width: fb.width(),
                height: fb.height(),
            });
        }
        let path = self.next_path();
        write_ppm_file(&path, fb.width(), fb.height(), &fb.read_pixels())?;
        self.next_id += 1;
        Ok(path)
    }
}

fn write_ppm_file(path: &Path, width: u32, height: u32, rgb: &[u8]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(&mut out, width, height, rgb)?;
    out.flush()
}

/// Plain (`P3`) PPM. `rgb` is bottom row first, the file is top row first.
pub fn write_ppm<W: Write>(out: &mut W, width: u32, height: u32, rgb: &[u8]) -> io::Result<()> {
    let (w, h) = (width as usize, height as usize);
    if rgb.len() < w * h * 3 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} bytes is short of a {}x{} RGB image",
                rgb.len(),
                width,
                height
            ),
        ));
    }
    writeln!(out, "P3\n{} {}\n255", width, height)?;
    for row in (0..h).rev() {
        for px in rgb[row * w * 3..(row + 1) * w * 3].chunks_exact(3) {
            write!(out, "{} {} {} ", px[0], px[1], px[2])?;
        }
        writeln!(out)?;
    }
    Ok(())
}
