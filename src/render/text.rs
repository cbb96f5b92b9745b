use crate::Result;
use crate::render::Renderer;
use crate::types::{AnomalyCounts, PixelGrid};
use std::io::Write;

const SHADES: &[u8] = b" .:-=+*#%@";

/// Character heat map of each window, scaled to the window's maximum count.
pub struct TextRenderer<W: Write> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn shade(count: u64, max: u64) -> char {
    if max == 0 {
        return SHADES[0] as char;
    }
    let level = (count as f64 * (SHADES.len() - 1) as f64 / max as f64).round() as usize;
    SHADES[level.min(SHADES.len() - 1)] as char
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, pixels: &PixelGrid, anomalies: &AnomalyCounts) -> Result<()> {
        let max = pixels.max();
        for row in pixels.counts().rows() {
            let line: String = row.iter().map(|&count| shade(count, max)).collect();
            writeln!(self.writer, "|{}|", line)?;
        }
        writeln!(
            self.writer,
            "max {} zero {} one {} multi {}",
            max, anomalies.zero, anomalies.one, anomalies.multi
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
