// File: crates/barline-core/src/path.rs
// Summary: SVG path-string builder. Non-finite coordinates are rejected at the boundary.

use std::fmt::Write as _;

#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    buf: String,
    segments: usize,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.command('M', &[x, y])
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.command('L', &[x, y])
    }

    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        self.command('C', &[c1x, c1y, c2x, c2y, x, y])
    }

    pub fn close(&mut self) -> &mut Self {
        if self.segments > 0 {
            self.buf.push('Z');
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments == 0
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn command(&mut self, cmd: char, coords: &[f64]) -> &mut Self {
        // A command with any NaN/Infinity would poison the whole path; drop it instead.
        if coords.iter().any(|c| !c.is_finite()) {
            return self;
        }
        self.buf.push(cmd);
        for (i, c) in coords.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            let _ = write!(self.buf, "{}", fmt_coord(*c));
        }
        self.segments += 1;
        self
    }
}

/// Up to 3 decimals, trailing zeros trimmed, no negative zero.
pub fn fmt_coord(v: f64) -> String {
    let mut s = format!("{v:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
