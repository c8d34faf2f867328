//! Surface module - raster pixel grids
//!
//! A [`Surface`] is a row-major grid of [`Rgb`] pixels. Entities own one as
//! their sprite; the display composes them into a larger one each frame.
//! All writes are clipped to the surface bounds.

use crate::types::Rgb;

/// Something entity sprites can be drawn onto.
pub trait Canvas {
    /// Fill the whole canvas with one colour.
    fn clear(&mut self, colour: Rgb);

    /// Copy `surface` with its top-left corner at `(x, y)`, clipping at the edges.
    fn blit(&mut self, surface: &Surface, x: i32, y: i32);
}

/// A 2D grid of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Surface {
    /// Create a surface filled with `colour`
    pub fn new(width: u32, height: u32, colour: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![colour; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = colour;
        }
    }

    pub fn fill(&mut self, colour: Rgb) {
        self.pixels.fill(colour);
    }

    /// Fill the `w`x`h` rectangle at `(x, y)`.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, colour: Rgb) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }
        for py in y..y_end {
            let row = (py as usize) * (self.width as usize);
            self.pixels[row + x as usize..row + x_end as usize].fill(colour);
        }
    }

    /// Borrow a rectangular sub-view.
    ///
    /// Returns `None` unless the rectangle lies entirely inside the surface.
    pub fn region(&self, x: u32, y: u32, w: u32, h: u32) -> Option<Region<'_>> {
        let fits_x = x.checked_add(w).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(h).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return None;
        }
        Some(Region {
            surface: self,
            x,
            y,
            w,
            h,
        })
    }

    /// Number of pixels with exactly this colour.
    pub fn count(&self, colour: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p == colour).count()
    }

    /// Nearest-neighbour rescale to `width`x`height`.
    pub fn scaled(&self, width: u32, height: u32) -> Surface {
        let mut out = Surface::new(width, height, Rgb::default());
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = ((y as u64 * self.height as u64) / height as u64) as u32;
            for x in 0..width {
                let sx = ((x as u64 * self.width as u64) / width as u64) as u32;
                if let Some(p) = self.get_pixel(sx, sy) {
                    out.set_pixel(x, y, p);
                }
            }
        }
        out
    }

    /// Replace every pixel that is not `keep` with `colour`.
    pub fn recolour_except(&mut self, keep: Rgb, colour: Rgb) {
        for p in self.pixels.iter_mut().filter(|p| **p != keep) {
            *p = colour;
        }
    }

    /// Resize in place, discarding content and filling with `colour`.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn reset(&mut self, width: u32, height: u32, colour: Rgb) {
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.pixels.clear();
        self.pixels.resize(len, colour);
    }
}

impl Canvas for Surface {
    fn clear(&mut self, colour: Rgb) {
        self.fill(colour);
    }

    fn blit(&mut self, surface: &Surface, x: i32, y: i32) {
        // Clip the source rectangle against the destination bounds.
        let src_x0 = (-(x as i64)).max(0) as u32;
        let src_y0 = (-(y as i64)).max(0) as u32;
        let dst_x0 = (x as i64).max(0);
        let dst_y0 = (y as i64).max(0);
        if dst_x0 >= self.width as i64 || dst_y0 >= self.height as i64 {
            return;
        }
        let copy_w = (surface.width as i64 - src_x0 as i64).min(self.width as i64 - dst_x0);
        let copy_h = (surface.height as i64 - src_y0 as i64).min(self.height as i64 - dst_y0);
        if copy_w <= 0 || copy_h <= 0 {
            return;
        }

        for row in 0..copy_h as usize {
            let src_start =
                (src_y0 as usize + row) * surface.width as usize + src_x0 as usize;
            let dst_start = (dst_y0 as usize + row) * self.width as usize + dst_x0 as usize;
            self.pixels[dst_start..dst_start + copy_w as usize]
                .copy_from_slice(&surface.pixels[src_start..src_start + copy_w as usize]);
        }
    }
}

/// Read-only rectangular view into a [`Surface`].
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    surface: &'a Surface,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Region<'_> {
    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        (self.y..self.y + self.h).flat_map(move |py| {
            (self.x..self.x + self.w).filter_map(move |px| self.surface.get_pixel(px, py))
        })
    }

    /// True if any pixel in the view has this colour.
    pub fn contains(&self, colour: Rgb) -> bool {
        self.pixels().any(|p| p == colour)
    }
}
