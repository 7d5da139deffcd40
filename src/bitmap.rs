// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Atlas bitmap

use crate::alloc::{Allocator, Buffer};
use crate::conv::to_usize;
use crate::Result;
use std::sync::Arc;

/// Reverse the row order of a bitmap in place
///
/// Row `r` is swapped with row `height - 1 - r`; with an odd height the middle
/// row is untouched. `scratch` must hold at least `width` bytes.
pub fn flip_rows(data: &mut [u8], width: usize, height: usize, scratch: &mut [u8]) {
    debug_assert!(data.len() >= width * height);
    let tmp = &mut scratch[..width];
    for r in 0..height / 2 {
        let (top, bottom) = (r * width, (height - 1 - r) * width);
        tmp.copy_from_slice(&data[top..top + width]);
        data.copy_within(bottom..bottom + width, top);
        data[bottom..bottom + width].copy_from_slice(tmp);
    }
}

/// A single-channel bitmap holding glyphs side by side
///
/// Row major, one byte of coverage per pixel, `width * height` bytes.
#[derive(Debug)]
pub struct AtlasBitmap {
    width: u32,
    height: u32,
    data: Buffer<u8>,
}

impl AtlasBitmap {
    /// Allocate a zero-filled bitmap
    pub fn new(allocator: &Arc<dyn Allocator>, width: u32, height: u32) -> Result<Self> {
        let len = to_usize(width) * to_usize(height);
        let data = Buffer::new(allocator, len)?;
        Ok(AtlasBitmap {
            width,
            height,
            data,
        })
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy a `w × h` source bitmap to horizontal offset `x`
    ///
    /// Rows are copied independently. Anything falling outside the bitmap is
    /// clipped.
    pub fn blit(&mut self, x: u32, src: &[u8], w: u32, h: u32) {
        let (x, w, h) = (to_usize(x), to_usize(w), to_usize(h));
        let width = to_usize(self.width);
        let rows = h.min(to_usize(self.height));
        let cols = w.min(width.saturating_sub(x));
        if cols == 0 {
            return;
        }
        for row in 0..rows {
            let Some(src_row) = src.get(row * w..row * w + cols) else {
                break;
            };
            let dst = row * width + x;
            self.data[dst..dst + cols].copy_from_slice(src_row);
        }
    }

    /// Read back the `w × h` region at horizontal offset `x`
    ///
    /// Returns `None` if the region is not within the bitmap.
    pub fn region(&self, x: u32, w: u32, h: u32) -> Option<Vec<u8>> {
        if x.checked_add(w)? > self.width || h > self.height {
            return None;
        }
        let (x, w, width) = (to_usize(x), to_usize(w), to_usize(self.width));
        let mut out = Vec::with_capacity(w * to_usize(h));
        for row in 0..to_usize(h) {
            let start = row * width + x;
            out.extend_from_slice(&self.data[start..start + w]);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::heap;

    #[test]
    fn flip_even_and_odd() {
        let mut scratch = [0u8; 2];
        let mut even = [1, 2, 3, 4, 5, 6, 7, 8];
        flip_rows(&mut even, 2, 4, &mut scratch);
        assert_eq!(even, [7, 8, 5, 6, 3, 4, 1, 2]);

        let mut odd = [1, 2, 3, 4, 5, 6];
        flip_rows(&mut odd, 2, 3, &mut scratch);
        assert_eq!(odd, [5, 6, 3, 4, 1, 2]);
    }

    #[test]
    fn flip_twice_is_identity() {
        let original: Vec<u8> = (0..35).collect();
        let mut data = original.clone();
        let mut scratch = vec![0u8; 7];
        flip_rows(&mut data, 7, 5, &mut scratch);
        assert_ne!(data, original);
        flip_rows(&mut data, 7, 5, &mut scratch);
        assert_eq!(data, original);
    }

    #[test]
    fn flip_empty() {
        let mut data: [u8; 0] = [];
        flip_rows(&mut data, 0, 5, &mut []);
        flip_rows(&mut data, 5, 0, &mut [0; 5]);
    }

    #[test]
    fn blit_and_region() {
        let mut bmp = AtlasBitmap::new(&heap(), 7, 3).unwrap();
        assert!(bmp.data().iter().all(|b| *b == 0));

        bmp.blit(0, &[1, 2, 3, 4], 2, 2);
        bmp.blit(3, &[9, 8, 7, 6, 5, 4, 3, 2, 1], 3, 3);
        assert_eq!(
            bmp.data(),
            [1, 2, 0, 9, 8, 7, 0, 3, 4, 0, 6, 5, 4, 0, 0, 0, 0, 3, 2, 1, 0]
        );
        assert_eq!(bmp.region(0, 2, 2).unwrap(), [1, 2, 3, 4]);
        assert_eq!(bmp.region(3, 3, 3).unwrap(), [9, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(bmp.region(6, 2, 1), None);
        assert_eq!(bmp.region(0, 1, 4), None);
    }

    #[test]
    fn blit_is_clipped() {
        let mut bmp = AtlasBitmap::new(&heap(), 4, 2).unwrap();
        // too wide, too tall and a short source buffer
        bmp.blit(2, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 3);
        assert_eq!(bmp.data(), [0, 0, 1, 2, 0, 0, 4, 5]);
        bmp.blit(0, &[7], 2, 2);
        assert_eq!(bmp.data(), [0, 0, 1, 2, 0, 0, 4, 5]);
        bmp.blit(9, &[1], 1, 1);
    }
}
