//! Module matrix construction: function patterns and codeword placement.

use crate::mask;
use crate::version::Version;

/// A square grid of modules under construction, with a parallel grid
/// recording which modules belong to function patterns.
///
/// Function modules are written once by [`ModuleMatrix::new`]; data bits
/// only ever go into the remaining cells.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMatrix {
    version: Version,
    size: usize,
    modules: Vec<bool>,
    isfunction: Vec<bool>,
}

impl ModuleMatrix {
    /// Creates the matrix for `version` with every function pattern drawn:
    /// finders with separators, timing, alignment, the dark module, the
    /// version information (version 7 and up), and light placeholders for
    /// both format information copies.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut result = Self {
            version,
            size,
            modules: vec![false; size * size],
            isfunction: vec![false; size * size],
        };
        result.draw_finder_pattern(3, 3);
        result.draw_finder_pattern(size - 4, 3);
        result.draw_finder_pattern(3, size - 4);
        for i in 8..size - 8 {
            result.set_function_module(6, i, i % 2 == 0);
            result.set_function_module(i, 6, i % 2 == 0);
        }

        let alignpatpos = version.alignment_pattern_positions();
        let numalign = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                // Skip the three corners occupied by finder patterns
                let corner = (i == 0 && j == 0)
                    || (i == 0 && j == numalign - 1)
                    || (i == numalign - 1 && j == 0);
                if corner {
                    continue;
                }
                result.draw_alignment_pattern(pos0, pos1);
            }
        }

        result.set_function_module(8, size - 8, true);
        for (x, y) in result.format_positions() {
            result.set_function_module(x, y, false);
        }
        if version.value() >= 7 {
            result.draw_version_bits(mask::version_info_bits(version));
        }
        result
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Color of the module at (x, y), `true` for dark.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.isfunction[y * self.size + x]
    }

    /// Number of dark modules in the whole grid.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Places the final codeword sequence into the data cells, most
    /// significant bit first, following the two-column zig-zag from the
    /// bottom-right corner. Remainder cells past the last codeword stay light.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not the version's raw codeword count, or if the
    /// data cells do not number exactly the version's raw data modules.
    pub fn draw_codewords(&mut self, data: &[u8]) {
        assert_eq!(data.len(), self.version.num_raw_codewords(), "Illegal argument");
        let positions = self.data_positions();
        assert_eq!(
            positions.len(),
            self.version.num_raw_data_modules(),
            "Data cell count does not match the version's raw data modules"
        );
        for (i, &(x, y)) in positions.iter().take(data.len() * 8).enumerate() {
            let bit = (data[i >> 3] >> (7 - (i & 7))) & 1 != 0;
            self.modules[y * self.size + x] = bit;
        }
    }

    /// Coordinates of every data cell in placement order.
    pub fn data_positions(&self) -> Vec<(usize, usize)> {
        let size = self.size;
        let mut result = Vec::with_capacity(self.version.num_raw_data_modules());
        let mut right: usize = size - 1;
        while right >= 1 {
            // Skip the vertical timing column
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let x = right - j;
                    if !self.is_function(x, y) {
                        result.push((x, y));
                    }
                }
            }
            if right < 2 {
                break;
            }
            right -= 2;
        }
        result
    }

    /// Inverts the data module at (x, y).
    pub(crate) fn flip(&mut self, x: usize, y: usize) {
        let index = y * self.size + x;
        debug_assert!(!self.isfunction[index]);
        self.modules[index] ^= true;
    }

    /// Writes a 15-bit format information word into both reserved copies.
    /// Bit 0 is the least significant.
    pub fn draw_format_bits(&mut self, bits: u32) {
        let positions = self.format_positions();
        let (first, second) = positions.split_at(15);
        for (i, (&(x0, y0), &(x1, y1))) in first.iter().zip(second).enumerate() {
            let bit = get_bit(bits, i);
            self.set_info_module(x0, y0, bit);
            self.set_info_module(x1, y1, bit);
        }
    }

    /// Format information cells: the 15 of the copy around the top-left
    /// finder, then the 15 of the split copy, each ordered by bit index.
    fn format_positions(&self) -> Vec<(usize, usize)> {
        let size = self.size;
        let mut result = Vec::with_capacity(30);
        result.extend((0..6).map(|i| (8, i)));
        result.push((8, 7));
        result.push((8, 8));
        result.push((7, 8));
        result.extend((9..15).map(|i| (14 - i, 8)));
        result.extend((0..8).map(|i| (size - 1 - i, 8)));
        result.extend((8..15).map(|i| (8, size - 15 + i)));
        result
    }

    fn draw_version_bits(&mut self, bits: u32) {
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + (i % 3);
            let b = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Draws a 9×9 finder pattern including the separator, centred at
    /// (x, y). Cells off the grid are skipped.
    fn draw_finder_pattern(&mut self, x: usize, y: usize) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist = dx.abs().max(dy.abs());
                let xx = x as i32 + dx;
                let yy = y as i32 + dy;
                if (0..self.size as i32).contains(&xx) && (0..self.size as i32).contains(&yy) {
                    self.set_function_module(xx as usize, yy as usize, dist != 2 && dist != 4);
                }
            }
        }
    }

    /// Draws a 5×5 alignment pattern centred at (x, y).
    fn draw_alignment_pattern(&mut self, x: usize, y: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let xx = (x as i32 + dx) as usize;
                let yy = (y as i32 + dy) as usize;
                self.set_function_module(xx, yy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Marks a cell as function and colors it. A cell already claimed by
    /// another pattern must already have the same color.
    fn set_function_module(&mut self, x: usize, y: usize, isdark: bool) {
        let index = y * self.size + x;
        debug_assert!(
            !self.isfunction[index] || self.modules[index] == isdark,
            "Conflicting function module at ({}, {})",
            x,
            y
        );
        self.modules[index] = isdark;
        self.isfunction[index] = true;
    }

    /// Overwrites a reserved information cell.
    fn set_info_module(&mut self, x: usize, y: usize, isdark: bool) {
        let index = y * self.size + x;
        debug_assert!(self.isfunction[index]);
        self.modules[index] = isdark;
    }

    /// Builds a matrix from rows of `#` (dark) and `.` (light) with no
    /// function modules.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let version = Version::new(((size - 17) / 4) as u8);
        assert_eq!(version.size(), size);
        let modules: Vec<bool> = rows.iter().flat_map(|r| r.chars().map(|c| c == '#')).collect();
        assert_eq!(modules.len(), size * size);
        Self {
            version,
            size,
            modules,
            isfunction: vec![false; size * size],
        }
    }

    /// Consumes the matrix, returning the module colors in row-major order.
    pub fn into_modules(self) -> Vec<bool> {
        self.modules
    }
}

/// Reads the codeword sequence back out of the data cells of an unmasked
/// matrix.
#[cfg(test)]
pub(crate) fn read_codewords(matrix: &ModuleMatrix) -> Vec<u8> {
    let count = matrix.version().num_raw_codewords();
    let mut result = vec![0u8; count];
    for (i, &(x, y)) in matrix.data_positions().iter().take(count * 8).enumerate() {
        if matrix.get(x, y) {
            result[i >> 3] |= 1 << (7 - (i & 7));
        }
    }
    result
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINDER: [&str; 7] = [
        "#######",
        "#.....#",
        "#.###.#",
        "#.###.#",
        "#.###.#",
        "#.....#",
        "#######",
    ];

    fn assert_finder_at(m: &ModuleMatrix, left: usize, top: usize) {
        for (dy, row) in FINDER.iter().enumerate() {
            for (dx, c) in row.chars().enumerate() {
                let (x, y) = (left + dx, top + dy);
                assert_eq!(m.get(x, y), c == '#', "({}, {})", x, y);
                assert!(m.is_function(x, y));
            }
        }
    }

    #[test]
    fn test_finders_and_separators() {
        let m = ModuleMatrix::new(Version::new(3));
        let size = m.size();
        assert_finder_at(&m, 0, 0);
        assert_finder_at(&m, size - 7, 0);
        assert_finder_at(&m, 0, size - 7);
        for i in 0..8 {
            assert!(!m.get(7, i) && m.is_function(7, i));
            assert!(!m.get(i, 7) && m.is_function(i, 7));
            assert!(!m.get(size - 8, i) && m.is_function(size - 8, i));
        }
    }

    #[test]
    fn test_timing_and_dark_module() {
        let m = ModuleMatrix::new(Version::new(2));
        let size = m.size();
        for i in 8..size - 8 {
            assert_eq!(m.get(i, 6), i % 2 == 0);
            assert_eq!(m.get(6, i), i % 2 == 0);
        }
        assert!(m.get(8, size - 8));
        assert!(m.is_function(8, size - 8));
    }

    #[test]
    fn test_alignment_pattern_version_2() {
        let m = ModuleMatrix::new(Version::new(2));
        // Single pattern centred at (18, 18)
        assert!(m.get(18, 18));
        assert!(!m.get(17, 18) && !m.get(19, 19));
        assert!(m.get(16, 16) && m.get(20, 20));
        assert!(m.is_function(16, 20));
        assert!(!m.is_function(15, 18));
    }

    #[test]
    fn test_function_cells_leave_raw_data_modules() {
        for ver in Version::MIN.up_to(Version::MAX) {
            let m = ModuleMatrix::new(ver);
            assert_eq!(
                m.data_positions().len(),
                ver.num_raw_data_modules(),
                "version {}",
                ver.value()
            );
        }
    }

    #[test]
    fn test_data_positions_start_bottom_right() {
        let m = ModuleMatrix::new(Version::MIN);
        let pos = m.data_positions();
        assert_eq!(&pos[..4], &[(20, 20), (19, 20), (20, 19), (19, 19)]);
        // Never touches the vertical timing column
        assert!(pos.iter().all(|&(x, _)| x != 6));
    }

    #[test]
    fn test_version_info_block() {
        let m = ModuleMatrix::new(Version::new(7));
        let size = m.size();
        // 0x07C94 = 00 0111 1100 1001 0100, bit i at (size - 11 + i % 3, i / 3)
        let bits = 0x07C94u32;
        for i in 0..18 {
            let expected = (bits >> i) & 1 != 0;
            assert_eq!(m.get(size - 11 + i % 3, i / 3), expected);
            assert_eq!(m.get(i / 3, size - 11 + i % 3), expected);
        }
        let small = ModuleMatrix::new(Version::new(6));
        assert!(!small.is_function(small.size() - 11, 0));
    }

    #[test]
    fn test_codewords_read_back() {
        let ver = Version::new(8);
        let mut m = ModuleMatrix::new(ver);
        let data: Vec<u8> = (0..ver.num_raw_codewords()).map(|i| (i * 31 + 7) as u8).collect();
        m.draw_codewords(&data);
        assert_eq!(read_codewords(&m), data);
    }

    #[test]
    fn test_format_bits_written_twice() {
        let mut m = ModuleMatrix::new(Version::MIN);
        m.draw_format_bits(0b101_0101_0101_0101);
        let size = m.size();
        assert!(m.get(8, 0));
        assert!(!m.get(8, 1));
        assert!(m.get(size - 1, 8));
        assert!(m.get(8, size - 1));
        assert!(m.get(0, 8));
        assert!(m.get(8, size - 8));
    }
}
