//! Data masking, penalty scoring and the BCH-coded information fields.

use tracing::trace;

use crate::matrix::ModuleMatrix;
use crate::version::{QrCodeEcc, Version};

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// All eight patterns in ascending order.
    pub const ALL: [Mask; 8] = [
        Mask(0),
        Mask(1),
        Mask(2),
        Mask(3),
        Mask(4),
        Mask(5),
        Mask(6),
        Mask(7),
    ];

    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the mask for `mask`, or `None` outside [0, 7].
    pub const fn checked(mask: u8) -> Option<Self> {
        if mask <= 7 {
            Some(Self(mask))
        } else {
            None
        }
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this pattern flips the data module in column `x`, row `y`.
    pub fn inverts(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

/// XORs the mask pattern into every data module. Applying the same mask
/// twice restores the original.
pub fn apply_mask(matrix: &mut ModuleMatrix, mask: Mask) {
    let size = matrix.size();
    for y in 0..size {
        for x in 0..size {
            if !matrix.is_function(x, y) && mask.inverts(x, y) {
                matrix.flip(x, y);
            }
        }
    }
}

/// The 15-bit format information word: 2 bits of level, 3 bits of mask,
/// a BCH(15,5) remainder, XORed with 0x5412.
pub fn format_info_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// The 18-bit version information word: 6 bits of version followed by a
/// BCH(18,6) remainder.
pub fn version_info_bits(version: Version) -> u32 {
    let ver = u32::from(version.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    (ver << 12) | rem
}

/// Applies `forced`, or else the mask with the lowest penalty score (the
/// smallest id on ties), and writes the matching format information.
/// Returns the mask applied.
pub fn choose_and_apply(matrix: &mut ModuleMatrix, ecl: QrCodeEcc, forced: Option<Mask>) -> Mask {
    let chosen = forced.unwrap_or_else(|| {
        let mut best = Mask(0);
        let mut minpenalty = i32::MAX;
        for msk in Mask::ALL {
            apply_mask(matrix, msk);
            matrix.draw_format_bits(format_info_bits(ecl, msk));
            let penalty = penalty_score(matrix);
            trace!(mask = msk.value(), penalty, "scored mask candidate");
            if penalty < minpenalty {
                best = msk;
                minpenalty = penalty;
            }
            apply_mask(matrix, msk); // Undoes the mask due to XOR
        }
        best
    });
    apply_mask(matrix, chosen);
    matrix.draw_format_bits(format_info_bits(ecl, chosen));
    chosen
}

/// Penalty score of the matrix as it stands: long same-color runs, 2×2
/// blocks, finder-like 1:1:3:1:1 sequences, and dark/light imbalance.
pub fn penalty_score(matrix: &ModuleMatrix) -> i32 {
    let (runs, finders) = line_penalties(matrix);
    runs + block_penalty(matrix) + finders + balance_penalty(matrix)
}

/// Run and finder-like penalties over every row and column, as `(N1, N3)`
/// totals.
fn line_penalties(matrix: &ModuleMatrix) -> (i32, i32) {
    let size = matrix.size();
    let mut runs: i32 = 0;
    let mut finders: i32 = 0;

    // Rows then columns
    for vertical in [false, true] {
        for a in 0..size {
            let module = |b: usize| {
                if vertical {
                    matrix.get(a, b)
                } else {
                    matrix.get(b, a)
                }
            };
            let mut runcolor = false;
            let mut runlen: i32 = 0;
            let mut runhistory = FinderPenalty::new(size);
            for b in 0..size {
                if module(b) == runcolor {
                    runlen += 1;
                    if runlen == 5 {
                        runs += PENALTY_N1;
                    } else if runlen > 5 {
                        runs += 1;
                    }
                } else {
                    runhistory.add_history(runlen);
                    if !runcolor {
                        finders += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = module(b);
                    runlen = 1;
                }
            }
            finders += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
        }
    }
    (runs, finders)
}

/// N2 for every 2×2 block of one color, overlaps included.
fn block_penalty(matrix: &ModuleMatrix) -> i32 {
    let size = matrix.size();
    let mut result: i32 = 0;
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color: bool = matrix.get(x, y);
            if color == matrix.get(x + 1, y)
                && color == matrix.get(x, y + 1)
                && color == matrix.get(x + 1, y + 1)
            {
                result += PENALTY_N2;
            }
        }
    }
    result
}

fn balance_penalty(matrix: &ModuleMatrix) -> i32 {
    let size = matrix.size();
    // Smallest k such that (45-5k)% <= dark <= (55+5k)%
    let dark = matrix.dark_count() as i32;
    let total = (size * size) as i32;
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    k * PENALTY_N4
}

/// Run-length history of one row or column, newest first, for spotting
/// finder-like patterns. Light borders are treated as part of the first
/// and last runs.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            qr_size: size as i32,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Counts 1:1:3:1:1 dark-run patterns with a 4-wide light run on
    /// either side; both sides may count.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_info_known_values() {
        assert_eq!(format_info_bits(QrCodeEcc::Low, Mask::new(0)), 0b111011111000100);
        assert_eq!(format_info_bits(QrCodeEcc::Medium, Mask::new(0)), 0b101010000010010);
        assert_eq!(format_info_bits(QrCodeEcc::Quartile, Mask::new(0)), 0b011010101011111);
        assert_eq!(format_info_bits(QrCodeEcc::High, Mask::new(0)), 0b001011010001001);
        assert_eq!(format_info_bits(QrCodeEcc::Low, Mask::new(4)), 0b110011000101111);
    }

    #[test]
    fn test_version_info_known_values() {
        assert_eq!(version_info_bits(Version::new(7)), 0x07C94);
        assert_eq!(version_info_bits(Version::new(21)), 0x15683);
        assert_eq!(version_info_bits(Version::MAX), 0x28C69);
    }

    #[test]
    fn test_mask_predicates_at_origin() {
        // Every pattern flips (0, 0)
        for msk in Mask::ALL {
            assert!(msk.inverts(0, 0), "mask {}", msk.value());
        }
        assert!(!Mask::new(0).inverts(1, 0));
        assert!(Mask::new(1).inverts(1, 0));
        assert!(!Mask::new(2).inverts(1, 0));
        assert!(Mask::new(4).inverts(2, 1));
        assert!(!Mask::new(4).inverts(3, 0));
    }

    #[test]
    fn test_checked() {
        assert_eq!(Mask::checked(8), None);
        assert_eq!(Mask::checked(3), Some(Mask::new(3)));
    }

    #[test]
    fn test_apply_mask_twice_is_identity() {
        let mut m = ModuleMatrix::new(Version::new(3));
        let before = m.clone();
        apply_mask(&mut m, Mask::new(5));
        assert_ne!(m, before);
        apply_mask(&mut m, Mask::new(5));
        assert_eq!(m, before);
    }

    #[test]
    fn test_apply_mask_leaves_function_modules() {
        let mut m = ModuleMatrix::new(Version::new(2));
        let before = m.clone();
        apply_mask(&mut m, Mask::new(0));
        let size = m.size();
        for y in 0..size {
            for x in 0..size {
                if m.is_function(x, y) {
                    assert_eq!(m.get(x, y), before.get(x, y));
                } else {
                    assert_eq!(m.get(x, y), (x + y) % 2 == 0);
                }
            }
        }
    }

    #[test]
    fn test_finder_pattern_counted_on_both_sides() {
        // Border, then dark 1, light 1, dark 3, light 1, dark 1, then light to the edge
        let mut fp = FinderPenalty::new(21);
        for len in [0, 1, 1, 3, 1, 1] {
            fp.add_history(len);
        }
        assert_eq!(fp.terminate_and_count(false, 4), 2);
    }

    #[test]
    fn test_finder_pattern_counted_on_one_side() {
        // Only 2 light modules precede the pattern
        let mut fp = FinderPenalty::new(21);
        for len in [0, 2, 2, 1, 1, 3, 1, 1] {
            fp.add_history(len);
        }
        assert_eq!(fp.terminate_and_count(false, 4), 1);
    }

    #[test]
    fn test_penalties_of_empty_version_1() {
        // Function patterns only, every data cell light
        let m = ModuleMatrix::new(Version::MIN);
        assert_eq!(m.dark_count(), 106);
        assert_eq!(line_penalties(&m), (566, 1440));
        assert_eq!(block_penalty(&m), 711);
        assert_eq!(balance_penalty(&m), 50);
        assert_eq!(penalty_score(&m), 566 + 711 + 1440 + 50);
    }

    #[test]
    fn test_penalties_of_all_light_grid() {
        let rows = vec![".".repeat(21); 21];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let m = ModuleMatrix::from_rows(&rows);
        // 42 lines of 21: 3 for the fifth module, 1 for each of the next 16
        assert_eq!(line_penalties(&m), (42 * 19, 0));
        // 20×20 overlapping blocks
        assert_eq!(block_penalty(&m), 400 * 3);
        // 0% dark sits in the 0-5% band, k = 9
        assert_eq!(balance_penalty(&m), 90);
    }

    #[test]
    fn test_checkerboard_scores_zero() {
        let rows: Vec<String> = (0..21)
            .map(|y| (0..21).map(|x| if (x + y) % 2 == 0 { '#' } else { '.' }).collect())
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let m = ModuleMatrix::from_rows(&rows);
        assert_eq!(m.dark_count(), 221);
        assert_eq!(line_penalties(&m), (0, 0));
        assert_eq!(block_penalty(&m), 0);
        assert_eq!(balance_penalty(&m), 0);
        assert_eq!(penalty_score(&m), 0);
    }

    #[test]
    fn test_finder_like_row_counted_twice() {
        let mut rows = vec!["....................."; 21];
        rows[10] = "....#.###.#..........";
        let m = ModuleMatrix::from_rows(&rows);
        let (_, finders) = line_penalties(&m);
        assert_eq!(finders, 2 * PENALTY_N3);
    }

    fn mask_scores(data: &[u8], ecl: QrCodeEcc) -> Vec<i32> {
        let mut m = ModuleMatrix::new(Version::MIN);
        m.draw_codewords(data);
        Mask::ALL
            .iter()
            .map(|&msk| {
                apply_mask(&mut m, msk);
                m.draw_format_bits(format_info_bits(ecl, msk));
                let score = penalty_score(&m);
                apply_mask(&mut m, msk);
                score
            })
            .collect()
    }

    fn chosen_mask(data: &[u8], ecl: QrCodeEcc) -> Mask {
        let mut m = ModuleMatrix::new(Version::MIN);
        m.draw_codewords(data);
        choose_and_apply(&mut m, ecl, None)
    }

    #[test]
    fn test_tied_masks_pick_smaller_id() {
        // Masks 2 and 4 tie for the lowest score
        let data: Vec<u8> = (0..26u8).map(|i| 10 + i * 3).collect();
        assert_eq!(
            mask_scores(&data, QrCodeEcc::Medium),
            vec![1231, 1176, 1076, 1105, 1076, 1193, 1170, 1159]
        );
        assert_eq!(chosen_mask(&data, QrCodeEcc::Medium), Mask::new(2));

        // Masks 2 and 3 tie
        let data: Vec<u8> = (0..26u8).map(|i| 14 + i * 7).collect();
        assert_eq!(
            mask_scores(&data, QrCodeEcc::Low),
            vec![1212, 1120, 1066, 1066, 1164, 1130, 1126, 1333]
        );
        assert_eq!(chosen_mask(&data, QrCodeEcc::Low), Mask::new(2));
    }

    #[test]
    fn test_forced_mask_is_written() {
        let mut m = ModuleMatrix::new(Version::MIN);
        let chosen = choose_and_apply(&mut m, QrCodeEcc::High, Some(Mask::new(6)));
        assert_eq!(chosen, Mask::new(6));
        let bits = format_info_bits(QrCodeEcc::High, Mask::new(6));
        for i in 0..6 {
            assert_eq!(m.get(8, i), (bits >> i) & 1 != 0);
        }
    }
}
