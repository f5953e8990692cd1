//! Bitstream assembly, block splitting, error correction and interleaving.

use crate::bits::BitBuffer;
use crate::capacity::Plan;
use crate::reed_solomon::ReedSolomonGenerator;
use crate::segment::QrSegment;
use crate::version::{QrCodeEcc, Version};

const PAD_BYTES: [u32; 2] = [0xEC, 0x11];

/// One error correction block: its share of the data codewords and the
/// correction codewords computed over them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CodewordBlock {
    pub data: Vec<u8>,
    pub ecc: Vec<u8>,
}

/// Concatenates the segments into the data codeword sequence for the
/// planned version and level: mode indicators, count fields and payloads,
/// then a terminator of up to four zero bits, zero bits to the next byte
/// boundary, and alternating 0xEC/0x11 bytes up to capacity.
pub fn encode_data_codewords(segs: &[QrSegment], plan: &Plan) -> Vec<u8> {
    let version = plan.version;
    let datacapacitybits: usize = plan.capacity_bits();
    let mut bb = BitBuffer::with_capacity(datacapacitybits);
    for seg in segs {
        bb.append_bits(seg.mode().mode_bits(), 4);
        bb.append_bits(
            seg.num_chars() as u32,
            seg.mode().num_char_count_bits(version),
        );
        bb.append_buffer(seg.data());
    }
    debug_assert_eq!(bb.len(), plan.data_used_bits);

    let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    bb.pad_to_byte();
    debug_assert_eq!(bb.len() % 8, 0);

    for &padbyte in PAD_BYTES.iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }
    bb.into_padded_bytes()
}

/// Splits the data codewords into the version's blocks and computes each
/// block's correction codewords.
///
/// Short blocks come first; long blocks carry one extra data codeword.
///
/// # Panics
///
/// Panics if `data` is not exactly the data codeword count of `ver` at `ecl`.
pub fn split_into_blocks(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<CodewordBlock> {
    assert_eq!(data.len(), ver.num_data_codewords(ecl), "Illegal argument");
    let numblocks: usize = ver.num_blocks(ecl);
    let blockecclen: usize = ver.ecc_codewords_per_block(ecl);
    let rawcodewords: usize = ver.num_raw_codewords();
    let numshortblocks: usize = numblocks - rawcodewords % numblocks;
    let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

    let rs = ReedSolomonGenerator::new(blockecclen);
    let mut blocks = Vec::with_capacity(numblocks);
    let mut rest: &[u8] = data;
    for i in 0..numblocks {
        let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
        let (dat, tail) = rest.split_at(datlen);
        blocks.push(CodewordBlock {
            data: dat.to_vec(),
            ecc: rs.compute_remainder(dat),
        });
        rest = tail;
    }
    debug_assert!(rest.is_empty());
    blocks
}

/// Emits the data codewords of all blocks column by column, then the
/// correction codewords the same way.
pub fn interleave(blocks: &[CodewordBlock]) -> Vec<u8> {
    let total: usize = blocks.iter().map(|b| b.data.len() + b.ecc.len()).sum();
    let mut result = Vec::with_capacity(total);
    let maxdata = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    for i in 0..maxdata {
        result.extend(blocks.iter().filter_map(|b| b.data.get(i)));
    }
    let maxecc = blocks.iter().map(|b| b.ecc.len()).max().unwrap_or(0);
    for i in 0..maxecc {
        result.extend(blocks.iter().filter_map(|b| b.ecc.get(i)));
    }
    result
}

/// Returns the final codeword sequence for placement: data codewords split
/// into blocks, correction codewords appended, everything interleaved.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
    let result = interleave(&split_into_blocks(data, ver, ecl));
    assert_eq!(result.len(), ver.num_raw_codewords());
    result
}

/// Inverse of [`interleave`] for the block layout of `ver` at `ecl`.
#[cfg(test)]
pub(crate) fn deinterleave(codewords: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<CodewordBlock> {
    let numblocks = ver.num_blocks(ecl);
    let blockecclen = ver.ecc_codewords_per_block(ecl);
    let rawcodewords = ver.num_raw_codewords();
    let numshortblocks = numblocks - rawcodewords % numblocks;
    let shortblockdatalen = rawcodewords / numblocks - blockecclen;
    let mut blocks: Vec<CodewordBlock> = (0..numblocks)
        .map(|_| CodewordBlock {
            data: Vec::with_capacity(shortblockdatalen + 1),
            ecc: Vec::with_capacity(blockecclen),
        })
        .collect();
    let mut iter = codewords.iter().copied();
    for i in 0..=shortblockdatalen {
        for (j, block) in blocks.iter_mut().enumerate() {
            if i < shortblockdatalen || j >= numshortblocks {
                block.data.extend(iter.next());
            }
        }
    }
    for _ in 0..blockecclen {
        for block in blocks.iter_mut() {
            block.ecc.extend(iter.next());
        }
    }
    blocks
}
