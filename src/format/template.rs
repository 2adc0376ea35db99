/// Empty card template and sector generation
///
/// A freshly formatted PS1 card starts with a header frame ("MC") followed by
/// fifteen free directory frames. Every frame ends with an XOR checksum of
/// its first 127 bytes. Everything after the directory is left erased (0xFF).

use super::constants::*;

/// Directory frame state byte for an unused block
const DIR_FREE: u8 = 0xA0;

/// Offset of the next-block link within a directory frame
const DIR_NEXT_LINK_OFFSET: usize = 8;

const fn build_template() -> [u8; TEMPLATE_SIZE] {
    let mut data = [0u8; TEMPLATE_SIZE];
    data[0] = b'M';
    data[1] = b'C';

    let mut frame = 1;
    while frame < TEMPLATE_SECTORS {
        let base = frame * SECTOR_SIZE;
        data[base] = DIR_FREE;
        data[base + DIR_NEXT_LINK_OFFSET] = 0xFF;
        data[base + DIR_NEXT_LINK_OFFSET + 1] = 0xFF;
        frame += 1;
    }

    let mut frame = 0;
    while frame < TEMPLATE_SECTORS {
        let base = frame * SECTOR_SIZE;
        let mut checksum = 0u8;
        let mut i = 0;
        while i < SECTOR_SIZE - 1 {
            checksum ^= data[base + i];
            i += 1;
        }
        data[base + SECTOR_SIZE - 1] = checksum;
        frame += 1;
    }

    data
}

/// Header and directory frames of an empty card
pub static EMPTY_CARD_TEMPLATE: [u8; TEMPLATE_SIZE] = build_template();

/// Fill `buf` with the initial contents of `sector` for a new card
pub fn gen_sector(sector: usize, buf: &mut [u8; SECTOR_SIZE]) {
    buf.fill(FILLER_BYTE);

    if sector < TEMPLATE_SECTORS {
        let start = sector * SECTOR_SIZE;
        buf.copy_from_slice(&EMPTY_CARD_TEMPLATE[start..start + SECTOR_SIZE]);
    }
}

/// Template bytes for a sector, if it lies within the template
pub fn template_sector(sector: usize) -> Option<&'static [u8]> {
    if sector < TEMPLATE_SECTORS {
        let start = sector * SECTOR_SIZE;
        Some(&EMPTY_CARD_TEMPLATE[start..start + SECTOR_SIZE])
    } else {
        None
    }
}
