#![no_main]

use bitstream::{BitBuffer, BitReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let buffer = BitBuffer::from_bytes(data);
    let mut reader = BitReader::new(&buffer);
    let mut idx = 0usize;

    // Input bytes drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 6;
        idx += 1;

        let before = reader.bit_position();
        let ok = match op {
            0 => reader.read_bool().is_ok(),
            1 => {
                let bits = usize::from(data[idx - 1] % 64) + 1;
                reader.read_bits(bits).is_ok()
            }
            2 => reader.read_u32().is_ok(),
            3 => reader.read_f32().is_ok(),
            4 => reader.read_string().is_ok(),
            _ => reader.read_i64().is_ok(),
        };
        if !ok {
            assert_eq!(reader.bit_position(), before);
        }
    }
});
