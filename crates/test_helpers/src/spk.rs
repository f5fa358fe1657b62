//! Minimal little-endian SPK (type 2) writer.

use std::io;
use std::path::Path;

const RECORD_BYTES: usize = 1024;
const WORDS_PER_RECORD: usize = 128;
const FTP_STRING: &[u8] = b"FTPSTR:\r:\n:\r\n:\r\x00:\x81:\x10\xce:ENDFTP";
/// Data starts in record 4, after the file, summary and name records.
const FIRST_DATA_ADDRESS: usize = 3 * WORDS_PER_RECORD + 1;

/// One type 2 segment: equal-length records of per-axis coefficients.
#[derive(Debug, Clone)]
pub struct ChebyshevSegment {
    pub target: i32,
    pub center: i32,
    pub frame: i32,
    pub init: f64,
    pub interval: f64,
    /// `records[i] = [x_coeffs, y_coeffs, z_coeffs]`, all the same length.
    pub records: Vec<[Vec<f64>; 3]>,
}

impl ChebyshevSegment {
    fn end(&self) -> f64 {
        self.init + self.interval * self.records.len() as f64
    }
}

/// Segment covering ±1e9 s around J2000 with `p(t) = p0 + v t`.
pub fn linear_segment(target: i32, center: i32, p0: [f64; 3], v: [f64; 3]) -> ChebyshevSegment {
    let radius = 1.0e9;
    ChebyshevSegment {
        target,
        center,
        frame: 1,
        init: -radius,
        interval: 2.0 * radius,
        records: vec![[
            vec![p0[0], v[0] * radius],
            vec![p0[1], v[1] * radius],
            vec![p0[2], v[2] * radius],
        ]],
    }
}

/// Serialise segments into SPK file bytes.
pub fn spk_bytes(segments: &[ChebyshevSegment]) -> Vec<u8> {
    assert!(segments.len() <= 25, "one summary record holds 25 summaries");

    let mut words: Vec<f64> = Vec::new();
    let mut summaries: Vec<(f64, f64, [i32; 6])> = Vec::new();
    for seg in segments {
        let n = seg.records[0][0].len();
        let rsize = 2 + 3 * n;
        let start = FIRST_DATA_ADDRESS + words.len();
        let radius = seg.interval / 2.0;
        for (i, record) in seg.records.iter().enumerate() {
            words.push(seg.init + seg.interval * i as f64 + radius);
            words.push(radius);
            for axis in record {
                assert_eq!(axis.len(), n, "all axes need the same coefficient count");
                words.extend_from_slice(axis);
            }
        }
        words.extend_from_slice(&[seg.init, seg.interval, rsize as f64, seg.records.len() as f64]);
        let end = FIRST_DATA_ADDRESS + words.len() - 1;
        summaries.push((
            seg.init,
            seg.end(),
            [seg.target, seg.center, seg.frame, 2, start as i32, end as i32],
        ));
    }

    let free = (FIRST_DATA_ADDRESS + words.len()) as i32;
    let mut out = vec![0u8; 3 * RECORD_BYTES];

    // File record.
    out[0..8].copy_from_slice(b"DAF/SPK ");
    out[8..12].copy_from_slice(&2i32.to_le_bytes());
    out[12..16].copy_from_slice(&6i32.to_le_bytes());
    out[16..76].copy_from_slice(&[b' '; 60]);
    out[76..80].copy_from_slice(&2i32.to_le_bytes());
    out[80..84].copy_from_slice(&2i32.to_le_bytes());
    out[84..88].copy_from_slice(&free.to_le_bytes());
    out[88..96].copy_from_slice(b"LTL-IEEE");
    out[699..699 + FTP_STRING.len()].copy_from_slice(FTP_STRING);

    // Summary record.
    let base = RECORD_BYTES;
    out[base + 16..base + 24].copy_from_slice(&(summaries.len() as f64).to_le_bytes());
    for (i, (start, end, ints)) in summaries.iter().enumerate() {
        let at = base + 24 + i * 40;
        out[at..at + 8].copy_from_slice(&start.to_le_bytes());
        out[at + 8..at + 16].copy_from_slice(&end.to_le_bytes());
        for (j, v) in ints.iter().enumerate() {
            out[at + 16 + j * 4..at + 20 + j * 4].copy_from_slice(&v.to_le_bytes());
        }
    }

    // Name record.
    out[2 * RECORD_BYTES..3 * RECORD_BYTES].fill(b' ');

    for w in &words {
        out.extend_from_slice(&w.to_le_bytes());
    }
    let padded = out.len().div_ceil(RECORD_BYTES) * RECORD_BYTES;
    out.resize(padded, 0);
    out
}

/// Write segments as an SPK file.
pub fn write_spk(path: &Path, segments: &[ChebyshevSegment]) -> io::Result<()> {
    std::fs::write(path, spk_bytes(segments))
}
