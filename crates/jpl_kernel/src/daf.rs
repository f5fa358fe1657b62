//! NAIF Double precision Array File (DAF) container reader.
//!
//! A DAF is a sequence of 1024-byte records. Record 1 is the file record,
//! summary records form a doubly linked list starting at `FWARD`, and array
//! data is addressed in 8-byte words counted from 1 at the start of the file.
//!
//! Reference: NAIF DAF Required Reading (public domain, US Government work
//! product). Implementation is original, written from the public description.

use std::path::Path;

use crate::error::KernelError;

/// Size of one DAF record in bytes.
pub const RECORD_BYTES: usize = 1024;

/// Size of one DAF word (a double) in bytes.
pub const WORD_BYTES: usize = 8;

/// FTP validation string written into every DAF file record.
pub const FTP_STRING: &[u8] = b"FTPSTR:\r:\n:\r\n:\r\x00:\x81:\x10\xce:ENDFTP";

const FTP_OFFSET: usize = 699;

/// Byte order of the numeric data in a DAF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    fn f64_from(self, bytes: [u8; 8]) -> f64 {
        match self {
            Self::Little => f64::from_le_bytes(bytes),
            Self::Big => f64::from_be_bytes(bytes),
        }
    }

    fn i32_from(self, bytes: [u8; 4]) -> i32 {
        match self {
            Self::Little => i32::from_le_bytes(bytes),
            Self::Big => i32::from_be_bytes(bytes),
        }
    }
}

/// One array summary: ND doubles followed by NI integers.
#[derive(Debug, Clone, PartialEq)]
pub struct DafSummary {
    pub doubles: Vec<f64>,
    pub ints: Vec<i32>,
}

/// An in-memory DAF file.
#[derive(Clone)]
pub struct DafFile {
    bytes: Vec<u8>,
    id_word: String,
    endian: Endian,
    nd: usize,
    ni: usize,
    fward: usize,
}

impl std::fmt::Debug for DafFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DafFile")
            .field("id_word", &self.id_word)
            .field("endian", &self.endian)
            .field("nd", &self.nd)
            .field("ni", &self.ni)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl DafFile {
    /// Read a DAF from disk.
    pub fn open(path: &Path) -> Result<Self, KernelError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Parse a DAF from its raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, KernelError> {
        if bytes.len() < RECORD_BYTES {
            return Err(KernelError::InvalidFormat(format!(
                "file too small for a DAF file record ({} bytes)",
                bytes.len()
            )));
        }
        if !bytes.starts_with(b"DAF/") {
            return Err(KernelError::InvalidFormat(format!(
                "bad ID word {:?}",
                String::from_utf8_lossy(&bytes[0..8])
            )));
        }
        let id_word = String::from_utf8_lossy(&bytes[0..8]).trim_end().to_string();
        let endian = detect_endian(&bytes)?;

        if bytes[FTP_OFFSET..FTP_OFFSET + FTP_STRING.len()] != *FTP_STRING {
            return Err(KernelError::InvalidFormat(
                "FTP validation string corrupted (file transferred in text mode?)".into(),
            ));
        }

        let nd = endian.i32_from(word4(&bytes, 8));
        let ni = endian.i32_from(word4(&bytes, 12));
        let fward = endian.i32_from(word4(&bytes, 76));
        if !(0..=124).contains(&nd) || !(2..=250).contains(&ni) || fward < 0 {
            return Err(KernelError::InvalidFormat(format!(
                "implausible file record: ND={nd} NI={ni} FWARD={fward}"
            )));
        }

        Ok(Self {
            bytes,
            id_word,
            endian,
            nd: nd as usize,
            ni: ni as usize,
            fward: fward as usize,
        })
    }

    /// The ID word, e.g. `DAF/SPK`.
    pub fn id_word(&self) -> &str {
        &self.id_word
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Number of doubles in each summary.
    pub fn nd(&self) -> usize {
        self.nd
    }

    /// Number of integers in each summary.
    pub fn ni(&self) -> usize {
        self.ni
    }

    /// Summary size in words.
    pub fn summary_words(&self) -> usize {
        self.nd + self.ni.div_ceil(2)
    }

    /// Walk the summary record list and collect every array summary.
    pub fn summaries(&self) -> Result<Vec<DafSummary>, KernelError> {
        let mut out = Vec::new();
        let total_records = self.bytes.len() / RECORD_BYTES;
        let mut record = self.fward;
        let mut visited = 0usize;

        while record != 0 {
            visited += 1;
            if visited > total_records {
                return Err(KernelError::InvalidData(
                    "summary record list does not terminate".into(),
                ));
            }
            let base = record_offset(record)?;
            if base + RECORD_BYTES > self.bytes.len() {
                return Err(KernelError::InvalidData(format!(
                    "summary record {record} out of bounds"
                )));
            }

            let next = self.f64_at_byte(base);
            let count = self.f64_at_byte(base + 16);
            if !(0.0..=125.0).contains(&count) || next < 0.0 {
                return Err(KernelError::InvalidData(format!(
                    "summary record {record} has bad control words"
                )));
            }

            let step = self.summary_words() * WORD_BYTES;
            for i in 0..count as usize {
                let start = base + 3 * WORD_BYTES + i * step;
                if start + step > base + RECORD_BYTES {
                    return Err(KernelError::InvalidData(format!(
                        "summary {i} overruns record {record}"
                    )));
                }
                out.push(self.parse_summary(start));
            }

            record = next as usize;
        }

        Ok(out)
    }

    /// Read `count` doubles starting at 1-based word address `start`.
    pub fn read_words(&self, start: usize, count: usize) -> Result<Vec<f64>, KernelError> {
        if start == 0 {
            return Err(KernelError::InvalidData("word addresses start at 1".into()));
        }
        let byte_start = (start - 1).checked_mul(WORD_BYTES);
        let byte_end = byte_start
            .zip(count.checked_mul(WORD_BYTES))
            .and_then(|(from, len)| from.checked_add(len));
        let (Some(byte_start), Some(byte_end)) = (byte_start, byte_end) else {
            return Err(KernelError::InvalidData(format!(
                "{count} words at address {start} overflow the address space"
            )));
        };
        if byte_end > self.bytes.len() {
            return Err(KernelError::InvalidData(format!(
                "words {start}..{} out of bounds",
                start.saturating_add(count)
            )));
        }
        Ok((0..count)
            .map(|i| self.f64_at_byte(byte_start + i * WORD_BYTES))
            .collect())
    }

    fn parse_summary(&self, start: usize) -> DafSummary {
        let doubles = (0..self.nd)
            .map(|i| self.f64_at_byte(start + i * WORD_BYTES))
            .collect();
        let int_base = start + self.nd * WORD_BYTES;
        let ints = (0..self.ni)
            .map(|i| self.endian.i32_from(word4(&self.bytes, int_base + i * 4)))
            .collect();
        DafSummary { doubles, ints }
    }

    fn f64_at_byte(&self, offset: usize) -> f64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.bytes[offset..offset + 8]);
        self.endian.f64_from(buf)
    }
}

fn record_offset(record: usize) -> Result<usize, KernelError> {
    record
        .checked_sub(1)
        .map(|r| r * RECORD_BYTES)
        .ok_or_else(|| KernelError::InvalidData("record numbers start at 1".into()))
}

fn word4(bytes: &[u8], offset: usize) -> [u8; 4] {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    buf
}

/// Prefer the explicit binary format tag; fall back to a plausible ND value.
fn detect_endian(bytes: &[u8]) -> Result<Endian, KernelError> {
    match &bytes[88..96] {
        b"LTL-IEEE" => return Ok(Endian::Little),
        b"BIG-IEEE" => return Ok(Endian::Big),
        _ => {}
    }
    let nd = word4(bytes, 8);
    if (1..=124).contains(&i32::from_le_bytes(nd)) {
        Ok(Endian::Little)
    } else if (1..=124).contains(&i32::from_be_bytes(nd)) {
        Ok(Endian::Big)
    } else {
        Err(KernelError::InvalidFormat("cannot determine byte order".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_record(nd: i32, ni: i32, fward: i32, tag: &[u8; 8]) -> Vec<u8> {
        let mut rec = vec![0u8; RECORD_BYTES];
        rec[0..8].copy_from_slice(b"DAF/SPK ");
        rec[8..12].copy_from_slice(&nd.to_le_bytes());
        rec[12..16].copy_from_slice(&ni.to_le_bytes());
        rec[76..80].copy_from_slice(&fward.to_le_bytes());
        rec[88..96].copy_from_slice(tag);
        rec[FTP_OFFSET..FTP_OFFSET + FTP_STRING.len()].copy_from_slice(FTP_STRING);
        rec
    }

    #[test]
    fn rejects_short_file() {
        let err = DafFile::from_bytes(vec![0u8; 100]).unwrap_err();
        assert!(matches!(err, KernelError::InvalidFormat(_)));
    }

    #[test]
    fn rejects_bad_id_word() {
        let mut rec = file_record(2, 6, 0, b"LTL-IEEE");
        rec[0..4].copy_from_slice(b"NAIF");
        assert!(matches!(
            DafFile::from_bytes(rec),
            Err(KernelError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_corrupt_ftp_string() {
        let mut rec = file_record(2, 6, 0, b"LTL-IEEE");
        rec[FTP_OFFSET + 7] = b'\n';
        let err = DafFile::from_bytes(rec).unwrap_err();
        assert!(err.to_string().contains("FTP"), "{err}");
    }

    #[test]
    fn falls_back_to_nd_for_byte_order() {
        let rec = file_record(2, 6, 0, b"        ");
        let daf = DafFile::from_bytes(rec).unwrap();
        assert_eq!(daf.endian(), Endian::Little);
        assert_eq!(daf.summary_words(), 5);
    }

    #[test]
    fn no_summaries_when_fward_is_zero() {
        let daf = DafFile::from_bytes(file_record(2, 6, 0, b"LTL-IEEE")).unwrap();
        assert!(daf.summaries().unwrap().is_empty());
    }

    #[test]
    fn reads_single_summary() {
        let mut data = file_record(2, 6, 2, b"LTL-IEEE");
        let mut summary = vec![0u8; RECORD_BYTES];
        summary[16..24].copy_from_slice(&1.0f64.to_le_bytes());
        summary[24..32].copy_from_slice(&(-10.0f64).to_le_bytes());
        summary[32..40].copy_from_slice(&10.0f64.to_le_bytes());
        for (i, v) in [399i32, 3, 1, 2, 385, 400].iter().enumerate() {
            summary[40 + i * 4..44 + i * 4].copy_from_slice(&v.to_le_bytes());
        }
        data.extend(summary);

        let daf = DafFile::from_bytes(data).unwrap();
        let summaries = daf.summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].doubles, vec![-10.0, 10.0]);
        assert_eq!(summaries[0].ints, vec![399, 3, 1, 2, 385, 400]);
    }

    #[test]
    fn detects_self_referencing_summary_list() {
        let mut data = file_record(2, 6, 2, b"LTL-IEEE");
        let mut summary = vec![0u8; RECORD_BYTES];
        summary[0..8].copy_from_slice(&2.0f64.to_le_bytes());
        data.extend(summary);
        let daf = DafFile::from_bytes(data).unwrap();
        assert!(matches!(daf.summaries(), Err(KernelError::InvalidData(_))));
    }

    #[test]
    fn read_words_bounds() {
        let daf = DafFile::from_bytes(file_record(2, 6, 0, b"LTL-IEEE")).unwrap();
        assert_eq!(daf.read_words(1, 128).unwrap().len(), 128);
        assert!(daf.read_words(1, 129).is_err());
        assert!(daf.read_words(0, 1).is_err());
        assert!(daf.read_words(usize::MAX, 2).is_err());
        assert!(daf.read_words(2, usize::MAX / 4).is_err());
    }

    #[test]
    fn big_endian_tag() {
        let mut rec = vec![0u8; RECORD_BYTES];
        rec[0..8].copy_from_slice(b"DAF/SPK ");
        rec[8..12].copy_from_slice(&2i32.to_be_bytes());
        rec[12..16].copy_from_slice(&6i32.to_be_bytes());
        rec[88..96].copy_from_slice(b"BIG-IEEE");
        rec[FTP_OFFSET..FTP_OFFSET + FTP_STRING.len()].copy_from_slice(FTP_STRING);
        let daf = DafFile::from_bytes(rec).unwrap();
        assert_eq!(daf.endian(), Endian::Big);
        assert_eq!(daf.nd(), 2);
        assert_eq!(daf.ni(), 6);
    }
}
