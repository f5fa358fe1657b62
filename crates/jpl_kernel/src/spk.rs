//! SPK (Spacecraft and Planet Kernel) segment index and evaluation.
//!
//! Supports the Chebyshev segment types used by the JPL planetary
//! ephemerides: type 2 (position coefficients, velocity by differentiation)
//! and type 3 (separate position and velocity coefficients).

use std::path::Path;

use tracing::warn;

use crate::chebyshev::{clenshaw, clenshaw_derivative};
use crate::daf::{DafFile, DafSummary};
use crate::error::KernelError;

/// Segment descriptor decoded from a DAF summary (ND=2, NI=6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpkSegment {
    pub target: i32,
    pub center: i32,
    /// NAIF frame code of the segment's states (1 = J2000, 17 = ECLIPJ2000).
    pub frame: i32,
    pub data_type: i32,
    /// Coverage start, TDB seconds past J2000.
    pub start_tdb_s: f64,
    /// Coverage end, TDB seconds past J2000.
    pub end_tdb_s: f64,
    /// First word address of the segment's array (1-based).
    pub start_address: usize,
    /// Last word address of the segment's array (inclusive).
    pub end_address: usize,
}

impl SpkSegment {
    fn from_summary(summary: &DafSummary) -> Result<Self, KernelError> {
        if summary.doubles.len() < 2 || summary.ints.len() < 6 {
            return Err(KernelError::InvalidData(
                "SPK summary needs 2 doubles and 6 integers".into(),
            ));
        }
        let start_address = summary.ints[4];
        let end_address = summary.ints[5];
        if start_address < 1 || end_address < start_address {
            return Err(KernelError::InvalidData(format!(
                "bad segment address range {start_address}..{end_address}"
            )));
        }
        Ok(Self {
            target: summary.ints[0],
            center: summary.ints[1],
            frame: summary.ints[2],
            data_type: summary.ints[3],
            start_tdb_s: summary.doubles[0],
            end_tdb_s: summary.doubles[1],
            start_address: start_address as usize,
            end_address: end_address as usize,
        })
    }

    /// Whether the descriptor's coverage includes `epoch_tdb_s`.
    pub fn covers(&self, epoch_tdb_s: f64) -> bool {
        epoch_tdb_s >= self.start_tdb_s && epoch_tdb_s <= self.end_tdb_s
    }
}

/// Position and velocity of a segment's target relative to its center,
/// in the segment's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpkEvaluation {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

/// Evaluation result together with the segment it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentState {
    pub center: i32,
    pub frame: i32,
    pub evaluation: SpkEvaluation,
}

/// Record layout read from the trailer of a Chebyshev segment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChebyshevLayout {
    init: f64,
    interval: f64,
    record_words: usize,
    n_records: usize,
    n_coeffs: usize,
}

#[derive(Debug, Clone)]
struct IndexedSegment {
    segment: SpkSegment,
    layout: ChebyshevLayout,
}

/// A loaded SPK file.
#[derive(Debug, Clone)]
pub struct SpkKernel {
    daf: DafFile,
    segments: Vec<IndexedSegment>,
    descriptors: Vec<SpkSegment>,
}

impl SpkKernel {
    /// Load an SPK file from disk.
    pub fn load(path: &Path) -> Result<Self, KernelError> {
        Self::from_daf(DafFile::open(path)?)
    }

    /// Parse an SPK from raw file bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, KernelError> {
        Self::from_daf(DafFile::from_bytes(bytes)?)
    }

    /// Index the segments of an already parsed DAF.
    pub fn from_daf(daf: DafFile) -> Result<Self, KernelError> {
        if daf.id_word() != "DAF/SPK" {
            return Err(KernelError::InvalidFormat(format!(
                "expected DAF/SPK, found {}",
                daf.id_word()
            )));
        }
        if daf.nd() != 2 || daf.ni() != 6 {
            return Err(KernelError::InvalidFormat(format!(
                "SPK summaries must have ND=2 NI=6, found ND={} NI={}",
                daf.nd(),
                daf.ni()
            )));
        }

        let mut segments = Vec::new();
        let mut descriptors = Vec::new();
        for summary in daf.summaries()? {
            let segment = SpkSegment::from_summary(&summary)?;
            descriptors.push(segment);
            match segment.data_type {
                2 | 3 => {
                    let layout = read_layout(&daf, &segment)?;
                    segments.push(IndexedSegment { segment, layout });
                }
                other => warn!(
                    body = segment.target,
                    center = segment.center,
                    "skipping SPK segment of unsupported type {other}"
                ),
            }
        }

        Ok(Self {
            daf,
            segments,
            descriptors,
        })
    }

    /// Every segment descriptor in file order, including skipped types.
    pub fn segments(&self) -> &[SpkSegment] {
        &self.descriptors
    }

    /// Whether any evaluable segment has `target` as its target.
    pub fn has_target(&self, target: i32) -> bool {
        self.segments.iter().any(|s| s.segment.target == target)
    }

    /// Evaluate the highest-priority segment for `target` covering the epoch,
    /// whatever its center. Later segments in the file take precedence.
    pub fn state_of(
        &self,
        target: i32,
        epoch_tdb_s: f64,
    ) -> Result<Option<SegmentState>, KernelError> {
        let Some(indexed) = self
            .segments
            .iter()
            .rev()
            .find(|s| s.segment.target == target && s.segment.covers(epoch_tdb_s))
        else {
            return Ok(None);
        };
        let evaluation = self.evaluate_segment(indexed, epoch_tdb_s)?;
        Ok(Some(SegmentState {
            center: indexed.segment.center,
            frame: indexed.segment.frame,
            evaluation,
        }))
    }

    /// Evaluate (target, center) at an epoch in TDB seconds past J2000.
    pub fn evaluate(
        &self,
        target: i32,
        center: i32,
        epoch_tdb_s: f64,
    ) -> Result<SpkEvaluation, KernelError> {
        let mut any_pair = false;
        for indexed in self.segments.iter().rev() {
            let seg = &indexed.segment;
            if seg.target != target || seg.center != center {
                continue;
            }
            any_pair = true;
            if seg.covers(epoch_tdb_s) {
                return self.evaluate_segment(indexed, epoch_tdb_s);
            }
        }
        if any_pair {
            Err(KernelError::EpochOutOfRange {
                target,
                center,
                epoch_tdb_s,
            })
        } else {
            Err(KernelError::SegmentNotFound { target, center })
        }
    }

    fn evaluate_segment(
        &self,
        indexed: &IndexedSegment,
        epoch_tdb_s: f64,
    ) -> Result<SpkEvaluation, KernelError> {
        let layout = &indexed.layout;
        let offset = ((epoch_tdb_s - layout.init) / layout.interval).floor();
        let index = if offset < 0.0 {
            0
        } else {
            (offset as usize).min(layout.n_records - 1)
        };

        let record_start = indexed.segment.start_address + index * layout.record_words;
        let record = self.daf.read_words(record_start, layout.record_words)?;
        let mid = record[0];
        let radius = record[1];
        if radius <= 0.0 {
            return Err(KernelError::InvalidData(format!(
                "record {index} has non-positive radius {radius}"
            )));
        }
        let s = (epoch_tdb_s - mid) / radius;
        let n = layout.n_coeffs;
        let coeffs = &record[2..];

        let mut position_km = [0.0; 3];
        let mut velocity_km_s = [0.0; 3];
        for axis in 0..3 {
            let block = &coeffs[axis * n..(axis + 1) * n];
            position_km[axis] = clenshaw(block, s);
            velocity_km_s[axis] = match indexed.segment.data_type {
                3 => clenshaw(&coeffs[(axis + 3) * n..(axis + 4) * n], s),
                _ => clenshaw_derivative(block, s) / radius,
            };
        }

        Ok(SpkEvaluation {
            position_km,
            velocity_km_s,
        })
    }
}

/// Read and sanity-check the four-word trailer `[INIT, INTLEN, RSIZE, N]`.
fn read_layout(daf: &DafFile, segment: &SpkSegment) -> Result<ChebyshevLayout, KernelError> {
    let bad = |reason: String| {
        KernelError::InvalidData(format!("segment for target {}: {reason}", segment.target))
    };
    let span = segment
        .end_address
        .checked_sub(segment.start_address)
        .and_then(|d| d.checked_add(1))
        .filter(|&words| words >= 4)
        .ok_or_else(|| bad("too short for a trailer".into()))?;
    let trailer = daf.read_words(segment.end_address - 3, 4)?;
    let (init, interval, rsize, n) = (trailer[0], trailer[1], trailer[2], trailer[3]);
    let components = if segment.data_type == 3 { 6 } else { 3 };

    // RSIZE and N are integral word counts bounded by the segment span.
    let word_count = |value: f64| value.fract() == 0.0 && value >= 1.0 && value <= span as f64;
    if !(interval.is_finite() && interval > 0.0)
        || !word_count(rsize)
        || !word_count(n)
        || rsize < 2.0 + components as f64
    {
        return Err(bad(format!(
            "bad trailer INTLEN={interval} RSIZE={rsize} N={n}"
        )));
    }
    let record_words = rsize as usize;
    let n_records = n as usize;
    if (record_words - 2) % components != 0 {
        return Err(bad(format!("RSIZE={record_words} is not 2 + {components}*k")));
    }
    let needed = n_records
        .checked_mul(record_words)
        .and_then(|w| w.checked_add(4));
    if needed != Some(span) {
        return Err(bad(format!(
            "spans {span} words but {n_records} records of {record_words} words need more or fewer"
        )));
    }

    Ok(ChebyshevLayout {
        init,
        interval,
        record_words,
        n_records,
        n_coeffs: (record_words - 2) / components,
    })
}
