//! Stateless queries over a waveform's change log.
//!
//! Nothing here touches a [`ReplayCursor`](crate::ReplayCursor): every
//! function answers from the immutable [`Waveform`] alone, so results do not
//! depend on call order. The change log is non-decreasing in time, which
//! lets timestamp grouping use binary search instead of hashing floats.

use std::iter::FusedIterator;

use wavetrace_vcd::{SignalValue, ValueChange, Waveform};

use crate::error::ReplayError;

/// Returns the value `name` held at `time_ns`.
///
/// Starts from the `$dumpvars` value (or 0) and applies every change to the
/// signal up to and including `time_ns`. `name` may be a full path or a short
/// name, resolved as by [`Waveform::find_signal`].
///
/// # Errors
///
/// [`ReplayError::SignalNotFound`] for an unknown name,
/// [`ReplayError::InvalidTime`] for NaN.
pub fn value_at(
    waveform: &Waveform,
    name: &str,
    time_ns: f64,
) -> Result<SignalValue, ReplayError> {
    if time_ns.is_nan() {
        return Err(ReplayError::InvalidTime(time_ns));
    }
    let signal = waveform
        .find_signal(name)
        .ok_or_else(|| ReplayError::SignalNotFound {
            name: name.to_string(),
        })?;
    let last = waveform
        .changes()
        .iter()
        .take_while(|c| c.time_ns <= time_ns)
        .filter(|c| c.identifier == signal.identifier)
        .last()
        .map(|c| &c.value);
    Ok(last
        .or_else(|| waveform.initial_value(&signal.identifier))
        .cloned()
        .unwrap_or_default())
}

/// Returns every change recorded at exactly `time_ns`, in log order.
pub fn changes_at(waveform: &Waveform, time_ns: f64) -> &[ValueChange] {
    let changes = waveform.changes();
    let start = changes.partition_point(|c| c.time_ns < time_ns);
    let end = start + changes[start..].partition_point(|c| c.time_ns <= time_ns);
    &changes[start..end]
}

/// Returns the distinct timestamps of the change log in ascending order.
pub fn grouped_timestamps(waveform: &Waveform) -> Timestamps<'_> {
    Timestamps(steps(waveform))
}

/// Returns the change log partitioned into per-timestamp batches.
pub fn steps(waveform: &Waveform) -> Steps<'_> {
    Steps {
        remaining: waveform.changes(),
    }
}

/// All changes sharing one timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step<'w> {
    /// The shared timestamp in nanoseconds.
    pub time_ns: f64,
    /// The changes in their original relative order.
    pub changes: &'w [ValueChange],
}

/// Iterator over [`Step`]s. Clone it to restart from the same point.
#[derive(Clone, Debug)]
pub struct Steps<'w> {
    remaining: &'w [ValueChange],
}

/// Splits the leading run of equal timestamps off a non-decreasing slice.
pub(crate) fn split_step(changes: &[ValueChange]) -> Option<(Step<'_>, &[ValueChange])> {
    let time_ns = changes.first()?.time_ns;
    let len = changes.partition_point(|c| c.time_ns <= time_ns);
    let (batch, rest) = changes.split_at(len);
    Some((
        Step {
            time_ns,
            changes: batch,
        },
        rest,
    ))
}

impl<'w> Iterator for Steps<'w> {
    type Item = Step<'w>;

    fn next(&mut self) -> Option<Step<'w>> {
        let (step, rest) = split_step(self.remaining)?;
        self.remaining = rest;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.len();
        (usize::from(n > 0), Some(n))
    }
}

impl FusedIterator for Steps<'_> {}

/// Iterator over distinct timestamps. Clone it to restart from the same point.
#[derive(Clone, Debug)]
pub struct Timestamps<'w>(Steps<'w>);

impl Iterator for Timestamps<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.0.next().map(|step| step.time_ns)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl FusedIterator for Timestamps<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use wavetrace_vcd::{decode_str, DecodeOptions};

    fn waveform() -> Waveform {
        let vcd = "\
$timescale 1ns $end
$scope module top $end
$var reg 8 ! count $end
$var wire 1 \" clk $end
$var wire 1 # rst $end
$upscope $end
$enddefinitions $end
#0
$dumpvars
b0 !
0\"
1#
$end
#10
b1 !
1\"
#15
0\"
#20
b10 !
1\"
0#
";
        decode_str(vcd, &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn value_at_before_first_change_is_initial() {
        let wf = waveform();
        assert_eq!(value_at(&wf, "count", 0.0).unwrap(), 0u64);
        assert_eq!(value_at(&wf, "rst", 5.0).unwrap(), 1u64);
    }

    #[test]
    fn value_at_between_and_on_changes() {
        let wf = waveform();
        assert_eq!(value_at(&wf, "count", 10.0).unwrap(), 1u64);
        assert_eq!(value_at(&wf, "count", 15.0).unwrap(), 1u64);
        assert_eq!(value_at(&wf, "count", 20.0).unwrap(), 2u64);
        assert_eq!(value_at(&wf, "count", 1e9).unwrap(), 2u64);
        assert_eq!(value_at(&wf, "clk", 17.5).unwrap(), 0u64);
    }

    #[test]
    fn value_at_accepts_full_path() {
        let wf = waveform();
        assert_eq!(value_at(&wf, "top.count", 20.0).unwrap(), 2u64);
    }

    #[test]
    fn value_at_without_initial_value_is_zero() {
        let vcd = "$var wire 1 ! a $end\n$enddefinitions $end\n#5\n1!\n";
        let wf = decode_str(vcd, &DecodeOptions::default()).unwrap();
        assert_eq!(value_at(&wf, "a", 4.0).unwrap(), 0u64);
        assert_eq!(value_at(&wf, "a", 5.0).unwrap(), 1u64);
    }

    #[test]
    fn value_at_wide_vector() {
        let vcd = format!(
            "$var wire 65 ! bus $end\n$enddefinitions $end\n$dumpvars\nb0 !\n$end\n#1\nb1{} !\n",
            "0".repeat(64)
        );
        let wf = decode_str(&vcd, &DecodeOptions::default()).unwrap();
        assert!(value_at(&wf, "bus", 0.0).unwrap().is_zero());
        let v = value_at(&wf, "bus", 1.0).unwrap();
        assert!(!v.is_zero());
        assert_eq!(v.bit_len(), 65);
        assert_eq!(v.to_string(), "18446744073709551616");
    }

    #[test]
    fn value_at_unknown_signal() {
        let wf = waveform();
        assert_eq!(
            value_at(&wf, "nope", 0.0),
            Err(ReplayError::SignalNotFound {
                name: "nope".into()
            })
        );
    }

    #[test]
    fn value_at_nan_rejected() {
        let wf = waveform();
        assert!(matches!(
            value_at(&wf, "count", f64::NAN),
            Err(ReplayError::InvalidTime(_))
        ));
    }

    #[test]
    fn value_at_is_order_independent() {
        let wf = waveform();
        let forward: Vec<SignalValue> = [0.0, 10.0, 15.0, 20.0]
            .iter()
            .map(|&t| value_at(&wf, "clk", t).unwrap())
            .collect();
        let mut backward: Vec<SignalValue> = [20.0, 15.0, 10.0, 0.0]
            .iter()
            .map(|&t| value_at(&wf, "clk", t).unwrap())
            .collect();
        backward.reverse();
        let bits: Vec<Option<u64>> = forward.iter().map(SignalValue::to_u64).collect();
        assert_eq!(bits, vec![Some(0), Some(1), Some(0), Some(1)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn grouped_timestamps_distinct_and_sorted() {
        let wf = waveform();
        let ts: Vec<f64> = grouped_timestamps(&wf).collect();
        assert_eq!(ts, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn grouped_timestamps_restartable() {
        let wf = waveform();
        let mut it = grouped_timestamps(&wf);
        assert_eq!(it.next(), Some(10.0));
        let restart = it.clone();
        assert_eq!(it.collect::<Vec<_>>(), vec![15.0, 20.0]);
        assert_eq!(restart.collect::<Vec<_>>(), vec![15.0, 20.0]);
        assert_eq!(grouped_timestamps(&wf).count(), 3);
    }

    #[test]
    fn grouped_timestamps_empty_log() {
        let wf = decode_str("$enddefinitions $end\n", &DecodeOptions::default()).unwrap();
        assert_eq!(grouped_timestamps(&wf).next(), None);
    }

    #[test]
    fn changes_at_preserves_order() {
        let wf = waveform();
        let at20 = changes_at(&wf, 20.0);
        let ids: Vec<&str> = at20.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, vec!["!", "\"", "#"]);
        assert_eq!(changes_at(&wf, 15.0).len(), 1);
    }

    #[test]
    fn changes_at_missing_timestamp_is_empty() {
        let wf = waveform();
        assert!(changes_at(&wf, 12.0).is_empty());
        assert!(changes_at(&wf, 100.0).is_empty());
        assert!(changes_at(&wf, -1.0).is_empty());
    }

    #[test]
    fn steps_batch_changes() {
        let wf = waveform();
        let batches: Vec<Step<'_>> = steps(&wf).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].time_ns, 10.0);
        assert_eq!(batches[0].changes.len(), 2);
        assert_eq!(batches[2].changes, changes_at(&wf, 20.0));
    }
}
