//! End-to-end replay scenarios: decode a VCD file from disk, then drive
//! cursors and stateless queries over it.

use std::io::Write;
use std::thread;

use proptest::prelude::*;
use wavetrace_replay::{
    changes_at, grouped_timestamps, steps, value_at, ReplayCursor, ReplayError,
};
use wavetrace_vcd::{decode_str, load_vcd_file, DecodeOptions, SignalValue, Waveform};

const COUNTER_VCD: &str = "\
$timescale 1ns $end
$scope module counter $end
$var reg 8 ! count $end
$upscope $end
$enddefinitions $end
#0
$dumpvars
b0 !
$end
#10
b1 !
#20
b10 !
";

fn write_temp(vcd: &str) -> tempfile::NamedTempFile {
    let mut tmp = tempfile::Builder::new()
        .suffix(".vcd")
        .tempfile()
        .unwrap();
    tmp.write_all(vcd.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn counter_end_to_end() {
    let tmp = write_temp(COUNTER_VCD);
    let wf = load_vcd_file(tmp.path(), &DecodeOptions::default()).unwrap();

    let timestamps: Vec<f64> = grouped_timestamps(&wf).collect();
    assert_eq!(timestamps, vec![10.0, 20.0]);
    assert_eq!(value_at(&wf, "count", 15.0).unwrap(), 1u64);

    let mut cursor = ReplayCursor::new(&wf);
    cursor.advance_to(20.0).unwrap();
    assert_eq!(cursor.view().get("count").and_then(SignalValue::to_u64), Some(2));
}

#[test]
fn host_style_replay_loop() {
    // Mirrors how a host scheduler consumes the engine: one batch per
    // instant, observers run after the whole batch is applied.
    let vcd = "\
$timescale 5 ns $end
$scope module tb $end
$var wire 1 ! clk $end
$var reg 4 \" q $end
$upscope $end
$enddefinitions $end
$dumpvars
0!
b0 \"
$end
#1
1!
b1 \"
#2
0!
#3
1!
b10 \"
#4
0!
";
    let wf = decode_str(vcd, &DecodeOptions::default()).unwrap();
    let mut cursor = ReplayCursor::new(&wf);
    let mut prev_clk = cursor.get("clk").unwrap();
    let mut sampled = Vec::new();
    for t in grouped_timestamps(&wf) {
        cursor.advance_to(t).unwrap();
        let view = cursor.view();
        let clk = view.get("clk").unwrap();
        if *prev_clk == 0u64 && *clk == 1u64 {
            sampled.push((t, view.get("q").unwrap().to_string()));
        }
        prev_clk = clk;
    }
    assert_eq!(sampled, vec![(5.0, "1".to_string()), (15.0, "2".to_string())]);
}

#[test]
fn steps_agree_with_changes_at() {
    let wf = decode_str(COUNTER_VCD, &DecodeOptions::default()).unwrap();
    for step in steps(&wf) {
        assert_eq!(step.changes, changes_at(&wf, step.time_ns));
    }
}

#[test]
fn missing_file_is_fatal() {
    let err = load_vcd_file(
        std::path::Path::new("/definitely/not/here.vcd"),
        &DecodeOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.vcd"));
}

#[test]
fn unknown_signal_query() {
    let wf = decode_str(COUNTER_VCD, &DecodeOptions::default()).unwrap();
    assert!(matches!(
        value_at(&wf, "counter.missing", 0.0),
        Err(ReplayError::SignalNotFound { .. })
    ));
}

#[test]
fn one_signal_per_identifier_with_aliases() {
    let vcd = "\
$scope module top $end
$var wire 1 ! clk $end
$scope module core $end
$var wire 1 ! clk_in $end
$var reg 4 # state $end
$upscope $end
$upscope $end
$enddefinitions $end
#5
1!
b11 #
";
    let wf = decode_str(vcd, &DecodeOptions::default()).unwrap();
    let mut ids: Vec<&str> = wf.signals().iter().map(|s| s.identifier.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), wf.signals().len());
    assert_eq!(wf.signals().len(), 2);

    // The alias path reads the same signal.
    assert_eq!(value_at(&wf, "top.core.clk_in", 5.0).unwrap(), 1u64);
    let mut cursor = ReplayCursor::new(&wf);
    cursor.advance_to(5.0).unwrap();
    assert_eq!(cursor.get("top.core.clk_in"), cursor.get("top.clk"));
    assert_eq!(cursor.get("top.core.state").and_then(SignalValue::to_u64), Some(3));
}

#[test]
fn cursors_share_waveform_across_threads() {
    let wf = decode_str(COUNTER_VCD, &DecodeOptions::default()).unwrap();
    let results: Vec<Option<u64>> = thread::scope(|s| {
        let handles: Vec<_> = [5.0, 10.0, 20.0]
            .into_iter()
            .map(|t| {
                let wf = &wf;
                s.spawn(move || {
                    let mut cursor = ReplayCursor::new(wf);
                    cursor.advance_to(t).unwrap();
                    cursor.get("count").and_then(SignalValue::to_u64)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, vec![Some(0), Some(1), Some(2)]);
}

/// Renders a VCD with one register per entry of `widths` and the given
/// `(delta_units, signal, bits)` changes.
fn render_vcd(widths: &[u32], changes: &[(u64, usize, String)]) -> String {
    let mut vcd = String::from("$timescale 1 ps $end\n$scope module dut $end\n");
    for (i, width) in widths.iter().enumerate() {
        vcd.push_str(&format!("$var reg {width} s{i} sig{i} $end\n"));
    }
    vcd.push_str("$upscope $end\n$enddefinitions $end\n$dumpvars\n");
    for i in 0..widths.len() {
        vcd.push_str(&format!("b0 s{i}\n"));
    }
    vcd.push_str("$end\n");
    let mut t = 0;
    for (delta, sig, bits) in changes {
        t += delta;
        vcd.push_str(&format!("#{t}\nb{bits} s{sig}\n"));
    }
    vcd
}

/// Signal widths up to 160 bits and changes whose bit strings are at most
/// as long as their signal, leading zeros included.
fn arb_log() -> impl Strategy<Value = (Vec<u32>, Vec<(u64, usize, String)>)> {
    prop::collection::vec(1u32..=160, 1..5).prop_flat_map(|widths| {
        let change = (
            0u64..4,
            any::<prop::sample::Index>(),
            prop::collection::vec(any::<bool>(), 1..=160),
        );
        let sized = widths.clone();
        let changes = prop::collection::vec(change, 0..40).prop_map(move |raw| {
            raw.into_iter()
                .map(|(delta, pick, bits)| {
                    let sig = pick.index(sized.len());
                    let len = bits.len().min(sized[sig] as usize);
                    let bits: String = bits[..len]
                        .iter()
                        .map(|&b| if b { '1' } else { '0' })
                        .collect();
                    (delta, sig, bits)
                })
                .collect::<Vec<_>>()
        });
        (Just(widths), changes)
    })
}

/// Binary rendering of a bit string's value: leading zeros dropped, `0` if
/// nothing is left.
fn canonical_bits(bits: &str) -> String {
    match bits.trim_start_matches('0') {
        "" => "0".to_string(),
        rest => rest.to_string(),
    }
}

fn check_cursor_matches_queries(wf: &Waveform) -> Result<(), TestCaseError> {
    let mut cursor = ReplayCursor::new(wf);
    for t in grouped_timestamps(wf) {
        cursor.advance_to(t).unwrap();
        for (signal, value) in cursor.current_values() {
            prop_assert_eq!(value, &value_at(wf, &signal.name, t).unwrap());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn cursor_agrees_with_value_at((widths, changes) in arb_log()) {
        let wf = decode_str(&render_vcd(&widths, &changes), &DecodeOptions::strict()).unwrap();
        prop_assert_eq!(wf.changes().len(), changes.len());
        check_cursor_matches_queries(&wf)?;
    }

    #[test]
    fn decoded_values_keep_every_bit((widths, changes) in arb_log()) {
        let wf = decode_str(&render_vcd(&widths, &changes), &DecodeOptions::strict()).unwrap();
        let end = wf.end_time_ns();
        for sig in 0..widths.len() {
            let expected = changes
                .iter()
                .rev()
                .find(|(_, s, _)| *s == sig)
                .map_or_else(|| "0".to_string(), |(_, _, bits)| canonical_bits(bits));
            let decoded = value_at(&wf, &format!("dut.sig{sig}"), end).unwrap();
            prop_assert_eq!(format!("{decoded:b}"), expected);
            prop_assert!(decoded.bit_len() <= widths[sig]);
        }
        for (change, (_, _, bits)) in wf.changes().iter().zip(&changes) {
            prop_assert_eq!(format!("{:b}", change.value), canonical_bits(bits));
        }
    }

    #[test]
    fn grouped_timestamps_strictly_increase((widths, changes) in arb_log()) {
        let wf = decode_str(&render_vcd(&widths, &changes), &DecodeOptions::strict()).unwrap();
        let ts: Vec<f64> = grouped_timestamps(&wf).collect();
        prop_assert!(ts.windows(2).all(|w| w[0] < w[1]));
        let covered: usize = ts.iter().map(|&t| changes_at(&wf, t).len()).sum();
        prop_assert_eq!(covered, wf.changes().len());
    }

    #[test]
    fn repeated_advance_is_idempotent((widths, changes) in arb_log(), pick in any::<prop::sample::Index>()) {
        let wf = decode_str(&render_vcd(&widths, &changes), &DecodeOptions::strict()).unwrap();
        let ts: Vec<f64> = grouped_timestamps(&wf).collect();
        prop_assume!(!ts.is_empty());
        let t = ts[pick.index(ts.len())];
        let mut cursor = ReplayCursor::new(&wf);
        cursor.advance_to(t).unwrap();
        let first: Vec<SignalValue> = cursor.current_values().map(|(_, v)| v.clone()).collect();
        prop_assert!(cursor.advance_to(t).unwrap().is_empty());
        let second: Vec<SignalValue> = cursor.current_values().map(|(_, v)| v.clone()).collect();
        prop_assert_eq!(first, second);
    }
}
