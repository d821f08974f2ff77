use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use super::{Bencher, Mode, Opts, Output, OutputKind, Report, DEFAULT_PATH};
use crate::stream::{Missing, Total, Trailing, DEFAULT_CHUNK_SIZE};

fn parse(args: &[&str]) -> anyhow::Result<Opts> {
    Opts::parse_from(args.iter().map(OsString::from))
}

#[test]
fn test_defaults() {
    let opts = parse(&[]).unwrap();
    assert_eq!(opts.mode, Mode::Default);
    assert_eq!(opts.path, Path::new(DEFAULT_PATH));
    assert_eq!(opts.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(opts.policy.missing, Missing::Fail);
    assert_eq!(opts.policy.trailing, Trailing::Drop);
    assert!(!opts.literal);
    assert_eq!(opts.output_kind(), OutputKind::Normal);
}

#[test]
fn test_options() {
    let opts = parse(&[
        "--chunk-size",
        "16",
        "--missing",
        "skip",
        "--trailing",
        "scan",
        "--literal",
        "--json",
        "input.txt",
    ])
    .unwrap();

    assert_eq!(opts.path, Path::new("input.txt"));
    assert_eq!(opts.chunk_size, 16);
    assert_eq!(opts.policy.missing, Missing::Skip);
    assert_eq!(opts.policy.trailing, Trailing::Scan);
    assert!(opts.literal);
    assert_eq!(opts.output_kind(), OutputKind::Json);
}

#[test]
fn test_bench_options() {
    let opts = parse(&["--bench", "--warmup", "0", "--count", "3", "--time-limit", "10"]).unwrap();
    assert_eq!(opts.mode, Mode::Bench);
    assert_eq!(opts.warmup, Some(0));
    assert_eq!(opts.count, Some(3));
    assert_eq!(opts.time_limit, Some(10));

    assert!(parse(&["--bench", "--bench"]).is_err());
}

#[test]
fn test_path_after_separator() {
    let opts = parse(&["--verbose", "--", "--weird-name"]).unwrap();
    assert!(opts.verbose);
    assert_eq!(opts.path, Path::new("--weird-name"));
}

#[test]
fn test_bad_options() {
    assert!(parse(&["--chunk-size"]).is_err());
    assert!(parse(&["--chunk-size", "0"]).is_err());
    assert!(parse(&["--chunk-size", "lots"]).is_err());
    assert!(parse(&["--count", "0"]).is_err());
    assert!(parse(&["--count", "-1"]).is_err());
    assert!(parse(&["--missing", "maybe"]).is_err());
    assert!(parse(&["--trailing", "keep"]).is_err());
    assert!(parse(&["--frobnicate"]).is_err());
    assert!(parse(&["a.txt", "b.txt"]).is_err());
}

#[test]
fn test_report() {
    let mut samples = (1..=100).rev().map(Duration::from_millis).collect::<Vec<_>>();
    let report = Report::from_samples(&mut samples);

    assert_eq!(report.count, 100);
    assert_eq!(report.min, Duration::from_millis(1));
    assert_eq!(report.max, Duration::from_millis(100));
    assert_eq!(report.avg, Duration::from_micros(50_500));
    assert_eq!(report.p50, Duration::from_millis(50));
    assert_eq!(report.p95, Duration::from_millis(95));
    assert_eq!(report.p99, Duration::from_millis(99));

    assert_eq!(Report::from_samples(&mut []), Report::default());
}

#[test]
fn test_output_normal() {
    let mut o = Output::new(Vec::new(), OutputKind::Normal);

    o.total(&Total {
        sum: 142,
        lines: 4,
        skipped: 0,
        trailing: 0,
    })
    .unwrap();

    o.error("bad things").unwrap();
    assert_eq!(o.into_inner(), b"142\nerror: bad things\n");
}

#[test]
fn test_output_json() {
    let mut o = Output::new(Vec::new(), OutputKind::Json);

    o.total(&Total {
        sum: 50,
        lines: 2,
        skipped: 1,
        trailing: 3,
    })
    .unwrap();

    o.info("hello").unwrap();

    let out = String::from_utf8(o.into_inner()).unwrap();
    let mut lines = out.lines();

    let total: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(
        total,
        serde_json::json!({
            "type": "total",
            "data": { "sum": 50, "lines": 2, "skipped": 1, "trailing": 3 },
        })
    );

    let message: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(
        message,
        serde_json::json!({
            "type": "message",
            "data": { "kind": "info", "output": "hello" },
        })
    );

    assert!(lines.next().is_none());
}

#[test]
fn test_bencher_count() {
    let opts = parse(&["--bench", "--warmup", "0", "--count", "5"]).unwrap();
    let mut o = Output::new(Vec::new(), OutputKind::Normal);
    let mut runs = 0;

    let report = Bencher::new()
        .iter(&opts, &mut o, || {
            runs += 1;
            Ok::<_, anyhow::Error>(42)
        })
        .unwrap();

    assert_eq!(runs, 5);
    assert_eq!(report.count, 5);
}

#[test]
fn test_bencher_detects_changing_output() {
    let opts = parse(&["--bench", "--warmup", "0", "--count", "3"]).unwrap();
    let mut o = Output::new(Vec::new(), OutputKind::Normal);
    let mut n = 0;

    let result = Bencher::new().iter(&opts, &mut o, || {
        n += 1;
        Ok::<_, anyhow::Error>(n)
    });

    assert!(result.is_err());
}
