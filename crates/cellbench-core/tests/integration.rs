//! Integration tests for cellbench-core.
//!
//! These tests drive the full monitoring pipeline:
//! bench config → session initialize → ticks → history → summary → export.

use std::time::Duration;

use cellbench_core::reading::Measurements;
use cellbench_core::{
    BenchConfig, CellReading, CellStatus, CellbenchError, Chemistry, HistoryBuffer,
    HistorySnapshot, MonitorSession, SeededSimulator, Simulator, TREND_WINDOW, TickOutcome,
    Ticker, TrendMetric, export_json, load_export, summarize, trend_series,
};

fn session(cells: Vec<Chemistry>, seed: u64) -> MonitorSession {
    MonitorSession::new(
        BenchConfig::with_cells(cells),
        Box::new(SeededSimulator::new(seed)),
    )
    .unwrap()
}

#[test]
fn initialize_two_cells_one_per_chemistry() {
    let mut s = MonitorSession::new(
        BenchConfig::with_cells(vec![Chemistry::Lfp, Chemistry::Nmc]),
        Box::new(Simulator),
    )
    .unwrap();
    s.initialize(0);

    let readings = s.readings();
    assert_eq!(readings.len(), 2, "Expected exactly 2 readings");
    assert_eq!(readings[0].chemistry, Chemistry::Lfp);
    assert_eq!(readings[1].chemistry, Chemistry::Nmc);
    for r in readings {
        let nominal = r.chemistry.profile().nominal_voltage;
        assert!(
            (r.voltage - nominal).abs() <= 0.1 + 1e-9,
            "{} voltage {} not within 0.1 of {}",
            r.cell_id,
            r.voltage,
            nominal
        );
    }
}

#[test]
fn lfp_above_max_voltage_is_critical() {
    let r = CellReading::from_measurements(
        Chemistry::Lfp,
        "Cell_1_LFP",
        Measurements {
            voltage: 3.65,
            current: 0.0,
            temperature: 25.0,
            capacity: 3.0,
        },
        0,
    );
    assert_eq!(r.status, CellStatus::Critical);
    assert!(r.is_out_of_band());
}

#[test]
fn history_keeps_last_100_of_150() {
    let mut h = HistoryBuffer::new();
    for ts in 0..150u64 {
        h.append(HistorySnapshot::new(ts, Vec::new()));
    }
    assert_eq!(h.len(), 100);
    let stamps: Vec<u64> = h.iter().map(|s| s.timestamp_ms).collect();
    assert_eq!(stamps, (50..150).collect::<Vec<_>>());
}

#[test]
fn empty_bank_has_no_summary() {
    assert!(summarize(&[]).is_none());
    let s = session(vec![Chemistry::Lto], 0);
    assert!(s.summary().is_none());
}

#[test]
fn unknown_chemistry_is_rejected() {
    let err = "NiZn".parse::<Chemistry>().unwrap_err();
    assert!(matches!(err, CellbenchError::InvalidChemistry(_)));
}

#[test]
fn monitoring_feeds_trends() {
    let mut s = session(vec![Chemistry::Lfp, Chemistry::Nmc, Chemistry::Lto], 11);
    s.initialize(0);
    s.start();
    for i in 1..=80u64 {
        assert_eq!(s.tick(i * 5_000), TickOutcome::Updated { tick: i });
    }

    for metric in TrendMetric::ALL {
        let series = trend_series(s.history(), metric, TREND_WINDOW);
        assert_eq!(series.len(), 3, "{metric:?}");
        for line in &series {
            assert_eq!(line.points.len(), TREND_WINDOW);
            assert_eq!(line.points.last().unwrap().0, 400_000);
        }
    }

    s.stop();
    assert_eq!(s.tick(999_999), TickOutcome::Idle);
    assert_eq!(s.history().len(), 80);
}

#[test]
fn ticker_drives_session() {
    let mut s = session(vec![Chemistry::LiCoO2], 5);
    s.initialize(0);
    s.start();

    let mut ticker = Ticker::spawn(Duration::from_millis(10));
    let mut updates = 0;
    let mut now = 0;
    while updates < 3 {
        assert!(
            ticker.recv_timeout(Duration::from_secs(2)),
            "ticker stalled after {updates} updates"
        );
        now += 10;
        if let TickOutcome::Updated { .. } = s.tick(now) {
            updates += 1;
        }
    }
    ticker.stop();
    assert_eq!(s.history().len(), 3);
}

#[test]
fn export_round_trip_through_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bench.json");

    let mut s = session(vec![Chemistry::Nmc; 4], 21);
    s.initialize(0);
    s.start();
    s.tick(1_000);

    let written = export_json(&s, &path, 2_000).unwrap();
    let loaded = load_export(&path).unwrap();
    assert_eq!(loaded.readings.len(), 4);
    assert_eq!(loaded.history.len(), 1);
    assert_eq!(loaded.id, written.id);
}

#[test]
fn bench_file_drives_session() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bench.json");
    std::fs::write(
        &path,
        r#"{"bench_name": "Rig-2", "group": 4, "cells": ["LTO", "LiCoO2"]}"#,
    )
    .unwrap();

    let config = BenchConfig::load(&path).unwrap();
    let mut s = MonitorSession::new(config, Box::new(SeededSimulator::new(1))).unwrap();
    s.initialize(0);
    let ids: Vec<&str> = s.readings().iter().map(|r| r.cell_id.as_str()).collect();
    assert_eq!(ids, vec!["Cell_1_LTO", "Cell_2_LiCoO2"]);
}
