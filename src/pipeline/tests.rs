use super::*;
use crate::diagnostics::{NullSink, RecordingSink};
use crate::geo::WorldPoint;
use crate::output::MemorySink;

const W: usize = 10;
const H: usize = 10;

fn grid_with(pixels: &[(usize, usize)]) -> Vec<u8> {
    let mut data = vec![0u8; W * H];
    for &(x, y) in pixels {
        data[y * W + x] = crate::image::FOREGROUND;
    }
    data
}

// Unit cells centred on the grid: pixel (c, r) <-> world (c - 5, 5 - r).
fn geo(tolerance_px: u32) -> GeoReference {
    GeoReference {
        cell_size: 1.0,
        cell_size_x: 1.0,
        cell_size_y: 1.0,
        center_x: 0.0,
        center_y: 0.0,
        width: W,
        height: H,
        tolerance_px,
    }
}

fn record(line: usize, ref_id: i32, pixels: &[(i32, i32)]) -> ReferenceRecord {
    ReferenceRecord {
        line,
        ref_id,
        points: pixels
            .iter()
            .map(|&(c, r)| WorldPoint::new(f64::from(c - 5), f64::from(5 - r)))
            .collect(),
    }
}

#[test]
fn rejects_grid_that_disagrees_with_geo_reference() {
    let data = vec![0u8; 8 * 8];
    let grid = PixelGrid::new(8, 8, &data);
    let err = Vectorizer::new(grid, geo(2)).unwrap_err();
    assert!(matches!(err, VectorizeError::Config(_)));
}

#[test]
fn collinear_reference_on_contiguous_line_matches_fully() {
    let data = grid_with(&[(3, 5), (4, 5), (5, 5)]);
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo(2)).unwrap();
    let outcome = vectorizer
        .process_record(&record(2, 11, &[(3, 5), (4, 5), (5, 5)]), &mut NullSink)
        .unwrap();
    let (feature, quality) = match outcome {
        FeatureOutcome::Matched { feature, quality } => (feature, quality),
        other => panic!("expected a match, got {other:?}"),
    };
    assert_eq!(feature.ref_id, 11);
    assert_eq!(quality.matched_count, 3);
    assert_eq!(quality.reference_count, 3);
    assert_eq!(quality.match_percent, 100.0);
    assert_eq!(quality.mean_px, 0.0);
    assert!(quality.stdev_px >= 0.0);
}

#[test]
fn consumed_single_pixel_yields_single_point_only() {
    let data = grid_with(&[(5, 5)]);
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo(2)).unwrap();
    let outcome = vectorizer
        .process_record(&record(2, 4, &[(5, 5), (5, 6)]), &mut NullSink)
        .unwrap();
    match outcome {
        FeatureOutcome::Failed(failure) => {
            assert_eq!(failure.ref_id, 4);
            assert_eq!(failure.reason, FailureReason::SinglePointOnly);
            assert_eq!(failure.reference.len(), 2);
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn run_counts_outcomes_and_feeds_sink_in_order() {
    let data = grid_with(&[(1, 1), (2, 1), (3, 1), (5, 5), (7, 8), (8, 8)]);
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo(1))
        .unwrap()
        .with_declared_references(4);
    let records = vec![
        Ok(record(2, 1, &[(1, 1), (2, 1), (3, 1)])),
        Ok(record(3, 2, &[(5, 5), (5, 6)])),
        Ok(record(4, 3, &[(0, 9), (1, 9)])),
        Ok(record(5, 4, &[(7, 8), (8, 8)])),
    ];
    let mut out = MemorySink::default();
    let summary = vectorizer.run(records, &mut out, &mut NullSink).unwrap();

    assert_eq!(summary.declared_references, Some(4));
    assert_eq!(summary.attempted, 4);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.single_point_only, 1);
    assert_eq!(summary.no_start_point, 1);
    assert_eq!(summary.failed(), 2);
    assert_eq!(summary.headline(), "Found and wrote 2 of 4 features");
    assert!(summary.timings.stage_ms("follow").is_some());

    let ids: Vec<(usize, i32)> = out
        .matches
        .iter()
        .map(|f| (f.index, f.feature.ref_id))
        .collect();
    assert_eq!(ids, vec![(0, 1), (1, 4)]);
    let failures: Vec<FailureReason> = out.failures.iter().map(|f| f.reason).collect();
    assert_eq!(
        failures,
        vec![FailureReason::SinglePointOnly, FailureReason::NoStartPoint]
    );
    assert_eq!(out.summary.as_ref().map(|s| s.matched), Some(2));
}

#[test]
fn record_local_errors_are_skipped_and_traced() {
    let data = grid_with(&[(1, 1), (2, 1)]);
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo(1)).unwrap();
    let records = vec![
        Err(VectorizeError::malformed(2, "missing coordinates")),
        Ok(record(3, 7, &[(1, 1)])),
        Ok(record(4, 8, &[(1, 1), (2, 1)])),
    ];
    let mut out = MemorySink::default();
    let mut trace = RecordingSink::new();
    let summary = vectorizer.run(records, &mut out, &mut trace).unwrap();

    assert_eq!(summary.skipped_records, 2);
    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.matched, 1);
    let skipped: Vec<Option<usize>> = trace
        .events()
        .iter()
        .filter_map(|e| match e {
            TraceEvent::RecordSkipped { line, .. } => Some(*line),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![Some(2), Some(3)]);
}

#[test]
fn undecodable_and_distant_records_do_not_stop_the_run() {
    use crate::input::ParameterFile;
    use std::io::Cursor;

    let data = grid_with(&[(5, 5), (6, 4)]);
    let text: &[u8] = b"3 0 0 1 1 1 7 1\n\
        1 0 0, 1 1\xff\n\
        2 3000000000 0, 0 0\n\
        3 0 0, 1 1\n";
    let (params, records) = ParameterFile::from_reader(Cursor::new(text)).unwrap();
    let geo = params.geo_reference(W, H).unwrap();
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo).unwrap();
    let mut out = MemorySink::default();
    let mut trace = RecordingSink::new();
    let summary = vectorizer.run(records, &mut out, &mut trace).unwrap();

    assert_eq!(summary.skipped_records, 2);
    assert_eq!(summary.matched, 1);
    assert_eq!(out.matches[0].feature.ref_id, 3);
    let skipped: Vec<Option<usize>> = trace
        .events()
        .iter()
        .filter_map(|e| match e {
            TraceEvent::RecordSkipped { line, .. } => Some(*line),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![Some(2), Some(3)]);
}

#[test]
fn fatal_error_stops_run_after_earlier_features() {
    let data = grid_with(&[(1, 1), (2, 1)]);
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo(1)).unwrap();
    let records = vec![
        Ok(record(2, 1, &[(1, 1), (2, 1)])),
        Err(VectorizeError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ))),
        Ok(record(4, 2, &[(1, 1), (2, 1)])),
    ];
    let mut out = MemorySink::default();
    let err = vectorizer.run(records, &mut out, &mut NullSink).unwrap_err();
    assert!(matches!(err, VectorizeError::Io(_)));
    assert_eq!(out.matches.len(), 1);
    assert!(out.summary.is_none());
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_run_matches_sequential_run() {
    let data = grid_with(&[(1, 1), (2, 1), (3, 1), (2, 2), (5, 5), (6, 6), (7, 7), (8, 8)]);
    let vectorizer = Vectorizer::new(PixelGrid::new(W, H, &data), geo(2)).unwrap();
    let records = || {
        vec![
            Ok(record(2, 1, &[(1, 1), (2, 1), (3, 1)])),
            Err(VectorizeError::malformed(3, "bad coordinate")),
            Ok(record(4, 2, &[(5, 5), (6, 6), (7, 7), (8, 8)])),
            Ok(record(5, 3, &[(0, 9), (0, 8)])),
            Ok(record(6, 4, &[(2, 2), (3, 3)])),
        ]
    };

    let mut seq_out = MemorySink::default();
    let mut seq_trace = RecordingSink::new();
    let seq = vectorizer
        .run(records(), &mut seq_out, &mut seq_trace)
        .unwrap();

    let mut par_out = MemorySink::default();
    let mut par_trace = RecordingSink::new();
    let par = vectorizer
        .run_parallel(records(), &mut par_out, &mut par_trace)
        .unwrap();

    assert_eq!(seq_out.matches, par_out.matches);
    assert_eq!(seq_out.failures, par_out.failures);
    assert_eq!(seq_trace.events(), par_trace.events());
    assert_eq!(
        (seq.attempted, seq.matched, seq.skipped_records),
        (par.attempted, par.matched, par.skipped_records)
    );
}
