use dart_detector::board::{BoardMasks, SegmentTable};
use dart_detector::image::{BinaryMask, GrayImageU8};
use dart_detector::source::MemorySource;
use dart_detector::{DartDetector, DartParams};

fn disc(w: usize, h: usize, cx: f32, cy: f32, r: f32) -> BinaryMask {
    let mut m = BinaryMask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r * r {
                m.set(x, y);
            }
        }
    }
    m
}

fn main() {
    // Demo stub: a synthetic board and an empty frame stream
    let (w, h) = (640usize, 480usize);
    let board = BoardMasks::new(
        disc(w, h, 320.0, 240.0, 200.0),
        disc(w, h, 320.0, 240.0, 4.0),
        disc(w, h, 320.0, 240.0, 10.0),
        disc(w, h, 320.0, 240.0, 120.0),
        disc(w, h, 320.0, 240.0, 195.0),
        disc(w, h, 320.0, 240.0, 190.0),
    )
    .expect("synthetic region model");

    let frames = vec![GrayImageU8::new(w, h, vec![40u8; w * h]); 40];
    let mut source = MemorySource::new(frames, 30.0);

    let mut detector = DartDetector::new(board, SegmentTable::standard(), DartParams::default());
    while let Ok(Some(report)) = detector.process_next(&mut source) {
        if report.event.is_some() || report.frame_index % 10 == 0 {
            println!(
                "frame={} status={:?} state={:?} scores={:?} latency_ms={:.3}",
                report.frame_index, report.status, report.state, report.scores, report.latency_ms
            );
        }
    }
}
