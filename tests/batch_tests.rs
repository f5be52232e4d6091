
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use test_helpers::{broken, gradient_png, input, noise_png};
use webp_batch::core::ItemOutcome;
use webp_batch::{
    BatchEvent, BatchOrchestrator, ConversionParams, ConversionPipeline, ConverterError, ConverterResult,
    ConverterSession, ErrorKind, NativeCodec, OutputFormat, ProgressUpdate, RasterCodec, ResizePolicy,
    ZipBundler, bundle_session, progress_channel,
};

fn progress_of(events: &[BatchEvent]) -> Vec<ProgressUpdate> {
    events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress(update) => Some(update.clone()),
            BatchEvent::Complete(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn failed_item_does_not_abort_or_reorder() {
    let mut session = ConverterSession::new();
    session.add_images([
        input("a.png", gradient_png(30, 20)),
        broken("b.png"),
        input("c.jpg", gradient_png(10, 10)),
    ]);

    let events = Mutex::new(Vec::new());
    let emitter = |event: BatchEvent| events.lock().unwrap().push(event);
    let summary = BatchOrchestrator::default()
        .run(&mut session, &ConversionParams::default(), &emitter)
        .await;

    let names: Vec<_> = summary.results.iter().map(|r| r.output_name()).collect();
    assert_eq!(names, vec!["a.webp", "c.webp"]);
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded(), 2);
    assert!(!summary.cancelled);

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].input.name(), "b.png");
    assert_eq!(summary.failures[0].kind(), ErrorKind::Decode);

    // The session holds the same outcome as the summary.
    assert_eq!(session.results(), summary.results.as_slice());
    assert_eq!(session.failures(), summary.failures.as_slice());

    let events = events.into_inner().unwrap();
    let outcomes: Vec<_> = progress_of(&events).iter().map(|u| u.outcome).collect();
    assert_eq!(
        outcomes,
        vec![ItemOutcome::Converted, ItemOutcome::Failed(ErrorKind::Decode), ItemOutcome::Converted]
    );
    assert!(matches!(events.last(), Some(BatchEvent::Complete(s)) if s == &summary));
}

#[tokio::test]
async fn progress_is_monotonic_and_ends_at_100() {
    let mut session = ConverterSession::new();
    session.add_images((0..7).map(|i| {
        if i % 3 == 1 {
            broken(&format!("bad{i}.png"))
        } else {
            input(&format!("img{i}.png"), gradient_png(8 + i, 6))
        }
    }));

    let events = Mutex::new(Vec::new());
    let emitter = |event: BatchEvent| events.lock().unwrap().push(event);
    BatchOrchestrator::default()
        .run(&mut session, &ConversionParams::default(), &emitter)
        .await;

    let updates = progress_of(&events.into_inner().unwrap());
    assert_eq!(updates.len(), 7);
    assert!(updates.windows(2).all(|w| w[0].percent <= w[1].percent));
    assert_eq!(updates.last().unwrap().percent, 100);
    assert!(updates.iter().enumerate().all(|(i, u)| u.completed_count == i + 1 && u.total_count == 7));
}

#[tokio::test]
async fn resize_policy_applies_to_every_image() {
    let mut session = ConverterSession::new();
    session.add_images([input("wide.png", gradient_png(1000, 500)), input("tall.png", gradient_png(200, 800))]);

    let params = ConversionParams::new(0.7, ResizePolicy::FixedWidth { width: 400 });
    let summary = BatchOrchestrator::default().run(&mut session, &params, &|_: BatchEvent| {}).await;

    let dims: Vec<_> = summary.results.iter().map(|r| r.dimensions()).collect();
    assert_eq!(dims, vec![(400, 200), (400, 1600)]);

    for result in &summary.results {
        let decoded = image::load_from_memory(result.output_bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), result.dimensions());
    }
}

#[tokio::test]
async fn higher_quality_is_not_smaller() {
    let inputs: Vec<_> = (0..3).map(|seed| input("noise.png", noise_png(64, 64, seed))).collect();
    let pipeline = ConversionPipeline::default();

    let mut low_total = 0;
    let mut high_total = 0;
    for source in &inputs {
        let low = pipeline
            .convert(source, &ConversionParams::new(0.1, ResizePolicy::NoResize))
            .await
            .unwrap();
        let high = pipeline
            .convert(source, &ConversionParams::new(0.9, ResizePolicy::NoResize))
            .await
            .unwrap();
        low_total += low.output_size();
        high_total += high.output_size();
    }

    assert!(high_total >= low_total, "q0.9 = {high_total} bytes, q0.1 = {low_total} bytes");
}

#[tokio::test]
async fn archive_has_one_entry_per_result() {
    let mut session = ConverterSession::new();
    session.add_images([
        input("one.png", gradient_png(12, 12)),
        broken("two.png"),
        input("three.png", gradient_png(12, 12)),
        input("four.bmp", gradient_png(12, 12)),
    ]);
    let summary = BatchOrchestrator::default()
        .run(&mut session, &ConversionParams::default(), &|_: BatchEvent| {})
        .await;
    assert_eq!(summary.succeeded(), 3);

    let bytes = bundle_session(&session, &ZipBundler::default()).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 3);

    let mut names = HashSet::new();
    for i in 0..archive.len() {
        names.insert(archive.by_index(i).unwrap().name().to_string());
    }
    let expected: HashSet<String> = ["one.webp", "three.webp", "four.webp"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn archive_dedupes_colliding_output_names() {
    let mut session = ConverterSession::new();
    session.add_images([
        input("photo.png", gradient_png(5, 5)),
        input("photo.jpg", gradient_png(5, 5)),
        input("photo", gradient_png(5, 5)),
    ]);
    BatchOrchestrator::default()
        .run(&mut session, &ConversionParams::default(), &|_: BatchEvent| {})
        .await;

    let bytes = bundle_session(&session, &ZipBundler::default()).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<_> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["photo.webp", "photo (1).webp", "photo (2).webp"]);
}

#[tokio::test]
async fn empty_session_cannot_be_bundled() {
    let session = ConverterSession::new();
    let err = bundle_session(&session, &ZipBundler::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Archive);
}

#[tokio::test]
async fn rerun_and_reset_clear_previous_outcome() {
    let orchestrator = BatchOrchestrator::default();
    let mut session = ConverterSession::new();
    session.add_images([input("a.png", gradient_png(4, 4)), broken("b.png")]);

    orchestrator.run(&mut session, &ConversionParams::default(), &|_: BatchEvent| {}).await;
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.failures().len(), 1);

    // A second run replaces rather than merges.
    let again = orchestrator.run(&mut session, &ConversionParams::default(), &|_: BatchEvent| {}).await;
    assert_eq!(again.results.len(), 1);
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.failures().len(), 1);

    let mut session = session.reset();
    assert!(session.results().is_empty());
    assert!(session.failures().is_empty());

    let summary = orchestrator.run(&mut session, &ConversionParams::default(), &|_: BatchEvent| {}).await;
    assert_eq!(summary.total, 0);
    assert!(summary.results.is_empty());
    assert!(summary.failures.is_empty());
}

#[tokio::test]
async fn cancel_stops_between_items() {
    let orchestrator = BatchOrchestrator::default();
    let cancel = orchestrator.cancel_flag();
    let mut session = ConverterSession::new();
    session.add_images((0..4).map(|i| input(&format!("{i}.png"), gradient_png(6, 6))));

    let emitter = move |event: BatchEvent| {
        if let BatchEvent::Progress(update) = event {
            if update.completed_count == 2 {
                cancel.cancel();
            }
        }
    };
    let summary = orchestrator.run(&mut session, &ConversionParams::default(), &emitter).await;

    assert!(summary.cancelled);
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded(), 2);

    // The flag is cleared when the cancelled run returns.
    let summary = orchestrator.run(&mut session, &ConversionParams::default(), &|_: BatchEvent| {}).await;
    assert!(!summary.cancelled);
    assert_eq!(summary.attempted, 4);
}

#[tokio::test]
async fn cancel_before_first_poll_is_not_lost() {
    let orchestrator = BatchOrchestrator::default();
    let mut session = ConverterSession::new();
    session.add_images([input("a.png", gradient_png(4, 4)), input("b.png", gradient_png(4, 4))]);

    let params = ConversionParams::default();
    let noop = |_: BatchEvent| {};
    let run = orchestrator.run(&mut session, &params, &noop);
    orchestrator.cancel_flag().cancel();
    let summary = run.await;

    assert!(summary.cancelled);
    assert_eq!(summary.attempted, 0);
    assert!(!orchestrator.cancel_flag().is_cancelled());
}

/// Decodes normally but refuses to encode anything.
struct RejectingCodec;

impl RasterCodec for RejectingCodec {
    fn decode(&self, bytes: &[u8]) -> ConverterResult<DynamicImage> {
        NativeCodec.decode(bytes)
    }

    fn encode(&self, _: &DynamicImage, _: OutputFormat, _: f32) -> ConverterResult<Vec<u8>> {
        Err(ConverterError::encode("encoder returned no output"))
    }
}

#[tokio::test]
async fn encode_failures_are_recorded_per_item() {
    let orchestrator = BatchOrchestrator::new(ConversionPipeline::new(Arc::new(RejectingCodec)));
    let mut session = ConverterSession::new();
    session.add_images([input("a.png", gradient_png(4, 4)), broken("b.png")]);

    let events = Mutex::new(Vec::new());
    let emitter = |event: BatchEvent| events.lock().unwrap().push(event);
    let summary = orchestrator.run(&mut session, &ConversionParams::default(), &emitter).await;

    assert_eq!(summary.succeeded(), 0);
    let kinds: Vec<_> = summary.failures.iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, vec![ErrorKind::Encode, ErrorKind::Decode]);
    assert_eq!(progress_of(&events.into_inner().unwrap()).last().unwrap().percent, 100);
}

#[tokio::test]
async fn events_stream_through_a_channel() {
    let mut session = ConverterSession::new();
    session.add_images([input("a.png", gradient_png(4, 4)), input("b.png", gradient_png(4, 4))]);

    let (emitter, mut rx) = progress_channel();
    let run = tokio::spawn(async move {
        let summary = BatchOrchestrator::default()
            .run(&mut session, &ConversionParams::default(), &emitter)
            .await;
        (session, summary)
    });

    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        seen.push(event);
    }
    let (session, summary) = run.await.unwrap();

    assert_eq!(seen.len(), 3);
    assert!(matches!(&seen[0], BatchEvent::Progress(u) if u.file_name == "a.png" && u.percent == 50));
    assert!(matches!(&seen[1], BatchEvent::Progress(u) if u.file_name == "b.png" && u.percent == 100));
    assert!(matches!(&seen[2], BatchEvent::Complete(s) if s.succeeded() == 2));
    assert_eq!(session.results().len(), summary.succeeded());
}
