use criterion::{Criterion, criterion_group, criterion_main};
use passage_sequence_engine::editing::{BreakpointCollection, PositionTracker};
use passage_sequence_engine::models::{Breakpoint, Command, CommandContent};

fn generate_passage(command_count: usize) -> (Vec<Command>, BreakpointCollection) {
    let commands = (0..command_count)
        .map(|i| {
            Command::with_content(CommandContent::Dialog {
                speaker: Some("Narrator".to_string()),
                text: format!("Line {i}"),
            })
        })
        .collect();
    let mut breakpoints = BreakpointCollection::new();
    for slot in (0..=command_count).step_by(5) {
        breakpoints.add_to_slot(slot, Breakpoint::new(format!("Mark {slot}")));
    }
    (commands, breakpoints)
}

fn bench_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker");
    group.sample_size(20);

    let (commands, breakpoints) = generate_passage(500);
    let tracker = PositionTracker::build(&commands, &breakpoints);

    group.bench_function("build", |b| {
        b.iter(|| {
            let tracker = PositionTracker::build(
                std::hint::black_box(&commands),
                std::hint::black_box(&breakpoints),
            );
            std::hint::black_box(tracker);
        });
    });

    group.bench_function("evaluate", |b| {
        b.iter(|| std::hint::black_box(tracker.evaluate()));
    });

    group.bench_function("move_first_to_last", |b| {
        let last = tracker.len() - 1;
        b.iter(|| std::hint::black_box(tracker.with_move(0, std::hint::black_box(last))));
    });

    group.finish();
}

criterion_group!(benches, bench_tracker);
criterion_main!(benches);
