use std::hint::black_box;

use classy_ide::{Analysis, FilePosition};
use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use text_size::TextSize;

fn extract_offset(text: &str) -> (TextSize, String) {
    let marker = "$0";
    let pos = text.find(marker).expect("Cursor marker not found");
    let new_text = format!("{}{}", &text[..pos], &text[pos + marker.len()..]);
    (TextSize::from(pos as u32), new_text)
}

fn benchmark_completion(c: &mut Criterion) {
    let analysis = Analysis::default();

    let fixture = "underline sm:(flex items-center) hover:(bg-red-500 text-$0) md:font-bold";
    let (offset, fixture_text) = extract_offset(fixture);

    let file = analysis.add_file("completion", fixture_text);
    let file_position = FilePosition { file, offset };

    c.bench_function("completions", |b| {
        b.iter(|| black_box(analysis.completions(file_position)));
    });
}

criterion_group!(benches, benchmark_completion);
criterion_main!(benches);
