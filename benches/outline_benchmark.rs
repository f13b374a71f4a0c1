//! Benchmarks for pdf-outline inference performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic fragments and synthetic PDF data.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_outline::{Fragment, OutlineExtractor, OutlineOptions};

/// Fragments of a document with a title, numbered sections and body text.
fn create_fragments(page_count: u32) -> Vec<Fragment> {
    let mut fragments = vec![Fragment::new("Benchmark Report", 26.0, 1)
        .bold(true)
        .at(180.0, 60.0)];

    for page in 1..=page_count {
        fragments.push(
            Fragment::new(format!("{}. Section {}", page, page), 18.0, page)
                .bold(true)
                .at(72.0, 120.0),
        );
        for line in 0..30u32 {
            fragments.push(
                Fragment::new(
                    format!("Body text line {} of page {} for the benchmark run.", line, page),
                    10.0,
                    page,
                )
                .at(72.0, 150.0 + line as f32 * 14.0),
            );
        }
    }
    fragments
}

/// Creates a minimal synthetic PDF with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..page_count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 18.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("{}. Section Heading", i + 1))],
            ),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
        ];
        for _ in 0..40 {
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(
                    "Benchmark test content for pdf-outline performance measurement.",
                )],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations }.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    let _ = doc.save_to(&mut data);
    data
}

/// Benchmark the analysis stages on pre-extracted fragments.
fn bench_fragment_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragment_analysis");
    let flat = OutlineExtractor::new();
    let nested = OutlineExtractor::with_options(OutlineOptions::new().nested())
        .unwrap_or_default();

    for page_count in [1, 10, 50].iter() {
        let fragments = create_fragments(*page_count);

        group.bench_function(format!("{}_pages_flat", page_count), |b| {
            b.iter(|| flat.process_fragments(black_box(fragments.clone()), None));
        });
        group.bench_function(format!("{}_pages_nested", page_count), |b| {
            b.iter(|| nested.process_fragments(black_box(fragments.clone()), None));
        });
    }

    group.finish();
}

/// Benchmark extraction plus analysis at various sizes.
fn bench_pdf_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf_outline");
    let extractor = OutlineExtractor::new();

    for page_count in [1, 5, 10].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.process_bytes(black_box(&data)));
        });
    }

    group.finish();
}

/// Benchmark extractor construction, which compiles the heading tables.
fn bench_extractor_creation(c: &mut Criterion) {
    c.bench_function("extractor_creation", |b| {
        b.iter(OutlineExtractor::new);
    });
}

criterion_group!(
    benches,
    bench_fragment_analysis,
    bench_pdf_outline,
    bench_extractor_creation,
);
criterion_main!(benches);
