use boardarchive::{
    json, parse_str, services_to_string, validate_services, LineEnding, ParseOptions, Schema,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;
use std::hint::black_box;

/// Build archive text with one service, `threads` threads of
/// `posts_per_thread` posts each, and a small user list.
fn generate_archive(threads: usize, posts_per_thread: usize) -> String {
    let mut text = String::new();
    text.push_str("--- Start Archive Service ---\nEntry: 1\nService: Bench Board\n");
    text.push_str("--- Start User List ---\n");
    for user in 1..=10 {
        let _ = write!(
            text,
            "--- Start User Info ---\nUser: {user}\nName: user{user}\nHandle: @user{user}\n\
             Bio:\n--- Start Bio Body ---\nMember number {user}\n--- End Bio Body ---\n\
             --- End User Info ---\n"
        );
    }
    text.push_str("--- End User List ---\n");
    text.push_str("--- Start Categorization List ---\nForums: Forum, SubForum\n--- End Categorization List ---\n");
    text.push_str("--- Start Category List ---\nKind: Forums, Forum\nID: 1\nInSub: 0\nHeadline: General\n--- End Category List ---\n");

    text.push_str("--- Start Message List ---\n");
    for thread in 1..=threads {
        let _ = write!(
            text,
            "--- Start Message Thread ---\nThread: {thread}\nTitle: Topic {thread}\nForum: General\n"
        );
        for post in 1..=posts_per_thread {
            let _ = write!(
                text,
                "--- Start Message Post ---\nAuthor: user{author}\nAuthorID: {author}\n\
                 Time: 12:00\nDate: 2024-01-01\nPost: {post}\nNested: {nested}\nMessage:\n\
                 --- Start Message Body ---\nPost {post} in thread {thread}\n\
                 Second line of the message\n--- End Message Body ---\n--- End Message Post ---\n",
                author = post % 10 + 1,
                nested = post.saturating_sub(1),
            );
        }
        text.push_str("--- End Message Thread ---\n");
    }
    text.push_str("--- End Message List ---\n--- End Archive Service ---\n");
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let options = ParseOptions::default();

    for threads in [10, 100, 500] {
        let text = generate_archive(threads, 10);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &text, |b, text| {
            b.iter(|| black_box(parse_str(text, &options).unwrap()));
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for threads in [10, 100, 500] {
        let services = parse_str(&generate_archive(threads, 10), &ParseOptions::default()).unwrap();
        group.throughput(Throughput::Elements(services[0].post_count() as u64));

        group.bench_with_input(BenchmarkId::new("text", threads), &services, |b, services| {
            b.iter(|| black_box(services_to_string(services, LineEnding::Lf)));
        });
        group.bench_with_input(BenchmarkId::new("json", threads), &services, |b, services| {
            b.iter(|| black_box(json::to_json(services).unwrap()));
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let services = parse_str(&generate_archive(100, 10), &ParseOptions::default()).unwrap();
    let schema = Schema::default();

    c.bench_function("validate_100_threads", |b| {
        b.iter(|| black_box(validate_services(&services, &schema)));
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_validate);
criterion_main!(benches);
