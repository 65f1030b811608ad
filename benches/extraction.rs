//! Benchmarks for page parsing and extraction.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use n2import::dom::{ParserMode, parse};
use n2import::{ContentPage, extract_page, write_content_xml};

/// Build a page with `zones` zones of `parts` parts, three attributes each.
fn sample_page(zones: usize, parts: usize) -> String {
    let mut html = String::from(
        r#"<html><head><title>Bench</title><meta name="N2:Type" content="TextPage" /></head><body>"#,
    );
    for z in 0..zones {
        html.push_str(&format!(r#"<div class="N2_Zone" id="Zone{z}">"#));
        for p in 0..parts {
            html.push_str(&format!(
                r#"<div class="N2_Part item{p}">
                     <div class="N2_Attribute title">Item <b>{p}</b></div>
                     <div class="N2_Attribute body"><p>Some text<!-- note --> with <a href="/x">a link</a>.</p></div>
                     <div class="N2_Attribute when">2024-01-0{}</div>
                   </div>"#,
                p % 9 + 1
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</body></html>");
    html
}

fn bench_parse(c: &mut Criterion) {
    let html = sample_page(4, 50);
    c.bench_function("parse_xml", |b| {
        b.iter(|| parse(&html, ParserMode::Xml).unwrap());
    });
    c.bench_function("parse_html", |b| {
        b.iter(|| parse(&html, ParserMode::Html).unwrap());
    });
}

fn bench_extract(c: &mut Criterion) {
    let html = sample_page(4, 50);
    let dom = parse(&html, ParserMode::Xml).unwrap();
    c.bench_function("extract_page", |b| {
        b.iter(|| extract_page(&dom).unwrap());
    });
}

fn bench_write_xml(c: &mut Criterion) {
    let html = sample_page(4, 50);
    let dom = parse(&html, ParserMode::Xml).unwrap();
    let mut page = ContentPage::new("Documentation/index.htm");
    page.zones = extract_page(&dom).unwrap().zones;
    let pages = vec![page];

    c.bench_function("write_content_xml", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            write_content_xml(&pages, &mut out).unwrap();
            out
        });
    });
}

criterion_group!(benches, bench_parse, bench_extract, bench_write_xml);
criterion_main!(benches);
