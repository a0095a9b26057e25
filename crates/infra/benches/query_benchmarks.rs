use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use invoicedesk_infra::query::{self, QueryParams, SortOrder};
use invoicedesk_infra::repository::sample_invoices;
use invoicedesk_invoicing::{InvoiceItem, invoice_total};

const SIZES: [usize; 3] = [50, 1_000, 10_000];

fn bench_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_paging");

    for count in SIZES {
        let invoices = sample_invoices(count).unwrap();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("default_sort", count), &invoices, |b, invoices| {
            let params = QueryParams::page(3, 10);
            b.iter(|| query::execute(black_box(invoices.clone()), &params));
        });
    }

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_filtering");

    for count in SIZES {
        let invoices = sample_invoices(count).unwrap();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("global_filter", count), &invoices, |b, invoices| {
            let params = QueryParams::page(1, 10).with_global_filter("client 1");
            b.iter(|| query::execute(black_box(invoices.clone()), &params));
        });

        group.bench_with_input(
            BenchmarkId::new("field_filters_sorted", count),
            &invoices,
            |b, invoices| {
                let params = QueryParams::page(1, 10)
                    .with_field_filter("fromName", "company b")
                    .with_field_filter("invoiceDate", "2025-0")
                    .sorted_by("totalAmount", SortOrder::Desc);
                b.iter(|| query::execute(black_box(invoices.clone()), &params));
            },
        );
    }

    group.finish();
}

fn bench_line_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_aggregation");

    for lines in [1usize, 10, 100] {
        let items: Vec<InvoiceItem> = (0..lines)
            .map(|i| InvoiceItem::new(format!("Item {i}"), (i % 7 + 1) as u32, 12.5 * (i + 1) as f64).unwrap())
            .collect();
        group.bench_with_input(BenchmarkId::new("invoice_total", lines), &items, |b, items| {
            b.iter(|| invoice_total(black_box(items)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_paging, bench_filtering, bench_line_aggregation);
criterion_main!(benches);
