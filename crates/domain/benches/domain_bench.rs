use common::ObjectId;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use document_store::InMemoryDocumentStore;
use domain::{Cart, Order, OrderPatch, OrderService, RawCartItem, RawOrderItem, compute_total};

const ADDRESS: &str = "65a1b2c3d4e5f60718293a4e";

fn raw_cart_items(count: usize) -> Vec<RawCartItem> {
    (0..count)
        .map(|i| RawCartItem::new(ObjectId::new().to_hex(), format!("{}.99", i + 1), (i % 5) + 1))
        .collect()
}

fn raw_order_items(count: usize) -> Vec<RawOrderItem> {
    (0..count)
        .map(|i| {
            RawOrderItem::new(
                ObjectId::new().to_hex(),
                format!("Product {i}"),
                format!("{}.995", i + 1),
                (i % 3) + 1,
            )
        })
        .collect()
}

fn bench_cart_snapshot(c: &mut Criterion) {
    let user = ObjectId::new().to_hex();
    let mut group = c.benchmark_group("domain/cart_new");

    for count in [1, 10, 100] {
        let items = raw_cart_items(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| Cart::new(&user, items.clone()).unwrap());
        });
    }
    group.finish();
}

fn bench_compute_total(c: &mut Criterion) {
    let user = ObjectId::new().to_hex();
    let order = Order::new(&user, raw_order_items(100), "pending", ADDRESS, None).unwrap();

    c.bench_function("domain/compute_total_100", |b| {
        b.iter(|| compute_total(order.items()));
    });
}

fn bench_order_update(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = OrderService::new(InMemoryDocumentStore::new());
    let user = ObjectId::new().to_hex();
    let order = Order::new(&user, raw_order_items(10), "pending", ADDRESS, Some("pix")).unwrap();
    let id = rt
        .block_on(async { service.insert(&order).await.unwrap() })
        .to_hex();

    c.bench_function("domain/order_replace_items", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.replace_items(&id, raw_order_items(10)).await.unwrap();
            });
        });
    });

    c.bench_function("domain/order_update_status", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .update(&id, OrderPatch::status("processing"))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_cart_snapshot,
    bench_compute_total,
    bench_order_update
);
criterion_main!(benches);
