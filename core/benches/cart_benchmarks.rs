use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use storefront::models::{PaymentMethod, Product, ShippingInfo};
use storefront::{
  generate_products, CartStore, CheckoutEntry, CheckoutFlow, DataAccess, InMemoryBackend, RedirectMemory,
  SubmitOutcome,
};
use tokio::runtime::Runtime;

fn seeded_catalog(per_category: usize) -> Vec<Product> {
  InMemoryBackend::new().seed_products(generate_products(per_category))
}

fn bench_cart_mutations(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartMutations");

  for per_category in [4usize, 32, 128] {
    let catalog = seeded_catalog(per_category);
    group.throughput(Throughput::Elements(catalog.len() as u64));

    group.bench_with_input(BenchmarkId::new("add_merge", catalog.len()), &catalog, |b, catalog| {
      b.iter_batched(
        CartStore::new,
        |cart| {
          // Second pass hits the merge path for every line.
          for product in catalog.iter().chain(catalog.iter()) {
            cart.add_to_cart(product);
          }
          cart
        },
        BatchSize::SmallInput,
      );
    });

    group.bench_with_input(BenchmarkId::new("update_then_total", catalog.len()), &catalog, |b, catalog| {
      let cart = CartStore::new();
      for product in catalog {
        cart.add_to_cart(product);
      }
      b.iter(|| {
        for (idx, product) in catalog.iter().enumerate() {
          cart.update_quantity(product.id, (idx % 5 + 1) as i64);
        }
        (cart.count(), cart.total())
      });
    });
  }
  group.finish();
}

fn bench_checkout_submit(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let backend = Arc::new(InMemoryBackend::new());
  rt.block_on(async {
    backend.sign_up("bench@example.com", "bench-pass").await.unwrap();
    backend.sign_in("bench@example.com", "bench-pass").await.unwrap();
  });
  let data: Arc<dyn DataAccess> = backend.clone();
  let catalog = seeded_catalog(4);
  let shipping = ShippingInfo {
    name: "Bench".to_string(),
    address: "1 Loop Rd".to_string(),
    city: "Pune".to_string(),
    state: "MH".to_string(),
    zip: "411001".to_string(),
  };

  c.bench_function("checkout_submit_cod", |b| {
    b.iter_batched(
      || {
        let cart = CartStore::new();
        for product in &catalog {
          cart.add_to_cart(product);
        }
        let flow = match CheckoutFlow::enter(data.clone(), cart, RedirectMemory::new()) {
          CheckoutEntry::Ready(flow) => flow,
          CheckoutEntry::RedirectToCart => unreachable!("cart was filled"),
        };
        flow.set_shipping(shipping.clone()).unwrap();
        flow.select_payment_method(PaymentMethod::Cod).unwrap();
        flow
      },
      |flow| {
        let outcome = rt.block_on(flow.submit());
        assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));
      },
      BatchSize::SmallInput,
    );
  });
}

criterion_group!(benches, bench_cart_mutations, bench_checkout_submit);
criterion_main!(benches);
