//! Property tests for the sale aggregate.
//!
//! Random sequences of operations are applied to a sale over a small pool of
//! products. Whatever the sequence, the sale must stay internally consistent
//! and rejected operations must not leave a trace.

use std::collections::HashSet;

use domain::{
    AggregateRoot, BranchId, BranchSnapshot, CustomerId, CustomerSnapshot, MAX_QUANTITY_PER_PRODUCT,
    ProductId, ProductSnapshot, Sale, SaleLine,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Op {
    Add { product: usize, quantity: u32, cents: i64 },
    Remove { product: usize },
    CancelItem { product: usize },
    Replace { lines: Vec<(usize, u32)> },
    CancelSale,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..4usize, 0..25u32, 0..10_000i64)
            .prop_map(|(product, quantity, cents)| Op::Add { product, quantity, cents }),
        2 => (0..4usize).prop_map(|product| Op::Remove { product }),
        2 => (0..4usize).prop_map(|product| Op::CancelItem { product }),
        1 => prop::collection::vec((0..4usize, 0..25u32), 0..4)
            .prop_map(|lines| Op::Replace { lines }),
        1 => Just(Op::CancelSale),
    ]
}

fn products() -> Vec<ProductSnapshot> {
    ["Widget", "Gadget", "Gizmo", "Doohickey"]
        .into_iter()
        .map(|name| ProductSnapshot::new(ProductId::new(), name, "", "General").unwrap())
        .collect()
}

fn new_sale() -> Sale {
    let customer = CustomerSnapshot::new(CustomerId::new(), "Ana", "ana@example.com").unwrap();
    let branch = BranchSnapshot::new(BranchId::new(), "Downtown", "1 Main St").unwrap();
    Sale::new("S-PROP", customer, branch).unwrap()
}

/// Applies an operation, returning whether it was accepted.
fn apply(sale: &mut Sale, products: &[ProductSnapshot], op: &Op) -> bool {
    match op {
        Op::Add {
            product,
            quantity,
            cents,
        } => sale
            .add_item(products[*product].clone(), *quantity, Decimal::new(*cents, 2))
            .is_ok(),
        Op::Remove { product } => sale.remove_item(products[*product].id()).is_ok(),
        Op::CancelItem { product } => sale.cancel_item(products[*product].id()).is_ok(),
        Op::Replace { lines } => sale
            .replace_items(lines.iter().map(|(product, quantity)| {
                SaleLine::new(products[*product].clone(), *quantity, Decimal::new(1999, 2))
            }))
            .is_ok(),
        Op::CancelSale => {
            sale.cancel();
            true
        }
    }
}

fn assert_consistent(sale: &Sale) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for item in sale.items() {
        prop_assert!(item.quantity() >= 1);
        prop_assert!(item.quantity() <= MAX_QUANTITY_PER_PRODUCT);
        prop_assert!(seen.insert(item.product_id()), "duplicate product line");
        prop_assert_eq!(
            Ok(item.discount()),
            domain::discount_for(item.quantity(), item.unit_price())
        );
        if item.is_cancelled() {
            prop_assert_eq!(item.total_amount(), Decimal::ZERO);
        }
    }

    let expected: Decimal = sale
        .items()
        .iter()
        .filter(|item| !item.is_cancelled())
        .map(|item| item.total_amount())
        .sum();
    prop_assert_eq!(sale.total_amount(), expected);

    if sale.is_cancelled() {
        prop_assert_eq!(sale.total_amount(), Decimal::ZERO);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        ..ProptestConfig::default()
    })]

    /// Property: the sale stays consistent under any operation sequence.
    #[test]
    fn sale_stays_consistent(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let products = products();
        let mut sale = new_sale();

        for op in &ops {
            apply(&mut sale, &products, op);
            assert_consistent(&sale)?;
        }
    }

    /// Property: a rejected operation leaves state and pending events untouched.
    #[test]
    fn rejected_operations_leave_no_trace(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let products = products();
        let mut sale = new_sale();

        for op in &ops {
            let before = sale.clone();
            if !apply(&mut sale, &products, op) {
                prop_assert_eq!(&sale, &before);
            }
        }
    }

    /// Property: once cancelled, only further cancels are accepted.
    #[test]
    fn cancelled_sale_is_frozen(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let products = products();
        let mut sale = new_sale();
        sale.add_item(products[0].clone(), 2, Decimal::new(500, 2)).unwrap();
        sale.cancel();
        sale.take_events();
        let frozen = sale.clone();

        for op in &ops {
            let accepted = apply(&mut sale, &products, op);
            prop_assert_eq!(accepted, matches!(op, Op::CancelSale));
            prop_assert_eq!(&sale, &frozen);
        }
    }

    /// Property: discount follows the quantity tier for any price.
    #[test]
    fn discount_follows_tier(quantity in 1..=20u32, cents in 0..1_000_000i64) {
        let price = Decimal::new(cents, 2);
        let gross = price * Decimal::from(quantity);
        let discount = domain::discount_for(quantity, price).unwrap();

        let rate = match quantity {
            1..=3 => Decimal::ZERO,
            4..=9 => Decimal::new(10, 2),
            _ => Decimal::new(20, 2),
        };
        prop_assert_eq!(discount, gross * rate);
    }
}
