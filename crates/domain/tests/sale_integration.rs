//! Integration tests for the Sale aggregate.
//!
//! These tests drive the public API the way the application layer does:
//! pricing tiers, line merging, cancellation and event recording.

use domain::{
    AggregateRoot, BranchId, BranchSnapshot, CustomerId, CustomerSnapshot, DomainEvent,
    ProductId, ProductSnapshot, Sale, SaleError, SaleEvent,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn customer() -> CustomerSnapshot {
    CustomerSnapshot::new(CustomerId::new(), "Ana Souza", "ana@example.com").unwrap()
}

fn branch() -> BranchSnapshot {
    BranchSnapshot::new(BranchId::new(), "Downtown", "1 Main St").unwrap()
}

fn product(name: &str) -> ProductSnapshot {
    ProductSnapshot::new(ProductId::new(), name, "", "General").unwrap()
}

fn create_sale(number: &str) -> Sale {
    Sale::new(number, customer(), branch()).unwrap()
}

mod pricing {
    use super::*;

    #[test]
    fn tiers_apply_by_quantity() {
        let cases = [
            (2, dec!(0), dec!(20.00)),
            (5, dec!(5.00), dec!(45.00)),
            (15, dec!(30.00), dec!(120.00)),
        ];

        for (quantity, discount, total) in cases {
            let mut sale = create_sale("S-1");
            let item = product("Widget");
            sale.add_item(item.clone(), quantity, dec!(10.0)).unwrap();

            let line = sale.item(item.id()).unwrap();
            assert_eq!(line.discount(), discount, "discount for {quantity}");
            assert_eq!(line.total_amount(), total, "total for {quantity}");
            assert_eq!(sale.total_amount(), total);
        }
    }

    #[test]
    fn quantity_bound_is_enforced() {
        for quantity in 0..=25 {
            let mut sale = create_sale("S-1");
            let result = sale.add_item(product("Widget"), quantity, dec!(1.00));

            if (1..=20).contains(&quantity) {
                assert!(result.is_ok(), "quantity {quantity} should be accepted");
            } else {
                let err = result.unwrap_err();
                assert_eq!(err, SaleError::QuantityOutOfRange { quantity });
                assert!(err.is_rule_violation());
            }
        }
    }

    #[test]
    fn lines_sum_into_sale_total() {
        let mut sale = create_sale("S-1");
        sale.add_item(product("A"), 2, dec!(10.00)).unwrap();
        sale.add_item(product("B"), 4, dec!(2.50)).unwrap();
        sale.add_item(product("C"), 10, dec!(1.00)).unwrap();

        // 20.00 + 9.00 + 8.00
        assert_eq!(sale.total_amount(), dec!(37.00));
        assert_eq!(sale.total_quantity(), 16);
        assert_eq!(sale.active_item_count(), 3);
    }
}

mod merging {
    use super::*;

    #[test]
    fn same_product_merges_into_one_line() {
        let mut sale = create_sale("S-1");
        let item = product("Widget");

        sale.add_item(item.clone(), 2, dec!(10.00)).unwrap();
        sale.add_item(item.clone(), 3, dec!(10.00)).unwrap();

        assert_eq!(sale.items().len(), 1);
        assert_eq!(sale.item(item.id()).unwrap().quantity(), 5);
    }

    #[test]
    fn merged_quantity_is_bounded() {
        let mut sale = create_sale("S-1");
        let item = product("Widget");
        sale.add_item(item.clone(), 15, dec!(10.00)).unwrap();

        let err = sale.add_item(item.clone(), 10, dec!(10.00)).unwrap_err();

        assert_eq!(err, SaleError::QuantityOutOfRange { quantity: 25 });
        let line = sale.item(item.id()).unwrap();
        assert_eq!(line.quantity(), 15);
        assert_eq!(line.total_amount(), dec!(120.00));
        assert_eq!(sale.total_amount(), dec!(120.00));
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn cancel_sale_freezes_everything() {
        let mut sale = create_sale("S-1");
        let item = product("Widget");
        sale.add_item(item.clone(), 5, dec!(10.00)).unwrap();
        sale.add_item(product("Gadget"), 1, dec!(3.00)).unwrap();

        sale.cancel();
        assert!(sale.is_cancelled());
        assert!(sale.items().iter().all(|line| line.is_cancelled()));
        assert_eq!(sale.total_amount(), Decimal::ZERO);
        sale.take_events();

        let before = sale.clone();
        assert!(
            sale.add_item(product("New"), 1, dec!(1.00))
                .unwrap_err()
                .is_rule_violation()
        );
        assert!(sale.remove_item(item.id()).unwrap_err().is_rule_violation());
        assert!(sale.cancel_item(item.id()).unwrap_err().is_rule_violation());
        assert!(
            sale.update_sale_number("S-2")
                .unwrap_err()
                .is_rule_violation()
        );
        assert_eq!(sale, before);

        sale.cancel();
        assert!(!sale.has_pending_events());
    }

    #[test]
    fn cancel_item_is_idempotent() {
        let mut sale = create_sale("S-1");
        let item = product("Widget");
        sale.add_item(item.clone(), 5, dec!(10.00)).unwrap();
        sale.add_item(product("Gadget"), 2, dec!(3.00)).unwrap();

        assert!(sale.cancel_item(item.id()).unwrap());
        let total = sale.total_amount();
        let event_count = sale.pending_events().len();

        assert!(sale.cancel_item(item.id()).unwrap());
        assert_eq!(sale.total_amount(), total);
        assert_eq!(sale.pending_events().len(), event_count);
    }
}

mod events {
    use super::*;

    #[test]
    fn events_are_recorded_in_order() {
        let mut sale = create_sale("S-1");
        let item = product("Widget");
        sale.add_item(item.clone(), 3, dec!(1.00)).unwrap();
        sale.update_sale_number("S-1B").unwrap();
        sale.cancel_item(item.id()).unwrap();
        sale.cancel();

        let events = sale.take_events();
        let types: Vec<_> = events.iter().map(|event| event.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "SaleCreated",
                "SaleModified",
                "SaleModified",
                "ItemCancelled",
                "SaleCancelled"
            ]
        );
        assert!(events.iter().all(|event| event.sale_id() == sale.id()));
        assert_eq!(events[3].sale_number(), "S-1B");
        assert!(sale.take_events().is_empty());
    }

    #[test]
    fn failed_operations_record_nothing() {
        let mut sale = create_sale("S-1");
        sale.take_events();

        let _ = sale.add_item(product("Widget"), 21, dec!(1.00));
        let _ = sale.update_sale_number("   ");

        assert!(sale.take_events().is_empty());
    }
}

#[test]
fn full_sale_scenario() {
    let mut sale = create_sale("S-1");
    let prod_a = product("Product A");

    sale.add_item(prod_a.clone(), 5, dec!(10.00)).unwrap();
    assert_eq!(sale.total_amount(), dec!(45.00));

    sale.add_item(prod_a.clone(), 6, dec!(10.00)).unwrap();
    let line = sale.item(prod_a.id()).unwrap();
    assert_eq!(line.quantity(), 11);
    assert_eq!(line.discount(), dec!(22.00));
    assert_eq!(line.total_amount(), dec!(88.00));
    assert_eq!(sale.total_amount(), dec!(88.00));

    assert!(sale.cancel_item(prod_a.id()).unwrap());
    assert_eq!(sale.total_amount(), Decimal::ZERO);

    sale.cancel();
    assert!(sale.is_cancelled());

    let events = sale.take_events();
    assert!(matches!(events.first(), Some(SaleEvent::SaleCreated(_))));
    assert!(matches!(events.last(), Some(SaleEvent::SaleCancelled(_))));
}
