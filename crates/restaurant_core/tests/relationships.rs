use chrono::NaiveDate;
use restaurant_core::{
    audit, Customer, Dish, LinkOutcome, Menu, Order, Payment, PaymentMethod, Registry,
    RelationError, RemovalPolicy,
};

fn placed_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2031, 1, 15)
        .unwrap()
        .and_hms_opt(12, 15, 0)
        .unwrap()
}

fn dish(id: u32, name: &str) -> Dish {
    Dish::new(id, name, "Italian", 1_100, vec!["tomato".into(), "basil".into()]).unwrap()
}

#[test]
fn add_then_remove_order_clears_both_sides() {
    let mut registry = Registry::new();
    registry.register(Customer::new(1).unwrap()).unwrap();
    registry.register(Order::new(7, placed_at()).unwrap()).unwrap();

    assert_eq!(registry.add_order(1, 7).unwrap(), LinkOutcome::Changed);
    assert_eq!(registry.extent::<Customer>().get(1).unwrap().order_ids(), &[7]);
    assert_eq!(registry.extent::<Order>().get(7).unwrap().customer_id(), Some(1));
    assert!(audit(&registry).is_empty());

    registry.remove_order(1, 7).unwrap();
    assert_eq!(registry.extent::<Order>().get(7).unwrap().customer_id(), None);
    assert!(registry.extent::<Customer>().get(1).unwrap().order_ids().is_empty());
    assert!(audit(&registry).is_empty());
}

#[test]
fn adding_same_link_twice_is_a_noop() {
    let mut registry = Registry::new();
    registry.register(Customer::new(1).unwrap()).unwrap();
    registry.register(Order::new(7, placed_at()).unwrap()).unwrap();
    registry.add_order(1, 7).unwrap();
    assert_eq!(registry.add_order(1, 7).unwrap(), LinkOutcome::Unchanged);
    assert_eq!(registry.extent::<Customer>().get(1).unwrap().order_ids(), &[7]);
}

#[test]
fn moving_order_between_customers_keeps_mirror() {
    let mut registry = Registry::new();
    registry.register(Customer::new(1).unwrap()).unwrap();
    registry.register(Customer::new(2).unwrap()).unwrap();
    registry.register(Order::new(7, placed_at()).unwrap()).unwrap();

    registry.add_order(1, 7).unwrap();
    registry.assign_order_customer(7, Some(2)).unwrap();

    assert!(registry.extent::<Customer>().get(1).unwrap().order_ids().is_empty());
    assert_eq!(registry.extent::<Customer>().get(2).unwrap().order_ids(), &[7]);
    assert!(audit(&registry).is_empty());
}

#[test]
fn removing_unlisted_order_is_reported_without_change() {
    let mut registry = Registry::new();
    registry.register(Customer::new(1).unwrap()).unwrap();
    registry.register(Customer::new(2).unwrap()).unwrap();
    registry.register(Order::new(7, placed_at()).unwrap()).unwrap();
    registry.add_order(2, 7).unwrap();

    assert!(matches!(
        registry.remove_order(1, 7),
        Err(RelationError::NotLinked { .. })
    ));
    assert_eq!(registry.extent::<Order>().get(7).unwrap().customer_id(), Some(2));
}

#[test]
fn linking_unknown_entities_is_not_found() {
    let mut registry = Registry::new();
    registry.register(Customer::new(1).unwrap()).unwrap();
    assert!(matches!(
        registry.add_order(1, 99),
        Err(RelationError::NotFound(entity)) if entity.kind == "Order"
    ));
    assert!(matches!(
        registry.add_order(5, 99),
        Err(RelationError::NotFound(_))
    ));
}

#[test]
fn menu_dish_cascade_leaves_no_dangling_links() {
    let mut registry = Registry::new();
    registry.register(Menu::new(1, "Dinner", "A la carte").unwrap()).unwrap();
    registry.register(dish(10, "Margherita")).unwrap();
    registry.register(dish(11, "Marinara")).unwrap();
    registry.add_dish(1, 10).unwrap();
    registry.add_dish(1, 11).unwrap();

    registry.delete_dish(10).unwrap();
    assert_eq!(registry.extent::<Menu>().get(1).unwrap().dish_ids(), &[11]);
    assert!(audit(&registry).is_empty());

    assert!(matches!(
        registry.delete_menu(1, RemovalPolicy::Reject),
        Err(RelationError::HasDependents { dependents: 1, .. })
    ));
    registry.delete_menu(1, RemovalPolicy::Detach).unwrap();
    assert_eq!(registry.extent::<Dish>().get(11).unwrap().menu_id(), None);
    assert!(audit(&registry).is_empty());
}

#[test]
fn customer_removal_with_detach_orphans_orders() {
    let mut registry = Registry::new();
    registry.register(Customer::member(1, Some("ana@example.com".into())).unwrap()).unwrap();
    registry.register(dish(10, "Lasagna")).unwrap();
    let first = registry.place_order(1, &[(10, 1)]).unwrap();
    let second = registry.place_order(1, &[(10, 3)]).unwrap();
    assert_ne!(first, second);
    assert_eq!(registry.extent::<Customer>().get(1).unwrap().credit_points, 2);

    let removed = registry.delete_customer(1, RemovalPolicy::Detach).unwrap();
    assert!(removed.order_ids().is_empty());
    for order in registry.extent::<Order>() {
        assert_eq!(order.customer_id(), None);
    }
    assert!(audit(&registry).is_empty());
}

#[test]
fn payment_belongs_to_at_most_one_order() {
    let mut registry = Registry::new();
    registry.register(Order::new(1, placed_at()).unwrap()).unwrap();
    registry.register(Order::new(2, placed_at()).unwrap()).unwrap();
    registry
        .register(Payment::new(5, 4_200, PaymentMethod::Voucher).unwrap())
        .unwrap();

    registry.set_payment(1, 5).unwrap();
    registry.set_payment(2, 5).unwrap();
    assert_eq!(registry.extent::<Order>().get(1).unwrap().payment_id(), None);
    assert_eq!(registry.extent::<Payment>().get(5).unwrap().order_id(), Some(2));
    assert!(audit(&registry).is_empty());

    registry.delete_order(2).unwrap();
    assert_eq!(registry.extent::<Payment>().get(5).unwrap().order_id(), None);
    assert!(audit(&registry).is_empty());
}

#[test]
fn order_lines_survive_dish_deletion() {
    let mut registry = Registry::new();
    registry.register(Customer::new(1).unwrap()).unwrap();
    registry.register(dish(10, "Risotto")).unwrap();
    let order_id = registry.place_order(1, &[(10, 2)]).unwrap();

    registry.delete_dish(10).unwrap();
    let order = registry.extent::<Order>().get(order_id).unwrap();
    assert_eq!(order.items[0].dish_name, "Risotto");
    assert_eq!(order.total_items(), 2);
}
