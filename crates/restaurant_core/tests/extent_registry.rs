use chrono::NaiveDate;
use restaurant_core::{
    Customer, Dish, Entity, Extent, Menu, Order, Registry, RelationError, Table, ValidationError,
};

fn evening(day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2031, 5, day)
        .unwrap()
        .and_hms_opt(19, 30, 0)
        .unwrap()
}

#[test]
fn structurally_equal_entities_are_added_once() {
    let mut extent = Extent::new();
    assert!(extent.add(Menu::new(1, "Lunch", "Seasonal").unwrap()));
    assert!(!extent.add(Menu::new(1, "Lunch", "Brunch").unwrap()));
    assert!(extent.add(Menu::new(1, "Dinner", "Seasonal").unwrap()));
    assert_eq!(extent.len(), 2);
    assert_eq!(extent.all()[0].menu_type, "Seasonal");
}

#[test]
fn replace_keeps_first_occurrence_in_order() {
    let mut extent = Extent::new();
    extent.add(Table::new(9, 2, "Bar").unwrap());
    let dropped = extent.replace(vec![
        Table::new(3, 4, "Booth").unwrap(),
        Table::new(1, 6, "Window").unwrap(),
        Table::new(3, 8, "Booth copy").unwrap(),
    ]);
    assert_eq!(dropped, 1);
    let ids: Vec<_> = extent.iter().map(Entity::id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(extent.get(3).unwrap().chairs, 4);
}

#[test]
fn register_rejects_zero_id_reused_id_and_prelinked_entities() {
    assert_eq!(
        Customer::new(0).unwrap_err(),
        ValidationError::ZeroId { kind: "Customer" }
    );

    let mut registry = Registry::new();
    registry.register(Order::new(4, evening(1)).unwrap()).unwrap();
    assert_eq!(registry.register(Order::new(4, evening(1)).unwrap()), Ok(false));
    assert_eq!(
        registry.register(Order::new(4, evening(2)).unwrap()),
        Err(RelationError::Validation(ValidationError::IdInUse {
            kind: "Order",
            id: 4
        }))
    );

    registry.register(Customer::new(1).unwrap()).unwrap();
    registry.add_order(1, 4).unwrap();
    let linked = registry.extent::<Order>().get(4).unwrap().clone();
    let mut other = Registry::new();
    assert!(matches!(
        other.register(linked),
        Err(RelationError::Validation(ValidationError::Prelinked { kind: "Order", id: 4 }))
    ));
}

#[test]
fn remove_unlinked_refuses_linked_entities() {
    let mut registry = Registry::new();
    registry.register(Menu::new(1, "Lunch", "Seasonal").unwrap()).unwrap();
    registry
        .register(Dish::new(2, "Soup", "French", 700, vec!["onion".into()]).unwrap())
        .unwrap();
    registry.add_dish(1, 2).unwrap();

    assert!(matches!(
        registry.remove_unlinked::<Dish>(2),
        Err(RelationError::HasLinks(entity)) if entity.kind == "Dish"
    ));
    registry.remove_dish(1, 2).unwrap();
    let dish = registry.remove_unlinked::<Dish>(2).unwrap();
    assert_eq!(dish.name, "Soup");
    assert!(matches!(
        registry.remove_unlinked::<Dish>(2),
        Err(RelationError::NotFound(_))
    ));
}

#[test]
fn dish_requires_an_ingredient() {
    assert_eq!(
        Dish::new(1, "Air", "None", 100, vec!["  ".into()]).unwrap_err(),
        ValidationError::MissingIngredients
    );
}
