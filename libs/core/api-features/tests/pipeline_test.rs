use api_features::{ApiFeatures, FindQuery, ParameterMapping, memory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Item {
    name: String,
    description: String,
    category: String,
    price: f64,
}

fn item(name: &str, description: &str, category: &str, price: f64) -> Item {
    Item {
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price,
    }
}

/// Ten products, six of which mention "usb" in a searchable field.
fn fixture() -> Vec<Item> {
    vec![
        item("USB-C Hub", "Seven ports", "Accessories", 49.0),
        item("Wireless Mouse", "Silent clicks", "Accessories", 19.0),
        item("Flash Drive", "64GB usb 3.0 stick", "Storage", 12.5),
        item("Monitor", "27 inch IPS", "Displays", 229.0),
        item("Charger", "Fast charging", "USB Power", 35.0),
        item("Keyboard", "Mechanical, USB receiver", "Accessories", 89.0),
        item("Laptop Stand", "Aluminium", "Accessories", 29.0),
        item("usb cable", "Braided, 2m", "Cables", 9.0),
        item("Webcam", "1080p over USB", "Video", 59.0),
        item("Headphones", "Noise cancelling", "Audio", 149.0),
    ]
}

fn run(query_string: &str) -> Vec<Item> {
    let params = ParameterMapping::from_query_str(query_string);
    let page_size = params
        .text("size")
        .and_then(|size| size.parse::<i64>().ok())
        .unwrap_or(4);

    let query = ApiFeatures::new(FindQuery::new(), params)
        .search()
        .filter()
        .pagination(page_size)
        .sort()
        .into_query();

    let documents = memory::to_documents(&fixture()).unwrap();
    let matched = memory::evaluate(&query, documents).unwrap();
    memory::from_documents(matched).unwrap()
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn test_second_page_of_keyword_search_sorted_by_price() {
    let items = run("keyword=usb&page=2&size=4&sort=price,desc");

    // Page one holds Keyboard, Webcam, USB-C Hub and Charger.
    assert_eq!(names(&items), vec!["Flash Drive", "usb cable"]);
}

#[test]
fn test_first_page_of_keyword_search() {
    let items = run("keyword=usb&size=4&sort=price,desc");
    assert_eq!(names(&items), vec!["Keyboard", "Webcam", "USB-C Hub", "Charger"]);
}

#[test]
fn test_no_keyword_matches_everything() {
    let items = run("size=20");
    assert_eq!(items.len(), 10);
}

#[test]
fn test_unparseable_page_serves_first_page() {
    assert_eq!(run("page=abc&size=3"), run("page=1&size=3"));
}

#[test]
fn test_price_range_with_category() {
    let items = run("category=Accessories&price[gte]=20&price[lte]=60&sort=price,asc&size=10");
    assert_eq!(names(&items), vec!["Laptop Stand", "USB-C Hub"]);
}

#[test]
fn test_multi_search_column_restricts_fields() {
    let items = run("keyword=usb&multiSearchColumn=category&size=10");
    assert_eq!(names(&items), vec!["Charger"]);
}

#[test]
fn test_malformed_sort_keeps_insertion_order() {
    let items = run("keyword=usb&sort=price,sideways&size=10");
    assert_eq!(
        names(&items),
        vec!["USB-C Hub", "Flash Drive", "Charger", "Keyboard", "usb cable", "Webcam"]
    );
}

#[test]
fn test_numeric_looking_title_matches_string_field() {
    let books = vec![item("1984", "Orwell", "Books", 10.0), item("Dune", "Herbert", "Books", 12.0)];
    let params = ParameterMapping::from_query_str("name=1984");
    let query = ApiFeatures::new(FindQuery::new(), params)
        .with_numeric_fields(["price"])
        .filter()
        .into_query();

    let documents = memory::to_documents(&books).unwrap();
    let matched: Vec<Item> = memory::from_documents(memory::evaluate(&query, documents).unwrap()).unwrap();
    assert_eq!(names(&matched), vec!["1984"]);
}

#[test]
fn test_price_equality_on_numeric_field() {
    let params = ParameterMapping::from_query_str("price=9&size=10");
    let query = ApiFeatures::new(FindQuery::new(), params)
        .with_numeric_fields(["price"])
        .filter()
        .into_query();

    let documents = memory::to_documents(&fixture()).unwrap();
    let matched: Vec<Item> = memory::from_documents(memory::evaluate(&query, documents).unwrap()).unwrap();
    assert_eq!(names(&matched), vec!["usb cable"]);
}

#[test]
fn test_operator_keys_from_the_query_string_are_ignored() {
    let items = run("%24where=sleep(5000)&name[%24ne]=Monitor&size=20");

    // `name` becomes a literal match on an empty document, which nothing equals.
    assert!(items.is_empty());

    let items = run("%24where=sleep(5000)&size=20");
    assert_eq!(items.len(), 10);
}
