//! Naming and cross-reference utilities shared by every format.

use crate::document::Element;
use crate::model::Multiplicity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    pub entity_name: String,
    pub table_name: String,
}

/// Split a class label such as `Customer (client)` into its entity and
/// table names.
///
/// Without an explicit table name the table is the snake_case form of the
/// entity name.
pub fn split_class_label(raw: &str) -> ClassName {
    let raw = raw.trim();
    let (entity, table) = match (raw.find('('), raw.strip_suffix(')')) {
        (Some(open), Some(inner)) => (&raw[..open], Some(&inner[open + 1..])),
        _ => (raw, None),
    };

    let entity_name = upper_first(entity.trim());
    let table_name = match table.map(str::trim).filter(|t| !t.is_empty()) {
        Some(table) => table.to_string(),
        None => snake_case(&entity_name),
    };
    ClassName {
        entity_name,
        table_name,
    }
}

/// Whether an attribute is the synthetic key of its class (`id`,
/// `customerId`, `customer_id`). Such attributes never become fields.
pub fn is_an_id(attribute: &str, class_name: &str) -> bool {
    let attribute = attribute.trim().to_lowercase();
    if attribute == "id" {
        return true;
    }
    let class = class_name.trim().to_lowercase();
    !class.is_empty() && (attribute == format!("{}id", class) || attribute == format!("{}_id", class))
}

/// Trailing type name of a cross-reference such as
/// `pathmap://UML_LIBRARIES/UMLPrimitiveTypes.library.uml#String`.
pub fn type_name_from_href(href: &str) -> Option<&str> {
    let href = href.trim();
    let name = match href.rsplit_once('#') {
        Some((_, name)) => name,
        None => href.rsplit('/').next().unwrap_or(href),
    };
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Read `lowerValue`/`upperValue` of an association end.
///
/// A missing lower bound is 0 and a missing upper bound is 1, as in UML.
/// `*` and `-1` are unbounded.
pub fn read_multiplicity(end: &Element) -> Multiplicity {
    let bound = |name: &str| end.child(name).and_then(|v| v.non_empty_attr("value"));

    let lower = bound("lowerValue")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);
    let upper = match bound("upperValue") {
        Some("*") | Some("-1") => None,
        Some(v) => Some(v.parse::<u32>().unwrap_or(1)),
        None => Some(1),
    };
    Multiplicity { lower, upper }
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `PurchaseOrder` -> `purchase_order`, `HTTPLog` -> `http_log`.
pub fn snake_case(s: &str) -> String {
    let chars: Vec<char> = s.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_class_label() {
        let name = split_class_label("Customer");
        assert_eq!(name.entity_name, "Customer");
        assert_eq!(name.table_name, "customer");

        let name = split_class_label("purchaseOrder (po_table)");
        assert_eq!(name.entity_name, "PurchaseOrder");
        assert_eq!(name.table_name, "po_table");

        let name = split_class_label("Order ()");
        assert_eq!(name.table_name, "order");

        // unbalanced parenthesis is kept as part of the name
        let name = split_class_label("Order (x");
        assert_eq!(name.entity_name, "Order (x");
    }

    #[test]
    fn test_is_an_id() {
        assert!(is_an_id("id", "Customer"));
        assert!(is_an_id("ID", "Customer"));
        assert!(is_an_id("customerId", "Customer"));
        assert!(is_an_id("customer_id", "Customer"));
        assert!(!is_an_id("orderId", "Customer"));
        assert!(!is_an_id("identity", "Customer"));
    }

    #[test]
    fn test_type_name_from_href() {
        assert_eq!(
            type_name_from_href("pathmap://UML_LIBRARIES/UMLPrimitiveTypes.library.uml#String"),
            Some("String")
        );
        assert_eq!(
            type_name_from_href("http://www.omg.org/spec/UML/20131001/PrimitiveTypes.xmi#Integer"),
            Some("Integer")
        );
        assert_eq!(type_name_from_href("types/Long"), Some("Long"));
        assert_eq!(type_name_from_href("library.uml#"), None);
    }

    #[test]
    fn test_read_multiplicity() {
        let end = Element::new("ownedEnd")
            .with_child(Element::new("lowerValue").with_attr("value", "1"))
            .with_child(Element::new("upperValue").with_attr("value", "*"));
        let m = read_multiplicity(&end);
        assert_eq!(m, Multiplicity { lower: 1, upper: None });

        let m = read_multiplicity(&Element::new("ownedEnd"));
        assert_eq!(m, Multiplicity { lower: 0, upper: Some(1) });

        let end = Element::new("ownedEnd").with_child(Element::new("upperValue").with_attr("value", "-1"));
        assert!(read_multiplicity(&end).is_many());
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(upper_first("status"), "Status");
        assert_eq!(lower_first("FirstName"), "firstName");
        assert_eq!(snake_case("PurchaseOrder"), "purchase_order");
        assert_eq!(snake_case("HTTPLog"), "http_log");
        assert_eq!(snake_case("Order Line"), "order_line");
        assert_eq!(snake_case("Address2Book"), "address2_book");
    }
}
