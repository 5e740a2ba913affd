//! Line pricing for quotations.
//!
//! Each requested line is resolved against the caller's own products. The
//! amount of a line is `quantity * price`, and the grand total of a quotation
//! is the sum of its line amounts.

use std::collections::{BTreeSet, HashMap};

use crate::{
    errors::AppError,
    structs::{Product, QuotationItemRequest},
    utils::validate_price,
};

/// A line ready to be persisted as a `quotation_items` row.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub amount: f64,
}

/// Distinct product ids referenced by a set of lines.
pub fn referenced_product_ids(items: &[QuotationItemRequest]) -> Vec<i64> {
    items
        .iter()
        .map(|item| item.product_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Checks the shape of the requested lines before any lookups happen.
pub fn validate_items(items: &[QuotationItemRequest]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest(
            "Quotation must contain at least one item".to_owned(),
        ));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest(
                "Quantity must be at least 1".to_owned(),
            ));
        }
        if let Some(price) = item.price {
            validate_price(price)?;
        }
    }
    Ok(())
}

/// Prices every line against `owned`, the caller's products keyed by id.
///
/// A line naming a product outside `owned` fails the whole quotation.
/// Price and name fall back to the product's stored values.
pub fn price_lines(
    items: &[QuotationItemRequest],
    owned: &HashMap<i64, Product>,
) -> Result<Vec<PricedLine>, AppError> {
    validate_items(items)?;
    items
        .iter()
        .map(|item| {
            let product = owned.get(&item.product_id).ok_or_else(|| {
                AppError::NotFound("Some products not found or do not belong to you".to_owned())
            })?;
            let price = item.price.unwrap_or(product.price);
            let product_name = item
                .product_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(&product.title)
                .to_owned();
            let amount = item.quantity as f64 * price;
            if !amount.is_finite() {
                return Err(out_of_range());
            }
            Ok(PricedLine {
                product_id: product.id,
                product_name,
                quantity: item.quantity,
                price,
                amount,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(|lines| grand_total(&lines).map(|_| lines))
}

/// Sum of line amounts. Fails when the sum is not representable.
pub fn grand_total(lines: &[PricedLine]) -> Result<f64, AppError> {
    let total: f64 = lines.iter().map(|line| line.amount).sum();
    if !total.is_finite() {
        return Err(out_of_range());
    }
    Ok(total)
}

fn out_of_range() -> AppError {
    AppError::BadRequest("Quotation amount is too large".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, title: &str, price: f64) -> Product {
        Product {
            id,
            user_id: 1,
            title: title.to_owned(),
            price,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(product_id: i64, quantity: i64, price: Option<f64>) -> QuotationItemRequest {
        QuotationItemRequest {
            product_id,
            quantity,
            price,
            product_name: None,
        }
    }

    fn catalog() -> HashMap<i64, Product> {
        [product(1, "Bolt", 2.5), product(2, "Nut", 0.75)]
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    }

    #[test]
    fn amounts_and_total_follow_quantity_times_price() {
        let lines = price_lines(&[line(1, 4, None), line(2, 10, Some(1.0))], &catalog()).unwrap();

        assert_eq!(lines[0].price, 2.5);
        assert_eq!(lines[0].amount, 10.0);
        assert_eq!(lines[0].product_name, "Bolt");
        assert_eq!(lines[1].price, 1.0);
        assert_eq!(lines[1].amount, 10.0);
        assert_eq!(grand_total(&lines).unwrap(), 20.0);
    }

    #[test]
    fn explicit_name_overrides_title() {
        let mut item = line(2, 1, None);
        item.product_name = Some("Hex nut M8".into());
        let lines = price_lines(&[item], &catalog()).unwrap();
        assert_eq!(lines[0].product_name, "Hex nut M8");
    }

    #[test]
    fn unknown_product_rejects_all_lines() {
        let result = price_lines(&[line(1, 1, None), line(99, 1, None)], &catalog());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn empty_and_non_positive_lines_are_bad_requests() {
        assert!(matches!(
            price_lines(&[], &catalog()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            price_lines(&[line(1, 0, None)], &catalog()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            price_lines(&[line(1, 1, Some(-3.0))], &catalog()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn repeated_products_are_priced_per_line() {
        let items = [line(1, 1, None), line(1, 2, Some(3.0))];
        assert_eq!(referenced_product_ids(&items), vec![1]);

        let lines = price_lines(&items, &catalog()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(grand_total(&lines).unwrap(), 2.5 + 6.0);
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        let mut owned = catalog();
        owned.insert(3, product(3, "Rare earth", 1e308));

        assert!(matches!(
            price_lines(&[line(3, 10, None)], &owned),
            Err(AppError::BadRequest(_))
        ));
        // Each line fits, the sum does not.
        assert!(matches!(
            price_lines(&[line(3, 1, None), line(3, 1, None)], &owned),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            price_lines(&[line(1, 1, Some(f64::MAX)), line(2, 1, Some(f64::MAX))], &owned),
            Err(AppError::BadRequest(_))
        ));
    }
}
