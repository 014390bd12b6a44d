//! Cart Handlers

pub(crate) mod delete;
pub(crate) mod get;

#[cfg(test)]
pub(crate) mod tests {
    use std::str::FromStr;

    use jiff::Timestamp;
    use rust_decimal::Decimal;

    use emporium_app::domain::{
        carts::records::{Cart, CartItemRecord, CartItemUuid, CartLine, CartUuid},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER_UUID, make_product};

    pub(crate) fn make_cart(lines: Vec<(ProductUuid, &str, i32)>) -> Cart {
        let uuid = CartUuid::new();

        let lines: Vec<CartLine> = lines
            .into_iter()
            .map(|(product_uuid, price, quantity)| {
                let product = make_product(product_uuid, price, 100);

                CartLine {
                    item: CartItemRecord {
                        uuid: CartItemUuid::new(),
                        cart_uuid: uuid,
                        product_uuid,
                        quantity,
                        created_at: Timestamp::UNIX_EPOCH,
                        updated_at: Timestamp::UNIX_EPOCH,
                    },
                    subtotal: product.price * Decimal::from(quantity),
                    product,
                }
            })
            .collect();

        Cart {
            uuid,
            user_uuid: TEST_CUSTOMER_UUID,
            total: lines.iter().map(|line| line.subtotal).sum(),
            lines,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn cart_fixture_totals_lines() {
        let cart = make_cart(vec![
            (ProductUuid::new(), "2.50", 2),
            (ProductUuid::new(), "1.00", 1),
        ]);

        assert_eq!(Decimal::from_str("6.00").ok(), Some(cart.total));
    }
}
