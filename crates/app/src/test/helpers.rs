//! Test Helpers

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{
    products::{data::NewProduct, records::ProductUuid},
    users::{
        data::NewUser,
        records::{UserRole, UserUuid},
    },
};

/// Password given to every user built by [`new_user`].
pub(crate) const TEST_PASSWORD: &str = "password123";

/// A customer registration for `email`.
pub(crate) fn new_user(email: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        full_name: "Test User".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        role: UserRole::Customer,
    }
}

/// An administrator registration for `email`.
pub(crate) fn new_admin(email: &str) -> NewUser {
    NewUser {
        role: UserRole::Admin,
        ..new_user(email)
    }
}

pub(crate) fn new_product(
    name: &str,
    price: &str,
    stock_quantity: i32,
) -> Result<NewProduct, rust_decimal::Error> {
    Ok(NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: None,
        price: Decimal::from_str(price)?,
        stock_quantity,
        image_url: None,
    })
}
