//! Products Data

use rust_decimal::Decimal;

use crate::{
    domain::products::{errors::ProductsServiceError, records::ProductUuid},
    money::is_valid_price,
};

const MAX_NAME_CHARS: usize = 200;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
}

impl NewProduct {
    pub(crate) fn validate(&self) -> Result<(), ProductsServiceError> {
        validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock_quantity)
    }
}

/// Product Update Data
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
}

impl ProductUpdate {
    pub(crate) fn validate(&self) -> Result<(), ProductsServiceError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        if let Some(price) = self.price {
            validate_price(price)?;
        }

        if let Some(stock_quantity) = self.stock_quantity {
            validate_stock(stock_quantity)?;
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ProductsServiceError> {
    let chars = name.trim().chars().count();

    if chars == 0 || chars > MAX_NAME_CHARS {
        return Err(ProductsServiceError::Validation(
            "name must be between 1 and 200 characters",
        ));
    }

    Ok(())
}

fn validate_price(price: Decimal) -> Result<(), ProductsServiceError> {
    if !is_valid_price(price) {
        return Err(ProductsServiceError::Validation(
            "price must be positive, at most 99999999.99, with at most two decimal places",
        ));
    }

    Ok(())
}

fn validate_stock(stock_quantity: i32) -> Result<(), ProductsServiceError> {
    if stock_quantity < 0 {
        return Err(ProductsServiceError::Validation(
            "stock quantity must not be negative",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    fn product(price: &str, stock_quantity: i32) -> Result<NewProduct, rust_decimal::Error> {
        Ok(NewProduct {
            uuid: ProductUuid::new(),
            name: "Lamp".to_string(),
            description: None,
            price: Decimal::from_str(price)?,
            stock_quantity,
            image_url: None,
        })
    }

    #[test]
    fn new_product_validation() -> TestResult {
        assert!(product("9.99", 0)?.validate().is_ok());
        assert!(product("0", 1)?.validate().is_err());
        assert!(product("9.999", 1)?.validate().is_err());
        assert!(product("9.99", -1)?.validate().is_err());
        assert!(product("99999999.99", 1)?.validate().is_ok());
        assert!(
            matches!(
                product("100000000.00", 1)?.validate(),
                Err(ProductsServiceError::Validation(_))
            ),
            "prices beyond the column precision are a validation error"
        );

        let mut unnamed = product("1.00", 1)?;
        unnamed.name = " ".to_string();

        assert!(unnamed.validate().is_err());

        Ok(())
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(ProductUpdate::default().validate().is_ok());
    }

    #[test]
    fn update_checks_only_present_fields() {
        let update = ProductUpdate {
            stock_quantity: Some(-5),
            ..ProductUpdate::default()
        };

        assert!(update.validate().is_err());
    }
}
