//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{NewCartItem, merged_quantity, validate_quantity},
            errors::CartsServiceError,
            records::{Cart, CartItemUuid, CartRecord},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartRecord,
    ) -> Result<Cart, CartsServiceError> {
        let items = self.items_repository.get_cart_items(tx, cart.uuid).await?;

        let product_uuids: Vec<ProductUuid> = items.iter().map(|item| item.product_uuid).collect();

        let products = self
            .products_repository
            .get_products(tx, &product_uuids)
            .await?;

        Ok(Cart::assemble(cart, items, products))
    }

    /// Current stock of a live product.
    async fn product_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<i32, CartsServiceError> {
        match self.products_repository.get_product(tx, product).await {
            Ok(product) => Ok(product.stock_quantity),
            Err(sqlx::Error::RowNotFound) => Err(CartsServiceError::ProductNotFound),
            Err(error) => Err(error.into()),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(skip(self), err)]
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.carts_repository.get_or_create_cart(&mut tx, user).await?;

        let cart = self.load_cart(&mut tx, record).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(skip(self), err)]
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError> {
        validate_quantity(item.quantity)?;

        let mut tx = self.db.begin().await?;

        let record = self.carts_repository.get_or_create_cart(&mut tx, user).await?;

        let stock = self.product_stock(&mut tx, item.product_uuid).await?;

        // get_or_create_cart holds the cart row lock until commit, so the
        // line cannot change between this read and the upsert.
        let existing = self
            .items_repository
            .get_cart_items(&mut tx, record.uuid)
            .await?
            .iter()
            .find(|line| line.product_uuid == item.product_uuid)
            .map_or(0, |line| line.quantity);

        merged_quantity(existing, item.quantity, stock).inspect_err(|_error| {
            debug!(
                existing,
                added = item.quantity,
                stock,
                "cart line would exceed available stock"
            );
        })?;

        self.items_repository
            .upsert_cart_item(&mut tx, record.uuid, &item)
            .await?;

        let record = self.carts_repository.touch_cart(&mut tx, record.uuid).await?;

        let cart = self.load_cart(&mut tx, record).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i32,
    ) -> Result<Cart, CartsServiceError> {
        validate_quantity(quantity)?;

        let mut tx = self.db.begin().await?;

        let record = self.carts_repository.get_or_create_cart(&mut tx, user).await?;

        let line = self
            .items_repository
            .get_cart_item(&mut tx, record.uuid, item)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let stock = self.product_stock(&mut tx, line.product_uuid).await?;

        if quantity > stock {
            return Err(CartsServiceError::InsufficientStock);
        }

        self.items_repository
            .update_cart_item_quantity(&mut tx, record.uuid, item, quantity)
            .await?;

        let record = self.carts_repository.touch_cart(&mut tx, record.uuid).await?;

        let cart = self.load_cart(&mut tx, record).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(skip(self), err)]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(record) = self.carts_repository.find_cart_by_user(&mut tx, user).await? else {
            return Err(CartsServiceError::ItemNotFound);
        };

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, record.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        self.carts_repository.touch_cart(&mut tx, record.uuid).await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(record) = self.carts_repository.find_cart_by_user(&mut tx, user).await? {
            let removed = self
                .items_repository
                .clear_cart_items(&mut tx, record.uuid)
                .await?;

            self.carts_repository.touch_cart(&mut tx, record.uuid).await?;

            debug!(removed, "cart cleared");
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating an empty one if they have none yet.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product to the user's cart, or add to the quantity already there.
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError>;

    /// Replace the quantity of one of the user's cart lines.
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line from the user's cart.
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid)
    -> Result<(), CartsServiceError>;

    /// Remove every line from the user's cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
