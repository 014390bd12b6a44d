//! Orders service.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        orders::{
            data::{NewOrderItem, OrderFilter, PaymentOutcome},
            errors::OrdersServiceError,
            records::{Order, OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
            status::OrderStatus,
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
    money::{fits_total, to_minor_units},
    pagination::Pagination,
    payments::{CheckoutRequest, CheckoutSession, PaymentGateway},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    gateway: Arc<dyn PaymentGateway>,
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            gateway,
        }
    }

    async fn live_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: impl IntoIterator<Item = ProductUuid>,
    ) -> Result<HashMap<ProductUuid, ProductRecord>, OrdersServiceError> {
        let products: Vec<ProductUuid> = products
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let products = self.products_repository.get_products(tx, &products).await?;

        Ok(products
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect())
    }

    async fn render_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: Vec<OrderRecord>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let order_uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self
            .items_repository
            .get_order_items(tx, &order_uuids)
            .await?;

        let products = self
            .live_products(tx, items.iter().map(|item| item.product_uuid))
            .await?;

        let mut items_by_order: HashMap<OrderUuid, Vec<OrderItemRecord>> = HashMap::new();

        for item in items {
            items_by_order.entry(item.order_uuid).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.uuid).unwrap_or_default();

                Order::assemble(order, items, &products)
            })
            .collect())
    }

    async fn render_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<Order, OrdersServiceError> {
        self.render_orders(tx, vec![order])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(skip(self), err)]
    async fn create_order(&self, user: UserUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        // Locks the cart row, so a second checkout of the same cart waits and
        // then finds it empty.
        let cart = self.carts_repository.get_or_create_cart(&mut tx, user).await?;

        let cart_items = self
            .cart_items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        if cart_items.is_empty() {
            return Err(OrdersServiceError::CartEmpty);
        }

        let product_uuids: Vec<ProductUuid> =
            cart_items.iter().map(|item| item.product_uuid).collect();

        // Held until commit, so concurrent orders for the same products queue
        // up behind this one and then see the decremented stock.
        let locked: HashMap<ProductUuid, ProductRecord> = self
            .products_repository
            .lock_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let order_uuid = OrderUuid::new();
        let mut total_price = Decimal::ZERO;
        let mut new_items = Vec::with_capacity(cart_items.len());

        for item in &cart_items {
            let product = locked
                .get(&item.product_uuid)
                .ok_or(OrdersServiceError::ProductNotFound(item.product_uuid))?;

            if product.stock_quantity < item.quantity {
                return Err(OrdersServiceError::InsufficientStock(product.name.clone()));
            }

            let subtotal = line_subtotal(product.price, item.quantity)?;

            total_price = add_to_total(total_price, subtotal)?;

            new_items.push(NewOrderItem {
                uuid: OrderItemUuid::new(),
                order_uuid,
                product_uuid: product.uuid,
                quantity: item.quantity,
                price_at_purchase: product.price,
                subtotal,
            });
        }

        let order = self
            .orders_repository
            .create_order(&mut tx, order_uuid, user, total_price)
            .await?;

        for item in &new_items {
            self.items_repository.create_order_item(&mut tx, item).await?;

            let decremented = self
                .products_repository
                .decrement_stock(&mut tx, item.product_uuid, item.quantity)
                .await?;

            if decremented == 0 {
                let name = locked
                    .get(&item.product_uuid)
                    .map(|product| product.name.clone())
                    .unwrap_or_default();

                return Err(OrdersServiceError::InsufficientStock(name));
            }
        }

        self.cart_items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        let order = self.render_order(&mut tx, order).await?;

        tx.commit().await?;

        info!(order = %order.uuid, total = %order.total_price, "order placed");

        Ok(order)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .orders_repository
            .get_user_order(&mut tx, user, order)
            .await?;

        let order = self.render_order(&mut tx, record).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(skip(self), err)]
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.orders_repository.list_user_orders(&mut tx, user).await?;

        let orders = self.render_orders(&mut tx, records).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(skip(self), err)]
    async fn list_all_orders(
        &self,
        filter: OrderFilter,
        page: Pagination,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .orders_repository
            .list_orders(&mut tx, filter, page)
            .await?;

        let orders = self.render_orders(&mut tx, records).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        if !current.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let record = if current.status == status {
            current
        } else {
            let updated = self
                .orders_repository
                .update_order_status(&mut tx, order, status)
                .await?;

            info!(%order, from = %current.status, to = %status, "order status changed");

            updated
        };

        let order = self.render_order(&mut tx, record).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(skip(self), err)]
    async fn start_checkout(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<CheckoutSession, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .orders_repository
            .get_user_order(&mut tx, user, order)
            .await?;

        tx.commit().await?;

        if record.status != OrderStatus::Pending {
            return Err(OrdersServiceError::NotPending(record.status));
        }

        let amount_minor = to_minor_units(record.total_price)?;

        // No transaction is held across the call to the processor.
        let session = self
            .gateway
            .create_checkout_session(CheckoutRequest {
                order_uuid: order,
                amount_minor,
            })
            .await
            .map_err(OrdersServiceError::Gateway)?;

        let mut tx = self.db.begin().await?;

        let stored = self
            .orders_repository
            .set_checkout_session(&mut tx, order, &session.session_id)
            .await?;

        if stored.is_none() {
            let current = self.orders_repository.get_order(&mut tx, order).await?;

            warn!(%order, status = %current.status, "order left pending during checkout");

            return Err(OrdersServiceError::NotPending(current.status));
        }

        tx.commit().await?;

        Ok(session)
    }

    #[tracing::instrument(skip(self), err)]
    async fn mark_paid(&self, order: OrderUuid) -> Result<PaymentOutcome, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let outcome = match self.orders_repository.mark_order_paid(&mut tx, order).await? {
            Some(_) => PaymentOutcome::Paid,
            None => match self.orders_repository.get_order(&mut tx, order).await?.status {
                OrderStatus::Paid => PaymentOutcome::AlreadyPaid,
                status => PaymentOutcome::Unchanged(status),
            },
        };

        tx.commit().await?;

        info!(%order, ?outcome, "payment recorded");

        Ok(outcome)
    }
}

/// `price * quantity`, refused when it overflows the subtotal column.
fn line_subtotal(price: Decimal, quantity: i32) -> Result<Decimal, OrdersServiceError> {
    price
        .checked_mul(Decimal::from(quantity))
        .filter(|subtotal| fits_total(*subtotal))
        .ok_or(OrdersServiceError::TotalTooLarge)
}

fn add_to_total(total: Decimal, subtotal: Decimal) -> Result<Decimal, OrdersServiceError> {
    total
        .checked_add(subtotal)
        .filter(|total| fits_total(*total))
        .ok_or(OrdersServiceError::TotalTooLarge)
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into a `pending` order, taking the ordered
    /// quantities out of stock and emptying the cart.
    async fn create_order(&self, user: UserUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve one of the user's orders. Orders belonging to someone else
    /// are reported as not found.
    async fn get_order(&self, user: UserUuid, order: OrderUuid)
    -> Result<Order, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order matching `filter`, newest first.
    async fn list_all_orders(
        &self,
        filter: OrderFilter,
        page: Pagination,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Move an order to `status`. Only forward moves are accepted.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Open a hosted checkout session for one of the user's `pending`
    /// orders and remember its id on the order.
    async fn start_checkout(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<CheckoutSession, OrdersServiceError>;

    /// Record a completed payment for an order.
    async fn mark_paid(&self, order: OrderUuid) -> Result<PaymentOutcome, OrdersServiceError>;
}
