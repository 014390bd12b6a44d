//! Test helpers.

use std::{str::FromStr, sync::Arc};

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use emporium_app::{
    auth::{AuthenticatedUser, MockAuthService},
    context::AppContext,
    domain::{
        carts::MockCartsService,
        orders::MockOrdersService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{
            MockUsersService,
            records::{UserRole, UserUuid},
        },
    },
    payments::MockPaymentGateway,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(2));

/// One mock per service. A mock without expectations fails the test on any
/// call, so tests only configure the services their handler should touch.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) users: MockUsersService,
    pub(crate) auth: MockAuthService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) payments: MockPaymentGateway,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(AppContext {
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            payments: Arc::new(self.payments),
        })
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(AuthenticatedUser {
        uuid: TEST_CUSTOMER_UUID,
        role: UserRole::Customer,
    });
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(AuthenticatedUser {
        uuid: TEST_ADMIN_UUID,
        role: UserRole::Admin,
    });
    ctrl.call_next(req, depot, res).await;
}

/// A service with no authenticated user.
pub(crate) fn anonymous_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// A service acting as [`TEST_CUSTOMER_UUID`].
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// A service acting as [`TEST_ADMIN_UUID`].
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid, price: &str, stock_quantity: i32) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Teapot".to_string(),
        description: Some("Holds tea".to_string()),
        price: Decimal::from_str(price).unwrap_or_default(),
        stock_quantity,
        image_url: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}
