use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        merchants::{CreateMerchantRequest, MerchantCreated, MerchantList, SetActivationRequest},
        orders::{CreateOrderRequest, OrderLine, OrderList, OrderWithItems},
        payments::{InitiatePaymentRequest, PaymentInitiated},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    models::{Merchant, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{auth, health, merchants, orders, params, payments, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        products::list_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        payments::initiate_payment,
        merchants::create_merchant,
        merchants::list_merchants,
        merchants::set_activation
    ),
    components(
        schemas(
            Merchant,
            Product,
            Order,
            OrderItem,
            LoginRequest,
            LoginResponse,
            CreateOrderRequest,
            OrderLine,
            OrderList,
            OrderWithItems,
            InitiatePaymentRequest,
            PaymentInitiated,
            CreateMerchantRequest,
            MerchantCreated,
            MerchantList,
            SetActivationRequest,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<PaymentInitiated>,
            ApiResponse<MerchantCreated>,
            ApiResponse<MerchantList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Storefront product endpoints"),
        (name = "Orders", description = "Order intake and listing"),
        (name = "Payments", description = "Hosted checkout initiation with revenue split"),
        (name = "Merchants", description = "Superadmin merchant provisioning"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
