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
        admin::{
            BootstrapRequest, BootstrapResponse, CategoryList, CreateCategoryRequest, RoleList,
            SummaryReport,
        },
        bookings::{BookingList, CreateBookingRequest, UpdateBookingStatusRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddItemRequest, CartItemKind, CartView, UpdateItemRequest},
        chat::{Conversation, SendMessageRequest},
        merchants::{
            AddPhotoRequest, CreateMerchantRequest, CreateProductRequest, CreateReviewRequest,
            CreateServiceRequest, MerchantDetail, MerchantList, PhotoList, ProductList,
            ReviewList, ServiceList, UpdateMerchantRequest, UpdateProductRequest,
            UpdateServiceRequest,
        },
        orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
        search::{MerchantHits, ProductHits, SearchQueryEcho, SearchResults, ServiceHits},
    },
    models::{
        Booking, Cart, CartItem, Category, ChatMessage, Merchant, MerchantPhoto, Order,
        OrderItem, Payment, Product, Review, Service, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, bookings, bootstrap, cart, chat, health, merchants, orders, params, search},
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
        auth::register,
        auth::my_roles,
        cart::cart_list,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        orders::checkout,
        orders::list_orders,
        orders::get_order,
        search::search,
        merchants::list_merchants,
        merchants::get_merchant,
        merchants::create_merchant,
        merchants::update_merchant,
        merchants::list_products,
        merchants::create_product,
        merchants::update_product,
        merchants::delete_product,
        merchants::list_services,
        merchants::create_service,
        merchants::update_service,
        merchants::delete_service,
        merchants::list_photos,
        merchants::add_photo,
        merchants::list_reviews,
        merchants::create_review,
        bookings::create_booking,
        bookings::list_my_bookings,
        bookings::list_merchant_bookings,
        bookings::update_booking_status,
        chat::send_message,
        chat::conversation,
        admin::summary_report,
        admin::list_categories,
        admin::create_category,
        admin::delete_category,
        bootstrap::bootstrap
    ),
    components(
        schemas(
            User,
            Merchant,
            MerchantPhoto,
            Product,
            Service,
            Cart,
            CartItem,
            Order,
            OrderItem,
            Payment,
            Booking,
            ChatMessage,
            Review,
            Category,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddItemRequest,
            CartItemKind,
            UpdateItemRequest,
            CartView,
            CheckoutRequest,
            CheckoutResponse,
            OrderList,
            OrderWithItems,
            SearchQueryEcho,
            MerchantHits,
            ProductHits,
            ServiceHits,
            SearchResults,
            CreateMerchantRequest,
            UpdateMerchantRequest,
            MerchantList,
            MerchantDetail,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateServiceRequest,
            UpdateServiceRequest,
            ServiceList,
            AddPhotoRequest,
            PhotoList,
            CreateReviewRequest,
            ReviewList,
            CreateBookingRequest,
            UpdateBookingStatusRequest,
            BookingList,
            SendMessageRequest,
            Conversation,
            SummaryReport,
            CreateCategoryRequest,
            CategoryList,
            BootstrapRequest,
            BootstrapResponse,
            RoleList,
            params::Pagination,
            params::SortOrder,
            params::SearchQuery,
            params::OrderListQuery,
            params::MerchantListQuery,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<SearchResults>,
            ApiResponse<MerchantList>,
            ApiResponse<OrderList>,
            ApiResponse<BookingList>,
            ApiResponse<SummaryReport>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order endpoints"),
        (name = "Search", description = "Faceted search across merchants, products and services"),
        (name = "Merchants", description = "Merchant directory and catalog endpoints"),
        (name = "Bookings", description = "Service booking endpoints"),
        (name = "Chat", description = "Direct message endpoints"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Bootstrap", description = "Identity bootstrap endpoint"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
