pub mod storefront;
pub mod views;

use actix_web::HttpResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        storefront::get_menu,
        storefront::show_page,
        storefront::get_cart,
        storefront::get_cart_count,
        storefront::add_item,
        storefront::set_quantity,
        storefront::adjust_quantity,
        storefront::set_selection,
        storefront::remove_item,
        storefront::clear_cart,
        storefront::get_checkout,
        storefront::submit_checkout,
        storefront::start_new_order,
    ),
    components(schemas(
        views::Page,
        views::MenuItemResponse,
        views::CartLineResponse,
        views::CartView,
        views::CartCountResponse,
        views::CheckoutSummary,
        views::PageView,
        views::NewOrderResponse,
        views::AddItemRequest,
        views::SetQuantityRequest,
        views::AdjustQuantityRequest,
        views::SetSelectionRequest,
        views::CheckoutRequest,
        views::OrderConfirmation,
    )),
    tags(
        (name = "menu", description = "Catalog and page navigation"),
        (name = "cart", description = "Cart contents and mutations"),
        (name = "checkout", description = "Checkout summary and order confirmation"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
