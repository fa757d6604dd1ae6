use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::{format_amount, ItemId};
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::handlers::views::{
    AddItemRequest, AdjustQuantityRequest, CartCountResponse, CartLineResponse, CartView,
    CheckoutRequest, CheckoutSummary, MenuItemResponse, NewOrderResponse, OrderConfirmation, Page,
    PageView, SetQuantityRequest, SetSelectionRequest,
};
use crate::state::AppState;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Run a cart mutation off the async workers, then render the cart page from
/// a fresh read of the store.
async fn mutate_and_render<F>(state: web::Data<AppState>, mutation: F) -> Result<CartView, AppError>
where
    F: FnOnce(&AppState) -> Result<(), DomainError> + Send + 'static,
{
    web::block(move || {
        mutation(state.get_ref())?;
        Ok::<_, AppError>(CartView::from(&state.cart.get_cart()))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

async fn read_cart<T, F>(state: web::Data<AppState>, render: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> T + Send + 'static,
{
    web::block(move || render(state.get_ref()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

// ── Catalog & navigation ─────────────────────────────────────────────────────

/// GET /menu
#[utoipa::path(
    get,
    path = "/menu",
    responses(
        (status = 200, description = "The full menu", body = [MenuItemResponse]),
    ),
    tag = "menu"
)]
pub async fn get_menu(state: web::Data<AppState>) -> HttpResponse {
    let items: Vec<MenuItemResponse> = state.menu.items().iter().map(MenuItemResponse::from).collect();
    HttpResponse::Ok().json(items)
}

/// GET /pages/{page}
///
/// Switches to `menu`, `cart` or `checkout` and returns that page's content,
/// rendered from the current cart.
#[utoipa::path(
    get,
    path = "/pages/{page}",
    params(
        ("page" = String, Path, description = "One of menu, cart, checkout"),
    ),
    responses(
        (status = 200, description = "Page content", body = PageView),
        (status = 404, description = "Unknown page"),
    ),
    tag = "menu"
)]
pub async fn show_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let page: Page = path.into_inner().parse().map_err(|_| AppError::NotFound)?;

    let view = read_cart(state, move |state| {
        let mut view = PageView::new(page);
        match page {
            Page::Menu => {
                view.menu = Some(state.menu.items().iter().map(MenuItemResponse::from).collect());
            }
            Page::Cart => view.cart = Some(CartView::from(&state.cart.get_cart())),
            Page::Checkout => view.checkout = Some(CheckoutSummary::from(&state.cart.get_cart())),
        }
        view
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

// ── Cart ─────────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Current cart", body = CartView),
    ),
    tag = "cart"
)]
pub async fn get_cart(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let view = read_cart(state, |state| CartView::from(&state.cart.get_cart())).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /cart/count
#[utoipa::path(
    get,
    path = "/cart/count",
    responses(
        (status = 200, description = "Units in the cart", body = CartCountResponse),
    ),
    tag = "cart"
)]
pub async fn get_cart_count(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let item_count = read_cart(state, |state| state.cart.get_cart().item_count()).await?;
    Ok(HttpResponse::Ok().json(CartCountResponse { item_count }))
}

/// POST /cart/items
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item added", body = CartView),
        (status = 404, description = "Item is not on the menu"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = body.into_inner().item_id;
    let view = mutate_and_render(state, move |state| state.cart.add_to_cart(item_id, &state.menu)).await?;
    Ok(HttpResponse::Created().json(view))
}

/// PUT /cart/items/{id}/quantity
#[utoipa::path(
    put,
    path = "/cart/items/{id}/quantity",
    params(
        ("id" = u32, Path, description = "Menu item id"),
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartView),
    ),
    tag = "cart"
)]
pub async fn set_quantity(
    state: web::Data<AppState>,
    path: web::Path<ItemId>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    let view = mutate_and_render(state, move |state| state.cart.update_item_quantity(item_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /cart/items/{id}/quantity/adjust
#[utoipa::path(
    post,
    path = "/cart/items/{id}/quantity/adjust",
    params(
        ("id" = u32, Path, description = "Menu item id"),
    ),
    request_body = AdjustQuantityRequest,
    responses(
        (status = 200, description = "Quantity adjusted", body = CartView),
        (status = 404, description = "Item is not in the cart"),
    ),
    tag = "cart"
)]
pub async fn adjust_quantity(
    state: web::Data<AppState>,
    path: web::Path<ItemId>,
    body: web::Json<AdjustQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let change = body.into_inner().change;
    let view = mutate_and_render(state, move |state| state.cart.adjust_item_quantity(item_id, change)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// PUT /cart/items/{id}/selection
#[utoipa::path(
    put,
    path = "/cart/items/{id}/selection",
    params(
        ("id" = u32, Path, description = "Menu item id"),
    ),
    request_body = SetSelectionRequest,
    responses(
        (status = 200, description = "Selection updated", body = CartView),
    ),
    tag = "cart"
)]
pub async fn set_selection(
    state: web::Data<AppState>,
    path: web::Path<ItemId>,
    body: web::Json<SetSelectionRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let selected = body.into_inner().selected;
    let view = mutate_and_render(state, move |state| state.cart.update_item_selection(item_id, selected)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /cart/items/{id}
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    params(
        ("id" = u32, Path, description = "Menu item id"),
    ),
    responses(
        (status = 200, description = "Item removed", body = CartView),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<ItemId>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let view = mutate_and_render(state, move |state| state.cart.remove_item_from_cart(item_id)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 204, description = "Cart cleared"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    web::block(move || state.cart.clear_cart())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}

// ── Checkout ─────────────────────────────────────────────────────────────────

/// GET /checkout
#[utoipa::path(
    get,
    path = "/checkout",
    responses(
        (status = 200, description = "Selected lines and total", body = CheckoutSummary),
    ),
    tag = "checkout"
)]
pub async fn get_checkout(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summary = read_cart(state, |state| CheckoutSummary::from(&state.cart.get_cart())).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /checkout
///
/// Captures the delivery form and confirms the selected lines. The cart is
/// left as is until the customer starts a new order.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order confirmed", body = OrderConfirmation),
        (status = 400, description = "Missing form field or nothing selected"),
    ),
    tag = "checkout"
)]
pub async fn submit_checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let customer = body.into_inner();
    if let Some(field) = customer.missing_field() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }

    let cart = read_cart(state, |state| state.cart.get_cart()).await?;
    if !cart.has_selection() {
        return Err(AppError::BadRequest("No items selected".to_string()));
    }

    let confirmation = OrderConfirmation {
        order_id: Uuid::new_v4(),
        placed_at: Utc::now().to_rfc3339(),
        lines: cart.selected_lines().map(CartLineResponse::from).collect(),
        total: format_amount(&cart.selected_subtotal()),
        customer,
    };
    log::info!(
        "Order {} confirmed: {} line(s), total {}",
        confirmation.order_id,
        confirmation.lines.len(),
        confirmation.total
    );

    Ok(HttpResponse::Ok().json(confirmation))
}

/// POST /checkout/new-order
///
/// Drops the purchased (selected) lines and sends the customer back to the
/// menu. Unselected lines stay in the cart.
#[utoipa::path(
    post,
    path = "/checkout/new-order",
    responses(
        (status = 200, description = "Selected lines cleared", body = NewOrderResponse),
    ),
    tag = "checkout"
)]
pub async fn start_new_order(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let item_count = web::block(move || {
        state.cart.clear_selected_items()?;
        Ok::<_, AppError>(state.cart.get_cart().item_count())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(NewOrderResponse {
        page: Page::Menu,
        item_count,
    }))
}
