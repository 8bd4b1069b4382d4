//! Checkout wizard route handlers.
//!
//! Each step posts its form, and on success the handler stores the wizard
//! state and redirects back to `GET /checkout`, which renders whichever step
//! is current. Missing fields re-render the same step with a 422.
//!
//! After an order is placed the wizard sits at the success step until the
//! confirmation has been shown once, then checkout starts over.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::instrument;

use shophub_core::{
    Cart, Checkout, CheckoutError, CheckoutStep, ContactInfo, Order, PaymentDetails,
    ShippingAddress,
};

use super::Layout;
use super::cart::CartView;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// One segment of the progress bar.
#[derive(Debug, Clone)]
pub struct ProgressView {
    pub title: &'static str,
    pub reached: bool,
}

/// An order line for display.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

/// An order for display.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub date: String,
    pub total: String,
    pub status: &'static str,
    /// CSS modifier for the status badge.
    pub status_class: String,
    pub lines: Vec<OrderLineView>,
    pub unit_count: u32,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            date: order.date.format("%Y-%m-%d").to_string(),
            total: order.total.to_string(),
            status: order.status.label(),
            status_class: order.status.to_string(),
            lines: order
                .items
                .iter()
                .map(|line| OrderLineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    line_total: line.line_total().to_string(),
                })
                .collect(),
            unit_count: order.unit_count(),
        }
    }
}

/// The wizard page, showing one step's form and the order summary.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/wizard.html")]
pub struct WizardTemplate {
    pub layout: Layout,
    /// `info`, `shipping` or `payment`.
    pub step: String,
    pub heading: &'static str,
    pub progress: Vec<ProgressView>,
    pub contact: ContactInfo,
    pub shipping: ShippingAddress,
    pub error: Option<String>,
    pub summary: CartView,
}

impl WizardTemplate {
    fn new(layout: Layout, step: CheckoutStep, checkout: &Checkout, cart: &Cart) -> Self {
        Self {
            layout,
            step: step.to_string(),
            heading: step.title(),
            progress: CheckoutStep::PROGRESS
                .into_iter()
                .map(|s| ProgressView {
                    title: s.title(),
                    reached: s.reached_by(step),
                })
                .collect(),
            contact: checkout.contact().clone(),
            shipping: checkout.shipping().clone(),
            error: None,
            summary: CartView::from(cart),
        }
    }
}

/// Order confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub layout: Layout,
    pub order: OrderView,
    pub email: String,
}

/// Shown when there is nothing to check out.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/empty.html")]
pub struct EmptyCartTemplate {
    pub layout: Layout,
}

fn to_checkout() -> Response {
    Redirect::to("/checkout").into_response()
}

/// Everything a step handler needs.
struct Context {
    layout: Layout,
    cart: Cart,
    checkout: Checkout,
}

impl Context {
    async fn load(storage: &Storage) -> Result<Self> {
        let cart = storage.cart().await?;
        let signed_in = storage.user().await?.is_some();
        Ok(Self {
            layout: Layout::new(&cart, signed_in),
            cart,
            checkout: storage.checkout().await?,
        })
    }

    /// Re-render `step` with the error, or send a stale form back to the
    /// current step.
    fn reject(self, step: CheckoutStep, err: &CheckoutError) -> WizardRejection {
        if matches!(err, CheckoutError::OutOfOrder { .. }) {
            tracing::debug!(error = %err, "Stale checkout form");
            return WizardRejection::Stale;
        }

        tracing::debug!(%step, error = %err, "Checkout step rejected");
        let mut page = WizardTemplate::new(self.layout, step, &self.checkout, &self.cart);
        page.error = Some(err.to_string());
        WizardRejection::Invalid(Box::new(page))
    }
}

/// Why a step did not advance.
enum WizardRejection {
    /// The form belongs to a step the wizard is not on.
    Stale,
    /// The form was incomplete.
    Invalid(Box<WizardTemplate>),
}

impl IntoResponse for WizardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Stale => to_checkout(),
            Self::Invalid(page) => (StatusCode::UNPROCESSABLE_ENTITY, *page).into_response(),
        }
    }
}

/// Display the current checkout step.
#[instrument(skip(storage))]
pub async fn show(storage: Storage) -> Result<Response> {
    let Context {
        layout,
        cart,
        checkout,
    } = Context::load(&storage).await?;

    if checkout.step() == CheckoutStep::Success {
        storage.clear_checkout().await?;
        if let Some(order) = storage.orders().await?.last() {
            return Ok(SuccessTemplate {
                layout,
                order: OrderView::from(order),
                email: checkout.contact().email.clone(),
            }
            .into_response());
        }
    }

    if cart.is_empty() {
        return Ok(EmptyCartTemplate { layout }.into_response());
    }

    let step = checkout.step();
    Ok(WizardTemplate::new(layout, step, &checkout, &cart).into_response())
}

/// Submit contact details.
#[instrument(skip_all)]
pub async fn submit_info(storage: Storage, Form(form): Form<ContactInfo>) -> Result<Response> {
    let mut ctx = Context::load(&storage).await?;
    if ctx.cart.is_empty() {
        return Ok(to_checkout());
    }

    if let Err(err) = ctx.checkout.submit_contact(form.clone()) {
        let mut rejection = ctx.reject(CheckoutStep::Info, &err);
        if let WizardRejection::Invalid(page) = &mut rejection {
            page.contact = form;
        }
        return Ok(rejection.into_response());
    }

    storage.save_checkout(&ctx.checkout).await?;
    Ok(to_checkout())
}

/// Submit the shipping address.
#[instrument(skip_all)]
pub async fn submit_shipping(
    storage: Storage,
    Form(form): Form<ShippingAddress>,
) -> Result<Response> {
    let mut ctx = Context::load(&storage).await?;
    if ctx.cart.is_empty() {
        return Ok(to_checkout());
    }

    if let Err(err) = ctx.checkout.submit_shipping(form.clone()) {
        let mut rejection = ctx.reject(CheckoutStep::Shipping, &err);
        if let WizardRejection::Invalid(page) = &mut rejection {
            page.shipping = form;
        }
        return Ok(rejection.into_response());
    }

    storage.save_checkout(&ctx.checkout).await?;
    Ok(to_checkout())
}

/// Place the order.
///
/// Waits out the simulated payment processing time, then empties the cart
/// and records the order in the session's history. Card details are only
/// checked for presence and are never stored or logged.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    storage: Storage,
    Form(payment): Form<PaymentDetails>,
) -> Result<Response> {
    let mut ctx = Context::load(&storage).await?;
    if ctx.cart.is_empty() {
        return Ok(to_checkout());
    }

    if let Err(err) = ctx.checkout.check_payment(&payment, &ctx.cart) {
        return Ok(ctx.reject(CheckoutStep::Payment, &err).into_response());
    }

    tokio::time::sleep(state.config().checkout_delay).await;

    let order = match ctx
        .checkout
        .place_order(&payment, &mut ctx.cart, Utc::now())
    {
        Ok(order) => order,
        Err(err) => return Ok(ctx.reject(CheckoutStep::Payment, &err).into_response()),
    };

    storage.save_cart(&ctx.cart).await?;
    storage.push_order(order.clone()).await?;
    storage.save_checkout(&ctx.checkout).await?;

    add_breadcrumb("checkout", "Placed order", Some(&[("order_id", order.id.as_str())]));
    tracing::info!(
        order_id = %order.id,
        total = %order.total,
        units = order.unit_count(),
        "Order placed"
    );

    Ok(to_checkout())
}

/// Go back one step.
#[instrument(skip(storage))]
pub async fn back(storage: Storage) -> Result<Redirect> {
    let mut checkout = storage.checkout().await?;
    checkout.back();
    storage.save_checkout(&checkout).await?;
    Ok(Redirect::to("/checkout"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::mock_data;

    #[test]
    fn test_order_view() {
        let order = &mock_data::sample_orders()[1];
        let view = OrderView::from(order);
        assert_eq!(view.id, "ORD-002");
        assert_eq!(view.date, "2024-02-10");
        assert_eq!(view.status, "In Transit");
        assert_eq!(view.status_class, "in-transit");
        assert_eq!(view.lines[0].line_total, "$99.98");
        assert_eq!(view.unit_count, 2);
    }

    #[test]
    fn test_progress_marks_reached_steps() {
        let page = WizardTemplate::new(
            Layout::default(),
            CheckoutStep::Shipping,
            &Checkout::new(),
            &Cart::new(),
        );
        let reached: Vec<bool> = page.progress.iter().map(|p| p.reached).collect();
        assert_eq!(reached, vec![true, true, false]);
        assert_eq!(page.step, "shipping");
        assert_eq!(page.heading, "Shipping Address");
    }

    #[test]
    fn test_incomplete_step_is_unprocessable() {
        let ctx = Context {
            layout: Layout::default(),
            cart: Cart::new(),
            checkout: Checkout::new(),
        };
        let response = ctx
            .reject(
                CheckoutStep::Info,
                &CheckoutError::MissingFields(vec!["email"]),
            )
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_stale_form_redirects() {
        let ctx = Context {
            layout: Layout::default(),
            cart: Cart::new(),
            checkout: Checkout::new(),
        };
        let response = ctx
            .reject(
                CheckoutStep::Shipping,
                &CheckoutError::OutOfOrder {
                    action: "enter a shipping address",
                    step: CheckoutStep::Info,
                },
            )
            .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
