//! Checkout and contact form commands.

use delicious_bakers_core::Price;
use delicious_bakers_storefront::error::Result;
use delicious_bakers_storefront::services::checkout::{self, OrderForm};
use delicious_bakers_storefront::services::contact::{self, ContactForm};
use delicious_bakers_storefront::state::AppState;

/// Submit the cart as an order.
pub async fn checkout(state: &AppState, form: &OrderForm) -> Result<()> {
    let total = Price::local(state.cart().total_price());
    let rows =
        checkout::place_order(state.cart(), state.supabase()?, state.notifier(), form).await?;

    #[allow(clippy::print_stdout)]
    {
        for row in &rows {
            println!("{} x {}", row.quantity, row.product);
        }
        println!("Total: {total}");
        println!("Delivery: {}", delivery_label(form));
    }
    Ok(())
}

fn delivery_label(form: &OrderForm) -> String {
    form.delivery_date.format("%A, %e %B %Y").to_string()
}

/// Send a contact form message.
pub async fn contact(state: &AppState, form: ContactForm) -> Result<()> {
    contact::send_contact_message(state.supabase()?, state.notifier(), form).await?;
    Ok(())
}
