// storefront/src/checkout/form.rs

use crate::checkout::validation::CheckoutField;
use crate::models::{CardDetails, PaymentDetails, PaymentMethod, ShippingInfo};

/// Everything typed into the checkout page.
///
/// Card and UPI inputs are kept side by side so switching the payment
/// method back and forth does not lose what was typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
  pub shipping: ShippingInfo,
  pub payment_method: PaymentMethod,
  pub card: CardDetails,
  pub upi_id: String,
}

impl CheckoutForm {
  /// The details of the selected method only.
  pub fn payment_details(&self) -> PaymentDetails {
    match self.payment_method {
      PaymentMethod::Card => PaymentDetails::Card(self.card.clone()),
      PaymentMethod::Upi => PaymentDetails::Upi {
        id: self.upi_id.clone(),
      },
      PaymentMethod::Cod => PaymentDetails::CashOnDelivery,
    }
  }

  pub fn set_field(&mut self, field: CheckoutField, value: String) {
    let slot = match field {
      CheckoutField::Name => &mut self.shipping.name,
      CheckoutField::Address => &mut self.shipping.address,
      CheckoutField::City => &mut self.shipping.city,
      CheckoutField::State => &mut self.shipping.state,
      CheckoutField::Zip => &mut self.shipping.zip,
      CheckoutField::CardNumber => &mut self.card.number,
      CheckoutField::Expiry => &mut self.card.expiry,
      CheckoutField::Cvv => &mut self.card.cvv,
      CheckoutField::Holder => &mut self.card.holder,
      CheckoutField::Upi => &mut self.upi_id,
    };
    *slot = value;
  }
}
