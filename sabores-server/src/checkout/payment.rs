//! Payment method selection
//!
//! Validates the raw payment request and stores a masked
//! [`PaymentSelection`] on the session. Full card and account numbers
//! are never retained; only the masked detail string survives past this
//! function.

use shared::order::{PaymentMethod, PaymentRequest, PaymentSelection};

use super::{CheckoutError, CheckoutResult, require};
use crate::session::SessionData;

/// Validate a payment request and record the selection on the session
pub fn select_payment(
    session: &mut SessionData,
    req: &PaymentRequest,
) -> CheckoutResult<PaymentSelection> {
    if session.identity.is_guest() {
        return Err(CheckoutError::PermissionDenied);
    }

    let method = PaymentMethod::parse(&req.method).ok_or_else(|| {
        CheckoutError::Validation(format!("unknown payment method: {}", req.method))
    })?;

    let detail = match method {
        PaymentMethod::Tarjeta => {
            let number = digits(require(&req.card_number, "card_number")?, "card_number")?;
            if number.len() < 13 || number.len() > 19 {
                return Err(CheckoutError::Validation(
                    "card_number must be 13 to 19 digits".to_string(),
                ));
            }
            require(&req.expiry, "expiry")?;
            let cvv = digits(require(&req.cvv, "cvv")?, "cvv")?;
            if cvv.len() < 3 || cvv.len() > 4 {
                return Err(CheckoutError::Validation(
                    "cvv must be 3 or 4 digits".to_string(),
                ));
            }
            format!("Número: {} **** **** ****", last4(&number))
        }
        PaymentMethod::BancaMovil => {
            let number = digits(require(&req.mobile_number, "mobile_number")?, "mobile_number")?;
            require(&req.holder_name, "holder_name")?;
            format!("Celular: {number}")
        }
        PaymentMethod::Transferencia => {
            let number = digits(
                require(&req.account_number, "account_number")?,
                "account_number",
            )?;
            require(&req.holder_name, "holder_name")?;
            format!("Cuenta: {} ****", last4(&number))
        }
    };

    let selection = PaymentSelection { method, detail };
    session.payment = Some(selection.clone());
    tracing::debug!(method = method.as_str(), "payment method selected");
    Ok(selection)
}

fn digits(value: &str, field: &str) -> CheckoutResult<String> {
    let cleaned: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(CheckoutError::Validation(format!(
            "{field} must contain only digits"
        )));
    }
    Ok(cleaned)
}

fn last4(digits: &str) -> &str {
    &digits[digits.len().saturating_sub(4)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;

    fn user_session() -> SessionData {
        SessionData {
            identity: Identity::User {
                id: "u1".to_string(),
                name: "Ana".to_string(),
            },
            carts: Default::default(),
            market_cart: Default::default(),
            payment: None,
        }
    }

    fn card_request() -> PaymentRequest {
        PaymentRequest {
            method: "tarjeta".to_string(),
            card_number: Some("4111 1111 1111 1111".to_string()),
            expiry: Some("12/27".to_string()),
            cvv: Some("123".to_string()),
            mobile_number: None,
            account_number: None,
            holder_name: None,
        }
    }

    #[test]
    fn card_selection_masks_all_but_last_four() {
        let mut session = user_session();
        let selection = select_payment(&mut session, &card_request()).unwrap();

        assert_eq!(selection.method, PaymentMethod::Tarjeta);
        assert_eq!(selection.detail, "Número: 1111 **** **** ****");
        assert!(session.payment.is_some());
    }

    #[test]
    fn transfer_masks_account_number() {
        let mut session = user_session();
        let req = PaymentRequest {
            method: "transferencia".to_string(),
            account_number: Some("00123456789".to_string()),
            holder_name: Some("Ana Pérez".to_string()),
            card_number: None,
            expiry: None,
            cvv: None,
            mobile_number: None,
        };

        let selection = select_payment(&mut session, &req).unwrap();
        assert_eq!(selection.detail, "Cuenta: 6789 ****");
    }

    #[test]
    fn missing_fields_name_the_field() {
        let mut session = user_session();
        let mut req = card_request();
        req.cvv = None;

        let err = select_payment(&mut session, &req).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(msg) if msg.contains("cvv")));
        assert!(session.payment.is_none());
    }

    #[test]
    fn unknown_method_rejected() {
        let mut session = user_session();
        let mut req = card_request();
        req.method = "efectivo".to_string();

        assert!(matches!(
            select_payment(&mut session, &req),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn guests_cannot_select_payment() {
        let mut session = SessionData {
            identity: Identity::Guest,
            carts: Default::default(),
            market_cart: Default::default(),
            payment: None,
        };

        assert!(matches!(
            select_payment(&mut session, &card_request()),
            Err(CheckoutError::PermissionDenied)
        ));
    }
}
