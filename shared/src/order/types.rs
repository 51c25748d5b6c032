//! Payment, delivery and status enums
//!
//! Closed variants instead of free-form strings, so inconsistent
//! null-field combinations (an address on a reservation, a date on a
//! home delivery) are unrepresentable.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Payment
// ============================================================================

/// Accepted payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Tarjeta,
    BancaMovil,
    Transferencia,
}

impl PaymentMethod {
    /// Parse the wire string (`tarjeta`, `banca_movil`, `transferencia`)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tarjeta" => Some(Self::Tarjeta),
            "banca_movil" => Some(Self::BancaMovil),
            "transferencia" => Some(Self::Transferencia),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tarjeta => "tarjeta",
            Self::BancaMovil => "banca_movil",
            Self::Transferencia => "transferencia",
        }
    }
}

/// A payment method chosen in the session, with its masked detail string
///
/// The detail never contains full card or account numbers, only the
/// masked form built at selection time (last four digits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    pub detail: String,
}

// ============================================================================
// Delivery
// ============================================================================

/// How a restaurant order reaches the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryDetails {
    /// Home delivery (`domicilio`)
    Domicilio { address: String, phone: String },
    /// Table reservation (`reserva`)
    Reserva { date: NaiveDate, time: NaiveTime },
}

/// How a market order reaches the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketDeliveryDetails {
    /// Home delivery (`domicilio`)
    Domicilio { address: String, phone: String },
    /// Pickup at the market (`recogida`)
    Recogida { time: NaiveTime },
}

// ============================================================================
// Status
// ============================================================================

/// Order lifecycle status
///
/// Orders are created `Pendiente`; later transitions belong to the admin
/// workflows, not the checkout core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pendiente,
    Entregado,
    Cancelado,
}
