//! Order code generation
//!
//! Codes are the first eight hex characters of a v4 UUID, uppercased.
//! They are customer-facing lookup keys, not security tokens, so the
//! short length is acceptable; uniqueness is enforced by the code table
//! in storage, with the orchestrator regenerating on collision.

/// Customer-facing code length
pub const ORDER_CODE_LEN: usize = 8;

/// How many collisions the orchestrator tolerates before giving up
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Generate a fresh candidate order code
pub fn generate_order_code() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..ORDER_CODE_LEN].to_uppercase()
}
