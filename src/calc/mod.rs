//! Client-side preview arithmetic for payroll forms.
//!
//! None of this is authoritative: the backend recomputes and persists the real
//! figures on submit.

pub mod bonus;
pub mod salary;
pub mod tax;

/// Rounds a money amount to kopecks.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
