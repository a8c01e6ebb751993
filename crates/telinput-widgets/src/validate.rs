#![forbid(unsafe_code)]

//! The submit-time validation gate.
//!
//! Hosts consult [`PhoneInput::check_validity`] before accepting the field.
//! Failure never raises: the reason is attached to the host field as a
//! human-readable message and the method returns `false`.

use crate::host::HostField;
use crate::input::PhoneInput;

/// Message attached when the number is structurally invalid or incomplete.
pub const INVALID_PHONE_MESSAGE: &str = "invalid phone number";

/// Message attached when a valid number fails the mobile-only constraint.
pub const INVALID_MOBILE_MESSAGE: &str = "invalid mobile number";

impl<H: HostField> PhoneInput<H> {
    /// Whether the current value passes the submit gate.
    ///
    /// Valid iff the formatter reports a complete, structurally valid
    /// number and, with the mobile-only constraint configured, the number
    /// classifies as mobile. Updates the host's validation message either
    /// way.
    pub fn check_validity(&mut self) -> bool {
        if !self.formatter().is_valid() {
            self.host_mut()
                .set_validation_message(Some(INVALID_PHONE_MESSAGE));
            return false;
        }
        if self.mobile_only() {
            let mobile = self
                .formatter()
                .number()
                .is_some_and(|n| n.number_type.is_mobile());
            if !mobile {
                self.host_mut()
                    .set_validation_message(Some(INVALID_MOBILE_MESSAGE));
                return false;
            }
        }
        self.host_mut().set_validation_message(None);
        true
    }
}
