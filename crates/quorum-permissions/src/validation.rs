//! Address input validation for the permission panels.

use quorum_core::Address;

/// Trim and parse user input. `None` when it is not an address.
pub fn filter_address(value: &str) -> Option<Address> {
    Address::parse(value.trim()).ok()
}

/// Trim and parse user input, rejecting the zero address.
pub fn filter_non_empty_address(value: &str) -> Option<Address> {
    filter_address(value).filter(|a| !a.is_zero())
}
