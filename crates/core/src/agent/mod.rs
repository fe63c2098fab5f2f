//! Vendor and customer agents.
//!
//! Both agents run the same loop, parameterized by direction: call the pool
//! operation, pause for the configured delay, repeat. An agent stops when the
//! pool refuses the operation (shutdown or exhausted supply) or when its own
//! [`Vendor::stop`] / [`Customer::stop`] is called. A stop signal interrupts
//! a blocked pool operation and an in-progress pacing delay alike, so a
//! stopped agent exits promptly instead of waiting out a pool event that may
//! never come.

mod customer;
mod vendor;

pub use customer::Customer;
pub use vendor::Vendor;
