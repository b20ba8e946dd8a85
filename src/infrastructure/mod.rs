//! Adapters from the domain repository traits to concrete backends.
//!
//! Only PostgreSQL is provided, in [`persistence`].

pub mod persistence;
