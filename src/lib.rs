//! terraform-validator: validate Terraform plans against organizational policy.
//!
//! Plans are converted to canonical assets and evaluated by a policy engine.
//! This crate owns the command pipeline; conversion and evaluation sit behind
//! the traits in [`collab`].

pub mod cli;
pub mod collab;
pub mod convert;
pub mod core;
pub mod policy;
