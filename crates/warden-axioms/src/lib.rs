//! # warden-axioms
//!
//! Axiom Validator: decides whether a proposed operation may be applied to
//! the agent's current state.
//!
//! ## Axioms (evaluated in this order, first violation wins)
//!
//! - **AXM-006 (Conditioned Operation)**: a decoupled agent performs no
//!   external operations.
//! - **AXM-008 (Operational Boundedness)**: operation complexity stays within
//!   the configured bound.
//! - **AXM-009 (Possibility Preservation)**: no operation that destroys
//!   recoverability or narrows future options.
//! - **AXM-015 (Viability)**: no operation may drive energy below its floor.
//!
//! Operations that violate nothing but are not recognised come back
//! `Unknown`. The [`guard`] wrapper applies **AXM-011 (Conservative
//! Default)**: anything not explicitly allowed is denied.
//!
//! ## Components
//!
//! - **AxiomValidator**: the fixed, ordered axiom list
//! - **guard**: binary allow/deny over the three-way result
//! - **BlockMonitor**: rolling window of denials for misuse detection

pub mod axiom;
pub mod config;
pub mod guard;
pub mod monitor;
pub mod rules;
pub mod validator;

pub use axiom::{Axiom, AxiomId, AxiomViolation};
pub use config::{Config, EnergyCostModel};
pub use guard::{guard, GuardDecision};
pub use monitor::{check_repeated_blocks, BlockEvent, BlockMonitor, RepeatedBlockReport};
pub use rules::{
    ConditionedOperationAxiom, OperationalBoundednessAxiom, PossibilityPreservationAxiom,
    ViabilityAxiom,
};
pub use validator::{validate, AxiomValidator, ValidationResult};
