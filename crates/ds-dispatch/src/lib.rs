//! `ds-dispatch` — ETA estimation and order assignment.
//!
//! Dispatch runs once per tick after movement.  Every pending order, oldest
//! first, goes to the available agent with the smallest estimated time of
//! arrival; that agent is then busy for the rest of the pass.  Orders with
//! no available agent stay pending and are retried on the next tick.
//!
//! # Crate layout
//!
//! | Module     | Contents                                        |
//! |------------|-------------------------------------------------|
//! | [`eta`]    | `estimate_eta`                                  |
//! | [`assign`] | `assign_pending_orders`, `Assignment`           |
//!
//! The route planner seam ([`RoutePlanner`]) lives in `ds-fleet` because the
//! movement engine also needs it; it is re-exported here for callers that
//! only deal with dispatch.

pub mod assign;
pub mod eta;

#[cfg(test)]
mod tests;

pub use assign::{Assignment, assign_pending_orders, best_agent_for};
pub use eta::{estimate_eta, eta_from_legs};
pub use ds_fleet::{DirectPlanner, MoveContext, RoutePlanner, WaypointPlanner};
