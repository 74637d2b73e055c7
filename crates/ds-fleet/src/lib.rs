//! `ds-fleet` — agents, orders, fatigue, and movement.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`agent`]    | `Agent`, `AgentStatus`                                       |
//! | [`order`]    | `Order`, `OrderStatus`, `OrderBook` (log + working set)      |
//! | [`fatigue`]  | `FatigueModel`, `FatigueConfig`                              |
//! | [`route`]    | `RoutePlanner` trait, `DirectPlanner`, `WaypointPlanner`     |
//! | [`movement`] | `MovementEngine<P>`, `MoveContext`, `MoveEvent`              |
//! | [`error`]    | `FleetError`, `FleetResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on agents, orders, statuses. |

pub mod agent;
pub mod error;
pub mod fatigue;
pub mod movement;
pub mod order;
pub mod route;


pub use agent::{Agent, AgentStatus};
pub use error::{FleetError, FleetResult};
pub use fatigue::{FatigueConfig, FatigueModel, MIN_FATIGUE_FACTOR};
pub use movement::{AgentStep, MoveContext, MoveEvent, MovementEngine};
pub use order::{Order, OrderBook, OrderStatus};
pub use route::{DirectPlanner, RoutePlanner, WaypointPlanner};
