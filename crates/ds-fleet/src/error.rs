use ds_core::{AgentId, OrderId};
use thiserror::Error;

use crate::OrderStatus;

#[derive(Debug, Error, PartialEq)]
pub enum FleetError {
    #[error("order {order} cannot move from {from} to {to}")]
    InvalidTransition {
        order: OrderId,
        from:  OrderStatus,
        to:    OrderStatus,
    },

    #[error("order {order} is already assigned to {agent}")]
    AlreadyAssigned {
        order: OrderId,
        agent: AgentId,
    },

    #[error("order {0} not found")]
    UnknownOrder(OrderId),
}

pub type FleetResult<T> = Result<T, FleetError>;
