//! Leadflow: lead intake and integration fan-out for the video tour embed.
//!
//! A form submission arrives at the gateway, is persisted exactly once
//! under the owning customer, and is then fanned out to the customer's
//! live integrations (CRM push, team notification email, promo email).
//! Each integration dispatch is independent: one failing never affects the
//! others or the persisted lead.

pub mod dispatch;
pub mod gateway;
pub mod integrations;
pub mod outbound;
pub mod store;
pub mod timefmt;
pub mod types;

pub use dispatch::{FanOutReport, IntegrationDispatcher};
pub use gateway::{GatewayConfig, GatewayState, LeadGateway};
