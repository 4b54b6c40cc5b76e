//! Dashboard orchestration: one aggregate load per ticker, fanned out to the
//! prediction backend, and a session that keeps stale loads off the screen.

pub mod aggregator;
pub mod session;

pub use aggregator::DashboardAggregator;
pub use session::{DashboardSession, DashboardView, LoadTicket};

#[cfg(test)]
pub(crate) mod testing;
