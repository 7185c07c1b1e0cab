// Tax module - Polish freelance gross to net conversion

pub mod billing;
pub mod engine;

pub use billing::BillingType;
pub use engine::{
    breakdown_for_tag, calculate_net, get_breakdown, net_for_tag, useme_commission, TaxBreakdown,
};
