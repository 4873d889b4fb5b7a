//! World interaction: carrying props and the weighing pad.
pub mod pickup;
pub mod scale;

pub use pickup::{decide_pickup, pickup_system, HoldPoint, Holder, Pickup, PickupAction};
pub use scale::{spawn_scale_label, update_scale_label, weigh_props, ScaleLabel, Weight, WeightScale};
