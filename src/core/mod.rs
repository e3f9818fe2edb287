pub mod compose;
pub mod guard;
pub mod hash;
pub mod picker;
pub mod pipeline;
pub mod seed;
pub mod store;
pub mod weights;
