// Domain layer: photo models, the accumulated list, and the ports the core talks through.

pub mod model;
pub mod photo_list;
pub mod ports;
