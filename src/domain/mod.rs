// Domain layer: core models and ports (interfaces). No knowledge of HTTP or
// any concrete collaborator lives here.

pub mod model;
pub mod ports;
