//! Small helpers shared by the service and server layers.

pub mod mime;
