//! Side-effecting seams: collaborators, perception and configuration.

pub mod config;
pub mod device;
pub mod perception;
pub mod replay;
