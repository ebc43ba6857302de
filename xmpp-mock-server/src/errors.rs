pub mod bridge_error;
pub mod config_error;
pub mod frame_error;
pub mod registry_error;
pub mod server_error;
pub mod transition_error;
pub mod transport_error;
pub mod upstream_error;
