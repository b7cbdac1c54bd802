pub mod ipc;
pub mod monitor;
pub mod mpv;

pub use ipc::{MpvIpc, generate_socket_path};
pub use monitor::Monitor;
pub use mpv::MpvPlayer;
