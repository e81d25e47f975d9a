pub mod aloc_client;

pub use aloc_client::AlocClient;
