pub mod cities;
pub mod orders;
pub mod report;
pub mod rpc;
pub mod settings;
