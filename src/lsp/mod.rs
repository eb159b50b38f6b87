// LSP protocol layer
// - client.rs: language client seam and client options
// - commands.rs: contributed commands and their registry
// - notification.rs: xml/actionableNotification bridge
pub mod client;
pub mod commands;
pub mod notification;
