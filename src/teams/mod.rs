//! Outbound messages to the chat channel.
//!
//! The bridge only ever sends one kind of message to chat: a fixed
//! acknowledgement that a command was received. Delivery is best-effort; a
//! failure is logged and never affects the inbound webhook's response.

mod notifier;

pub use notifier::{ACKNOWLEDGEMENT, NotifyError, TeamsNotifier};
