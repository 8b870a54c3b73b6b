//! Domain module for the Kinship network
//!
//! This crate contains pure domain logic with no I/O dependencies:
//! - Signed messages and their content-addressed ids
//! - The closed set of message content types
//! - Message construction and verification

pub mod error;
pub mod message;

pub use error::{DomainError, Result};
pub use message::{ContentType, Message, MessageValue, MsgReference};
