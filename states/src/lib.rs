//! Observable state primitives for the Corral client.
//!
//! The client keeps a handful of process-wide values (current session user, busy
//! flag) that several screens react to. They are held in an [`Observable`], which
//! notifies registered listeners synchronously whenever the value changes. Every
//! registration hands back a [`Subscription`] that must be used to unsubscribe.

mod listeners;
mod observable;

pub use listeners::{Listeners, Subscription};
pub use observable::Observable;
