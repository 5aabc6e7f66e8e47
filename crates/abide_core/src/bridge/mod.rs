//! Same-context and cross-context synchronization of store keys.
//!
//! The store owns one [`CallbackRegistry`]. Every write publishes a
//! [`StoreEvent`] to the subscribers of the written key; [`Binding`]s are the
//! usual subscribers and keep a live copy of one key's value.
//!
//! Cross-context propagation is an adapter of the storage medium: signals
//! queued by the medium are forwarded by
//! [`Store::poll_external`](crate::store::Store::poll_external), and only
//! bindings opened with [`BindingOptions::sync_across_contexts`] act on them.

mod binding;
mod callback_registry;
mod events;

pub use binding::{Binding, BindingOptions};
pub use callback_registry::{CallbackRegistry, EventCallback, Subscription, SubscriptionId};
pub use events::StoreEvent;
