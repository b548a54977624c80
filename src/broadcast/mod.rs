//! Inventory Change Broadcaster
//!
//! Every accepted staff or patient mutation is pushed to connected observers so that their view
//! of capacity stays current without re-querying.
//!
//! ## Core Concepts
//! - **Rooms**: `Room::Hospital(id)` carries staff-dashboard detail (full records, bookings);
//!   `Room::Global` carries the public partial updates every search page merges.
//! - **Broker**: `Broker` is the publish/subscribe seam. `InProcessBroker` fans out over one
//!   `tokio::sync::broadcast` channel per room; an external pub/sub can replace it.
//! - **Delivery**: At most once per event per connected observer, no replay. A lagging observer
//!   skips what it missed. Publishing never fails the mutation that triggered it.
//!
//! ## Submodules
//! - **`types`**: Rooms and the event envelope sent on the wire.
//! - **`broker`**: The broker contract and its in-process implementation.
//! - **`notifier`**: `Broadcaster`, which maps each mutation onto its rooms and event names.
//! - **`handlers`**: The WebSocket endpoint observers connect to.

pub mod broker;
pub mod handlers;
pub mod notifier;
pub mod types;

pub use broker::{Broker, InProcessBroker};
pub use notifier::Broadcaster;
