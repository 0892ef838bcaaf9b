//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event.
//! Actions are the boundary between pure state transitions and effectful
//! operations: notifying the presentation sink and issuing the network call.
//!
//! # Example
//!
//! ```rust
//! use shelltex::app::Action;
//!
//! let actions = vec![
//!     Action::NotifyError { message: "bad params".to_string() },
//! ];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::{GenerationRequest, ParameterId};

/// Commands produced by the event handler and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A submit was blocked because these fields are invalid.
    NotifyInvalid {
        /// Offending fields in form order.
        fields: Vec<ParameterId>,
    },

    /// A generation request was accepted and is about to be sent.
    NotifyStart,

    /// Sends the request to the generation endpoint.
    ///
    /// The runtime must feed the resulting outcome back as
    /// [`Event::GenerationResolved`](crate::app::Event::GenerationResolved).
    Submit(GenerationRequest),

    /// The server produced an image.
    NotifySuccess {
        /// Image location as returned by the server.
        image_url: String,
    },

    /// The attempt failed.
    NotifyError {
        /// Message to show the user.
        message: String,
    },
}
