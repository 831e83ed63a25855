//! Client side of the blog: GraphQL transport, local result cache and the
//! state machines behind the list, form and delete screens.

mod cache;
mod form;
mod list;
mod transport;

pub use cache::PostCache;
pub use form::{FormState, Navigation, PostForm, Prompt, SAVE_FAILED_MESSAGE, SaveOutcome, SaveRequest};
pub use list::{DeleteFlow, DeleteState, PostSummary, load_post, load_posts};
pub use transport::{BlogClient, ClientError, PostDraft};
