//! Cart page view: projection, pagination, selection, dialogs, and the
//! intents it sends to the shared store.

pub mod auth;
pub mod error;
pub mod migration;
pub mod modal;
pub mod navigation;
pub mod page;
pub mod pagination;
pub mod projection;
pub mod selection;
pub mod session_store;
pub mod store;
pub mod view;

pub use auth::{AuthSnapshot, LoginUser, SessionError};
pub use error::CartError;
pub use migration::MigrationTrigger;
pub use modal::{Modal, ModalProps};
pub use navigation::{CHECKOUT_ROUTE, Navigation, Navigator, RecordingNavigator};
pub use page::{CartPage, CartRow, PageButton};
pub use pagination::{ITEMS_PER_PAGE, Pagination, total_pages};
pub use projection::CartProjection;
pub use selection::Selection;
pub use session_store::SessionCartStore;
pub use store::{CartIntent, CartStore, InMemoryCartStore, StoreError, StoreSnapshot};
pub use view::{CartView, CartViewState};
