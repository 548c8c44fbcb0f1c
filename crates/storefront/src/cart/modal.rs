//! Which collaborator dialog is open, and the props handed to it.

use serde::{Deserialize, Serialize};

use tote_core::CartItem;

/// The single open dialog. Opening one replaces any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "camelCase")]
pub enum Modal {
    #[default]
    Closed,
    /// Product detail, closed by its close callback.
    Detail(CartItem),
    /// Confirm deletion of one line.
    ConfirmDelete(CartItem),
    /// Confirm deletion of the current selection.
    ConfirmBulkDelete,
}

/// Props for whichever dialog is open, as the render layer receives them.
///
/// The callbacks (`close`, `onConfirm`, `onCancel`) map to the
/// `close_modal`, `confirm_delete` and `confirm_bulk_delete` operations of the
/// view, so only the data half of each contract is carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ModalProps {
    Detail { item: CartItem },
    ConfirmDelete { item: CartItem },
    ConfirmBulkDelete { items: Vec<CartItem> },
}
