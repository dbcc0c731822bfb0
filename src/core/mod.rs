pub mod state;
pub mod store;

pub use crate::domain::model::{Item, ItemForm, ItemId};
pub use crate::domain::ports::{ItemApi, Notifier};
pub use crate::utils::error::Result;
