// storefront/src/client/mod.rs

//! Client-side building blocks of the Mini App.

pub mod api;
pub mod recently_viewed;
pub mod state;
pub mod storage;
pub mod telegram;

pub use api::{ApiClient, CartView, ClientError, ClientResult, DEFAULT_ERROR_MESSAGE};
pub use recently_viewed::{RecentlyViewed, ViewedProduct};
pub use state::{AuthState, CartState, WishlistState};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use telegram::{BackButtonGuard, BackButtonHandler, HandlerId, ImpactStyle, NotificationType, TelegramBridge, WebAppHost};
