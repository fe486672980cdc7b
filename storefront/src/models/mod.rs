// storefront/src/models/mod.rs

//! Contains data structures representing database entities and the joined
//! views the API returns.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod telegram_user;

pub use cart::{Cart, CartItem, CartLine, MAX_LINE_QUANTITY};
pub use category::{Category, CategoryWithCount};
pub use order::{CheckoutDetails, Order, OrderItem, OrderStatus, OrderSummary, OrderWithItems};
pub use product::{Product, ProductQuery};
pub use telegram_user::{TelegramProfile, TelegramUser};
