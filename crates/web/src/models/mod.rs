//! View-side models: session identity, the cart mirror, the address book,
//! and the navigation shell.

pub mod address;
pub mod cart;
pub mod nav;
pub mod session;

pub use session::CurrentUser;
pub use session::keys as session_keys;
