pub mod catalog;
pub mod clock;
pub mod context;
pub mod entities;
pub mod intent;
pub mod message;
pub mod session;
pub mod slot;
pub mod ui;

pub use catalog::*;
pub use clock::*;
pub use context::*;
pub use entities::*;
pub use intent::*;
pub use message::*;
pub use session::*;
pub use slot::*;
pub use ui::*;
