//! Widget dashboard model: the category/widget collection, the pure
//! operations over it, the interaction session a UI drives, and the
//! projection that decides how a widget body is drawn.

pub mod board;
pub mod chart;
pub mod config;
pub mod platform;
pub mod render;
pub mod seed;
pub mod session;

pub use board::{Board, BoardError, Category, Widget, WidgetKind};
pub use chart::{ChartCatalog, ChartData, ChartOptions};
pub use render::WidgetBody;
pub use seed::{Seed, SeedError};
pub use session::Session;
